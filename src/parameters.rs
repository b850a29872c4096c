use crate::math::Real;

/// Weight of the surface compactness term in the decomposition cost function.
///
/// This is not configurable: every run uses this value.
pub const COMPACITY_WEIGHT: Real = 0.0001;

/// Parameters of a convex decomposition run.
///
/// The decomposition layer forwards these values to the
/// [`DecompositionEngine`](crate::engine::DecompositionEngine) without
/// modifying or validating them: a degenerate combination is for the engine
/// to reject. See [`VhacdEngine`](crate::engine::VhacdEngine) for how the
/// default engine consumes each of them.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct DecompositionParameters {
    /// Maximum allowed concavity of a cluster.
    ///
    /// Smaller values yield more, tighter convex hulls.
    pub concavity: Real,
    /// Minimum number of clusters in the result.
    ///
    /// An engine that cannot produce that many clusters fails.
    pub n_clusters: u32,
    /// Maximum number of vertices of each convex hull; `0` disables the limit.
    pub max_verts_per_hull: u32,
    /// Connected components closer than this distance are bridged by a
    /// virtual edge so they can be merged during simplification.
    pub connect_distance: Real,
    /// Number of triangles of the simplified mesh used internally by the engine.
    pub target_decimated_triangle_count: u32,
    /// Weight of the volume error term of the cost function.
    pub volume_weight: Real,
    /// Fraction of the total volume below which a cluster is flagged as small.
    pub small_cluster_threshold: Real,
    /// Add extra sample points along hull edges to improve the hull fit.
    pub add_extra_dist_points: bool,
    /// Add extra sample points on hull faces to improve the hull fit.
    pub add_faces_points: bool,
}

impl Default for DecompositionParameters {
    fn default() -> Self {
        Self::prim()
    }
}

impl DecompositionParameters {
    /// Parameters suited to parametric primitives.
    pub fn prim() -> Self {
        Self {
            concavity: 10.0,
            n_clusters: 1,
            max_verts_per_hull: 100,
            connect_distance: 30.0,
            target_decimated_triangle_count: 1200,
            volume_weight: 300.0,
            small_cluster_threshold: 0.16,
            add_extra_dist_points: true,
            add_faces_points: true,
        }
    }

    /// Parameters suited to sculpted meshes.
    ///
    /// Coarser than [`Self::prim`]: a higher concavity, a smaller decimated mesh, and
    /// no volume weighting.
    pub fn sculpt() -> Self {
        Self {
            concavity: 100.0,
            target_decimated_triangle_count: 500,
            volume_weight: 0.0,
            ..Self::prim()
        }
    }

    /// The weight of the surface compactness term, always [`COMPACITY_WEIGHT`].
    pub fn compacity_weight(&self) -> Real {
        COMPACITY_WEIGHT
    }

    /// Sets the maximum allowed concavity.
    pub fn with_concavity(mut self, concavity: Real) -> Self {
        self.concavity = concavity;
        self
    }

    /// Sets the minimum number of clusters.
    pub fn with_n_clusters(mut self, n_clusters: u32) -> Self {
        self.n_clusters = n_clusters;
        self
    }

    /// Sets the vertex budget of each convex hull.
    pub fn with_max_verts_per_hull(mut self, max_verts_per_hull: u32) -> Self {
        self.max_verts_per_hull = max_verts_per_hull;
        self
    }

    /// Sets the distance under which connected components are bridged.
    pub fn with_connect_distance(mut self, connect_distance: Real) -> Self {
        self.connect_distance = connect_distance;
        self
    }

    /// Sets the triangle budget of the engine's decimated mesh.
    pub fn with_target_decimated_triangle_count(mut self, count: u32) -> Self {
        self.target_decimated_triangle_count = count;
        self
    }

    /// Sets the weight of the volume error term.
    pub fn with_volume_weight(mut self, volume_weight: Real) -> Self {
        self.volume_weight = volume_weight;
        self
    }

    /// Sets the small-cluster volume fraction.
    pub fn with_small_cluster_threshold(mut self, threshold: Real) -> Self {
        self.small_cluster_threshold = threshold;
        self
    }

    /// Enables or disables the extra hull-fit sample points.
    pub fn with_extra_points(mut self, extra_dist_points: bool, faces_points: bool) -> Self {
        self.add_extra_dist_points = extra_dist_points;
        self.add_faces_points = faces_points;
        self
    }
}
