use crate::math::{Point, Real, Triangle, Vector, DIM};

/// A convex sub-mesh approximating part of a decomposed mesh.
///
/// Clusters are produced by a [`DecompositionEngine`](crate::engine::DecompositionEngine)
/// and are read-only afterwards: once stored in a session they are only
/// reachable through shared references.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexHullCluster {
    points: Vec<Point>,
    triangles: Vec<Triangle>,
    small: bool,
}

impl ConvexHullCluster {
    /// Creates a cluster from the vertices and triangles of a convex hull.
    pub fn new(points: Vec<Point>, triangles: Vec<Triangle>, small: bool) -> Self {
        Self {
            points,
            triangles,
            small,
        }
    }

    /// The vertices of this convex hull.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The triangles of this convex hull.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Is this cluster below the small-cluster volume threshold?
    pub fn is_small(&self) -> bool {
        self.small
    }

    /// Number of flat coordinate components: three per point.
    pub fn flat_vertex_count(&self) -> usize {
        self.points.len() * DIM
    }

    /// Number of flat index components: three per triangle.
    pub fn flat_index_count(&self) -> usize {
        self.triangles.len() * DIM
    }

    /// Number of bytes used by the geometry of this cluster.
    pub fn storage_bytes(&self) -> usize {
        self.points.len() * size_of::<Point>() + self.triangles.len() * size_of::<Triangle>()
    }

    /// The volume enclosed by this hull.
    pub fn volume(&self) -> Real {
        signed_volume(&self.points, &self.triangles).abs()
    }

    /// Writes interleaved coordinates and indices into the front of the given buffers.
    ///
    /// The caller checks the buffer sizes beforehand.
    pub(crate) fn write_flat(&self, verts_out: &mut [Real], indexes_out: &mut [u32]) {
        for (out, pt) in verts_out.chunks_exact_mut(DIM).zip(&self.points) {
            out.copy_from_slice(pt.coords.as_slice());
        }

        for (out, tri) in indexes_out.chunks_exact_mut(DIM).zip(&self.triangles) {
            out.copy_from_slice(tri);
        }
    }
}

/// The signed volume enclosed by a closed triangle mesh.
pub(crate) fn signed_volume(points: &[Point], triangles: &[Triangle]) -> Real {
    let mut volume = 0.0;

    for tri in triangles {
        let a = points[tri[0] as usize].coords;
        let b = points[tri[1] as usize].coords;
        let c = points[tri[2] as usize].coords;
        volume += a.dot(&b.cross(&c));
    }

    volume / 6.0
}

/// An owned convex hull copied out of a decomposition session.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ConvexHull {
    /// The vertices of the hull.
    pub vertices: Vec<Point>,
    /// The triangles of the hull, as flat `i0, i1, i2` triples.
    pub indices: Vec<u32>,
}

impl ConvexHull {
    /// Builds a hull from the flat buffers filled by the session accessors.
    pub(crate) fn from_flat(verts: &[Real], indices: Vec<u32>) -> Self {
        let vertices = verts
            .chunks_exact(DIM)
            .map(|c| Point::new(c[0], c[1], c[2]))
            .collect();
        Self { vertices, indices }
    }

    /// Scales every vertex of this hull component-wise.
    pub fn scale(&mut self, scale: &Vector) {
        for v in &mut self.vertices {
            v.coords.component_mul_assign(scale);
        }
    }

    /// The triangles of this hull.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(DIM).map(|c| [c[0], c[1], c[2]])
    }
}
