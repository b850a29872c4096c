use super::refine::{simplify_hull, split_until, Hull};
use super::{panic_message, DecompositionEngine, EngineError};
use crate::arena::SessionArena;
use crate::cluster::{signed_volume, ConvexHullCluster};
use crate::geometry::Mesh;
use crate::math::Real;
use crate::parameters::DecompositionParameters;
use log::debug;
use parry3d::transformation::try_convex_hull;
use parry3d::transformation::vhacd::{VHACDParameters, VHACD};
use std::panic::{self, AssertUnwindSafe};

/// A [`DecompositionEngine`] backed by the VHACD implementation of `parry3d`.
///
/// The [`DecompositionParameters`] are consumed as follows:
/// - `concavity` is the VHACD concavity threshold;
/// - `n_clusters` is the minimum number of clusters. While VHACD produces fewer
///   hulls, it is run again with a tighter concavity, down to zero; the largest
///   hulls are then cut in halves until the minimum is reached;
/// - `max_verts_per_hull` caps the number of vertices of every hull (`0`
///   disables the cap). Larger hulls are replaced by the hull of a subset of
///   their vertices;
/// - enabling either `add_extra_dist_points` or `add_faces_points` disables the
///   approximate hull computation used while selecting cutting planes;
/// - `small_cluster_threshold` flags the resulting clusters whose volume is below
///   that fraction of the total volume.
///
/// `connect_distance`, `target_decimated_triangle_count` and `volume_weight`
/// have no VHACD counterpart and are ignored.
///
/// If at most one cluster is requested and the mesh already fills its convex
/// hull up to `concavity` (relative volume error), the exact convex hull of the
/// input points is returned as the only cluster and VHACD is not run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct VhacdEngine {
    /// The voxelization resolution along the largest dimension of the mesh.
    pub resolution: u32,
}

impl Default for VhacdEngine {
    fn default() -> Self {
        Self { resolution: 64 }
    }
}

/// The concavity thresholds tried in turn until enough hulls are produced.
fn concavity_schedule(concavity: Real) -> Vec<Real> {
    let concavity = concavity.max(0.0);
    let mut schedule = vec![concavity, concavity / 10.0, concavity / 100.0];
    schedule.retain(|c| *c > 0.0);
    schedule.push(0.0);
    schedule
}

/// The exact convex hull of the input, if a single cluster is requested and the
/// mesh fills that hull up to `concavity`.
fn convex_input_hull(mesh: &Mesh, params: &DecompositionParameters) -> Option<Hull> {
    if params.n_clusters > 1 {
        return None;
    }

    let hull = match try_convex_hull(&mesh.points) {
        Ok(hull) => hull,
        Err(e) => {
            debug!("vhacd: no exact hull of the input ({e})");
            return None;
        }
    };

    let hull_volume = signed_volume(&hull.0, &hull.1).abs();
    let mesh_volume = signed_volume(&mesh.points, &mesh.triangles).abs();

    (hull_volume > 0.0 && (hull_volume - mesh_volume).abs() / hull_volume <= params.concavity)
        .then_some(hull)
}

/// Wraps hulls into clusters, flagging those below `small_cluster_threshold`
/// of the total volume.
fn into_clusters(hulls: Vec<Hull>, small_cluster_threshold: Real) -> Vec<ConvexHullCluster> {
    let volumes: Vec<Real> = hulls
        .iter()
        .map(|(points, triangles)| signed_volume(points, triangles).abs())
        .collect();
    let total_volume: Real = volumes.iter().sum();

    hulls
        .into_iter()
        .zip(volumes)
        .map(|((points, triangles), volume)| {
            let small = volume < small_cluster_threshold * total_volume;
            ConvexHullCluster::new(points, triangles, small)
        })
        .collect()
}

impl VhacdEngine {
    fn run_vhacd(&self, mesh: &Mesh, params: &DecompositionParameters, concavity: Real) -> Vec<Hull> {
        let vhacd_params = VHACDParameters {
            resolution: self.resolution,
            concavity,
            max_convex_hulls: params.n_clusters.max(1),
            convex_hull_approximation: !(params.add_extra_dist_points || params.add_faces_points),
            ..VHACDParameters::default()
        };

        debug!(
            "vhacd: decomposing {} triangles at resolution {}, concavity {}",
            mesh.triangles.len(),
            self.resolution,
            concavity
        );
        let decomp = VHACD::decompose(&vhacd_params, &mesh.points, &mesh.triangles, true);
        debug!("vhacd: {} voxel parts", decomp.voxel_parts().len());

        decomp
            .compute_exact_convex_hulls(&mesh.points, &mesh.triangles)
            .into_iter()
            .filter(|(_, triangles)| !triangles.is_empty())
            .collect()
    }

    fn compute_hulls(
        &self,
        mesh: &Mesh,
        params: &DecompositionParameters,
    ) -> Result<Vec<Hull>, EngineError> {
        let min_clusters = params.n_clusters.max(1) as usize;

        let mut hulls = if let Some(hull) = convex_input_hull(mesh, params) {
            debug!("vhacd: input is convex enough, skipping the decomposition");
            vec![hull]
        } else {
            let mut hulls = vec![];
            for concavity in concavity_schedule(params.concavity) {
                hulls = self.run_vhacd(mesh, params, concavity);
                if hulls.len() >= min_clusters {
                    break;
                }
            }
            hulls
        };
        debug!("vhacd: {} convex hulls", hulls.len());

        if !hulls.is_empty() && hulls.len() < min_clusters {
            if !split_until(&mut hulls, min_clusters) {
                return Err(EngineError::TooFewClusters {
                    requested: min_clusters,
                    produced: hulls.len(),
                });
            }
            debug!("vhacd: split into {} convex hulls", hulls.len());
        }

        let budget = params.max_verts_per_hull as usize;
        if budget != 0 {
            hulls = hulls
                .into_iter()
                .map(|hull| {
                    let num_points = hull.0.len();
                    simplify_hull(hull, budget).ok_or(EngineError::VertexBudget {
                        budget,
                        num_points,
                    })
                })
                .collect::<Result<_, _>>()?;
        }

        Ok(hulls)
    }
}

impl DecompositionEngine for VhacdEngine {
    fn name(&self) -> &'static str {
        "vhacd"
    }

    fn compute(
        &mut self,
        mesh: &Mesh,
        params: &DecompositionParameters,
        arena: &mut SessionArena,
    ) -> Result<Vec<ConvexHullCluster>, EngineError> {
        if mesh.is_empty() {
            return Err(EngineError::EmptyMesh);
        }

        if let Some(triangle) = mesh.first_invalid_triangle() {
            return Err(EngineError::InvalidTriangle {
                triangle,
                num_points: mesh.points.len(),
            });
        }

        let hulls = panic::catch_unwind(AssertUnwindSafe(|| self.compute_hulls(mesh, params)))
            .map_err(|payload| EngineError::Panicked(panic_message(&*payload)))??;
        let clusters = into_clusters(hulls, params.small_cluster_threshold);

        for cluster in &clusters {
            arena.charge(cluster.storage_bytes())?;
        }

        Ok(clusters)
    }
}
