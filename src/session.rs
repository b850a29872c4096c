use crate::arena::{ArenaCapacity, SessionArena};
use crate::cluster::ConvexHullCluster;
use crate::decomposer::DecompositionError;
use crate::engine::DecompositionEngine;
use crate::geometry::Mesh;
use crate::parameters::DecompositionParameters;
use log::{debug, warn};

/// The result of one successful decomposition run.
///
/// A session owns the engine instance that computed it, the resulting
/// clusters and the arena they were charged to. It always holds at least one
/// cluster. Dropping it releases the engine, the clusters and the arena, in
/// that order.
#[derive(Debug)]
pub struct DecompositionSession<E> {
    // NOTE: fields are dropped in declaration order.
    engine: E,
    clusters: Vec<ConvexHullCluster>,
    arena: SessionArena,
    params: DecompositionParameters,
}

impl<E: DecompositionEngine> DecompositionSession<E> {
    /// Runs `engine` on `mesh` inside a fresh arena of the given capacity.
    ///
    /// On failure the engine and the arena are dropped before returning, so a
    /// failed run leaves nothing behind.
    pub fn create(
        mut engine: E,
        mesh: &Mesh,
        params: &DecompositionParameters,
        capacity: ArenaCapacity,
    ) -> Result<Self, DecompositionError> {
        let mut arena = SessionArena::new(capacity);
        arena.charge(mesh.storage_bytes())?;

        debug!(
            "{}: decomposing {} points, {} triangles",
            engine.name(),
            mesh.points.len(),
            mesh.triangles.len()
        );

        let clusters = match engine.compute(mesh, params, &mut arena) {
            Ok(clusters) if clusters.is_empty() => Err(DecompositionError::EmptyResult),
            Ok(clusters) => Ok(clusters),
            Err(e) => Err(e.into()),
        };

        match clusters {
            Ok(clusters) => {
                debug!(
                    "{}: {} clusters, {}/{} arena bytes",
                    engine.name(),
                    clusters.len(),
                    arena.used(),
                    capacity.bytes()
                );
                Ok(Self {
                    engine,
                    clusters,
                    arena,
                    params: *params,
                })
            }
            Err(e) => {
                warn!("{}: decomposition failed: {}", engine.name(), e);
                drop(engine);
                drop(arena);
                Err(e)
            }
        }
    }
}

impl<E> DecompositionSession<E> {
    /// The engine instance owned by this session.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The convex hull clusters, in the order the engine produced them.
    pub fn clusters(&self) -> &[ConvexHullCluster] {
        &self.clusters
    }

    /// The cluster at index `i`, if any.
    pub fn cluster(&self, i: usize) -> Option<&ConvexHullCluster> {
        self.clusters.get(i)
    }

    /// The number of clusters of this session.
    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// The arena of this session.
    pub fn arena(&self) -> &SessionArena {
        &self.arena
    }

    /// The parameters this session was computed with.
    pub fn params(&self) -> &DecompositionParameters {
        &self.params
    }
}
