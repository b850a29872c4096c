//! The convex decomposition capability.
//!
//! A [`DecompositionEngine`] turns a [`Mesh`] into a set of
//! [`ConvexHullCluster`]. This crate never looks inside the algorithm: it only
//! forwards the mesh and the [`DecompositionParameters`], and owns whatever
//! the engine returns.

pub use self::vhacd_engine::VhacdEngine;

use crate::arena::{ArenaError, SessionArena};
use crate::cluster::ConvexHullCluster;
use crate::geometry::Mesh;
use crate::parameters::DecompositionParameters;

mod refine;
mod vhacd_engine;

/// Indicates that an engine could not compute a decomposition.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum EngineError {
    /// The mesh has no point or no triangle.
    #[error("Cannot decompose an empty mesh.")]
    EmptyMesh,
    /// A triangle references a point that does not exist.
    #[error("Triangle {triangle} references a point out of the range [0, {num_points}).")]
    InvalidTriangle {
        /// The index of the faulty triangle.
        triangle: usize,
        /// The number of points of the mesh.
        num_points: usize,
    },
    /// The geometry is too degenerate to compute a convex hull.
    #[error("Degenerate geometry: {0}")]
    Degenerate(String),
    /// Fewer clusters than the requested minimum could be produced.
    #[error("Only {produced} clusters could be produced, {requested} requested.")]
    TooFewClusters {
        /// The minimum number of clusters requested.
        requested: usize,
        /// The number of clusters the engine reached.
        produced: usize,
    },
    /// A hull could not be reduced to the vertex budget.
    #[error("A hull with {num_points} vertices cannot be reduced to {budget} vertices.")]
    VertexBudget {
        /// The maximum number of vertices per hull.
        budget: usize,
        /// The number of vertices of the offending hull.
        num_points: usize,
    },
    /// The engine ran out of session memory.
    #[error(transparent)]
    Arena(#[from] ArenaError),
    /// The engine panicked while computing.
    #[error("The decomposition engine panicked: {0}")]
    Panicked(String),
}

/// An approximate convex decomposition algorithm.
///
/// Each session gets its own engine instance, cloned from the prototype held
/// by the [`Decomposer`](crate::Decomposer): implementations need not be
/// thread-safe, and no two sessions ever share an instance.
pub trait DecompositionEngine: Clone {
    /// A short name identifying this engine in logs.
    fn name(&self) -> &'static str;

    /// Decomposes `mesh` into convex hull clusters.
    ///
    /// Storage kept for the result must be charged to `arena`. The parameters
    /// are received exactly as the caller gave them.
    fn compute(
        &mut self,
        mesh: &Mesh,
        params: &DecompositionParameters,
        arena: &mut SessionArena,
    ) -> Result<Vec<ConvexHullCluster>, EngineError>;
}

/// Extracts a printable message out of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
