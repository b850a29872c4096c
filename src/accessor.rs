//! Read-only queries on the clusters of a live session.
//!
//! Counts are expressed in flat components (three per point, three per
//! triangle), the unit callers must size their buffers with.

use crate::cluster::ConvexHullCluster;
use crate::decomposer::Decomposer;
use crate::engine::DecompositionEngine;
use crate::math::Real;
use crate::registry::{SessionHandle, SessionRegistry};

/// Indicates that cluster data could not be read from a session.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccessError {
    /// The handle does not reference a live session.
    #[error("The session handle does not reference a live session.")]
    DeadSession,
    /// The cluster index is not in `[0, num_clusters)`.
    #[error("Cluster index {index} out of the range [0, {num_clusters}).")]
    ClusterOutOfRange {
        /// The requested cluster index.
        index: usize,
        /// The number of clusters of the session.
        num_clusters: usize,
    },
    /// An output buffer is smaller than the data to write.
    #[error("Output buffer too small: {required} components required, {available} available.")]
    BufferTooSmall {
        /// The number of components to write.
        required: usize,
        /// The length of the buffer.
        available: usize,
    },
}

impl<E> SessionRegistry<E> {
    /// The cluster `i` of the session referenced by `handle`.
    pub fn cluster(&self, handle: &SessionHandle, i: usize) -> Result<&ConvexHullCluster, AccessError> {
        let session = self.get(handle).ok_or(AccessError::DeadSession)?;
        session.cluster(i).ok_or(AccessError::ClusterOutOfRange {
            index: i,
            num_clusters: session.num_clusters(),
        })
    }

    /// The number of clusters of the session referenced by `handle`.
    pub fn convex_hull_count(&self, handle: &SessionHandle) -> Result<usize, AccessError> {
        self.get(handle)
            .map(|session| session.num_clusters())
            .ok_or(AccessError::DeadSession)
    }

    /// Three times the number of points of the cluster `i`.
    pub fn vertex_count(&self, handle: &SessionHandle, i: usize) -> Result<usize, AccessError> {
        self.cluster(handle, i).map(|c| c.flat_vertex_count())
    }

    /// Three times the number of triangles of the cluster `i`.
    pub fn index_count(&self, handle: &SessionHandle, i: usize) -> Result<usize, AccessError> {
        self.cluster(handle, i).map(|c| c.flat_index_count())
    }

    /// Copies the interleaved coordinates and triangle indices of the cluster
    /// `i` into the front of `verts_out` and `indexes_out`.
    ///
    /// Exactly [`Self::vertex_count`] and [`Self::index_count`] values are
    /// written. On failure neither buffer is modified.
    pub fn convex_verts_and_indexes(
        &self,
        handle: &SessionHandle,
        i: usize,
        verts_out: &mut [Real],
        indexes_out: &mut [u32],
    ) -> Result<(), AccessError> {
        let cluster = self.cluster(handle, i)?;
        check_len(cluster.flat_vertex_count(), verts_out.len())?;
        check_len(cluster.flat_index_count(), indexes_out.len())?;
        cluster.write_flat(verts_out, indexes_out);
        Ok(())
    }
}

fn check_len(required: usize, available: usize) -> Result<(), AccessError> {
    if available < required {
        Err(AccessError::BufferTooSmall {
            required,
            available,
        })
    } else {
        Ok(())
    }
}

impl<E: DecompositionEngine> Decomposer<E> {
    /// The cluster `i` of the session referenced by `handle`.
    pub fn cluster(&self, handle: &SessionHandle, i: usize) -> Result<&ConvexHullCluster, AccessError> {
        self.sessions.cluster(handle, i)
    }

    /// The number of clusters of the session referenced by `handle`.
    pub fn convex_hull_count(&self, handle: &SessionHandle) -> Result<usize, AccessError> {
        self.sessions.convex_hull_count(handle)
    }

    /// Three times the number of points of the cluster `i`.
    pub fn vertex_count(&self, handle: &SessionHandle, i: usize) -> Result<usize, AccessError> {
        self.sessions.vertex_count(handle, i)
    }

    /// Three times the number of triangles of the cluster `i`.
    pub fn index_count(&self, handle: &SessionHandle, i: usize) -> Result<usize, AccessError> {
        self.sessions.index_count(handle, i)
    }

    /// Copies the cluster `i` into caller buffers.
    ///
    /// See [`SessionRegistry::convex_verts_and_indexes`].
    pub fn convex_verts_and_indexes(
        &self,
        handle: &SessionHandle,
        i: usize,
        verts_out: &mut [Real],
        indexes_out: &mut [u32],
    ) -> Result<(), AccessError> {
        self.sessions
            .convex_verts_and_indexes(handle, i, verts_out, indexes_out)
    }
}
