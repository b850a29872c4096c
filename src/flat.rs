//! The flat, sentinel-based session boundary.
//!
//! These entry points mirror the fixed signatures of the C boundary: `i32`
//! counts and indices, raw `u64` session handles, and no error values. Any
//! failure collapses to a sentinel ([`NULL_SESSION`], `-1`, or `false`) and its
//! cause is only reported through the `log` facade.

use crate::decomposer::{Decomposer, DecompositionError};
use crate::engine::DecompositionEngine;
use crate::geometry::{marshal_mesh, MarshalError, Mesh};
use crate::math::Real;
use crate::parameters::DecompositionParameters;
use crate::registry::{RawSessionHandle, SessionHandle, SessionRegistry, NULL_SESSION};
use crate::AccessError;
use log::warn;

/// Marshals flat input arrays received with signed counts.
///
/// Negative triangle indices are reinterpreted as unsigned values, which puts
/// them out of range: the engine rejects them.
pub(crate) fn marshal_flat(
    verts: &[Real],
    indices: &[i32],
    vert_count: i32,
    index_count: i32,
) -> Result<Mesh, MarshalError> {
    let vert_count = usize::try_from(vert_count)
        .map_err(|_| MarshalError::NegativeCount(vert_count as i64))?;
    let index_count = usize::try_from(index_count)
        .map_err(|_| MarshalError::NegativeCount(index_count as i64))?;
    let indices: &[u32] = bytemuck::cast_slice(indices);
    marshal_mesh(verts, vert_count, indices, index_count)
}

/// Builds the decomposition parameters from the flat argument list.
///
/// Negative integer parameters are read as zero.
pub(crate) fn flat_params(
    cc_connect_dist: Real,
    n_clusters: i32,
    concavity: Real,
    target_n_triangles_decimated_mesh: i32,
    max_verts_per_ch: i32,
    add_extra_dist_points: bool,
    add_faces_points: bool,
    volume_weight: Real,
    small_cluster_threshold: Real,
) -> DecompositionParameters {
    let unsigned = |val: i32| u32::try_from(val).unwrap_or(0);

    DecompositionParameters {
        concavity,
        n_clusters: unsigned(n_clusters),
        max_verts_per_hull: unsigned(max_verts_per_ch),
        connect_distance: cc_connect_dist,
        target_decimated_triangle_count: unsigned(target_n_triangles_decimated_mesh),
        volume_weight,
        small_cluster_threshold,
        add_extra_dist_points,
        add_faces_points,
    }
}

fn flat_count(count: Result<usize, AccessError>) -> i32 {
    match count {
        Ok(count) => i32::try_from(count).unwrap_or(-1),
        Err(e) => {
            warn!("flat boundary: {e}");
            -1
        }
    }
}

fn flat_index(convex_index: i32) -> usize {
    // Negative indices become out of range.
    usize::try_from(convex_index).unwrap_or(usize::MAX)
}

impl<E> SessionRegistry<E> {
    fn lookup(&self, session: RawSessionHandle) -> Result<SessionHandle, AccessError> {
        SessionHandle::from_raw(session).ok_or(AccessError::DeadSession)
    }

    /// The number of clusters of a session, or `-1` if the handle is dead.
    pub fn get_convex_hull_count(&self, session: RawSessionHandle) -> i32 {
        flat_count(
            self.lookup(session)
                .and_then(|handle| self.convex_hull_count(&handle)),
        )
    }

    /// Three times the number of points of a cluster, or `-1` on failure.
    pub fn get_vertex_count(&self, session: RawSessionHandle, convex_index: i32) -> i32 {
        flat_count(
            self.lookup(session)
                .and_then(|handle| self.vertex_count(&handle, flat_index(convex_index))),
        )
    }

    /// Three times the number of triangles of a cluster, or `-1` on failure.
    pub fn get_index_count(&self, session: RawSessionHandle, convex_index: i32) -> i32 {
        flat_count(
            self.lookup(session)
                .and_then(|handle| self.index_count(&handle, flat_index(convex_index))),
        )
    }

    /// Copies a cluster into caller buffers; `false` on failure, with both
    /// buffers left untouched.
    pub fn get_convex_verts_and_indexes(
        &self,
        session: RawSessionHandle,
        convex_index: i32,
        verts: &mut [Real],
        indexes: &mut [i32],
    ) -> bool {
        let result = self.lookup(session).and_then(|handle| {
            // Triangle indices are bounded by the point count of the cluster,
            // itself bounded by the `i32` vertex count: they fit in an `i32`.
            let indexes: &mut [u32] = bytemuck::cast_slice_mut(indexes);
            self.convex_verts_and_indexes(&handle, flat_index(convex_index), verts, indexes)
        });

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("flat boundary: {e}");
                false
            }
        }
    }

    /// Releases a session; `false` if the handle is null, unknown, or already freed.
    pub fn free_session(&mut self, session: RawSessionHandle) -> bool {
        match SessionHandle::from_raw(session).and_then(|handle| self.remove(handle)) {
            Some(session) => {
                drop(session);
                true
            }
            None => {
                warn!("flat boundary: freeing the dead session handle {session:#x}");
                false
            }
        }
    }
}

impl<E: DecompositionEngine> Decomposer<E> {
    /// Decomposes a mesh given as flat arrays, with the fixed boundary
    /// argument order.
    ///
    /// Returns [`NULL_SESSION`] on failure, in which case nothing is left
    /// allocated.
    pub fn decompose_flat(
        &mut self,
        verts: &[Real],
        indices: &[i32],
        vert_count: i32,
        index_count: i32,
        cc_connect_dist: Real,
        n_clusters: i32,
        concavity: Real,
        target_n_triangles_decimated_mesh: i32,
        max_verts_per_ch: i32,
        add_extra_dist_points: bool,
        add_faces_points: bool,
        volume_weight: Real,
        small_cluster_threshold: Real,
    ) -> RawSessionHandle {
        let params = flat_params(
            cc_connect_dist,
            n_clusters,
            concavity,
            target_n_triangles_decimated_mesh,
            max_verts_per_ch,
            add_extra_dist_points,
            add_faces_points,
            volume_weight,
            small_cluster_threshold,
        );

        let result = marshal_flat(verts, indices, vert_count, index_count)
            .map_err(DecompositionError::from)
            .and_then(|mesh| self.decompose_mesh(&mesh, &params));

        match result {
            Ok(handle) => handle.into_raw(),
            Err(e) => {
                warn!("flat boundary: {e}");
                NULL_SESSION
            }
        }
    }

    /// See [`SessionRegistry::get_convex_hull_count`].
    pub fn get_convex_hull_count(&self, session: RawSessionHandle) -> i32 {
        self.sessions.get_convex_hull_count(session)
    }

    /// See [`SessionRegistry::get_vertex_count`].
    pub fn get_vertex_count(&self, session: RawSessionHandle, convex_index: i32) -> i32 {
        self.sessions.get_vertex_count(session, convex_index)
    }

    /// See [`SessionRegistry::get_index_count`].
    pub fn get_index_count(&self, session: RawSessionHandle, convex_index: i32) -> i32 {
        self.sessions.get_index_count(session, convex_index)
    }

    /// See [`SessionRegistry::get_convex_verts_and_indexes`].
    pub fn get_convex_verts_and_indexes(
        &self,
        session: RawSessionHandle,
        convex_index: i32,
        verts: &mut [Real],
        indexes: &mut [i32],
    ) -> bool {
        self.sessions
            .get_convex_verts_and_indexes(session, convex_index, verts, indexes)
    }

    /// See [`SessionRegistry::free_session`].
    pub fn free_session(&mut self, session: RawSessionHandle) -> bool {
        self.sessions.free_session(session)
    }
}
