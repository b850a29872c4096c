//! `extern "C"` exports of the flat session boundary.
//!
//! Sessions created through this module live in a process-wide registry and
//! always use the default [`VhacdEngine`] and arena capacity. Every failure,
//! including a panic, is reported as a sentinel: the null handle, `-1`, or
//! `false`.
//!
//! # Safety
//!
//! Every pointer argument must either be null or point to at least as many
//! initialized elements as the associated count says. The output buffers
//! given to [`GetConvexVertsAndIndexes`] must hold at least as many elements
//! as reported by [`GetVertexCount`] and [`GetIndexCount`] for the same
//! cluster.

use crate::arena::ArenaCapacity;
use crate::engine::VhacdEngine;
use crate::flat::{flat_params, marshal_flat};
use crate::math::Real;
use crate::registry::{RawSessionHandle, SessionRegistry, NULL_SESSION};
use crate::session::DecompositionSession;
use crate::DecompositionError;
use log::{error, warn};
use std::panic::{self, AssertUnwindSafe};
use std::slice;
use std::sync::{Mutex, MutexGuard, OnceLock};

fn registry() -> MutexGuard<'static, SessionRegistry<VhacdEngine>> {
    static REGISTRY: OnceLock<Mutex<SessionRegistry<VhacdEngine>>> = OnceLock::new();
    REGISTRY
        .get_or_init(|| Mutex::new(SessionRegistry::new()))
        .lock()
        // A panic never leaves a registry half-updated.
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Runs `f`, replacing a panic by `sentinel`.
fn guarded<T>(entry_point: &str, sentinel: T, f: impl FnOnce() -> T) -> T {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            error!(
                "{entry_point}: panicked: {}",
                crate::engine::panic_message(&*payload)
            );
            sentinel
        }
    }
}

/// Builds a slice from a raw pointer, allowing null for empty slices.
unsafe fn input_slice<'a, T>(ptr: *const T, len: i32) -> Option<&'a [T]> {
    match usize::try_from(len) {
        Ok(0) | Err(_) => Some(&[]),
        Ok(_) if ptr.is_null() => None,
        Ok(len) => Some(slice::from_raw_parts(ptr, len)),
    }
}

/// Decomposes a mesh and returns the handle of the resulting session, or `0`.
///
/// # Safety
///
/// `verts` must point to `vert_count` floats and `indices` to `index_count`
/// integers.
#[export_name = "Decompose"]
pub unsafe extern "C" fn decompose(
    verts: *const Real,
    indices: *const i32,
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
    guarded("Decompose", NULL_SESSION, || {
        let (Some(verts), Some(indices)) = (
            input_slice(verts, vert_count),
            input_slice(indices, index_count),
        ) else {
            warn!("Decompose: null input array");
            return NULL_SESSION;
        };

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

        // The registry is only locked once the session exists.
        let session = marshal_flat(verts, indices, vert_count, index_count)
            .map_err(DecompositionError::from)
            .and_then(|mesh| {
                DecompositionSession::create(
                    VhacdEngine::default(),
                    &mesh,
                    &params,
                    ArenaCapacity::DEFAULT,
                )
            });

        match session {
            Ok(session) => registry().insert(session).into_raw(),
            Err(e) => {
                warn!("Decompose: {e}");
                NULL_SESSION
            }
        }
    })
}

/// The number of clusters of a session, or `-1` if the handle is dead.
#[export_name = "GetConvexHullCount"]
pub extern "C" fn get_convex_hull_count(session: RawSessionHandle) -> i32 {
    guarded("GetConvexHullCount", -1, || {
        registry().get_convex_hull_count(session)
    })
}

/// Three times the number of points of a cluster, or `-1` on failure.
#[export_name = "GetVertexCount"]
pub extern "C" fn get_vertex_count(session: RawSessionHandle, convex_index: i32) -> i32 {
    guarded("GetVertexCount", -1, || {
        registry().get_vertex_count(session, convex_index)
    })
}

/// Three times the number of triangles of a cluster, or `-1` on failure.
#[export_name = "GetIndexCount"]
pub extern "C" fn get_index_count(session: RawSessionHandle, convex_index: i32) -> i32 {
    guarded("GetIndexCount", -1, || {
        registry().get_index_count(session, convex_index)
    })
}

/// Copies a cluster into caller buffers; `false` on failure.
///
/// # Safety
///
/// `verts` and `indexes` must hold at least [`GetVertexCount`] and
/// [`GetIndexCount`] elements for this cluster.
#[export_name = "GetConvexVertsAndIndexes"]
pub unsafe extern "C" fn get_convex_verts_and_indexes(
    session: RawSessionHandle,
    convex_index: i32,
    verts: *mut Real,
    indexes: *mut i32,
) -> bool {
    guarded("GetConvexVertsAndIndexes", false, || {
        let registry = registry();
        let num_verts = registry.get_vertex_count(session, convex_index);
        let num_indexes = registry.get_index_count(session, convex_index);

        if num_verts < 0 || num_indexes < 0 {
            return false;
        }

        if verts.is_null() || indexes.is_null() {
            warn!("GetConvexVertsAndIndexes: null output buffer");
            return false;
        }

        let verts = slice::from_raw_parts_mut(verts, num_verts as usize);
        let indexes = slice::from_raw_parts_mut(indexes, num_indexes as usize);
        registry.get_convex_verts_and_indexes(session, convex_index, verts, indexes)
    })
}

/// Releases a session; `false` if the handle is null, unknown, or already freed.
#[export_name = "FreeSession"]
pub extern "C" fn free_session(session: RawSessionHandle) -> bool {
    guarded("FreeSession", false, || registry().free_session(session))
}
