/*!
decomp3d
========

**decomp3d** exposes 3D approximate convex decomposition through a
session-based, flat-array call boundary.

A host hands over a triangle mesh as two flat arrays (interleaved `x, y, z`
coordinates and interleaved `i0, i1, i2` triangle indices). The mesh is
decomposed by a [`DecompositionEngine`](engine::DecompositionEngine) and the
resulting convex hull clusters are kept alive in a session until the host has
copied them into its own buffers and releases the session.

```
use decomp3d::{Decomposer, DecompositionParameters};

let verts = [
    0.0, 0.0, 0.0, //
    1.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, //
    0.0, 0.0, 1.0,
];
let indices = [0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];

let mut decomposer = Decomposer::default();
let params = DecompositionParameters::default().with_n_clusters(1);
let session = decomposer.decompose(&verts, &indices, &params).unwrap();

let num_hulls = decomposer.convex_hull_count(&session).unwrap();
for i in 0..num_hulls {
    let mut hull_verts = vec![0.0; decomposer.vertex_count(&session, i).unwrap()];
    let mut hull_indices = vec![0; decomposer.index_count(&session, i).unwrap()];
    decomposer
        .convex_verts_and_indexes(&session, i, &mut hull_verts, &mut hull_indices)
        .unwrap();
}

decomposer.free(session);
```
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(clippy::too_many_arguments)] // The flat boundary mirrors a fixed C signature.
#![deny(unused_qualifications)]

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub extern crate nalgebra as na;
pub extern crate parry3d;

pub use self::accessor::AccessError;
pub use self::arena::{ArenaCapacity, ArenaError, SessionArena};
pub use self::cluster::{ConvexHull, ConvexHullCluster};
pub use self::decomposer::{DecomposerConfig, Decomposer, DecompositionError};
pub use self::engine::{DecompositionEngine, EngineError, VhacdEngine};
pub use self::geometry::{marshal_mesh, MarshalError, Mesh};
pub use self::parameters::{DecompositionParameters, COMPACITY_WEIGHT};
pub use self::registry::{RawSessionHandle, SessionHandle, SessionRegistry, NULL_SESSION};
pub use self::session::DecompositionSession;

mod accessor;
pub mod arena;
#[cfg(feature = "capi")]
pub mod capi;
mod cluster;
mod decomposer;
pub mod engine;
mod flat;
pub mod geometry;
pub mod off;
mod parameters;
pub mod registry;
mod session;

/// Aliases for the mathematical types used by this crate.
pub mod math {
    pub use na::{Point3, Vector3};

    /// The scalar type used throughout this crate.
    pub type Real = f32;

    /// The point type.
    pub type Point = Point3<Real>;

    /// The vector type.
    pub type Vector = Vector3<Real>;

    /// A triangle, as three indices into a point buffer.
    pub type Triangle = [u32; 3];

    /// The number of flat components per point and per triangle.
    pub const DIM: usize = 3;
}
