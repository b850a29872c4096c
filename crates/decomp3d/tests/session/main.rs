#[macro_use]
extern crate approx;

mod flat_boundary;
mod random_meshes;
mod tetrahedron;
