//! Conversion of flat coordinate and index arrays into structured meshes.

use crate::math::{Point, Real, Triangle, DIM};

/// Indicates a malformed flat array given to the marshaller.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarshalError {
    /// The number of vertex components is not a multiple of three.
    #[error("The vertex component count {0} is not a multiple of 3.")]
    VertexCountNotMultipleOfThree(usize),
    /// The number of index components is not a multiple of three.
    #[error("The index component count {0} is not a multiple of 3.")]
    IndexCountNotMultipleOfThree(usize),
    /// A declared component count is larger than the buffer it describes.
    #[error("The declared component count {declared} exceeds the buffer length {available}.")]
    CountExceedsBuffer {
        /// The number of components the caller declared.
        declared: usize,
        /// The number of components actually provided.
        available: usize,
    },
    /// A declared component count is negative.
    #[error("The declared component count {0} is negative.")]
    NegativeCount(i64),
}

/// A triangle mesh, input of a convex decomposition.
///
/// The marshaller does not check that triangle indices lie in
/// `[0, points.len())`: that is left to the engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// The vertices of this mesh.
    pub points: Vec<Point>,
    /// The triangles of this mesh, as indices into `self.points`.
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// Creates a mesh from already structured points and triangles.
    pub fn new(points: Vec<Point>, triangles: Vec<Triangle>) -> Self {
        Self { points, triangles }
    }

    /// Builds a mesh from the whole content of two flat arrays.
    ///
    /// Fails if either length is not a multiple of three.
    pub fn from_flat(verts: &[Real], indices: &[u32]) -> Result<Self, MarshalError> {
        marshal_mesh(verts, verts.len(), indices, indices.len())
    }

    /// Is this mesh empty (no points or no triangles)?
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() || self.triangles.is_empty()
    }

    /// Number of bytes used by the points and triangles of this mesh.
    pub fn storage_bytes(&self) -> usize {
        self.points.len() * size_of::<Point>() + self.triangles.len() * size_of::<Triangle>()
    }

    /// Returns the index of the first triangle referencing a point out of range, if any.
    pub fn first_invalid_triangle(&self) -> Option<usize> {
        let num_points = self.points.len();
        self.triangles
            .iter()
            .position(|tri| tri.iter().any(|i| *i as usize >= num_points))
    }
}

/// Groups the first `vert_count` coordinates of `verts` into points and the
/// first `index_count` indices of `indices` into triangles.
///
/// Consecutive triples are grouped in array order. Trailing components are
/// never dropped silently: a count that isn't a multiple of three is an error.
pub fn marshal_mesh(
    verts: &[Real],
    vert_count: usize,
    indices: &[u32],
    index_count: usize,
) -> Result<Mesh, MarshalError> {
    if vert_count % DIM != 0 {
        return Err(MarshalError::VertexCountNotMultipleOfThree(vert_count));
    }

    if index_count % DIM != 0 {
        return Err(MarshalError::IndexCountNotMultipleOfThree(index_count));
    }

    let verts = verts
        .get(..vert_count)
        .ok_or(MarshalError::CountExceedsBuffer {
            declared: vert_count,
            available: verts.len(),
        })?;
    let indices = indices
        .get(..index_count)
        .ok_or(MarshalError::CountExceedsBuffer {
            declared: index_count,
            available: indices.len(),
        })?;

    let points = verts
        .chunks_exact(DIM)
        .map(|c| Point::new(c[0], c[1], c[2]))
        .collect();
    let triangles = indices
        .chunks_exact(DIM)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    Ok(Mesh { points, triangles })
}

#[cfg(test)]
mod test {
    use super::{marshal_mesh, MarshalError, Mesh};
    use crate::math::Point;

    #[test]
    fn groups_consecutive_triples() {
        let verts = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let mesh = Mesh::from_flat(&verts, &[0, 1, 2]).unwrap();

        assert_eq!(
            mesh.points,
            vec![
                Point::new(0.0, 1.0, 2.0),
                Point::new(3.0, 4.0, 5.0),
                Point::new(6.0, 7.0, 8.0)
            ]
        );
        assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn rejects_partial_triples() {
        assert_eq!(
            Mesh::from_flat(&[0.0; 10], &[0, 1, 2]),
            Err(MarshalError::VertexCountNotMultipleOfThree(10))
        );
        assert_eq!(
            Mesh::from_flat(&[0.0; 9], &[0, 1, 2, 0]),
            Err(MarshalError::IndexCountNotMultipleOfThree(4))
        );
    }

    #[test]
    fn reads_only_the_declared_prefix() {
        let verts = [1.0; 12];
        let mesh = marshal_mesh(&verts, 6, &[0, 1, 1, 9, 9, 9], 3).unwrap();
        assert_eq!(mesh.points.len(), 2);
        assert_eq!(mesh.triangles, vec![[0, 1, 1]]);

        assert_eq!(
            marshal_mesh(&verts, 15, &[], 0),
            Err(MarshalError::CountExceedsBuffer {
                declared: 15,
                available: 12
            })
        );
    }

    #[test]
    fn out_of_range_indices_pass_through() {
        let mesh = Mesh::from_flat(&[0.0; 9], &[0, 1, 7]).unwrap();
        assert_eq!(mesh.triangles, vec![[0, 1, 7]]);
        assert_eq!(mesh.first_invalid_triangle(), Some(0));
    }
}
