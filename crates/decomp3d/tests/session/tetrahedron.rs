use decomp3d::math::Point;
use decomp3d::{Decomposer, DecompositionParameters, NULL_SESSION};

const VERTS: [f32; 12] = [
    0.0, 0.0, 0.0, //
    1.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, //
    0.0, 0.0, 1.0,
];
const INDICES: [u32; 12] = [0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3];

fn is_input_point(pt: &[f32]) -> bool {
    VERTS.chunks_exact(3).any(|input| input == pt)
}

#[test]
fn tetrahedron_is_its_own_hull() {
    let mut decomposer = Decomposer::default();
    let params = DecompositionParameters::default()
        .with_n_clusters(1)
        .with_concavity(1000.0);
    let session = decomposer.decompose(&VERTS, &INDICES, &params).unwrap();

    assert_eq!(decomposer.convex_hull_count(&session), Ok(1));
    assert_eq!(decomposer.vertex_count(&session, 0), Ok(12));
    let num_indices = decomposer.index_count(&session, 0).unwrap();
    assert!(num_indices > 0 && num_indices % 3 == 0);

    let mut verts = [0.0; 12];
    let mut indices = vec![0; num_indices];
    decomposer
        .convex_verts_and_indexes(&session, 0, &mut verts, &mut indices)
        .unwrap();

    assert!(verts.chunks_exact(3).all(is_input_point));
    // All four corners are kept.
    for input in VERTS.chunks_exact(3) {
        assert!(verts.chunks_exact(3).any(|pt| pt == input));
    }
    assert!(indices.iter().all(|i| *i < 4));

    let cluster = decomposer.cluster(&session, 0).unwrap();
    assert!(!cluster.is_small());
    assert_relative_eq!(cluster.volume(), 1.0 / 6.0, epsilon = 1.0e-6);
    assert!(cluster.points().contains(&Point::new(0.0, 0.0, 1.0)));

    assert!(decomposer.free(session));
    assert_eq!(decomposer.num_live_sessions(), 0);
}

#[test]
fn tetrahedron_through_the_flat_boundary() {
    let mut decomposer = Decomposer::default();
    let indices: Vec<i32> = INDICES.iter().map(|i| *i as i32).collect();
    let session = decomposer.decompose_flat(
        &VERTS, &indices, 12, 12, 30.0, 1, 1000.0, 1200, 100, true, true, 300.0, 0.16,
    );
    assert_ne!(session, NULL_SESSION);
    assert_eq!(decomposer.get_convex_hull_count(session), 1);
    assert_eq!(decomposer.get_vertex_count(session, 0), 12);

    let mut verts = [0.0; 12];
    let mut indexes = vec![-1; decomposer.get_index_count(session, 0) as usize];
    assert!(decomposer.get_convex_verts_and_indexes(session, 0, &mut verts, &mut indexes));
    assert!(verts.chunks_exact(3).all(is_input_point));
    assert!(indexes.iter().all(|i| (0..4).contains(i)));

    assert!(decomposer.free_session(session));
    assert_eq!(decomposer.get_convex_hull_count(session), -1);
}

#[test]
fn hulls_can_be_scaled_after_extraction() {
    let mut decomposer = Decomposer::default();
    let params = DecompositionParameters::sculpt().with_n_clusters(1);
    let mut hulls = decomposer
        .decompose_to_convex_hulls(&VERTS, &INDICES, &params)
        .unwrap();
    assert_eq!(decomposer.num_live_sessions(), 0);
    assert_eq!(hulls.len(), 1);

    hulls[0].scale(&decomp3d::math::Vector::new(2.0, 3.0, 4.0));
    for expected in [
        Point::origin(),
        Point::new(2.0, 0.0, 0.0),
        Point::new(0.0, 3.0, 0.0),
        Point::new(0.0, 0.0, 4.0),
    ] {
        assert!(hulls[0].vertices.contains(&expected));
    }
}
