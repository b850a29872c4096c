use decomp3d::{Decomposer, NULL_SESSION};

const CUBE_VERTS: [f32; 24] = [
    -1.0, -1.0, -1.0, //
    1.0, -1.0, -1.0, //
    1.0, 1.0, -1.0, //
    -1.0, 1.0, -1.0, //
    -1.0, -1.0, 1.0, //
    1.0, -1.0, 1.0, //
    1.0, 1.0, 1.0, //
    -1.0, 1.0, 1.0,
];
const CUBE_INDICES: [i32; 36] = [
    0, 2, 1, 0, 3, 2, //
    4, 5, 6, 4, 6, 7, //
    0, 1, 5, 0, 5, 4, //
    2, 3, 7, 2, 7, 6, //
    0, 4, 7, 0, 7, 3, //
    1, 2, 6, 1, 6, 5,
];

fn decompose_cube(decomposer: &mut Decomposer, vert_count: i32, index_count: i32) -> u64 {
    decomposer.decompose_flat(
        &CUBE_VERTS,
        &CUBE_INDICES,
        vert_count,
        index_count,
        30.0,
        1,
        10.0,
        1200,
        100,
        true,
        true,
        300.0,
        0.16,
    )
}

#[test]
fn counts_and_buffers() {
    let mut decomposer = Decomposer::default();
    let session = decompose_cube(&mut decomposer, 24, 36);
    assert_ne!(session, NULL_SESSION);

    let num_hulls = decomposer.get_convex_hull_count(session);
    assert!(num_hulls >= 1);

    for i in 0..num_hulls {
        let num_verts = decomposer.get_vertex_count(session, i);
        let num_indexes = decomposer.get_index_count(session, i);
        assert!(num_verts > 0 && num_verts % 3 == 0);
        assert!(num_indexes > 0 && num_indexes % 3 == 0);

        // Oversized buffers: only the front is written.
        let mut verts = vec![f32::NAN; num_verts as usize + 3];
        let mut indexes = vec![-7; num_indexes as usize + 3];
        assert!(decomposer.get_convex_verts_and_indexes(session, i, &mut verts, &mut indexes));

        let (written, tail) = verts.split_at(num_verts as usize);
        assert!(written.iter().all(|v| v.abs() <= 1.0));
        assert!(tail.iter().all(|v| v.is_nan()));

        let (written, tail) = indexes.split_at(num_indexes as usize);
        assert!(written.iter().all(|id| *id >= 0 && *id < num_verts / 3));
        assert_eq!(tail, &[-7, -7, -7]);

        // Undersized buffers are rejected without being touched.
        let mut short_verts = vec![5.0; num_verts as usize - 1];
        assert!(!decomposer.get_convex_verts_and_indexes(
            session,
            i,
            &mut short_verts,
            &mut indexes
        ));
        assert!(short_verts.iter().all(|v| *v == 5.0));
    }

    assert!(decomposer.free_session(session));
}

#[test]
fn declared_counts_limit_the_input() {
    let mut decomposer = Decomposer::default();

    assert_eq!(decompose_cube(&mut decomposer, 24, 37), NULL_SESSION);
    assert_eq!(decompose_cube(&mut decomposer, 25, 36), NULL_SESSION);
    assert_eq!(decompose_cube(&mut decomposer, 23, 36), NULL_SESSION);
    assert_eq!(decompose_cube(&mut decomposer, -24, 36), NULL_SESSION);
    assert_eq!(decompose_cube(&mut decomposer, 0, 0), NULL_SESSION);

    // Six points: the last two cube corners are out of range.
    assert_eq!(decompose_cube(&mut decomposer, 18, 36), NULL_SESSION);
    assert_eq!(decomposer.num_live_sessions(), 0);
}

#[test]
fn forged_handles_are_rejected() {
    let mut decomposer = Decomposer::default();
    let session = decompose_cube(&mut decomposer, 24, 36);
    let mut rng = oorandom::Rand64::new(42);
    let mut verts = vec![0.0; 64];
    let mut indexes = vec![0; 64];

    for _ in 0..1000 {
        let forged = rng.rand_u64();
        if forged == session {
            continue;
        }

        assert_eq!(decomposer.get_convex_hull_count(forged), -1);
        assert_eq!(decomposer.get_vertex_count(forged, 0), -1);
        assert_eq!(decomposer.get_index_count(forged, 0), -1);
        assert!(!decomposer.get_convex_verts_and_indexes(forged, 0, &mut verts, &mut indexes));
        assert!(!decomposer.free_session(forged));
    }

    assert_eq!(decomposer.num_live_sessions(), 1);
    assert!(decomposer.free_session(session));
}

#[test]
fn interleaved_sessions_are_independent() {
    let mut decomposer = Decomposer::default();
    let sessions: Vec<u64> = (0..4)
        .map(|_| decompose_cube(&mut decomposer, 24, 36))
        .collect();
    assert!(sessions.iter().all(|s| *s != NULL_SESSION));

    let counts: Vec<i32> = sessions
        .iter()
        .map(|s| decomposer.get_convex_hull_count(*s))
        .collect();

    assert!(decomposer.free_session(sessions[1]));
    assert!(decomposer.free_session(sessions[3]));

    assert_eq!(decomposer.get_convex_hull_count(sessions[0]), counts[0]);
    assert_eq!(decomposer.get_convex_hull_count(sessions[2]), counts[2]);
    assert_eq!(decomposer.get_convex_hull_count(sessions[1]), -1);
    assert_eq!(decomposer.get_convex_hull_count(sessions[3]), -1);

    assert!(decomposer.free_session(sessions[0]));
    assert!(decomposer.free_session(sessions[2]));
    assert_eq!(decomposer.num_live_sessions(), 0);
}
