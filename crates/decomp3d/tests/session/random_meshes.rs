use decomp3d::math::Point;
use decomp3d::parry3d::transformation::try_convex_hull;
use decomp3d::{Decomposer, DecompositionParameters, Mesh};

/// A closed convex mesh built from a random point cloud in `[-1, 1]^3`.
fn random_convex_mesh(rng: &mut oorandom::Rand32, num_points: usize) -> Mesh {
    let points: Vec<Point> = (0..num_points)
        .map(|_| {
            Point::new(
                rng.rand_float() * 2.0 - 1.0,
                rng.rand_float() * 2.0 - 1.0,
                rng.rand_float() * 2.0 - 1.0,
            )
        })
        .collect();
    let (points, triangles) = try_convex_hull(&points).unwrap();
    Mesh::new(points, triangles)
}

/// An L-shaped prism: the L polygon `(0,0) (2,0) (2,1) (1,1) (1,2) (0,2)`
/// extruded from `z = 0` to `z = 1`.
fn l_prism() -> Mesh {
    let outline = [
        [0.0, 0.0],
        [2.0, 0.0],
        [2.0, 1.0],
        [1.0, 1.0],
        [1.0, 2.0],
        [0.0, 2.0],
    ];
    let n = outline.len() as u32;
    let mut points: Vec<Point> = outline.iter().map(|p| Point::new(p[0], p[1], 0.0)).collect();
    points.extend(outline.iter().map(|p| Point::new(p[0], p[1], 1.0)));

    let mut triangles = vec![];
    // The L is star-shaped from its first corner: both caps are fans.
    for i in 1..n - 1 {
        triangles.push([0, i + 1, i]);
        triangles.push([n, n + i, n + i + 1]);
    }
    for i in 0..n {
        let j = (i + 1) % n;
        triangles.push([i, j, n + j]);
        triangles.push([i, n + j, n + i]);
    }

    Mesh::new(points, triangles)
}

fn flat_indices(mesh: &Mesh) -> Vec<u32> {
    mesh.triangles.iter().flatten().copied().collect()
}

fn flat_verts(mesh: &Mesh) -> Vec<f32> {
    mesh.points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
}

/// Decomposes `mesh`, checks the shape of every resulting hull, and returns
/// the small flag of each cluster.
fn check_decomposition(mesh: &Mesh, params: &DecompositionParameters) -> Vec<bool> {
    let (mins, maxs) = mesh.points.iter().fold(
        (
            Point::new(f32::MAX, f32::MAX, f32::MAX),
            Point::new(f32::MIN, f32::MIN, f32::MIN),
        ),
        |(mins, maxs), p| (mins.inf(p), maxs.sup(p)),
    );

    let mut decomposer = Decomposer::default();
    let session = decomposer
        .decompose(&flat_verts(mesh), &flat_indices(mesh), params)
        .unwrap();
    let num_hulls = decomposer.convex_hull_count(&session).unwrap();
    assert!(num_hulls >= params.n_clusters.max(1) as usize);
    let small_flags = (0..num_hulls)
        .map(|i| decomposer.cluster(&session, i).unwrap().is_small())
        .collect();

    for i in 0..num_hulls {
        let num_verts = decomposer.vertex_count(&session, i).unwrap();
        let num_indices = decomposer.index_count(&session, i).unwrap();
        assert_eq!(num_verts % 3, 0);
        assert_eq!(num_indices % 3, 0);
        assert!(num_verts > 0 && num_indices > 0);

        let mut verts = vec![0.0; num_verts];
        let mut indices = vec![0; num_indices];
        decomposer
            .convex_verts_and_indexes(&session, i, &mut verts, &mut indices)
            .unwrap();

        assert!(indices.iter().all(|id| (*id as usize) < num_verts / 3));
        // Hulls never leave the bounding box of the input.
        for pt in verts.chunks_exact(3) {
            assert!((0..3).all(|k| pt[k] >= mins[k] - 1.0e-3 && pt[k] <= maxs[k] + 1.0e-3));
        }
    }

    assert!(decomposer.free(session));
    small_flags
}

#[test]
fn random_convex_meshes() {
    let mut rng = oorandom::Rand32::new(42);

    for _ in 0..10 {
        let mesh = random_convex_mesh(&mut rng, 30);
        let params = DecompositionParameters::default().with_n_clusters(1);
        assert_eq!(check_decomposition(&mesh, &params).len(), 1);
    }
}

#[test]
fn random_convex_meshes_through_vhacd() {
    let mut rng = oorandom::Rand32::new(1234);

    for _ in 0..3 {
        let mesh = random_convex_mesh(&mut rng, 50);
        let params = DecompositionParameters::default()
            .with_n_clusters(4)
            .with_concavity(0.01);
        assert!(check_decomposition(&mesh, &params).len() >= 4);
    }
}

#[test]
fn smaller_concavity_yields_more_hulls() {
    let mesh = l_prism();

    // The L fills 6/7 of its convex hull.
    let loose = DecompositionParameters::default()
        .with_n_clusters(1)
        .with_concavity(0.5);
    let tight = loose.with_concavity(0.01);

    let num_loose = check_decomposition(&mesh, &loose).len();
    let num_tight = check_decomposition(&mesh, &tight).len();
    assert_eq!(num_loose, 1);
    assert!(num_tight > num_loose);
}

#[test]
fn cluster_count_is_a_lower_bound() {
    let mesh = l_prism();

    for n_clusters in [2, 4, 8] {
        let params = DecompositionParameters::default()
            .with_n_clusters(n_clusters)
            .with_concavity(10.0);
        assert!(check_decomposition(&mesh, &params).len() >= n_clusters as usize);
    }
}

#[test]
fn small_clusters_follow_the_threshold() {
    let mesh = l_prism();
    let params = DecompositionParameters::default()
        .with_n_clusters(4)
        .with_concavity(0.001);

    // Every cluster of a multi-cluster result is below the total volume.
    let small_flags = check_decomposition(&mesh, &params.with_small_cluster_threshold(1.0));
    assert!(small_flags.len() >= 4);
    assert!(small_flags.iter().all(|small| *small));

    let small_flags = check_decomposition(&mesh, &params.with_small_cluster_threshold(0.0));
    assert!(small_flags.iter().all(|small| !*small));
}
