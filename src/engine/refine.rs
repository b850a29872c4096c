//! Post-processing of convex hulls: axis splits and vertex budget reduction.

use crate::cluster::signed_volume;
use crate::math::{Point, Real, Triangle, Vector, DIM};
use parry3d::transformation::try_convex_hull;

/// A convex hull as produced by the engine: its points and triangles.
pub(crate) type Hull = (Vec<Point>, Vec<Triangle>);

/// Cuts a convex hull in two halves by the plane orthogonal to its longest
/// extent, through the middle of its bounding box.
///
/// Returns `None` if the hull is flat along every axis or if either half is
/// degenerate.
pub(crate) fn split_hull(hull: &Hull) -> Option<(Hull, Hull)> {
    let (points, triangles) = hull;
    let first = points.first()?;
    let (mins, maxs) = points
        .iter()
        .fold((*first, *first), |(mins, maxs), pt| (mins.inf(pt), maxs.sup(pt)));
    let extents = maxs - mins;
    let axis = extents.imax();

    if extents[axis] <= 0.0 {
        return None;
    }

    let bias = (mins[axis] + maxs[axis]) / 2.0;
    let epsilon = extents[axis] * 1.0e-5;
    let mut negative = vec![];
    let mut positive = vec![];

    // Points on the plane belong to both halves.
    for pt in points {
        let dist_to_plane = pt[axis] - bias;
        if dist_to_plane <= epsilon {
            negative.push(*pt);
        }
        if dist_to_plane >= -epsilon {
            positive.push(*pt);
        }
    }

    // Each edge of a closed hull appears once in each direction.
    for tri in triangles {
        for k in 0..DIM {
            let (ia, ib) = (tri[k], tri[(k + 1) % DIM]);
            if ia > ib {
                continue;
            }

            let a = points[ia as usize];
            let b = points[ib as usize];
            let (da, db) = (a[axis] - bias, b[axis] - bias);

            if (da < -epsilon && db > epsilon) || (da > epsilon && db < -epsilon) {
                let intersection = a + (b - a) * (da / (da - db));
                negative.push(intersection);
                positive.push(intersection);
            }
        }
    }

    let negative = try_convex_hull(&negative).ok()?;
    let positive = try_convex_hull(&positive).ok()?;
    Some((negative, positive))
}

/// Splits the largest hulls of `hulls` until there are at least `count` of them.
///
/// Returns `false` if a hull that had to be split could not be.
pub(crate) fn split_until(hulls: &mut Vec<Hull>, count: usize) -> bool {
    while hulls.len() < count {
        let Some((largest, _)) = hulls
            .iter()
            .enumerate()
            .map(|(i, (pts, tris))| (i, signed_volume(pts, tris).abs()))
            .max_by(|a, b| a.1.total_cmp(&b.1))
        else {
            return false;
        };

        match split_hull(&hulls[largest]) {
            Some((negative, positive)) => {
                hulls[largest] = negative;
                hulls.push(positive);
            }
            None => return false,
        }
    }

    true
}

/// Reduces a hull to at most `max_points` vertices.
///
/// The kept vertices are picked by farthest-point sampling, starting from the
/// vertex farthest from the centroid, and the result is their convex hull: it
/// is contained in the original hull. Returns `None` if `max_points` is below
/// the four vertices of a tetrahedron or if the kept vertices are degenerate.
pub(crate) fn simplify_hull(hull: Hull, max_points: usize) -> Option<Hull> {
    let points = &hull.0;
    if points.len() <= max_points {
        return Some(hull);
    }

    if max_points < 4 {
        return None;
    }

    let centroid = Point::from(
        points.iter().map(|pt| pt.coords).sum::<Vector>() / points.len() as Real,
    );
    let first = farthest(points.iter().map(|pt| na::distance_squared(pt, &centroid)))?;

    let mut kept = vec![points[first]];
    let mut dist_to_kept: Vec<Real> = points
        .iter()
        .map(|pt| na::distance_squared(pt, &points[first]))
        .collect();

    while kept.len() < max_points {
        let next = farthest(dist_to_kept.iter().copied())?;
        if dist_to_kept[next] <= 0.0 {
            break;
        }

        kept.push(points[next]);
        for (dist, pt) in dist_to_kept.iter_mut().zip(points) {
            *dist = dist.min(na::distance_squared(pt, &points[next]));
        }
    }

    let simplified = try_convex_hull(&kept).ok()?;
    (simplified.0.len() <= max_points).then_some(simplified)
}

fn farthest(distances: impl Iterator<Item = Real>) -> Option<usize> {
    distances
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
