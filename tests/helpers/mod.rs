//! Shared helpers for the integration tests.
#![allow(dead_code)]

use quadedge::prelude::*;

/// Signed-area-free absolute area of a triangle.
pub fn triangle_area([a, b, c]: [Point; 3]) -> f64 {
    ((b - a).cross(c - a) / 2.0).abs()
}

/// Area of the convex hull of `points` (0 for degenerate sets), via the
/// monotone chain construction and the shoelace formula.
pub fn hull_area(points: &[Point]) -> f64 {
    let mut pts: Vec<Point> = points.to_vec();
    pts.sort_by(Point::cmp_xy);
    pts.dedup();
    if pts.len() < 3 {
        return 0.0;
    }

    let cross = |o: Point, a: Point, b: Point| (a - o).cross(b - o);

    let mut lower: Vec<Point> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Point> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    let hull: Vec<Point> = lower.into_iter().chain(upper).collect();
    if hull.len() < 3 {
        return 0.0;
    }

    let mut doubled = 0.0;
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        doubled += a.cross(b);
    }
    doubled.abs() / 2.0
}

/// Rewrites each triangle with its lexicographically smallest vertex first
/// (preserving orientation) and sorts the list, so two triangulations can
/// be compared structurally.
pub fn canonical_triangles(triangles: &[[Point; 3]]) -> Vec<[Point; 3]> {
    let mut out: Vec<[Point; 3]> = triangles
        .iter()
        .map(|&[a, b, c]| {
            let rotations = [[a, b, c], [b, c, a], [c, a, b]];
            rotations
                .into_iter()
                .min_by(|x, y| Point::cmp_xy(&x[0], &y[0]))
                .unwrap()
        })
        .collect();
    out.sort_by(|x, y| {
        Point::cmp_xy(&x[0], &y[0])
            .then(Point::cmp_xy(&x[1], &y[1]))
            .then(Point::cmp_xy(&x[2], &y[2]))
    });
    out
}
