//! Delaunay retriangulation of a constraint cavity.
//!
//! Deleting every edge a constraint crosses leaves two pseudo-polygons,
//! one on each side of the constraint, each running from the constraint's
//! start to its end. They must be filled with triangles again, and the fill
//! should be Delaunay *within the polygon* so that forcing a constraint
//! degrades the triangulation as little as possible.

use crate::geometry::point::Point;
use crate::geometry::predicates::point_in_circumcircle;

/// Triangulates the pseudo-polygon `points` = (start, v1, ..., vk, end)
/// and returns the edges of its triangulation.
///
/// For the base edge (first, last) the vertex picked as the triangle apex
/// is the one whose circumcircle with the base is empty of the remaining
/// polygon vertices; the two sub-chains on either side of the apex are
/// triangulated recursively. Every recursion level contributes its base
/// edge, so the output covers polygon sides, interior diagonals, and the
/// constraint chord itself. Callers tolerate edges that already exist.
///
/// # Examples
///
/// ```rust
/// use quadedge::core::pseudo_polygon::triangulate_pseudo_polygon;
/// use quadedge::geometry::point::Point;
///
/// let cavity = vec![
///     Point::new(0.0, 0.0),
///     Point::new(3.0, 2.0),
///     Point::new(6.0, 1.0),
///     Point::new(9.0, 0.0),
/// ];
/// let edges = triangulate_pseudo_polygon(&cavity);
/// // Two triangles: 5 distinct edges, each emitted once.
/// assert_eq!(edges.len(), 5);
/// ```
#[must_use]
pub fn triangulate_pseudo_polygon(points: &[Point]) -> Vec<[Point; 2]> {
    let mut edges = Vec::new();
    triangulate_chain(points, &mut edges);
    edges
}

fn triangulate_chain(chain: &[Point], edges: &mut Vec<[Point; 2]>) {
    match chain.len() {
        0 | 1 => return,
        2 => {
            edges.push([chain[0], chain[1]]);
            return;
        }
        _ => {}
    }

    let a = chain[0];
    let b = chain[chain.len() - 1];

    // Pick the apex whose circumcircle with the base edge is empty of the
    // other interior vertices.
    let mut apex = 1;
    for i in 2..chain.len() - 1 {
        if point_in_circumcircle(a, b, chain[apex], chain[i]) {
            apex = i;
        }
    }

    triangulate_chain(&chain[..=apex], edges);
    triangulate_chain(&chain[apex..], edges);
    edges.push([a, b]);
}
