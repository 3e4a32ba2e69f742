//! Face views and the crossed-edge sweep used by constraint insertion.
//!
//! A [`Triangle`] is a face of the subdivision seen from one of its
//! bounding edges. Forcing a constraint segment through the mesh starts at
//! the triangle the segment enters from its origin vertex
//! ([`find_intersecting_triangle`]) and then marches triangle to triangle
//! across shared edges until the triangle containing the far endpoint is
//! reached, recording every edge crossed on the way
//! ([`intersecting_edges`]).

use log::error;

use crate::core::quadedge::{EdgeId, EdgePool};
use crate::core::subdivision::SubdivisionError;
use crate::core::walk::FaceRing;
use crate::geometry::classify::{classify, Classification};
use crate::geometry::point::Point;

/// A face of the subdivision, anchored at one of its bounding edges.
///
/// The face is the region to the *left* of the anchoring edge; the rest of
/// its boundary is recovered by following `lnext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    edge: EdgeId,
}

impl Triangle {
    /// Anchors a face at `edge`.
    #[must_use]
    pub const fn new(edge: EdgeId) -> Self {
        Self { edge }
    }

    /// The anchoring edge. Its origin is the pivot vertex the triangle was
    /// found from during a ring search.
    #[must_use]
    pub const fn starting_edge(&self) -> EdgeId {
        self.edge
    }

    /// Bounding edges of the face, starting at the anchor.
    #[must_use]
    pub fn ring(&self, pool: &EdgePool) -> FaceRing {
        let mut edges = FaceRing::new();
        let mut curr = self.edge;
        loop {
            edges.push(curr);
            curr = pool.lnext(curr);
            if curr == self.edge {
                break;
            }
        }
        edges
    }

    /// Origin vertices of the bounding edges, in ring order. Unbound
    /// origins are skipped.
    #[must_use]
    pub fn vertices(&self, pool: &EdgePool) -> Vec<Point> {
        self.ring(pool)
            .iter()
            .filter_map(|&e| pool.org(e))
            .collect()
    }

    /// True iff `p` lies in the closed face: not strictly right of any
    /// bounding edge. Boundary points count as contained.
    #[must_use]
    pub fn contains_point(&self, pool: &EdgePool, p: Point) -> bool {
        self.ring(pool).iter().all(|&e| !pool.right_of(p, e))
    }

    /// The face across the edge opposite vertex `p`.
    ///
    /// # Errors
    ///
    /// [`SubdivisionError::AssumptionFailed`] when `p` is not a vertex of
    /// this face — the sweep pivots only on vertices it just read off the
    /// face, so this indicates predicate inconsistency.
    pub fn opposite_triangle(
        &self,
        pool: &EdgePool,
        p: Point,
    ) -> Result<Triangle, SubdivisionError> {
        for &e in &self.ring(pool) {
            if pool.org(e) == Some(p) {
                return Ok(Triangle::new(pool.lnext(e).sym()));
            }
        }
        error!("vertex {p} is not part of the triangle it was meant to pivot on");
        Err(SubdivisionError::AssumptionFailed {
            what: "pivot vertex is not part of the triangle",
        })
    }

    /// The record in this face's ring whose `sym` bounds `other`, if the
    /// two faces are adjacent.
    #[must_use]
    pub fn shared_edge(&self, pool: &EdgePool, other: &Triangle) -> Option<EdgeId> {
        let other_ring = other.ring(pool);
        self.ring(pool)
            .into_iter()
            .find(|&e| other_ring.contains(&e.sym()))
    }

    /// The vertex of this face that `other` does not have.
    #[must_use]
    pub fn opposite_vertex(&self, pool: &EdgePool, other: &Triangle) -> Option<Point> {
        let other_vertices = other.vertices(pool);
        self.vertices(pool)
            .into_iter()
            .find(|v| !other_vertices.contains(v))
    }
}

/// Outcome of searching the origin ring of an edge for the triangle a
/// segment enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleSearch {
    /// The segment enters the interior of this triangle, or runs along its
    /// boundary toward the far endpoint.
    Found(Triangle),
    /// The segment leaves the pivot vertex along an existing edge in a way
    /// the left/right classification cannot separate (degeneracy at a
    /// vertex). The triangle is still the best candidate; constraint
    /// insertion treats this as recoverable.
    Coincident(Triangle),
    /// Every triangle around the pivot was rejected. For callers that know
    /// a triangle must exist, this is an assumption failure.
    NotFound,
}

impl TriangleSearch {
    /// The candidate triangle, for callers that tolerate coincidence.
    #[must_use]
    pub fn triangle(&self) -> Option<Triangle> {
        match *self {
            Self::Found(t) | Self::Coincident(t) => Some(t),
            Self::NotFound => None,
        }
    }
}

/// Finds the triangle incident to the origin of `from` whose interior the
/// segment from that origin to `end` enters.
///
/// Walks the origin ring clockwise, classifying `end` against each pair of
/// consecutive ring edges: the segment enters the wedge whose left edge has
/// `end` on its right and whose right edge has `end` on its left. A
/// classification that is collinear on both wedge edges reports
/// [`TriangleSearch::Coincident`].
#[must_use]
pub fn find_intersecting_triangle(pool: &EdgePool, from: EdgeId, end: Point) -> TriangleSearch {
    let mut left = from;

    loop {
        let right = pool.oprev(left);

        let (Some(l_org), Some(l_dest)) = (pool.org(left), pool.dest(left)) else {
            return TriangleSearch::NotFound;
        };
        let (Some(r_org), Some(r_dest)) = (pool.org(right), pool.dest(right)) else {
            return TriangleSearch::NotFound;
        };

        let lc = classify(end, l_org, l_dest);
        let rc = classify(end, r_org, r_dest);

        // The wedge between the rays of `left` and `right` is the left face
        // of `right`; the segment enters it when `end` is right of `left`
        // and left of `right`, or runs along `left` itself.
        if (lc == Classification::RIGHT && rc == Classification::LEFT)
            || lc == Classification::BETWEEN
            || lc == Classification::DESTINATION
            || lc == Classification::BEYOND
        {
            return TriangleSearch::Found(Triangle::new(right));
        }

        if lc != Classification::RIGHT
            && lc != Classification::LEFT
            && rc != Classification::RIGHT
            && rc != Classification::LEFT
        {
            return TriangleSearch::Coincident(Triangle::new(right));
        }

        left = right;
        if left == from {
            // Walked all the way around the vertex.
            return TriangleSearch::NotFound;
        }
    }
}

/// Collects, in crossing order, every edge the open segment from the origin
/// of `from` to `end` intersects.
///
/// Marches from the entry triangle across shared edges, steering by the
/// classification of each next triangle's opposite vertex against the
/// segment, until the current triangle contains `end`.
///
/// # Errors
///
/// - [`SubdivisionError::CoincidentEdges`] when the entry search hits a
///   degeneracy at the origin vertex.
/// - [`SubdivisionError::AssumptionFailed`] when no entry triangle exists,
///   the march loses adjacency, or it fails to terminate — all signals of
///   inconsistent predicates.
pub fn intersecting_edges(
    pool: &EdgePool,
    from: EdgeId,
    end: Point,
) -> Result<Vec<EdgeId>, SubdivisionError> {
    let Some(start) = pool.org(from) else {
        return Err(SubdivisionError::AssumptionFailed {
            what: "constraint origin has no vertex",
        });
    };

    let mut t = match find_intersecting_triangle(pool, from, end) {
        TriangleSearch::Found(t) => t,
        TriangleSearch::Coincident(_) => return Err(SubdivisionError::CoincidentEdges),
        TriangleSearch::NotFound => {
            error!("no triangle incident to {start} is entered by the segment toward {end}");
            return Err(SubdivisionError::AssumptionFailed {
                what: "no intersecting triangle at the constraint origin",
            });
        }
    };

    let mut intersected = Vec::new();
    let mut current_point = start;

    // Each crossing consumes one face; more crossings than quads means the
    // march is cycling on an inconsistent classification.
    let max_steps = pool.quad_count() + 1;

    for _ in 0..max_steps {
        if t.contains_point(pool, end) {
            return Ok(intersected);
        }

        let t_next = t.opposite_triangle(pool, current_point)?;
        let Some(shared) = t.shared_edge(pool, &t_next) else {
            error!("adjacent triangles share no edge during constraint sweep");
            return Err(SubdivisionError::AssumptionFailed {
                what: "no shared edge with the opposite triangle",
            });
        };
        let Some(p_next) = t_next.opposite_vertex(pool, &t) else {
            return Err(SubdivisionError::AssumptionFailed {
                what: "opposite triangle has no opposite vertex",
            });
        };

        match classify(p_next, start, end) {
            Classification::LEFT => {
                if let Some(org) = pool.org(shared) {
                    current_point = org;
                }
            }
            Classification::RIGHT => {
                if let Some(dest) = pool.dest(shared) {
                    current_point = dest;
                }
            }
            // Collinear: the segment passes through p_next itself; keep the
            // current pivot and let the next entry search resolve it.
            _ => {}
        }

        intersected.push(shared);
        t = t_next;
    }

    error!("constraint sweep toward {end} did not terminate");
    Err(SubdivisionError::AssumptionFailed {
        what: "constraint sweep did not terminate",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Quadrilateral a-b-c-d around the origin with the diagonal a-c,
    /// giving two triangles that share it.
    fn two_triangles() -> (EdgePool, EdgeId, EdgeId) {
        let mut pool = EdgePool::new();
        let a = Point::new(0.0, -1.0);
        let b = Point::new(1.0, 0.0);
        let c = Point::new(0.0, 1.0);
        let d = Point::new(-1.0, 0.0);

        let ab = pool.make_edge_with(a, b);
        let bc = pool.make_edge_with(b, c);
        pool.splice(ab.sym(), bc);
        let ca = pool.connect(bc, ab);
        // Second triangle a-c-d hanging off the far side of the diagonal.
        let cd = pool.make_edge_with(c, d);
        pool.splice(cd, bc.sym());
        let da = pool.connect(cd, ca.sym());
        debug_assert_eq!(pool.org(da), Some(d));
        debug_assert_eq!(pool.dest(da), Some(a));
        (pool, ab, ca)
    }

    #[test]
    fn ring_of_a_triangle_has_three_edges() {
        let (pool, ab, _) = two_triangles();
        let t = Triangle::new(ab);
        assert_eq!(t.ring(&pool).len(), 3);
        assert_eq!(t.vertices(&pool).len(), 3);
    }

    #[test]
    fn contains_point_is_closed() {
        let (pool, ab, _) = two_triangles();
        let t = Triangle::new(ab);
        // Interior of triangle a-b-c.
        assert!(t.contains_point(&pool, Point::new(0.2, 0.0)));
        // Vertices and edges are contained.
        assert!(t.contains_point(&pool, Point::new(0.0, -1.0)));
        assert!(t.contains_point(&pool, Point::new(0.5, -0.5)));
        // The far triangle's interior is not.
        assert!(!t.contains_point(&pool, Point::new(-0.5, 0.0)));
    }

    #[test]
    fn adjacent_triangles_share_the_diagonal() {
        let (pool, ab, ca) = two_triangles();
        let t1 = Triangle::new(ab);
        let t2 = Triangle::new(ca.sym());

        let shared = t1.shared_edge(&pool, &t2).unwrap();
        assert_eq!(shared, ca);

        // t2's vertex missing from t1 is d.
        assert_eq!(
            t2.opposite_vertex(&pool, &t1),
            Some(Point::new(-1.0, 0.0))
        );
    }

    #[test]
    fn opposite_triangle_crosses_the_shared_edge() {
        let (pool, ab, _) = two_triangles();
        let t1 = Triangle::new(ab);
        // Pivoting on b, the edge opposite b is the diagonal c-a; across it
        // lies the second triangle, which owns d.
        let t2 = t1.opposite_triangle(&pool, Point::new(1.0, 0.0)).unwrap();
        assert!(t2
            .vertices(&pool)
            .contains(&Point::new(-1.0, 0.0)));
    }

    #[test]
    fn opposite_triangle_rejects_foreign_vertex() {
        let (pool, ab, _) = two_triangles();
        let t1 = Triangle::new(ab);
        let err = t1
            .opposite_triangle(&pool, Point::new(9.0, 9.0))
            .unwrap_err();
        assert!(matches!(err, SubdivisionError::AssumptionFailed { .. }));
    }

    #[test]
    fn sweep_crosses_the_diagonal() {
        let (pool, ab, ca) = two_triangles();
        // Segment from b straight through the quadrilateral to d crosses
        // only the diagonal a-c.
        let from_b = ab.sym();
        assert_eq!(pool.org(from_b), Some(Point::new(1.0, 0.0)));
        let crossed = intersecting_edges(&pool, from_b, Point::new(-1.0, 0.0)).unwrap();
        assert_eq!(crossed.len(), 1);
        assert_eq!(crossed[0].quad(), ca.quad());
    }

    #[test]
    fn sweep_toward_a_neighbor_vertex_crosses_nothing() {
        let (pool, ab, _) = two_triangles();
        let crossed = intersecting_edges(&pool, ab, Point::new(1.0, 0.0)).unwrap();
        assert!(crossed.is_empty());
    }
}
