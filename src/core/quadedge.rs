//! The quad-edge mesh of Guibas and Stolfi (1985).
//!
//! Every undirected edge of the subdivision is represented by a *quad* of
//! four directed edge records: the two directed versions of the edge in the
//! primal graph (roles 0 and 2) and the two directed versions of its dual
//! (roles 1 and 3). A record is addressed by an [`EdgeId`] packing the quad
//! index and the role into one integer, so the structural operators `rot`
//! and `sym` are pure arithmetic on the handle and never touch memory.
//!
//! Records live in an arena owned by [`EdgePool`]. The arena only grows:
//! [`EdgePool::delete`] splices a quad out of every ring that could reach
//! it but does not reclaim storage, which keeps every handle stable for the
//! lifetime of the pool. The contract deletion does guarantee is that a
//! deleted edge is never observed by a walk starting from a live edge.
//!
//! All operators here are O(1) and purely topological; no geometric
//! predicate is ever consulted.

use log::debug;

use crate::geometry::point::Point;
use crate::geometry::predicates::{is_ccw, is_point_on};

/// Handle of one directed edge record.
///
/// The two low bits select the record's role within its quad (primal
/// forward, dual, primal reverse, dual reverse); the remaining bits index
/// the quad in the arena.
///
/// # Examples
///
/// ```rust
/// use quadedge::core::quadedge::EdgePool;
///
/// let mut pool = EdgePool::new();
/// let e = pool.make_edge();
/// assert_eq!(e.rot().rot(), e.sym());
/// assert_eq!(e.rot().rot().rot().rot(), e);
/// assert_eq!(e.sym().sym(), e);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

impl EdgeId {
    #[inline]
    fn new(quad: u32, role: u32) -> Self {
        Self(quad << 2 | role)
    }

    /// Index of the owning quad in the arena.
    #[inline]
    #[must_use]
    pub const fn quad(self) -> usize {
        (self.0 >> 2) as usize
    }

    /// Role of this record within its quad (0..4).
    #[inline]
    #[must_use]
    pub const fn role(self) -> usize {
        (self.0 & 3) as usize
    }

    /// The next record counterclockwise within the quad: primal to dual to
    /// reversed primal to reversed dual.
    #[inline]
    #[must_use]
    pub const fn rot(self) -> Self {
        Self((self.0 & !3) | ((self.0 + 1) & 3))
    }

    /// Inverse of [`EdgeId::rot`].
    #[inline]
    #[must_use]
    pub const fn rot_inv(self) -> Self {
        Self((self.0 & !3) | ((self.0 + 3) & 3))
    }

    /// The same undirected edge, directed the opposite way.
    #[inline]
    #[must_use]
    pub const fn sym(self) -> Self {
        Self(self.0 ^ 2)
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}.{}", self.quad(), self.role())
    }
}

/// One quad of four directed edge records.
///
/// `next[i]` is the `onext` link of the record with role `i`. `data[0]` and
/// `data[1]` hold the origin vertices of roles 0 and 2; the dual records
/// (roles 1 and 3) stand for faces and never carry a vertex.
#[derive(Debug, Clone)]
struct Quad {
    next: [EdgeId; 4],
    data: [Option<Point>; 2],
}

/// Arena of quad-edge records plus the Guibas-Stolfi operators over them.
#[derive(Debug, Clone, Default)]
pub struct EdgePool {
    quads: Vec<Quad>,
}

impl EdgePool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of quads ever allocated, deleted ones included.
    ///
    /// This is the arena's high-water mark; visited sets for walks are
    /// bounded by it.
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.quads.len()
    }

    /// Creates an isolated edge with no endpoints assigned and returns its
    /// primal record.
    ///
    /// The new quad is wired so the edge is a loop of its own: the primal
    /// records are fixed points of `onext` and the dual records point at
    /// each other (the two sides of an isolated edge are the same face).
    pub fn make_edge(&mut self) -> EdgeId {
        let q = u32::try_from(self.quads.len()).expect("edge arena exhausted");
        let e0 = EdgeId::new(q, 0);
        let e1 = EdgeId::new(q, 1);
        let e2 = EdgeId::new(q, 2);
        let e3 = EdgeId::new(q, 3);
        self.quads.push(Quad {
            next: [e0, e3, e2, e1],
            data: [None, None],
        });
        e0
    }

    /// Creates an edge and binds its endpoints in one step.
    pub fn make_edge_with(&mut self, org: Point, dest: Point) -> EdgeId {
        let e = self.make_edge();
        self.set_endpoints(e, org, dest);
        e
    }

    /// Binds the origin and destination vertices of a primal record.
    pub fn set_endpoints(&mut self, e: EdgeId, org: Point, dest: Point) {
        self.bind(e, Some(org), Some(dest));
    }

    /// Raw endpoint binding; `None` leaves a vertex unassigned.
    fn bind(&mut self, e: EdgeId, org: Option<Point>, dest: Option<Point>) {
        debug_assert!(e.role() % 2 == 0, "dual records carry no vertex");
        let quad = &mut self.quads[e.quad()];
        if e.role() == 0 {
            quad.data = [org, dest];
        } else {
            quad.data = [dest, org];
        }
    }

    /// Origin vertex of `e`, if bound. Always `None` for dual records.
    #[inline]
    #[must_use]
    pub fn org(&self, e: EdgeId) -> Option<Point> {
        match e.role() {
            0 => self.quads[e.quad()].data[0],
            2 => self.quads[e.quad()].data[1],
            _ => None,
        }
    }

    /// Destination vertex of `e`, if bound.
    #[inline]
    #[must_use]
    pub fn dest(&self, e: EdgeId) -> Option<Point> {
        self.org(e.sym())
    }

    /// Next edge counterclockwise around the origin of `e`.
    #[inline]
    #[must_use]
    pub fn onext(&self, e: EdgeId) -> EdgeId {
        self.quads[e.quad()].next[e.role()]
    }

    /// Previous edge around the origin of `e` (clockwise neighbor).
    #[inline]
    #[must_use]
    pub fn oprev(&self, e: EdgeId) -> EdgeId {
        self.onext(e.rot()).rot()
    }

    /// Next edge counterclockwise around the left face of `e`.
    #[inline]
    #[must_use]
    pub fn lnext(&self, e: EdgeId) -> EdgeId {
        self.onext(e.rot_inv()).rot()
    }

    /// Previous edge around the left face of `e`.
    #[inline]
    #[must_use]
    pub fn lprev(&self, e: EdgeId) -> EdgeId {
        self.onext(e).sym()
    }

    /// Previous edge around the destination of `e`.
    #[inline]
    #[must_use]
    pub fn dprev(&self, e: EdgeId) -> EdgeId {
        self.onext(e.rot_inv()).rot_inv()
    }

    #[inline]
    fn set_next(&mut self, e: EdgeId, next: EdgeId) {
        self.quads[e.quad()].next[e.role()] = next;
    }

    /// The fundamental topological operator.
    ///
    /// Splice affects the two origin rings of `a` and `b` and, independently,
    /// their two left-face rings: rings that are distinct are merged, a ring
    /// shared by both is split in two. Everything else in this module is
    /// built from it. See Guibas and Stolfi (1985), p. 96.
    pub fn splice(&mut self, a: EdgeId, b: EdgeId) {
        let alpha = self.onext(a).rot();
        let beta = self.onext(b).rot();

        let t1 = self.onext(b);
        let t2 = self.onext(a);
        let t3 = self.onext(beta);
        let t4 = self.onext(alpha);

        self.set_next(a, t1);
        self.set_next(b, t2);
        self.set_next(alpha, t3);
        self.set_next(beta, t4);
    }

    /// Adds a new edge from the destination of `a` to the origin of `b`, so
    /// that `a`, the new edge, and `b` share the same left face afterwards.
    /// The new edge's endpoints are bound from its neighbors.
    pub fn connect(&mut self, a: EdgeId, b: EdgeId) -> EdgeId {
        let e = self.make_edge();
        let a_lnext = self.lnext(a);
        self.splice(e, a_lnext);
        self.splice(e.sym(), b);
        let org = self.dest(a);
        let dest = self.org(b);
        self.bind(e, org, dest);
        e
    }

    /// Turns `e` counterclockwise inside the quadrilateral formed by its two
    /// adjacent triangles, rebinding its endpoints to the opposing vertices.
    ///
    /// This is the Delaunay flip: after a site insertion, every suspect edge
    /// failing the empty-circle test is swapped.
    pub fn swap(&mut self, e: EdgeId) {
        let a = self.oprev(e);
        let b = self.oprev(e.sym());

        self.splice(e, a);
        self.splice(e.sym(), b);
        let a_lnext = self.lnext(a);
        self.splice(e, a_lnext);
        let b_lnext = self.lnext(b);
        self.splice(e.sym(), b_lnext);

        let org = self.dest(a);
        let dest = self.dest(b);
        self.bind(e, org, dest);
    }

    /// Splices `e` out of both rings it participates in.
    ///
    /// The record itself is not reclaimed; it simply becomes unreachable
    /// from every live edge.
    pub fn delete(&mut self, e: EdgeId) {
        debug!("deleting edge {e}");
        let ap = self.oprev(e);
        self.splice(e, ap);
        let bp = self.oprev(e.sym());
        self.splice(e.sym(), bp);
    }

    /// True iff `x` is strictly right of the directed edge `e`.
    ///
    /// False when either endpoint is unbound.
    #[must_use]
    pub fn right_of(&self, x: Point, e: EdgeId) -> bool {
        match (self.org(e), self.dest(e)) {
            (Some(org), Some(dest)) => is_ccw(x, dest, org),
            _ => false,
        }
    }

    /// True iff `x` is strictly left of the directed edge `e`.
    #[must_use]
    pub fn left_of(&self, x: Point, e: EdgeId) -> bool {
        match (self.org(e), self.dest(e)) {
            (Some(org), Some(dest)) => is_ccw(x, org, dest),
            _ => false,
        }
    }

    /// True iff `x` lies on the closed segment spanned by `e`.
    #[must_use]
    pub fn on_edge(&self, x: Point, e: EdgeId) -> bool {
        match (self.org(e), self.dest(e)) {
            (Some(org), Some(dest)) => is_point_on(org, dest, x),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(pool: &EdgePool, start: EdgeId) -> Vec<EdgeId> {
        let mut out = vec![start];
        let mut e = pool.onext(start);
        while e != start {
            out.push(e);
            e = pool.onext(e);
        }
        out
    }

    #[test]
    fn make_edge_invariants() {
        let mut pool = EdgePool::new();
        let e = pool.make_edge();

        assert_eq!(pool.onext(e), e);
        assert_eq!(pool.onext(e.sym()), e.sym());
        assert_eq!(e.rot().rot(), e.sym());
        assert_eq!(e.rot().rot().rot().rot(), e);
        assert_eq!(e.rot_inv(), e.rot().rot().rot());
        assert_eq!(pool.org(e), None);

        // The two dual records of an isolated edge bound the same face.
        assert_eq!(pool.onext(e.rot()), e.rot_inv());
        assert_eq!(pool.onext(e.rot_inv()), e.rot());
    }

    #[test]
    fn endpoints_bind_both_directions() {
        let mut pool = EdgePool::new();
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let e = pool.make_edge_with(a, b);

        assert_eq!(pool.org(e), Some(a));
        assert_eq!(pool.dest(e), Some(b));
        assert_eq!(pool.org(e.sym()), Some(b));
        assert_eq!(pool.dest(e.sym()), Some(a));
        assert_eq!(pool.org(e.rot()), None);
    }

    #[test]
    fn splice_merges_and_splits_rings() {
        let mut pool = EdgePool::new();
        let o = Point::new(0.0, 0.0);
        let e1 = pool.make_edge_with(o, Point::new(1.0, 0.0));
        let e2 = pool.make_edge_with(o, Point::new(0.0, 1.0));

        pool.splice(e1, e2);
        assert_eq!(ring(&pool, e1).len(), 2);
        assert!(ring(&pool, e1).contains(&e2));

        // Splicing the same pair again separates them.
        pool.splice(e1, e2);
        assert_eq!(ring(&pool, e1), vec![e1]);
        assert_eq!(ring(&pool, e2), vec![e2]);
    }

    #[test]
    fn connect_closes_a_triangle() {
        let mut pool = EdgePool::new();
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let c = Point::new(0.0, 1.0);

        let ab = pool.make_edge_with(a, b);
        let bc = pool.make_edge_with(b, c);
        pool.splice(ab.sym(), bc);
        let ca = pool.connect(bc, ab);

        assert_eq!(pool.org(ca), Some(c));
        assert_eq!(pool.dest(ca), Some(a));

        // The left face of ab is now the triangle a, b, c.
        assert_eq!(pool.lnext(ab), bc);
        assert_eq!(pool.lnext(bc), ca);
        assert_eq!(pool.lnext(ca), ab);
    }

    #[test]
    fn swap_flips_the_diagonal() {
        // Two triangles a-b-c and a-d-b sharing the diagonal a-b.
        let mut pool = EdgePool::new();
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        let c = Point::new(1.0, 1.0);
        let d = Point::new(1.0, -1.0);

        let ab = pool.make_edge_with(a, b);
        let bc = pool.make_edge_with(b, c);
        pool.splice(ab.sym(), bc);
        let ca = pool.connect(bc, ab);
        let bd = pool.make_edge_with(b, d);
        pool.splice(bd, ab.sym());
        let da = pool.connect(bd, ab);

        assert_eq!(pool.org(da), Some(d));
        assert_eq!(pool.dest(da), Some(a));

        pool.swap(ab);
        // The diagonal now joins the opposing vertices d and c.
        assert_eq!(pool.org(ab), Some(d));
        assert_eq!(pool.dest(ab), Some(c));
        assert_eq!(pool.lnext(pool.lnext(pool.lnext(ab))), ab);

        drop(ca);
    }

    #[test]
    fn delete_unlinks_from_both_rings() {
        let mut pool = EdgePool::new();
        let o = Point::new(0.0, 0.0);
        let e1 = pool.make_edge_with(o, Point::new(1.0, 0.0));
        let e2 = pool.make_edge_with(o, Point::new(0.0, 1.0));
        let e3 = pool.make_edge_with(o, Point::new(-1.0, 0.0));
        pool.splice(e1, e2);
        pool.splice(e2, e3);
        assert_eq!(ring(&pool, e1).len(), 3);

        pool.delete(e2);
        let r = ring(&pool, e1);
        assert_eq!(r.len(), 2);
        assert!(!r.contains(&e2));
        // The deleted edge is an isolated loop again.
        assert_eq!(pool.onext(e2), e2);
    }

    #[test]
    fn side_queries_respect_direction() {
        let mut pool = EdgePool::new();
        let e = pool.make_edge_with(Point::new(0.0, 0.0), Point::new(2.0, 0.0));

        assert!(pool.right_of(Point::new(1.0, -1.0), e));
        assert!(pool.left_of(Point::new(1.0, 1.0), e));
        assert!(pool.on_edge(Point::new(1.0, 0.0), e));
        assert!(!pool.on_edge(Point::new(3.0, 0.0), e));

        // Unbound edges answer no to everything.
        let bare = pool.make_edge();
        assert!(!pool.right_of(Point::new(0.0, -1.0), bare));
        assert!(!pool.left_of(Point::new(0.0, 1.0), bare));
        assert!(!pool.on_edge(Point::new(0.0, 0.0), bare));
    }
}
