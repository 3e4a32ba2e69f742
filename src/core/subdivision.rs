//! Incremental constrained Delaunay subdivision.
//!
//! A [`Subdivision`] starts as a single triangle (the *frame*) chosen large
//! enough to contain every future site. Sites are added one at a time by
//! [`Subdivision::insert_site`]: the containing triangle is located by a
//! Guibas-Stolfi walk, spokes are fanned from the new site to the triangle's
//! vertices, and the suspect edges around the fan are flipped until the
//! empty-circle property holds again. Required edges are forced afterwards
//! with [`Subdivision::insert_constraint`], which deletes everything the
//! constraint crosses and retriangulates the two cavity polygons left
//! behind.
//!
//! Point location is the only part of the structure that is sensitive to
//! floating-point trouble, so the walk is bounded: past `2 x point_count`
//! steps (or on returning to its starting edge) it falls back to scanning
//! every live edge, and failing that reports the site as unlocatable rather
//! than looping.

use log::{error, warn};
use thiserror::Error;

use crate::core::observer::SubdivisionObserver;
use crate::core::pseudo_polygon::triangulate_pseudo_polygon;
use crate::core::quadedge::{EdgeId, EdgePool};
use crate::core::triangle::{find_intersecting_triangle, intersecting_edges};
use crate::core::walk::{walk_all_edges, walk_all_triangle_edges};
use crate::geometry::classify::{classify, Classification};
use crate::geometry::point::{append_non_repeat, Point};
use crate::geometry::predicates::{in_circle, is_ccw};

/// Failures surfaced by subdivision operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubdivisionError {
    /// A constraint's starting vertex is not a vertex of the subdivision.
    #[error("invalid starting vertex")]
    InvalidStartingVertex,

    /// A constraint's ending vertex is not a vertex of the subdivision.
    #[error("invalid ending vertex")]
    InvalidEndingVertex,

    /// The triangle search hit edges the left/right classification cannot
    /// separate. Recovered internally during constraint insertion; callers
    /// only see it from the low-level search API.
    #[error("coincident edges")]
    CoincidentEdges,

    /// An "impossible" state was reached: a structural assumption the
    /// algorithms rely on did not hold. This is a strong signal of
    /// inconsistent geometric predicates and is never retried.
    #[error("assumption failed: {what}")]
    AssumptionFailed {
        /// Which assumption was violated.
        what: &'static str,
    },

    /// A face walk collected a ring that is not a triangle.
    #[error("face bounded by {count} edges is not a triangle")]
    NonTriangularFace {
        /// Number of edges in the offending ring.
        count: usize,
    },

    /// Sentinel returned by walk callbacks to stop a walk early. Walkers
    /// swallow it; it never escapes to callers.
    #[error("walk cancelled")]
    Cancelled,
}

/// Outcome of point location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateResult {
    /// The bounded walk ended at this edge: the point is one of its
    /// endpoints or lies in the triangle to its left.
    Walk(EdgeId),
    /// The walk cycled and the point was found by the brute-force scan.
    /// Site insertion treats this as a failure; constraint insertion
    /// accepts the edge.
    Scan(EdgeId),
    /// Neither the walk nor the scan found the point.
    NotFound,
}

impl LocateResult {
    /// The located edge, however it was found.
    #[must_use]
    pub fn edge(&self) -> Option<EdgeId> {
        match *self {
            Self::Walk(e) | Self::Scan(e) => Some(e),
            Self::NotFound => None,
        }
    }
}

/// A planar subdivision maintaining a constrained Delaunay triangulation.
pub struct Subdivision {
    pool: EdgePool,
    starting_edge: EdgeId,
    frame: [Point; 3],
    point_count: usize,
    observer: Option<Box<dyn SubdivisionObserver>>,
}

impl std::fmt::Debug for Subdivision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subdivision")
            .field("starting_edge", &self.starting_edge)
            .field("frame", &self.frame)
            .field("point_count", &self.point_count)
            .field("quads", &self.pool.quad_count())
            .finish()
    }
}

impl Subdivision {
    /// Initializes the subdivision to the triangle `a`, `b`, `c`.
    ///
    /// The frame must be in counterclockwise order and large enough that
    /// every site inserted later falls strictly inside it; see
    /// [`triangle_containing`](crate::geometry::bounds::triangle_containing).
    #[must_use]
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        Self::build(a, b, c, None)
    }

    /// Like [`Subdivision::new`], with a debug observer attached.
    #[must_use]
    pub fn with_observer(
        a: Point,
        b: Point,
        c: Point,
        observer: Box<dyn SubdivisionObserver>,
    ) -> Self {
        Self::build(a, b, c, Some(observer))
    }

    fn build(
        a: Point,
        b: Point,
        c: Point,
        observer: Option<Box<dyn SubdivisionObserver>>,
    ) -> Self {
        let mut pool = EdgePool::new();
        let ea = pool.make_edge_with(a, b);
        let eb = pool.make_edge();
        pool.splice(ea.sym(), eb);
        pool.set_endpoints(eb, b, c);
        let ec = pool.make_edge();
        pool.splice(eb.sym(), ec);
        pool.set_endpoints(ec, c, a);
        pool.splice(ec.sym(), ea);

        let mut sd = Self {
            pool,
            starting_edge: ea,
            frame: [a, b, c],
            point_count: 3,
            observer,
        };
        if let Some(obs) = sd.observer.as_mut() {
            obs.on_frame([a, b, c]);
        }
        sd
    }

    /// The quad-edge arena backing this subdivision.
    #[must_use]
    pub fn pool(&self) -> &EdgePool {
        &self.pool
    }

    /// The current search anchor edge.
    #[must_use]
    pub fn starting_edge(&self) -> EdgeId {
        self.starting_edge
    }

    /// The three frame vertices, as given at construction.
    #[must_use]
    pub fn frame(&self) -> [Point; 3] {
        self.frame
    }

    /// Number of sites counted so far, the three frame vertices included.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// True iff any of the given points is a frame vertex.
    #[must_use]
    pub fn is_frame_point(&self, points: &[Point]) -> bool {
        points.iter().any(|p| self.frame.contains(p))
    }

    /// True iff both endpoints of `e` are frame vertices. Hard frame edges
    /// bound the world and are never deleted, not even by a constraint that
    /// crosses them.
    #[must_use]
    pub fn is_hard_frame_edge(&self, e: EdgeId) -> bool {
        match (self.pool.org(e), self.pool.dest(e)) {
            (Some(org), Some(dest)) => self.frame.contains(&org) && self.frame.contains(&dest),
            _ => false,
        }
    }

    /// One step of the locate walk: either `x` is settled at `e` (endpoint
    /// match or containing triangle) or the walk moves to a neighbor.
    fn test_edge(&self, x: Point, e: EdgeId) -> (bool, EdgeId) {
        if self.pool.org(e) == Some(x) || self.pool.dest(e) == Some(x) {
            (true, e)
        } else if self.pool.right_of(x, e) {
            (false, e.sym())
        } else if !self.pool.right_of(x, self.pool.onext(e)) {
            (false, self.pool.onext(e))
        } else if !self.pool.right_of(x, self.pool.dprev(e)) {
            (false, self.pool.dprev(e))
        } else {
            (true, e)
        }
    }

    /// Returns an edge `e` such that `x` is an endpoint of `e` or lies in
    /// the triangle left of `e`.
    ///
    /// The search walks from the starting edge in the general direction of
    /// `x`, following Guibas and Stolfi (1985), p. 121. Floating-point
    /// imprecision can make the walk cycle, so it is bounded at
    /// `2 x point_count` steps; past the bound every live edge is scanned
    /// instead.
    pub fn locate(&self, x: Point) -> LocateResult {
        let (mut ok, mut e) = self.test_edge(x, self.starting_edge);
        let mut count = 0usize;

        while !ok {
            count += 1;
            if e == self.starting_edge || count > self.point_count * 2 {
                warn!(
                    "locate walk for {x} gave up after {count} steps over {} points, scanning all edges",
                    self.point_count
                );
                let mut found = None;
                let _ = walk_all_edges(&self.pool, self.starting_edge, |ee| {
                    if self.test_edge(x, ee).0 {
                        found = Some(ee);
                        return Err(SubdivisionError::Cancelled);
                    }
                    Ok(())
                });
                return match found {
                    Some(edge) => LocateResult::Scan(edge),
                    None => LocateResult::NotFound,
                };
            }
            let step = self.test_edge(x, e);
            ok = step.0;
            e = step.1;
        }
        LocateResult::Walk(e)
    }

    /// Inserts a new site, restoring the Delaunay condition around it.
    ///
    /// Returns true when the site was inserted or was already present;
    /// false when point location failed, which callers treat as a
    /// non-fatal per-site failure.
    ///
    /// Based on the pseudocode in Guibas and Stolfi (1985), p. 120, with
    /// the suspect-edge bookkeeping fix for the termination test.
    pub fn insert_site(&mut self, x: Point) -> bool {
        if let Some(obs) = self.observer.as_mut() {
            obs.on_pre_insert(x);
        }
        let inserted = self.insert_site_inner(x);
        if let Some(obs) = self.observer.as_mut() {
            obs.on_post_insert(x, inserted);
        }
        inserted
    }

    fn insert_site_inner(&mut self, x: Point) -> bool {
        self.point_count += 1;
        let mut e = match self.locate(x) {
            LocateResult::Walk(e) => e,
            // A scan hit means the walk already cycled; inserting from it
            // would build on an unreliable location.
            LocateResult::Scan(_) | LocateResult::NotFound => return false,
        };

        if self.pool.org(e) == Some(x) || self.pool.dest(e) == Some(x) {
            // Already a vertex of the subdivision.
            return true;
        }
        if self.pool.on_edge(x, e) {
            // The site falls on an existing edge: remove it and insert into
            // the resulting quadrilateral instead.
            e = self.pool.oprev(e);
            let stale = self.pool.onext(e);
            self.pool.delete(stale);
        }

        // Fan spokes from x to every vertex of the containing polygon.
        let org = self.pool.org(e);
        let mut base = self.pool.make_edge();
        if let Some(org) = org {
            self.pool.set_endpoints(base, org, x);
        }
        self.pool.splice(base, e);
        self.starting_edge = base;

        base = self.pool.connect(e, base.sym());
        e = self.pool.oprev(base);
        while self.pool.lnext(e) != self.starting_edge {
            base = self.pool.connect(e, base.sym());
            e = self.pool.oprev(base);
        }

        // Examine suspect edges until the empty-circle condition holds.
        loop {
            let t = self.pool.oprev(e);
            let flip = match (self.pool.org(e), self.pool.dest(e), self.pool.dest(t)) {
                (Some(e_org), Some(e_dest), Some(t_dest)) => {
                    self.pool.right_of(t_dest, e) && in_circle(e_org, t_dest, e_dest, x)
                }
                _ => false,
            };

            if flip {
                self.pool.swap(e);
                e = self.pool.oprev(e);
            } else if self.pool.onext(e) == self.starting_edge {
                // No more suspect edges.
                return true;
            } else {
                // Pop a suspect edge.
                e = self.pool.lprev(self.pool.onext(e));
            }
        }
    }

    /// Deletes `e`, moving the search anchor off its quad first so that
    /// later locates never start from an unlinked record.
    fn delete_edge(&mut self, e: EdgeId) {
        if self.starting_edge.quad() == e.quad() {
            self.starting_edge = self.pool.oprev(e);
        }
        self.pool.delete(e);
    }

    /// Locates `p` and returns an edge whose *origin* is `p`, or `None`
    /// when `p` is not a vertex of the subdivision.
    fn vertex_edge(&self, p: Point) -> Option<EdgeId> {
        let e = self.locate(p).edge()?;
        if self.pool.org(e) == Some(p) {
            Some(e)
        } else if self.pool.dest(e) == Some(p) {
            Some(e.sym())
        } else {
            None
        }
    }

    /// Scans the origin ring of `edge` for an edge ending at `end`.
    fn segment_in_ring(&self, edge: EdgeId, end: Point) -> Option<EdgeId> {
        let mut curr = edge;
        loop {
            if self.pool.dest(curr) == Some(end) {
                return Some(curr);
            }
            curr = self.pool.onext(curr);
            if curr == edge {
                return None;
            }
        }
    }

    /// Finds the edge from `start` to `end`, if both are vertices and the
    /// edge exists.
    #[must_use]
    pub fn locate_segment(&self, start: Point, end: Point) -> Option<EdgeId> {
        let edge = self.vertex_edge(start)?;
        self.segment_in_ring(edge, end)
    }

    /// Forces the edge from `start` to `end` into the subdivision.
    ///
    /// Both points must already be vertices. Every non-frame edge crossed
    /// by the open segment is deleted; the two cavity polygons left behind
    /// (one on each side of the constraint) are retriangulated, and the
    /// constraint edge itself is materialized.
    ///
    /// # Errors
    ///
    /// - [`SubdivisionError::InvalidStartingVertex`] /
    ///   [`SubdivisionError::InvalidEndingVertex`] when an endpoint is not
    ///   in the subdivision.
    /// - [`SubdivisionError::CoincidentEdges`] when the crossing sweep hits
    ///   a degeneracy it cannot step through.
    /// - [`SubdivisionError::AssumptionFailed`] on structural violations.
    pub fn insert_constraint(&mut self, start: Point, end: Point) -> Result<(), SubdivisionError> {
        let Some(start_edge) = self.vertex_edge(start) else {
            return Err(SubdivisionError::InvalidStartingVertex);
        };
        if self.segment_in_ring(start_edge, end).is_some() {
            // Already present.
            return Ok(());
        }

        let removal_list = intersecting_edges(&self.pool, start_edge, end)?;

        // Partition the vertices of the cavity into the polygon right of
        // the constraint (upper) and the one left of it (lower).
        let mut upper = vec![start];
        let mut lower = vec![start];

        for e in removal_list {
            if self.is_hard_frame_edge(e) {
                continue;
            }
            for endpoint in [self.pool.org(e), self.pool.dest(e)] {
                let Some(p) = endpoint else { continue };
                match classify(p, start, end) {
                    Classification::LEFT => append_non_repeat(&mut lower, p),
                    Classification::RIGHT => append_non_repeat(&mut upper, p),
                    // Collinear endpoints belong to neither cavity.
                    _ => {}
                }
            }
            self.delete_edge(e);
        }

        append_non_repeat(&mut lower, end);
        append_non_repeat(&mut upper, end);

        for polygon in [upper, lower] {
            if polygon.len() < 3 {
                // Just the shared chord, nothing to retriangulate.
                continue;
            }
            for [p, q] in triangulate_pseudo_polygon(&polygon) {
                // A concave cavity can produce diagonals lying outside the
                // subdivision's empty region; those still cross live edges
                // and must be skipped.
                if let Some(p_edge) = self.vertex_edge(p) {
                    if let Ok(crossings) = intersecting_edges(&self.pool, p_edge, q) {
                        if !crossings.is_empty() {
                            continue;
                        }
                    }
                }
                self.insert_edge(p, q)?;
            }
        }
        Ok(())
    }

    /// Materializes the edge from `start` to `end` across a region both
    /// already border. No-op when the edge exists.
    ///
    /// # Errors
    ///
    /// [`SubdivisionError::InvalidStartingVertex`] /
    /// [`SubdivisionError::InvalidEndingVertex`] when an endpoint cannot be
    /// located, [`SubdivisionError::AssumptionFailed`] when no triangle
    /// around an endpoint faces the other one. Coincident-edge degeneracies
    /// during the triangle search are tolerated.
    fn insert_edge(&mut self, start: Point, end: Point) -> Result<(), SubdivisionError> {
        let Some(edge) = self.vertex_edge(start) else {
            return Err(SubdivisionError::InvalidStartingVertex);
        };
        if self.segment_in_ring(edge, end).is_some() {
            return Ok(());
        }

        let Some(entry) = find_intersecting_triangle(&self.pool, edge, end).triangle() else {
            error!("no triangle incident to {start} faces {end}");
            return Err(SubdivisionError::AssumptionFailed {
                what: "no intersecting triangle at the edge start",
            });
        };
        let from = self.pool.lprev(entry.starting_edge());

        let Some(sym_edge) = self.vertex_edge(end) else {
            return Err(SubdivisionError::InvalidEndingVertex);
        };
        let Some(exit) = find_intersecting_triangle(&self.pool, sym_edge, start).triangle() else {
            error!("no triangle incident to {end} faces {start}");
            return Err(SubdivisionError::AssumptionFailed {
                what: "no intersecting triangle at the edge end",
            });
        };
        let to = exit.starting_edge();

        self.pool.connect(from, to);
        Ok(())
    }

    /// Calls `visit` for every undirected live edge.
    ///
    /// The callback may cancel the walk by returning
    /// [`SubdivisionError::Cancelled`]; the walk then stops without error.
    ///
    /// # Errors
    ///
    /// Propagates any other error the callback returns.
    pub fn walk_all_edges<F>(&self, visit: F) -> Result<(), SubdivisionError>
    where
        F: FnMut(EdgeId) -> Result<(), SubdivisionError>,
    {
        walk_all_edges(&self.pool, self.starting_edge, visit)
    }

    /// Extracts the triangles of the subdivision.
    ///
    /// Every face must be a triangle; the outer face (the only face whose
    /// vertices come out clockwise) is never emitted. When `include_frame`
    /// is false, triangles touching any frame vertex are skipped, leaving
    /// exactly the triangulation of the sites' convex hull.
    ///
    /// # Errors
    ///
    /// [`SubdivisionError::NonTriangularFace`] when a face ring is not a
    /// triangle, [`SubdivisionError::AssumptionFailed`] when a live edge
    /// has no origin.
    pub fn triangles(&self, include_frame: bool) -> Result<Vec<[Point; 3]>, SubdivisionError> {
        let mut triangles = Vec::new();
        walk_all_triangle_edges(&self.pool, self.starting_edge, |edges| {
            let &[e0, e1, e2] = edges else {
                return Err(SubdivisionError::NonTriangularFace { count: edges.len() });
            };
            let (Some(a), Some(b), Some(c)) =
                (self.pool.org(e0), self.pool.org(e1), self.pool.org(e2))
            else {
                return Err(SubdivisionError::AssumptionFailed {
                    what: "live edge has no origin vertex",
                });
            };
            if !is_ccw(a, b, c) {
                // The outer face.
                return Ok(());
            }
            let pts = [a, b, c];
            if !include_frame && self.is_frame_point(&pts) {
                return Ok(());
            }
            triangles.push(pts);
            Ok(())
        })?;
        Ok(triangles)
    }

    /// Replays the current frame, edges, and triangles to the observer.
    ///
    /// Does nothing without an observer attached.
    ///
    /// # Errors
    ///
    /// Propagates extraction failures from [`Subdivision::triangles`].
    pub fn report(&mut self) -> Result<(), SubdivisionError> {
        if self.observer.is_none() {
            return Ok(());
        }

        let mut edges = Vec::new();
        self.walk_all_edges(|e| {
            if let (Some(org), Some(dest)) = (self.pool.org(e), self.pool.dest(e)) {
                edges.push((org, dest));
            }
            Ok(())
        })?;
        let triangles = self.triangles(true)?;
        let frame = self.frame;

        if let Some(obs) = self.observer.as_mut() {
            obs.on_frame(frame);
            for (org, dest) in edges {
                obs.on_edge(org, dest);
            }
            for t in triangles {
                obs.on_triangle(t);
            }
        }
        Ok(())
    }
}
