//! Geometric predicates for planar triangulation.
//!
//! The two predicates everything else rests on are the orientation test and
//! the in-circle test, both computed as signs of small determinants expanded
//! inline. The topological algorithms assume the predicates are *consistent*:
//! if `ccw(a, b, c)` holds then `ccw(b, c, a)` holds and `ccw(b, a, c)` does
//! not. Plain `f64` evaluation satisfies this for the non-adversarial inputs
//! the subdivision is designed for; the point-location walk additionally
//! carries an iteration bound so that an inconsistent answer near degeneracy
//! degrades into a brute-force scan instead of a spin.

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;

/// Orientation of an ordered point triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    /// The triple makes a right turn (determinant < 0).
    NEGATIVE,
    /// The triple is collinear (determinant = 0).
    DEGENERATE,
    /// The triple makes a left turn (determinant > 0).
    POSITIVE,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NEGATIVE => write!(f, "NEGATIVE"),
            Self::DEGENERATE => write!(f, "DEGENERATE"),
            Self::POSITIVE => write!(f, "POSITIVE"),
        }
    }
}

/// Position of a point relative to a circumcircle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InCircle {
    /// The point is outside the circumcircle.
    OUTSIDE,
    /// The point lies on the circumcircle.
    BOUNDARY,
    /// The point is strictly inside the circumcircle.
    INSIDE,
}

impl std::fmt::Display for InCircle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Determines the orientation of the ordered triple `(a, b, c)`.
///
/// Computed as the sign of the cross product `(b - a) × (c - a)`.
///
/// # Examples
///
/// ```rust
/// use quadedge::geometry::point::Point;
/// use quadedge::geometry::predicates::{orientation, Orientation};
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(1.0, 0.0);
/// let c = Point::new(0.0, 1.0);
/// assert_eq!(orientation(a, b, c), Orientation::POSITIVE);
/// assert_eq!(orientation(a, c, b), Orientation::NEGATIVE);
/// assert_eq!(orientation(a, b, Point::new(2.0, 0.0)), Orientation::DEGENERATE);
/// ```
#[must_use]
pub fn orientation(a: Point, b: Point, c: Point) -> Orientation {
    let det = (b - a).cross(c - a);
    if det > 0.0 {
        Orientation::POSITIVE
    } else if det < 0.0 {
        Orientation::NEGATIVE
    } else {
        Orientation::DEGENERATE
    }
}

/// Returns true iff `a -> b -> c` is a strict left turn.
///
/// Collinear triples are not counterclockwise.
#[inline]
#[must_use]
pub fn is_ccw(a: Point, b: Point, c: Point) -> bool {
    orientation(a, b, c) == Orientation::POSITIVE
}

/// Locates `d` relative to the circumcircle of `(a, b, c)`.
///
/// The result is meaningful when `(a, b, c)` is in counterclockwise order;
/// for clockwise triples the INSIDE/OUTSIDE answers are exchanged. Computed
/// as the sign of the lifted 3x3 determinant
///
/// ```text
/// | ax-dx  ay-dy  (ax-dx)^2 + (ay-dy)^2 |
/// | bx-dx  by-dy  (bx-dx)^2 + (by-dy)^2 |
/// | cx-dx  cy-dy  (cx-dx)^2 + (cy-dy)^2 |
/// ```
#[must_use]
pub fn circumcircle_location(a: Point, b: Point, c: Point, d: Point) -> InCircle {
    let ad = a - d;
    let bd = b - d;
    let cd = c - d;

    let det = ad.magnitude2() * bd.cross(cd) - bd.magnitude2() * ad.cross(cd)
        + cd.magnitude2() * ad.cross(bd);

    if det > 0.0 {
        InCircle::INSIDE
    } else if det < 0.0 {
        InCircle::OUTSIDE
    } else {
        InCircle::BOUNDARY
    }
}

/// Returns true iff `d` lies strictly inside the circumcircle of the
/// counterclockwise triangle `(a, b, c)`.
///
/// This is the Delaunay suspect-edge test: an edge whose opposite vertex
/// passes it must be flipped.
///
/// # Examples
///
/// ```rust
/// use quadedge::geometry::point::Point;
/// use quadedge::geometry::predicates::in_circle;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(2.0, 0.0);
/// let c = Point::new(0.0, 2.0);
/// assert!(in_circle(a, b, c, Point::new(1.0, 1.0)));
/// assert!(!in_circle(a, b, c, Point::new(3.0, 3.0)));
/// // Cocircular points sit on the boundary, not inside.
/// assert!(!in_circle(a, b, c, Point::new(2.0, 2.0)));
/// ```
#[inline]
#[must_use]
pub fn in_circle(a: Point, b: Point, c: Point, d: Point) -> bool {
    circumcircle_location(a, b, c, d) == InCircle::INSIDE
}

/// Orientation-insensitive circumcircle membership.
///
/// The pseudo-polygon retriangulation hands in triangles whose winding
/// depends on which side of the constraint the cavity lies; this variant
/// reorders a clockwise triple before testing.
#[must_use]
pub fn point_in_circumcircle(a: Point, b: Point, c: Point, d: Point) -> bool {
    match orientation(a, b, c) {
        Orientation::POSITIVE => in_circle(a, b, c, d),
        Orientation::NEGATIVE => in_circle(a, c, b, d),
        // A degenerate "triangle" has no circumcircle.
        Orientation::DEGENERATE => false,
    }
}

/// Returns true iff `p` lies on the closed segment from `start` to `end`.
///
/// Bit-exact: `p` must be exactly collinear with the segment and inside its
/// axis-aligned extent, endpoints included.
///
/// # Examples
///
/// ```rust
/// use quadedge::geometry::point::Point;
/// use quadedge::geometry::predicates::is_point_on;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(4.0, 2.0);
/// assert!(is_point_on(a, b, Point::new(2.0, 1.0)));
/// assert!(is_point_on(a, b, a));
/// assert!(is_point_on(a, b, b));
/// assert!(!is_point_on(a, b, Point::new(6.0, 3.0)));
/// assert!(!is_point_on(a, b, Point::new(2.0, 1.5)));
/// ```
#[must_use]
pub fn is_point_on(start: Point, end: Point, p: Point) -> bool {
    if (end - start).cross(p - start) != 0.0 {
        return false;
    }
    let (min_x, max_x) = if start.x <= end.x {
        (start.x, end.x)
    } else {
        (end.x, start.x)
    };
    let (min_y, max_y) = if start.y <= end.y {
        (start.y, end.y)
    } else {
        (end.y, start.y)
    };
    min_x <= p.x && p.x <= max_x && min_y <= p.y && p.y <= max_y
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Point = Point::new(0.0, 0.0);
    const B: Point = Point::new(1.0, 0.0);
    const C: Point = Point::new(0.0, 1.0);

    #[test]
    fn orientation_is_cyclically_consistent() {
        assert!(is_ccw(A, B, C));
        assert!(is_ccw(B, C, A));
        assert!(is_ccw(C, A, B));
        assert!(!is_ccw(B, A, C));
        assert!(!is_ccw(A, C, B));
    }

    #[test]
    fn collinear_is_not_ccw() {
        let mid = Point::new(0.5, 0.0);
        assert_eq!(orientation(A, mid, B), Orientation::DEGENERATE);
        assert!(!is_ccw(A, mid, B));
        assert!(!is_ccw(A, B, mid));
    }

    #[test]
    fn in_circle_unit_square() {
        // Circumcircle of three corners of the unit square passes through
        // the fourth corner exactly.
        let d = Point::new(1.0, 1.0);
        assert_eq!(circumcircle_location(A, B, d, C), InCircle::BOUNDARY);
        assert!(in_circle(A, B, d, Point::new(0.5, 0.5)));
        assert!(!in_circle(A, B, d, Point::new(2.0, 2.0)));
    }

    #[test]
    fn point_in_circumcircle_ignores_winding() {
        let center = Point::new(0.3, 0.3);
        assert!(point_in_circumcircle(A, B, C, center));
        assert!(point_in_circumcircle(A, C, B, center));
        let far = Point::new(5.0, 5.0);
        assert!(!point_in_circumcircle(A, B, C, far));
        assert!(!point_in_circumcircle(A, C, B, far));
    }

    #[test]
    fn degenerate_triangle_has_no_circumcircle() {
        let mid = Point::new(0.5, 0.0);
        assert!(!point_in_circumcircle(A, mid, B, C));
    }

    #[test]
    fn point_on_vertical_segment() {
        let top = Point::new(0.0, 3.0);
        assert!(is_point_on(A, top, Point::new(0.0, 1.5)));
        assert!(!is_point_on(A, top, Point::new(0.0, 3.5)));
        assert!(!is_point_on(A, top, Point::new(0.5, 1.5)));
    }

    #[test]
    fn near_degenerate_orientation_keeps_antisymmetry() {
        // A sliver triangle: the predicate may call it either way, but it
        // must not call both (a,b,c) and (b,a,c) left turns.
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1e12, 1e-12);
        let c = Point::new(2e12, 0.0);
        assert!(!(is_ccw(a, b, c) && is_ccw(b, a, c)));
    }
}
