//! Classification of a point against a directed segment.
//!
//! The constraint-insertion sweep steers entirely by this classifier: the
//! opposite vertex of each triangle it crosses is classified against the
//! constraint segment to decide which neighbor to step into, and the
//! endpoints of each crossed edge are classified to sort them into the upper
//! or lower cavity polygon.

use serde::{Deserialize, Serialize};

use crate::geometry::point::Point;
use crate::geometry::predicates::{orientation, Orientation};

/// Position of a point relative to a directed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Strictly left of the directed line.
    LEFT,
    /// Strictly right of the directed line.
    RIGHT,
    /// Collinear, past the segment's destination.
    BEYOND,
    /// Collinear, before the segment's origin.
    BEHIND,
    /// Collinear, strictly between the endpoints.
    BETWEEN,
    /// Coincides with the segment's origin.
    ORIGIN,
    /// Coincides with the segment's destination.
    DESTINATION,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LEFT => write!(f, "LEFT"),
            Self::RIGHT => write!(f, "RIGHT"),
            Self::BEYOND => write!(f, "BEYOND"),
            Self::BEHIND => write!(f, "BEHIND"),
            Self::BETWEEN => write!(f, "BETWEEN"),
            Self::ORIGIN => write!(f, "ORIGIN"),
            Self::DESTINATION => write!(f, "DESTINATION"),
        }
    }
}

/// Classifies `p` relative to the directed segment `a -> b`.
///
/// LEFT/RIGHT follow the orientation sign; the five collinear cases
/// partition the line through `a` and `b`.
///
/// # Examples
///
/// ```rust
/// use quadedge::geometry::classify::{classify, Classification};
/// use quadedge::geometry::point::Point;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(4.0, 0.0);
/// assert_eq!(classify(Point::new(2.0, 1.0), a, b), Classification::LEFT);
/// assert_eq!(classify(Point::new(2.0, -1.0), a, b), Classification::RIGHT);
/// assert_eq!(classify(Point::new(2.0, 0.0), a, b), Classification::BETWEEN);
/// assert_eq!(classify(Point::new(-1.0, 0.0), a, b), Classification::BEHIND);
/// assert_eq!(classify(Point::new(5.0, 0.0), a, b), Classification::BEYOND);
/// assert_eq!(classify(a, a, b), Classification::ORIGIN);
/// assert_eq!(classify(b, a, b), Classification::DESTINATION);
/// ```
#[must_use]
pub fn classify(p: Point, a: Point, b: Point) -> Classification {
    match orientation(a, b, p) {
        Orientation::POSITIVE => Classification::LEFT,
        Orientation::NEGATIVE => Classification::RIGHT,
        Orientation::DEGENERATE => {
            if p == a {
                Classification::ORIGIN
            } else if p == b {
                Classification::DESTINATION
            } else {
                let ab = b - a;
                let ap = p - a;
                if ab.dot(ap) < 0.0 {
                    Classification::BEHIND
                } else if ap.magnitude2() > ab.magnitude2() {
                    Classification::BEYOND
                } else {
                    Classification::BETWEEN
                }
            }
        }
    }
}
