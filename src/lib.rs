//! # quadedge
//!
//! A constrained Delaunay triangulation engine built on the quad-edge
//! topological data structure of Guibas and Stolfi (1985).
//!
//! Given a set of planar points and, optionally, a set of required edges
//! ("constraints"), the crate produces a triangulation that covers the
//! convex hull of the inputs, satisfies the Delaunay empty-circle property
//! wherever no constraint prevents it, and contains every constraint edge
//! exactly.
//!
//! # Features
//!
//! - The quad-edge mesh: O(1) traversal of vertex and face rings and O(1)
//!   structural mutations (`splice`, `connect`, `swap`, `delete`) over an
//!   arena of integer handles
//! - Incremental Delaunay insertion with bounded-walk point location and
//!   in-circle flipping
//! - Constraint insertion by crossed-edge sweep and pseudo-polygon
//!   retriangulation
//! - A pure in-memory core: no I/O, no global state, optional observation
//!   hooks for visualization
//!
//! # Basic Usage
//!
//! ```rust
//! use quadedge::prelude::*;
//!
//! // Seven sites, triangulated inside an automatically derived frame.
//! let tri = Triangulator::new([
//!     [516.0, 661.0],
//!     [369.0, 793.0],
//!     [426.0, 539.0],
//!     [273.0, 525.0],
//!     [204.0, 694.0],
//!     [747.0, 750.0],
//!     [454.0, 390.0],
//! ]);
//! let sd = tri.build().unwrap();
//!
//! let triangles = sd.triangles(false).unwrap();
//! assert!(!triangles.is_empty());
//! for [a, b, c] in &triangles {
//!     assert!(is_ccw(*a, *b, *c));
//! }
//! ```
//!
//! # Constrained Edges
//!
//! ```rust
//! use quadedge::prelude::*;
//!
//! let a = Point::new(0.0, 0.0);
//! let b = Point::new(10.0, 0.0);
//!
//! let mut tri = Triangulator::new([[0.0, 0.0], [10.0, 0.0], [5.0, 3.0], [5.0, -3.0]]);
//! tri.add_constraint(a, b);
//! let sd = tri.build().unwrap();
//!
//! // The constraint is now an edge of the subdivision.
//! let e = sd.locate_segment(a, b).unwrap();
//! assert_eq!(sd.pool().org(e), Some(a));
//! assert_eq!(sd.pool().dest(e), Some(b));
//! ```
//!
//! # Concurrency
//!
//! The core is single-threaded: a [`core::subdivision::Subdivision`] is
//! exclusively owned, no operation suspends or performs I/O, and callers
//! wanting parallelism triangulate disjoint subdivisions independently.

#![forbid(unsafe_code)]

/// The `core` module contains the quad-edge mesh and the triangulation
/// algorithms layered on it.
pub mod core {
    /// Observation hooks for debugging and visualization.
    pub mod observer;
    /// Delaunay retriangulation of constraint cavities.
    pub mod pseudo_polygon;
    /// The quad-edge arena and the Guibas-Stolfi operators.
    pub mod quadedge;
    /// The incremental constrained Delaunay subdivision.
    pub mod subdivision;
    /// Face views and the crossed-edge sweep for constraints.
    pub mod triangle;
    /// Depth-first edge and face walks.
    pub mod walk;

    pub use observer::*;
    pub use pseudo_polygon::*;
    pub use quadedge::*;
    pub use subdivision::*;
    pub use triangle::*;
    pub use walk::*;
}

/// Geometric types and predicates: points, orientation, the in-circle
/// test, and segment classification.
pub mod geometry {
    /// Bounding extents and frame-triangle construction.
    pub mod bounds;
    /// Classification of a point against a directed segment.
    pub mod classify;
    /// The planar point type.
    pub mod point;
    /// Orientation, in-circle, and point-on-segment predicates.
    pub mod predicates;

    pub use bounds::*;
    pub use classify::*;
    pub use point::*;
    pub use predicates::*;
}

/// The high-level sites-to-triangulation front end.
pub mod triangulator;

/// Re-exports of the commonly used types.
pub mod prelude {
    pub use crate::core::observer::SubdivisionObserver;
    pub use crate::core::quadedge::{EdgeId, EdgePool};
    pub use crate::core::subdivision::{LocateResult, Subdivision, SubdivisionError};
    pub use crate::core::triangle::{Triangle, TriangleSearch};
    pub use crate::core::walk::{walk_all_edges, walk_all_triangle_edges};
    pub use crate::geometry::bounds::{triangle_containing, Extent};
    pub use crate::geometry::classify::{classify, Classification};
    pub use crate::geometry::point::Point;
    pub use crate::geometry::predicates::{
        circumcircle_location, in_circle, is_ccw, is_point_on, orientation, InCircle, Orientation,
    };
    pub use crate::triangulator::Triangulator;
}

/// Checks that a type implements the `auto` traits the public API promises.
/// Evaluated at compile time; only used by tests.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use crate::core::quadedge::{EdgeId, EdgePool};
    use crate::geometry::point::Point;
    use crate::is_normal;
    use crate::triangulator::Triangulator;

    #[test]
    fn normal_types() {
        assert!(is_normal::<Point>());
        assert!(is_normal::<EdgeId>());
        assert!(is_normal::<EdgePool>());
        assert!(is_normal::<Triangulator>());
    }

    #[test]
    fn prelude_exports_compose() {
        use crate::prelude::*;

        let sd = Triangulator::new([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]])
            .build()
            .unwrap();
        let mut edges = 0;
        sd.walk_all_edges(|_| {
            edges += 1;
            Ok(())
        })
        .unwrap();
        // Three sites, three frame vertices: 6 vertices, and the mesh is a
        // full triangulation of the frame interior.
        assert!(edges > 6);
        assert!(matches!(sd.locate(Point::new(0.2, 0.2)), LocateResult::Walk(_)));
    }
}
