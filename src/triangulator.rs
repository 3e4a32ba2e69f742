//! High-level entry point: from raw coordinates to a triangulation.
//!
//! The [`Triangulator`] owns the input sites, derives the enclosing frame
//! triangle, and drives insertion in lexicographic order. Individual site
//! failures (point location giving up on a degenerate input) are logged and
//! skipped rather than aborting the whole run; constraints are applied
//! afterwards and their errors do propagate.

use log::warn;

use crate::core::observer::SubdivisionObserver;
use crate::core::subdivision::{Subdivision, SubdivisionError};
use crate::geometry::bounds::triangle_containing;
use crate::geometry::point::Point;

/// Builds a constrained Delaunay triangulation from a set of sites and
/// optional required segments.
///
/// # Examples
///
/// ```rust
/// use quadedge::triangulator::Triangulator;
///
/// let tri = Triangulator::new([
///     [0.0, 0.0],
///     [10.0, 0.0],
///     [5.0, 3.0],
///     [5.0, -3.0],
/// ]);
/// let sd = tri.build().unwrap();
/// assert!(!sd.triangles(false).unwrap().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Triangulator {
    points: Vec<Point>,
    constraints: Vec<(Point, Point)>,
}

impl Triangulator {
    /// Creates a triangulator over the given sites.
    #[must_use]
    pub fn new<I, P>(points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        Self {
            points: points.into_iter().map(Into::into).collect(),
            constraints: Vec::new(),
        }
    }

    /// Requires the edge from `start` to `end` to appear in the output.
    ///
    /// Both points must also be sites.
    pub fn add_constraint(&mut self, start: Point, end: Point) -> &mut Self {
        self.constraints.push((start, end));
        self
    }

    /// The sites this triangulator was built over.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Runs the triangulation: sorts the sites, builds the frame, inserts
    /// every distinct site, then forces each constraint.
    ///
    /// # Errors
    ///
    /// Constraint failures propagate as [`SubdivisionError`]; site-level
    /// location failures are logged and skipped.
    pub fn build(&self) -> Result<Subdivision, SubdivisionError> {
        self.build_inner(None)
    }

    /// Like [`Triangulator::build`], with a debug observer attached to the
    /// subdivision. The final mesh is replayed to the observer before
    /// returning.
    ///
    /// # Errors
    ///
    /// Same as [`Triangulator::build`].
    pub fn build_with_observer(
        &self,
        observer: Box<dyn SubdivisionObserver>,
    ) -> Result<Subdivision, SubdivisionError> {
        self.build_inner(Some(observer))
    }

    fn build_inner(
        &self,
        observer: Option<Box<dyn SubdivisionObserver>>,
    ) -> Result<Subdivision, SubdivisionError> {
        let mut sites = self.points.clone();
        sites.sort_by(Point::cmp_xy);

        let [a, b, c] = triangle_containing(sites.iter().copied());
        let mut sd = match observer {
            Some(obs) => Subdivision::with_observer(a, b, c, obs),
            None => Subdivision::new(a, b, c),
        };

        let mut previous: Option<Point> = None;
        for &site in &sites {
            if previous == Some(site) {
                continue;
            }
            previous = Some(site);
            if !sd.insert_site(site) {
                warn!("failed to insert site {site}");
            }
        }

        for &(start, end) in &self.constraints {
            sd.insert_constraint(start, end)?;
        }

        sd.report()?;
        Ok(sd)
    }
}
