//! Depth-first walks over every edge and every face of a subdivision.
//!
//! Both walks start from an arbitrary live edge and reach everything
//! connected to it, which is exactly the set of live edges: deletion
//! splices records out of every ring a walk could traverse.
//!
//! Callbacks cancel a walk by returning [`SubdivisionError::Cancelled`];
//! the walk then stops silently and reports success. Any other error
//! aborts the walk and propagates.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::core::quadedge::{EdgeId, EdgePool};
use crate::core::subdivision::SubdivisionError;

/// Edges bounding one face; every face of a triangulated subdivision has
/// three, so the buffer stays inline.
pub type FaceRing = SmallVec<[EdgeId; 3]>;

/// Visits every undirected edge reachable from `start` exactly once.
///
/// The callback sees one of the two directed records of each edge; its
/// `sym` is marked visited along with it.
///
/// # Errors
///
/// Propagates the first non-[`Cancelled`](SubdivisionError::Cancelled)
/// error the callback returns.
pub fn walk_all_edges<F>(pool: &EdgePool, start: EdgeId, mut visit: F) -> Result<(), SubdivisionError>
where
    F: FnMut(EdgeId) -> Result<(), SubdivisionError>,
{
    let mut to_process = vec![start];
    let mut visited: FxHashSet<EdgeId> = FxHashSet::default();

    while let Some(e) = to_process.pop() {
        if visited.contains(&e) {
            continue;
        }

        match visit(e) {
            Ok(()) => {}
            Err(SubdivisionError::Cancelled) => return Ok(()),
            Err(err) => return Err(err),
        }

        let sym = e.sym();
        to_process.push(pool.onext(e));
        to_process.push(pool.onext(sym));

        visited.insert(e);
        visited.insert(sym);
    }
    Ok(())
}

/// Visits every face reachable from `start`, handing the callback the
/// face's bounding edges in counterclockwise order.
///
/// Each directed record belongs to exactly one left-face ring, so marking
/// the ring's records visited visits each face once; pushing the `sym` of
/// every ring edge queues the neighboring faces.
///
/// # Errors
///
/// Propagates the first non-[`Cancelled`](SubdivisionError::Cancelled)
/// error the callback returns.
pub fn walk_all_triangle_edges<F>(
    pool: &EdgePool,
    start: EdgeId,
    mut visit: F,
) -> Result<(), SubdivisionError>
where
    F: FnMut(&[EdgeId]) -> Result<(), SubdivisionError>,
{
    let mut to_process = vec![start];
    let mut visited: FxHashSet<EdgeId> = FxHashSet::default();

    while let Some(e) = to_process.pop() {
        if visited.contains(&e) {
            continue;
        }

        let mut ring = FaceRing::new();
        let mut curr = e;
        loop {
            ring.push(curr);

            let sym = curr.sym();
            if !visited.contains(&sym) {
                to_process.push(sym);
            }
            visited.insert(curr);

            curr = pool.lnext(curr);
            if curr == e {
                break;
            }
        }

        match visit(&ring) {
            Ok(()) => {}
            Err(SubdivisionError::Cancelled) => return Ok(()),
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point;

    /// A single triangle: three edges, two faces (inside and outside).
    fn triangle_pool() -> (EdgePool, EdgeId) {
        let mut pool = EdgePool::new();
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let c = Point::new(0.0, 1.0);
        let ab = pool.make_edge_with(a, b);
        let bc = pool.make_edge_with(b, c);
        pool.splice(ab.sym(), bc);
        let ca = pool.connect(bc, ab);
        debug_assert_eq!(pool.lnext(ca), ab);
        (pool, ab)
    }

    #[test]
    fn edge_walk_visits_each_undirected_edge_once() {
        let (pool, start) = triangle_pool();
        let mut seen = Vec::new();
        walk_all_edges(&pool, start, |e| {
            seen.push(e);
            Ok(())
        })
        .unwrap();

        assert_eq!(seen.len(), 3);
        for e in &seen {
            assert!(!seen.contains(&e.sym()), "visited both directions of {e}");
        }
    }

    #[test]
    fn edge_walk_cancellation_is_silent() {
        let (pool, start) = triangle_pool();
        let mut count = 0;
        let result = walk_all_edges(&pool, start, |_| {
            count += 1;
            Err(SubdivisionError::Cancelled)
        });
        assert!(result.is_ok());
        assert_eq!(count, 1);
    }

    #[test]
    fn edge_walk_propagates_real_errors() {
        let (pool, start) = triangle_pool();
        let result = walk_all_edges(&pool, start, |_| {
            Err(SubdivisionError::AssumptionFailed {
                what: "forced failure",
            })
        });
        assert!(matches!(
            result,
            Err(SubdivisionError::AssumptionFailed { .. })
        ));
    }

    #[test]
    fn face_walk_finds_both_faces_of_a_triangle() {
        let (pool, start) = triangle_pool();
        let mut rings = Vec::new();
        walk_all_triangle_edges(&pool, start, |ring| {
            rings.push(ring.to_vec());
            Ok(())
        })
        .unwrap();

        // Interior face plus the outer face.
        assert_eq!(rings.len(), 2);
        for ring in &rings {
            assert_eq!(ring.len(), 3);
        }
    }
}
