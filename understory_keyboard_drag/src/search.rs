// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional candidate search through document order.
//!
//! ## Algorithm
//!
//! Starting from an anchor point, the cursor steps one attachment point at a
//! time (backward for `Up`/`Left`, forward for `Down`/`Right`). At every visited
//! point each local point of the dragged subtree is tested in enumeration order;
//! the first compatible pair ends the walk. If the walk runs off either end of
//! the document there is no candidate.
//!
//! After a successful step the anchor moves to the point just found, so repeated
//! key presses step through successive attachment points instead of restarting
//! from where the drag began.
//!
//! ```rust
//! # use kurbo::Point;
//! # use understory_keyboard_drag::{
//! #     ConnectionChecker, ConstrainedSearch, Direction, DocumentOrder, PointLocator, SearchState,
//! # };
//! // Five attachment points in a row; the dragged point (99) fits the odd ones.
//! struct Row;
//! impl DocumentOrder for Row {
//!     type Node = u32;
//!     type Point = u32;
//!     fn next_node<F: FnMut(u32) -> bool>(&self, from: u32, mut ok: F) -> Option<u32> {
//!         (from + 1..5).find(|&n| ok(n))
//!     }
//!     fn prev_node<F: FnMut(u32) -> bool>(&self, from: u32, mut ok: F) -> Option<u32> {
//!         (0..from).rev().find(|&n| ok(n))
//!     }
//!     fn point_at(&self, node: u32) -> Option<u32> { Some(node) }
//!     fn node_of(&self, point: u32) -> u32 { point }
//! }
//! impl ConnectionChecker<u32> for Row {
//!     fn can_connect(&self, _a: u32, b: u32, _drag: bool, _tol: f64) -> bool { b % 2 == 1 }
//! }
//! impl PointLocator<u32> for Row {
//!     fn position(&self, _p: u32) -> Option<Point> { None }
//!     fn for_each_point<F: FnMut(u32)>(&self, f: F) { (0..5).for_each(f) }
//! }
//!
//! let engine = ConstrainedSearch::default();
//! let mut state = SearchState::new(Some(0));
//! state.direction = Some(Direction::Down);
//!
//! assert_eq!(engine.step(&Row, &mut state, &[99]).map(|c| c.neighbour), Some(1));
//! assert_eq!(engine.step(&Row, &mut state, &[99]).map(|c| c.neighbour), Some(3));
//! // Nothing compatible past 3: no candidate, and the anchor stays put.
//! assert_eq!(engine.step(&Row, &mut state, &[99]), None);
//! assert_eq!(state.anchor, Some(3));
//! ```

use crate::cursor::DocumentCursor;
use crate::direction::Direction;
use crate::host::{ConnectionChecker, DocumentOrder};
use crate::types::ConnectionCandidate;

/// Tolerance passed to the connection checker during directional search.
///
/// Large enough that geometric proximity never gates a directional candidate.
pub const CONSTRAINED_TOLERANCE: f64 = 2000.0;

/// Search progress for one drag gesture.
///
/// Created when the drag starts and dropped when it ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchState<P> {
    /// Point the next directional step starts from.
    pub anchor: Option<P>,
    /// Direction resolved for the most recent drag step.
    pub direction: Option<Direction>,
}

impl<P> SearchState<P> {
    /// Start a search anchored at `anchor` (typically the point the dragged
    /// subtree was attached to before the drag).
    pub fn new(anchor: Option<P>) -> Self {
        Self {
            anchor,
            direction: None,
        }
    }
}

/// Directional candidate search engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstrainedSearch {
    /// Tolerance passed to [`ConnectionChecker::can_connect`].
    pub tolerance: f64,
}

impl Default for ConstrainedSearch {
    fn default() -> Self {
        Self {
            tolerance: CONSTRAINED_TOLERANCE,
        }
    }
}

impl ConstrainedSearch {
    /// Find the first compatible pair walking from `anchor` in `direction`.
    ///
    /// Returns `None` immediately when there is no direction or no anchor, and
    /// `None` when the walk exhausts the document. Among local points compatible
    /// with the same neighbour, the first in `local` wins.
    pub fn search<H>(
        &self,
        host: &H,
        direction: Option<Direction>,
        anchor: Option<H::Point>,
        local: &[H::Point],
    ) -> Option<ConnectionCandidate<H::Point>>
    where
        H: DocumentOrder + ConnectionChecker<<H as DocumentOrder>::Point> + ?Sized,
    {
        let step = direction?.step();
        let mut cursor = anchor?;
        let doc = DocumentCursor::new(host);
        loop {
            let Some(next) = doc.step(cursor, step) else {
                #[cfg(feature = "tracing")]
                tracing::trace!(?step, "directional search exhausted the document");
                return None;
            };
            cursor = next;
            if let Some(&l) = local
                .iter()
                .find(|&&l| host.can_connect(l, cursor, true, self.tolerance))
            {
                #[cfg(feature = "tracing")]
                tracing::trace!(local = ?l, neighbour = ?cursor, "directional candidate");
                return Some(ConnectionCandidate::constrained(l, cursor));
            }
        }
    }

    /// Run [`search`](Self::search) from `state` and advance its anchor on success.
    ///
    /// A failed step leaves `state` untouched, so the next step can search again
    /// from the same anchor.
    pub fn step<H>(
        &self,
        host: &H,
        state: &mut SearchState<H::Point>,
        local: &[H::Point],
    ) -> Option<ConnectionCandidate<H::Point>>
    where
        H: DocumentOrder + ConnectionChecker<<H as DocumentOrder>::Point> + ?Sized,
    {
        let candidate = self.search(host, state.direction, state.anchor, local)?;
        state.anchor = Some(candidate.neighbour);
        Some(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::LinearDoc;
    use alloc::vec::Vec;

    const LOCAL: u32 = 100;

    #[test]
    fn no_direction_or_anchor_means_no_search() {
        let doc = LinearDoc::chain(3).pair_all(LOCAL);
        let engine = ConstrainedSearch::default();
        assert_eq!(engine.search(&doc, None, Some(0), &[LOCAL]), None);
        assert_eq!(engine.search(&doc, Some(Direction::Down), None, &[LOCAL]), None);
    }

    #[test]
    fn document_without_points_finds_nothing() {
        let doc = LinearDoc::from_nodes(&[false, false, false, false]).pair_all(LOCAL);
        let engine = ConstrainedSearch::default();
        for dir in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            for anchor in 0..4 {
                assert_eq!(engine.search(&doc, Some(dir), Some(anchor), &[LOCAL]), None);
            }
        }
    }

    #[test]
    fn stepping_down_visits_each_point_once() {
        // Head (0) plus a chain of five points, all compatible.
        let n = 5;
        let doc = LinearDoc::chain(n + 1).pair_all(LOCAL);
        let engine = ConstrainedSearch::default();
        let mut state = SearchState::new(Some(0));
        state.direction = Some(Direction::Down);

        let visited: Vec<u32> = (0..n)
            .filter_map(|_| engine.step(&doc, &mut state, &[LOCAL]))
            .map(|c| c.neighbour)
            .collect();
        assert_eq!(visited, [1, 2, 3, 4, 5]);
        assert_eq!(engine.step(&doc, &mut state, &[LOCAL]), None);
        assert_eq!(state.anchor, Some(5));
    }

    #[test]
    fn reversing_continues_from_last_anchor() {
        let doc = LinearDoc::chain(6).pair_all(LOCAL);
        let engine = ConstrainedSearch::default();
        let mut state = SearchState::new(Some(0));

        state.direction = Some(Direction::Down);
        engine.step(&doc, &mut state, &[LOCAL]);
        let down = engine.step(&doc, &mut state, &[LOCAL]).unwrap();
        assert_eq!(down.neighbour, 2);

        state.direction = Some(Direction::Up);
        let up = engine.step(&doc, &mut state, &[LOCAL]).unwrap();
        assert_eq!(up.neighbour, 1);
        assert_eq!(state.anchor, Some(1));
    }

    #[test]
    fn left_and_right_walk_like_up_and_down() {
        let doc = LinearDoc::chain(5).pair_all(LOCAL);
        let engine = ConstrainedSearch::default();
        let found = |dir| {
            engine
                .search(&doc, Some(dir), Some(2), &[LOCAL])
                .map(|c| c.neighbour)
        };
        assert_eq!(found(Direction::Right), found(Direction::Down));
        assert_eq!(found(Direction::Left), found(Direction::Up));
        assert_eq!(found(Direction::Left), Some(1));
    }

    #[test]
    fn skips_incompatible_points() {
        // A -> B -> C; only B is compatible with the dragged point.
        let (a, b, c) = (0, 1, 2);
        let doc = LinearDoc::chain(3).pair(LOCAL, b);
        let engine = ConstrainedSearch::default();
        let mut state = SearchState::new(Some(a));
        state.direction = Some(Direction::Down);

        let found = engine.step(&doc, &mut state, &[LOCAL]).unwrap();
        assert_eq!(found, ConnectionCandidate::constrained(LOCAL, b));
        assert_eq!(found.distance, 0.0);
        assert_eq!(state.anchor, Some(b));
        // C is not compatible: no candidate, anchor unchanged.
        assert_eq!(engine.step(&doc, &mut state, &[LOCAL]), None);
        assert_eq!(state.anchor, Some(b));

        // With C compatible too, the second step reaches it.
        let doc = LinearDoc::chain(3).pair(LOCAL, b).pair(LOCAL, c);
        let mut state = SearchState::new(Some(a));
        state.direction = Some(Direction::Down);
        engine.step(&doc, &mut state, &[LOCAL]);
        let second = engine.step(&doc, &mut state, &[LOCAL]).unwrap();
        assert_eq!(second.neighbour, c);
    }

    #[test]
    fn first_local_point_wins_ties() {
        let doc = LinearDoc::chain(3).pair(101, 1).pair(100, 1);
        let engine = ConstrainedSearch::default();
        let found = engine
            .search(&doc, Some(Direction::Down), Some(0), &[100, 101])
            .unwrap();
        assert_eq!(found.local, 100);
        let found = engine
            .search(&doc, Some(Direction::Down), Some(0), &[101, 100])
            .unwrap();
        assert_eq!(found.local, 101);
    }

    #[test]
    fn nearest_point_in_document_order_beats_other_local_points() {
        // Local 101 fits the neighbour right after the anchor, local 100 only a later one.
        let doc = LinearDoc::chain(4).pair(100, 3).pair(101, 1);
        let engine = ConstrainedSearch::default();
        let found = engine
            .search(&doc, Some(Direction::Down), Some(0), &[100, 101])
            .unwrap();
        assert_eq!((found.local, found.neighbour), (101, 1));
    }

    #[test]
    fn tolerance_reaches_the_checker() {
        let doc = LinearDoc::chain(2)
            .pair_all(LOCAL)
            .at(LOCAL, (0.0, 0.0))
            .at(1, (0.0, 3000.0));
        assert_eq!(
            ConstrainedSearch::default().search(&doc, Some(Direction::Down), Some(0), &[LOCAL]),
            None
        );
        let wide = ConstrainedSearch { tolerance: 5000.0 };
        assert!(
            wide.search(&doc, Some(Direction::Down), Some(0), &[LOCAL])
                .is_some()
        );
    }
}
