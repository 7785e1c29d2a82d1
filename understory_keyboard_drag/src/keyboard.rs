// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard drag strategy: directional steps over a proximity fallback.
//!
//! ## States
//!
//! ```text
//!            start_drag             step with direction
//!   Idle ──────────────▶ Unconstrained ◀──────────────▶ Constrained
//!     ▲                   step without direction            │
//!     └────────────────────── end_drag ─────────────────────┘
//! ```
//!
//! - In `Constrained`, candidates come from [`ConstrainedSearch`] walking the
//!   document from the search anchor, and a new candidate always replaces the
//!   current one.
//! - In `Unconstrained`, every call is forwarded to the fallback strategy
//!   unmodified.
//!
//! The search anchor starts at the point the subtree was attached to when the
//! drag began and advances with each directional candidate, so it persists
//! across unconstrained steps within the same drag.

use crate::host::DragHost;
use crate::local::local_attachments;
use crate::search::{ConstrainedSearch, SearchState};
use crate::strategy::{DragStep, DragStrategy, ProximityStrategy, SnapConfig};
use crate::types::{ConnectionCandidate, DraggedSubtree};

/// Mode of a [`KeyboardDragStrategy`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragMode {
    /// No drag in progress.
    #[default]
    Idle,
    /// Dragging; the last step carried no direction.
    Unconstrained,
    /// Dragging; the last step carried a direction.
    Constrained,
}

/// Directional drag strategy composed over a fallback strategy.
#[derive(Clone, Debug)]
pub struct KeyboardDragStrategy<P, U = ProximityStrategy> {
    mode: DragMode,
    search: Option<SearchState<P>>,
    engine: ConstrainedSearch,
    fallback: U,
}

impl<P> Default for KeyboardDragStrategy<P, ProximityStrategy> {
    fn default() -> Self {
        Self::new(SnapConfig::default())
    }
}

impl<P> KeyboardDragStrategy<P, ProximityStrategy> {
    /// Keyboard strategy over a [`ProximityStrategy`], both configured by `config`.
    pub fn new(config: SnapConfig) -> Self {
        Self {
            mode: DragMode::Idle,
            search: None,
            engine: ConstrainedSearch {
                tolerance: config.constrained_tolerance,
            },
            fallback: ProximityStrategy::new(config),
        }
    }
}

impl<P, U> KeyboardDragStrategy<P, U> {
    /// Keyboard strategy over an arbitrary fallback.
    ///
    /// Directional search uses [`ConstrainedSearch::default`], whose tolerance
    /// is [`CONSTRAINED_TOLERANCE`](crate::CONSTRAINED_TOLERANCE) regardless of
    /// any [`SnapConfig`] the fallback carries. Chain
    /// [`with_engine`](Self::with_engine) to use another tolerance.
    pub fn with_fallback(fallback: U) -> Self {
        Self {
            mode: DragMode::Idle,
            search: None,
            engine: ConstrainedSearch::default(),
            fallback,
        }
    }

    /// Replace the directional search engine.
    pub fn with_engine(mut self, engine: ConstrainedSearch) -> Self {
        self.engine = engine;
        self
    }

    /// Current mode.
    pub fn mode(&self) -> DragMode {
        self.mode
    }

    /// Search progress of the active drag, if any.
    pub fn search_state(&self) -> Option<&SearchState<P>> {
        self.search.as_ref()
    }

    /// The strategy used for undirected steps.
    pub fn fallback(&self) -> &U {
        &self.fallback
    }

    fn set_mode(&mut self, mode: DragMode) {
        if self.mode != mode {
            #[cfg(feature = "tracing")]
            tracing::debug!(from = ?self.mode, to = ?mode, "keyboard drag mode");
            self.mode = mode;
        }
    }
}

impl<P, U> DragStrategy<P> for KeyboardDragStrategy<P, U>
where
    P: Copy + Eq,
    U: DragStrategy<P>,
{
    fn start_drag<H>(&mut self, host: &H, subtree: &DraggedSubtree<P>)
    where
        H: DragHost<Point = P> + ?Sized,
    {
        self.search = Some(SearchState::new(subtree.start_parent));
        self.set_mode(DragMode::Unconstrained);
        self.fallback.start_drag(host, subtree);
    }

    fn connection_candidate<H>(
        &mut self,
        host: &H,
        subtree: &DraggedSubtree<P>,
        step: &DragStep,
        current: Option<&ConnectionCandidate<P>>,
    ) -> Option<ConnectionCandidate<P>>
    where
        H: DragHost<Point = P> + ?Sized,
    {
        let state = self
            .search
            .get_or_insert_with(|| SearchState::new(subtree.start_parent));
        state.direction = step.direction;
        if step.direction.is_none() {
            self.set_mode(DragMode::Unconstrained);
            return self
                .fallback
                .connection_candidate(host, subtree, step, current);
        }
        let found = self.engine.step(host, state, &local_attachments(subtree));
        self.set_mode(DragMode::Constrained);
        found
    }

    fn is_candidate_better<H>(
        &self,
        host: &H,
        current: &ConnectionCandidate<P>,
        new: &ConnectionCandidate<P>,
    ) -> bool
    where
        H: DragHost<Point = P> + ?Sized,
    {
        match self.mode {
            DragMode::Constrained => true,
            DragMode::Idle | DragMode::Unconstrained => {
                self.fallback.is_candidate_better(host, current, new)
            }
        }
    }

    fn is_constrained(&self) -> bool {
        self.mode == DragMode::Constrained
    }

    fn end_drag(&mut self) {
        self.search = None;
        self.set_mode(DragMode::Idle);
        self.fallback.end_drag();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use crate::testing::LinearDoc;
    use kurbo::{Point, Vec2};

    const LOCAL: u32 = 100;

    fn step(direction: Option<Direction>) -> DragStep {
        DragStep {
            delta: Vec2::ZERO,
            direction,
        }
    }

    fn subtree(start_parent: Option<u32>) -> DraggedSubtree<u32> {
        DraggedSubtree::new([LOCAL]).with_start_parent(start_parent)
    }

    #[test]
    fn lifecycle_moves_through_modes() {
        let doc = LinearDoc::chain(3).pair_all(LOCAL);
        let dragged = subtree(Some(0));
        let mut strategy = KeyboardDragStrategy::<u32>::default();
        assert_eq!(strategy.mode(), DragMode::Idle);

        strategy.start_drag(&doc, &dragged);
        assert_eq!(strategy.mode(), DragMode::Unconstrained);
        assert_eq!(strategy.search_state().and_then(|s| s.anchor), Some(0));

        let found =
            strategy.connection_candidate(&doc, &dragged, &step(Some(Direction::Down)), None);
        assert_eq!(found.map(|c| c.neighbour), Some(1));
        assert!(strategy.is_constrained());

        strategy.connection_candidate(&doc, &dragged, &step(None), found.as_ref());
        assert_eq!(strategy.mode(), DragMode::Unconstrained);

        strategy.end_drag();
        assert_eq!(strategy.mode(), DragMode::Idle);
        assert!(strategy.search_state().is_none());
    }

    #[test]
    fn constrained_always_prefers_new_candidate() {
        let doc = LinearDoc::chain(3).pair_all(LOCAL);
        let dragged = subtree(Some(0));
        let mut strategy = KeyboardDragStrategy::<u32>::default();
        strategy.start_drag(&doc, &dragged);
        strategy.connection_candidate(&doc, &dragged, &step(Some(Direction::Down)), None);

        let near = ConnectionCandidate {
            local: LOCAL,
            neighbour: 1,
            distance: 0.0,
        };
        let far = ConnectionCandidate {
            local: LOCAL,
            neighbour: 2,
            distance: 1000.0,
        };
        assert!(strategy.is_candidate_better(&doc, &near, &far));
    }

    #[test]
    fn unconstrained_delegates_to_fallback() {
        let doc = LinearDoc::chain(2)
            .pair_all(LOCAL)
            .at(LOCAL, Point::ORIGIN)
            .at(0, (0.0, 10.0))
            .at(1, (0.0, 200.0));
        let dragged = subtree(Some(1));
        let mut strategy = KeyboardDragStrategy::<u32>::default();
        strategy.start_drag(&doc, &dragged);

        let found = strategy
            .connection_candidate(&doc, &dragged, &step(None), None)
            .unwrap();
        assert_eq!((found.neighbour, found.distance), (0, 10.0));
        assert!(!strategy.is_constrained());

        let near = ConnectionCandidate {
            local: LOCAL,
            neighbour: 0,
            distance: 10.0,
        };
        let far = ConnectionCandidate {
            local: LOCAL,
            neighbour: 1,
            distance: 200.0,
        };
        assert!(!strategy.is_candidate_better(&doc, &near, &far));
    }

    #[test]
    fn anchor_survives_unconstrained_steps() {
        let doc = LinearDoc::chain(4).pair_all(LOCAL);
        let dragged = subtree(Some(0));
        let mut strategy = KeyboardDragStrategy::<u32>::default();
        strategy.start_drag(&doc, &dragged);

        strategy.connection_candidate(&doc, &dragged, &step(Some(Direction::Down)), None);
        strategy.connection_candidate(&doc, &dragged, &step(None), None);
        let found =
            strategy.connection_candidate(&doc, &dragged, &step(Some(Direction::Right)), None);
        assert_eq!(found.map(|c| c.neighbour), Some(2));
    }

    #[test]
    fn no_start_parent_means_no_directional_candidate() {
        let doc = LinearDoc::chain(3).pair_all(LOCAL);
        let dragged = subtree(None);
        let mut strategy = KeyboardDragStrategy::<u32>::default();
        strategy.start_drag(&doc, &dragged);
        for dir in [Direction::Up, Direction::Down] {
            assert_eq!(
                strategy.connection_candidate(&doc, &dragged, &step(Some(dir)), None),
                None
            );
            assert!(strategy.is_constrained());
        }
    }

    #[test]
    fn custom_fallback_searches_with_default_tolerance() {
        let strategy = KeyboardDragStrategy::<u32, _>::with_fallback(ProximityStrategy::new(
            SnapConfig {
                constrained_tolerance: 50.0,
                ..SnapConfig::default()
            },
        ));
        assert_eq!(strategy.engine, ConstrainedSearch::default());
    }

    #[test]
    fn engine_tolerance_limits_directional_search() {
        let doc = LinearDoc::chain(3)
            .pair_all(LOCAL)
            .at(LOCAL, Point::ORIGIN)
            .at(0, Point::ORIGIN)
            .at(1, (0.0, 100.0))
            .at(2, (0.0, 30.0));
        let dragged = subtree(Some(0));
        let down = step(Some(Direction::Down));

        let mut wide = KeyboardDragStrategy::<u32, _>::with_fallback(ProximityStrategy::default());
        wide.start_drag(&doc, &dragged);
        let found = wide.connection_candidate(&doc, &dragged, &down, None);
        assert_eq!(found.map(|c| c.neighbour), Some(1));

        let mut narrow = KeyboardDragStrategy::<u32, _>::with_fallback(ProximityStrategy::default())
            .with_engine(ConstrainedSearch { tolerance: 50.0 });
        narrow.start_drag(&doc, &dragged);
        let found = narrow.connection_candidate(&doc, &dragged, &down, None);
        assert_eq!(found.map(|c| c.neighbour), Some(2));
    }

    #[test]
    fn new_drag_restarts_from_its_own_parent() {
        let doc = LinearDoc::chain(5).pair_all(LOCAL);
        let mut strategy = KeyboardDragStrategy::<u32>::default();

        let first = subtree(Some(0));
        strategy.start_drag(&doc, &first);
        strategy.connection_candidate(&doc, &first, &step(Some(Direction::Down)), None);
        strategy.connection_candidate(&doc, &first, &step(Some(Direction::Down)), None);
        strategy.end_drag();

        let second = subtree(Some(3));
        strategy.start_drag(&doc, &second);
        let found =
            strategy.connection_candidate(&doc, &second, &step(Some(Direction::Up)), None);
        assert_eq!(found.map(|c| c.neighbour), Some(2));
    }
}
