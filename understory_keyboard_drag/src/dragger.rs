// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag lifecycle: start, move, drop, cancel.
//!
//! [`Dragger`] drives one gesture at a time over any [`DragStrategy`]. It keeps
//! at most one current candidate and applies the strategy's preference on
//! every step. It never mutates the document: on drop it hands the candidate
//! back so the host can connect it, and on cancel it hands the subtree back so
//! the host can put it where it was.
//!
//! A step that yields no candidate clears the current one, except during a
//! directional step where the current candidate stays in place.

use core::fmt::Debug;

use kurbo::Vec2;

use crate::direction::resolve;
use crate::host::DragHost;
use crate::strategy::{DragStep, DragStrategy};
use crate::types::{ConnectionCandidate, DraggedSubtree};

/// Drives a single drag gesture.
#[derive(Clone, Debug)]
pub struct Dragger<P, S> {
    strategy: S,
    subtree: Option<DraggedSubtree<P>>,
    candidate: Option<ConnectionCandidate<P>>,
    has_moved: bool,
}

impl<P, S: Default> Default for Dragger<P, S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<P, S> Dragger<P, S> {
    /// Create an idle dragger using `strategy`.
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            subtree: None,
            candidate: None,
            has_moved: false,
        }
    }

    /// The candidate currently proposed, if any.
    pub fn candidate(&self) -> Option<&ConnectionCandidate<P>> {
        self.candidate.as_ref()
    }

    /// The subtree being dragged, if a gesture is active.
    pub fn subtree(&self) -> Option<&DraggedSubtree<P>> {
        self.subtree.as_ref()
    }

    /// Whether a gesture is active.
    pub fn is_dragging(&self) -> bool {
        self.subtree.is_some()
    }

    /// Whether the active gesture has seen at least one movement.
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// The strategy driving candidate search.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }
}

impl<P, S> Dragger<P, S>
where
    P: Copy + Eq + Debug,
    S: DragStrategy<P>,
{
    /// Whether the last step was directional.
    ///
    /// Hosts can use this to draw a distinct preview for keyboard moves.
    pub fn is_constrained(&self) -> bool {
        self.is_dragging() && self.strategy.is_constrained()
    }

    /// Begin dragging `subtree`. An active gesture is cancelled first.
    pub fn start<H>(&mut self, host: &H, subtree: DraggedSubtree<P>)
    where
        H: DragHost<Point = P> + ?Sized,
    {
        if self.is_dragging() {
            self.cancel();
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(start_parent = ?subtree.start_parent, "drag start");
        self.strategy.start_drag(host, &subtree);
        self.subtree = Some(subtree);
        self.candidate = None;
        self.has_moved = false;
    }

    /// Process one movement.
    ///
    /// `delta` is the total offset from the drag start and `tilt` the raw
    /// directional signal of the event, if it carried one. Returns the
    /// candidate proposed after this step.
    pub fn drag<H>(
        &mut self,
        host: &H,
        delta: Vec2,
        tilt: Option<Vec2>,
    ) -> Option<&ConnectionCandidate<P>>
    where
        H: DragHost<Point = P> + ?Sized,
    {
        let subtree = self.subtree.as_ref()?;
        let step = DragStep {
            delta,
            direction: resolve(tilt),
        };
        let found =
            self.strategy
                .connection_candidate(host, subtree, &step, self.candidate.as_ref());
        self.has_moved = true;
        match (found, self.candidate.as_ref()) {
            (Some(new), Some(current)) => {
                let same = new.local == current.local && new.neighbour == current.neighbour;
                if same || self.strategy.is_candidate_better(host, current, &new) {
                    self.candidate = Some(new);
                }
            }
            (Some(new), None) => self.candidate = Some(new),
            (None, _) => {
                if !self.strategy.is_constrained() {
                    self.candidate = None;
                }
            }
        }
        self.candidate.as_ref()
    }

    /// Drop the subtree. Returns the candidate the host should connect, if any.
    pub fn end(&mut self) -> Option<ConnectionCandidate<P>> {
        self.subtree.take()?;
        self.strategy.end_drag();
        #[cfg(feature = "tracing")]
        tracing::debug!(connect = self.candidate.is_some(), "drag end");
        self.candidate.take()
    }

    /// Abandon the gesture without connecting anything.
    ///
    /// Returns the dragged subtree so the host can restore it, including its
    /// `start_parent` connection.
    pub fn cancel(&mut self) -> Option<DraggedSubtree<P>> {
        let subtree = self.subtree.take()?;
        self.strategy.end_drag();
        self.candidate = None;
        #[cfg(feature = "tracing")]
        tracing::debug!("drag cancelled");
        Some(subtree)
    }
}
