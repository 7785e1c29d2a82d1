// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag strategies: how a drag step turns into a connection candidate.
//!
//! A [`DragStrategy`] is asked for a candidate on every drag step and decides
//! whether a freshly found candidate should replace the one currently shown.
//! [`ProximityStrategy`] is the pointer-style default: it proposes the closest
//! compatible pair within a snap radius and prefers to keep the current
//! candidate unless another one is clearly closer.

use kurbo::Vec2;

use crate::direction::Direction;
use crate::host::DragHost;
use crate::local::local_attachments;
use crate::search::CONSTRAINED_TOLERANCE;
use crate::types::{ConnectionCandidate, DraggedSubtree};

/// Distances used by drag strategies.
///
/// All distances are in workspace units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapConfig {
    /// Maximum distance for a candidate when none is currently shown.
    pub snap_radius: f64,
    /// Maximum distance for a candidate while one is already shown.
    pub connecting_snap_radius: f64,
    /// How much closer a new candidate must be to replace the current one.
    pub current_connection_preference: f64,
    /// Tolerance used by directional search.
    pub constrained_tolerance: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snap_radius: 28.0,
            connecting_snap_radius: 48.0,
            current_connection_preference: 8.0,
            constrained_tolerance: CONSTRAINED_TOLERANCE,
        }
    }
}

/// One movement event of a drag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragStep {
    /// Total offset of the dragged subtree from where the drag started.
    ///
    /// Host positions of the dragged subtree's points are taken as they were
    /// when the drag started; strategies add `delta` to them.
    pub delta: Vec2,
    /// Direction resolved from the event's tilt signal, if any.
    pub direction: Option<Direction>,
}

/// Source of connection candidates during a drag.
pub trait DragStrategy<P> {
    /// Called once when a drag begins.
    fn start_drag<H>(&mut self, host: &H, subtree: &DraggedSubtree<P>)
    where
        H: DragHost<Point = P> + ?Sized;

    /// Propose a candidate for this step.
    ///
    /// `current` is the candidate shown before this step, if any.
    fn connection_candidate<H>(
        &mut self,
        host: &H,
        subtree: &DraggedSubtree<P>,
        step: &DragStep,
        current: Option<&ConnectionCandidate<P>>,
    ) -> Option<ConnectionCandidate<P>>
    where
        H: DragHost<Point = P> + ?Sized;

    /// Whether `new` should replace `current`.
    fn is_candidate_better<H>(
        &self,
        host: &H,
        current: &ConnectionCandidate<P>,
        new: &ConnectionCandidate<P>,
    ) -> bool
    where
        H: DragHost<Point = P> + ?Sized;

    /// Whether the most recent step was a directional one.
    fn is_constrained(&self) -> bool {
        false
    }

    /// Called once when the drag ends, whether dropped or cancelled.
    fn end_drag(&mut self);
}

/// Closest compatible pair within a snap radius.
///
/// Local points are measured at their drag-start position moved by the step's
/// [`delta`](DragStep::delta).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ProximityStrategy {
    /// Radii and preference.
    pub config: SnapConfig,
    /// Offset of the most recent step.
    delta: Vec2,
}

impl ProximityStrategy {
    /// Create a strategy using `config`.
    pub fn new(config: SnapConfig) -> Self {
        Self {
            config,
            delta: Vec2::ZERO,
        }
    }

    /// Current distance between both points of `candidate`, falling back to the
    /// recorded distance when a position is unknown.
    fn live_distance<H, P>(&self, host: &H, candidate: &ConnectionCandidate<P>) -> f64
    where
        H: DragHost<Point = P> + ?Sized,
        P: Copy,
    {
        match (
            host.position(candidate.local),
            host.position(candidate.neighbour),
        ) {
            (Some(a), Some(b)) => (a + self.delta).distance(b),
            _ => candidate.distance,
        }
    }
}

impl<P: Copy + Eq> DragStrategy<P> for ProximityStrategy {
    fn start_drag<H>(&mut self, _host: &H, _subtree: &DraggedSubtree<P>)
    where
        H: DragHost<Point = P> + ?Sized,
    {
        self.delta = Vec2::ZERO;
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
        let radius = if current.is_some() {
            self.config.connecting_snap_radius
        } else {
            self.config.snap_radius
        };
        self.delta = step.delta;
        // Host positions of local points lag by `delta`; widen the checker's
        // tolerance so its own distance test cannot refuse an in-range pair.
        let tolerance = radius + step.delta.hypot();
        let local = local_attachments(subtree);
        let mut best: Option<ConnectionCandidate<P>> = None;
        for &l in &local {
            let Some(start) = host.position(l) else {
                continue;
            };
            let from = start + step.delta;
            host.for_each_point(|b| {
                if local.contains(&b) {
                    return;
                }
                let Some(to) = host.position(b) else {
                    return;
                };
                let distance = from.distance(to);
                let closer = best.as_ref().is_none_or(|c| distance < c.distance);
                if distance <= radius && closer && host.can_connect(l, b, true, tolerance) {
                    best = Some(ConnectionCandidate {
                        local: l,
                        neighbour: b,
                        distance,
                    });
                }
            });
        }
        best
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
        let current_distance = self.live_distance(host, current);
        new.distance < current_distance - self.config.current_connection_preference
    }

    fn end_drag(&mut self) {
        self.delta = Vec2::ZERO;
    }
}
