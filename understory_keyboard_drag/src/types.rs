// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared value types: the dragged subtree and connection candidates.

use smallvec::SmallVec;

/// A proposed connection between a point on the dragged subtree and a point in the document.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConnectionCandidate<P> {
    /// Point on the dragged subtree that is compatible with `neighbour`.
    pub local: P,
    /// Point in the document that is compatible with `local`.
    pub neighbour: P,
    /// Distance between both points.
    ///
    /// Always `0.0` for candidates found by directional search, where proximity
    /// plays no part.
    pub distance: f64,
}

impl<P> ConnectionCandidate<P> {
    /// A candidate found by directional search.
    pub fn constrained(local: P, neighbour: P) -> Self {
        Self {
            local,
            neighbour,
            distance: 0.0,
        }
    }
}

/// The stack being dragged, as seen by candidate search.
///
/// The host captures this when the drag starts. Apart from the attachment
/// points listed here the subtree is opaque.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DraggedSubtree<P> {
    /// The root block's own attachment points, in declaration order.
    pub points: SmallVec<[P; 4]>,
    /// The root block's own successor point, if any.
    pub root_successor: Option<P>,
    /// The successor point at the end of the dragged stack's internal chain, if any.
    pub tail_successor: Option<P>,
    /// The parent-side point the root was attached to before the drag started.
    pub start_parent: Option<P>,
}

impl<P: Copy> DraggedSubtree<P> {
    /// A subtree exposing `points` and nothing else.
    pub fn new(points: impl IntoIterator<Item = P>) -> Self {
        Self {
            points: points.into_iter().collect(),
            root_successor: None,
            tail_successor: None,
            start_parent: None,
        }
    }

    /// Record the root's successor point and the successor point at the end of the stack.
    pub fn with_successors(mut self, root: Option<P>, tail: Option<P>) -> Self {
        self.root_successor = root;
        self.tail_successor = tail;
        self
    }

    /// Record the parent point the root was attached to.
    pub fn with_start_parent(mut self, parent: Option<P>) -> Self {
        self.start_parent = parent;
        self
    }
}
