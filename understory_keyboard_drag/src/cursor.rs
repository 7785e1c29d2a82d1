// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stepping between attachment points in document order.

use crate::direction::Step;
use crate::host::DocumentOrder;

/// Walks a [`DocumentOrder`] one attachment point at a time.
///
/// Nodes that are not attachment points are skipped. The cursor only follows
/// structure; it never asks whether a point is compatible with anything.
#[derive(Debug)]
pub struct DocumentCursor<'a, D: ?Sized> {
    doc: &'a D,
}

impl<D: ?Sized> Clone for DocumentCursor<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for DocumentCursor<'_, D> {}

impl<'a, D: DocumentOrder + ?Sized> DocumentCursor<'a, D> {
    /// Create a cursor over `doc`.
    pub fn new(doc: &'a D) -> Self {
        Self { doc }
    }

    /// The attachment point before `from` in document order.
    pub fn previous(&self, from: D::Point) -> Option<D::Point> {
        let node = self
            .doc
            .prev_node(self.doc.node_of(from), |n| self.doc.point_at(n).is_some())?;
        self.doc.point_at(node)
    }

    /// The attachment point after `from` in document order.
    pub fn next(&self, from: D::Point) -> Option<D::Point> {
        let node = self
            .doc
            .next_node(self.doc.node_of(from), |n| self.doc.point_at(n).is_some())?;
        self.doc.point_at(node)
    }

    /// Step once from `from` in the given direction of travel.
    pub fn step(&self, from: D::Point, step: Step) -> Option<D::Point> {
        match step {
            Step::Backward => self.previous(from),
            Step::Forward => self.next(from),
        }
    }
}
