// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A flat document used by the unit tests.

use alloc::vec::Vec;

use kurbo::Point;

use crate::host::{ConnectionChecker, DocumentOrder, PointLocator};

/// Nodes laid out in a single line; node `i` is attachment point `i` when marked.
///
/// Local points of the dragged subtree use ids past the end of the document so
/// they never show up in document order.
#[derive(Debug, Default)]
pub(crate) struct LinearDoc {
    nodes: Vec<bool>,
    pairs: Vec<(u32, u32)>,
    wildcards: Vec<u32>,
    positions: Vec<(u32, Point)>,
}

impl LinearDoc {
    /// `n` nodes, every one an attachment point.
    pub(crate) fn chain(n: usize) -> Self {
        Self::from_nodes(&alloc::vec![true; n])
    }

    pub(crate) fn from_nodes(nodes: &[bool]) -> Self {
        Self {
            nodes: nodes.to_vec(),
            ..Self::default()
        }
    }

    /// Let `local` connect to `neighbour`.
    pub(crate) fn pair(mut self, local: u32, neighbour: u32) -> Self {
        self.pairs.push((local, neighbour));
        self
    }

    /// Let `local` connect to every document point.
    pub(crate) fn pair_all(mut self, local: u32) -> Self {
        self.wildcards.push(local);
        self
    }

    pub(crate) fn at(mut self, point: u32, position: impl Into<Point>) -> Self {
        self.positions.push((point, position.into()));
        self
    }
}

impl DocumentOrder for LinearDoc {
    type Node = usize;
    type Point = u32;

    fn next_node<F>(&self, from: usize, mut is_valid: F) -> Option<usize>
    where
        F: FnMut(usize) -> bool,
    {
        (from.saturating_add(1)..self.nodes.len()).find(|&i| is_valid(i))
    }

    fn prev_node<F>(&self, from: usize, mut is_valid: F) -> Option<usize>
    where
        F: FnMut(usize) -> bool,
    {
        (0..from.min(self.nodes.len())).rev().find(|&i| is_valid(i))
    }

    fn point_at(&self, node: usize) -> Option<u32> {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Test documents are tiny."
        )]
        let point = node as u32;
        (self.nodes.get(node) == Some(&true)).then_some(point)
    }

    fn node_of(&self, point: u32) -> usize {
        point as usize
    }
}

impl ConnectionChecker<u32> for LinearDoc {
    fn can_connect(&self, a: u32, b: u32, _is_drag: bool, tolerance: f64) -> bool {
        let paired = self.wildcards.contains(&a) || self.pairs.contains(&(a, b));
        let close = match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => pa.distance(pb) <= tolerance,
            _ => true,
        };
        paired && close
    }
}

impl PointLocator<u32> for LinearDoc {
    fn position(&self, point: u32) -> Option<Point> {
        self.positions
            .iter()
            .find(|(p, _)| *p == point)
            .map(|(_, pos)| *pos)
    }

    fn for_each_point<F: FnMut(u32)>(&self, mut f: F) {
        for node in 0..self.nodes.len() {
            if let Some(point) = self.point_at(node) {
                f(point);
            }
        }
    }
}
