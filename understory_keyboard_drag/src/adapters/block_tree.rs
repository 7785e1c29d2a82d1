// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Understory Block Tree.
//!
//! ## Feature
//!
//! Enable with `block_tree_adapter`.
//!
//! ## Notes
//!
//! [`BlockTree`] implements [`DocumentOrder`] over [`DocNode`]s, and
//! [`ConnectionChecker`] and [`PointLocator`] over [`PointId`]s, so it can be
//! passed directly as the host of a [`Dragger`](crate::Dragger).
//!
//! The drag itself does not touch the tree. Use [`begin_drag`] to detach the
//! block and capture its [`DraggedSubtree`], then either [`commit`] the
//! candidate returned on drop or [`revert`] the subtree returned on cancel.
//!
//! ```rust
//! use kurbo::Vec2;
//! use understory_block_tree::{BlockDef, BlockTree, ConnectionKind};
//! use understory_keyboard_drag::adapters::block_tree::{begin_drag, commit};
//! use understory_keyboard_drag::{Direction, Dragger, KeyboardDragStrategy};
//!
//! let mut tree = BlockTree::new();
//! let a = tree.insert(BlockDef::statement("a"));
//! let b = tree.insert(BlockDef::statement("b"));
//! let c = tree.insert(BlockDef::statement("c"));
//! for (upper, lower) in [(a, b), (b, c)] {
//!     let next = tree.next_point(upper).unwrap();
//!     let prev = tree.point_of_kind(lower, ConnectionKind::Previous).unwrap();
//!     tree.connect(next, prev).unwrap();
//! }
//!
//! // Pick up `c` and move it one slot up, between `a` and `b`.
//! let subtree = begin_drag(&mut tree, c, true).unwrap();
//! let mut dragger: Dragger<_, KeyboardDragStrategy<_>> = Dragger::default();
//! dragger.start(&tree, subtree);
//! dragger.drag(&tree, Vec2::ZERO, Some(Direction::Up.tilt()));
//! commit(&mut tree, &dragger.end().unwrap()).unwrap();
//!
//! assert_eq!(tree.next_block(a), Some(c));
//! assert_eq!(tree.next_block(c), Some(b));
//! ```

use understory_block_tree::{BlockFlags, BlockId, BlockTree, ConnectError, DocNode, PointId};

use crate::host::{ConnectionChecker, DocumentOrder, PointLocator};
use crate::types::{ConnectionCandidate, DraggedSubtree};

impl DocumentOrder for BlockTree {
    type Node = DocNode;
    type Point = PointId;

    fn next_node<F>(&self, from: DocNode, is_valid: F) -> Option<DocNode>
    where
        F: FnMut(DocNode) -> bool,
    {
        self.next_in_order(from, is_valid)
    }

    fn prev_node<F>(&self, from: DocNode, is_valid: F) -> Option<DocNode>
    where
        F: FnMut(DocNode) -> bool,
    {
        self.prev_in_order(from, is_valid)
    }

    fn point_at(&self, node: DocNode) -> Option<PointId> {
        node.point()
    }

    fn node_of(&self, point: PointId) -> DocNode {
        DocNode::Point(point)
    }
}

impl ConnectionChecker<PointId> for BlockTree {
    fn can_connect(&self, a: PointId, b: PointId, is_drag: bool, tolerance: f64) -> bool {
        Self::can_connect(self, a, b, is_drag, tolerance)
    }
}

impl PointLocator<PointId> for BlockTree {
    fn position(&self, point: PointId) -> Option<kurbo::Point> {
        self.point_position(point)
    }

    fn for_each_point<F: FnMut(PointId)>(&self, f: F) {
        Self::for_each_point(self, f);
    }
}

/// Detach `block` for dragging and describe it as a [`DraggedSubtree`].
///
/// With `heal`, only `block` (and its nested children) is picked up and its
/// follower takes its place; otherwise the rest of its stack comes along.
///
/// Returns `None` for stale, immovable, or shadow blocks, leaving the tree
/// untouched.
pub fn begin_drag(
    tree: &mut BlockTree,
    block: BlockId,
    heal: bool,
) -> Option<DraggedSubtree<PointId>> {
    let flags = tree.flags(block)?;
    if !flags.contains(BlockFlags::MOVABLE) || flags.contains(BlockFlags::SHADOW) {
        return None;
    }
    let start_parent = tree.unplug(block, heal);
    Some(
        DraggedSubtree::new(tree.points_of(block))
            .with_successors(tree.next_point(block), tree.last_connection_in_stack(block))
            .with_start_parent(start_parent),
    )
}

/// Connect the dropped subtree according to `candidate`.
///
/// The dragged stack is first moved so that the local point lands on the
/// neighbour, then both points are connected.
pub fn commit(
    tree: &mut BlockTree,
    candidate: &ConnectionCandidate<PointId>,
) -> Result<(), ConnectError> {
    let (Some(from), Some(to), Some(root)) = (
        tree.point_position(candidate.local),
        tree.point_position(candidate.neighbour),
        tree.root_of(candidate.local.block),
    ) else {
        return Err(ConnectError::Stale);
    };
    tree.translate(root, to - from);
    tree.connect(candidate.local, candidate.neighbour)
}

/// Put a cancelled subtree back where [`begin_drag`] found it.
///
/// Reconnects the subtree's upper point to its start parent. A subtree that
/// started at the top level is left where it is.
pub fn revert(
    tree: &mut BlockTree,
    subtree: &DraggedSubtree<PointId>,
) -> Result<(), ConnectError> {
    let Some(parent) = subtree.start_parent else {
        return Ok(());
    };
    let parent_kind = tree.point_kind(parent).ok_or(ConnectError::Stale)?;
    let upper = subtree
        .points
        .iter()
        .copied()
        .find(|&p| tree.point_kind(p).is_some_and(|k| k.pairs_with(parent_kind)))
        .ok_or(ConnectError::WrongKind)?;
    tree.connect(upper, parent)
}
