// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core block tree implementation: storage, connections, checks, document order.

use alloc::{vec, vec::Vec};
use core::cmp::Ordering;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::error::ConnectError;
use crate::types::{BlockDef, BlockFlags, BlockId, ConnectionKind, DocNode, PointDef, PointId};

/// A document of connectable blocks.
///
/// Blocks are stored in generational slots; a removed block's [`BlockId`] and
/// every [`PointId`] on it become stale and are ignored by all queries.
///
/// Structure is expressed only through attachment points: a block's
/// `Previous`/`Output` point connected to another block's `Next`/`Statement`/`Input`
/// point makes the latter block its parent. Blocks whose upper point is free are
/// top blocks.
///
/// ## Example
///
/// ```rust
/// use understory_block_tree::{BlockDef, BlockTree, ConnectionKind};
///
/// let mut tree = BlockTree::new();
/// let a = tree.insert(BlockDef::statement("move").at((0.0, 0.0)));
/// let b = tree.insert(BlockDef::statement("turn").at((200.0, 0.0)));
///
/// let a_next = tree.next_point(a).unwrap();
/// let b_prev = tree.point_of_kind(b, ConnectionKind::Previous).unwrap();
/// tree.connect(a_next, b_prev).unwrap();
///
/// assert_eq!(tree.parent_of(b), Some(a));
/// assert_eq!(tree.top_blocks(), vec![a]);
/// // The follower was moved so both points coincide.
/// assert_eq!(tree.point_position(b_prev), tree.point_position(a_next));
/// ```
#[derive(Clone, Default)]
pub struct BlockTree {
    /// slots
    blocks: Vec<Option<Block>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for BlockTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.blocks.len();
        let alive = self.blocks.iter().filter(|b| b.is_some()).count();
        f.debug_struct("BlockTree")
            .field("blocks_total", &total)
            .field("blocks_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Block {
    generation: u32,
    type_name: &'static str,
    position: Point,
    flags: BlockFlags,
    slots: SmallVec<[Slot; 4]>,
}

#[derive(Clone, Debug)]
struct Slot {
    def: PointDef,
    target: Option<PointId>,
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Blocks declare far fewer than 65536 attachment points."
)]
fn point_id(block: BlockId, slot: usize) -> PointId {
    PointId {
        block,
        slot: slot as u16,
    }
}

impl BlockTree {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new, unconnected block.
    pub fn insert(&mut self, def: BlockDef) -> BlockId {
        let block = |generation| Block {
            generation,
            type_name: def.type_name,
            position: def.position,
            flags: def.flags,
            slots: def
                .points
                .iter()
                .cloned()
                .map(|def| Slot { def, target: None })
                .collect(),
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.blocks[idx] = Some(block(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.blocks.push(Some(block(generation)));
            self.generations.push(generation);
            (self.blocks.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "BlockId uses 32-bit indices by design."
        )]
        BlockId::new(idx as u32, generation)
    }

    /// Remove a block and every block attached beneath it.
    ///
    /// The block is first disconnected from its parent; its followers and nested
    /// children are removed with it.
    pub fn remove(&mut self, id: BlockId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(upper) = self.inferior_point(id) {
            self.disconnect(upper);
        }
        for child in self.child_blocks(id) {
            self.remove(child);
        }
        self.blocks[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns `true` if `id` refers to a live block.
    pub fn is_alive(&self, id: BlockId) -> bool {
        self.block(id).is_some()
    }

    /// Host-defined type name of a live block.
    pub fn type_name(&self, id: BlockId) -> Option<&'static str> {
        self.block(id).map(|b| b.type_name)
    }

    /// Flags of a live block.
    pub fn flags(&self, id: BlockId) -> Option<BlockFlags> {
        self.block(id).map(|b| b.flags)
    }

    /// Replace the flags of a live block.
    pub fn set_flags(&mut self, id: BlockId, flags: BlockFlags) {
        if let Some(b) = self.block_mut(id) {
            b.flags = flags;
        }
    }

    /// Position of a live block's origin.
    pub fn position(&self, id: BlockId) -> Option<Point> {
        self.block(id).map(|b| b.position)
    }

    /// Move a block, and everything attached beneath it, so its origin lands on `position`.
    pub fn set_position(&mut self, id: BlockId, position: Point) {
        if let Some(current) = self.position(id) {
            self.translate(id, position - current);
        }
    }

    /// Move a block and everything attached beneath it by `delta`.
    pub fn translate(&mut self, id: BlockId, delta: Vec2) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(block) = self.block_mut(current) else {
                continue;
            };
            block.position += delta;
            stack.extend(self.child_blocks(current));
        }
    }

    /// Attachment points declared on a block, in declaration order.
    ///
    /// Yields nothing for a stale id.
    pub fn points_of(&self, id: BlockId) -> impl Iterator<Item = PointId> + '_ {
        let count = self.block(id).map_or(0, |b| b.slots.len());
        (0..count).map(move |slot| point_id(id, slot))
    }

    /// First point of `kind` declared on a block.
    pub fn point_of_kind(&self, id: BlockId, kind: ConnectionKind) -> Option<PointId> {
        self.points_of(id).find(|&p| self.point_kind(p) == Some(kind))
    }

    /// The block's `Next` point, if it declares one.
    pub fn next_point(&self, id: BlockId) -> Option<PointId> {
        self.point_of_kind(id, ConnectionKind::Next)
    }

    /// Kind of a live point.
    pub fn point_kind(&self, p: PointId) -> Option<ConnectionKind> {
        self.slot(p).map(|s| s.def.kind)
    }

    /// Position of a live point in workspace coordinates.
    pub fn point_position(&self, p: PointId) -> Option<Point> {
        let block = self.block(p.block)?;
        let slot = block.slots.get(usize::from(p.slot))?;
        Some(block.position + slot.def.offset)
    }

    /// The point a live point is connected to.
    pub fn target_of(&self, p: PointId) -> Option<PointId> {
        self.slot(p).and_then(|s| s.target)
    }

    /// The block on the other side of a connected point.
    pub fn attached_block(&self, p: PointId) -> Option<BlockId> {
        self.target_of(p).map(|t| t.block)
    }

    /// The parent-side point a block's upper point is connected to.
    pub fn parent_point(&self, id: BlockId) -> Option<PointId> {
        self.inferior_point(id).and_then(|p| self.target_of(p))
    }

    /// Parent block (the block holding this one in a stack or input).
    pub fn parent_of(&self, id: BlockId) -> Option<BlockId> {
        self.parent_point(id).map(|p| p.block)
    }

    /// Outermost ancestor of a live block.
    pub fn root_of(&self, id: BlockId) -> Option<BlockId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            current = parent;
        }
        Some(current)
    }

    /// Block attached to this block's `Next` point.
    pub fn next_block(&self, id: BlockId) -> Option<BlockId> {
        self.next_point(id).and_then(|p| self.attached_block(p))
    }

    /// Blocks without a parent, in reading order (top to bottom, then left to right).
    pub fn top_blocks(&self) -> Vec<BlockId> {
        let mut tops: Vec<(BlockId, Point)> = self
            .blocks
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let block = slot.as_ref()?;
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "BlockId uses 32-bit indices by design."
                )]
                let id = BlockId::new(idx as u32, block.generation);
                self.parent_of(id).is_none().then_some((id, block.position))
            })
            .collect();
        tops.sort_by(|a, b| compare_reading(a.1, b.1));
        tops.into_iter().map(|(id, _)| id).collect()
    }

    /// Walk down the stack starting at `id` and return the `Next` point of its last block.
    ///
    /// Shadow followers are treated as the end of the stack. Returns `None` when
    /// the last block has no `Next` point.
    pub fn last_connection_in_stack(&self, id: BlockId) -> Option<PointId> {
        let mut current = id;
        loop {
            let next = self.next_point(current)?;
            match self.attached_block(next) {
                Some(follower) if !self.is_shadow(follower) => current = follower,
                _ => return Some(next),
            }
        }
    }

    /// Check whether `a` and `b` may be connected.
    ///
    /// `is_drag` enables the checks that only apply while a stack is being dragged
    /// onto the document (see [`ConnectError`] for the reasons). `tolerance` bounds
    /// the distance between both points during a drag.
    pub fn check_connection(
        &self,
        a: PointId,
        b: PointId,
        is_drag: bool,
        tolerance: f64,
    ) -> Result<(), ConnectError> {
        let (Some(sa), Some(sb)) = (self.slot(a), self.slot(b)) else {
            return Err(ConnectError::Stale);
        };
        if a.block == b.block {
            return Err(ConnectError::SelfConnection);
        }
        if !sa.def.kind.pairs_with(sb.def.kind) {
            return Err(ConnectError::WrongKind);
        }
        if let (Some(ca), Some(cb)) = (&sa.def.check, &sb.def.check)
            && !ca.iter().any(|t| cb.contains(t))
        {
            return Err(ConnectError::TypeCheck);
        }
        let (superior, inferior) = if sa.def.kind.is_superior() {
            (a, b)
        } else {
            (b, a)
        };
        if self.is_shadow(superior.block) && !self.is_shadow(inferior.block) {
            return Err(ConnectError::ShadowParent);
        }
        if is_drag {
            self.drag_checks(a, b, tolerance)?;
        }
        Ok(())
    }

    /// Convenience wrapper over [`check_connection`](Self::check_connection).
    pub fn can_connect(&self, a: PointId, b: PointId, is_drag: bool, tolerance: f64) -> bool {
        self.check_connection(a, b, is_drag, tolerance).is_ok()
    }

    /// Connect two points.
    ///
    /// The child side leaves its current parent first. If the parent side was
    /// occupied, the displaced block is reattached to the end of the inserted
    /// stack (statements) or to its single matching input (values); when that is
    /// not possible it becomes a top block, or is removed if it is a shadow.
    /// The child stack is moved so both points coincide.
    pub fn connect(&mut self, a: PointId, b: PointId) -> Result<(), ConnectError> {
        self.check_connection(a, b, false, f64::INFINITY)?;
        let (superior, inferior) = if self.point_kind(a).is_some_and(ConnectionKind::is_superior)
        {
            (a, b)
        } else {
            (b, a)
        };
        self.disconnect(inferior);
        let orphan = self.disconnect(superior);
        self.link(superior, inferior);
        if let Some(orphan) = orphan {
            self.reattach_orphan(inferior.block, orphan);
        }
        Ok(())
    }

    /// Break the connection at `p`, returning the point it was connected to.
    pub fn disconnect(&mut self, p: PointId) -> Option<PointId> {
        let target = self.slot_mut(p)?.target.take()?;
        if let Some(other) = self.slot_mut(target) {
            other.target = None;
        }
        Some(target)
    }

    /// Detach a block (with everything below it) from its parent.
    ///
    /// Returns the parent-side point the block was attached to. With `heal`, the
    /// block's follower is reconnected to that point so the rest of the stack
    /// stays in place and only the block itself (plus its nested children) is
    /// detached.
    pub fn unplug(&mut self, id: BlockId, heal: bool) -> Option<PointId> {
        let upper = self.inferior_point(id)?;
        let parent = self.disconnect(upper)?;
        if heal
            && self.point_kind(upper) == Some(ConnectionKind::Previous)
            && let Some(next) = self.next_point(id)
            && let Some(follower) = self.disconnect(next)
            && self.can_connect(parent, follower, false, f64::INFINITY)
        {
            self.link(parent, follower);
        }
        Some(parent)
    }

    /// Every block and attachment point in document order.
    ///
    /// Top blocks are visited in reading order. Within a block the order is: its
    /// `Output`/`Previous` points, the block, each `Input`/`Statement` point
    /// followed by the stack attached to it, its `Next` point, then its follower.
    pub fn document_order(&self) -> Vec<DocNode> {
        let mut out = Vec::new();
        for top in self.top_blocks() {
            self.push_stack(top, &mut out);
        }
        out
    }

    /// The first node after `from` in document order that satisfies `is_valid`.
    ///
    /// Returns `None` if `from` is not part of the document or the order is exhausted.
    /// This does not wrap around.
    ///
    /// Each call rebuilds [`document_order`](Self::document_order), so a walk of
    /// `k` steps costs `O(k * n)` for `n` nodes. Hosts walking large documents
    /// should build the order once and index into it.
    pub fn next_in_order(
        &self,
        from: DocNode,
        mut is_valid: impl FnMut(DocNode) -> bool,
    ) -> Option<DocNode> {
        let order = self.document_order();
        let pos = order.iter().position(|&n| n == from)?;
        order[pos + 1..].iter().copied().find(|&n| is_valid(n))
    }

    /// The first node before `from` in document order that satisfies `is_valid`.
    ///
    /// Returns `None` if `from` is not part of the document or the order is exhausted.
    /// This does not wrap around.
    ///
    /// Each call rebuilds [`document_order`](Self::document_order), so a walk of
    /// `k` steps costs `O(k * n)` for `n` nodes. Hosts walking large documents
    /// should build the order once and index into it.
    pub fn prev_in_order(
        &self,
        from: DocNode,
        mut is_valid: impl FnMut(DocNode) -> bool,
    ) -> Option<DocNode> {
        let order = self.document_order();
        let pos = order.iter().position(|&n| n == from)?;
        order[..pos].iter().rev().copied().find(|&n| is_valid(n))
    }

    /// Visit every live attachment point.
    pub fn for_each_point(&self, mut f: impl FnMut(PointId)) {
        for (idx, slot) in self.blocks.iter().enumerate() {
            let Some(block) = slot else { continue };
            #[allow(
                clippy::cast_possible_truncation,
                reason = "BlockId uses 32-bit indices by design."
            )]
            let id = BlockId::new(idx as u32, block.generation);
            for slot in 0..block.slots.len() {
                f(point_id(id, slot));
            }
        }
    }

    fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks
            .get(id.idx())?
            .as_ref()
            .filter(|b| b.generation == id.1)
    }

    fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks
            .get_mut(id.idx())?
            .as_mut()
            .filter(|b| b.generation == id.1)
    }

    fn slot(&self, p: PointId) -> Option<&Slot> {
        self.block(p.block)?.slots.get(usize::from(p.slot))
    }

    fn slot_mut(&mut self, p: PointId) -> Option<&mut Slot> {
        self.block_mut(p.block)?.slots.get_mut(usize::from(p.slot))
    }

    fn is_shadow(&self, id: BlockId) -> bool {
        self.flags(id).is_some_and(|f| f.contains(BlockFlags::SHADOW))
    }

    /// The block's upper point (`Previous` or `Output`).
    fn inferior_point(&self, id: BlockId) -> Option<PointId> {
        self.points_of(id)
            .find(|&p| self.point_kind(p).is_some_and(|k| !k.is_superior()))
    }

    fn child_blocks(&self, id: BlockId) -> SmallVec<[BlockId; 4]> {
        self.points_of(id)
            .filter(|&p| self.point_kind(p).is_some_and(ConnectionKind::is_superior))
            .filter_map(|p| self.attached_block(p))
            .collect()
    }

    fn drag_checks(&self, a: PointId, b: PointId, tolerance: f64) -> Result<(), ConnectError> {
        if self.root_of(a.block) == self.root_of(b.block) {
            return Err(ConnectError::Nested);
        }
        if let (Some(pa), Some(pb)) = (self.point_position(a), self.point_position(b))
            && pa.distance(pb) > tolerance
        {
            return Err(ConnectError::TooFar);
        }
        let occupant = self.attached_block(b);
        match self.point_kind(b) {
            Some(ConnectionKind::Previous | ConnectionKind::Output) => {
                if occupant.is_some() || self.target_of(a).is_some() {
                    return Err(ConnectError::AlreadyConnected);
                }
            }
            Some(ConnectionKind::Input) => {
                if let Some(occupant) = occupant
                    && !self
                        .flags(occupant)
                        .is_some_and(|f| f.intersects(BlockFlags::MOVABLE | BlockFlags::SHADOW))
                {
                    return Err(ConnectError::Immovable);
                }
            }
            Some(ConnectionKind::Next | ConnectionKind::Statement) => {
                if let Some(occupant) = occupant
                    && self.next_point(a.block).is_none()
                    && !self.is_shadow(occupant)
                    && self.next_point(occupant).is_some()
                {
                    return Err(ConnectError::WouldBump);
                }
            }
            None => return Err(ConnectError::Stale),
        }
        Ok(())
    }

    /// Join two free points and move the inferior stack onto the superior point.
    fn link(&mut self, superior: PointId, inferior: PointId) {
        if let Some(s) = self.slot_mut(superior) {
            s.target = Some(inferior);
        }
        if let Some(s) = self.slot_mut(inferior) {
            s.target = Some(superior);
        }
        if let (Some(to), Some(from)) = (
            self.point_position(superior),
            self.point_position(inferior),
        ) {
            self.translate(inferior.block, to - from);
        }
    }

    fn reattach_orphan(&mut self, new_child: BlockId, orphan: PointId) {
        let target = match self.point_kind(orphan) {
            Some(ConnectionKind::Previous) => self
                .last_connection_in_stack(new_child)
                .filter(|&p| self.target_of(p).is_none()),
            Some(ConnectionKind::Output) => self.free_input_for_orphan(new_child, orphan),
            _ => None,
        };
        match target {
            Some(target) if self.can_connect(target, orphan, false, f64::INFINITY) => {
                self.link(target, orphan);
            }
            _ => {
                if self.is_shadow(orphan.block) {
                    self.remove(orphan.block);
                }
            }
        }
    }

    /// Follow single matching inputs down from `start` until a free one is found.
    fn free_input_for_orphan(&self, start: BlockId, orphan: PointId) -> Option<PointId> {
        let mut current = start;
        loop {
            let mut matching = self.points_of(current).filter(|&p| {
                self.point_kind(p) == Some(ConnectionKind::Input)
                    && self.check_connection(p, orphan, false, f64::INFINITY)
                        != Err(ConnectError::TypeCheck)
            });
            let input = matching.next()?;
            if matching.next().is_some() {
                return None;
            }
            match self.attached_block(input) {
                None => return Some(input),
                Some(occupant) => current = occupant,
            }
        }
    }

    fn push_stack(&self, first: BlockId, out: &mut Vec<DocNode>) {
        let mut current = Some(first);
        while let Some(id) = current {
            self.push_block(id, out);
            current = self.next_block(id);
        }
    }

    fn push_block(&self, id: BlockId, out: &mut Vec<DocNode>) {
        let kind_of = |p| self.point_kind(p);
        out.extend(
            self.points_of(id)
                .filter(|&p| {
                    matches!(
                        kind_of(p),
                        Some(ConnectionKind::Previous | ConnectionKind::Output)
                    )
                })
                .map(DocNode::Point),
        );
        out.push(DocNode::Block(id));
        for p in self.points_of(id) {
            if matches!(
                kind_of(p),
                Some(ConnectionKind::Input | ConnectionKind::Statement)
            ) {
                out.push(DocNode::Point(p));
                if let Some(child) = self.attached_block(p) {
                    self.push_stack(child, out);
                }
            }
        }
        out.extend(
            self.points_of(id)
                .filter(|&p| kind_of(p) == Some(ConnectionKind::Next))
                .map(DocNode::Point),
        );
    }
}

fn compare_reading(a: Point, b: Point) -> Ordering {
    const RELATIVE_EPS: f64 = 1e-6;
    if (a.y - b.y).abs() > f64::max(a.y.abs(), b.y.abs()) * RELATIVE_EPS {
        return a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal);
    }
    a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal)
}
