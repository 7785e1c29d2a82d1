// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the block tree: identifiers, attachment kinds, flags, and block definitions.

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Identifier for a block in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BlockId(pub(crate) u32, pub(crate) u32);

impl BlockId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for an attachment point: the owning block plus the point's slot on it.
///
/// Points are declared once per block (see [`BlockDef::points`]), so a `PointId`
/// stays valid for as long as its block is alive.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PointId {
    /// Block that owns this point.
    pub block: BlockId,
    /// Slot of the point within the block's declared points.
    pub slot: u16,
}

/// Kind of an attachment point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    /// Top of a statement block; accepts a predecessor.
    Previous,
    /// Bottom of a statement block; accepts a successor.
    Next,
    /// Statement input; accepts a nested sequence of statement blocks.
    Statement,
    /// Value input; accepts a value block.
    Input,
    /// Value plug on a value block; fills an [`Input`](Self::Input).
    Output,
}

impl ConnectionKind {
    /// Whether two kinds can ever be joined.
    pub fn pairs_with(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Previous, Self::Next | Self::Statement)
                | (Self::Next | Self::Statement, Self::Previous)
                | (Self::Output, Self::Input)
                | (Self::Input, Self::Output)
        )
    }

    /// Whether this kind sits on the parent side of a connection.
    pub fn is_superior(self) -> bool {
        matches!(self, Self::Next | Self::Statement | Self::Input)
    }
}

bitflags::bitflags! {
    /// Per-block flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BlockFlags: u8 {
        /// Block can be picked up and dragged.
        const MOVABLE = 0b0000_0001;
        /// Block is a placeholder filling an input until a real block replaces it.
        const SHADOW  = 0b0000_0010;
    }
}

impl Default for BlockFlags {
    fn default() -> Self {
        Self::MOVABLE
    }
}

/// Declaration of a single attachment point on a block.
#[derive(Clone, Debug, PartialEq)]
pub struct PointDef {
    /// Kind of the point.
    pub kind: ConnectionKind,
    /// Offset of the point from the block's origin.
    pub offset: Vec2,
    /// Optional type check. Two points whose checks are both present must share
    /// at least one entry to connect.
    pub check: Option<SmallVec<[&'static str; 2]>>,
}

impl PointDef {
    /// A point with no type check.
    pub fn new(kind: ConnectionKind, offset: Vec2) -> Self {
        Self {
            kind,
            offset,
            check: None,
        }
    }

    /// Restrict this point to the given type names.
    pub fn with_check(mut self, types: &[&'static str]) -> Self {
        self.check = Some(types.iter().copied().collect());
        self
    }
}

/// Local definition of a block: its type, layout position, flags, and attachment points.
///
/// Point order matters: it is the order in which points are reported by
/// [`BlockTree::points_of`](crate::BlockTree::points_of) and in which inputs are
/// visited in document order.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockDef {
    /// Host-defined block type name.
    pub type_name: &'static str,
    /// Position of the block origin in workspace coordinates.
    pub position: Point,
    /// Movability and shadow flags.
    pub flags: BlockFlags,
    /// Declared attachment points.
    pub points: SmallVec<[PointDef; 4]>,
}

/// Vertical distance between a statement block's top and bottom points.
const STATEMENT_HEIGHT: f64 = 40.0;

impl BlockDef {
    /// A block with no attachment points.
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            position: Point::ZERO,
            flags: BlockFlags::default(),
            points: SmallVec::new(),
        }
    }

    /// A statement block with a `Previous` point at its top and a `Next` point at its bottom.
    pub fn statement(type_name: &'static str) -> Self {
        Self::new(type_name)
            .with_point(PointDef::new(ConnectionKind::Previous, Vec2::ZERO))
            .with_point(PointDef::new(
                ConnectionKind::Next,
                Vec2::new(0.0, STATEMENT_HEIGHT),
            ))
    }

    /// A value block with a single `Output` point on its left edge.
    pub fn value(type_name: &'static str) -> Self {
        Self::new(type_name).with_point(PointDef::new(ConnectionKind::Output, Vec2::ZERO))
    }

    /// Place the block at `position`.
    pub fn at(mut self, position: impl Into<Point>) -> Self {
        self.position = position.into();
        self
    }

    /// Replace the block flags.
    pub fn with_flags(mut self, flags: BlockFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Append an attachment point.
    pub fn with_point(mut self, point: PointDef) -> Self {
        self.points.push(point);
        self
    }

    /// Append a value input at `offset`.
    pub fn with_input(self, offset: Vec2) -> Self {
        self.with_point(PointDef::new(ConnectionKind::Input, offset))
    }

    /// Append a statement input at `offset`.
    pub fn with_statement(self, offset: Vec2) -> Self {
        self.with_point(PointDef::new(ConnectionKind::Statement, offset))
    }
}

/// A node in document order: either a block or one of its attachment points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DocNode {
    /// A block.
    Block(BlockId),
    /// An attachment point.
    Point(PointId),
}

impl DocNode {
    /// The attachment point this node stands for, if any.
    pub fn point(self) -> Option<PointId> {
        match self {
            Self::Point(p) => Some(p),
            Self::Block(_) => None,
        }
    }
}
