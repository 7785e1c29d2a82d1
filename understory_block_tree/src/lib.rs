// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Block Tree: a document of connectable blocks.
//!
//! Visual programming editors arrange code as stacks of statement blocks, with
//! value blocks plugged into inputs and statement stacks nested inside other
//! blocks. This crate models that document headlessly:
//!
//! - Blocks declare typed attachment points ([`ConnectionKind`]): a statement
//!   block has a `Previous` point on top and a `Next` point at the bottom, a value
//!   block has an `Output` plug, and any block may expose `Input` and `Statement`
//!   points.
//! - Structure lives entirely in point-to-point connections; there is no separate
//!   parent pointer to keep in sync.
//! - [`BlockTree::check_connection`] decides whether two points may be joined,
//!   with extra rules while a stack is being dragged.
//! - [`BlockTree::document_order`] gives the canonical depth-first sequence of
//!   blocks and points, independent of 2-D layout.
//!
//! ## Not a renderer
//!
//! Positions are plain [`kurbo::Point`] values supplied by the host's layout. The
//! tree only keeps connected points aligned by moving the child stack when a
//! connection is made.
//!
//! ## API overview
//!
//! - [`BlockTree`]: block storage, connections, queries, and traversal.
//! - [`BlockDef`] / [`PointDef`]: local block and point declarations.
//! - [`BlockId`] / [`PointId`]: generational handles.
//! - [`BlockFlags`]: movability and shadow state.
//! - [`DocNode`]: an entry in document order.
//! - [`ConnectError`]: why a connection was refused.
//!
//! ```rust
//! use kurbo::Vec2;
//! use understory_block_tree::{BlockDef, BlockTree, ConnectionKind, DocNode};
//!
//! let mut tree = BlockTree::new();
//! let repeat = tree.insert(BlockDef::statement("repeat").with_statement(Vec2::new(16.0, 24.0)));
//! let body = tree.insert(BlockDef::statement("move").at((300.0, 0.0)));
//!
//! let mouth = tree.point_of_kind(repeat, ConnectionKind::Statement).unwrap();
//! let body_top = tree.point_of_kind(body, ConnectionKind::Previous).unwrap();
//! tree.connect(mouth, body_top).unwrap();
//!
//! // The nested block follows the statement point in document order.
//! let after_mouth = tree.next_in_order(DocNode::Point(mouth), |_| true);
//! assert_eq!(after_mouth, Some(DocNode::Point(body_top)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod tree;
mod types;

pub use error::ConnectError;
pub use tree::BlockTree;
pub use types::{BlockDef, BlockFlags, BlockId, ConnectionKind, DocNode, PointDef, PointId};
