// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Keyboard Drag: move blocks between attachment points with arrow keys.
//!
//! ## Overview
//!
//! Pointer drags snap a block to the closest compatible attachment point. That
//! does not work for keyboard users, who cannot nudge a block by pixels until it
//! lands near the right spot. This crate instead walks the document in its
//! canonical depth-first order: each arrow key press moves the proposed
//! connection to the next (or previous) attachment point the dragged stack can
//! legally join.
//!
//! ## Pieces
//!
//! - [`resolve`] / [`Direction`]: tilt signal → `Up`/`Down`/`Left`/`Right`.
//!   `Up` and `Left` walk backward through the document, `Down` and `Right`
//!   walk forward.
//! - [`local_attachments`]: the dragged stack's points that may be matched.
//! - [`DocumentCursor`]: previous/next attachment point in document order.
//! - [`ConstrainedSearch`] / [`SearchState`]: the directional search and its anchor.
//! - [`DragStrategy`]: where candidates come from. [`ProximityStrategy`] is the
//!   pointer-style default; [`KeyboardDragStrategy`] switches between
//!   directional search and a fallback on every step.
//! - [`Dragger`]: one drag gesture from start to drop or cancel.
//!
//! ## Host integration
//!
//! The document is reached only through [`DocumentOrder`], [`ConnectionChecker`],
//! and [`PointLocator`]. The crate never mutates the document: committing a
//! candidate on drop, and restoring the stack on cancel, are up to the host.
//!
//! With the `block_tree_adapter` feature, [`adapters::block_tree`] implements
//! these traits for [`understory_block_tree`] and adds helpers to begin, commit,
//! and revert a drag.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_keyboard_drag::{
//!     ConnectionChecker, Direction, DocumentOrder, DraggedSubtree, Dragger,
//!     KeyboardDragStrategy, PointLocator,
//! };
//!
//! // Attachment points 0..4 in a column; the dragged block exposes point 10,
//! // which fits points 1 and 3 only.
//! struct Column;
//! impl DocumentOrder for Column {
//!     type Node = u32;
//!     type Point = u32;
//!     fn next_node<F: FnMut(u32) -> bool>(&self, from: u32, mut ok: F) -> Option<u32> {
//!         (from + 1..4).find(|&n| ok(n))
//!     }
//!     fn prev_node<F: FnMut(u32) -> bool>(&self, from: u32, mut ok: F) -> Option<u32> {
//!         (0..from).rev().find(|&n| ok(n))
//!     }
//!     fn point_at(&self, node: u32) -> Option<u32> { (node < 4).then_some(node) }
//!     fn node_of(&self, point: u32) -> u32 { point }
//! }
//! impl ConnectionChecker<u32> for Column {
//!     fn can_connect(&self, a: u32, b: u32, _drag: bool, _tol: f64) -> bool {
//!         a == 10 && (b == 1 || b == 3)
//!     }
//! }
//! impl PointLocator<u32> for Column {
//!     fn position(&self, p: u32) -> Option<Point> { Some(Point::new(0.0, 50.0 * f64::from(p))) }
//!     fn for_each_point<F: FnMut(u32)>(&self, f: F) { (0..4).for_each(f) }
//! }
//!
//! let mut dragger: Dragger<u32, KeyboardDragStrategy<u32>> = Dragger::default();
//! dragger.start(&Column, DraggedSubtree::new([10]).with_start_parent(Some(0)));
//!
//! let down = Some(Direction::Down.tilt());
//! assert_eq!(dragger.drag(&Column, Vec2::ZERO, down).map(|c| c.neighbour), Some(1));
//! assert_eq!(dragger.drag(&Column, Vec2::ZERO, down).map(|c| c.neighbour), Some(3));
//! assert!(dragger.is_constrained());
//!
//! // Drop: the host connects the returned pair.
//! let commit = dragger.end().unwrap();
//! assert_eq!((commit.local, commit.neighbour), (10, 3));
//! ```
//!
//! ## Logging
//!
//! With the `tracing` feature, drag lifecycle and mode changes are logged at
//! `debug` and search results at `trace`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;

mod cursor;
mod direction;
mod dragger;
mod host;
mod keyboard;
mod local;
mod search;
mod strategy;
mod types;

#[cfg(test)]
mod testing;

pub use cursor::DocumentCursor;
pub use direction::{Direction, Step, resolve};
pub use dragger::Dragger;
pub use host::{ConnectionChecker, DocumentOrder, DragHost, PointLocator};
pub use keyboard::{DragMode, KeyboardDragStrategy};
pub use local::local_attachments;
pub use search::{CONSTRAINED_TOLERANCE, ConstrainedSearch, SearchState};
pub use strategy::{DragStep, DragStrategy, ProximityStrategy, SnapConfig};
pub use types::{ConnectionCandidate, DraggedSubtree};
