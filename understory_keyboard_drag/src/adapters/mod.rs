// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Each adapter is gated behind a feature flag so the core stays lightweight and `no_std`.
//!
//! ## Available Adapters
//!
//! - [`block_tree`] (`block_tree_adapter` feature): Integration with [`understory_block_tree`].
//!   Implements the host traits for its document and provides helpers to begin, commit, and
//!   revert a drag.

#[cfg(feature = "block_tree_adapter")]
pub mod block_tree;
