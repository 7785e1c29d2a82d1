// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reasons a connection between two attachment points is refused.

/// Why two attachment points cannot be connected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ConnectError {
    /// One of the points belongs to a block that no longer exists.
    #[error("attachment point refers to a removed block")]
    Stale,
    /// Both points belong to the same block.
    #[error("a block cannot connect to itself")]
    SelfConnection,
    /// The point kinds never pair (for example a value plug and a statement top).
    #[error("attachment point kinds do not pair")]
    WrongKind,
    /// Both points carry type checks with no type in common.
    #[error("attachment point type checks do not overlap")]
    TypeCheck,
    /// A shadow block would become the parent of a non-shadow block.
    #[error("a shadow block cannot hold a non-shadow child")]
    ShadowParent,
    /// The points are further apart than the allowed tolerance.
    #[error("attachment points are too far apart")]
    TooFar,
    /// The target point is already occupied and cannot be spliced.
    #[error("attachment point is already connected")]
    AlreadyConnected,
    /// Connecting would push a follower block out of its stack.
    #[error("connection would bump the following block out of its stack")]
    WouldBump,
    /// The block occupying the target input cannot be moved aside.
    #[error("occupying block is not movable")]
    Immovable,
    /// The target belongs to the stack being dragged.
    #[error("cannot connect to a block in the dragged stack")]
    Nested,
}
