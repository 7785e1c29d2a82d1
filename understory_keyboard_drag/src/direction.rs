// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Discrete drag directions and their mapping from 2-axis tilt signals.
//!
//! Pointing devices report a tilt vector per movement event; hosts that drive a
//! drag from arrow keys synthesize one with [`Direction::tilt`]. Only the four
//! axis-aligned unit vectors carry a direction:
//!
//! | tilt       | direction              |
//! |------------|------------------------|
//! | `(0, -1)`  | [`Direction::Up`]      |
//! | `(0, 1)`   | [`Direction::Down`]    |
//! | `(-1, 0)`  | [`Direction::Left`]    |
//! | `(1, 0)`   | [`Direction::Right`]   |
//!
//! Everything else, including the zero vector, diagonals, and larger magnitudes,
//! resolves to no direction.

use kurbo::Vec2;

/// A discrete drag direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the top of the document.
    Up,
    /// Towards the bottom of the document.
    Down,
    /// Towards the left.
    Left,
    /// Towards the right.
    Right,
}

/// Direction of travel through document order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Towards the start of the document.
    Backward,
    /// Towards the end of the document.
    Forward,
}

impl Direction {
    /// Map a tilt vector to a direction.
    ///
    /// Returns `None` unless exactly one axis is non-zero with unit magnitude.
    pub fn from_tilt(tilt: Vec2) -> Option<Self> {
        let Vec2 { x, y } = tilt;
        if x == 0.0 {
            if y == -1.0 {
                Some(Self::Up)
            } else if y == 1.0 {
                Some(Self::Down)
            } else {
                None
            }
        } else if y == 0.0 {
            if x == -1.0 {
                Some(Self::Left)
            } else if x == 1.0 {
                Some(Self::Right)
            } else {
                None
            }
        } else {
            None
        }
    }

    /// The unit tilt vector that resolves to this direction.
    pub fn tilt(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Traversal step for this direction.
    ///
    /// Document order is one-dimensional, so `Left` walks like `Up` and `Right`
    /// walks like `Down`.
    pub fn step(self) -> Step {
        match self {
            Self::Up | Self::Left => Step::Backward,
            Self::Down | Self::Right => Step::Forward,
        }
    }
}

/// Resolve an optional raw tilt signal into a direction.
///
/// Absent and zero signals mean "no direction". Signals that are neither zero
/// nor an axis-aligned unit vector are ignored rather than guessed at.
pub fn resolve(signal: Option<Vec2>) -> Option<Direction> {
    let tilt = signal?;
    let direction = Direction::from_tilt(tilt);
    #[cfg(feature = "tracing")]
    if direction.is_none() && tilt != Vec2::ZERO {
        tracing::trace!(x = tilt.x, y = tilt.y, "ignoring unmapped tilt signal");
    }
    direction
}
