// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capabilities the host document provides to candidate search.
//!
//! Candidate search never owns the document. It reads it through three small
//! traits, bundled as [`DragHost`]:
//!
//! - [`DocumentOrder`]: depth-first stepping with a node filter, plus the mapping
//!   between document nodes and attachment points.
//! - [`ConnectionChecker`]: the single authority on whether two points may join.
//! - [`PointLocator`]: current positions of attachment points, used only by
//!   proximity search.
//!
//! None of these require rendering, so a headless document can implement them.

use core::fmt::Debug;

use kurbo::Point;

/// Depth-first document order over nodes, some of which are attachment points.
pub trait DocumentOrder {
    /// A node in document order (a block, an attachment point, or anything else).
    type Node: Copy + Eq + Debug;
    /// Handle of an attachment point.
    type Point: Copy + Eq + Debug;

    /// The first node after `from` that satisfies `is_valid`, or `None` when exhausted.
    fn next_node<F>(&self, from: Self::Node, is_valid: F) -> Option<Self::Node>
    where
        F: FnMut(Self::Node) -> bool;

    /// The first node before `from` that satisfies `is_valid`, or `None` when exhausted.
    fn prev_node<F>(&self, from: Self::Node, is_valid: F) -> Option<Self::Node>
    where
        F: FnMut(Self::Node) -> bool;

    /// The attachment point `node` stands for, if it is one.
    fn point_at(&self, node: Self::Node) -> Option<Self::Point>;

    /// The node standing for `point`.
    fn node_of(&self, point: Self::Point) -> Self::Node;
}

/// Decides whether two attachment points may be connected.
pub trait ConnectionChecker<P> {
    /// Whether `a` (on the dragged subtree) may connect to `b` (in the document).
    ///
    /// `is_drag` is `true` for every call made during a drag. `tolerance` bounds
    /// how far apart the points may be; directional search passes a large value
    /// so that proximity does not matter.
    fn can_connect(&self, a: P, b: P, is_drag: bool, tolerance: f64) -> bool;
}

/// Positions of attachment points.
pub trait PointLocator<P> {
    /// Current position of `point` in workspace coordinates.
    fn position(&self, point: P) -> Option<Point>;

    /// Visit every attachment point in the document.
    fn for_each_point<F: FnMut(P)>(&self, f: F);
}

/// Everything a drag needs from the host document.
///
/// Implemented automatically for any type providing the three capabilities.
pub trait DragHost:
    DocumentOrder
    + ConnectionChecker<<Self as DocumentOrder>::Point>
    + PointLocator<<Self as DocumentOrder>::Point>
{
}

impl<T> DragHost for T where
    T: DocumentOrder
        + ConnectionChecker<<T as DocumentOrder>::Point>
        + PointLocator<<T as DocumentOrder>::Point>
{
}
