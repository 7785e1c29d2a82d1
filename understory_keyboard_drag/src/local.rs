// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local attachment points of the dragged subtree.

use smallvec::SmallVec;

use crate::types::DraggedSubtree;

/// Attachment points on the dragged subtree that may be matched against the document.
///
/// These are the root's own points in declaration order, followed by the
/// successor point at the end of the stack when it differs from the root's own
/// successor point. That lets a multi-block stack attach by its tail as well as
/// by its head. The list does not depend on the drag direction and contains no
/// duplicates.
pub fn local_attachments<P: Copy + Eq>(subtree: &DraggedSubtree<P>) -> SmallVec<[P; 6]> {
    let mut out: SmallVec<[P; 6]> = SmallVec::new();
    for &p in &subtree.points {
        if !out.contains(&p) {
            out.push(p);
        }
    }
    if let Some(tail) = subtree.tail_successor
        && subtree.root_successor != Some(tail)
        && !out.contains(&tail)
    {
        out.push(tail);
    }
    out
}
