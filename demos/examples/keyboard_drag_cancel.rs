// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cancelling a keyboard drag restores the document.
//!
//! A value block is moved between inputs with arrow keys. Pressing Escape
//! cancels the drag; the subtree handed back by the dragger is reverted into
//! the input it came from.
//!
//! Run:
//! - `cargo run -p understory_demos --example keyboard_drag_cancel`

use kurbo::Vec2;
use understory_block_tree::{BlockDef, BlockTree, ConnectionKind, PointDef};
use understory_keyboard_drag::adapters::block_tree::{begin_drag, revert};
use understory_keyboard_drag::{Direction, Dragger, KeyboardDragStrategy};

fn main() {
    let mut tree = BlockTree::new();
    let input = PointDef::new(ConnectionKind::Input, Vec2::new(60.0, 0.0)).with_check(&["Number"]);
    let wait = tree.insert(BlockDef::statement("wait").with_point(input.clone()));
    let forward = tree.insert(
        BlockDef::statement("forward")
            .at((0.0, 120.0))
            .with_point(input),
    );
    let say = tree.insert(
        BlockDef::statement("say")
            .at((0.0, 240.0))
            .with_point(PointDef::new(ConnectionKind::Input, Vec2::new(60.0, 0.0)).with_check(&["String"])),
    );
    let num = tree.insert(BlockDef::new("number").with_point(
        PointDef::new(ConnectionKind::Output, Vec2::ZERO).with_check(&["Number"]),
    ));
    let slot = |tree: &BlockTree, id| tree.point_of_kind(id, ConnectionKind::Input).unwrap();
    let output = tree.point_of_kind(num, ConnectionKind::Output).unwrap();
    tree.connect(slot(&tree, wait), output).unwrap();

    let holder = |tree: &BlockTree| tree.parent_of(num).and_then(|p| tree.type_name(p));
    println!("`number` starts in: {:?}", holder(&tree));

    let subtree = begin_drag(&mut tree, num, false).unwrap();
    let mut dragger: Dragger<_, KeyboardDragStrategy<_>> = Dragger::default();
    dragger.start(&tree, subtree);

    let down = Some(Direction::Down.tilt());
    for press in 1..=2 {
        let target = dragger
            .drag(&tree, Vec2::ZERO, down)
            .and_then(|c| tree.type_name(c.neighbour.block));
        // `say` only takes strings, so the search never stops there.
        println!("Down #{press}: candidate input on {target:?}");
    }
    assert_ne!(dragger.candidate().map(|c| c.neighbour), Some(slot(&tree, say)));
    assert_eq!(dragger.candidate().map(|c| c.neighbour), Some(slot(&tree, forward)));

    // Escape.
    let subtree = dragger.cancel().unwrap();
    revert(&mut tree, &subtree).unwrap();
    println!("After cancel `number` is in: {:?}", holder(&tree));
}
