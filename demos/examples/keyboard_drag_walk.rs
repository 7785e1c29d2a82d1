// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard drag over a block document: walk a block upward with arrow keys, then drop it.
//!
//! This example shows how to combine:
//! - `understory_block_tree` as the document (structure, checks, document order),
//! - `understory_keyboard_drag` for directional candidate search,
//! - the `block_tree_adapter` helpers to pick the block up and commit the drop.
//!
//! Run:
//! - `cargo run -p understory_demos --example keyboard_drag_walk`

use kurbo::Vec2;
use understory_block_tree::{BlockDef, BlockId, BlockTree, ConnectionKind, PointId};
use understory_keyboard_drag::adapters::block_tree::{begin_drag, commit};
use understory_keyboard_drag::{Direction, Dragger, KeyboardDragStrategy};

fn describe(tree: &BlockTree, p: PointId) -> String {
    format!(
        "{}.{:?}",
        tree.type_name(p.block).unwrap_or("?"),
        tree.point_kind(p).unwrap()
    )
}

fn print_stack(tree: &BlockTree, first: BlockId, depth: usize) {
    let mut current = Some(first);
    while let Some(id) = current {
        println!("{}{}", "  ".repeat(depth), tree.type_name(id).unwrap_or("?"));
        if let Some(mouth) = tree.point_of_kind(id, ConnectionKind::Statement)
            && let Some(child) = tree.attached_block(mouth)
        {
            print_stack(tree, child, depth + 1);
        }
        current = tree.next_block(id);
    }
}

fn main() {
    // move → repeat { say } → turn → stop
    let mut tree = BlockTree::new();
    let mv = tree.insert(BlockDef::statement("move"));
    let repeat = tree.insert(BlockDef::statement("repeat").with_statement(Vec2::new(16.0, 24.0)));
    let say = tree.insert(BlockDef::statement("say"));
    let turn = tree.insert(BlockDef::statement("turn"));
    let stop = tree.insert(BlockDef::statement("stop"));

    let prev = |tree: &BlockTree, id| tree.point_of_kind(id, ConnectionKind::Previous).unwrap();
    for (upper, lower) in [(mv, repeat), (repeat, turn), (turn, stop)] {
        let next = tree.next_point(upper).unwrap();
        tree.connect(next, prev(&tree, lower)).unwrap();
    }
    let mouth = tree.point_of_kind(repeat, ConnectionKind::Statement).unwrap();
    tree.connect(mouth, prev(&tree, say)).unwrap();

    println!("== Before ==");
    print_stack(&tree, mv, 0);

    // Pick up `stop` and press Up until the search runs out of places.
    let subtree = begin_drag(&mut tree, stop, true).unwrap();
    println!(
        "\nPicked up `stop`; it was attached to {}",
        subtree
            .start_parent
            .map_or_else(|| "nothing".to_owned(), |p| describe(&tree, p))
    );

    let mut dragger: Dragger<PointId, KeyboardDragStrategy<PointId>> = Dragger::default();
    dragger.start(&tree, subtree);
    let up = Some(Direction::Up.tilt());
    for press in 1..=4 {
        match dragger.drag(&tree, Vec2::ZERO, up) {
            Some(c) => println!(
                "Up #{press}: {} -> {}",
                describe(&tree, c.local),
                describe(&tree, c.neighbour)
            ),
            None => println!("Up #{press}: no candidate"),
        }
    }

    // One step back down, then drop.
    let down = Some(Direction::Down.tilt());
    if let Some(c) = dragger.drag(&tree, Vec2::ZERO, down) {
        println!(
            "Down: {} -> {}",
            describe(&tree, c.local),
            describe(&tree, c.neighbour)
        );
    }
    if let Some(candidate) = dragger.end() {
        commit(&mut tree, &candidate).unwrap();
    }

    println!("\n== After ==");
    for top in tree.top_blocks() {
        print_stack(&tree, top, 0);
    }
}
