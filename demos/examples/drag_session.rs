// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted drag session over a small program.
//!
//! Builds a `repeat` loop and a loose two-block chain, then:
//! - drags the chain into the loop body,
//! - drags a number into the loop count,
//! - drags a stray block onto the trash.
//!
//! Every view command is printed as the view layer would receive it.
//!
//! Run:
//! - `RUST_LOG=blockyard_drag=debug cargo run -p blockyard_demos --example drag_session`

use blockyard_drag::{DragOutcome, Dragger, ViewCommand, ViewObserver};
use blockyard_tree::{BlockDef, BlockId, ConnectionDef, Workspace};
use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;

/// Prints commands instead of updating a real view tree.
struct PrintingView;

impl ViewObserver for PrintingView {
    fn on_command(&mut self, command: ViewCommand) {
        println!("  view <- {command:?}");
    }
}

fn drag(
    dragger: &mut Dragger,
    ws: &mut Workspace,
    block: BlockId,
    from: Point,
    to: Point,
) -> DragOutcome {
    let mut view = PrintingView;
    dragger.on_down(ws, &mut view, block, from);
    // Two intermediate moves so the highlight has a chance to change.
    let mid = from.lerp(to, 0.5);
    dragger.on_move(ws, &mut view, mid);
    dragger.on_move(ws, &mut view, to);
    dragger.on_up(ws, &mut view, to)
}

fn describe(ws: &Workspace, id: BlockId, depth: usize) {
    let Some(block) = ws.block(id) else {
        return;
    };
    let p = block.position();
    println!(
        "{:indent$}{} @ ({:.0}, {:.0})",
        "",
        block.type_name(),
        p.x,
        p.y,
        indent = depth * 2
    );
    for child in ws.children_of(id) {
        // Input children are indented; the next block continues at this depth.
        let nested = ws
            .parent_connection(child)
            .and_then(|c| ws.connection(c))
            .is_some_and(|c| c.input().is_some());
        describe(ws, child, depth + usize::from(nested));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let repeat = BlockDef::new("controls_repeat")
        .previous()
        .next()
        .value_input_with("TIMES", ConnectionDef::new().checks(["Number"]))
        .statement_input("DO");
    let say = BlockDef::new("say").previous().next().value_input("TEXT");
    let number =
        BlockDef::new("math_number").output_with(ConnectionDef::new().checks(["Number"]));

    let mut ws = Workspace::new();
    let repeat_block = ws.place(&repeat, Point::new(20.0, 20.0)).expect("valid definition");
    let hello = ws.place(&say, Point::new(400.0, 40.0)).expect("valid definition");
    let bye = ws.place(&say, Point::new(400.0, 88.0)).expect("valid definition");
    let count = ws.place(&number, Point::new(400.0, 300.0)).expect("valid definition");
    let stray = ws.place(&say, Point::new(600.0, 400.0)).expect("valid definition");
    let hello_next = ws
        .block(hello)
        .and_then(|b| b.next_connection())
        .expect("say has a next");
    let bye_prev = ws
        .block(bye)
        .and_then(|b| b.previous_connection())
        .expect("say has a previous");
    ws.connect(hello_next, bye_prev).expect("fresh chain");

    let mut dragger = Dragger::default();
    dragger.set_trash_region(Some(Rect::new(0.0, 500.0, 80.0, 580.0)));

    // The DO input of the loop sits at (44, 92); aim the chain's top just beside it.
    println!("drag the say chain into the loop body");
    let outcome = drag(
        &mut dragger,
        &mut ws,
        hello,
        Point::new(400.0, 40.0),
        Point::new(50.0, 96.0),
    );
    println!("  => {outcome:?}");

    // TIMES sits at (180, 20).
    println!("drag the number into the loop count");
    let outcome = drag(
        &mut dragger,
        &mut ws,
        count,
        Point::new(400.0, 300.0),
        Point::new(186.0, 24.0),
    );
    println!("  => {outcome:?}");

    println!("drag the stray block onto the trash");
    let outcome = drag(
        &mut dragger,
        &mut ws,
        stray,
        Point::new(600.0, 400.0),
        Point::new(40.0, 540.0),
    );
    println!("  => {outcome:?}");

    println!(
        "final program ({} blocks, {} indexed connections):",
        ws.block_count(),
        ws.index().len()
    );
    assert_eq!(ws.roots(), &[repeat_block], "everything ends up inside the loop");
    describe(&ws, repeat_block, 1);
}
