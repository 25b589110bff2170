// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Blockyard Tree: the block and connection model of a visual block editor.
//!
//! A [`Workspace`] holds a forest of blocks. Blocks expose typed connection points:
//!
//! - a *previous* connection on top and a *next* connection at the bottom for statement blocks,
//! - an *output* connection on the left for value blocks,
//! - one connection per value input (kind `Input`) or statement input (kind `Next`).
//!
//! Linking a previous to a next builds statement chains; linking an output to an input nests a
//! value. Every block not hanging from a parent is a root; [`Workspace::roots`] keeps them in
//! back-to-front order.
//!
//! Connections may be registered in a [`blockyard_index::ConnectionIndex`] so that dragged
//! blocks can find the nearest compatible connection quickly
//! ([`Workspace::find_best_connection`], [`Workspace::find_best_connection_for_block`]).
//! Index membership is explicit and tracked per connection as an [`IndexState`]:
//!
//! - [`Workspace::index_connection`]: `Unindexed` → `Indexed`.
//! - [`Workspace::withdraw_connection`]: `Indexed` → `Withdrawn`, for the blocks being dragged.
//! - [`Workspace::restore_connection`]: `Withdrawn` → `Indexed`, at a freshly computed position.
//!
//! Moving a block through [`Workspace::set_position`] or [`Workspace::translate_subtree`] keeps
//! indexed entries at their connections' positions.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use blockyard_tree::{BlockDef, Workspace};
//!
//! let print = BlockDef::new("print").previous().next().value_input("TEXT");
//! let text = BlockDef::new("text").output();
//!
//! let mut ws = Workspace::new();
//! let p = ws.place(&print, Point::new(0.0, 0.0)).unwrap();
//! let t = ws.place(&text, Point::new(170.0, 0.0)).unwrap();
//!
//! // The text block's output is 10 units away from the TEXT slot.
//! let out = ws.block(t).unwrap().output_connection().unwrap();
//! let hit = ws.find_best_connection(out, 25.0).unwrap();
//! assert_eq!(ws.connection(hit.target).unwrap().owner(), p);
//!
//! ws.connect(out, hit.target).unwrap();
//! assert_eq!(ws.parent_of(t), Some(p));
//! assert_eq!(ws.roots(), &[p]);
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: forwards to `kurbo/std` and `tracing/std`.
//! - `libm`: `no_std` float support for `kurbo`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arena;
mod def;
mod error;
mod snap;
mod types;
mod workspace;

pub use blockyard_index::ConnectionKind;
pub use def::{BLOCK_WIDTH, BlockDef, ConnectionDef, InputDef, ROW_HEIGHT, STATEMENT_INDENT};
pub use error::{BlockError, ConnectError};
pub use snap::SnapMatch;
pub use types::{BlockFlags, BlockId, ConnectionId, IndexState, InputKind};
pub use workspace::{Block, Connection, Input, Workspace};
