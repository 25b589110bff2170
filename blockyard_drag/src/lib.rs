// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Blockyard Drag: the drag-and-drop engine of a block editor.
//!
//! A [`Dragger`] turns pointer events into workspace edits:
//!
//! - [`Dragger::on_down`] picks up a block, extracting it from its parent.
//! - [`Dragger::on_move`] moves it and highlights the closest compatible connection.
//! - [`Dragger::on_up`] connects, drops, or trashes it and reports a [`DragOutcome`].
//!
//! When the target connection is already occupied, the occupant is spliced: it is
//! reattached below the dropped statement chain, or into the single compatible value
//! input of the dropped expression. An occupant with no such place is bumped away by the
//! snap radius.
//!
//! The engine is UI agnostic. It reports structural changes as [`ViewCommand`]s to a
//! [`ViewObserver`], which a view layer mirrors in its own tree.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use blockyard_drag::{DragConfig, DragOutcome, Dragger};
//! use blockyard_tree::{BlockDef, Workspace};
//!
//! let mut ws = Workspace::new();
//! let block = ws.place(&BlockDef::new("say").previous().next(), Point::new(300.0, 300.0)).unwrap();
//!
//! let mut dragger = Dragger::new(DragConfig::default().with_snap_radius(30.0));
//! dragger.set_trash_region(Some(Rect::new(0.0, 0.0, 64.0, 64.0)));
//!
//! dragger.on_down(&mut ws, &mut (), block, Point::new(300.0, 300.0));
//! dragger.on_move(&mut ws, &mut (), Point::new(32.0, 32.0));
//! let outcome = dragger.on_up(&mut ws, &mut (), Point::new(32.0, 32.0));
//!
//! assert!(matches!(outcome, DragOutcome::Trashed { .. }));
//! assert_eq!(ws.block_count(), 0);
//! assert!(ws.index().is_empty());
//! ```
//!
//! ## Logging
//!
//! Gesture transitions and reconnections are logged with `tracing` at `debug`, per-move
//! snap updates at `trace`, and ignored input at `warn`. No subscriber is installed.
//!
//! ## Features
//!
//! - `std` *(default)*: forwards to `kurbo/std`, `blockyard_tree/std`, and `tracing/std`.
//! - `libm`: `no_std` float support for `kurbo`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod dragger;
mod reconnect;
mod view;

pub use config::{DragConfig, Viewport};
pub use dragger::{DragOutcome, DragPhase, Dragger};
pub use view::{ViewCommand, ViewObserver};
