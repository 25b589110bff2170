// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Blockyard Index: a y-sorted spatial index of block connection points.
//!
//! Blockyard Index is the lookup structure behind snapping in a block editor.
//!
//! - Keeps one [`YSortedList`] per [`ConnectionKind`] (previous, next, input, output).
//! - Inserts by binary search on y; removes by identity after a binary search to the y.
//! - Answers "closest compatible connection within a radius" by scanning only the y band
//!   `[y - r, y + r]` of the opposite kind's bucket.
//!
//! It is generic over the key type and stores a copy of each key's position. It does not
//! know about blocks; the workspace crate decides which keys are compatible through the
//! `accept` filter passed to [`ConnectionIndex::find_closest`].
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use blockyard_index::{ConnectionIndex, ConnectionKind};
//!
//! let mut idx: ConnectionIndex<u32> = ConnectionIndex::new();
//! idx.add(ConnectionKind::Input, 1, Point::new(10.0, 10.0));
//! idx.add(ConnectionKind::Input, 2, Point::new(80.0, 12.0));
//!
//! // An output connection being dragged near (14, 13) snaps to input 1.
//! let hit = idx
//!     .find_closest(ConnectionKind::Output, Point::new(14.0, 13.0), 25.0, |_| true)
//!     .unwrap();
//! assert_eq!(hit.key, 1);
//!
//! // Removing an absent key is a no-op.
//! assert!(!idx.remove(ConnectionKind::Input, 3, Point::new(10.0, 10.0)));
//! assert_eq!(idx.len(), 2);
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: forwards to `kurbo/std` and `tracing/std`.
//! - `libm`: `no_std` float support for `kurbo`.
//!
//! ### Float semantics
//!
//! Coordinates are assumed finite. Debug builds assert that inserted y values are not NaN.

#![no_std]

extern crate alloc;

mod index;
mod sorted;
mod types;

pub use index::ConnectionIndex;
pub use sorted::YSortedList;
pub use types::{ConnectionKind, Neighbor};
