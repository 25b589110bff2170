// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by fallible workspace edits.

use alloc::string::String;

use blockyard_index::ConnectionKind;

use crate::types::{BlockId, ConnectionId};

/// Why a block definition could not be instantiated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    /// Blocks hang off either an output or a previous connection, not both.
    #[error("block `{0}` declares both an output and a previous connection")]
    OutputAndPrevious(String),
    /// Input names identify slots and must be unique per block.
    #[error("block `{type_name}` declares input `{name}` more than once")]
    DuplicateInput {
        /// Type name of the offending definition.
        type_name: String,
        /// The repeated input name.
        name: String,
    },
}

/// Why two connections could not be linked.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    /// The id does not name a live connection.
    #[error("connection {0:?} is stale")]
    Stale(ConnectionId),
    /// The kinds are not a previous/next or output/input pair.
    #[error("a {0:?} connection cannot plug into a {1:?} connection")]
    IncompatibleKinds(ConnectionKind, ConnectionKind),
    /// Both connections belong to the same block.
    #[error("block {0:?} cannot be connected to itself")]
    SameBlock(BlockId),
    /// One side already has a target; disconnect it first.
    #[error("connection {0:?} is already connected")]
    AlreadyConnected(ConnectionId),
    /// The type check lists do not intersect.
    #[error("type checks of {0:?} and {1:?} do not intersect")]
    ChecksRejected(ConnectionId, ConnectionId),
    /// The parent block is a descendant of the would-be child.
    #[error("connecting would make block {0:?} its own ancestor")]
    WouldCreateCycle(BlockId),
}
