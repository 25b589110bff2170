// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the workspace: identifiers, flags, and index state.

/// Identifier for a block in the workspace (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub(crate) u32, pub(crate) u32);

/// Identifier for a connection point in the workspace (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub(crate) u32, pub(crate) u32);

/// Shared shape of the generational ids handed out by the arenas.
pub(crate) trait SlotId: Copy {
    fn from_parts(idx: u32, generation: u32) -> Self;
    fn idx(self) -> usize;
    fn generation(self) -> u32;
}

impl SlotId for BlockId {
    fn from_parts(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    fn idx(self) -> usize {
        self.0 as usize
    }

    fn generation(self) -> u32 {
        self.1
    }
}

impl SlotId for ConnectionId {
    fn from_parts(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    fn idx(self) -> usize {
        self.0 as usize
    }

    fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Block flags controlling what a user may do with a block.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct BlockFlags: u8 {
        /// Block can be picked up and dragged.
        const MOVABLE   = 0b0000_0001;
        /// Block can be dropped on the trash.
        const DELETABLE = 0b0000_0010;
    }
}

impl Default for BlockFlags {
    fn default() -> Self {
        Self::MOVABLE | Self::DELETABLE
    }
}

/// The kind of slot an input exposes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    /// Accepts a value block's output; carries an `Input` connection.
    Value,
    /// Accepts a statement chain; carries a `Next` connection.
    Statement,
    /// Label-only row without a connection.
    Dummy,
}

/// Where a connection stands with respect to the connection index.
///
/// A connection moves between these states only through explicit
/// `Workspace` calls; connecting and disconnecting never change it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum IndexState {
    /// Not a member of the index.
    #[default]
    Unindexed,
    /// Member of exactly one bucket, at its current position.
    Indexed,
    /// Pulled out of the index for an in-progress drag.
    Withdrawn,
}
