// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural commands sent to the view layer.

use alloc::vec::Vec;

use blockyard_tree::{BlockId, ConnectionId};
use kurbo::Point;

/// A structural change the view tree should mirror.
///
/// Commands arrive in the order the workspace was mutated.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewCommand {
    /// The block and everything chained below it leave their group and form a new one.
    ExtractSubtree(BlockId),
    /// The group headed by `group` is appended after block `after`.
    MergeAfter {
        /// Head of the group being merged.
        group: BlockId,
        /// Block the group now follows.
        after: BlockId,
    },
    /// The child shown in an input slot changed.
    SetInputChild {
        /// Value or statement input connection.
        input: ConnectionId,
        /// New occupant, or `None` when emptied.
        child: Option<BlockId>,
    },
    /// A group became top level.
    AddRoot(BlockId),
    /// A group is no longer top level.
    RemoveRoot(BlockId),
    /// A root group moved in front of all others.
    BringToFront(BlockId),
    /// A root block moved to a workspace position.
    MoveBlock(BlockId, Point),
    /// A connection highlight was turned on or off.
    Highlight {
        /// Highlighted connection.
        connection: ConnectionId,
        /// Whether the highlight is now shown.
        on: bool,
    },
    /// The block and its subtree were deleted.
    RemoveSubtree(BlockId),
    /// Positions of nested blocks may be stale; lay the tree out again.
    RequestLayout,
}

/// Receives [`ViewCommand`]s as the drag engine mutates the workspace.
pub trait ViewObserver {
    /// Handle one command.
    fn on_command(&mut self, command: ViewCommand);
}

/// Records commands, mostly for tests and replay.
impl ViewObserver for Vec<ViewCommand> {
    fn on_command(&mut self, command: ViewCommand) {
        self.push(command);
    }
}

/// Ignores every command.
impl ViewObserver for () {
    fn on_command(&mut self, _command: ViewCommand) {}
}

impl<T: ViewObserver + ?Sized> ViewObserver for &mut T {
    fn on_command(&mut self, command: ViewCommand) {
        (**self).on_command(command);
    }
}
