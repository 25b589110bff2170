// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Block definitions: the shape a block is instantiated from.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Vec2;

use crate::types::{BlockFlags, InputKind};

/// Height of one input row in the default connection layout.
pub const ROW_HEIGHT: f64 = 48.0;
/// Width at which value inputs sit in the default connection layout.
pub const BLOCK_WIDTH: f64 = 160.0;
/// Horizontal indent of statement inputs in the default connection layout.
pub const STATEMENT_INDENT: f64 = 24.0;

/// Shape of one connection point.
///
/// `offset` is relative to the owning block's origin. When left unset the
/// workspace uses a simple row layout until a real layout pass supplies
/// measured offsets through `Workspace::set_connection_offset`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConnectionDef {
    /// Offset from the block origin, if known.
    pub offset: Option<Vec2>,
    /// Accepted type names. `None` accepts anything.
    pub checks: Option<Vec<String>>,
}

impl ConnectionDef {
    /// A connection with default placement and no type checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the connection at `(x, y)` relative to the block origin.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.offset = Some(Vec2::new(x, y));
        self
    }

    /// Restrict the connection to the given type names.
    pub fn checks<S: Into<String>>(mut self, checks: impl IntoIterator<Item = S>) -> Self {
        self.checks = Some(checks.into_iter().map(Into::into).collect());
        self
    }
}

/// One declared input row.
#[derive(Clone, Debug, PartialEq)]
pub struct InputDef {
    /// Name of the input, unique within the block.
    pub name: String,
    /// Slot kind.
    pub kind: InputKind,
    /// Connection of the slot; ignored for dummy inputs.
    pub connection: ConnectionDef,
}

/// Declarative description of a block type.
///
/// ```rust
/// use blockyard_tree::{BlockDef, ConnectionDef};
///
/// let repeat = BlockDef::new("controls_repeat")
///     .previous()
///     .next()
///     .value_input_with("TIMES", ConnectionDef::new().checks(["Number"]))
///     .statement_input("DO");
/// assert_eq!(repeat.inputs.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BlockDef {
    /// Type name, e.g. `controls_if`.
    pub type_name: String,
    /// Top connection of a statement block.
    pub previous: Option<ConnectionDef>,
    /// Bottom connection of a statement block.
    pub next: Option<ConnectionDef>,
    /// Left connection of a value block.
    pub output: Option<ConnectionDef>,
    /// Ordered input rows.
    pub inputs: Vec<InputDef>,
    /// Initial flags.
    pub flags: BlockFlags,
}

impl BlockDef {
    /// Start a definition with no connections.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            previous: None,
            next: None,
            output: None,
            inputs: Vec::new(),
            flags: BlockFlags::default(),
        }
    }

    /// Add a previous connection.
    pub fn previous(self) -> Self {
        self.previous_with(ConnectionDef::new())
    }

    /// Add a previous connection with explicit shape.
    pub fn previous_with(mut self, def: ConnectionDef) -> Self {
        self.previous = Some(def);
        self
    }

    /// Add a next connection.
    pub fn next(self) -> Self {
        self.next_with(ConnectionDef::new())
    }

    /// Add a next connection with explicit shape.
    pub fn next_with(mut self, def: ConnectionDef) -> Self {
        self.next = Some(def);
        self
    }

    /// Add an output connection.
    pub fn output(self) -> Self {
        self.output_with(ConnectionDef::new())
    }

    /// Add an output connection with explicit shape.
    pub fn output_with(mut self, def: ConnectionDef) -> Self {
        self.output = Some(def);
        self
    }

    /// Append a value input.
    pub fn value_input(self, name: impl Into<String>) -> Self {
        self.value_input_with(name, ConnectionDef::new())
    }

    /// Append a value input with explicit connection shape.
    pub fn value_input_with(self, name: impl Into<String>, def: ConnectionDef) -> Self {
        self.input(name, InputKind::Value, def)
    }

    /// Append a statement input.
    pub fn statement_input(self, name: impl Into<String>) -> Self {
        self.statement_input_with(name, ConnectionDef::new())
    }

    /// Append a statement input with explicit connection shape.
    pub fn statement_input_with(self, name: impl Into<String>, def: ConnectionDef) -> Self {
        self.input(name, InputKind::Statement, def)
    }

    /// Append a dummy (label-only) input.
    pub fn dummy_input(self, name: impl Into<String>) -> Self {
        self.input(name, InputKind::Dummy, ConnectionDef::new())
    }

    /// Replace the initial flags.
    pub fn flags(mut self, flags: BlockFlags) -> Self {
        self.flags = flags;
        self
    }

    fn input(
        mut self,
        name: impl Into<String>,
        kind: InputKind,
        connection: ConnectionDef,
    ) -> Self {
        self.inputs.push(InputDef {
            name: name.into(),
            kind,
            connection,
        });
        self
    }

    /// Default offsets, by role.
    ///
    /// Rows are stacked `ROW_HEIGHT` apart. Value inputs sit on the right
    /// edge of their row, statement inputs at the indent just below their
    /// row's top, and the next connection under the last row.
    pub(crate) fn default_input_offset(row: usize, kind: InputKind) -> Vec2 {
        let top = row_top(row);
        match kind {
            InputKind::Value | InputKind::Dummy => Vec2::new(BLOCK_WIDTH, top),
            InputKind::Statement => Vec2::new(STATEMENT_INDENT, top + ROW_HEIGHT * 0.5),
        }
    }

    pub(crate) fn default_next_offset(&self) -> Vec2 {
        Vec2::new(0.0, row_top(self.inputs.len().max(1)))
    }
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Row counts are tiny; the conversion is exact in practice."
)]
fn row_top(row: usize) -> f64 {
    row as f64 * ROW_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_inputs_in_order() {
        let def = BlockDef::new("controls_if")
            .previous()
            .next()
            .value_input("IF0")
            .statement_input("DO0")
            .dummy_input("LABEL");
        let kinds: Vec<_> = def.inputs.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            [InputKind::Value, InputKind::Statement, InputKind::Dummy]
        );
        assert!(def.previous.is_some() && def.next.is_some() && def.output.is_none());
    }

    #[test]
    fn checks_and_offsets_are_recorded() {
        let def = ConnectionDef::new().at(3.0, 4.0).checks(["Number", "String"]);
        assert_eq!(def.offset, Some(Vec2::new(3.0, 4.0)));
        assert_eq!(def.checks.as_deref().map(<[String]>::len), Some(2));
    }

    #[test]
    fn default_next_sits_below_last_row() {
        let bare = BlockDef::new("stop").previous().next();
        assert_eq!(bare.default_next_offset(), Vec2::new(0.0, ROW_HEIGHT));
        let tall = BlockDef::new("if_else")
            .previous()
            .next()
            .statement_input("DO")
            .statement_input("ELSE");
        assert_eq!(tall.default_next_offset(), Vec2::new(0.0, 2.0 * ROW_HEIGHT));
    }
}
