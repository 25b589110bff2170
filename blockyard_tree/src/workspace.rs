// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core workspace implementation: blocks, connections, structure, positions.

use alloc::string::String;
use alloc::vec::Vec;

use blockyard_index::{ConnectionIndex, ConnectionKind};
use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::arena::Arena;
use crate::def::{BlockDef, ConnectionDef};
use crate::error::{BlockError, ConnectError};
use crate::types::{BlockFlags, BlockId, ConnectionId, IndexState, InputKind};

/// A typed attachment point on a block.
#[derive(Clone, Debug)]
pub struct Connection {
    kind: ConnectionKind,
    owner: BlockId,
    input: Option<usize>,
    offset: Vec2,
    position: Point,
    target: Option<ConnectionId>,
    checks: Option<Vec<String>>,
    state: IndexState,
}

impl Connection {
    /// Structural kind.
    pub fn kind(&self) -> ConnectionKind {
        self.kind
    }

    /// Block this connection belongs to.
    pub fn owner(&self) -> BlockId {
        self.owner
    }

    /// Index of the owner's input row this connection belongs to, if any.
    pub fn input(&self) -> Option<usize> {
        self.input
    }

    /// Offset from the owner's origin.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Absolute position in workspace units.
    pub fn position(&self) -> Point {
        self.position
    }

    /// The connection this one is plugged into.
    pub fn target(&self) -> Option<ConnectionId> {
        self.target
    }

    /// Accepted type names; `None` accepts anything.
    pub fn checks(&self) -> Option<&[String]> {
        self.checks.as_deref()
    }

    /// Index membership.
    pub fn state(&self) -> IndexState {
        self.state
    }

    /// Whether the connection has a target.
    pub fn is_connected(&self) -> bool {
        self.target.is_some()
    }

    /// Whether this is the `Next` connection of a statement input.
    pub fn is_statement_input(&self) -> bool {
        self.kind == ConnectionKind::Next && self.input.is_some()
    }

    /// Whether the type check lists of `self` and `other` intersect.
    pub fn checks_accept(&self, other: &Self) -> bool {
        match (&self.checks, &other.checks) {
            (Some(a), Some(b)) => a.iter().any(|t| b.contains(t)),
            _ => true,
        }
    }
}

/// One input row of a block.
#[derive(Clone, Debug)]
pub struct Input {
    name: String,
    kind: InputKind,
    connection: Option<ConnectionId>,
}

impl Input {
    /// Name of the row.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slot kind.
    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Connection of the slot (`None` for dummy inputs).
    pub fn connection(&self) -> Option<ConnectionId> {
        self.connection
    }
}

/// A block in the workspace.
#[derive(Clone, Debug)]
pub struct Block {
    type_name: String,
    previous: Option<ConnectionId>,
    next: Option<ConnectionId>,
    output: Option<ConnectionId>,
    inputs: Vec<Input>,
    position: Point,
    flags: BlockFlags,
}

impl Block {
    /// Type name the block was instantiated from.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Top connection, for statement blocks.
    pub fn previous_connection(&self) -> Option<ConnectionId> {
        self.previous
    }

    /// Bottom connection, for statement blocks.
    pub fn next_connection(&self) -> Option<ConnectionId> {
        self.next
    }

    /// Left connection, for value blocks.
    pub fn output_connection(&self) -> Option<ConnectionId> {
        self.output
    }

    /// Input rows in declaration order.
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    /// Input row by name.
    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.iter().find(|i| i.name == name)
    }

    /// Origin in workspace units.
    ///
    /// Authoritative for root blocks. For nested blocks it is whatever the
    /// last alignment or layout pass assigned.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current flags.
    pub fn flags(&self) -> BlockFlags {
        self.flags
    }

    /// Whether the block may be dragged.
    pub fn is_movable(&self) -> bool {
        self.flags.contains(BlockFlags::MOVABLE)
    }

    /// Whether the block may be trashed.
    pub fn is_deletable(&self) -> bool {
        self.flags.contains(BlockFlags::DELETABLE)
    }

    /// The connection the block hangs from when nested.
    pub fn parent_side(&self) -> Option<ConnectionId> {
        self.previous.or(self.output)
    }

    /// The block's own connections: output, previous, next, then inputs.
    pub fn connections(&self) -> SmallVec<[ConnectionId; 4]> {
        self.output
            .into_iter()
            .chain(self.previous)
            .chain(self.next)
            .chain(self.inputs.iter().filter_map(|i| i.connection))
            .collect()
    }
}

/// The logical program: a forest of blocks plus the connection index.
///
/// Blocks form trees through previous/next links (statement chains) and
/// input/output links (nesting). Blocks not hanging from a parent are
/// roots, kept in [`Workspace::roots`] in back-to-front order.
///
/// Connecting and disconnecting never changes index membership; that is
/// always an explicit call ([`Workspace::index_connection`],
/// [`Workspace::withdraw_connection`], ...).
///
/// ## Example
///
/// ```rust
/// use kurbo::Point;
/// use blockyard_tree::{BlockDef, Workspace};
///
/// let statement = BlockDef::new("print").previous().next();
/// let mut ws = Workspace::new();
/// let a = ws.place(&statement, Point::new(0.0, 0.0)).unwrap();
/// let b = ws.place(&statement, Point::new(0.0, 200.0)).unwrap();
///
/// let next = ws.block(a).unwrap().next_connection().unwrap();
/// let previous = ws.block(b).unwrap().previous_connection().unwrap();
/// ws.connect(next, previous).unwrap();
///
/// assert_eq!(ws.roots(), &[a]);
/// assert_eq!(ws.next_block(a), Some(b));
/// ```
#[derive(Default)]
pub struct Workspace {
    blocks: Arena<BlockId, Block>,
    connections: Arena<ConnectionId, Connection>,
    roots: Vec<BlockId>,
    pub(crate) index: ConnectionIndex<ConnectionId>,
}

impl core::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Workspace")
            .field("blocks", &self.blocks.len())
            .field("connections", &self.connections.len())
            .field("roots", &self.roots.len())
            .field("indexed", &self.index.len())
            .finish_non_exhaustive()
    }
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every block and clear the connection index.
    pub fn reset(&mut self) {
        self.blocks.clear();
        self.connections.clear();
        self.roots.clear();
        self.index.clear();
    }

    /// Read access to the connection index.
    pub fn index(&self) -> &ConnectionIndex<ConnectionId> {
        &self.index
    }

    /// Instantiate `def` as a new root block at `position`.
    ///
    /// The block's connections start [`IndexState::Unindexed`].
    pub fn insert(&mut self, def: &BlockDef, position: Point) -> Result<BlockId, BlockError> {
        if def.previous.is_some() && def.output.is_some() {
            return Err(BlockError::OutputAndPrevious(def.type_name.clone()));
        }
        for (i, input) in def.inputs.iter().enumerate() {
            if def.inputs[..i].iter().any(|other| other.name == input.name) {
                return Err(BlockError::DuplicateInput {
                    type_name: def.type_name.clone(),
                    name: input.name.clone(),
                });
            }
        }

        let id = self.blocks.insert(Block {
            type_name: def.type_name.clone(),
            previous: None,
            next: None,
            output: None,
            inputs: Vec::with_capacity(def.inputs.len()),
            position,
            flags: def.flags,
        });

        let output = def.output.as_ref().map(|c| {
            self.new_connection(id, ConnectionKind::Output, None, c, Vec2::ZERO, position)
        });
        let previous = def.previous.as_ref().map(|c| {
            self.new_connection(id, ConnectionKind::Previous, None, c, Vec2::ZERO, position)
        });
        let next_offset = def.default_next_offset();
        let next = def.next.as_ref().map(|c| {
            self.new_connection(id, ConnectionKind::Next, None, c, next_offset, position)
        });
        let mut inputs = Vec::with_capacity(def.inputs.len());
        for (row, input) in def.inputs.iter().enumerate() {
            let kind = match input.kind {
                InputKind::Value => Some(ConnectionKind::Input),
                InputKind::Statement => Some(ConnectionKind::Next),
                InputKind::Dummy => None,
            };
            let connection = kind.map(|kind| {
                let fallback = BlockDef::default_input_offset(row, input.kind);
                self.new_connection(id, kind, Some(row), &input.connection, fallback, position)
            });
            inputs.push(Input {
                name: input.name.clone(),
                kind: input.kind,
                connection,
            });
        }

        let block = self.block_mut(id);
        block.output = output;
        block.previous = previous;
        block.next = next;
        block.inputs = inputs;
        self.roots.push(id);
        tracing::debug!(?id, type_name = %def.type_name, "block inserted");
        Ok(id)
    }

    /// Instantiate `def` at `position` and index all of its connections.
    pub fn place(&mut self, def: &BlockDef, position: Point) -> Result<BlockId, BlockError> {
        let id = self.insert(def, position)?;
        for conn in self.block_ref(id).connections() {
            self.index_connection(conn);
        }
        Ok(id)
    }

    fn new_connection(
        &mut self,
        owner: BlockId,
        kind: ConnectionKind,
        input: Option<usize>,
        def: &ConnectionDef,
        fallback: Vec2,
        origin: Point,
    ) -> ConnectionId {
        let offset = def.offset.unwrap_or(fallback);
        self.connections.insert(Connection {
            kind,
            owner,
            input,
            offset,
            position: origin + offset,
            target: None,
            checks: def.checks.clone(),
            state: IndexState::Unindexed,
        })
    }

    /// Remove a block together with everything nested in or chained below it.
    ///
    /// The block is disconnected from its parent first. Indexed connections
    /// leave the index; withdrawn ones are simply dropped. Returns the ids
    /// of every removed block, the given block first.
    pub fn remove_block(&mut self, id: BlockId) -> Vec<BlockId> {
        if !self.is_alive(id) {
            tracing::warn!(?id, "remove_block on a stale id");
            return Vec::new();
        }
        if let Some(parent_side) = self.block_ref(id).parent_side() {
            self.disconnect(parent_side);
        }
        let doomed = self.subtree(id);
        for &b in &doomed {
            let Some(block) = self.blocks.remove(b) else {
                unreachable!("subtree only yields live blocks");
            };
            for conn in block.connections() {
                if let Some(c) = self.connections.remove(conn)
                    && c.state == IndexState::Indexed
                {
                    self.index.remove(c.kind, conn, c.position);
                }
            }
        }
        self.roots.retain(|r| *r != id);
        tracing::debug!(?id, removed = doomed.len(), "subtree removed");
        doomed
    }

    /// Link two free connections.
    ///
    /// The child block (the owner of the previous/output side) stops being a
    /// root. Neither side may already be connected.
    pub fn connect(&mut self, a: ConnectionId, b: ConnectionId) -> Result<(), ConnectError> {
        let ca = self.connections.get(a).ok_or(ConnectError::Stale(a))?;
        let cb = self.connections.get(b).ok_or(ConnectError::Stale(b))?;
        if !ca.kind.pairs_with(cb.kind) {
            return Err(ConnectError::IncompatibleKinds(ca.kind, cb.kind));
        }
        if ca.owner == cb.owner {
            return Err(ConnectError::SameBlock(ca.owner));
        }
        if ca.is_connected() {
            return Err(ConnectError::AlreadyConnected(a));
        }
        if cb.is_connected() {
            return Err(ConnectError::AlreadyConnected(b));
        }
        if !ca.checks_accept(cb) {
            return Err(ConnectError::ChecksRejected(a, b));
        }
        let (parent, child) = if ca.kind.is_child_side() {
            (cb.owner, ca.owner)
        } else {
            (ca.owner, cb.owner)
        };
        if self.is_ancestor(child, parent) {
            return Err(ConnectError::WouldCreateCycle(child));
        }

        self.conn_mut(a).target = Some(b);
        self.conn_mut(b).target = Some(a);
        self.roots.retain(|r| *r != child);
        tracing::debug!(?a, ?b, ?parent, ?child, "connected");
        Ok(())
    }

    /// Unlink `conn` from its target, if any, returning the former target.
    ///
    /// The child block becomes a root, in front of all existing roots. Its
    /// position is left as last aligned.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Option<ConnectionId> {
        let c = self.connections.get(conn)?;
        let target = c.target?;
        let child_side = if c.kind.is_child_side() { conn } else { target };
        self.conn_mut(conn).target = None;
        self.conn_mut(target).target = None;
        let child = self.conn_ref(child_side).owner;
        self.roots.push(child);
        tracing::debug!(?conn, ?target, ?child, "disconnected");
        Some(target)
    }

    /// Update a block's flags.
    pub fn set_flags(&mut self, id: BlockId, flags: BlockFlags) {
        if let Some(b) = self.blocks.get_mut(id) {
            b.flags = flags;
        }
    }

    // --- queries ---

    /// Returns true if `id` refers to a live block.
    pub fn is_alive(&self, id: BlockId) -> bool {
        self.blocks.contains(id)
    }

    /// Access a live block.
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// Access a live connection.
    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    /// Number of live blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Iterate live block ids in slot order.
    pub fn blocks(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.ids()
    }

    /// Root blocks, back to front.
    pub fn roots(&self) -> &[BlockId] {
        &self.roots
    }

    /// Whether `id` is live and hangs from nothing.
    pub fn is_root(&self, id: BlockId) -> bool {
        self.is_alive(id) && self.parent_connection(id).is_none()
    }

    /// The parent-side connection `id` hangs from (a next, statement input
    /// or value input of the parent).
    pub fn parent_connection(&self, id: BlockId) -> Option<ConnectionId> {
        let side = self.blocks.get(id)?.parent_side()?;
        self.conn_ref(side).target
    }

    /// The block `id` hangs from.
    pub fn parent_of(&self, id: BlockId) -> Option<BlockId> {
        self.parent_connection(id).map(|c| self.conn_ref(c).owner)
    }

    /// The block whose next (or statement input) the previous connection of
    /// `id` is plugged into.
    pub fn previous_block(&self, id: BlockId) -> Option<BlockId> {
        let previous = self.blocks.get(id)?.previous?;
        self.target_block(previous)
    }

    /// The block chained directly below `id`.
    pub fn next_block(&self, id: BlockId) -> Option<BlockId> {
        let next = self.blocks.get(id)?.next?;
        self.target_block(next)
    }

    /// The connection `conn` is plugged into.
    pub fn target_connection(&self, conn: ConnectionId) -> Option<ConnectionId> {
        self.connections.get(conn)?.target
    }

    /// The block owning the connection `conn` is plugged into.
    pub fn target_block(&self, conn: ConnectionId) -> Option<BlockId> {
        self.target_connection(conn).map(|t| self.conn_ref(t).owner)
    }

    /// The block plugged into the input named `name` of `id`.
    pub fn input_target(&self, id: BlockId, name: &str) -> Option<BlockId> {
        let slot = self.blocks.get(id)?.input(name)?.connection?;
        self.target_block(slot)
    }

    /// Follow next links from `id` to the end of its statement chain.
    pub fn last_block_in_chain(&self, id: BlockId) -> BlockId {
        let mut last = id;
        while let Some(next) = self.next_block(last) {
            last = next;
        }
        last
    }

    /// The root of the tree containing `id`.
    pub fn root_of(&self, id: BlockId) -> BlockId {
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            current = parent;
        }
        current
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: BlockId, id: BlockId) -> bool {
        let mut current = Some(id);
        while let Some(b) = current {
            if b == ancestor {
                return true;
            }
            current = self.parent_of(b);
        }
        false
    }

    /// The block's own connections (not its descendants').
    pub fn all_connections(&self, id: BlockId) -> SmallVec<[ConnectionId; 4]> {
        self.blocks
            .get(id)
            .map(Block::connections)
            .unwrap_or_default()
    }

    /// Connections of `id` and of every block nested in or chained below it.
    pub fn all_connections_recursive(&self, id: BlockId) -> Vec<ConnectionId> {
        self.subtree(id)
            .into_iter()
            .flat_map(|b| self.block_ref(b).connections())
            .collect()
    }

    /// Blocks directly attached below `id`: input children in row order,
    /// then the next block.
    pub fn children_of(&self, id: BlockId) -> SmallVec<[BlockId; 4]> {
        let Some(block) = self.blocks.get(id) else {
            return SmallVec::new();
        };
        block
            .inputs
            .iter()
            .filter_map(|i| i.connection)
            .chain(block.next)
            .filter_map(|c| self.target_block(c))
            .collect()
    }

    /// `id` followed by all of its descendants, depth first.
    pub fn subtree(&self, id: BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut stack = alloc::vec![id];
        while let Some(b) = stack.pop() {
            out.push(b);
            stack.extend(self.children_of(b).into_iter().rev());
        }
        out
    }

    // --- positions ---

    /// Move a block (and its own connections) to `position`.
    ///
    /// Descendants are not moved; see [`Workspace::translate_subtree`].
    pub fn set_position(&mut self, id: BlockId, position: Point) {
        let Some(block) = self.blocks.get_mut(id) else {
            return;
        };
        let delta = position - block.position;
        block.position = position;
        for conn in block.connections() {
            self.shift_connection(conn, delta);
        }
    }

    /// Translate `id` and all of its descendants by `delta`.
    pub fn translate_subtree(&mut self, id: BlockId, delta: Vec2) {
        for b in self.subtree(id) {
            self.translate_block(b, delta);
        }
    }

    /// Translate the descendants of `id` (but not `id`) by `delta`.
    pub fn translate_descendants(&mut self, id: BlockId, delta: Vec2) {
        for b in self.subtree(id).into_iter().skip(1) {
            self.translate_block(b, delta);
        }
    }

    /// Replace a connection's offset from its owner, typically after a
    /// layout pass measured the block.
    pub fn set_connection_offset(&mut self, conn: ConnectionId, offset: Vec2) {
        let Some(c) = self.connections.get(conn) else {
            return;
        };
        let origin = self.block_ref(c.owner).position;
        let delta = (origin + offset) - c.position;
        self.conn_mut(conn).offset = offset;
        self.shift_connection(conn, delta);
    }

    /// Move a root to the front of the root order. Returns `false` if `id`
    /// is not a root.
    pub fn bring_to_front(&mut self, id: BlockId) -> bool {
        let Some(at) = self.roots.iter().position(|r| *r == id) else {
            return false;
        };
        self.roots.remove(at);
        self.roots.push(id);
        true
    }

    fn translate_block(&mut self, id: BlockId, delta: Vec2) {
        let block = self.block_mut(id);
        block.position += delta;
        for conn in block.connections() {
            self.shift_connection(conn, delta);
        }
    }

    fn shift_connection(&mut self, conn: ConnectionId, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        let c = self.conn_mut(conn);
        let old = c.position;
        c.position = old + delta;
        let (kind, state) = (c.kind, c.state);
        if state == IndexState::Indexed {
            let moved = self.index.move_by(kind, conn, old, delta);
            debug_assert!(moved, "indexed connection {conn:?} missing from its bucket");
        }
    }

    // --- index membership ---

    /// Add an unindexed connection to the index at its current position.
    ///
    /// Returns `false` for stale, already indexed, or withdrawn connections.
    pub fn index_connection(&mut self, conn: ConnectionId) -> bool {
        let Some(c) = self.connections.get_mut(conn) else {
            return false;
        };
        if c.state != IndexState::Unindexed {
            return false;
        }
        c.state = IndexState::Indexed;
        let (kind, position) = (c.kind, c.position);
        self.index.add(kind, conn, position);
        true
    }

    /// Remove an indexed connection from the index.
    ///
    /// Returns `false` when the connection was not indexed.
    pub fn unindex_connection(&mut self, conn: ConnectionId) -> bool {
        self.take_out_of_index(conn, IndexState::Unindexed)
    }

    /// Pull an indexed connection out of the index for a drag.
    ///
    /// Returns `false` when the connection was not indexed.
    pub fn withdraw_connection(&mut self, conn: ConnectionId) -> bool {
        self.take_out_of_index(conn, IndexState::Withdrawn)
    }

    /// Put a withdrawn connection back into the index.
    ///
    /// Its position is first recomputed from the owner's origin and offset.
    /// Returns `false` when the connection was not withdrawn.
    pub fn restore_connection(&mut self, conn: ConnectionId) -> bool {
        let Some(c) = self.connections.get(conn) else {
            return false;
        };
        if c.state != IndexState::Withdrawn {
            return false;
        }
        let position = self.block_ref(c.owner).position + c.offset;
        let c = self.conn_mut(conn);
        c.position = position;
        c.state = IndexState::Indexed;
        let kind = c.kind;
        self.index.add(kind, conn, position);
        true
    }

    /// Index every unindexed connection in the subtree of `id`. Returns how
    /// many were added.
    pub fn index_block_recursive(&mut self, id: BlockId) -> usize {
        self.all_connections_recursive(id)
            .into_iter()
            .filter(|&c| self.index_connection(c))
            .count()
    }

    /// Withdraw every indexed connection in the subtree of `id`, returning
    /// the ones that were withdrawn.
    pub fn withdraw_block_recursive(&mut self, id: BlockId) -> Vec<ConnectionId> {
        self.all_connections_recursive(id)
            .into_iter()
            .filter(|&c| self.withdraw_connection(c))
            .collect()
    }

    fn take_out_of_index(&mut self, conn: ConnectionId, to: IndexState) -> bool {
        let Some(c) = self.connections.get_mut(conn) else {
            return false;
        };
        if c.state != IndexState::Indexed {
            return false;
        }
        c.state = to;
        let (kind, position) = (c.kind, c.position);
        let removed = self.index.remove(kind, conn, position);
        debug_assert!(removed, "indexed connection {conn:?} missing from its bucket");
        true
    }

    // --- internals ---

    /// Access a block; panics if `id` is stale.
    pub(crate) fn block_ref(&self, id: BlockId) -> &Block {
        self.blocks.get(id).expect("dangling BlockId")
    }

    /// Access a block mutably; panics if `id` is stale.
    pub(crate) fn block_mut(&mut self, id: BlockId) -> &mut Block {
        self.blocks.get_mut(id).expect("dangling BlockId")
    }

    /// Access a connection; panics if `id` is stale.
    pub(crate) fn conn_ref(&self, id: ConnectionId) -> &Connection {
        self.connections.get(id).expect("dangling ConnectionId")
    }

    fn conn_mut(&mut self, id: ConnectionId) -> &mut Connection {
        self.connections.get_mut(id).expect("dangling ConnectionId")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn statement() -> BlockDef {
        BlockDef::new("statement").previous().next()
    }

    fn value() -> BlockDef {
        BlockDef::new("value").output()
    }

    fn wrapper() -> BlockDef {
        BlockDef::new("wrapper")
            .previous()
            .next()
            .value_input("ARG")
            .statement_input("DO")
    }

    fn next_of(ws: &Workspace, b: BlockId) -> ConnectionId {
        ws.block(b).unwrap().next_connection().unwrap()
    }

    fn prev_of(ws: &Workspace, b: BlockId) -> ConnectionId {
        ws.block(b).unwrap().previous_connection().unwrap()
    }

    fn input_of(ws: &Workspace, b: BlockId, name: &str) -> ConnectionId {
        ws.block(b).unwrap().input(name).unwrap().connection().unwrap()
    }

    #[test]
    fn insert_rejects_output_and_previous() {
        let mut ws = Workspace::new();
        let bad = BlockDef::new("bad").previous().output();
        assert_eq!(
            ws.insert(&bad, Point::ZERO),
            Err(BlockError::OutputAndPrevious("bad".into()))
        );
        let dup = BlockDef::new("dup").value_input("A").value_input("A");
        assert!(matches!(
            ws.insert(&dup, Point::ZERO),
            Err(BlockError::DuplicateInput { .. })
        ));
        assert_eq!(ws.block_count(), 0);
    }

    #[test]
    fn connections_follow_the_block_origin() {
        let mut ws = Workspace::new();
        let w = ws.place(&wrapper(), Point::new(100.0, 50.0)).unwrap();
        let prev = ws.connection(prev_of(&ws, w)).unwrap();
        assert_eq!(prev.position(), Point::new(100.0, 50.0));
        assert_eq!(prev.state(), IndexState::Indexed);

        let stmt = ws.connection(input_of(&ws, w, "DO")).unwrap();
        assert!(stmt.is_statement_input());
        assert_eq!(stmt.kind(), ConnectionKind::Next);
        assert_eq!(ws.index().len(), 4);

        ws.set_position(w, Point::new(110.0, 70.0));
        let prev = ws.connection(prev_of(&ws, w)).unwrap();
        assert_eq!(prev.position(), Point::new(110.0, 70.0));
        assert!(
            ws.index()
                .contains(ConnectionKind::Previous, prev_of(&ws, w), prev.position())
        );
    }

    #[test]
    fn connect_and_disconnect_maintain_roots() {
        let mut ws = Workspace::new();
        let a = ws.place(&statement(), Point::ZERO).unwrap();
        let b = ws.place(&statement(), Point::new(0.0, 300.0)).unwrap();
        ws.connect(prev_of(&ws, b), next_of(&ws, a)).unwrap();
        assert_eq!(ws.roots(), &[a]);
        assert_eq!(ws.previous_block(b), Some(a));
        assert_eq!(ws.parent_of(b), Some(a));
        assert!(!ws.is_root(b));

        assert_eq!(ws.disconnect(next_of(&ws, a)), Some(prev_of(&ws, b)));
        assert_eq!(ws.roots(), &[a, b]);
        assert!(ws.is_root(b));
        assert_eq!(ws.disconnect(next_of(&ws, a)), None);
    }

    #[test]
    fn connect_validates() {
        let mut ws = Workspace::new();
        let a = ws.place(&statement(), Point::ZERO).unwrap();
        let b = ws.place(&statement(), Point::ZERO).unwrap();
        let c = ws.place(&statement(), Point::ZERO).unwrap();
        let v = ws.place(&value(), Point::ZERO).unwrap();
        let out = ws.block(v).unwrap().output_connection().unwrap();

        assert_eq!(
            ws.connect(out, next_of(&ws, a)),
            Err(ConnectError::IncompatibleKinds(
                ConnectionKind::Output,
                ConnectionKind::Next
            ))
        );
        assert_eq!(
            ws.connect(prev_of(&ws, a), next_of(&ws, a)),
            Err(ConnectError::SameBlock(a))
        );

        ws.connect(next_of(&ws, a), prev_of(&ws, b)).unwrap();
        assert_eq!(
            ws.connect(next_of(&ws, a), prev_of(&ws, c)),
            Err(ConnectError::AlreadyConnected(next_of(&ws, a)))
        );
        // b's next into a's previous would close a loop.
        assert_eq!(
            ws.connect(next_of(&ws, b), prev_of(&ws, a)),
            Err(ConnectError::WouldCreateCycle(a))
        );
    }

    #[test]
    fn type_checks_gate_connect() {
        let mut ws = Workspace::new();
        let num = BlockDef::new("num").output_with(ConnectionDef::new().checks(["Number"]));
        let text_slot = BlockDef::new("print")
            .previous()
            .value_input_with("TEXT", ConnectionDef::new().checks(["String"]));
        let n = ws.place(&num, Point::ZERO).unwrap();
        let p = ws.place(&text_slot, Point::ZERO).unwrap();
        let out = ws.block(n).unwrap().output_connection().unwrap();
        let slot = input_of(&ws, p, "TEXT");
        assert_eq!(
            ws.connect(out, slot),
            Err(ConnectError::ChecksRejected(out, slot))
        );
    }

    #[test]
    fn subtree_and_recursive_connections() {
        let mut ws = Workspace::new();
        let w = ws.place(&wrapper(), Point::ZERO).unwrap();
        let inner = ws.place(&statement(), Point::ZERO).unwrap();
        let v = ws.place(&value(), Point::ZERO).unwrap();
        let after = ws.place(&statement(), Point::ZERO).unwrap();
        ws.connect(input_of(&ws, w, "DO"), prev_of(&ws, inner)).unwrap();
        let out = ws.block(v).unwrap().output_connection().unwrap();
        ws.connect(input_of(&ws, w, "ARG"), out).unwrap();
        ws.connect(next_of(&ws, w), prev_of(&ws, after)).unwrap();

        assert_eq!(ws.subtree(w), vec![w, v, inner, after]);
        assert_eq!(ws.input_target(w, "DO"), Some(inner));
        assert_eq!(ws.input_target(w, "ARG"), Some(v));
        assert_eq!(ws.input_target(w, "MISSING"), None);
        assert_eq!(ws.all_connections(w).len(), 4);
        assert_eq!(ws.all_connections_recursive(w).len(), 4 + 2 + 1 + 2);
        assert_eq!(ws.root_of(inner), w);
        assert_eq!(ws.last_block_in_chain(w), after);
        assert!(ws.is_ancestor(w, inner));
        assert!(!ws.is_ancestor(inner, w));
        assert_eq!(ws.roots(), &[w]);
    }

    #[test]
    fn remove_block_drops_subtree_and_index_entries() {
        let mut ws = Workspace::new();
        let top = ws.place(&statement(), Point::ZERO).unwrap();
        let mid = ws.place(&statement(), Point::ZERO).unwrap();
        let low = ws.place(&statement(), Point::ZERO).unwrap();
        ws.connect(next_of(&ws, top), prev_of(&ws, mid)).unwrap();
        ws.connect(next_of(&ws, mid), prev_of(&ws, low)).unwrap();
        assert_eq!(ws.index().len(), 6);

        let removed = ws.remove_block(mid);
        assert_eq!(removed, vec![mid, low]);
        assert_eq!(ws.block_count(), 1);
        assert_eq!(ws.index().len(), 2);
        assert_eq!(ws.next_block(top), None);
        assert_eq!(ws.roots(), &[top]);
        assert!(ws.remove_block(mid).is_empty());
    }

    #[test]
    fn withdraw_and_restore_round_trip() {
        let mut ws = Workspace::new();
        let a = ws.place(&statement(), Point::new(5.0, 5.0)).unwrap();
        let b = ws.place(&statement(), Point::ZERO).unwrap();
        ws.connect(next_of(&ws, a), prev_of(&ws, b)).unwrap();

        let withdrawn = ws.withdraw_block_recursive(a);
        assert_eq!(withdrawn.len(), 4);
        assert!(ws.index().is_empty());
        // Withdrawn connections cannot be indexed by the ordinary path.
        assert!(!ws.index_connection(withdrawn[0]));

        ws.translate_subtree(a, Vec2::new(10.0, 10.0));
        for &c in &withdrawn {
            assert!(ws.restore_connection(c));
            assert!(!ws.restore_connection(c));
        }
        assert_eq!(ws.index().len(), 4);
        let prev = ws.connection(prev_of(&ws, a)).unwrap();
        assert_eq!(prev.position(), Point::new(15.0, 15.0));
    }

    #[test]
    fn set_connection_offset_moves_indexed_entry() {
        let mut ws = Workspace::new();
        let a = ws.place(&statement(), Point::new(0.0, 0.0)).unwrap();
        let next = next_of(&ws, a);
        ws.set_connection_offset(next, Vec2::new(0.0, 90.0));
        let c = ws.connection(next).unwrap();
        assert_eq!(c.position(), Point::new(0.0, 90.0));
        assert!(ws.index().contains(ConnectionKind::Next, next, c.position()));
        assert!(ws.index().bucket(ConnectionKind::Next).is_sorted());
    }

    #[test]
    fn bring_to_front_reorders_roots() {
        let mut ws = Workspace::new();
        let a = ws.place(&statement(), Point::ZERO).unwrap();
        let b = ws.place(&statement(), Point::ZERO).unwrap();
        assert!(ws.bring_to_front(a));
        assert_eq!(ws.roots(), &[b, a]);
        ws.connect(next_of(&ws, a), prev_of(&ws, b)).unwrap();
        assert!(!ws.bring_to_front(b));
    }

    #[test]
    fn reset_clears_everything() {
        let mut ws = Workspace::new();
        let a = ws.place(&statement(), Point::ZERO).unwrap();
        ws.reset();
        assert!(!ws.is_alive(a));
        assert!(ws.roots().is_empty());
        assert!(ws.index().is_empty());
    }
}
