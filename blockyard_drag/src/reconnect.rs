// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconnection at the end of a drag: attach, splice, bump, align.

use blockyard_tree::{
    Block, BlockId, Connection, ConnectionId, ConnectionKind, InputKind, SnapMatch, Workspace,
};
use kurbo::{Point, Vec2};

use crate::view::{ViewCommand, ViewObserver};

/// Applies a snap match to the workspace and mirrors it to the view.
///
/// `radius` is the snap radius in workspace units; bumped remainders land
/// that far from the connection they were displaced from on both axes.
pub(crate) struct Splicer<'a, O: ?Sized> {
    pub(crate) ws: &'a mut Workspace,
    pub(crate) obs: &'a mut O,
    pub(crate) radius: f64,
}

impl<O: ViewObserver + ?Sized> Splicer<'_, O> {
    /// Link the dragged block through `m`, moving any displaced occupant.
    pub(crate) fn apply(&mut self, m: SnapMatch) {
        let moving = self.conn(m.moving);
        let (kind, moving_owner, moving_is_statement) =
            (moving.kind(), moving.owner(), moving.is_statement_input());
        let target = self.conn(m.target);
        let (target_owner, target_is_statement) = (target.owner(), target.is_statement_input());

        tracing::debug!(?kind, moving = ?m.moving, target = ?m.target, "reconnecting");
        match kind {
            ConnectionKind::Output => self.connect_as_input(m.target, m.moving),
            ConnectionKind::Previous if target_is_statement => {
                self.connect_to_statement(m.target, moving_owner);
            }
            ConnectionKind::Previous => self.connect_after(target_owner, moving_owner),
            ConnectionKind::Next if moving_is_statement => {
                self.connect_to_statement(m.moving, target_owner);
            }
            ConnectionKind::Next => self.connect_after(moving_owner, target_owner),
            ConnectionKind::Input => self.connect_as_input(m.moving, m.target),
        }
    }

    /// Plug the block owning `output` into the value input `input`.
    fn connect_as_input(&mut self, input: ConnectionId, output: ConnectionId) {
        assert!(
            self.conn(input).input().is_some(),
            "connection {input:?} is not an input slot"
        );
        let child = self.conn(output).owner();
        let displaced_at = self.conn(input).position();
        let remainder = self.ws.disconnect(input);

        self.link(input, output);
        self.align(input, output);
        self.obs.on_command(ViewCommand::RemoveRoot(child));
        self.obs.on_command(ViewCommand::SetInputChild {
            input,
            child: Some(child),
        });
        if let Some(orphan) = remainder {
            self.reattach_value(child, orphan, displaced_at);
        }
    }

    /// Make `child` the first block of the statement input `statement`.
    fn connect_to_statement(&mut self, statement: ConnectionId, child: BlockId) {
        assert!(
            self.conn(statement).is_statement_input(),
            "connection {statement:?} is not a statement input"
        );
        let child_previous = self
            .block(child)
            .previous_connection()
            .expect("statement child has a previous connection");
        let displaced_at = self.conn(statement).position();
        let remainder = self.ws.disconnect(statement);

        self.link(statement, child_previous);
        self.align(statement, child_previous);
        self.obs.on_command(ViewCommand::RemoveRoot(child));
        self.obs.on_command(ViewCommand::SetInputChild {
            input: statement,
            child: Some(child),
        });
        if let Some(orphan) = remainder {
            self.reattach_statement(child, orphan, displaced_at);
        }
    }

    /// Chain `child` directly below `parent`.
    fn connect_after(&mut self, parent: BlockId, child: BlockId) {
        let parent_next = self
            .block(parent)
            .next_connection()
            .expect("parent block has a next connection");
        let child_previous = self
            .block(child)
            .previous_connection()
            .expect("chained block has a previous connection");
        let displaced_at = self.conn(parent_next).position();
        let remainder = self.ws.disconnect(parent_next);
        if let Some(orphan) = remainder {
            let head = self.conn(orphan).owner();
            self.obs.on_command(ViewCommand::ExtractSubtree(head));
        }

        self.link(parent_next, child_previous);
        self.align(parent_next, child_previous);
        self.obs.on_command(ViewCommand::RemoveRoot(child));
        self.obs.on_command(ViewCommand::MergeAfter {
            group: child,
            after: parent,
        });
        if let Some(orphan) = remainder {
            self.reattach_statement(child, orphan, displaced_at);
        }
    }

    /// Hang a displaced statement chain below the chain headed by `head`,
    /// or bump it when the last block cannot take it.
    fn reattach_statement(&mut self, head: BlockId, orphan: ConnectionId, displaced_at: Point) {
        let orphan_block = self.conn(orphan).owner();
        let last = self.ws.last_block_in_chain(head);
        if let Some(last_next) = self.block(last).next_connection()
            && self.ws.can_connect(last_next, orphan)
        {
            self.link(last_next, orphan);
            self.align(last_next, orphan);
            self.obs.on_command(ViewCommand::MergeAfter {
                group: orphan_block,
                after: last,
            });
            tracing::debug!(?orphan_block, ?last, "remainder spliced below chain");
            return;
        }
        self.bump(orphan_block, orphan, displaced_at);
    }

    /// Find a home for a displaced value block inside the newly attached
    /// `child`, following single compatible inputs downward.
    fn reattach_value(&mut self, child: BlockId, orphan: ConnectionId, displaced_at: Point) {
        let orphan_block = self.conn(orphan).owner();
        let mut block = child;
        while let Some(slot) = self.single_compatible_input(block, orphan) {
            match self.ws.target_block(slot) {
                Some(occupant) => block = occupant,
                None => {
                    self.link(slot, orphan);
                    self.align(slot, orphan);
                    self.obs.on_command(ViewCommand::SetInputChild {
                        input: slot,
                        child: Some(orphan_block),
                    });
                    tracing::debug!(?orphan_block, ?block, "remainder spliced into input");
                    return;
                }
            }
        }
        self.bump(orphan_block, orphan, displaced_at);
    }

    /// The only value input of `block` that could take `orphan`, if exactly
    /// one exists.
    fn single_compatible_input(&self, block: BlockId, orphan: ConnectionId) -> Option<ConnectionId> {
        let mut found = None;
        for input in self.block(block).inputs() {
            let Some(slot) = input.connection() else {
                continue;
            };
            if input.kind() != InputKind::Value || !self.ws.can_connect(slot, orphan) {
                continue;
            }
            if found.is_some() {
                return None;
            }
            found = Some(slot);
        }
        found
    }

    /// Leave `block` as a root, moved so `conn` sits at
    /// `displaced_at + (radius, radius)`.
    fn bump(&mut self, block: BlockId, conn: ConnectionId, displaced_at: Point) {
        let target = displaced_at + Vec2::new(self.radius, self.radius);
        let delta = target - self.conn(conn).position();
        self.ws.translate_subtree(block, delta);
        let position = self.block(block).position();
        self.obs.on_command(ViewCommand::AddRoot(block));
        self.obs.on_command(ViewCommand::MoveBlock(block, position));
        tracing::debug!(?block, ?position, "remainder bumped");
    }

    /// Connect a pair the snap rules already accepted.
    fn link(&mut self, parent: ConnectionId, child: ConnectionId) {
        if let Err(err) = self.ws.connect(parent, child) {
            panic!("validated pair failed to connect: {err}");
        }
    }

    /// Translate the subtree hanging from `child` so it meets `parent`.
    fn align(&mut self, parent: ConnectionId, child: ConnectionId) {
        let delta = self.conn(parent).position() - self.conn(child).position();
        let owner = self.conn(child).owner();
        self.ws.translate_subtree(owner, delta);
    }

    fn conn(&self, id: ConnectionId) -> &Connection {
        self.ws.connection(id).expect("dangling ConnectionId")
    }

    fn block(&self, id: BlockId) -> &Block {
        self.ws.block(id).expect("dangling BlockId")
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use blockyard_tree::{BlockDef, ConnectionDef};

    use super::*;

    fn input_of(ws: &Workspace, b: BlockId, name: &str) -> ConnectionId {
        ws.block(b).unwrap().input(name).unwrap().connection().unwrap()
    }

    fn output_of(ws: &Workspace, b: BlockId) -> ConnectionId {
        ws.block(b).unwrap().output_connection().unwrap()
    }

    #[test]
    fn value_remainder_walks_single_compatible_inputs() {
        let mut ws = Workspace::new();
        let host = ws
            .place(&BlockDef::new("host").value_input("V"), Point::ZERO)
            .unwrap();
        let old = ws.place(&BlockDef::new("old").output(), Point::ZERO).unwrap();
        let outer = ws
            .place(&BlockDef::new("outer").output().value_input("X"), Point::ZERO)
            .unwrap();
        let inner = ws
            .place(&BlockDef::new("inner").output().value_input("Y"), Point::ZERO)
            .unwrap();
        ws.connect(input_of(&ws, host, "V"), output_of(&ws, old)).unwrap();
        ws.connect(input_of(&ws, outer, "X"), output_of(&ws, inner)).unwrap();

        let m = SnapMatch {
            moving: output_of(&ws, outer),
            target: input_of(&ws, host, "V"),
            distance: 0.0,
        };
        let mut commands: Vec<ViewCommand> = Vec::new();
        Splicer {
            ws: &mut ws,
            obs: &mut commands,
            radius: 25.0,
        }
        .apply(m);

        assert_eq!(ws.parent_of(outer), Some(host));
        assert_eq!(ws.parent_of(old), Some(inner));
        assert_eq!(ws.roots(), &[host]);
        assert!(commands.contains(&ViewCommand::SetInputChild {
            input: input_of(&ws, inner, "Y"),
            child: Some(old),
        }));
    }

    #[test]
    fn ambiguous_inputs_bump_the_remainder() {
        let mut ws = Workspace::new();
        let host = ws
            .place(&BlockDef::new("host").value_input("V"), Point::ZERO)
            .unwrap();
        let old = ws.place(&BlockDef::new("old").output(), Point::ZERO).unwrap();
        let pair = ws
            .place(
                &BlockDef::new("pair").output().value_input("A").value_input("B"),
                Point::new(300.0, 0.0),
            )
            .unwrap();
        ws.connect(input_of(&ws, host, "V"), output_of(&ws, old)).unwrap();
        let slot = input_of(&ws, host, "V");
        let displaced_at = ws.connection(slot).unwrap().position();

        let m = SnapMatch {
            moving: output_of(&ws, pair),
            target: slot,
            distance: 0.0,
        };
        Splicer {
            ws: &mut ws,
            obs: &mut (),
            radius: 25.0,
        }
        .apply(m);

        assert!(ws.is_root(old));
        let landed = ws.connection(output_of(&ws, old)).unwrap().position();
        assert_eq!(landed, displaced_at + Vec2::new(25.0, 25.0));
    }

    #[test]
    fn type_checks_steer_the_remainder() {
        let mut ws = Workspace::new();
        let host = ws
            .place(&BlockDef::new("host").value_input("V"), Point::ZERO)
            .unwrap();
        let old = ws
            .place(
                &BlockDef::new("num").output_with(ConnectionDef::new().checks(["Number"])),
                Point::ZERO,
            )
            .unwrap();
        let join = ws
            .place(
                &BlockDef::new("join")
                    .output()
                    .value_input_with("TEXT", ConnectionDef::new().checks(["String"]))
                    .value_input_with("COUNT", ConnectionDef::new().checks(["Number"])),
                Point::ZERO,
            )
            .unwrap();
        ws.connect(input_of(&ws, host, "V"), output_of(&ws, old)).unwrap();

        let m = SnapMatch {
            moving: output_of(&ws, join),
            target: input_of(&ws, host, "V"),
            distance: 0.0,
        };
        Splicer {
            ws: &mut ws,
            obs: &mut (),
            radius: 25.0,
        }
        .apply(m);

        assert_eq!(ws.target_block(input_of(&ws, join, "COUNT")), Some(old));
    }
}
