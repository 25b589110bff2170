// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compatibility rules and nearest-connection search for snapping.

use blockyard_index::ConnectionKind;

use crate::types::{BlockId, ConnectionId, IndexState};
use crate::workspace::Workspace;

/// A candidate pairing found by a snap search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapMatch {
    /// Connection on the dragged block.
    pub moving: ConnectionId,
    /// Indexed connection it would plug into.
    pub target: ConnectionId,
    /// Euclidean distance between the two at search time.
    pub distance: f64,
}

impl Workspace {
    /// Whether `a` and `b` could ever be linked, ignoring occupancy and
    /// tree shape: opposite kinds, different blocks, intersecting checks.
    pub fn can_connect(&self, a: ConnectionId, b: ConnectionId) -> bool {
        let (Some(ca), Some(cb)) = (self.connection(a), self.connection(b)) else {
            return false;
        };
        ca.kind().pairs_with(cb.kind()) && ca.owner() != cb.owner() && ca.checks_accept(cb)
    }

    /// Whether the dragged connection `moving` may snap to `candidate`.
    ///
    /// On top of [`Workspace::can_connect`]:
    /// - the candidate must not be withdrawn;
    /// - `moving` must be free;
    /// - an output or previous `moving` may take an occupied candidate when
    ///   the occupant is movable (it gets spliced or bumped);
    /// - a next or input `moving` needs a free candidate on a movable block,
    ///   since that block is pulled onto the dragged one;
    /// - the link must not make a block its own ancestor.
    pub fn is_connection_allowed(&self, moving: ConnectionId, candidate: ConnectionId) -> bool {
        if !self.can_connect(moving, candidate) {
            return false;
        }
        let m = self.conn_ref(moving);
        let c = self.conn_ref(candidate);
        if c.state() == IndexState::Withdrawn {
            return false;
        }
        if m.is_connected() {
            return false;
        }
        match m.kind() {
            ConnectionKind::Output | ConnectionKind::Previous => {
                if let Some(occupant) = c.target()
                    && !self.occupant_is_movable(occupant)
                {
                    return false;
                }
            }
            ConnectionKind::Next | ConnectionKind::Input => {
                if c.is_connected() || !self.block_ref(c.owner()).is_movable() {
                    return false;
                }
            }
        }
        let (parent, child) = if m.kind().is_child_side() {
            (c.owner(), m.owner())
        } else {
            (m.owner(), c.owner())
        };
        !self.is_ancestor(child, parent)
    }

    /// Closest allowed indexed connection to `conn` within `radius`.
    pub fn find_best_connection(&self, conn: ConnectionId, radius: f64) -> Option<SnapMatch> {
        let c = self.connection(conn)?;
        self.index
            .find_closest(c.kind(), c.position(), radius, |candidate| {
                candidate != conn && self.is_connection_allowed(conn, candidate)
            })
            .map(|n| SnapMatch {
                moving: conn,
                target: n.key,
                distance: n.distance,
            })
    }

    /// Best match over all of the block's own connections.
    ///
    /// Each search is bounded by the best distance found so far; on a tie
    /// the earlier connection of the block wins.
    pub fn find_best_connection_for_block(
        &self,
        block: BlockId,
        radius: f64,
    ) -> Option<SnapMatch> {
        let mut best: Option<SnapMatch> = None;
        let mut radius = radius;
        for conn in self.all_connections(block) {
            let Some(found) = self.find_best_connection(conn, radius) else {
                continue;
            };
            if best.is_none_or(|b| found.distance < b.distance) {
                radius = found.distance;
                best = Some(found);
            }
        }
        best
    }

    fn occupant_is_movable(&self, occupant: ConnectionId) -> bool {
        let owner = self.conn_ref(occupant).owner();
        self.block_ref(owner).is_movable()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;
    use crate::{BlockDef, BlockFlags};

    fn statement() -> BlockDef {
        BlockDef::new("statement").previous().next()
    }

    fn value() -> BlockDef {
        BlockDef::new("value").output()
    }

    fn prev_of(ws: &Workspace, b: BlockId) -> ConnectionId {
        ws.block(b).unwrap().previous_connection().unwrap()
    }

    fn next_of(ws: &Workspace, b: BlockId) -> ConnectionId {
        ws.block(b).unwrap().next_connection().unwrap()
    }

    #[test]
    fn nearest_input_wins() {
        let mut ws = Workspace::new();
        let host = BlockDef::new("host")
            .value_input_with("A", crate::ConnectionDef::new().at(0.0, 0.0))
            .value_input_with("B", crate::ConnectionDef::new().at(40.0, 0.0));
        let h = ws.place(&host, Point::new(100.0, 100.0)).unwrap();
        let v = ws.place(&value(), Point::new(135.0, 100.0)).unwrap();
        let out = ws.block(v).unwrap().output_connection().unwrap();
        let b_slot = ws.block(h).unwrap().input("B").unwrap().connection().unwrap();

        let m = ws.find_best_connection(out, 25.0).unwrap();
        assert_eq!(m.target, b_slot);
        assert_eq!(m.distance, 5.0);
        assert!(ws.find_best_connection(out, 4.0).is_none());
    }

    #[test]
    fn own_and_incompatible_connections_are_skipped() {
        let mut ws = Workspace::new();
        let a = ws.place(&statement(), Point::ZERO).unwrap();
        // The block's own next sits right on top of its previous.
        ws.set_connection_offset(next_of(&ws, a), kurbo::Vec2::ZERO);
        assert!(ws.find_best_connection(prev_of(&ws, a), 25.0).is_none());

        let v = ws.place(&value(), Point::ZERO).unwrap();
        let out = ws.block(v).unwrap().output_connection().unwrap();
        assert!(!ws.can_connect(out, next_of(&ws, a)));
    }

    #[test]
    fn occupied_next_with_immovable_occupant_is_rejected() {
        let mut ws = Workspace::new();
        let top = ws.place(&statement(), Point::ZERO).unwrap();
        let pinned = ws
            .place(&statement().flags(BlockFlags::empty()), Point::new(0.0, 48.0))
            .unwrap();
        ws.connect(next_of(&ws, top), prev_of(&ws, pinned)).unwrap();
        let loose = ws.place(&statement(), Point::new(2.0, 50.0)).unwrap();

        assert!(!ws.is_connection_allowed(prev_of(&ws, loose), next_of(&ws, top)));
        ws.set_flags(pinned, BlockFlags::MOVABLE);
        assert!(ws.is_connection_allowed(prev_of(&ws, loose), next_of(&ws, top)));
    }

    #[test]
    fn immovable_root_is_not_pulled_onto_a_dragged_block() {
        let mut ws = Workspace::new();
        let top = ws.place(&statement(), Point::ZERO).unwrap();
        let pinned = ws
            .place(&statement().flags(BlockFlags::empty()), Point::new(3.0, 50.0))
            .unwrap();
        let holder = ws
            .place(&BlockDef::new("holder").value_input("V"), Point::new(0.0, 200.0))
            .unwrap();
        let fixed_value = ws
            .place(&value().flags(BlockFlags::empty()), Point::new(162.0, 200.0))
            .unwrap();
        let slot = ws.block(holder).unwrap().input("V").unwrap().connection().unwrap();
        let out = ws.block(fixed_value).unwrap().output_connection().unwrap();

        assert!(!ws.is_connection_allowed(next_of(&ws, top), prev_of(&ws, pinned)));
        assert!(ws.find_best_connection(next_of(&ws, top), 25.0).is_none());
        assert!(!ws.is_connection_allowed(slot, out));

        ws.set_flags(pinned, BlockFlags::MOVABLE);
        ws.set_flags(fixed_value, BlockFlags::MOVABLE);
        assert!(ws.is_connection_allowed(next_of(&ws, top), prev_of(&ws, pinned)));
        assert!(ws.is_connection_allowed(slot, out));
    }

    #[test]
    fn filled_statement_input_does_not_snap() {
        let mut ws = Workspace::new();
        let wrapper = ws
            .place(&BlockDef::new("wrapper").statement_input("DO"), Point::ZERO)
            .unwrap();
        let body = ws.place(&statement(), Point::new(24.0, 24.0)).unwrap();
        let slot = ws.block(wrapper).unwrap().input("DO").unwrap().connection().unwrap();
        ws.connect(slot, prev_of(&ws, body)).unwrap();
        let loose = ws.place(&statement(), Point::new(24.0, 30.0)).unwrap();

        assert!(ws.can_connect(slot, prev_of(&ws, loose)));
        assert!(!ws.is_connection_allowed(slot, prev_of(&ws, loose)));
        assert!(ws.find_best_connection(slot, 25.0).is_none());

        ws.disconnect(slot);
        assert!(ws.is_connection_allowed(slot, prev_of(&ws, loose)));
    }

    #[test]
    fn cycles_are_never_offered() {
        let mut ws = Workspace::new();
        let a = ws.place(&statement(), Point::ZERO).unwrap();
        let b = ws.place(&statement(), Point::ZERO).unwrap();
        ws.connect(next_of(&ws, a), prev_of(&ws, b)).unwrap();
        // b's next would accept a's previous geometrically, but a is b's parent.
        assert!(!ws.is_connection_allowed(next_of(&ws, b), prev_of(&ws, a)));
        assert!(!ws.is_connection_allowed(prev_of(&ws, a), next_of(&ws, b)));
    }

    #[test]
    fn withdrawn_candidates_are_invisible() {
        let mut ws = Workspace::new();
        let a = ws.place(&statement(), Point::ZERO).unwrap();
        let b = ws.place(&statement(), Point::new(0.0, 50.0)).unwrap();
        assert!(ws.find_best_connection(prev_of(&ws, b), 25.0).is_some());
        ws.withdraw_block_recursive(a);
        assert!(ws.find_best_connection(prev_of(&ws, b), 25.0).is_none());
    }

    #[test]
    fn block_search_keeps_the_first_of_equal_matches() {
        let mut ws = Workspace::new();
        let moving = ws.place(&statement(), Point::new(0.0, 100.0)).unwrap();
        let above = ws.place(&statement(), Point::new(0.0, 42.0)).unwrap();
        let _below = ws.place(&statement(), Point::new(0.0, 158.0)).unwrap();
        // moving.previous at y=100 is 10 from above.next (y=90);
        // moving.next at y=148 is 10 from below.previous (y=158).
        let m = ws.find_best_connection_for_block(moving, 25.0).unwrap();
        assert_eq!(m.moving, prev_of(&ws, moving));
        assert_eq!(m.target, next_of(&ws, above));
        assert_eq!(m.distance, 10.0);
    }
}
