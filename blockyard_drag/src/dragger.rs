// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag gesture state machine.
//!
//! A gesture runs `Idle -> Touched -> Dragging -> Idle`:
//!
//! - [`Dragger::on_down`] picks up a movable block. An embedded block is
//!   extracted from its parent right away so it can be moved as a root.
//! - The first [`Dragger::on_move`] beyond the drag slop withdraws the
//!   subtree's connections from the index so the block cannot snap to itself.
//! - Further moves reposition the drag root and track the closest snap
//!   target, highlighting at most one connection at a time.
//! - [`Dragger::on_up`] trashes, connects, or drops the block, then restores
//!   every withdrawn connection at its final position.
//!
//! A release that never left the slop is a click: the block returns to the
//! exact place it was taken from.

use alloc::vec::Vec;

use blockyard_tree::{BlockId, ConnectionId, Workspace};
use kurbo::{Point, Rect};

use crate::config::{DragConfig, Viewport, contains_inclusive};
use crate::reconnect::Splicer;
use crate::view::{ViewCommand, ViewObserver};

/// Where the dragger is in a gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragPhase {
    /// No gesture.
    Idle,
    /// A block was touched but the pointer has not left the slop.
    Touched,
    /// The block is following the pointer.
    Dragging,
}

/// How a gesture ended.
#[derive(Clone, Debug, PartialEq)]
pub enum DragOutcome {
    /// Released without dragging; the block is back where it was.
    Clicked(BlockId),
    /// The drag root was linked through `moving` to `target`.
    Connected {
        /// Drag root.
        root: BlockId,
        /// Connection of the drag root that snapped.
        moving: ConnectionId,
        /// Connection it snapped to.
        target: ConnectionId,
    },
    /// Released away from any compatible connection.
    Dropped {
        /// Drag root, still a root.
        root: BlockId,
        /// Its final workspace position.
        position: Point,
    },
    /// Released over the trash; the subtree was deleted.
    Trashed {
        /// Former drag root.
        root: BlockId,
        /// Every deleted block, the root first.
        removed: Vec<BlockId>,
    },
    /// No gesture was active, or its block disappeared.
    Ignored,
}

#[derive(Clone, Debug)]
struct Gesture {
    root: BlockId,
    /// Screen point of the touch.
    touch: Point,
    original_position: Point,
    /// Parent-side connection the root hung from before extraction.
    original_parent: Option<ConnectionId>,
    dragging: bool,
    withdrawn: Vec<ConnectionId>,
    highlighted: Option<ConnectionId>,
}

/// Drives one drag gesture at a time over a [`Workspace`].
///
/// Pointer positions are screen points; the [`Viewport`] converts them to
/// workspace units. Structural changes are reported to a [`ViewObserver`].
///
/// ```rust
/// use kurbo::Point;
/// use blockyard_drag::{DragOutcome, Dragger, ViewCommand};
/// use blockyard_tree::{BlockDef, Workspace};
///
/// let statement = BlockDef::new("step").previous().next();
/// let mut ws = Workspace::new();
/// let first = ws.place(&statement, Point::new(0.0, 0.0)).unwrap();
/// let second = ws.place(&statement, Point::new(200.0, 200.0)).unwrap();
///
/// let mut dragger = Dragger::default();
/// let mut view: Vec<ViewCommand> = Vec::new();
/// assert!(dragger.on_down(&mut ws, &mut view, second, Point::new(200.0, 200.0)));
/// dragger.on_move(&mut ws, &mut view, Point::new(5.0, 52.0));
/// let outcome = dragger.on_up(&mut ws, &mut view, Point::new(5.0, 52.0));
///
/// assert!(matches!(outcome, DragOutcome::Connected { .. }));
/// assert_eq!(ws.next_block(first), Some(second));
/// assert_eq!(ws.block(second).unwrap().position(), Point::new(0.0, 48.0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Dragger {
    config: DragConfig,
    viewport: Viewport,
    trash: Option<Rect>,
    gesture: Option<Gesture>,
}

impl Dragger {
    /// Create a dragger with the given tuning.
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current tuning.
    pub fn config(&self) -> DragConfig {
        self.config
    }

    /// Replace the tuning; takes effect on the next pointer event.
    pub fn set_config(&mut self, config: DragConfig) {
        self.config = config;
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the viewport.
    ///
    /// Changing the zoom mid-gesture rescales the remaining movement only.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Set or clear the screen-space trash region.
    pub fn set_trash_region(&mut self, region: Option<Rect>) {
        self.trash = region;
    }

    /// Whether a release at `screen` would hit the trash.
    pub fn is_over_trash(&self, screen: Point) -> bool {
        self.trash.is_some_and(|r| contains_inclusive(r, screen))
    }

    /// Snap radius in workspace units.
    pub fn snap_radius(&self) -> f64 {
        self.viewport.to_workspace_len(self.config.snap_radius_px)
    }

    /// Where the current gesture stands.
    pub fn phase(&self) -> DragPhase {
        match &self.gesture {
            None => DragPhase::Idle,
            Some(g) if g.dragging => DragPhase::Dragging,
            Some(_) => DragPhase::Touched,
        }
    }

    /// The block being dragged, if any.
    pub fn drag_root(&self) -> Option<BlockId> {
        self.gesture.as_ref().map(|g| g.root)
    }

    /// The connection currently highlighted as snap target.
    pub fn highlighted(&self) -> Option<ConnectionId> {
        self.gesture.as_ref().and_then(|g| g.highlighted)
    }

    /// Start a gesture on `block`.
    ///
    /// Returns `false` (and changes nothing) if a gesture is already active
    /// or the block is stale or not movable.
    pub fn on_down<O: ViewObserver + ?Sized>(
        &mut self,
        ws: &mut Workspace,
        obs: &mut O,
        block: BlockId,
        screen: Point,
    ) -> bool {
        if self.gesture.is_some() {
            tracing::warn!(?block, "touch ignored: a gesture is already active");
            return false;
        }
        let Some(b) = ws.block(block) else {
            tracing::warn!(?block, "touch ignored: stale block");
            return false;
        };
        if !b.is_movable() {
            tracing::debug!(?block, "touch ignored: block is not movable");
            return false;
        }
        let original_position = b.position();
        let parent_side = b.parent_side();
        let original_parent = ws.parent_connection(block);

        if let (Some(side), Some(parent)) = (parent_side, original_parent) {
            ws.disconnect(side);
            let into_input = ws.connection(parent).is_some_and(|c| c.input().is_some());
            if into_input {
                obs.on_command(ViewCommand::SetInputChild {
                    input: parent,
                    child: None,
                });
            } else {
                obs.on_command(ViewCommand::ExtractSubtree(block));
            }
            obs.on_command(ViewCommand::AddRoot(block));
        }

        tracing::debug!(?block, extracted = original_parent.is_some(), "touched");
        self.gesture = Some(Gesture {
            root: block,
            touch: screen,
            original_position,
            original_parent,
            dragging: false,
            withdrawn: Vec::new(),
            highlighted: None,
        });
        true
    }

    /// Follow the pointer. Returns `true` while the block is being dragged.
    pub fn on_move<O: ViewObserver + ?Sized>(
        &mut self,
        ws: &mut Workspace,
        obs: &mut O,
        screen: Point,
    ) -> bool {
        let Some(mut g) = self.gesture.take() else {
            return false;
        };
        if !ws.is_alive(g.root) {
            tracing::warn!(root = ?g.root, "gesture dropped: block was removed");
            return false;
        }
        if !g.dragging {
            if (screen - g.touch).hypot() <= self.config.drag_slop_px {
                self.gesture = Some(g);
                return false;
            }
            g.dragging = true;
            g.withdrawn = ws.withdraw_block_recursive(g.root);
            ws.bring_to_front(g.root);
            obs.on_command(ViewCommand::BringToFront(g.root));
            tracing::debug!(root = ?g.root, withdrawn = g.withdrawn.len(), "drag started");
        }
        self.follow(ws, obs, &mut g, screen);
        self.gesture = Some(g);
        true
    }

    /// Finish the gesture at `screen`.
    pub fn on_up<O: ViewObserver + ?Sized>(
        &mut self,
        ws: &mut Workspace,
        obs: &mut O,
        screen: Point,
    ) -> DragOutcome {
        let Some(mut g) = self.gesture.take() else {
            return DragOutcome::Ignored;
        };
        if !ws.is_alive(g.root) {
            tracing::warn!(root = ?g.root, "release ignored: block was removed");
            return DragOutcome::Ignored;
        }
        if !g.dragging {
            restore_attachment(ws, obs, &g);
            tracing::debug!(root = ?g.root, "clicked");
            return DragOutcome::Clicked(g.root);
        }

        self.follow(ws, obs, &mut g, screen);
        clear_highlight(obs, &mut g);
        let root = g.root;
        let Some(position) = ws.block(root).map(|b| b.position()) else {
            unreachable!("drag root checked alive above");
        };
        ws.translate_descendants(root, position - g.original_position);

        let deletable = ws.block(root).is_some_and(|b| b.is_deletable());
        let outcome = if deletable && self.is_over_trash(screen) {
            let removed = ws.remove_block(root);
            g.withdrawn.clear();
            obs.on_command(ViewCommand::RemoveSubtree(root));
            tracing::debug!(?root, removed = removed.len(), "trashed");
            DragOutcome::Trashed { root, removed }
        } else if let Some(m) = ws.find_best_connection_for_block(root, self.snap_radius()) {
            Splicer {
                ws: &mut *ws,
                obs: &mut *obs,
                radius: self.snap_radius(),
            }
            .apply(m);
            DragOutcome::Connected {
                root,
                moving: m.moving,
                target: m.target,
            }
        } else {
            tracing::debug!(?root, ?position, "dropped");
            DragOutcome::Dropped { root, position }
        };
        finalize(ws, obs, &mut g);
        outcome
    }

    /// Abort the active gesture, putting the block back where it was taken
    /// from. Returns `false` when no gesture was active.
    pub fn cancel<O: ViewObserver + ?Sized>(&mut self, ws: &mut Workspace, obs: &mut O) -> bool {
        let Some(mut g) = self.gesture.take() else {
            return false;
        };
        if !ws.is_alive(g.root) {
            return true;
        }
        if g.dragging {
            clear_highlight(obs, &mut g);
            ws.set_position(g.root, g.original_position);
            obs.on_command(ViewCommand::MoveBlock(g.root, g.original_position));
        }
        restore_attachment(ws, obs, &g);
        if g.dragging {
            finalize(ws, obs, &mut g);
        }
        tracing::debug!(root = ?g.root, "gesture cancelled");
        true
    }

    /// Move the drag root to follow `screen` and refresh the highlight.
    fn follow<O: ViewObserver + ?Sized>(
        &self,
        ws: &mut Workspace,
        obs: &mut O,
        g: &mut Gesture,
        screen: Point,
    ) {
        let position = g.original_position + self.viewport.to_workspace_delta(screen - g.touch);
        ws.set_position(g.root, position);
        obs.on_command(ViewCommand::MoveBlock(g.root, position));

        let best = ws.find_best_connection_for_block(g.root, self.snap_radius());
        let candidate = best.map(|m| m.target);
        if candidate != g.highlighted {
            clear_highlight(obs, g);
            if let Some(connection) = candidate {
                obs.on_command(ViewCommand::Highlight {
                    connection,
                    on: true,
                });
            }
            g.highlighted = candidate;
        }
        tracing::trace!(root = ?g.root, ?position, ?best, "drag moved");
    }
}

fn clear_highlight<O: ViewObserver + ?Sized>(obs: &mut O, g: &mut Gesture) {
    if let Some(connection) = g.highlighted.take() {
        obs.on_command(ViewCommand::Highlight {
            connection,
            on: false,
        });
    }
}

/// Reconnect the root to the parent connection it was extracted from.
fn restore_attachment<O: ViewObserver + ?Sized>(ws: &mut Workspace, obs: &mut O, g: &Gesture) {
    let Some(parent) = g.original_parent else {
        return;
    };
    let Some(side) = ws.block(g.root).and_then(|b| b.parent_side()) else {
        return;
    };
    if let Err(err) = ws.connect(parent, side) {
        tracing::warn!(root = ?g.root, %err, "could not restore original attachment");
        return;
    }
    obs.on_command(ViewCommand::RemoveRoot(g.root));
    let Some(parent_conn) = ws.connection(parent) else {
        return;
    };
    if parent_conn.input().is_some() {
        obs.on_command(ViewCommand::SetInputChild {
            input: parent,
            child: Some(g.root),
        });
    } else {
        obs.on_command(ViewCommand::MergeAfter {
            group: g.root,
            after: parent_conn.owner(),
        });
    }
}

/// Put every withdrawn connection back into the index.
fn finalize<O: ViewObserver + ?Sized>(ws: &mut Workspace, obs: &mut O, g: &mut Gesture) {
    let mut restored = 0_usize;
    for conn in g.withdrawn.drain(..) {
        if ws.restore_connection(conn) {
            restored += 1;
        }
    }
    obs.on_command(ViewCommand::RequestLayout);
    tracing::debug!(root = ?g.root, restored, "drag finished");
}
