// Copyright 2025 the Blockyard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag tuning and screen/workspace coordinate conversion.

use kurbo::{Point, Rect, Vec2};

/// Tuning knobs for a [`Dragger`](crate::Dragger).
///
/// Both lengths are in screen pixels and converted through the current
/// [`Viewport`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragConfig {
    /// Maximum distance at which a connection is offered as a snap target.
    pub snap_radius_px: f64,
    /// Distance the pointer must travel before a touch becomes a drag.
    pub drag_slop_px: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            snap_radius_px: 25.0,
            drag_slop_px: 0.0,
        }
    }
}

impl DragConfig {
    /// Replace the snap radius.
    pub fn with_snap_radius(mut self, px: f64) -> Self {
        self.snap_radius_px = px;
        self
    }

    /// Replace the drag slop.
    pub fn with_drag_slop(mut self, px: f64) -> Self {
        self.drag_slop_px = px;
        self
    }
}

/// Maps screen pixels to workspace units.
///
/// A workspace point is `screen / scale + scroll`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Zoom factor; screen pixels per workspace unit.
    pub scale: f64,
    /// Workspace point shown at the screen origin.
    pub scroll: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            scroll: Vec2::ZERO,
        }
    }
}

impl Viewport {
    /// A viewport with the given zoom and scroll.
    pub fn new(scale: f64, scroll: Vec2) -> Self {
        debug_assert!(scale > 0.0, "viewport scale must be positive");
        Self { scale, scroll }
    }

    /// Convert a screen point to workspace coordinates.
    pub fn to_workspace(&self, screen: Point) -> Point {
        (screen.to_vec2() / self.scale + self.scroll).to_point()
    }

    /// Convert a screen-space displacement to workspace units.
    pub fn to_workspace_delta(&self, delta: Vec2) -> Vec2 {
        delta / self.scale
    }

    /// Convert a screen length to workspace units.
    pub fn to_workspace_len(&self, px: f64) -> f64 {
        px / self.scale
    }
}

/// Inclusive point-in-rectangle test; points on any edge count as inside.
pub(crate) fn contains_inclusive(rect: Rect, p: Point) -> bool {
    let r = rect.abs();
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_applies_scale_then_scroll() {
        let vp = Viewport::new(2.0, Vec2::new(10.0, 0.0));
        assert_eq!(vp.to_workspace(Point::new(20.0, 20.0)), Point::new(20.0, 10.0));
        assert_eq!(vp.to_workspace_delta(Vec2::new(8.0, -4.0)), Vec2::new(4.0, -2.0));
        assert_eq!(vp.to_workspace_len(25.0), 12.5);
    }

    #[test]
    fn trash_edges_are_inside() {
        let trash = Rect::new(0.0, 0.0, 50.0, 50.0);
        assert!(contains_inclusive(trash, Point::new(50.0, 50.0)));
        assert!(contains_inclusive(trash, Point::new(0.0, 25.0)));
        assert!(!contains_inclusive(trash, Point::new(50.1, 25.0)));
    }

    #[test]
    fn builders_override_defaults() {
        let cfg = DragConfig::default().with_snap_radius(40.0).with_drag_slop(3.0);
        assert_eq!(cfg.snap_radius_px, 40.0);
        assert_eq!(cfg.drag_slop_px, 3.0);
    }
}
