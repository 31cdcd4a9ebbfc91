//! Pointer input adapter
//!
//! Converts a drag gesture in device coordinates into a catcher position in
//! playfield percent. The grab point is remembered so the catcher keeps its
//! offset from the pointer instead of jumping under it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_percent;

/// Screen rectangle of the playfield in device coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayfieldRect {
    /// Top-left corner
    pub origin: Vec2,
    pub size: Vec2,
}

impl Default for PlayfieldRect {
    /// A 100x100 rect at the origin, so device units equal percent
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            size: Vec2::splat(100.0),
        }
    }
}

impl PlayfieldRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(left, top),
            size: Vec2::new(width, height),
        }
    }

    /// A rect that can map coordinates (finite, positive width)
    pub fn is_usable(&self) -> bool {
        self.origin.is_finite() && self.size.is_finite() && self.size.x > 0.0
    }

    /// Device x of a playfield percent
    pub fn percent_to_device_x(&self, percent: f32) -> f32 {
        self.origin.x + percent / 100.0 * self.size.x
    }
}

/// In-progress drag, if any
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    /// Device-pixel distance from the catcher center to the grab point
    grab_offset: Option<f32>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.grab_offset.is_some()
    }

    /// Begin a drag at `pointer` with the catcher currently at `catcher_x`
    pub fn begin(&mut self, pointer: Vec2, catcher_x: f32, rect: &PlayfieldRect) -> bool {
        if !rect.is_usable() || !pointer.is_finite() {
            return false;
        }
        let catcher_px = catcher_x / 100.0 * rect.size.x;
        self.grab_offset = Some(pointer.x - rect.origin.x - catcher_px);
        true
    }

    /// Catcher x for a pointer position, or None when not dragging
    pub fn catcher_x_for(&self, pointer: Vec2, rect: &PlayfieldRect) -> Option<f32> {
        let offset = self.grab_offset?;
        if !rect.is_usable() || !pointer.x.is_finite() {
            return None;
        }
        let x = (pointer.x - rect.origin.x - offset) / rect.size.x * 100.0;
        Some(clamp_percent(x))
    }

    pub fn end(&mut self) {
        self.grab_offset = None;
    }
}
