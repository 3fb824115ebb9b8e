// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator contracts for raw input and the system cursor.
//!
//! Modules poll an [`InputSampler`] once or more per frame. Every query is
//! synchronous and must describe the current frame. Cursor side effects go
//! through [`CursorControl`].

use core::cell::Cell;

use kurbo::{Point, Size, Vec2};

/// Phase of a touch this frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// The finger touched the surface this frame.
    #[default]
    Began,
    /// The finger moved.
    Moved,
    /// The finger is down but did not move.
    Stationary,
    /// The finger lifted.
    Ended,
    /// The system cancelled tracking.
    Canceled,
}

/// Source of a touch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TouchKind {
    /// A finger on a touch screen.
    #[default]
    Direct,
    /// A remote or trackpad touch, not tied to a screen position.
    Indirect,
    /// A stylus.
    Stylus,
}

/// One touch sample.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Touch {
    /// Stable id for the lifetime of the touch; used as the pointer id.
    pub finger_id: i32,
    /// Phase this frame.
    pub phase: TouchPhase,
    /// Touch source.
    pub kind: TouchKind,
    /// Screen position.
    pub position: Point,
    /// Contact pressure.
    pub pressure: f32,
    /// Stylus altitude angle.
    pub altitude_angle: f32,
    /// Stylus azimuth angle.
    pub azimuth_angle: f32,
    /// Contact radius.
    pub radius: f64,
    /// Accuracy of `radius`.
    pub radius_variance: f64,
}

/// Per-frame raw input queries.
pub trait InputSampler {
    /// Seconds since start-up, unaffected by time scaling.
    fn unscaled_time(&self) -> f64;

    /// A mouse is connected.
    fn mouse_present(&self) -> bool {
        true
    }

    /// Mouse position in screen pixels.
    fn mouse_position(&self) -> Point;

    /// Scroll this frame.
    fn mouse_scroll_delta(&self) -> Vec2;

    /// Mouse `button` went down this frame.
    fn mouse_button_down(&self, button: u8) -> bool;

    /// Mouse `button` went up this frame.
    fn mouse_button_up(&self, button: u8) -> bool;

    /// Number of touches this frame.
    fn touch_count(&self) -> usize {
        0
    }

    /// Touch `index` of this frame.
    fn touch(&self, index: usize) -> Option<Touch> {
        let _ = index;
        None
    }

    /// Raw value of the named axis, without smoothing.
    fn axis_raw(&self, name: &str) -> f64;

    /// The named button went down this frame.
    fn button_down(&self, name: &str) -> bool;

    /// Size of the screen in pixels.
    fn screen_size(&self) -> Size;
}

/// How the system cursor is constrained.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorLockMode {
    /// Free to move.
    #[default]
    None,
    /// Pinned to the centre of the view.
    Locked,
    /// Kept inside the window.
    Confined,
}

/// Cursor side effects requested by modules.
pub trait CursorControl {
    /// Current lock mode.
    fn lock_state(&self) -> CursorLockMode;

    /// Change the lock mode.
    fn set_lock_state(&self, mode: CursorLockMode);

    /// Show or hide the cursor.
    fn set_visible(&self, visible: bool);
}

/// A [`CursorControl`] that only records the requested state.
#[derive(Debug)]
pub struct CursorState {
    lock: Cell<CursorLockMode>,
    visible: Cell<bool>,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            lock: Cell::new(CursorLockMode::None),
            visible: Cell::new(true),
        }
    }
}

impl CursorState {
    /// An unlocked, visible cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while the cursor is shown.
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

impl CursorControl for CursorState {
    fn lock_state(&self) -> CursorLockMode {
        self.lock.get()
    }

    fn set_lock_state(&self, mode: CursorLockMode) {
        self.lock.set(mode);
    }

    fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }
}
