// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag start detection.
//!
//! A drag begins once the pointer has travelled at least `threshold` from the
//! press position. Squared distances are compared so no square root is taken.
//! Passing `use_threshold = false` starts the drag on the first check.
//!
//! Screen-space positions are [`kurbo::Point`]; world-space positions (for a
//! pointer locked to the screen centre, where only the hit point moves) are
//! [`glam::Vec3`].
//!
//! ```
//! use kurbo::Point;
//! use interactable_event_state::drag::should_start_drag;
//!
//! let press = Point::new(10.0, 10.0);
//! assert!(!should_start_drag(press, Point::new(10.5, 10.0), 1.0, true));
//! assert!(should_start_drag(press, Point::new(11.0, 10.0), 1.0, true));
//! assert!(should_start_drag(press, press, 1.0, false));
//! ```

use glam::Vec3;
use kurbo::Point;

/// Returns `true` if a screen-space drag should begin.
pub fn should_start_drag(press: Point, current: Point, threshold: f64, use_threshold: bool) -> bool {
    if !use_threshold {
        return true;
    }
    (current - press).hypot2() >= threshold * threshold
}

/// Returns `true` if a world-space drag should begin.
pub fn should_start_world_drag(press: Vec3, current: Vec3, threshold: f32, use_threshold: bool) -> bool {
    if !use_threshold {
        return true;
    }
    press.distance_squared(current) >= threshold * threshold
}
