// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional navigation from analog axes.
//!
//! [`determine_move_direction`] quantises an axis pair into a cardinal
//! [`MoveDirection`]. [`MoveRepeat`] throttles how often a held direction is
//! re-sent: the first repeat in a direction waits `repeat_delay`, later ones
//! (and any change of direction of at least 90 degrees) wait
//! `1 / actions_per_second`.
//!
//! ```
//! use kurbo::Vec2;
//! use interactable_event_state::navigation::{MoveDirection, MoveRepeat, RepeatTiming};
//!
//! let timing = RepeatTiming { repeat_delay: 0.5, actions_per_second: 10.0 };
//! let mut repeat = MoveRepeat::new();
//! let right = Vec2::new(1.0, 0.0);
//!
//! assert!(repeat.should_send(right, 1.0, timing));
//! repeat.record_sent(right, 1.0);
//! // Held: the first repeat waits for the full delay.
//! assert!(!repeat.should_send(right, 1.2, timing));
//! assert!(repeat.should_send(right, 1.6, timing));
//! ```

use kurbo::Vec2;

/// Default dead zone for [`determine_move_direction`].
pub const DEFAULT_DEAD_ZONE: f64 = 0.6;

const AXIS_EPSILON: f64 = 1e-6;

/// A cardinal navigation direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    /// Inside the dead zone.
    #[default]
    None,
    /// Negative x.
    Left,
    /// Positive y.
    Up,
    /// Positive x.
    Right,
    /// Negative y.
    Down,
}

/// Quantise `(x, y)` into a direction.
///
/// Vectors shorter than `dead_zone` map to [`MoveDirection::None`]. Otherwise
/// the dominant axis decides; ties go to the vertical axis.
pub fn determine_move_direction(x: f64, y: f64, dead_zone: f64) -> MoveDirection {
    if x * x + y * y < dead_zone * dead_zone {
        return MoveDirection::None;
    }
    if x * x > y * y {
        if x > 0.0 {
            MoveDirection::Right
        } else {
            MoveDirection::Left
        }
    } else if y > 0.0 {
        MoveDirection::Up
    } else {
        MoveDirection::Down
    }
}

/// Combine raw axis values, snapping an axis to ±1 on the frame its button
/// went down so digital presses register past the dead zone.
pub fn raw_move_vector(x: f64, y: f64, x_pressed: bool, y_pressed: bool) -> Vec2 {
    fn snap(v: f64, pressed: bool) -> f64 {
        if !pressed {
            v
        } else if v < 0.0 {
            -1.0
        } else if v > 0.0 {
            1.0
        } else {
            v
        }
    }
    Vec2::new(snap(x, x_pressed), snap(y, y_pressed))
}

/// Returns `true` if both components are approximately zero.
pub fn is_neutral(movement: Vec2) -> bool {
    is_zero(movement.x) && is_zero(movement.y)
}

fn is_zero(v: f64) -> bool {
    v > -AXIS_EPSILON && v < AXIS_EPSILON
}

/// Repeat timing knobs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RepeatTiming {
    /// Seconds before the first repeat of a held direction.
    pub repeat_delay: f64,
    /// Repeat rate once the delay has passed.
    pub actions_per_second: f64,
}

/// Throttle for repeated navigation moves.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MoveRepeat {
    prev_action_time: f64,
    last_move: Vec2,
    consecutive: u32,
}

impl MoveRepeat {
    /// Create a throttle that has sent nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of moves sent in the current direction.
    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    /// Forget the current streak.
    pub fn reset(&mut self) {
        self.consecutive = 0;
    }

    /// Decide whether `movement` may be sent at `now`.
    ///
    /// A neutral vector never sends and resets the streak.
    pub fn should_send(&mut self, movement: Vec2, now: f64, timing: RepeatTiming) -> bool {
        if is_neutral(movement) {
            self.consecutive = 0;
            return false;
        }
        let wait = if self.is_similar(movement) && self.consecutive == 1 {
            timing.repeat_delay
        } else {
            1.0 / timing.actions_per_second
        };
        now > self.prev_action_time + wait
    }

    /// Record that `movement` was sent at `now`.
    pub fn record_sent(&mut self, movement: Vec2, now: f64) {
        if !self.is_similar(movement) {
            self.consecutive = 0;
        }
        self.consecutive += 1;
        self.prev_action_time = now;
        self.last_move = movement;
    }

    fn is_similar(&self, movement: Vec2) -> bool {
        movement.dot(self.last_move) > 0.0
    }
}
