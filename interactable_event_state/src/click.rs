// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press target and multi-click counting for a single pointer.
//!
//! [`ClickState`] remembers which node accepted the current press, which node
//! accepted the press before it, and how many presses in a row landed on the
//! same node within the double-click window.
//!
//! ## Usage
//!
//! 1) At the start of a press, call [`ClickState::expire`] so handlers that run
//!    during the press observe a count reset if the window elapsed.
//! 2) Deliver the press and resolve which node accepted it.
//! 3) Call [`ClickState::register_press`] with that node.
//! 4) On release (or when a drag takes over) call [`ClickState::set_press`]
//!    with `None`; the released node becomes the "last press".
//!
//! ## Counting rules
//!
//! - Same node as the last press and within the window: count grows by one.
//! - Same node but the window elapsed: count restarts at 1.
//! - Different node: count restarts at 1.
//!
//! "Same node" compares the optional targets as a whole, so two presses that
//! both land on nothing also count as a repeat.
//!
//! ```
//! use interactable_event_state::click::ClickState;
//!
//! let mut clicks: ClickState<u32> = ClickState::new();
//!
//! clicks.expire(0.0, 0.3);
//! clicks.register_press(Some(7), 0.0, 0.3);
//! clicks.set_press(None);
//! assert_eq!(clicks.count(), 1);
//! assert_eq!(clicks.last_press(), Some(7));
//!
//! clicks.expire(0.1, 0.3);
//! clicks.register_press(Some(7), 0.1, 0.3);
//! assert_eq!(clicks.count(), 2);
//! ```

/// Click bookkeeping for one pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickState<K> {
    press: Option<K>,
    last_press: Option<K>,
    click_time: f64,
    count: u32,
}

impl<K> Default for ClickState<K> {
    fn default() -> Self {
        Self {
            press: None,
            last_press: None,
            click_time: 0.0,
            count: 0,
        }
    }
}

impl<K: Copy + PartialEq> ClickState<K> {
    /// Create a state with no press history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node that accepted the current press.
    pub fn press(&self) -> Option<K> {
        self.press
    }

    /// Node that accepted the press before the current one.
    pub fn last_press(&self) -> Option<K> {
        self.last_press
    }

    /// Timestamp (seconds) of the most recent press.
    pub fn click_time(&self) -> f64 {
        self.click_time
    }

    /// Number of consecutive presses on the same node.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Replace the press target.
    ///
    /// When the value actually changes, the previous target moves into
    /// [`last_press`](Self::last_press).
    pub fn set_press(&mut self, press: Option<K>) {
        if self.press == press {
            return;
        }
        self.last_press = self.press;
        self.press = press;
    }

    /// Zero the count if `now` is outside the double-click window.
    pub fn expire(&mut self, now: f64, window: f64) {
        if now - self.click_time >= window {
            self.count = 0;
        }
    }

    /// Record a press accepted by `pressed` at time `now`.
    pub fn register_press(&mut self, pressed: Option<K>, now: f64, window: f64) {
        if pressed == self.last_press {
            if now - self.click_time < window {
                self.count += 1;
            } else {
                self.count = 1;
            }
        } else {
            self.count = 1;
        }
        self.set_press(pressed);
        self.click_time = now;
    }

    /// Overwrite all fields from another state.
    pub fn copy_from(&mut self, other: &Self) {
        *self = *other;
    }
}
