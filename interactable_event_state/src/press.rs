// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame button transition classification.
//!
//! Input backends are sampled once per frame. A button can go down, come up,
//! or do both inside the same frame; [`FramePressState`] folds the two raw
//! samples into a single value that pointer pipelines branch on.
//!
//! ```
//! use interactable_event_state::press::FramePressState;
//!
//! let state = FramePressState::from_samples(true, true);
//! assert_eq!(state, FramePressState::PressedAndReleased);
//! assert!(state.pressed_this_frame());
//! assert!(state.released_this_frame());
//! ```

/// How a button changed during the current frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FramePressState {
    /// The button went down this frame.
    Pressed,
    /// The button came up this frame.
    Released,
    /// The button went down and came up within this frame.
    PressedAndReleased,
    /// No transition this frame.
    #[default]
    NotChanged,
}

impl FramePressState {
    /// Fold the "went down" and "came up" samples for one frame.
    pub fn from_samples(pressed: bool, released: bool) -> Self {
        match (pressed, released) {
            (true, true) => Self::PressedAndReleased,
            (true, false) => Self::Pressed,
            (false, true) => Self::Released,
            (false, false) => Self::NotChanged,
        }
    }

    /// Returns `true` if the button went down this frame.
    pub fn pressed_this_frame(self) -> bool {
        matches!(self, Self::Pressed | Self::PressedAndReleased)
    }

    /// Returns `true` if the button came up this frame.
    pub fn released_this_frame(self) -> bool {
        matches!(self, Self::Released | Self::PressedAndReleased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_fold_into_states() {
        assert_eq!(
            FramePressState::from_samples(true, false),
            FramePressState::Pressed
        );
        assert_eq!(
            FramePressState::from_samples(false, true),
            FramePressState::Released
        );
        assert_eq!(
            FramePressState::from_samples(false, false),
            FramePressState::NotChanged
        );
    }

    #[test]
    fn same_frame_press_and_release_reports_both() {
        let state = FramePressState::from_samples(true, true);
        assert!(state.pressed_this_frame(), "press half must be visible");
        assert!(state.released_this_frame(), "release half must be visible");
    }

    #[test]
    fn not_changed_reports_nothing() {
        let state = FramePressState::default();
        assert!(!state.pressed_this_frame(), "no press expected");
        assert!(!state.released_this_frame(), "no release expected");
    }
}
