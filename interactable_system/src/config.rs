// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration for contexts, input modules and raycasters.
//!
//! All types are plain `Default`-able structs with public fields and
//! `with_*` setters for the common knobs.

use alloc::string::String;

use interactable_event_state::navigation::DEFAULT_DEAD_ZONE;

/// Settings of one [`InteractionContext`](crate::context::InteractionContext).
#[derive(Clone, Debug, PartialEq)]
pub struct ContextConfig<K> {
    /// Node selected when the context becomes active.
    pub first_selected: Option<K>,
    /// Deliver move, submit and cancel navigation events.
    pub send_navigation_events: bool,
    /// Screen distance, in pixels, a press must travel before a drag starts.
    pub drag_threshold: f64,
    /// On reactivation, restore the selection held when the context was
    /// last deactivated instead of `first_selected`.
    pub keep_selection_state: bool,
}

impl<K> Default for ContextConfig<K> {
    fn default() -> Self {
        Self {
            first_selected: None,
            send_navigation_events: true,
            drag_threshold: 1.0,
            keep_selection_state: false,
        }
    }
}

impl<K> ContextConfig<K> {
    /// Select `node` on activation.
    #[must_use]
    pub fn with_first_selected(mut self, node: Option<K>) -> Self {
        self.first_selected = node;
        self
    }

    /// Set the drag threshold in pixels.
    #[must_use]
    pub fn with_drag_threshold(mut self, pixels: f64) -> Self {
        self.drag_threshold = pixels;
        self
    }

    /// Restore the previous selection on reactivation.
    #[must_use]
    pub fn with_keep_selection_state(mut self, keep: bool) -> Self {
        self.keep_selection_state = keep;
        self
    }

    /// Enable or disable navigation events.
    #[must_use]
    pub fn with_navigation_events(mut self, send: bool) -> Self {
        self.send_navigation_events = send;
        self
    }
}

/// Settings of the [`FreeCursorModule`](crate::free_cursor::FreeCursorModule).
#[derive(Clone, Debug, PartialEq)]
pub struct FreeCursorConfig {
    /// Axis read for horizontal navigation.
    pub horizontal_axis: String,
    /// Axis read for vertical navigation.
    pub vertical_axis: String,
    /// Button that submits the selection.
    pub submit_button: String,
    /// Button that cancels the selection.
    pub cancel_button: String,
    /// Seconds within which a second press counts as a double click.
    pub double_click_time: f64,
    /// Seconds a held direction waits before repeating.
    pub repeat_delay: f64,
    /// Navigation repeat rate after the delay.
    pub input_actions_per_second: f64,
    /// Axis magnitude below which no move direction is reported.
    pub move_dead_zone: f64,
    /// Send enter and exit to ancestors of the hovered node as well.
    pub send_pointer_hover_to_parent: bool,
    /// Drop input while the owning context is unfocused.
    pub ignore_events_on_no_focus: bool,
}

impl Default for FreeCursorConfig {
    fn default() -> Self {
        Self {
            horizontal_axis: "Horizontal".into(),
            vertical_axis: "Vertical".into(),
            submit_button: "Submit".into(),
            cancel_button: "Cancel".into(),
            double_click_time: 0.3,
            repeat_delay: 0.5,
            input_actions_per_second: 10.0,
            move_dead_zone: DEFAULT_DEAD_ZONE,
            send_pointer_hover_to_parent: true,
            ignore_events_on_no_focus: true,
        }
    }
}

impl FreeCursorConfig {
    /// Set the double-click window in seconds.
    #[must_use]
    pub fn with_double_click_time(mut self, seconds: f64) -> Self {
        self.double_click_time = seconds;
        self
    }

    /// Set whether hover propagates to ancestors.
    #[must_use]
    pub fn with_hover_to_parent(mut self, propagate: bool) -> Self {
        self.send_pointer_hover_to_parent = propagate;
        self
    }
}

/// Settings of the [`LockedCursorModule`](crate::locked_cursor::LockedCursorModule).
#[derive(Clone, Debug, PartialEq)]
pub struct LockedCursorConfig {
    /// Axis whose movement activates the module.
    pub horizontal_axis: String,
    /// Axis whose movement activates the module.
    pub vertical_axis: String,
    /// Seconds within which a second press counts as a double click.
    pub double_click_time: f64,
    /// World units per pixel of the context's drag threshold.
    pub drag_threshold_multiplier: f32,
    /// Send enter and exit to ancestors of the hovered node as well.
    pub send_pointer_hover_to_parent: bool,
    /// Drop input while the owning context is unfocused.
    pub ignore_events_on_no_focus: bool,
}

impl Default for LockedCursorConfig {
    fn default() -> Self {
        Self {
            horizontal_axis: "Horizontal".into(),
            vertical_axis: "Vertical".into(),
            double_click_time: 0.3,
            drag_threshold_multiplier: 0.01,
            send_pointer_hover_to_parent: true,
            ignore_events_on_no_focus: true,
        }
    }
}

impl LockedCursorConfig {
    /// Set the world units per pixel of drag threshold.
    #[must_use]
    pub fn with_drag_threshold_multiplier(mut self, multiplier: f32) -> Self {
        self.drag_threshold_multiplier = multiplier;
        self
    }
}

/// Hit count used when [`RaycasterConfig::max_intersections`] is zero.
pub const DEFAULT_MAX_INTERSECTIONS: usize = 5;

/// Settings shared by the ray-constructing query providers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycasterConfig {
    /// Maximum hits reported per query; `0` means [`DEFAULT_MAX_INTERSECTIONS`].
    pub max_intersections: usize,
    /// Maximum ray length; zero or negative means up to the far clip plane.
    pub max_ray_length: f32,
    /// Layers the query may hit, intersected with the camera's culling mask.
    pub layer_mask: u32,
    /// Report hits against trigger volumes.
    pub allow_trigger_colliders: bool,
}

impl Default for RaycasterConfig {
    fn default() -> Self {
        Self {
            max_intersections: 0,
            max_ray_length: 0.0,
            layer_mask: u32::MAX,
            allow_trigger_colliders: false,
        }
    }
}

impl RaycasterConfig {
    /// Effective hit cap.
    pub fn hit_limit(&self) -> usize {
        if self.max_intersections == 0 {
            DEFAULT_MAX_INTERSECTIONS
        } else {
            self.max_intersections
        }
    }

    /// Effective ray length given the distance to the far clip plane.
    pub fn ray_length(&self, clip_distance: f32) -> f32 {
        if self.max_ray_length <= 0.0 {
            clip_distance
        } else {
            self.max_ray_length.min(clip_distance)
        }
    }
}
