// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Locked-cursor module for first-person interaction.
//!
//! The cursor is locked and hidden while the module is authoritative. The
//! mouse pointer always sits at the centre of the screen, so hover follows
//! whatever the view looks at. Drags compare the world positions of the press
//! hit and the current hit. No navigation events are sent.

use alloc::rc::Rc;
use core::fmt;

use interactable_event_state::navigation::is_neutral;
use interactable_responder::data::{PointerData, PointerId};
use interactable_responder::host::NodeKey;
use kurbo::{Point, Vec2};

use crate::config::LockedCursorConfig;
use crate::input::{CursorControl, CursorLockMode, InputSampler};
use crate::module::{InputModule, ModuleCx};
use crate::pointer::{DragRule, PipelineSettings, PointerModuleBase, mouse_button_states};

/// Screen-centre pointer with the cursor locked.
pub struct LockedCursorModule<K> {
    config: LockedCursorConfig,
    input: Rc<dyn InputSampler>,
    cursor: Rc<dyn CursorControl>,
    pointers: PointerModuleBase<K>,
}

impl<K: fmt::Debug> fmt::Debug for LockedCursorModule<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedCursorModule")
            .field("config", &self.config)
            .field("pointers", &self.pointers)
            .finish_non_exhaustive()
    }
}

impl<K: NodeKey> fmt::Display for LockedCursorModule<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LockedCursorModule")?;
        write!(f, "{}", self.pointers)
    }
}

impl<K: NodeKey> LockedCursorModule<K> {
    /// A module reading `input` and driving `cursor`.
    pub fn new(input: Rc<dyn InputSampler>, cursor: Rc<dyn CursorControl>, config: LockedCursorConfig) -> Self {
        Self {
            config,
            input,
            cursor,
            pointers: PointerModuleBase::new(),
        }
    }

    /// Settings.
    pub fn config(&self) -> &LockedCursorConfig {
        &self.config
    }

    /// Mutable settings; changes apply from the next frame.
    pub fn config_mut(&mut self) -> &mut LockedCursorConfig {
        &mut self.config
    }

    /// The record for `pointer_id`, if that pointer has been seen.
    pub fn pointer(&self, pointer_id: PointerId) -> Option<&PointerData<K>> {
        self.pointers.pointer(pointer_id)
    }

    fn ignores_input(&self, cx: &ModuleCx<'_, K>) -> bool {
        !cx.is_focused() && self.config.ignore_events_on_no_focus
    }

    fn settings(&self, cx: &ModuleCx<'_, K>) -> PipelineSettings {
        PipelineSettings {
            double_click_time: self.config.double_click_time,
            propagate_hover: self.config.send_pointer_hover_to_parent,
            drag: DragRule::World(world_threshold(
                cx.config().drag_threshold,
                self.config.drag_threshold_multiplier,
            )),
            drag_needs_motion: false,
            cursor_locked: false,
        }
    }

    fn process_mouse(&mut self, cx: &ModuleCx<'_, K>, settings: &PipelineSettings, now: f64) {
        let input = &*self.input;
        let size = input.screen_size();
        let centre = Point::new(size.width / 2.0, size.height / 2.0);
        let scroll = input.mouse_scroll_delta();
        self.pointers.sample_mouse(cx, |left, _created| {
            left.delta = Vec2::ZERO;
            left.position = centre;
            left.scroll_delta = scroll;
        });
        self.pointers
            .process_mouse_event(cx, settings, mouse_button_states(input), now);
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel thresholds are small; world distances are compared in f32"
)]
fn world_threshold(pixels: f64, multiplier: f32) -> f32 {
    pixels as f32 * multiplier
}

impl<K: NodeKey> InputModule<K> for LockedCursorModule<K> {
    fn should_activate(&self, _cx: &ModuleCx<'_, K>) -> bool {
        let input = &*self.input;
        let axes = Vec2::new(
            input.axis_raw(&self.config.horizontal_axis),
            input.axis_raw(&self.config.vertical_axis),
        );
        !is_neutral(axes) || input.mouse_button_down(0) || input.touch_count() > 0
    }

    fn activate(&mut self, cx: &ModuleCx<'_, K>) {
        if self.ignores_input(cx) {
            return;
        }
        log::debug!("locked cursor module activated");
        self.cursor.set_lock_state(CursorLockMode::Locked);
        self.cursor.set_visible(false);
    }

    fn inactivate(&mut self, cx: &ModuleCx<'_, K>) {
        log::debug!("locked cursor module inactivated");
        let settings = self.settings(cx);
        self.pointers.clear_selection(cx, &settings);
        self.cursor.set_lock_state(CursorLockMode::None);
        self.cursor.set_visible(true);
    }

    fn update_module(&mut self, cx: &ModuleCx<'_, K>) {
        if self.ignores_input(cx) {
            let settings = self.settings(cx);
            self.pointers.release_on_focus_loss(cx, &settings);
        }
    }

    fn process(&mut self, cx: &ModuleCx<'_, K>) {
        if self.ignores_input(cx) {
            return;
        }
        let settings = self.settings(cx);
        let now = self.input.unscaled_time();
        let touched = self
            .pointers
            .process_touch_events(cx, &settings, &*self.input, now);
        if !touched && self.input.mouse_present() {
            self.process_mouse(cx, &settings, now);
        }
    }

    fn is_pointer_over_node(&self, pointer_id: PointerId) -> bool {
        self.pointers.is_pointer_over_node(pointer_id)
    }
}
