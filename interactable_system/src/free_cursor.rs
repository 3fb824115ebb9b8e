// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Free-cursor module: mouse, touch and keyboard/controller navigation.
//!
//! Each processed frame:
//! 1. Touches, if any are present; otherwise the mouse. Pointer events run
//!    first so a press can change the selection before navigation.
//! 2. UpdateSelected to the selection.
//! 3. With navigation enabled and nothing used yet: Move, throttled by
//!    [`MoveRepeat`], then Submit and Cancel.
//!
//! While another party holds the cursor locked, the mouse pointer sits at
//! `(-1, -1)` with no hover target and drags do not advance.

use alloc::rc::Rc;
use core::fmt;

use interactable_event_state::navigation::{
    MoveDirection, MoveRepeat, RepeatTiming, determine_move_direction, is_neutral, raw_move_vector,
};
use interactable_responder::capability::Capability;
use interactable_responder::data::{AxisData, PointerData, PointerId};
use interactable_responder::dispatcher::dispatch;
use interactable_responder::host::NodeKey;
use kurbo::{Point, Vec2};

use crate::config::FreeCursorConfig;
use crate::input::{CursorControl, CursorLockMode, InputSampler};
use crate::module::{InputModule, ModuleCx};
use crate::pointer::{DragRule, PipelineSettings, PointerModuleBase, mouse_button_states};

/// Position reported for the mouse while the cursor is locked elsewhere.
const LOCKED_POSITION: Point = Point::new(-1.0, -1.0);

/// Mouse, touch and navigation input for UI-style interaction.
pub struct FreeCursorModule<K> {
    config: FreeCursorConfig,
    input: Rc<dyn InputSampler>,
    cursor: Rc<dyn CursorControl>,
    pointers: PointerModuleBase<K>,
    mouse_position: Point,
    last_mouse_position: Point,
    repeat: MoveRepeat,
}

impl<K: fmt::Debug> fmt::Debug for FreeCursorModule<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreeCursorModule")
            .field("config", &self.config)
            .field("pointers", &self.pointers)
            .field("mouse_position", &self.mouse_position)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

impl<K: NodeKey> fmt::Display for FreeCursorModule<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FreeCursorModule")?;
        write!(f, "{}", self.pointers)
    }
}

impl<K: NodeKey> FreeCursorModule<K> {
    /// A module reading `input` and observing `cursor`.
    pub fn new(input: Rc<dyn InputSampler>, cursor: Rc<dyn CursorControl>, config: FreeCursorConfig) -> Self {
        Self {
            config,
            input,
            cursor,
            pointers: PointerModuleBase::new(),
            mouse_position: Point::ZERO,
            last_mouse_position: Point::ZERO,
            repeat: MoveRepeat::new(),
        }
    }

    /// Settings.
    pub fn config(&self) -> &FreeCursorConfig {
        &self.config
    }

    /// Mutable settings; changes apply from the next frame.
    pub fn config_mut(&mut self) -> &mut FreeCursorConfig {
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
            drag: DragRule::Screen(cx.config().drag_threshold),
            drag_needs_motion: true,
            cursor_locked: self.cursor.lock_state() == CursorLockMode::Locked,
        }
    }

    fn process_mouse(&mut self, cx: &ModuleCx<'_, K>, settings: &PipelineSettings, now: f64) {
        let input = &*self.input;
        let position = input.mouse_position();
        let scroll = input.mouse_scroll_delta();
        let locked = settings.cursor_locked;
        self.pointers.sample_mouse(cx, |left, created| {
            if created {
                left.position = position;
            }
            if locked {
                left.position = LOCKED_POSITION;
                left.delta = Vec2::ZERO;
            } else {
                left.delta = position - left.position;
                left.position = position;
            }
            left.scroll_delta = scroll;
        });
        self.pointers
            .process_mouse_event(cx, settings, mouse_button_states(input), now);
    }

    /// UpdateSelected to the selection. Returns whether it was used.
    fn send_update_selected(&self, cx: &ModuleCx<'_, K>) -> bool {
        let Some(selected) = cx.current_selected() else {
            return false;
        };
        let mut data = cx.base_data();
        dispatch(cx.host(), Some(selected), Capability::UpdateSelected, (&mut data).into());
        data.used()
    }

    /// Throttled Move to the selection. Returns whether it was used.
    fn send_move(&mut self, cx: &ModuleCx<'_, K>, now: f64) -> bool {
        let input = &*self.input;
        let movement = raw_move_vector(
            input.axis_raw(&self.config.horizontal_axis),
            input.axis_raw(&self.config.vertical_axis),
            input.button_down(&self.config.horizontal_axis),
            input.button_down(&self.config.vertical_axis),
        );
        let timing = RepeatTiming {
            repeat_delay: self.config.repeat_delay,
            actions_per_second: self.config.input_actions_per_second,
        };
        if !self.repeat.should_send(movement, now, timing) {
            return false;
        }

        let mut axis = AxisData::new(Rc::clone(cx.selection()));
        axis.move_vector = movement;
        axis.move_dir = determine_move_direction(movement.x, movement.y, self.config.move_dead_zone);
        if axis.move_dir == MoveDirection::None {
            self.repeat.reset();
        } else {
            dispatch(cx.host(), cx.current_selected(), Capability::Move, (&mut axis).into());
            self.repeat.record_sent(movement, now);
        }
        axis.base.used()
    }

    /// Submit and Cancel to the selection. Returns whether either was used.
    fn send_submit(&self, cx: &ModuleCx<'_, K>) -> bool {
        let Some(selected) = cx.current_selected() else {
            return false;
        };
        let mut data = cx.base_data();
        if self.input.button_down(&self.config.submit_button) {
            dispatch(cx.host(), Some(selected), Capability::Submit, (&mut data).into());
        }
        if self.input.button_down(&self.config.cancel_button) {
            dispatch(cx.host(), Some(selected), Capability::Cancel, (&mut data).into());
        }
        data.used()
    }
}

impl<K: NodeKey> InputModule<K> for FreeCursorModule<K> {
    fn should_activate(&self, _cx: &ModuleCx<'_, K>) -> bool {
        let input = &*self.input;
        let axes = Vec2::new(
            input.axis_raw(&self.config.horizontal_axis),
            input.axis_raw(&self.config.vertical_axis),
        );
        input.button_down(&self.config.submit_button)
            || input.button_down(&self.config.cancel_button)
            || !is_neutral(axes)
            || (self.mouse_position - self.last_mouse_position).hypot2() > 0.0
            || input.mouse_button_down(0)
            || input.touch_count() > 0
    }

    fn activate(&mut self, cx: &ModuleCx<'_, K>) {
        if self.ignores_input(cx) {
            return;
        }
        log::debug!("free cursor module activated");
        self.mouse_position = self.input.mouse_position();
        self.last_mouse_position = self.mouse_position;
    }

    fn inactivate(&mut self, cx: &ModuleCx<'_, K>) {
        log::debug!("free cursor module inactivated");
        let settings = self.settings(cx);
        self.pointers.clear_selection(cx, &settings);
    }

    fn update_module(&mut self, cx: &ModuleCx<'_, K>) {
        if self.ignores_input(cx) {
            let settings = self.settings(cx);
            self.pointers.release_on_focus_loss(cx, &settings);
            return;
        }
        self.last_mouse_position = self.mouse_position;
        self.mouse_position = self.input.mouse_position();
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

        let mut used = self.send_update_selected(cx);
        if cx.config().send_navigation_events {
            if !used {
                used = self.send_move(cx, now);
            }
            if !used {
                self.send_submit(cx);
            }
        }
    }

    fn is_pointer_over_node(&self, pointer_id: PointerId) -> bool {
        self.pointers.is_pointer_over_node(pointer_id)
    }
}
