// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer pipeline shared by the pointer-driven modules.
//!
//! Each frame a module samples its pointers into long-lived
//! [`PointerData`] records, then runs, per record:
//!
//! - press: click eligibility, press snapshots, PointerDown up the hierarchy,
//!   click counting, drag candidate and InitializePotentialDrag;
//! - release: PointerUp, PointerClick when the release resolves to the press's
//!   click handler, Drop and EndDrag for a running drag;
//! - move: hover transitions through [`HoverState`];
//! - drag: threshold check, BeginDrag once, then Drag.
//!
//! Press always runs before release for the same record, so a button pressed
//! and released within one frame produces both, in that order.
//!
//! [`HoverState`]: interactable_event_state::hover::HoverState

use alloc::vec::Vec;
use core::fmt;

use interactable_event_state::drag::{should_start_drag, should_start_world_drag};
use interactable_event_state::hover::{HoverEvent, HoverOptions};
use interactable_event_state::press::FramePressState;
use interactable_responder::capability::Capability;
use interactable_responder::data::{InputButton, PointerData, PointerId};
use interactable_responder::dispatcher::{dispatch, dispatch_up_hierarchy, nearest_handler};
use interactable_responder::host::NodeKey;
use interactable_responder::raycast::{RaycastResult, first_hit};
use kurbo::Vec2;

use crate::input::{InputSampler, Touch, TouchKind, TouchPhase};
use crate::module::ModuleCx;

/// Pointer id of the left mouse button record.
pub const MOUSE_LEFT_ID: PointerId = -1;
/// Pointer id of the right mouse button record.
pub const MOUSE_RIGHT_ID: PointerId = -2;
/// Pointer id of the middle mouse button record.
pub const MOUSE_MIDDLE_ID: PointerId = -3;

/// How drag distance is measured.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum DragRule {
    /// Press and current screen positions, threshold in pixels.
    Screen(f64),
    /// Press and current hit positions, threshold in world units.
    World(f32),
}

/// Per-frame knobs a module hands to the pipeline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct PipelineSettings {
    pub(crate) double_click_time: f64,
    pub(crate) propagate_hover: bool,
    pub(crate) drag: DragRule,
    /// Drags only advance on frames where the pointer moved.
    pub(crate) drag_needs_motion: bool,
    /// The cursor is locked by someone else: no hover target, no drags.
    pub(crate) cursor_locked: bool,
}

/// Pointer records plus the scratch buffer for raycasts.
#[derive(Debug)]
pub(crate) struct PointerModuleBase<K> {
    pointers: Vec<PointerData<K>>,
    hits: Vec<RaycastResult<K>>,
    /// Record most recently pressed or released; released on focus loss.
    last_pointer: Option<PointerId>,
}

impl<K> Default for PointerModuleBase<K> {
    fn default() -> Self {
        Self {
            pointers: Vec::new(),
            hits: Vec::new(),
            last_pointer: None,
        }
    }
}

impl<K: NodeKey> PointerModuleBase<K> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn pointer(&self, id: PointerId) -> Option<&PointerData<K>> {
        self.pointers.iter().find(|p| p.pointer_id == id)
    }

    fn index_of(&self, id: PointerId) -> Option<usize> {
        self.pointers.iter().position(|p| p.pointer_id == id)
    }

    fn get_or_create(&mut self, cx: &ModuleCx<'_, K>, id: PointerId) -> (usize, bool) {
        if let Some(idx) = self.index_of(id) {
            return (idx, false);
        }
        log::trace!("new pointer record {id}");
        self.pointers.push(cx.new_pointer(id));
        (self.pointers.len() - 1, true)
    }

    pub(crate) fn remove_pointer(&mut self, id: PointerId) -> Option<PointerData<K>> {
        let idx = self.index_of(id)?;
        Some(self.pointers.remove(idx))
    }

    pub(crate) fn is_pointer_over_node(&self, id: PointerId) -> bool {
        self.pointer(id).is_some_and(|p| p.pointer_enter().is_some())
    }

    /// Sample the three mouse records.
    ///
    /// `place` sets the left record's position, delta and scroll; it is told
    /// whether the record was just created. The left record is then raycast
    /// and the right and middle records mirror it.
    pub(crate) fn sample_mouse<F>(&mut self, cx: &ModuleCx<'_, K>, place: F)
    where
        F: FnOnce(&mut PointerData<K>, bool),
    {
        let (idx, created) = self.get_or_create(cx, MOUSE_LEFT_ID);
        let Self { pointers, hits, .. } = self;
        let left = &mut pointers[idx];
        left.base.reset();
        place(left, created);
        cx.raycast_all(left, hits);
        left.current_raycast = first_hit(hits);
        hits.clear();
        left.button = InputButton::Left;

        let snapshot = left.clone();
        for (id, button) in [
            (MOUSE_RIGHT_ID, InputButton::Right),
            (MOUSE_MIDDLE_ID, InputButton::Middle),
        ] {
            let (idx, _) = self.get_or_create(cx, id);
            let record = &mut self.pointers[idx];
            record.base.reset();
            record.copy_from(&snapshot);
            record.button = button;
        }
    }

    /// Press, release, move and drag for the mouse records, then scroll.
    ///
    /// Only the left record runs hover; right and middle run press and drag.
    pub(crate) fn process_mouse_event(
        &mut self,
        cx: &ModuleCx<'_, K>,
        settings: &PipelineSettings,
        buttons: [FramePressState; 3],
        now: f64,
    ) {
        let records = [
            (MOUSE_LEFT_ID, buttons[0]),
            (MOUSE_RIGHT_ID, buttons[1]),
            (MOUSE_MIDDLE_ID, buttons[2]),
        ];
        for (id, state) in records {
            let Some(idx) = self.index_of(id) else {
                continue;
            };
            let pointer = &mut self.pointers[idx];
            let over = pointer.current_raycast.target;
            let pressed = state.pressed_this_frame();
            let released = state.released_this_frame();
            if pressed {
                press(cx, settings, pointer, now, false);
            }
            if released {
                release(cx, pointer, over);
                refresh_hover(cx, settings, pointer, over);
            }
            if id == MOUSE_LEFT_ID {
                process_move(cx, settings, pointer);
            }
            process_drag(cx, settings, pointer);
            if pressed || released {
                self.last_pointer = Some(id);
            }
        }

        let Some(idx) = self.index_of(MOUSE_LEFT_ID) else {
            return;
        };
        let left = &mut self.pointers[idx];
        if left.is_scrolling() {
            let handler = nearest_handler(cx.host(), left.current_raycast.target, Capability::Scroll);
            dispatch_up_hierarchy(cx.host(), handler, Capability::Scroll, left.payload());
        }
    }

    /// Run the pipeline for every direct touch. Returns `true` if any touch
    /// was present, in which case the mouse should not be processed.
    pub(crate) fn process_touch_events(
        &mut self,
        cx: &ModuleCx<'_, K>,
        settings: &PipelineSettings,
        input: &dyn InputSampler,
        now: f64,
    ) -> bool {
        let count = input.touch_count();
        for index in 0..count {
            let Some(touch) = input.touch(index) else {
                continue;
            };
            if touch.kind == TouchKind::Indirect {
                continue;
            }
            let (idx, pressed, released) = self.sample_touch(cx, &touch);
            let pointer = &mut self.pointers[idx];
            let over = pointer.current_raycast.target;
            if pressed {
                press(cx, settings, pointer, now, true);
            }
            if released {
                release(cx, pointer, over);
                // Lifting a finger leaves whatever it was over.
                let entered = pointer.pointer_enter();
                dispatch_up_hierarchy(cx.host(), entered, Capability::PointerExit, pointer.payload());
                pointer.hover.take_entered();
            } else {
                process_move(cx, settings, pointer);
                process_drag(cx, settings, pointer);
            }
            self.last_pointer = Some(touch.finger_id);
            if released {
                self.remove_pointer(touch.finger_id);
            }
        }
        count > 0
    }

    /// Returns `(index, pressed, released)` for the touch's record.
    fn sample_touch(&mut self, cx: &ModuleCx<'_, K>, touch: &Touch) -> (usize, bool, bool) {
        let (idx, created) = self.get_or_create(cx, touch.finger_id);
        let Self { pointers, hits, .. } = self;
        let pointer = &mut pointers[idx];
        pointer.base.reset();

        let pressed = created || touch.phase == TouchPhase::Began;
        let released = matches!(touch.phase, TouchPhase::Canceled | TouchPhase::Ended);

        if created {
            pointer.position = touch.position;
        }
        pointer.delta = if pressed {
            Vec2::ZERO
        } else {
            touch.position - pointer.position
        };
        pointer.position = touch.position;
        pointer.button = InputButton::Left;

        if touch.phase == TouchPhase::Canceled {
            pointer.current_raycast = RaycastResult::default();
        } else {
            cx.raycast_all(pointer, hits);
            pointer.current_raycast = first_hit(hits);
            hits.clear();
        }

        pointer.pressure = touch.pressure;
        pointer.altitude_angle = touch.altitude_angle;
        pointer.azimuth_angle = touch.azimuth_angle;
        pointer.radius = Vec2::new(touch.radius, touch.radius);
        pointer.radius_variance = Vec2::new(touch.radius_variance, touch.radius_variance);
        (idx, pressed, released)
    }

    /// Exit everything every pointer hovers, drop all records and clear the
    /// selection.
    pub(crate) fn clear_selection(&mut self, cx: &ModuleCx<'_, K>, settings: &PipelineSettings) {
        for pointer in &mut self.pointers {
            handle_pointer_movement(cx, pointer, None, settings.propagate_hover);
        }
        self.pointers.clear();
        self.last_pointer = None;
        // A refusal is already reported by the selection.
        let _ = cx.set_selected(None);
    }

    /// Finish a running drag on the most recently used record.
    pub(crate) fn release_on_focus_loss(&mut self, cx: &ModuleCx<'_, K>, settings: &PipelineSettings) {
        let Some(id) = self.last_pointer.take() else {
            return;
        };
        let Some(idx) = self.index_of(id) else {
            return;
        };
        let pointer = &mut self.pointers[idx];
        if pointer.pointer_drag.is_some() && pointer.dragging {
            log::debug!("focus lost, releasing drag of pointer {id}");
            let over = pointer.current_raycast.target;
            release(cx, pointer, over);
            refresh_hover(cx, settings, pointer, over);
        }
    }
}

impl<K: NodeKey> fmt::Display for PointerModuleBase<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pointer in &self.pointers {
            writeln!(f, "<pointer {}>", pointer.pointer_id)?;
            writeln!(f, "{pointer}")?;
        }
        Ok(())
    }
}

/// Classify the three mouse buttons for this frame.
pub(crate) fn mouse_button_states(input: &dyn InputSampler) -> [FramePressState; 3] {
    [InputButton::Left, InputButton::Right, InputButton::Middle].map(|button| {
        FramePressState::from_samples(
            input.mouse_button_down(button.index()),
            input.mouse_button_up(button.index()),
        )
    })
}

/// Move the pointer's hover to `target`, delivering move, exit and enter.
pub(crate) fn handle_pointer_movement<K: NodeKey>(
    cx: &ModuleCx<'_, K>,
    pointer: &mut PointerData<K>,
    target: Option<K>,
    propagate_to_parent: bool,
) {
    let host = cx.host();
    let options = HoverOptions {
        moved: pointer.is_pointer_moving(),
        propagate_to_parent,
    };
    let update = pointer
        .hover
        .update(target, |node: &K| host.parent_of(node), options);
    pointer.reentered = update.reentered;
    for event in update.events {
        let (node, capability) = match event {
            HoverEvent::Move(node) => (node, Capability::PointerMove),
            HoverEvent::Enter(node) => (node, Capability::PointerEnter),
            HoverEvent::Exit { node, fully_exited } => {
                pointer.fully_exited = fully_exited;
                (node, Capability::PointerExit)
            }
        };
        log::trace!("pointer {} {capability} {node:?}", pointer.pointer_id);
        dispatch(host, Some(node), capability, pointer.payload());
    }
}

/// Clear the selection when the pressed node would not become selected.
fn deselect_if_selection_changed<K: NodeKey>(
    cx: &ModuleCx<'_, K>,
    pointer: &mut PointerData<K>,
    over: Option<K>,
) {
    let selectable = nearest_handler(cx.host(), over, Capability::Select);
    if selectable != cx.current_selected() {
        // A refusal is already reported by the selection.
        let _ = pointer.set_selected(cx.host(), None);
    }
}

/// Press handling. `enter_first` hovers the pressed node before the press,
/// for pointers that have no hover of their own (touches).
fn press<K: NodeKey>(
    cx: &ModuleCx<'_, K>,
    settings: &PipelineSettings,
    pointer: &mut PointerData<K>,
    now: f64,
    enter_first: bool,
) {
    let host = cx.host();
    let over = pointer.current_raycast.target;

    pointer.eligible_for_click = true;
    pointer.delta = Vec2::ZERO;
    pointer.dragging = false;
    pointer.use_drag_threshold = true;
    pointer.press_position = pointer.position;
    pointer.press_raycast = pointer.current_raycast;

    deselect_if_selection_changed(cx, pointer, over);

    if enter_first && pointer.pointer_enter() != over {
        handle_pointer_movement(cx, pointer, over, settings.propagate_hover);
    }

    pointer.click.expire(now, settings.double_click_time);

    // Without a press handler the click handler stands in as the press target.
    let down = dispatch_up_hierarchy(host, over, Capability::PointerDown, pointer.payload());
    let click = nearest_handler(host, over, Capability::PointerClick);
    pointer
        .click
        .register_press(down.or(click), now, settings.double_click_time);
    pointer.raw_press = over;
    pointer.pointer_click = click;

    pointer.pointer_drag = nearest_handler(host, over, Capability::Drag);
    dispatch(
        host,
        pointer.pointer_drag,
        Capability::InitializePotentialDrag,
        pointer.payload(),
    );
}

/// Release handling shared by mouse and touch.
fn release<K: NodeKey>(cx: &ModuleCx<'_, K>, pointer: &mut PointerData<K>, over: Option<K>) {
    let host = cx.host();
    dispatch(host, pointer.pointer_press(), Capability::PointerUp, pointer.payload());

    let click = nearest_handler(host, over, Capability::PointerClick);
    if pointer.pointer_click == click && pointer.eligible_for_click {
        dispatch(host, pointer.pointer_click, Capability::PointerClick, pointer.payload());
    }

    let dragged = pointer.dragging && pointer.pointer_drag.is_some();
    if dragged {
        dispatch_up_hierarchy(host, over, Capability::Drop, pointer.payload());
    }

    pointer.eligible_for_click = false;
    pointer.click.set_press(None);
    pointer.raw_press = None;
    pointer.pointer_click = None;

    if dragged {
        dispatch(host, pointer.pointer_drag, Capability::EndDrag, pointer.payload());
    }
    pointer.dragging = false;
    pointer.pointer_drag = None;
}

/// Redo hover after a release so nodes passed over during the press get
/// their enter.
fn refresh_hover<K: NodeKey>(
    cx: &ModuleCx<'_, K>,
    settings: &PipelineSettings,
    pointer: &mut PointerData<K>,
    over: Option<K>,
) {
    if over != pointer.pointer_enter() {
        handle_pointer_movement(cx, pointer, None, settings.propagate_hover);
        handle_pointer_movement(cx, pointer, over, settings.propagate_hover);
    }
}

/// Hover follows the current hit, or nothing while the cursor is locked.
fn process_move<K: NodeKey>(cx: &ModuleCx<'_, K>, settings: &PipelineSettings, pointer: &mut PointerData<K>) {
    let target = if settings.cursor_locked {
        None
    } else {
        pointer.current_raycast.target
    };
    handle_pointer_movement(cx, pointer, target, settings.propagate_hover);
}

fn process_drag<K: NodeKey>(cx: &ModuleCx<'_, K>, settings: &PipelineSettings, pointer: &mut PointerData<K>) {
    if settings.cursor_locked || (settings.drag_needs_motion && !pointer.is_pointer_moving()) {
        return;
    }
    let Some(drag) = pointer.pointer_drag else {
        return;
    };
    let host = cx.host();

    if !pointer.dragging {
        let start = match settings.drag {
            DragRule::Screen(threshold) => should_start_drag(
                pointer.press_position,
                pointer.position,
                threshold,
                pointer.use_drag_threshold,
            ),
            DragRule::World(threshold) => should_start_world_drag(
                pointer.press_raycast.world_position,
                pointer.current_raycast.world_position,
                threshold,
                pointer.use_drag_threshold,
            ),
        };
        if start {
            dispatch(host, Some(drag), Capability::BeginDrag, pointer.payload());
            pointer.dragging = true;
        }
    }

    if pointer.dragging {
        // A drag supersedes a press on a different node.
        if pointer.pointer_press() != Some(drag) {
            dispatch(host, pointer.pointer_press(), Capability::PointerUp, pointer.payload());
            pointer.eligible_for_click = false;
            pointer.click.set_press(None);
            pointer.raw_press = None;
        }
        dispatch(host, Some(drag), Capability::Drag, pointer.payload());
    }
}
