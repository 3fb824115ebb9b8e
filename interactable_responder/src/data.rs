// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event payloads.
//!
//! Every payload carries a [`BaseData`]: a "used" flag and a handle to the
//! context's [`Selection`], so handlers can read or change the selection.
//! [`PointerData`] is the long-lived per-pointer record; input modules keep
//! one per pointer id and mutate it in place every frame. [`AxisData`] carries
//! directional navigation.

use alloc::rc::Rc;
use core::fmt;

use interactable_event_state::click::ClickState;
use interactable_event_state::hover::HoverState;
use interactable_event_state::navigation::MoveDirection;
use kurbo::{Point, Vec2};

use crate::capability::{Capability, PayloadKind};
use crate::error::{DispatchError, SelectionError};
use crate::host::{NodeKey, SceneHost};
use crate::raycast::{ProviderKey, RaycastResult};
use crate::selection::Selection;

/// Pointer identifier. Negative values are reserved for mouse buttons and
/// synthetic pointers; touches use their finger id.
pub type PointerId = i32;

/// Mouse button a pointer record represents.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputButton {
    /// Primary button.
    #[default]
    Left,
    /// Secondary button.
    Right,
    /// Middle button.
    Middle,
}

impl InputButton {
    /// Backend button index.
    pub fn index(self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Middle => 2,
        }
    }
}

bitflags::bitflags! {
    /// Pen state reported by stylus input.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PenStatus: u8 {
        /// The pen tip is touching the surface.
        const CONTACT = 1 << 0;
        /// The barrel button is held.
        const BARREL = 1 << 1;
        /// The pen is inverted.
        const INVERTED = 1 << 2;
        /// The eraser end is in use.
        const ERASER = 1 << 3;
    }
}

/// Fields shared by every payload.
#[derive(Clone, Debug)]
pub struct BaseData<K> {
    selection: Rc<Selection<K>>,
    used: bool,
}

impl<K: NodeKey> BaseData<K> {
    /// A fresh, unused payload bound to `selection`.
    pub fn new(selection: Rc<Selection<K>>) -> Self {
        Self {
            selection,
            used: false,
        }
    }

    /// Returns `true` once a handler has marked the event used.
    pub fn used(&self) -> bool {
        self.used
    }

    /// Mark the event used.
    pub fn use_event(&mut self) {
        self.used = true;
    }

    /// Clear the used flag.
    pub fn reset(&mut self) {
        self.used = false;
    }

    /// The selection this payload belongs to.
    pub fn selection(&self) -> &Rc<Selection<K>> {
        &self.selection
    }

    /// Currently selected node.
    pub fn selected(&self) -> Option<K> {
        self.selection.current()
    }

    /// Change the selection, delivering deselect/select with this payload.
    pub fn set_selected(
        &mut self,
        host: &dyn SceneHost<K>,
        node: Option<K>,
    ) -> Result<(), SelectionError> {
        let selection = Rc::clone(&self.selection);
        selection.set_selected(host, node, EventPayload::Base(self))
    }
}

/// Directional navigation payload.
#[derive(Clone, Debug)]
pub struct AxisData<K> {
    /// Shared fields.
    pub base: BaseData<K>,
    /// Raw axis vector.
    pub move_vector: Vec2,
    /// Quantised direction.
    pub move_dir: MoveDirection,
}

impl<K: NodeKey> AxisData<K> {
    /// An axis payload with no movement.
    pub fn new(selection: Rc<Selection<K>>) -> Self {
        Self {
            base: BaseData::new(selection),
            move_vector: Vec2::ZERO,
            move_dir: MoveDirection::None,
        }
    }
}

/// Per-pointer record.
#[derive(Clone, Debug)]
pub struct PointerData<K> {
    /// Shared fields.
    pub base: BaseData<K>,
    /// Which pointer this record tracks.
    pub pointer_id: PointerId,
    /// Button this record represents.
    pub button: InputButton,
    /// Current screen position.
    pub position: Point,
    /// Movement since the previous frame.
    pub delta: Vec2,
    /// Screen position at the last press.
    pub press_position: Point,
    /// Scroll this frame.
    pub scroll_delta: Vec2,
    /// Display the pointer is on.
    pub display_index: u32,
    /// Best hit this frame.
    pub current_raycast: RaycastResult<K>,
    /// Best hit at the last press.
    pub press_raycast: RaycastResult<K>,
    /// Hover bookkeeping; the entered node and hovered set.
    pub hover: HoverState<K>,
    /// Press target, previous press target and click counting.
    pub click: ClickState<K>,
    /// Node hit at press time, whether or not it handled the press.
    pub raw_press: Option<K>,
    /// Node that will receive the click if the release resolves to it.
    pub pointer_click: Option<K>,
    /// Drag candidate found at press time.
    pub pointer_drag: Option<K>,
    /// A release now may still produce a click.
    pub eligible_for_click: bool,
    /// Wait for the drag threshold before starting a drag.
    pub use_drag_threshold: bool,
    /// A drag is in progress.
    pub dragging: bool,
    /// The last exit left the node and all its descendants.
    pub fully_exited: bool,
    /// The last hover change moved back onto an already hovered ancestor.
    pub reentered: bool,
    /// Contact pressure.
    pub pressure: f32,
    /// Barrel pressure.
    pub tangential_pressure: f32,
    /// Pen altitude angle.
    pub altitude_angle: f32,
    /// Pen azimuth angle.
    pub azimuth_angle: f32,
    /// Pen rotation.
    pub twist: f32,
    /// Pen tilt.
    pub tilt: Vec2,
    /// Pen state.
    pub pen_status: PenStatus,
    /// Contact radius.
    pub radius: Vec2,
    /// Contact radius accuracy.
    pub radius_variance: Vec2,
}

impl<K: NodeKey> PointerData<K> {
    /// A fresh record for `pointer_id`.
    pub fn new(selection: Rc<Selection<K>>, pointer_id: PointerId) -> Self {
        Self {
            base: BaseData::new(selection),
            pointer_id,
            button: InputButton::Left,
            position: Point::ZERO,
            delta: Vec2::ZERO,
            press_position: Point::ZERO,
            scroll_delta: Vec2::ZERO,
            display_index: 0,
            current_raycast: RaycastResult::default(),
            press_raycast: RaycastResult::default(),
            hover: HoverState::new(),
            click: ClickState::new(),
            raw_press: None,
            pointer_click: None,
            pointer_drag: None,
            eligible_for_click: false,
            use_drag_threshold: true,
            dragging: false,
            fully_exited: false,
            reentered: false,
            pressure: 0.0,
            tangential_pressure: 0.0,
            altitude_angle: 0.0,
            azimuth_angle: 0.0,
            twist: 0.0,
            tilt: Vec2::ZERO,
            pen_status: PenStatus::empty(),
            radius: Vec2::ZERO,
            radius_variance: Vec2::ZERO,
        }
    }

    /// Returns `true` if the pointer moved this frame.
    pub fn is_pointer_moving(&self) -> bool {
        self.delta.hypot2() > 0.0
    }

    /// Returns `true` if there was scroll input this frame.
    pub fn is_scrolling(&self) -> bool {
        self.scroll_delta.hypot2() > 0.0
    }

    /// Node the pointer most recently entered.
    pub fn pointer_enter(&self) -> Option<K> {
        self.hover.entered()
    }

    /// Node that accepted the current press.
    pub fn pointer_press(&self) -> Option<K> {
        self.click.press()
    }

    /// Node that accepted the previous press.
    pub fn last_press(&self) -> Option<K> {
        self.click.last_press()
    }

    /// Consecutive presses on the same node.
    pub fn click_count(&self) -> u32 {
        self.click.count()
    }

    /// Provider behind the current hit.
    pub fn enter_provider(&self) -> Option<ProviderKey> {
        self.current_raycast.provider
    }

    /// Provider behind the press hit.
    pub fn press_provider(&self) -> Option<ProviderKey> {
        self.press_raycast.provider
    }

    /// Copy the frame-sampled fields from `other`.
    ///
    /// Press, drag and hover-set state stay untouched; only the entered node
    /// is mirrored.
    pub fn copy_from(&mut self, other: &Self) {
        self.position = other.position;
        self.delta = other.delta;
        self.scroll_delta = other.scroll_delta;
        self.current_raycast = other.current_raycast;
        self.hover.set_entered(other.hover.entered());
        self.pressure = other.pressure;
        self.tangential_pressure = other.tangential_pressure;
        self.altitude_angle = other.altitude_angle;
        self.azimuth_angle = other.azimuth_angle;
        self.twist = other.twist;
        self.tilt = other.tilt;
        self.pen_status = other.pen_status;
        self.radius = other.radius;
        self.radius_variance = other.radius_variance;
    }

    /// Change the selection, delivering deselect/select with this payload.
    pub fn set_selected(
        &mut self,
        host: &dyn SceneHost<K>,
        node: Option<K>,
    ) -> Result<(), SelectionError> {
        let selection = Rc::clone(&self.base.selection);
        selection.set_selected(host, node, EventPayload::Pointer(self))
    }

    /// Borrow as a dispatch payload.
    pub fn payload(&mut self) -> EventPayload<'_, K> {
        EventPayload::Pointer(self)
    }
}

impl<K: NodeKey> fmt::Display for PointerData<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pointer_id: {}", self.pointer_id)?;
        writeln!(f, "position: {:?}", self.position)?;
        writeln!(f, "delta: {:?}", self.delta)?;
        writeln!(f, "eligible_for_click: {}", self.eligible_for_click)?;
        writeln!(f, "pointer_enter: {:?}", self.hover.entered())?;
        writeln!(f, "pointer_press: {:?}", self.click.press())?;
        writeln!(f, "last_press: {:?}", self.click.last_press())?;
        writeln!(f, "pointer_drag: {:?}", self.pointer_drag)?;
        writeln!(f, "use_drag_threshold: {}", self.use_drag_threshold)?;
        writeln!(f, "current_raycast:\n{}", self.current_raycast)?;
        writeln!(f, "press_raycast:\n{}", self.press_raycast)?;
        writeln!(f, "display_index: {}", self.display_index)?;
        writeln!(f, "pressure: {}", self.pressure)?;
        writeln!(f, "tangential_pressure: {}", self.tangential_pressure)?;
        writeln!(f, "altitude_angle: {}", self.altitude_angle)?;
        writeln!(f, "azimuth_angle: {}", self.azimuth_angle)?;
        writeln!(f, "twist: {}", self.twist)?;
        writeln!(f, "tilt: {:?}", self.tilt)?;
        writeln!(f, "pen_status: {:?}", self.pen_status)?;
        writeln!(f, "radius: {:?}", self.radius)?;
        write!(f, "radius_variance: {:?}", self.radius_variance)
    }
}

/// A payload handed to [`dispatch`](crate::dispatcher::dispatch).
#[derive(Debug)]
pub enum EventPayload<'a, K> {
    /// Selection lifecycle, update, submit, cancel.
    Base(&'a mut BaseData<K>),
    /// Pointer events.
    Pointer(&'a mut PointerData<K>),
    /// Navigation moves.
    Axis(&'a mut AxisData<K>),
}

impl<K> EventPayload<'_, K> {
    /// Which payload this is.
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Base(_) => PayloadKind::Base,
            Self::Pointer(_) => PayloadKind::Pointer,
            Self::Axis(_) => PayloadKind::Axis,
        }
    }

    /// The shared fields of any payload.
    pub fn base_mut(&mut self) -> &mut BaseData<K> {
        match self {
            Self::Base(base) => base,
            Self::Pointer(pointer) => &mut pointer.base,
            Self::Axis(axis) => &mut axis.base,
        }
    }

    /// Reborrow for a shorter lifetime.
    pub fn reborrow(&mut self) -> EventPayload<'_, K> {
        match self {
            Self::Base(base) => EventPayload::Base(base),
            Self::Pointer(pointer) => EventPayload::Pointer(pointer),
            Self::Axis(axis) => EventPayload::Axis(axis),
        }
    }

    pub(crate) fn pointer(
        &mut self,
        capability: Capability,
    ) -> Result<&mut PointerData<K>, DispatchError> {
        let actual = self.kind();
        match self {
            Self::Pointer(pointer) => Ok(pointer),
            _ => Err(DispatchError::PayloadMismatch {
                capability,
                expected: PayloadKind::Pointer,
                actual,
            }),
        }
    }

    pub(crate) fn axis(&mut self, capability: Capability) -> Result<&mut AxisData<K>, DispatchError> {
        let actual = self.kind();
        match self {
            Self::Axis(axis) => Ok(axis),
            _ => Err(DispatchError::PayloadMismatch {
                capability,
                expected: PayloadKind::Axis,
                actual,
            }),
        }
    }
}

impl<'a, K> From<&'a mut BaseData<K>> for EventPayload<'a, K> {
    fn from(base: &'a mut BaseData<K>) -> Self {
        Self::Base(base)
    }
}

impl<'a, K> From<&'a mut PointerData<K>> for EventPayload<'a, K> {
    fn from(pointer: &'a mut PointerData<K>) -> Self {
        Self::Pointer(pointer)
    }
}

impl<'a, K> From<&'a mut AxisData<K>> for EventPayload<'a, K> {
    fn from(axis: &'a mut AxisData<K>) -> Self {
        Self::Axis(axis)
    }
}
