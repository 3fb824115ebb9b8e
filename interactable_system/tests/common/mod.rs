// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures: scripted input, rectangle hit regions and a recording component.

#![allow(dead_code, reason = "not every test file uses every fixture")]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use glam::Vec3;
use interactable_responder::capability::{Capability, CapabilitySet};
use interactable_responder::component::{Component, EventCx, HandlerResult};
use interactable_responder::data::{AxisData, BaseData, PointerData};
use interactable_responder::host::ComponentRef;
use interactable_responder::raycast::{ProviderId, ProviderKey, QueryProvider, RaycastResult};
use interactable_responder::scene::{NodeId, SceneTree};
use interactable_system::input::{InputSampler, Touch};
use kurbo::{Point, Rect, Size, Vec2};

pub const FRAME: f64 = 1.0 / 60.0;

/// Scripted per-frame input. Edge samples (button transitions, scroll and
/// named buttons) last one frame; positions, axes and touches persist.
#[derive(Debug)]
pub struct FakeInput {
    pub time: Cell<f64>,
    pub mouse_present: Cell<bool>,
    pub mouse: Cell<Point>,
    pub scroll: Cell<Vec2>,
    pub down: Cell<[bool; 3]>,
    pub up: Cell<[bool; 3]>,
    pub touches: RefCell<Vec<Touch>>,
    pub axes: RefCell<HashMap<String, f64>>,
    pub buttons: RefCell<HashSet<String>>,
    pub screen: Cell<Size>,
}

impl Default for FakeInput {
    fn default() -> Self {
        Self {
            time: Cell::new(0.0),
            mouse_present: Cell::new(true),
            mouse: Cell::new(Point::ZERO),
            scroll: Cell::new(Vec2::ZERO),
            down: Cell::new([false; 3]),
            up: Cell::new([false; 3]),
            touches: RefCell::new(Vec::new()),
            axes: RefCell::new(HashMap::new()),
            buttons: RefCell::new(HashSet::new()),
            screen: Cell::new(Size::new(800.0, 600.0)),
        }
    }
}

impl FakeInput {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Advance time by `dt` and forget last frame's edges.
    pub fn advance(&self, dt: f64) {
        self.time.set(self.time.get() + dt);
        self.down.set([false; 3]);
        self.up.set([false; 3]);
        self.scroll.set(Vec2::ZERO);
        self.buttons.borrow_mut().clear();
    }

    pub fn move_mouse(&self, x: f64, y: f64) {
        self.mouse.set(Point::new(x, y));
    }

    pub fn press(&self, button: usize) {
        let mut down = self.down.get();
        down[button] = true;
        self.down.set(down);
    }

    pub fn release(&self, button: usize) {
        let mut up = self.up.get();
        up[button] = true;
        self.up.set(up);
    }

    pub fn set_axis(&self, name: &str, value: f64) {
        self.axes.borrow_mut().insert(name.to_owned(), value);
    }

    pub fn tap_button(&self, name: &str) {
        self.buttons.borrow_mut().insert(name.to_owned());
    }
}

impl InputSampler for FakeInput {
    fn unscaled_time(&self) -> f64 {
        self.time.get()
    }

    fn mouse_present(&self) -> bool {
        self.mouse_present.get()
    }

    fn mouse_position(&self) -> Point {
        self.mouse.get()
    }

    fn mouse_scroll_delta(&self) -> Vec2 {
        self.scroll.get()
    }

    fn mouse_button_down(&self, button: u8) -> bool {
        self.down.get().get(usize::from(button)).copied().unwrap_or(false)
    }

    fn mouse_button_up(&self, button: u8) -> bool {
        self.up.get().get(usize::from(button)).copied().unwrap_or(false)
    }

    fn touch_count(&self) -> usize {
        self.touches.borrow().len()
    }

    fn touch(&self, index: usize) -> Option<Touch> {
        self.touches.borrow().get(index).copied()
    }

    fn axis_raw(&self, name: &str) -> f64 {
        self.axes.borrow().get(name).copied().unwrap_or(0.0)
    }

    fn button_down(&self, name: &str) -> bool {
        self.buttons.borrow().contains(name)
    }

    fn screen_size(&self) -> Size {
        self.screen.get()
    }
}

/// Hits every region containing the pointer position, at the region's distance.
#[derive(Debug)]
pub struct Regions {
    key: ProviderKey,
    pub regions: RefCell<Vec<(Rect, NodeId, f32)>>,
    pub active: Cell<bool>,
    /// World position stamped on every hit.
    pub world: Cell<Vec3>,
}

impl Regions {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            key: ProviderKey::new(ProviderId::next()),
            regions: RefCell::new(Vec::new()),
            active: Cell::new(true),
            world: Cell::new(Vec3::ZERO),
        })
    }

    pub fn add(&self, rect: Rect, node: NodeId, distance: f32) {
        self.regions.borrow_mut().push((rect, node, distance));
    }
}

impl QueryProvider<NodeId> for Regions {
    fn key(&self) -> ProviderKey {
        self.key
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn raycast(&self, pointer: &PointerData<NodeId>, out: &mut Vec<RaycastResult<NodeId>>) {
        for (rect, node, distance) in self.regions.borrow().iter() {
            if rect.contains(pointer.position) {
                let index = u32::try_from(out.len()).unwrap();
                let mut hit = RaycastResult::hit(*node, self.key, *distance, index);
                hit.screen_position = pointer.position;
                hit.world_position = self.world.get();
                out.push(hit);
            }
        }
    }
}

/// Ordered record of `(capability, node)` deliveries, shared across recorders.
pub type Log = Rc<RefCell<Vec<(Capability, NodeId)>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Entries in `log` for one capability.
pub fn nodes_for(log: &Log, capability: Capability) -> Vec<NodeId> {
    log.borrow()
        .iter()
        .filter(|(c, _)| *c == capability)
        .map(|(_, n)| *n)
        .collect()
}

/// Capabilities in delivery order, ignoring hover traffic.
pub fn without_hover(log: &Log) -> Vec<(Capability, NodeId)> {
    log.borrow()
        .iter()
        .filter(|(c, _)| !CapabilitySet::HOVER.supports(*c))
        .copied()
        .collect()
}

#[derive(Default)]
pub struct Recorder {
    pub log: Log,
    /// Mark the payload used for these capabilities.
    pub use_on: CapabilitySet,
    /// Click counts seen by `on_pointer_click`.
    pub clicks: Vec<u32>,
}

impl Recorder {
    pub fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            ..Self::default()
        }
    }

    fn record(&mut self, capability: Capability, cx: &EventCx<'_, NodeId>, base: &mut BaseData<NodeId>) -> HandlerResult {
        self.log.borrow_mut().push((capability, cx.node()));
        if self.use_on.supports(capability) {
            base.use_event();
        }
        Ok(())
    }
}

impl Component<NodeId> for Recorder {
    fn on_pointer_enter(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::PointerEnter, cx, &mut data.base)
    }

    fn on_pointer_exit(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::PointerExit, cx, &mut data.base)
    }

    fn on_pointer_down(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::PointerDown, cx, &mut data.base)
    }

    fn on_pointer_up(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::PointerUp, cx, &mut data.base)
    }

    fn on_pointer_click(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.clicks.push(data.click_count());
        self.record(Capability::PointerClick, cx, &mut data.base)
    }

    fn on_pointer_move(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::PointerMove, cx, &mut data.base)
    }

    fn on_initialize_potential_drag(
        &mut self,
        cx: &EventCx<'_, NodeId>,
        data: &mut PointerData<NodeId>,
    ) -> HandlerResult {
        self.record(Capability::InitializePotentialDrag, cx, &mut data.base)
    }

    fn on_begin_drag(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::BeginDrag, cx, &mut data.base)
    }

    fn on_drag(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::Drag, cx, &mut data.base)
    }

    fn on_end_drag(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::EndDrag, cx, &mut data.base)
    }

    fn on_drop(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::Drop, cx, &mut data.base)
    }

    fn on_scroll(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::Scroll, cx, &mut data.base)
    }

    fn on_update_selected(&mut self, cx: &EventCx<'_, NodeId>, data: &mut BaseData<NodeId>) -> HandlerResult {
        self.record(Capability::UpdateSelected, cx, data)
    }

    fn on_select(&mut self, cx: &EventCx<'_, NodeId>, data: &mut BaseData<NodeId>) -> HandlerResult {
        self.record(Capability::Select, cx, data)
    }

    fn on_deselect(&mut self, cx: &EventCx<'_, NodeId>, data: &mut BaseData<NodeId>) -> HandlerResult {
        self.record(Capability::Deselect, cx, data)
    }

    fn on_move(&mut self, cx: &EventCx<'_, NodeId>, data: &mut AxisData<NodeId>) -> HandlerResult {
        self.record(Capability::Move, cx, &mut data.base)
    }

    fn on_submit(&mut self, cx: &EventCx<'_, NodeId>, data: &mut BaseData<NodeId>) -> HandlerResult {
        self.record(Capability::Submit, cx, data)
    }

    fn on_cancel(&mut self, cx: &EventCx<'_, NodeId>, data: &mut BaseData<NodeId>) -> HandlerResult {
        self.record(Capability::Cancel, cx, data)
    }
}

/// Attach a recorder for `capabilities` to `node`, returning a handle to it.
pub fn attach(
    tree: &mut SceneTree,
    node: NodeId,
    capabilities: CapabilitySet,
    recorder: Recorder,
) -> Rc<RefCell<Recorder>> {
    let shared = Rc::new(RefCell::new(recorder));
    tree.attach(node, ComponentRef::from_shared(capabilities, Rc::clone(&shared)));
    shared
}
