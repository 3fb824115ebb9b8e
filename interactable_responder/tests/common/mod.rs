// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures: a component that records every event it receives.

#![allow(dead_code, reason = "not every test file uses every fixture")]

use std::cell::RefCell;
use std::rc::Rc;

use interactable_responder::capability::{Capability, CapabilitySet};
use interactable_responder::component::{Component, EventCx, HandlerResult};
use interactable_responder::data::{AxisData, BaseData, PointerData};
use interactable_responder::error::{HandlerError, SelectionError};
use interactable_responder::host::ComponentRef;
use interactable_responder::scene::{NodeId, SceneTree};

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

#[derive(Default)]
pub struct Recorder {
    pub log: Log,
    pub enabled: bool,
    /// Return an error from this capability's handler.
    pub fail_on: Option<Capability>,
    /// Panic inside this capability's handler.
    pub panic_on: Option<Capability>,
    /// Mark the payload used for these capabilities.
    pub use_on: CapabilitySet,
    /// On select, try to select this node as well.
    pub select_on_select: Option<NodeId>,
    pub nested_select: Option<Result<(), SelectionError>>,
    /// On pointer down, deliver pointer down to our own node again.
    pub redispatch_on_down: bool,
    pub received: u32,
}

impl Recorder {
    pub fn new(log: &Log) -> Self {
        Self {
            log: Rc::clone(log),
            enabled: true,
            ..Self::default()
        }
    }

    fn record(
        &mut self,
        capability: Capability,
        cx: &EventCx<'_, NodeId>,
        base: &mut BaseData<NodeId>,
    ) -> HandlerResult {
        self.received += 1;
        self.log.borrow_mut().push((capability, cx.node()));
        if self.use_on.supports(capability) {
            base.use_event();
        }
        if self.panic_on == Some(capability) {
            panic!("recorder asked to panic on {capability}");
        }
        if self.fail_on == Some(capability) {
            return Err(HandlerError::failed("recorder asked to fail"));
        }
        Ok(())
    }
}

impl Component<NodeId> for Recorder {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn on_pointer_enter(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::PointerEnter, cx, &mut data.base)
    }

    fn on_pointer_exit(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::PointerExit, cx, &mut data.base)
    }

    fn on_pointer_down(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        let result = self.record(Capability::PointerDown, cx, &mut data.base);
        if self.redispatch_on_down {
            interactable_responder::dispatcher::dispatch(
                cx.host(),
                Some(cx.node()),
                Capability::PointerDown,
                data.payload(),
            );
        }
        result
    }

    fn on_pointer_up(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
        self.record(Capability::PointerUp, cx, &mut data.base)
    }

    fn on_pointer_click(&mut self, cx: &EventCx<'_, NodeId>, data: &mut PointerData<NodeId>) -> HandlerResult {
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
        let result = self.record(Capability::Select, cx, data);
        if let Some(other) = self.select_on_select {
            self.nested_select = Some(data.set_selected(cx.host(), Some(other)));
        }
        result
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
