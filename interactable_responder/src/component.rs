// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The component trait: one optional handler per capability.
//!
//! Implement only the handlers you registered capabilities for; the rest
//! default to doing nothing. Handlers receive an [`EventCx`] naming the node
//! the component is attached to and the scene host, which is what a handler
//! needs to change the selection or look around the hierarchy.
//!
//! ```
//! use interactable_responder::capability::CapabilitySet;
//! use interactable_responder::component::{Component, EventCx, HandlerResult};
//! use interactable_responder::data::PointerData;
//! use interactable_responder::host::ComponentRef;
//!
//! #[derive(Default)]
//! struct Counter {
//!     clicks: u32,
//! }
//!
//! impl Component<u32> for Counter {
//!     fn on_pointer_click(
//!         &mut self,
//!         _cx: &EventCx<'_, u32>,
//!         data: &mut PointerData<u32>,
//!     ) -> HandlerResult {
//!         self.clicks += 1;
//!         data.base.use_event();
//!         Ok(())
//!     }
//! }
//!
//! let component = ComponentRef::new(CapabilitySet::POINTER_CLICK, Counter::default());
//! assert!(component.capabilities().contains(CapabilitySet::POINTER_CLICK));
//! ```

use core::fmt;

use crate::capability::Capability;
use crate::data::{AxisData, BaseData, EventPayload, PointerData};
use crate::error::{DispatchError, HandlerError};
use crate::host::SceneHost;

/// What a handler returns.
pub type HandlerResult = Result<(), HandlerError>;

/// Context for one handler invocation.
pub struct EventCx<'a, K> {
    host: &'a dyn SceneHost<K>,
    node: K,
}

impl<K: fmt::Debug> fmt::Debug for EventCx<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCx")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

impl<'a, K: Copy> EventCx<'a, K> {
    /// Context for delivering to `node` in `host`.
    pub fn new(host: &'a dyn SceneHost<K>, node: K) -> Self {
        Self { host, node }
    }

    /// The scene host.
    pub fn host(&self) -> &'a dyn SceneHost<K> {
        self.host
    }

    /// The node the component is attached to.
    pub fn node(&self) -> K {
        self.node
    }
}

/// Handlers for every capability. All default to `Ok(())`.
#[allow(unused_variables, reason = "default handlers ignore their arguments")]
pub trait Component<K> {
    /// Disabled components are skipped by the dispatcher.
    fn is_enabled(&self) -> bool {
        true
    }

    /// [`Capability::PointerEnter`].
    fn on_pointer_enter(&mut self, cx: &EventCx<'_, K>, data: &mut PointerData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::PointerExit`].
    fn on_pointer_exit(&mut self, cx: &EventCx<'_, K>, data: &mut PointerData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::PointerDown`].
    fn on_pointer_down(&mut self, cx: &EventCx<'_, K>, data: &mut PointerData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::PointerUp`].
    fn on_pointer_up(&mut self, cx: &EventCx<'_, K>, data: &mut PointerData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::PointerClick`].
    fn on_pointer_click(&mut self, cx: &EventCx<'_, K>, data: &mut PointerData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::PointerMove`].
    fn on_pointer_move(&mut self, cx: &EventCx<'_, K>, data: &mut PointerData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::InitializePotentialDrag`].
    ///
    /// Clearing `data.use_drag_threshold` here makes the drag start on the
    /// next move.
    fn on_initialize_potential_drag(
        &mut self,
        cx: &EventCx<'_, K>,
        data: &mut PointerData<K>,
    ) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::BeginDrag`].
    fn on_begin_drag(&mut self, cx: &EventCx<'_, K>, data: &mut PointerData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::Drag`].
    fn on_drag(&mut self, cx: &EventCx<'_, K>, data: &mut PointerData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::EndDrag`].
    fn on_end_drag(&mut self, cx: &EventCx<'_, K>, data: &mut PointerData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::Drop`].
    fn on_drop(&mut self, cx: &EventCx<'_, K>, data: &mut PointerData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::Scroll`].
    fn on_scroll(&mut self, cx: &EventCx<'_, K>, data: &mut PointerData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::UpdateSelected`].
    fn on_update_selected(&mut self, cx: &EventCx<'_, K>, data: &mut BaseData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::Select`].
    fn on_select(&mut self, cx: &EventCx<'_, K>, data: &mut BaseData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::Deselect`].
    fn on_deselect(&mut self, cx: &EventCx<'_, K>, data: &mut BaseData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::Move`].
    fn on_move(&mut self, cx: &EventCx<'_, K>, data: &mut AxisData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::Submit`].
    fn on_submit(&mut self, cx: &EventCx<'_, K>, data: &mut BaseData<K>) -> HandlerResult {
        Ok(())
    }

    /// [`Capability::Cancel`].
    fn on_cancel(&mut self, cx: &EventCx<'_, K>, data: &mut BaseData<K>) -> HandlerResult {
        Ok(())
    }
}

/// Route `capability` to the matching handler on `component`.
///
/// Base-payload capabilities accept any payload; pointer and axis
/// capabilities require their own payload kind.
pub(crate) fn invoke<K>(
    component: &mut dyn Component<K>,
    capability: Capability,
    cx: &EventCx<'_, K>,
    payload: &mut EventPayload<'_, K>,
) -> Result<(), DispatchError> {
    use Capability as C;

    let result = match capability {
        C::PointerEnter => component.on_pointer_enter(cx, payload.pointer(capability)?),
        C::PointerExit => component.on_pointer_exit(cx, payload.pointer(capability)?),
        C::PointerDown => component.on_pointer_down(cx, payload.pointer(capability)?),
        C::PointerUp => component.on_pointer_up(cx, payload.pointer(capability)?),
        C::PointerClick => component.on_pointer_click(cx, payload.pointer(capability)?),
        C::PointerMove => component.on_pointer_move(cx, payload.pointer(capability)?),
        C::InitializePotentialDrag => {
            component.on_initialize_potential_drag(cx, payload.pointer(capability)?)
        }
        C::BeginDrag => component.on_begin_drag(cx, payload.pointer(capability)?),
        C::Drag => component.on_drag(cx, payload.pointer(capability)?),
        C::EndDrag => component.on_end_drag(cx, payload.pointer(capability)?),
        C::Drop => component.on_drop(cx, payload.pointer(capability)?),
        C::Scroll => component.on_scroll(cx, payload.pointer(capability)?),
        C::UpdateSelected => component.on_update_selected(cx, payload.base_mut()),
        C::Select => component.on_select(cx, payload.base_mut()),
        C::Deselect => component.on_deselect(cx, payload.base_mut()),
        C::Move => component.on_move(cx, payload.axis(capability)?),
        C::Submit => component.on_submit(cx, payload.base_mut()),
        C::Cancel => component.on_cancel(cx, payload.base_mut()),
    };
    result.map_err(DispatchError::Handler)
}
