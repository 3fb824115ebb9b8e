// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher: deliver one capability to the components on a node, or to the
//! nearest ancestor that has any.
//!
//! Delivery rules:
//!
//! - Nodes that are not active in the hierarchy receive nothing.
//! - Components are visited in attachment order. Only components whose
//!   declared capabilities include the one being delivered, and that report
//!   themselves enabled, are visited.
//! - The component list is snapshotted before the first handler runs.
//!   Components attached or removed by a handler take effect on the next
//!   dispatch.
//! - A handler that returns an error, panics (with `std`), receives the wrong
//!   payload kind, or is already running further up the stack is logged and
//!   skipped. The remaining components still receive the event.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use interactable_responder::capability::{Capability, CapabilitySet};
//! use interactable_responder::component::{Component, EventCx, HandlerResult};
//! use interactable_responder::data::PointerData;
//! use interactable_responder::dispatcher;
//! use interactable_responder::host::ComponentRef;
//! use interactable_responder::scene::SceneTree;
//! use interactable_responder::selection::Selection;
//!
//! #[derive(Default)]
//! struct Downs(u32);
//!
//! impl<K> Component<K> for Downs {
//!     fn on_pointer_down(&mut self, _: &EventCx<'_, K>, _: &mut PointerData<K>) -> HandlerResult {
//!         self.0 += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut tree = SceneTree::new();
//! let root = tree.insert(None);
//! let leaf = tree.insert(Some(root));
//! let downs = Rc::new(RefCell::new(Downs::default()));
//! tree.attach(root, ComponentRef::from_shared(CapabilitySet::POINTER_DOWN, downs.clone()));
//!
//! let mut data = PointerData::new(Rc::new(Selection::new()), -1);
//! // The leaf has no handler; the press bubbles to the root.
//! let handled = dispatcher::dispatch_up_hierarchy(&tree, Some(leaf), Capability::PointerDown, data.payload());
//! assert_eq!(handled, Some(root));
//! assert_eq!(downs.borrow().0, 1);
//! ```

use alloc::vec::Vec;

use crate::capability::Capability;
use crate::component::{EventCx, invoke};
use crate::data::EventPayload;
use crate::error::DispatchError;
use crate::host::{ComponentRef, NodeKey, SceneHost, ancestor_chain};

/// Components on `node` that would receive `capability`, in attachment order.
///
/// Empty when the node is inactive in the hierarchy.
pub fn components_with_capability<K: NodeKey>(
    host: &dyn SceneHost<K>,
    node: K,
    capability: Capability,
) -> Vec<ComponentRef<K>> {
    if !host.is_active_in_hierarchy(&node) {
        return Vec::new();
    }
    let mut all = Vec::new();
    host.components_of(&node, &mut all);
    all.retain(|component| component.accepts(capability));
    all
}

/// Returns `true` if any component on `node` would receive `capability`.
pub fn can_handle<K: NodeKey>(host: &dyn SceneHost<K>, node: K, capability: Capability) -> bool {
    if !host.is_active_in_hierarchy(&node) {
        return false;
    }
    let mut all = Vec::new();
    host.components_of(&node, &mut all);
    all.iter().any(|component| component.accepts(capability))
}

/// Deliver `capability` to every eligible component on `target`.
///
/// Returns `true` if at least one component was eligible, whether or not its
/// handler succeeded. A `None` target delivers nothing.
pub fn dispatch<K: NodeKey>(
    host: &dyn SceneHost<K>,
    target: Option<K>,
    capability: Capability,
    mut payload: EventPayload<'_, K>,
) -> bool {
    let Some(node) = target else {
        return false;
    };
    let handlers = components_with_capability(host, node, capability);
    if handlers.is_empty() {
        return false;
    }
    log::trace!("{capability} -> {node:?} ({} handlers)", handlers.len());

    let cx = EventCx::new(host, node);
    for handler in &handlers {
        let outcome = handler.invoke(capability, |component| {
            invoke(component, capability, &cx, &mut payload)
        });
        if let Err(err) = outcome {
            report(node, &err);
        }
    }
    true
}

/// Deliver `capability` to the nearest node, starting at `target` and walking
/// up, that has an eligible component.
///
/// The ancestor chain is captured before delivery. Returns the node that
/// received the event.
pub fn dispatch_up_hierarchy<K: NodeKey>(
    host: &dyn SceneHost<K>,
    target: Option<K>,
    capability: Capability,
    mut payload: EventPayload<'_, K>,
) -> Option<K> {
    let chain = ancestor_chain(host, target?);
    chain
        .into_iter()
        .find(|&node| dispatch(host, Some(node), capability, payload.reborrow()))
}

/// The nearest node, starting at `target` and walking up, that would receive
/// `capability`.
pub fn nearest_handler<K: NodeKey>(
    host: &dyn SceneHost<K>,
    target: Option<K>,
    capability: Capability,
) -> Option<K> {
    let mut cursor = target;
    while let Some(node) = cursor {
        if can_handle(host, node, capability) {
            return Some(node);
        }
        cursor = host.parent_of(&node);
    }
    None
}

fn report<K: NodeKey>(node: K, err: &DispatchError) {
    match err {
        DispatchError::Handler(_) | DispatchError::Panicked { .. } => {
            log::warn!("handler on {node:?} failed: {err}");
        }
        DispatchError::PayloadMismatch { .. } | DispatchError::Reentrant { .. } => {
            log::error!("dispatch to {node:?} skipped: {err}");
        }
    }
}
