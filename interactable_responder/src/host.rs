// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene host seams: how the dispatcher sees your hierarchy and components.
//!
//! The dispatcher never owns the scene. It asks a [`SceneHost`] for a node's
//! parent, whether the node is active, and which components are attached to
//! it. [`SceneTree`](crate::scene::SceneTree) is a ready-made host; any other
//! scene graph can implement the trait directly.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use smallvec::SmallVec;

use crate::capability::{Capability, CapabilitySet};
use crate::component::Component;
use crate::error::DispatchError;

/// Node handles used throughout the crate.
///
/// Blanket-implemented for every small copyable, comparable handle.
pub trait NodeKey: Copy + PartialEq + fmt::Debug + 'static {}

impl<T: Copy + PartialEq + fmt::Debug + 'static> NodeKey for T {}

/// Parent lookup for walking a node's ancestors.
pub trait ParentLookup<K> {
    /// Return the parent of `node`, or `None` at a root or for a stale handle.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// Everything the dispatcher needs to know about a scene.
pub trait SceneHost<K>: ParentLookup<K> {
    /// Returns `true` if the node and all of its ancestors are active.
    ///
    /// Inactive nodes receive no events. Stale handles report `false`.
    fn is_active_in_hierarchy(&self, node: &K) -> bool;

    /// Append the node's components to `out` in attachment order.
    fn components_of(&self, node: &K, out: &mut Vec<ComponentRef<K>>);
}

/// Inline capacity for hierarchy snapshots.
pub const CHAIN_INLINE: usize = 16;

/// Snapshot of a node followed by its ancestors, nearest first.
pub type AncestorChain<K> = SmallVec<[K; CHAIN_INLINE]>;

/// Collect `node` and its ancestors up to the root.
///
/// The walk is captured up front so hierarchy changes made by handlers while
/// the chain is being processed do not affect it.
pub fn ancestor_chain<K, P>(lookup: &P, node: K) -> AncestorChain<K>
where
    K: Copy,
    P: ParentLookup<K> + ?Sized,
{
    let mut chain = AncestorChain::new();
    let mut cursor = Some(node);
    while let Some(current) = cursor {
        chain.push(current);
        cursor = lookup.parent_of(&current);
    }
    chain
}

/// A component attached to a node, with the capabilities it was registered for.
///
/// Cloning is cheap and shares the component.
pub struct ComponentRef<K> {
    capabilities: CapabilitySet,
    inner: Rc<RefCell<dyn Component<K>>>,
}

impl<K> Clone for ComponentRef<K> {
    fn clone(&self) -> Self {
        Self {
            capabilities: self.capabilities,
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K> fmt::Debug for ComponentRef<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("capabilities", &self.capabilities)
            .field("busy", &self.inner.try_borrow().is_err())
            .finish_non_exhaustive()
    }
}

impl<K: NodeKey> ComponentRef<K> {
    /// Wrap a component, declaring the capabilities it handles.
    pub fn new<C: Component<K> + 'static>(capabilities: CapabilitySet, component: C) -> Self {
        Self {
            capabilities,
            inner: Rc::new(RefCell::new(component)),
        }
    }

    /// Wrap an already shared component.
    ///
    /// Keep a clone of `component` to inspect its state after dispatch.
    pub fn from_shared<C: Component<K> + 'static>(
        capabilities: CapabilitySet,
        component: Rc<RefCell<C>>,
    ) -> Self {
        Self {
            capabilities,
            inner: component,
        }
    }

    /// Capabilities declared at registration.
    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    /// Returns `true` if both refs point at the same component.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns `true` if the component declared `capability` and reports
    /// itself enabled.
    ///
    /// A component that is busy handling an event counts as enabled.
    pub fn accepts(&self, capability: Capability) -> bool {
        self.capabilities.supports(capability)
            && self
                .inner
                .try_borrow()
                .map(|component| component.is_enabled())
                .unwrap_or(true)
    }

    /// Run `f` against the component, isolating panics when `std` is enabled.
    pub(crate) fn invoke<F>(&self, capability: Capability, f: F) -> Result<(), DispatchError>
    where
        F: FnOnce(&mut dyn Component<K>) -> Result<(), DispatchError>,
    {
        let Ok(mut component) = self.inner.try_borrow_mut() else {
            return Err(DispatchError::Reentrant { capability });
        };
        guarded(capability, || f(&mut *component))
    }
}

#[cfg(feature = "std")]
fn guarded<F>(capability: Capability, f: F) -> Result<(), DispatchError>
where
    F: FnOnce() -> Result<(), DispatchError>,
{
    use alloc::string::{String, ToString};

    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = if let Some(s) = payload.downcast_ref::<&str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                String::from("<non-string panic payload>")
            };
            Err(DispatchError::Panicked {
                capability,
                message,
            })
        }
    }
}

#[cfg(not(feature = "std"))]
fn guarded<F>(_capability: Capability, f: F) -> Result<(), DispatchError>
where
    F: FnOnce() -> Result<(), DispatchError>,
{
    f()
}
