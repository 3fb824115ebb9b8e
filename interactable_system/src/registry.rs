// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry of interaction contexts.
//!
//! The registry owns every [`InteractionContext`] and lets at most one of them
//! run per frame. Each [`tick`](ContextRegistry::tick):
//!
//! 1. Drops the active context if it switched itself off, or if nothing is
//!    registered.
//! 2. With no active context, activates the first registered context whose
//!    own switch is on.
//! 3. Processes the active context.
//!
//! Switching deactivates the old context before activating the new one, so the
//! new context's selection is installed after the old one was cleared.

use alloc::vec::Vec;
use core::fmt;

use interactable_responder::host::{NodeKey, SceneHost};

use crate::context::InteractionContext;
use crate::error::RegistryError;

/// Handle of a registered context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u32);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context#{}", self.0)
    }
}

/// Owns the registered contexts and arbitrates which one runs.
#[derive(Debug)]
pub struct ContextRegistry<K: NodeKey> {
    contexts: Vec<(ContextId, InteractionContext<K>)>,
    active: Option<ContextId>,
    next: u32,
}

impl<K: NodeKey> Default for ContextRegistry<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NodeKey> ContextRegistry<K> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            contexts: Vec::new(),
            active: None,
            next: 0,
        }
    }

    /// Number of registered contexts.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Register a context at the end of the activation order.
    pub fn register(&mut self, context: InteractionContext<K>) -> ContextId {
        let id = ContextId(self.next);
        self.next += 1;
        self.contexts.push((id, context));
        log::debug!("registered {id}");
        id
    }

    /// Remove a context and hand it back.
    ///
    /// Its authoritative module is inactivated. If it was the active context it
    /// is also deactivated, and the registry has no active context until the
    /// next tick picks one.
    pub fn unregister(
        &mut self,
        host: &dyn SceneHost<K>,
        id: ContextId,
    ) -> Result<InteractionContext<K>, RegistryError> {
        let idx = self.index_of(id)?;
        let (_, mut context) = self.contexts.remove(idx);
        if self.active == Some(id) {
            context.deactivate(host);
            self.active = None;
        } else {
            context.release_module(host);
        }
        log::debug!("unregistered {id}");
        Ok(context)
    }

    /// The context registered as `id`.
    pub fn get(&self, id: ContextId) -> Option<&InteractionContext<K>> {
        self.contexts.iter().find(|(c, _)| *c == id).map(|(_, ctx)| ctx)
    }

    /// Mutable access to the context registered as `id`.
    pub fn get_mut(&mut self, id: ContextId) -> Option<&mut InteractionContext<K>> {
        self.contexts
            .iter_mut()
            .find(|(c, _)| *c == id)
            .map(|(_, ctx)| ctx)
    }

    /// Registered ids in activation order.
    pub fn ids(&self) -> impl Iterator<Item = ContextId> + '_ {
        self.contexts.iter().map(|(id, _)| *id)
    }

    /// The context currently running.
    pub fn active(&self) -> Option<ContextId> {
        self.active
    }

    /// Make `target` the running context, or stop running any with `None`.
    ///
    /// Switching to the active context does nothing.
    pub fn switch_active(
        &mut self,
        host: &dyn SceneHost<K>,
        target: Option<ContextId>,
    ) -> Result<(), RegistryError> {
        if self.active == target {
            return Ok(());
        }
        if let Some(id) = target {
            self.index_of(id)?;
        }
        if let Some(old) = self.active {
            if let Some(ctx) = self.get_mut(old) {
                ctx.deactivate(host);
            }
        }
        if let Some(new) = target {
            if let Some(ctx) = self.get_mut(new) {
                ctx.activate(host);
            }
        }
        log::debug!("active context {:?} -> {target:?}", self.active);
        self.active = target;
        Ok(())
    }

    /// Forward an application focus change to every context.
    pub fn set_focused(&mut self, host: &dyn SceneHost<K>, focused: bool) {
        for (_, ctx) in &mut self.contexts {
            ctx.set_focused(host, focused);
        }
    }

    /// One frame: arbitrate, then process the active context.
    pub fn tick(&mut self, host: &dyn SceneHost<K>) {
        let stale = self.contexts.is_empty()
            || self
                .active
                .and_then(|id| self.get(id))
                .is_some_and(|ctx| !ctx.is_active());
        if stale {
            // Switching to `None` cannot fail.
            let _ = self.switch_active(host, None);
        }

        if self.active.is_none() {
            let first = self
                .contexts
                .iter()
                .find(|(_, ctx)| ctx.is_active())
                .map(|(id, _)| *id);
            if first.is_some() {
                let _ = self.switch_active(host, first);
            }
        }

        if let Some(id) = self.active {
            if let Some(ctx) = self.get_mut(id) {
                ctx.process(host);
            }
        }
    }

    fn index_of(&self, id: ContextId) -> Result<usize, RegistryError> {
        self.contexts
            .iter()
            .position(|(c, _)| *c == id)
            .ok_or(RegistryError::UnknownContext(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContextConfig;
    use interactable_responder::scene::{NodeId, SceneTree};

    fn context(first: Option<NodeId>) -> InteractionContext<NodeId> {
        InteractionContext::new(ContextConfig::default().with_first_selected(first))
    }

    #[test]
    fn first_switched_on_context_becomes_active() {
        let mut tree = SceneTree::new();
        let a = tree.insert(None);
        let b = tree.insert(None);
        let mut reg = ContextRegistry::new();
        let mut off = context(Some(a));
        off.set_active(false);
        let off_id = reg.register(off);
        let on_id = reg.register(context(Some(b)));

        reg.tick(&tree);
        assert_eq!(reg.active(), Some(on_id));
        assert_ne!(reg.active(), Some(off_id));
        assert_eq!(reg.get(on_id).and_then(InteractionContext::current_selected), Some(b));
    }

    #[test]
    fn switched_off_context_is_replaced() {
        let mut tree = SceneTree::new();
        let a = tree.insert(None);
        let b = tree.insert(None);
        let mut reg = ContextRegistry::new();
        let first = reg.register(context(Some(a)));
        let second = reg.register(context(Some(b)));
        reg.tick(&tree);
        assert_eq!(reg.active(), Some(first));

        reg.get_mut(first).unwrap().set_active(false);
        reg.tick(&tree);
        assert_eq!(reg.active(), Some(second));
        assert_eq!(reg.get(first).and_then(InteractionContext::current_selected), None);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let tree = SceneTree::new();
        let mut reg = ContextRegistry::<NodeId>::new();
        let id = reg.register(context(None));
        let ctx = reg.unregister(&tree, id);
        assert!(ctx.is_ok());
        assert_eq!(reg.switch_active(&tree, Some(id)), Err(RegistryError::UnknownContext(id)));
        assert!(matches!(reg.unregister(&tree, id), Err(RegistryError::UnknownContext(_))));
        assert!(reg.is_empty());
    }

    #[test]
    fn unregistering_the_active_context_clears_it() {
        let mut tree = SceneTree::new();
        let a = tree.insert(None);
        let mut reg = ContextRegistry::new();
        let id = reg.register(context(Some(a)));
        reg.tick(&tree);
        assert_eq!(reg.active(), Some(id));

        let ctx = reg.unregister(&tree, id).ok();
        assert_eq!(reg.active(), None);
        assert_eq!(ctx.and_then(|c| c.current_selected()), None);
        reg.tick(&tree);
        assert_eq!(reg.active(), None);
    }
}
