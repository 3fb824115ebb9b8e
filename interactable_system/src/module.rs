// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The input module contract and the context it runs against.
//!
//! An [`InputModule`] is one input paradigm (free cursor, locked cursor, ...).
//! The owning [`InteractionContext`](crate::context::InteractionContext) calls
//! it every frame with a [`ModuleCx`]: the scene, the selection, the query
//! providers and the context settings.
//!
//! Frame order, per context:
//! 1. [`InputModule::update_module`] on every attached module.
//! 2. Arbitration with [`InputModule::is_supported`] and
//!    [`InputModule::should_activate`].
//! 3. [`InputModule::process`] on the authoritative module, unless the
//!    authoritative module changed this frame.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use interactable_responder::data::{BaseData, PointerData, PointerId};
use interactable_responder::error::SelectionError;
use interactable_responder::host::{NodeKey, SceneHost};
use interactable_responder::raycast::{QueryProvider, RaycastResult, sort_results};
use interactable_responder::selection::Selection;

use crate::config::ContextConfig;

/// Everything a module may touch while it runs.
pub struct ModuleCx<'a, K> {
    host: &'a dyn SceneHost<K>,
    selection: &'a Rc<Selection<K>>,
    providers: &'a [Rc<dyn QueryProvider<K>>],
    config: &'a ContextConfig<K>,
    focused: bool,
}

impl<K> fmt::Debug for ModuleCx<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleCx")
            .field("providers", &self.providers.len())
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl<'a, K: NodeKey> ModuleCx<'a, K> {
    /// Bundle the pieces of a context for one module call.
    pub fn new(
        host: &'a dyn SceneHost<K>,
        selection: &'a Rc<Selection<K>>,
        providers: &'a [Rc<dyn QueryProvider<K>>],
        config: &'a ContextConfig<K>,
        focused: bool,
    ) -> Self {
        Self {
            host,
            selection,
            providers,
            config,
            focused,
        }
    }

    /// The scene events are delivered into.
    pub fn host(&self) -> &'a dyn SceneHost<K> {
        self.host
    }

    /// The context's selection.
    pub fn selection(&self) -> &'a Rc<Selection<K>> {
        self.selection
    }

    /// Currently selected node.
    pub fn current_selected(&self) -> Option<K> {
        self.selection.current()
    }

    /// Context settings.
    pub fn config(&self) -> &'a ContextConfig<K> {
        self.config
    }

    /// Whether the application has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// A fresh base payload bound to the context's selection.
    pub fn base_data(&self) -> BaseData<K> {
        BaseData::new(Rc::clone(self.selection))
    }

    /// A fresh pointer record bound to the context's selection.
    pub fn new_pointer(&self, pointer_id: PointerId) -> PointerData<K> {
        PointerData::new(Rc::clone(self.selection), pointer_id)
    }

    /// Change the selection with a base payload.
    pub fn set_selected(&self, node: Option<K>) -> Result<(), SelectionError> {
        self.base_data().set_selected(self.host, node)
    }

    /// Query every active provider for `pointer` and sort the merged hits.
    ///
    /// `out` is cleared first. The first result after sorting is the
    /// authoritative hit.
    pub fn raycast_all(&self, pointer: &PointerData<K>, out: &mut Vec<RaycastResult<K>>) {
        raycast_all(self.providers, pointer, out);
    }
}

/// Merge hits from every active provider, in attachment order, then sort.
pub fn raycast_all<K: Copy>(
    providers: &[Rc<dyn QueryProvider<K>>],
    pointer: &PointerData<K>,
    out: &mut Vec<RaycastResult<K>>,
) {
    out.clear();
    for provider in providers.iter().filter(|p| p.is_active()) {
        provider.raycast(pointer, out);
    }
    sort_results(out);
    log::trace!("raycast for pointer {}: {} hits", pointer.pointer_id, out.len());
}

/// One input paradigm.
///
/// All methods except [`process`](Self::process) and
/// [`should_activate`](Self::should_activate) have empty defaults.
pub trait InputModule<K: NodeKey>: fmt::Debug {
    /// The input this module needs is available.
    fn is_supported(&self) -> bool {
        true
    }

    /// Input seen this frame says the user wants this module.
    fn should_activate(&self, cx: &ModuleCx<'_, K>) -> bool;

    /// Became authoritative.
    fn activate(&mut self, cx: &ModuleCx<'_, K>) {
        let _ = cx;
    }

    /// Stopped being authoritative.
    fn inactivate(&mut self, cx: &ModuleCx<'_, K>) {
        let _ = cx;
    }

    /// Per-frame bookkeeping; runs whether or not the module is
    /// authoritative. Must not deliver events except to release state on
    /// focus loss.
    fn update_module(&mut self, cx: &ModuleCx<'_, K>) {
        let _ = cx;
    }

    /// Sample input and deliver this frame's events.
    fn process(&mut self, cx: &ModuleCx<'_, K>);

    /// The pointer `pointer_id` is over some node.
    fn is_pointer_over_node(&self, pointer_id: PointerId) -> bool {
        let _ = pointer_id;
        false
    }
}
