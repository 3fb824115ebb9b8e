// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction context: one input scheme.
//!
//! A context bundles a selection, an ordered list of [`InputModule`]s and an
//! ordered list of [`QueryProvider`]s. At most one module is authoritative at
//! a time.
//!
//! ## Activation
//!
//! [`activate`](InteractionContext::activate) selects the configured first
//! node (or, with `keep_selection_state`, the selection held when the context
//! was last deactivated) and makes the first supported module that wants to
//! activate authoritative. [`deactivate`](InteractionContext::deactivate)
//! clears the selection and the authoritative module.
//!
//! ## Frame
//!
//! [`process`](InteractionContext::process) ticks every module, re-runs
//! arbitration and then processes the authoritative module, except on a frame
//! where the authoritative module changed.
//!
//! When no module wants to activate and none is authoritative, the first
//! supported module is made authoritative anyway, so some module handles input
//! whenever one is supported.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use interactable_responder::data::{PointerData, PointerId};
use interactable_responder::error::SelectionError;
use interactable_responder::host::{NodeKey, SceneHost};
use interactable_responder::raycast::{QueryProvider, RaycastResult};
use interactable_responder::selection::Selection;

use crate::config::ContextConfig;
use crate::module::{self, InputModule, ModuleCx};

/// Handle of a module attached to a context.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(u32);

struct ModuleSlot<K: NodeKey> {
    id: ModuleId,
    module: Box<dyn InputModule<K>>,
}

/// Selection, input modules and query providers for one input scheme.
pub struct InteractionContext<K: NodeKey> {
    config: ContextConfig<K>,
    selection: Rc<Selection<K>>,
    modules: Vec<ModuleSlot<K>>,
    current: Option<ModuleId>,
    next_module: u32,
    providers: Vec<Rc<dyn QueryProvider<K>>>,
    active: bool,
    focused: bool,
    initialized: bool,
}

impl<K: NodeKey> fmt::Debug for InteractionContext<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modules: Vec<_> = self.modules.iter().map(|slot| (slot.id, &slot.module)).collect();
        f.debug_struct("InteractionContext")
            .field("config", &self.config)
            .field("selection", &self.selection)
            .field("modules", &modules)
            .field("current", &self.current)
            .field("providers", &self.providers.len())
            .field("active", &self.active)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl<K: NodeKey> Default for InteractionContext<K> {
    fn default() -> Self {
        Self::new(ContextConfig::default())
    }
}

impl<K: NodeKey> InteractionContext<K> {
    /// An active, focused context with no modules or providers.
    pub fn new(config: ContextConfig<K>) -> Self {
        Self {
            config,
            selection: Rc::new(Selection::new()),
            modules: Vec::new(),
            current: None,
            next_module: 0,
            providers: Vec::new(),
            active: true,
            focused: true,
            initialized: false,
        }
    }

    /// Settings.
    pub fn config(&self) -> &ContextConfig<K> {
        &self.config
    }

    /// Mutable settings.
    pub fn config_mut(&mut self) -> &mut ContextConfig<K> {
        &mut self.config
    }

    /// The shared selection cell.
    pub fn selection(&self) -> &Rc<Selection<K>> {
        &self.selection
    }

    /// Currently selected node.
    pub fn current_selected(&self) -> Option<K> {
        self.selection.current()
    }

    /// Node selected before the current one.
    pub fn last_selected(&self) -> Option<K> {
        self.selection.last()
    }

    /// Whether the context wants to be the active context.
    ///
    /// This is the context's own switch; the registry decides which of the
    /// contexts that report `true` actually runs.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Flip the context's own switch.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether the application has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Record an application focus change.
    ///
    /// Losing focus ticks every module once so they can release held state.
    pub fn set_focused(&mut self, host: &dyn SceneHost<K>, focused: bool) {
        self.focused = focused;
        if !focused {
            self.tick_modules(host);
        }
    }

    /// Attach a module at the end of the arbitration order.
    pub fn attach_module(&mut self, module: Box<dyn InputModule<K>>) -> ModuleId {
        let id = ModuleId(self.next_module);
        self.next_module += 1;
        self.modules.push(ModuleSlot { id, module });
        id
    }

    /// Detach a module. An authoritative module is inactivated first.
    pub fn detach_module(&mut self, host: &dyn SceneHost<K>, id: ModuleId) -> Option<Box<dyn InputModule<K>>> {
        if self.current == Some(id) {
            self.change_module(host, None);
        }
        let idx = self.modules.iter().position(|slot| slot.id == id)?;
        Some(self.modules.remove(idx).module)
    }

    /// The authoritative module.
    pub fn current_module(&self) -> Option<ModuleId> {
        self.current
    }

    /// Look up an attached module.
    pub fn module(&self, id: ModuleId) -> Option<&dyn InputModule<K>> {
        self.modules
            .iter()
            .find(|slot| slot.id == id)
            .map(|slot| &*slot.module)
    }

    /// Attach a query provider. Returns `false` if it is already attached.
    pub fn add_provider(&mut self, provider: Rc<dyn QueryProvider<K>>) -> bool {
        if self.providers.iter().any(|p| Rc::ptr_eq(p, &provider)) {
            return false;
        }
        self.providers.push(provider);
        true
    }

    /// Detach a query provider. Returns `false` if it was not attached.
    pub fn remove_provider(&mut self, provider: &Rc<dyn QueryProvider<K>>) -> bool {
        let before = self.providers.len();
        self.providers.retain(|p| !Rc::ptr_eq(p, provider));
        self.providers.len() != before
    }

    /// Query every active provider for `pointer` and sort the merged hits into `out`.
    pub fn raycast_all(&self, pointer: &PointerData<K>, out: &mut Vec<RaycastResult<K>>) {
        module::raycast_all(&self.providers, pointer, out);
    }

    /// Change the selection, delivering deselect and select.
    pub fn set_selected(&self, host: &dyn SceneHost<K>, node: Option<K>) -> Result<(), SelectionError> {
        let cx = ModuleCx::new(host, &self.selection, &self.providers, &self.config, self.focused);
        cx.set_selected(node)
    }

    /// The authoritative module reports `pointer_id` over a node.
    pub fn is_pointer_over_node(&self, pointer_id: PointerId) -> bool {
        self.current
            .and_then(|id| self.module(id))
            .is_some_and(|module| module.is_pointer_over_node(pointer_id))
    }

    /// Entry actions when the registry makes this the active context.
    pub fn activate(&mut self, host: &dyn SceneHost<K>) {
        let target = if !self.initialized {
            self.initialized = true;
            self.config.first_selected
        } else if self.config.keep_selection_state {
            self.selection.last()
        } else {
            self.config.first_selected
        };
        log::debug!("context activated, selecting {target:?}");
        // A refusal is already reported by the selection.
        let _ = self.set_selected(host, target);

        let wanted = {
            let cx = ModuleCx::new(host, &self.selection, &self.providers, &self.config, self.focused);
            self.modules
                .iter()
                .find(|slot| slot.module.is_supported() && slot.module.should_activate(&cx))
                .map(|slot| slot.id)
        };
        if wanted.is_some() {
            self.change_module(host, wanted);
        }
    }

    /// Exit actions when the registry switches away from this context.
    pub fn deactivate(&mut self, host: &dyn SceneHost<K>) {
        log::debug!("context deactivated");
        let _ = self.set_selected(host, None);
        self.change_module(host, None);
    }

    /// Inactivate the authoritative module without touching the selection.
    pub fn release_module(&mut self, host: &dyn SceneHost<K>) {
        self.change_module(host, None);
    }

    /// One frame: tick, arbitrate, process.
    pub fn process(&mut self, host: &dyn SceneHost<K>) {
        if !self.active {
            return;
        }
        self.tick_modules(host);
        let changed = self.check_change_module(host);
        if changed {
            return;
        }
        let Some(current) = self.current else {
            return;
        };
        let Self {
            config,
            selection,
            modules,
            providers,
            focused,
            ..
        } = self;
        let cx = ModuleCx::new(host, selection, providers, config, *focused);
        if let Some(slot) = modules.iter_mut().find(|slot| slot.id == current) {
            slot.module.process(&cx);
        }
    }

    fn tick_modules(&mut self, host: &dyn SceneHost<K>) {
        let Self {
            config,
            selection,
            modules,
            providers,
            focused,
            ..
        } = self;
        let cx = ModuleCx::new(host, selection, providers, config, *focused);
        for slot in modules.iter_mut() {
            slot.module.update_module(&cx);
        }
    }

    /// Returns `true` if the authoritative module changed.
    fn check_change_module(&mut self, host: &dyn SceneHost<K>) -> bool {
        let (wanted, fallback) = {
            let cx = ModuleCx::new(host, &self.selection, &self.providers, &self.config, self.focused);
            let wanted = self
                .modules
                .iter()
                .find(|slot| slot.module.is_supported() && slot.module.should_activate(&cx))
                .map(|slot| slot.id);
            let fallback = self
                .modules
                .iter()
                .find(|slot| slot.module.is_supported())
                .map(|slot| slot.id);
            (wanted, fallback)
        };

        let mut changed = false;
        if let Some(id) = wanted {
            if self.current != Some(id) {
                self.change_module(host, Some(id));
                changed = true;
            }
        }
        if self.current.is_none() {
            if let Some(id) = fallback {
                log::debug!("no module asked to activate; falling back to {id:?}");
                self.change_module(host, Some(id));
                changed = true;
            }
        }
        changed
    }

    fn change_module(&mut self, host: &dyn SceneHost<K>, target: Option<ModuleId>) {
        if self.current == target {
            return;
        }
        let Self {
            config,
            selection,
            modules,
            providers,
            focused,
            current,
            ..
        } = self;
        let cx = ModuleCx::new(host, selection, providers, config, *focused);
        if let Some(old) = *current {
            if let Some(slot) = modules.iter_mut().find(|slot| slot.id == old) {
                slot.module.inactivate(&cx);
            }
        }
        if let Some(new) = target {
            if let Some(slot) = modules.iter_mut().find(|slot| slot.id == new) {
                slot.module.activate(&cx);
            }
        }
        log::debug!("authoritative module {:?} -> {target:?}", *current);
        *current = target;
    }
}
