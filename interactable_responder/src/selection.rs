// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The selected node of one interaction context.
//!
//! [`Selection`] uses interior mutability so handlers can request a selection
//! change through the payload they were handed. A change delivers
//! [`Deselect`](crate::capability::Capability::Deselect) to the old node and
//! [`Select`](crate::capability::Capability::Select) to the new one. While
//! those events are being delivered, further changes are refused with
//! [`SelectionError::Reentrant`].

use core::cell::{Cell, RefCell};

use crate::capability::Capability;
use crate::data::EventPayload;
use crate::dispatcher::dispatch;
use crate::error::SelectionError;
use crate::host::{NodeKey, SceneHost};

/// Current and previous selection plus the change-in-progress guard.
#[derive(Debug)]
pub struct Selection<K> {
    current: RefCell<Option<K>>,
    last: RefCell<Option<K>>,
    changing: Cell<bool>,
}

impl<K> Default for Selection<K> {
    fn default() -> Self {
        Self {
            current: RefCell::new(None),
            last: RefCell::new(None),
            changing: Cell::new(false),
        }
    }
}

impl<K: NodeKey> Selection<K> {
    /// Nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected node.
    pub fn current(&self) -> Option<K> {
        *self.current.borrow()
    }

    /// The node selected before the current one.
    pub fn last(&self) -> Option<K> {
        *self.last.borrow()
    }

    /// Returns `true` while select/deselect events are being delivered.
    pub fn is_changing(&self) -> bool {
        self.changing.get()
    }

    /// Select `node`, delivering deselect/select with `payload`.
    ///
    /// Selecting the current node again does nothing.
    pub fn set_selected(
        &self,
        host: &dyn SceneHost<K>,
        node: Option<K>,
        mut payload: EventPayload<'_, K>,
    ) -> Result<(), SelectionError> {
        if self.changing.get() {
            log::error!(
                "refusing selection of {node:?} while selection is already changing"
            );
            return Err(SelectionError::Reentrant);
        }
        let _guard = ChangeGuard::enter(&self.changing);

        let current = self.current();
        if node == current {
            return Ok(());
        }

        log::trace!("selection {current:?} -> {node:?}");
        *self.last.borrow_mut() = current;
        dispatch(host, current, Capability::Deselect, payload.reborrow());
        *self.current.borrow_mut() = node;
        dispatch(host, node, Capability::Select, payload);
        Ok(())
    }
}

struct ChangeGuard<'a>(&'a Cell<bool>);

impl<'a> ChangeGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for ChangeGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
