// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! None of these abort a dispatch. The dispatcher logs them and moves on to
//! the next component; they are surfaced as values so hosts and tests can
//! observe what went wrong.

use alloc::string::String;

use crate::capability::{Capability, PayloadKind};

/// Returned by a component handler to report that it could not handle an event.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    /// The handler ran but failed.
    #[error("handler failed: {0}")]
    Failed(String),
    /// The handler refused the event in its current state.
    #[error("handler rejected the event: {0}")]
    Rejected(String),
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

/// A problem delivering one event to one component.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The payload kind does not match what the capability expects.
    #[error("{capability} expects a {expected:?} payload, got {actual:?}")]
    PayloadMismatch {
        /// Capability being delivered.
        capability: Capability,
        /// Payload kind the handler takes.
        expected: PayloadKind,
        /// Payload kind that was supplied.
        actual: PayloadKind,
    },
    /// The handler returned an error.
    #[error(transparent)]
    Handler(#[from] HandlerError),
    /// The component was already running a handler further up the stack.
    #[error("{capability} delivered re-entrantly to a component that is still handling an event")]
    Reentrant {
        /// Capability being delivered.
        capability: Capability,
    },
    /// The handler panicked.
    #[error("handler for {capability} panicked: {message}")]
    Panicked {
        /// Capability being delivered.
        capability: Capability,
        /// Panic payload, if it was a string.
        message: String,
    },
}

/// Selection change refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// A selection change was requested while another one was delivering
    /// its select/deselect events.
    #[error("selection change requested while a selection change is in progress")]
    Reentrant,
}
