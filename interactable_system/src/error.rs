// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by host-facing operations.

use crate::registry::ContextId;

/// Failures of [`ContextRegistry`](crate::registry::ContextRegistry) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The id does not name a registered context.
    #[error("context {0:?} is not registered")]
    UnknownContext(ContextId),
}
