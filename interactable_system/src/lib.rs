// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=interactable_system --heading-base-level=0

//! Interactable System: input modules, interaction contexts and their registry.
//!
//! ## Overview
//!
//! Every frame the host calls [`ContextRegistry::tick`](crate::registry::ContextRegistry::tick).
//! The registry picks one [`InteractionContext`](crate::context::InteractionContext)
//! to run. The context ticks its [`InputModule`](crate::module::InputModule)s,
//! picks the authoritative one and lets it process the frame. A module samples
//! raw input through an [`InputSampler`](crate::input::InputSampler), asks the
//! context's query providers which node is under each pointer, and delivers
//! events with `interactable_responder`.
//!
//! Two modules ship with the crate:
//!
//! - [`FreeCursorModule`](crate::free_cursor::FreeCursorModule): mouse, touch
//!   and keyboard/controller navigation for UI-style interaction
//! - [`LockedCursorModule`](crate::locked_cursor::LockedCursorModule): a
//!   screen-centre pointer with the cursor locked, for first-person views
//!
//! Two query providers ship as well, both driven by a host
//! [`GeometryQuery`](crate::raycaster::GeometryQuery):
//! [`CursorRaycaster`](crate::raycaster::CursorRaycaster) casts through the
//! pointer position and
//! [`CameraForwardRaycaster`](crate::raycaster::CameraForwardRaycaster) casts
//! along the camera's forward axis.
//!
//! ## Example
//!
//! ```rust
//! use interactable_responder::scene::SceneTree;
//! use interactable_system::config::ContextConfig;
//! use interactable_system::context::InteractionContext;
//! use interactable_system::registry::ContextRegistry;
//!
//! let mut tree = SceneTree::new();
//! let menu = tree.insert(None);
//!
//! let mut registry = ContextRegistry::new();
//! let id = registry.register(InteractionContext::new(
//!     ContextConfig::default().with_first_selected(Some(menu)),
//! ));
//!
//! registry.tick(&tree);
//! assert_eq!(registry.active(), Some(id));
//! assert_eq!(registry.get(id).and_then(|ctx| ctx.current_selected()), Some(menu));
//! ```
//!
//! ## Features
//!
//! - `std` (default): Compile dependencies against `std`
//! - `libm`: Use `libm` for float math in `no_std` builds
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod context;
pub mod error;
pub mod free_cursor;
pub mod input;
pub mod locked_cursor;
pub mod module;
mod pointer;
pub mod raycaster;
pub mod registry;

pub use pointer::{MOUSE_LEFT_ID, MOUSE_MIDDLE_ID, MOUSE_RIGHT_ID};
