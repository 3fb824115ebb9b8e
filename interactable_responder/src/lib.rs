// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=interactable_responder --heading-base-level=0

//! Interactable Responder: capability-based event delivery to scene components.
//!
//! ## Overview
//!
//! Scene nodes carry components. Each component is registered with the set of
//! [`Capability`](crate::capability::Capability) values it handles, and
//! implements the matching handlers of [`Component`](crate::component::Component).
//! The [`dispatcher`] delivers one capability to a node's eligible components,
//! or bubbles it up to the nearest ancestor that has one.
//!
//! This crate does not sample input or decide which node is under a pointer.
//! Input modules (see `interactable_system`) do that and use this crate to
//! deliver the resulting events.
//!
//! ## Pieces
//!
//! - [`host`]: the [`SceneHost`](crate::host::SceneHost) seam and component handles
//! - [`component`]: the handler trait and per-invocation context
//! - [`dispatcher`]: `dispatch`, `dispatch_up_hierarchy`, `nearest_handler`
//! - [`data`]: payloads ([`PointerData`](crate::data::PointerData) and friends)
//! - [`selection`]: the selected node, changed with select/deselect delivery
//! - [`raycast`]: query results, providers and their merge order
//! - [`scene`]: a small arena scene that implements `SceneHost`
//!
//! ## Fault isolation
//!
//! One misbehaving component never stops delivery to the others. Handler
//! errors, payload mismatches and re-entrant delivery are logged through the
//! `log` facade and skipped. With the `std` feature, panics inside handlers
//! are caught as well.
//!
//! ## Features
//!
//! - `std` (default): Catch handler panics; compile dependencies against `std`
//! - `libm`: Use `libm` for float math in `no_std` builds
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod capability;
pub mod component;
pub mod data;
pub mod dispatcher;
pub mod error;
pub mod host;
pub mod raycast;
pub mod scene;
pub mod selection;
