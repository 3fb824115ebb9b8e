// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=interactable_event_state --heading-base-level=0

//! Interactable Event State: per-pointer interaction state for frame-driven input.
//!
//! This crate holds the small state machines that an input pipeline advances
//! once per frame. None of them know how events are delivered; they take the
//! node under the pointer (or raw positions and axes) and report what changed.
//!
//! - [`hover`]: Enter/exit/move transitions as the entered node changes
//! - [`click`]: Press target memory and consecutive-click counting
//! - [`drag`]: Screen- and world-space drag start thresholds
//! - [`press`]: Folding per-frame button samples into a transition
//! - [`navigation`]: Directional moves from axes, with held-key repeat
//!
//! ## Hover Tracking
//!
//! ```rust
//! use interactable_event_state::hover::{HoverEvent, HoverOptions, HoverState};
//!
//! // 1 -> 2 -> 3
//! let parent_of = |n: &u32| if *n > 1 { Some(n - 1) } else { None };
//! let mut hover = HoverState::new();
//!
//! let update = hover.update(Some(3), parent_of, HoverOptions::default());
//! assert_eq!(
//!     update.events,
//!     vec![HoverEvent::Enter(3), HoverEvent::Enter(2), HoverEvent::Enter(1)]
//! );
//! ```
//!
//! ## Click Counting
//!
//! ```rust
//! use interactable_event_state::click::ClickState;
//!
//! let mut clicks: ClickState<&str> = ClickState::new();
//! for now in [0.0, 0.2] {
//!     clicks.expire(now, 0.3);
//!     clicks.register_press(Some("button"), now, 0.3);
//!     clicks.set_press(None);
//! }
//! assert_eq!(clicks.count(), 2);
//! ```
//!
//! ## Features
//!
//! - `std` (default): Compile Kurbo and glam against the standard library
//! - `libm`: Use `libm` for float math in `no_std` builds
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod click;
pub mod drag;
pub mod hover;
pub mod navigation;
pub mod press;
