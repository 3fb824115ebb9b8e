// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover state helper: compute enter/exit/move transitions as the pointer's
//! entered node changes.
//!
//! ## Usage
//!
//! 1) Each frame, resolve the node under the pointer (or `None`).
//! 2) Call [`HoverState::update`] with that node, a parent lookup for your
//!    hierarchy and the frame's [`HoverOptions`].
//! 3) Deliver the returned [`HoverEvent`]s in order.
//!
//! Exits are produced from the previously entered node up to (but excluding)
//! the common ancestor of the old and new nodes; enters are produced from the
//! new node up to the same ancestor. When the pointer moves back onto an
//! ancestor that was already hovered, no enter is produced and
//! [`HoverUpdate::reentered`] is set instead.
//!
//! Ancestor chains are captured once at the start of each update, so handlers
//! that reshape the hierarchy while events are delivered only affect the next
//! update.
//!
//! ## Minimal example
//!
//! ```
//! use interactable_event_state::hover::{HoverEvent, HoverOptions, HoverState};
//!
//! // 1 is the root, 2 and 3 are its children.
//! let parent_of = |n: &u32| match *n {
//!     2 | 3 => Some(1),
//!     _ => None,
//! };
//! let opts = HoverOptions::default();
//!
//! let mut hover = HoverState::new();
//! let update = hover.update(Some(2), parent_of, opts);
//! assert_eq!(update.events, vec![HoverEvent::Enter(2), HoverEvent::Enter(1)]);
//!
//! // Sibling move: leave 2, enter 3, the shared root is untouched.
//! let update = hover.update(Some(3), parent_of, opts);
//! assert_eq!(
//!     update.events,
//!     vec![
//!         HoverEvent::Exit { node: 2, fully_exited: true },
//!         HoverEvent::Enter(3),
//!     ]
//! );
//! assert_eq!(hover.hovered(), &[1, 3]);
//! ```

use alloc::vec::Vec;
use smallvec::SmallVec;

/// Inline capacity for ancestor chains before spilling to the heap.
const CHAIN_INLINE: usize = 16;

type Chain<K> = SmallVec<[K; CHAIN_INLINE]>;

/// A single hover transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer moved while over this node.
    Move(K),
    /// The pointer entered this node.
    Enter(K),
    /// The pointer left this node.
    Exit {
        /// The node being left.
        node: K,
        /// `true` when the pointer is no longer over the node or any of its
        /// descendants.
        fully_exited: bool,
    },
}

/// Per-update knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoverOptions {
    /// The pointer moved this frame; move events go to hovered nodes.
    pub moved: bool,
    /// Walk enter/exit up through ancestors. When `false` only the entered
    /// node itself receives enter and exit.
    pub propagate_to_parent: bool,
}

impl Default for HoverOptions {
    fn default() -> Self {
        Self {
            moved: false,
            propagate_to_parent: true,
        }
    }
}

/// Result of one [`HoverState::update`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverUpdate<K> {
    /// Transitions in delivery order.
    pub events: Vec<HoverEvent<K>>,
    /// The new node was an already-hovered ancestor of the old one.
    pub reentered: bool,
}

impl<K> Default for HoverUpdate<K> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            reentered: false,
        }
    }
}

/// Tracks the entered node and every node currently considered hovered.
#[derive(Clone, Debug)]
pub struct HoverState<K> {
    entered: Option<K>,
    hovered: Vec<K>,
}

impl<K> Default for HoverState<K> {
    fn default() -> Self {
        Self {
            entered: None,
            hovered: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq> HoverState<K> {
    /// Create an empty hover state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently entered node.
    pub fn entered(&self) -> Option<K> {
        self.entered
    }

    /// All nodes currently hovered, in the order they were entered.
    pub fn hovered(&self) -> &[K] {
        &self.hovered
    }

    /// Returns `true` if `node` is in the hovered set.
    pub fn is_hovering(&self, node: &K) -> bool {
        self.hovered.contains(node)
    }

    /// Overwrite the entered node without producing transitions.
    ///
    /// Used when one pointer record mirrors another.
    pub fn set_entered(&mut self, node: Option<K>) {
        self.entered = node;
    }

    /// Forget the entered node, returning it. The hovered set is kept.
    pub fn take_entered(&mut self) -> Option<K> {
        self.entered.take()
    }

    /// Drop all hover state, returning exits for everything that was hovered.
    pub fn clear(&mut self) -> Vec<HoverEvent<K>> {
        self.entered = None;
        self.hovered
            .drain(..)
            .map(|node| HoverEvent::Exit {
                node,
                fully_exited: true,
            })
            .collect()
    }

    /// Move the entered node to `target` and compute the resulting transitions.
    ///
    /// Order of the produced events:
    /// 1. `Move` for every hovered node if [`HoverOptions::moved`].
    /// 2. When either the old or new node is absent, `Exit` for every hovered node.
    /// 3. `Exit` from the old node up to the common ancestor (exclusive).
    /// 4. `Enter` (and `Move` if moved) from the new node up to the common
    ///    ancestor (exclusive).
    pub fn update<F>(
        &mut self,
        target: Option<K>,
        mut parent_of: F,
        options: HoverOptions,
    ) -> HoverUpdate<K>
    where
        F: FnMut(&K) -> Option<K>,
    {
        let mut out = HoverUpdate::default();

        if options.moved {
            out.events
                .extend(self.hovered.iter().map(|&node| HoverEvent::Move(node)));
        }

        if target.is_none() || self.entered.is_none() {
            out.events.extend(self.hovered.drain(..).map(|node| HoverEvent::Exit {
                node,
                fully_exited: true,
            }));
        }

        let Some(new) = target else {
            self.entered = None;
            return out;
        };
        if self.entered == Some(new) {
            return out;
        }

        let new_chain = ancestor_chain(new, &mut parent_of);
        let old = self.entered;
        let old_chain = old.map(|old| ancestor_chain(old, &mut parent_of));
        let common = old_chain
            .as_ref()
            .and_then(|chain| chain.iter().find(|n| new_chain.contains(n)).copied());

        if let Some(old_chain) = old_chain {
            for &node in old_chain.iter() {
                if Some(node) == common {
                    break;
                }
                out.events.push(HoverEvent::Exit {
                    node,
                    fully_exited: true,
                });
                if let Some(pos) = self.hovered.iter().position(|h| *h == node) {
                    self.hovered.remove(pos);
                }
                if !options.propagate_to_parent {
                    break;
                }
            }
        }

        self.entered = Some(new);

        for (depth, &node) in new_chain.iter().enumerate() {
            if depth > 0 && Some(node) == common {
                break;
            }
            if Some(node) == common && Some(node) != old {
                out.reentered = true;
                break;
            }
            out.events.push(HoverEvent::Enter(node));
            if options.moved {
                out.events.push(HoverEvent::Move(node));
            }
            self.hovered.push(node);
            if !options.propagate_to_parent {
                break;
            }
        }

        out
    }
}

/// Find the nearest node that is an ancestor-or-self of both `a` and `b`.
///
/// Returns `None` when the two nodes live in disjoint hierarchies.
pub fn common_ancestor<K, F>(a: K, b: K, mut parent_of: F) -> Option<K>
where
    K: Copy + PartialEq,
    F: FnMut(&K) -> Option<K>,
{
    let b_chain = ancestor_chain(b, &mut parent_of);
    let mut cursor = Some(a);
    while let Some(node) = cursor {
        if b_chain.contains(&node) {
            return Some(node);
        }
        cursor = parent_of(&node);
    }
    None
}

fn ancestor_chain<K: Copy, F: FnMut(&K) -> Option<K>>(start: K, parent_of: &mut F) -> Chain<K> {
    let mut chain = Chain::new();
    let mut cursor = Some(start);
    while let Some(node) = cursor {
        chain.push(node);
        cursor = parent_of(&node);
    }
    chain
}
