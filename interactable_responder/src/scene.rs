// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A minimal arena scene that implements [`SceneHost`].
//!
//! Nodes form a forest. Each node has an active flag and an ordered list of
//! attached components. Hosts with their own scene graph do not need this
//! type; it exists for tools, headless hosts and tests.

use alloc::vec::Vec;

use crate::host::{ComponentRef, ParentLookup, SceneHost};

/// Generational handle of a node in a [`SceneTree`].
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Stale ids never alias a different live node because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct SceneNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    active: bool,
    components: Vec<ComponentRef<NodeId>>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// Arena of nodes with components.
#[derive(Debug, Default)]
pub struct SceneTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl SceneTree {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an active node under `parent` (or as a root).
    ///
    /// A stale `parent` inserts a root.
    pub fn insert(&mut self, parent: Option<NodeId>) -> NodeId {
        let parent = parent.filter(|p| self.is_alive(*p));
        let node = SceneNode {
            parent,
            children: Vec::new(),
            active: true,
            components: Vec::new(),
        };
        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation += 1;
            slot.node = Some(node);
            NodeId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            NodeId::new(idx, 1)
        };
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.push(id);
        }
        id
    }

    /// Remove `id` and its whole subtree. Returns `false` for a stale id.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.node(id).map(|n| n.parent) else {
            return false;
        };
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|c| *c != id);
        }
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.slots.get_mut(next.idx()).and_then(|s| s.node.take()) {
                stack.extend(node.children);
                self.free.push(next.0);
            }
        }
        true
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Parent of a live node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children of a live node, in insertion order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Move `id` under `parent` (or make it a root).
    ///
    /// Refused when `id` is stale, or `parent` is stale or inside `id`'s subtree.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if let Some(p) = parent {
            let mut cursor = Some(p);
            while let Some(n) = cursor {
                if n == id || !self.is_alive(n) {
                    return false;
                }
                cursor = self.parent(n);
            }
        }
        if let Some(old) = self.parent(id).and_then(|p| self.node_mut(p)) {
            old.children.retain(|c| *c != id);
        }
        if let Some(new) = parent.and_then(|p| self.node_mut(p)) {
            new.children.push(id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = parent;
        }
        true
    }

    /// Set the node's own active flag.
    pub fn set_active(&mut self, id: NodeId, active: bool) {
        if let Some(node) = self.node_mut(id) {
            node.active = active;
        }
    }

    /// The node's own active flag, ignoring ancestors.
    pub fn is_active_self(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.active)
    }

    /// Attach a component. Returns `false` for a stale id.
    pub fn attach(&mut self, id: NodeId, component: ComponentRef<NodeId>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.components.push(component);
                true
            }
            None => false,
        }
    }

    /// Detach a component previously attached to `id`.
    pub fn detach(&mut self, id: NodeId, component: &ComponentRef<NodeId>) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let before = node.components.len();
        node.components.retain(|c| !c.ptr_eq(component));
        node.components.len() != before
    }

    /// Components attached to `id`, in attachment order.
    pub fn components(&self, id: NodeId) -> &[ComponentRef<NodeId>] {
        self.node(id).map(|n| n.components.as_slice()).unwrap_or(&[])
    }

    fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.node.as_mut())
    }
}

impl ParentLookup<NodeId> for SceneTree {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }
}

impl SceneHost<NodeId> for SceneTree {
    fn is_active_in_hierarchy(&self, node: &NodeId) -> bool {
        let mut cursor = Some(*node);
        while let Some(id) = cursor {
            match self.node(id) {
                Some(n) if n.active => cursor = n.parent,
                _ => return false,
            }
        }
        true
    }

    fn components_of(&self, node: &NodeId, out: &mut Vec<ComponentRef<NodeId>>) {
        out.extend(self.components(*node).iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_ids_go_stale_and_slots_are_reused() {
        let mut tree = SceneTree::new();
        let a = tree.insert(None);
        assert!(tree.remove(a), "live node removes");
        assert!(!tree.is_alive(a), "removed id is stale");
        let b = tree.insert(None);
        assert_ne!(a, b);
        assert!(tree.is_alive(b), "reused slot is live");
        assert!(!tree.remove(a), "stale id cannot remove");
    }

    #[test]
    fn remove_takes_the_subtree() {
        let mut tree = SceneTree::new();
        let root = tree.insert(None);
        let mid = tree.insert(Some(root));
        let leaf = tree.insert(Some(mid));
        tree.remove(mid);
        assert!(!tree.is_alive(leaf), "descendant removed with parent");
        assert!(tree.children(root).is_empty(), "parent forgets child");
    }

    #[test]
    fn inactive_ancestor_hides_descendants() {
        let mut tree = SceneTree::new();
        let root = tree.insert(None);
        let leaf = tree.insert(Some(root));
        assert!(tree.is_active_in_hierarchy(&leaf), "active by default");
        tree.set_active(root, false);
        assert!(!tree.is_active_in_hierarchy(&leaf), "ancestor inactive");
        assert!(tree.is_active_self(leaf), "own flag untouched");
    }

    #[test]
    fn set_parent_refuses_cycles() {
        let mut tree = SceneTree::new();
        let root = tree.insert(None);
        let leaf = tree.insert(Some(root));
        assert!(!tree.set_parent(root, Some(leaf)), "would create a cycle");
        let other = tree.insert(None);
        assert!(tree.set_parent(leaf, Some(other)), "plain reparent");
        assert_eq!(tree.parent(leaf), Some(other));
        assert!(tree.children(root).is_empty(), "old parent forgets child");
    }
}
