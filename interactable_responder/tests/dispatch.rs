// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delivery rules of the dispatcher against a `SceneTree` host.

mod common;

use std::rc::Rc;

use common::{Recorder, attach, new_log, nodes_for};
use interactable_responder::capability::{Capability, CapabilitySet};
use interactable_responder::data::{AxisData, BaseData, PointerData};
use interactable_responder::dispatcher::{
    can_handle, components_with_capability, dispatch, dispatch_up_hierarchy, nearest_handler,
};
use interactable_responder::scene::SceneTree;
use interactable_responder::selection::Selection;

fn pointer() -> PointerData<interactable_responder::scene::NodeId> {
    PointerData::new(Rc::new(Selection::new()), -1)
}

#[test]
fn dispatch_reaches_all_eligible_components_in_order() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let node = tree.insert(None);
    let first = attach(&mut tree, node, CapabilitySet::POINTER_CLICK, Recorder::new(&log));
    let _skipped = attach(&mut tree, node, CapabilitySet::POINTER_DOWN, Recorder::new(&log));
    let second = attach(&mut tree, node, CapabilitySet::POINTER_CLICK, Recorder::new(&log));

    let mut data = pointer();
    assert!(dispatch(&tree, Some(node), Capability::PointerClick, data.payload()));
    assert_eq!(first.borrow().received, 1);
    assert_eq!(second.borrow().received, 1);
    assert_eq!(log.borrow().len(), 2, "non-declaring component is skipped");
}

#[test]
fn dispatch_to_none_or_unhandled_node_returns_false() {
    let mut tree = SceneTree::new();
    let node = tree.insert(None);
    let mut data = pointer();
    assert!(!dispatch(&tree, None, Capability::PointerClick, data.payload()));
    assert!(!dispatch(&tree, Some(node), Capability::PointerClick, data.payload()));
}

#[test]
fn disabled_components_and_inactive_nodes_receive_nothing() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let root = tree.insert(None);
    let leaf = tree.insert(Some(root));
    let mut disabled = Recorder::new(&log);
    disabled.enabled = false;
    attach(&mut tree, root, CapabilitySet::SUBMIT, disabled);
    attach(&mut tree, leaf, CapabilitySet::SUBMIT, Recorder::new(&log));

    let mut data = BaseData::new(Rc::new(Selection::new()));
    assert!(!dispatch(&tree, Some(root), Capability::Submit, (&mut data).into()));

    tree.set_active(root, false);
    assert!(!can_handle(&tree, leaf, Capability::Submit), "ancestor inactive");
    assert!(components_with_capability(&tree, leaf, Capability::Submit).is_empty());
    assert!(log.borrow().is_empty(), "nothing delivered");
}

#[test]
fn bubbling_stops_at_first_handler() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let root = tree.insert(None);
    let mid = tree.insert(Some(root));
    let leaf = tree.insert(Some(mid));
    attach(&mut tree, root, CapabilitySet::DROP, Recorder::new(&log));
    attach(&mut tree, mid, CapabilitySet::DROP, Recorder::new(&log));

    let mut data = pointer();
    let handled = dispatch_up_hierarchy(&tree, Some(leaf), Capability::Drop, data.payload());
    assert_eq!(handled, Some(mid));
    assert_eq!(nodes_for(&log, Capability::Drop), vec![mid]);
    assert_eq!(nearest_handler(&tree, Some(leaf), Capability::Drop), Some(mid));
    assert_eq!(nearest_handler(&tree, Some(leaf), Capability::Scroll), None);
}

#[test]
fn failing_handler_does_not_block_siblings() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let node = tree.insert(None);
    let mut failing = Recorder::new(&log);
    failing.fail_on = Some(Capability::PointerUp);
    attach(&mut tree, node, CapabilitySet::POINTER_UP, failing);
    let after = attach(&mut tree, node, CapabilitySet::POINTER_UP, Recorder::new(&log));

    let mut data = pointer();
    assert!(dispatch(&tree, Some(node), Capability::PointerUp, data.payload()));
    assert_eq!(after.borrow().received, 1, "later component still runs");
}

#[test]
fn panicking_handler_is_isolated() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let node = tree.insert(None);
    let mut panicking = Recorder::new(&log);
    panicking.panic_on = Some(Capability::PointerUp);
    let first = attach(&mut tree, node, CapabilitySet::POINTER_UP, panicking);
    let after = attach(&mut tree, node, CapabilitySet::POINTER_UP, Recorder::new(&log));

    let mut data = pointer();
    assert!(dispatch(&tree, Some(node), Capability::PointerUp, data.payload()));
    assert_eq!(after.borrow().received, 1, "later component still runs");
    assert!(first.try_borrow_mut().is_ok(), "panicking component is released");
}

#[test]
fn reentrant_delivery_skips_the_busy_component() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let node = tree.insert(None);
    let mut reentering = Recorder::new(&log);
    reentering.redispatch_on_down = true;
    let busy = attach(&mut tree, node, CapabilitySet::POINTER_DOWN, reentering);
    let other = attach(&mut tree, node, CapabilitySet::POINTER_DOWN, Recorder::new(&log));

    let mut data = pointer();
    dispatch(&tree, Some(node), Capability::PointerDown, data.payload());
    assert_eq!(busy.borrow().received, 1, "busy component is not re-entered");
    assert_eq!(other.borrow().received, 2, "other component sees both deliveries");
}

#[test]
fn payload_mismatch_is_skipped() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let node = tree.insert(None);
    let recorder = attach(&mut tree, node, CapabilitySet::MOVE, Recorder::new(&log));

    let mut base = BaseData::new(Rc::new(Selection::new()));
    assert!(
        dispatch(&tree, Some(node), Capability::Move, (&mut base).into()),
        "eligible component counts even when skipped"
    );
    assert_eq!(recorder.borrow().received, 0);

    let mut axis = AxisData::new(Rc::new(Selection::new()));
    dispatch(&tree, Some(node), Capability::Move, (&mut axis).into());
    assert_eq!(recorder.borrow().received, 1);
}

#[test]
fn base_capabilities_accept_pointer_payloads() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let node = tree.insert(None);
    let mut marking = Recorder::new(&log);
    marking.use_on = CapabilitySet::SUBMIT;
    attach(&mut tree, node, CapabilitySet::SUBMIT, marking);

    let mut data = pointer();
    dispatch(&tree, Some(node), Capability::Submit, data.payload());
    assert!(data.base.used(), "handler marked the pointer payload used");
}

#[test]
fn components_attached_during_dispatch_wait_for_next_dispatch() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let node = tree.insert(None);
    attach(&mut tree, node, CapabilitySet::SCROLL, Recorder::new(&log));
    let snapshot = components_with_capability(&tree, node, Capability::Scroll);
    attach(&mut tree, node, CapabilitySet::SCROLL, Recorder::new(&log));
    assert_eq!(snapshot.len(), 1, "snapshot is unaffected by later attach");
    assert_eq!(
        components_with_capability(&tree, node, Capability::Scroll).len(),
        2
    );
}
