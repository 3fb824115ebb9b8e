// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection changes and the select/deselect events they deliver.

mod common;

use std::rc::Rc;

use common::{Recorder, attach, new_log};
use interactable_responder::capability::{Capability, CapabilitySet};
use interactable_responder::data::BaseData;
use interactable_responder::error::SelectionError;
use interactable_responder::scene::SceneTree;
use interactable_responder::selection::Selection;

const SELECTABLE: CapabilitySet = CapabilitySet::SELECT.union(CapabilitySet::DESELECT);

#[test]
fn change_delivers_deselect_then_select() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let a = tree.insert(None);
    let b = tree.insert(None);
    attach(&mut tree, a, SELECTABLE, Recorder::new(&log));
    attach(&mut tree, b, SELECTABLE, Recorder::new(&log));

    let selection = Rc::new(Selection::new());
    let mut data = BaseData::new(Rc::clone(&selection));
    data.set_selected(&tree, Some(a)).unwrap();
    data.set_selected(&tree, Some(b)).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            (Capability::Select, a),
            (Capability::Deselect, a),
            (Capability::Select, b),
        ]
    );
    assert_eq!(selection.current(), Some(b));
    assert_eq!(selection.last(), Some(a));
}

#[test]
fn selecting_current_node_again_is_silent() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let a = tree.insert(None);
    attach(&mut tree, a, SELECTABLE, Recorder::new(&log));

    let mut data = BaseData::new(Rc::new(Selection::new()));
    data.set_selected(&tree, Some(a)).unwrap();
    log.borrow_mut().clear();
    data.set_selected(&tree, Some(a)).unwrap();
    assert!(log.borrow().is_empty(), "no events for a repeated selection");
}

#[test]
fn clearing_selection_deselects() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let a = tree.insert(None);
    attach(&mut tree, a, SELECTABLE, Recorder::new(&log));

    let selection = Rc::new(Selection::new());
    let mut data = BaseData::new(Rc::clone(&selection));
    data.set_selected(&tree, Some(a)).unwrap();
    data.set_selected(&tree, None).unwrap();
    assert_eq!(log.borrow().last(), Some(&(Capability::Deselect, a)));
    assert_eq!(selection.current(), None);
}

#[test]
fn nested_change_from_select_handler_is_refused() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let a = tree.insert(None);
    let b = tree.insert(None);
    let mut greedy = Recorder::new(&log);
    greedy.select_on_select = Some(b);
    let greedy = attach(&mut tree, a, SELECTABLE, greedy);
    attach(&mut tree, b, SELECTABLE, Recorder::new(&log));

    let selection = Rc::new(Selection::new());
    let mut data = BaseData::new(Rc::clone(&selection));
    data.set_selected(&tree, Some(a)).unwrap();

    assert_eq!(
        greedy.borrow().nested_select,
        Some(Err(SelectionError::Reentrant))
    );
    assert_eq!(selection.current(), Some(a), "outer change wins");
    assert!(!selection.is_changing(), "guard released after the change");

    // The guard is released, so a later change goes through.
    greedy.borrow_mut().select_on_select = None;
    data.set_selected(&tree, Some(b)).unwrap();
    assert_eq!(selection.current(), Some(b));
}
