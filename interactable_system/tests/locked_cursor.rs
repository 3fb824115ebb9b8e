// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-centre pointer, cursor side effects and world-space drags of the
//! locked-cursor module.

mod common;

use std::rc::Rc;

use common::{FRAME, FakeInput, Recorder, Regions, attach, new_log, nodes_for, without_hover};
use glam::Vec3;
use interactable_responder::capability::{Capability, CapabilitySet};
use interactable_responder::raycast::QueryProvider;
use interactable_responder::scene::{NodeId, SceneTree};
use interactable_responder::selection::Selection;
use interactable_system::config::{ContextConfig, LockedCursorConfig};
use interactable_system::context::InteractionContext;
use interactable_system::input::{CursorControl, CursorLockMode, CursorState, InputSampler};
use interactable_system::locked_cursor::LockedCursorModule;
use interactable_system::module::{InputModule, ModuleCx};
use kurbo::Rect;

struct Rig {
    tree: SceneTree,
    input: Rc<FakeInput>,
    cursor: Rc<CursorState>,
    regions: Rc<Regions>,
    ctx: InteractionContext<NodeId>,
}

impl Rig {
    fn new(tree: SceneTree) -> Self {
        let input = FakeInput::new();
        input.time.set(10.0);
        let cursor = Rc::new(CursorState::new());
        let regions = Regions::new();
        let sampler: Rc<dyn InputSampler> = input.clone();
        let control: Rc<dyn CursorControl> = cursor.clone();

        let mut ctx = InteractionContext::new(ContextConfig::default().with_drag_threshold(10.0));
        ctx.add_provider(regions.clone());
        ctx.attach_module(Box::new(LockedCursorModule::new(
            sampler,
            control,
            LockedCursorConfig::default(),
        )));
        let mut rig = Self {
            tree,
            input,
            cursor,
            regions,
            ctx,
        };
        rig.ctx.activate(&rig.tree);
        rig.frame();
        rig
    }

    fn frame(&mut self) {
        self.ctx.process(&self.tree);
        self.input.advance(FRAME);
    }
}

#[test]
fn taking_over_locks_and_hides_the_cursor() {
    let rig = Rig::new(SceneTree::new());
    assert!(rig.ctx.current_module().is_some());
    assert_eq!(rig.cursor.lock_state(), CursorLockMode::Locked);
    assert!(!rig.cursor.is_visible());

    let mut rig = rig;
    rig.ctx.deactivate(&rig.tree);
    assert_eq!(rig.cursor.lock_state(), CursorLockMode::None);
    assert!(rig.cursor.is_visible());
}

#[test]
fn pointer_sits_at_the_screen_centre() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let centre = tree.insert(None);
    let corner = tree.insert(None);
    for node in [centre, corner] {
        attach(&mut tree, node, CapabilitySet::POINTER_ENTER, Recorder::new(&log));
    }
    let mut rig = Rig::new(tree);
    rig.regions.add(Rect::new(390.0, 290.0, 410.0, 310.0), centre, 1.0);
    rig.regions.add(Rect::new(0.0, 0.0, 20.0, 20.0), corner, 1.0);

    rig.input.move_mouse(10.0, 10.0);
    rig.frame();
    assert_eq!(nodes_for(&log, Capability::PointerEnter), vec![centre]);
}

#[test]
fn drag_follows_world_distance_and_repeats_while_held() {
    let log = new_log();
    let mut tree = SceneTree::new();
    let lever = tree.insert(None);
    let caps = CapabilitySet::POINTER_DOWN | CapabilitySet::POINTER_UP | CapabilitySet::DRAG_LIFECYCLE;
    attach(&mut tree, lever, caps, Recorder::new(&log));
    let mut rig = Rig::new(tree);
    rig.regions.add(Rect::new(0.0, 0.0, 800.0, 600.0), lever, 1.0);

    rig.input.press(0);
    rig.frame();
    assert_eq!(
        without_hover(&log),
        vec![
            (Capability::PointerDown, lever),
            (Capability::InitializePotentialDrag, lever),
        ]
    );

    // 10 px at the default multiplier is 0.1 world units.
    log.borrow_mut().clear();
    rig.regions.world.set(Vec3::new(0.05, 0.0, 0.0));
    rig.frame();
    assert!(without_hover(&log).is_empty(), "below the world threshold");

    rig.regions.world.set(Vec3::new(0.5, 0.0, 0.0));
    rig.frame();
    assert_eq!(
        without_hover(&log),
        vec![(Capability::BeginDrag, lever), (Capability::Drag, lever)]
    );

    log.borrow_mut().clear();
    rig.frame();
    assert_eq!(without_hover(&log), vec![(Capability::Drag, lever)], "drags every frame");

    log.borrow_mut().clear();
    rig.input.release(0);
    rig.frame();
    assert_eq!(
        without_hover(&log),
        vec![(Capability::PointerUp, lever), (Capability::EndDrag, lever)]
    );
}

#[test]
fn module_formats_its_pointer_records() {
    let mut tree = SceneTree::new();
    let node = tree.insert(None);
    let regions = Regions::new();
    regions.add(Rect::new(0.0, 0.0, 800.0, 600.0), node, 1.0);
    let provider: Rc<dyn QueryProvider<NodeId>> = regions;
    let providers = [provider];
    let selection = Rc::new(Selection::new());
    let config = ContextConfig::default();
    let cx = ModuleCx::new(&tree, &selection, &providers, &config, true);

    let mut module: LockedCursorModule<NodeId> =
        LockedCursorModule::new(FakeInput::new(), Rc::new(CursorState::new()), LockedCursorConfig::default());
    module.activate(&cx);
    module.process(&cx);

    let shown = format!("{module}");
    assert!(shown.starts_with("LockedCursorModule"));
    assert!(shown.contains(&format!("pointer_enter: Some({node:?})")), "{shown}");
    assert!(format!("{module:?}").starts_with("LockedCursorModule"));
    assert!(format!("{selection:?}").contains("current"));
}
