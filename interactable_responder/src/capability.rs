// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event capabilities a component can declare.
//!
//! Every deliverable event kind is a [`Capability`]. A component is registered
//! together with a [`CapabilitySet`]; the dispatcher only considers components
//! whose set contains the capability being delivered.
//!
//! ```
//! use interactable_responder::capability::{Capability, CapabilitySet, PayloadKind};
//!
//! let set = CapabilitySet::POINTER_CLICK | CapabilitySet::SELECT;
//! assert!(set.supports(Capability::PointerClick));
//! assert!(!set.supports(Capability::Drag));
//! assert_eq!(Capability::Move.payload(), PayloadKind::Axis);
//! ```

use core::fmt;

bitflags::bitflags! {
    /// A set of [`Capability`] values.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CapabilitySet: u32 {
        /// [`Capability::PointerEnter`].
        const POINTER_ENTER = 1 << 0;
        /// [`Capability::PointerExit`].
        const POINTER_EXIT = 1 << 1;
        /// [`Capability::PointerDown`].
        const POINTER_DOWN = 1 << 2;
        /// [`Capability::PointerUp`].
        const POINTER_UP = 1 << 3;
        /// [`Capability::PointerClick`].
        const POINTER_CLICK = 1 << 4;
        /// [`Capability::PointerMove`].
        const POINTER_MOVE = 1 << 5;
        /// [`Capability::InitializePotentialDrag`].
        const INITIALIZE_POTENTIAL_DRAG = 1 << 6;
        /// [`Capability::BeginDrag`].
        const BEGIN_DRAG = 1 << 7;
        /// [`Capability::Drag`].
        const DRAG = 1 << 8;
        /// [`Capability::EndDrag`].
        const END_DRAG = 1 << 9;
        /// [`Capability::Drop`].
        const DROP = 1 << 10;
        /// [`Capability::Scroll`].
        const SCROLL = 1 << 11;
        /// [`Capability::UpdateSelected`].
        const UPDATE_SELECTED = 1 << 12;
        /// [`Capability::Select`].
        const SELECT = 1 << 13;
        /// [`Capability::Deselect`].
        const DESELECT = 1 << 14;
        /// [`Capability::Move`].
        const MOVE = 1 << 15;
        /// [`Capability::Submit`].
        const SUBMIT = 1 << 16;
        /// [`Capability::Cancel`].
        const CANCEL = 1 << 17;

        /// Hover transitions and pointer motion.
        const HOVER = Self::POINTER_ENTER.bits() | Self::POINTER_EXIT.bits() | Self::POINTER_MOVE.bits();
        /// The drag source lifecycle. Drop targets declare [`Self::DROP`] separately.
        const DRAG_LIFECYCLE = Self::INITIALIZE_POTENTIAL_DRAG.bits()
            | Self::BEGIN_DRAG.bits()
            | Self::DRAG.bits()
            | Self::END_DRAG.bits();
    }
}

impl CapabilitySet {
    /// Returns `true` if `capability` is in the set.
    pub fn supports(self, capability: Capability) -> bool {
        self.contains(capability.flag())
    }
}

impl From<Capability> for CapabilitySet {
    fn from(capability: Capability) -> Self {
        capability.flag()
    }
}

/// The payload type a capability's handler receives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// [`BaseData`](crate::data::BaseData): selection lifecycle and submit/cancel.
    Base,
    /// [`PointerData`](crate::data::PointerData): everything pointer driven.
    Pointer,
    /// [`AxisData`](crate::data::AxisData): directional navigation.
    Axis,
}

/// A deliverable event kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The pointer started hovering the node or one of its descendants.
    PointerEnter,
    /// The pointer stopped hovering the node.
    PointerExit,
    /// A press landed on the node.
    PointerDown,
    /// The press that landed on the node was released.
    PointerUp,
    /// Press and release both resolved to the node.
    PointerClick,
    /// The pointer moved while hovering the node.
    PointerMove,
    /// A press found a drag candidate; sent before any threshold check.
    InitializePotentialDrag,
    /// The pointer crossed the drag threshold.
    BeginDrag,
    /// The pointer moved during a drag.
    Drag,
    /// The drag ended.
    EndDrag,
    /// A drag was released over the node.
    Drop,
    /// Scroll input while over the node.
    Scroll,
    /// Sent to the selected node every frame.
    UpdateSelected,
    /// The node became selected.
    Select,
    /// The node stopped being selected.
    Deselect,
    /// Directional navigation while selected.
    Move,
    /// The submit button went down while selected.
    Submit,
    /// The cancel button went down while selected.
    Cancel,
}

impl Capability {
    /// Every capability, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::PointerEnter,
        Self::PointerExit,
        Self::PointerDown,
        Self::PointerUp,
        Self::PointerClick,
        Self::PointerMove,
        Self::InitializePotentialDrag,
        Self::BeginDrag,
        Self::Drag,
        Self::EndDrag,
        Self::Drop,
        Self::Scroll,
        Self::UpdateSelected,
        Self::Select,
        Self::Deselect,
        Self::Move,
        Self::Submit,
        Self::Cancel,
    ];

    /// The single-bit set for this capability.
    pub fn flag(self) -> CapabilitySet {
        match self {
            Self::PointerEnter => CapabilitySet::POINTER_ENTER,
            Self::PointerExit => CapabilitySet::POINTER_EXIT,
            Self::PointerDown => CapabilitySet::POINTER_DOWN,
            Self::PointerUp => CapabilitySet::POINTER_UP,
            Self::PointerClick => CapabilitySet::POINTER_CLICK,
            Self::PointerMove => CapabilitySet::POINTER_MOVE,
            Self::InitializePotentialDrag => CapabilitySet::INITIALIZE_POTENTIAL_DRAG,
            Self::BeginDrag => CapabilitySet::BEGIN_DRAG,
            Self::Drag => CapabilitySet::DRAG,
            Self::EndDrag => CapabilitySet::END_DRAG,
            Self::Drop => CapabilitySet::DROP,
            Self::Scroll => CapabilitySet::SCROLL,
            Self::UpdateSelected => CapabilitySet::UPDATE_SELECTED,
            Self::Select => CapabilitySet::SELECT,
            Self::Deselect => CapabilitySet::DESELECT,
            Self::Move => CapabilitySet::MOVE,
            Self::Submit => CapabilitySet::SUBMIT,
            Self::Cancel => CapabilitySet::CANCEL,
        }
    }

    /// The payload this capability's handler expects.
    pub fn payload(self) -> PayloadKind {
        match self {
            Self::UpdateSelected | Self::Select | Self::Deselect | Self::Submit | Self::Cancel => {
                PayloadKind::Base
            }
            Self::Move => PayloadKind::Axis,
            _ => PayloadKind::Pointer,
        }
    }

    /// Stable name, used in log output.
    pub fn name(self) -> &'static str {
        match self {
            Self::PointerEnter => "PointerEnter",
            Self::PointerExit => "PointerExit",
            Self::PointerDown => "PointerDown",
            Self::PointerUp => "PointerUp",
            Self::PointerClick => "PointerClick",
            Self::PointerMove => "PointerMove",
            Self::InitializePotentialDrag => "InitializePotentialDrag",
            Self::BeginDrag => "BeginDrag",
            Self::Drag => "Drag",
            Self::EndDrag => "EndDrag",
            Self::Drop => "Drop",
            Self::Scroll => "Scroll",
            Self::UpdateSelected => "UpdateSelected",
            Self::Select => "Select",
            Self::Deselect => "Deselect",
            Self::Move => "Move",
            Self::Submit => "Submit",
            Self::Cancel => "Cancel",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_capability_has_a_distinct_bit() {
        let mut seen = CapabilitySet::empty();
        for capability in Capability::ALL {
            let flag = capability.flag();
            assert_eq!(flag.bits().count_ones(), 1, "{capability} must be one bit");
            assert!(!seen.intersects(flag), "{capability} reuses a bit");
            seen |= flag;
        }
        assert_eq!(seen, CapabilitySet::all());
    }

    #[test]
    fn payload_kinds_follow_event_family() {
        assert_eq!(Capability::Select.payload(), PayloadKind::Base);
        assert_eq!(Capability::Cancel.payload(), PayloadKind::Base);
        assert_eq!(Capability::Move.payload(), PayloadKind::Axis);
        assert_eq!(Capability::Drop.payload(), PayloadKind::Pointer);
        assert_eq!(Capability::Scroll.payload(), PayloadKind::Pointer);
    }

    #[test]
    fn composite_sets_cover_their_members() {
        assert!(CapabilitySet::HOVER.supports(Capability::PointerMove));
        assert!(CapabilitySet::DRAG_LIFECYCLE.supports(Capability::EndDrag));
        assert!(!CapabilitySet::DRAG_LIFECYCLE.supports(Capability::Drop));
    }
}
