// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query results and their ordering.
//!
//! A [`QueryProvider`] turns a pointer into zero or more [`RaycastResult`]s.
//! Results from every active provider are merged and sorted with
//! [`sort_results`]. It first orders them with [`compare_results`]:
//!
//! 1. Higher provider priority first. Providers without a priority come after
//!    those with one.
//! 2. Nearer `distance` first.
//! 3. Lower `index` (position in the merged buffer) first.
//!
//! Priorities and distances are compared in bands of [`TOLERANCE`], so values
//! that differ by less than that usually fall through to the next key. Banding
//! keeps the comparison a total order. NaN priorities rank lowest and NaN
//! distances rank farthest.
//!
//! Then results whose providers share a root (and a priority band) are
//! reordered among the positions they already hold, higher `depth` first.
//! Results from other roots keep their place.
//!
//! ```
//! use interactable_responder::raycast::{sort_results, ProviderId, ProviderKey, RaycastResult};
//!
//! let near = ProviderKey::new(ProviderId::next()).with_priority(0.0);
//! let overlay = ProviderKey::new(ProviderId::next()).with_priority(1.0);
//!
//! let mut results = vec![
//!     RaycastResult::hit(1_u32, near, 2.0, 0),
//!     RaycastResult::hit(2_u32, overlay, 9.0, 0),
//! ];
//! sort_results(&mut results);
//! assert_eq!(results[0].target, Some(2));
//! ```

use alloc::vec::Vec;
use core::cmp::{Ordering, Reverse};
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use glam::Vec3;
use kurbo::Point;

use crate::data::PointerData;

/// Band width for priority and distance comparisons.
pub const TOLERANCE: f32 = 0.001;

/// Exact reciprocal of [`TOLERANCE`], so whole values start a band.
const BANDS_PER_UNIT: f32 = 1000.0;

/// Identity of a query provider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(u64);

static NEXT_PROVIDER_ID: AtomicU64 = AtomicU64::new(1);

impl ProviderId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        Self(NEXT_PROVIDER_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// How a provider identifies itself on the results it produces.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProviderKey {
    /// The provider itself.
    pub id: ProviderId,
    /// The outermost provider this one is nested in (itself when not nested).
    pub root: ProviderId,
    /// Rendering priority of the provider's view, if it has one. Higher is
    /// drawn later and sorts first.
    pub priority: Option<f32>,
}

impl ProviderKey {
    /// A root provider without a priority.
    pub fn new(id: ProviderId) -> Self {
        Self {
            id,
            root: id,
            priority: None,
        }
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Nest under `root`.
    pub fn with_root(mut self, root: ProviderId) -> Self {
        self.root = root;
        self
    }
}

/// One hit produced by a query provider.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastResult<K> {
    /// Node that was hit.
    pub target: Option<K>,
    /// Provider that produced the hit.
    pub provider: Option<ProviderKey>,
    /// Distance from the ray origin.
    pub distance: f32,
    /// Position of this hit in the merged buffer when it was produced.
    pub index: u32,
    /// Provider-specific ordering for hits at the same distance; higher first.
    pub depth: i32,
    /// World-space hit point.
    pub world_position: Vec3,
    /// World-space surface normal at the hit.
    pub world_normal: Vec3,
    /// Screen position the query was made from.
    pub screen_position: Point,
    /// Display the query was made on.
    pub display_index: u32,
}

impl<K> Default for RaycastResult<K> {
    fn default() -> Self {
        Self {
            target: None,
            provider: None,
            distance: 0.0,
            index: 0,
            depth: 0,
            world_position: Vec3::ZERO,
            world_normal: Vec3::Y,
            screen_position: Point::ZERO,
            display_index: 0,
        }
    }
}

impl<K> RaycastResult<K> {
    /// A result hitting `target` with the remaining fields defaulted.
    pub fn hit(target: K, provider: ProviderKey, distance: f32, index: u32) -> Self {
        Self {
            target: Some(target),
            provider: Some(provider),
            distance,
            index,
            ..Self::default()
        }
    }

    /// Returns `true` when both a target and a provider are present.
    pub fn is_valid(&self) -> bool {
        self.target.is_some() && self.provider.is_some()
    }

    /// Reset every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl<K: fmt::Debug> fmt::Display for RaycastResult<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(target), Some(provider)) = (&self.target, &self.provider) else {
            return Ok(());
        };
        writeln!(f, "target: {target:?}")?;
        writeln!(f, "provider: {:?}", provider.id)?;
        writeln!(f, "distance: {}", self.distance)?;
        writeln!(f, "index: {}", self.index)?;
        writeln!(f, "depth: {}", self.depth)?;
        writeln!(f, "world_normal: {}", self.world_normal)?;
        writeln!(f, "world_position: {}", self.world_position)?;
        write!(f, "screen_position: {:?}", self.screen_position)
    }
}

/// Total order used to merge results from every provider. See the module docs.
pub fn compare_results<K>(lhs: &RaycastResult<K>, rhs: &RaycastResult<K>) -> Ordering {
    let priority = |r: &RaycastResult<K>| priority_band(r.provider.and_then(|p| p.priority));
    priority(rhs)
        .cmp(&priority(lhs))
        .then_with(|| distance_band(lhs.distance).cmp(&distance_band(rhs.distance)))
        .then_with(|| lhs.index.cmp(&rhs.index))
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "saturating cast; bands past the i64 range merge, which keeps the order total"
)]
fn band(value: f32) -> i64 {
    (value * BANDS_PER_UNIT) as i64
}

fn priority_band(priority: Option<f32>) -> i64 {
    match priority {
        Some(p) if !p.is_nan() => band(p),
        _ => i64::MIN,
    }
}

fn distance_band(distance: f32) -> i64 {
    if distance.is_nan() {
        i64::MAX
    } else {
        band(distance)
    }
}

/// Results that are reordered by `depth` among themselves.
type DepthGroup = (ProviderId, i64);

fn depth_group<K>(result: &RaycastResult<K>) -> Option<DepthGroup> {
    result.provider.map(|p| (p.root, priority_band(p.priority)))
}

/// Sort with [`compare_results`], then order each root's results by depth.
///
/// Stable: results equal on every key keep their relative order.
pub fn sort_results<K: Copy>(results: &mut [RaycastResult<K>]) {
    results.sort_by(compare_results);

    let mut seen: Vec<DepthGroup> = Vec::new();
    let mut slots = Vec::new();
    let mut group = Vec::new();
    for start in 0..results.len() {
        let Some(key) = depth_group(&results[start]) else {
            continue;
        };
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);

        slots.clear();
        slots.extend((start..results.len()).filter(|&i| depth_group(&results[i]) == Some(key)));
        if slots.len() < 2 {
            continue;
        }
        group.clear();
        group.extend(slots.iter().map(|&i| results[i]));
        group.sort_by_key(|hit: &RaycastResult<K>| Reverse(hit.depth));
        for (&slot, hit) in slots.iter().zip(&group) {
            results[slot] = *hit;
        }
    }
}

/// First result with a target, or an empty result.
pub fn first_hit<K: Copy>(results: &[RaycastResult<K>]) -> RaycastResult<K> {
    results
        .iter()
        .find(|r| r.target.is_some())
        .copied()
        .unwrap_or_default()
}

/// A source of hits for a pointer.
pub trait QueryProvider<K> {
    /// Identity and priority stamped on produced results.
    fn key(&self) -> ProviderKey;

    /// Inactive providers are skipped.
    fn is_active(&self) -> bool {
        true
    }

    /// Append hits for `pointer` to `out`, stamping each with `index = out.len()`
    /// at the time it is pushed.
    fn raycast(&self, pointer: &PointerData<K>, out: &mut Vec<RaycastResult<K>>);
}
