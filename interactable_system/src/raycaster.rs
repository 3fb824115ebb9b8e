// Copyright 2025 the Interactable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query providers that build a ray from a [`Camera`] and hand the
//! intersection test to a [`GeometryQuery`].
//!
//! - [`CursorRaycaster`] casts through the pointer's screen position.
//! - [`CameraForwardRaycaster`] casts along the camera's forward axis,
//!   ignoring the pointer position.
//!
//! Both sort the geometry hits by distance, drop trigger hits unless allowed,
//! cap the count and append results stamped with the provider's key and the
//! camera priority.
//!
//! ```
//! use std::rc::Rc;
//!
//! use glam::{Mat4, Vec3};
//! use interactable_responder::data::PointerData;
//! use interactable_responder::raycast::QueryProvider;
//! use interactable_responder::selection::Selection;
//! use interactable_system::config::RaycasterConfig;
//! use interactable_system::raycaster::{Camera, CursorRaycaster, GeometryHit, GeometryQuery, Ray};
//! use kurbo::{Point, Rect};
//!
//! // Everything is a wall at distance 3.
//! struct Wall;
//! impl GeometryQuery<u32> for Wall {
//!     fn intersect(&self, ray: &Ray, max: f32, _mask: u32, out: &mut Vec<GeometryHit<u32>>) {
//!         if max >= 3.0 {
//!             out.push(GeometryHit::new(7, 3.0, ray.at(3.0)));
//!         }
//!     }
//! }
//!
//! let camera = Camera::new(Mat4::IDENTITY, Rect::new(0.0, 0.0, 100.0, 100.0));
//! let raycaster: CursorRaycaster<u32> =
//!     CursorRaycaster::new(camera, Rc::new(Wall), RaycasterConfig::default());
//! let mut pointer = PointerData::new(Rc::new(Selection::new()), -1);
//! pointer.position = Point::new(50.0, 50.0);
//!
//! let mut out = Vec::new();
//! raycaster.raycast(&pointer, &mut out);
//! assert_eq!(out[0].target, Some(7));
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use glam::{Mat4, Vec3};
use interactable_responder::data::PointerData;
use interactable_responder::raycast::{ProviderId, ProviderKey, QueryProvider, RaycastResult};
use kurbo::{Point, Rect};

use crate::config::RaycasterConfig;

/// A half-line in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// The point `distance` along the ray.
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// View parameters needed to build rays.
///
/// `view_projection` maps world space to clip space with depth in `0..=1`,
/// as produced by glam's `perspective_*` and `orthographic_*` constructors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// World to clip transform.
    pub view_projection: Mat4,
    /// World-space eye position.
    pub position: Vec3,
    /// World-space unit view direction.
    pub forward: Vec3,
    /// Screen area the camera renders to, in pixels, y up.
    pub pixel_rect: Rect,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
    /// Draw order; higher renders later and its hits sort first.
    pub priority: f32,
    /// Display the camera renders to.
    pub target_display: u32,
    /// Layers the camera sees.
    pub culling_mask: u32,
}

impl Camera {
    /// A camera at the origin looking down `-Z` with default clip planes.
    pub fn new(view_projection: Mat4, pixel_rect: Rect) -> Self {
        Self {
            view_projection,
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            pixel_rect,
            near: 0.3,
            far: 1000.0,
            priority: 0.0,
            target_display: 0,
            culling_mask: u32::MAX,
        }
    }

    /// Ray from the near plane through the pixel at `screen`.
    pub fn screen_point_to_ray(&self, screen: Point) -> Ray {
        let rect = self.pixel_rect;
        let x = 2.0 * (screen.x - rect.x0) / rect.width() - 1.0;
        let y = 2.0 * (screen.y - rect.y0) / rect.height() - 1.0;
        let (x, y) = (narrow(x), narrow(y));
        let inverse = self.view_projection.inverse();
        let near = inverse.project_point3(Vec3::new(x, y, 0.0));
        let far = inverse.project_point3(Vec3::new(x, y, 1.0));
        Ray {
            origin: near,
            direction: (far - near).normalize_or_zero(),
        }
    }

    /// Ray from the eye along the view direction.
    pub fn forward_ray(&self) -> Ray {
        Ray {
            origin: self.position,
            direction: self.forward,
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "normalized device coordinates fit f32"
)]
fn narrow(v: f64) -> f32 {
    v as f32
}

/// One intersection reported by a [`GeometryQuery`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeometryHit<K> {
    /// Node owning the hit geometry.
    pub node: K,
    /// Distance along the ray.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// World-space surface normal.
    pub normal: Vec3,
    /// The geometry is a trigger volume.
    pub is_trigger: bool,
}

impl<K> GeometryHit<K> {
    /// A solid hit facing `+Y`.
    pub fn new(node: K, distance: f32, point: Vec3) -> Self {
        Self {
            node,
            distance,
            point,
            normal: Vec3::Y,
            is_trigger: false,
        }
    }
}

/// The geometry backend.
pub trait GeometryQuery<K> {
    /// Append every intersection of `ray` within `max_distance` on the layers
    /// in `layer_mask`. Order is not significant.
    fn intersect(&self, ray: &Ray, max_distance: f32, layer_mask: u32, out: &mut Vec<GeometryHit<K>>);
}

/// State shared by both ray providers.
struct RayCaster<K> {
    id: ProviderId,
    root: ProviderId,
    camera: Cell<Camera>,
    geometry: Rc<dyn GeometryQuery<K>>,
    config: RaycasterConfig,
    active: Cell<bool>,
    scratch: RefCell<Vec<GeometryHit<K>>>,
}

impl<K> fmt::Debug for RayCaster<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RayCaster")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("camera", &self.camera.get())
            .field("config", &self.config)
            .field("active", &self.active.get())
            .finish_non_exhaustive()
    }
}

impl<K: Copy> RayCaster<K> {
    fn new(camera: Camera, geometry: Rc<dyn GeometryQuery<K>>, config: RaycasterConfig) -> Self {
        let id = ProviderId::next();
        Self {
            id,
            root: id,
            camera: Cell::new(camera),
            geometry,
            config,
            active: Cell::new(true),
            scratch: RefCell::new(Vec::new()),
        }
    }

    fn key(&self) -> ProviderKey {
        ProviderKey::new(self.id)
            .with_root(self.root)
            .with_priority(self.camera.get().priority)
    }

    fn cast(
        &self,
        ray: &Ray,
        clip_distance: f32,
        pointer: &PointerData<K>,
        display_index: u32,
        out: &mut Vec<RaycastResult<K>>,
    ) {
        let camera = self.camera.get();
        let max_distance = self.config.ray_length(clip_distance);
        let mask = camera.culling_mask & self.config.layer_mask;

        let Ok(mut hits) = self.scratch.try_borrow_mut() else {
            log::error!("raycaster {:?} queried while already querying", self.id);
            return;
        };
        hits.clear();
        self.geometry.intersect(ray, max_distance, mask, &mut hits);
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        let key = self.key();
        let solid = hits
            .iter()
            .filter(|hit| self.config.allow_trigger_colliders || !hit.is_trigger);
        for hit in solid.take(self.config.hit_limit()) {
            let index = u32::try_from(out.len()).unwrap_or(u32::MAX);
            out.push(RaycastResult {
                target: Some(hit.node),
                provider: Some(key),
                distance: hit.distance,
                index,
                depth: 0,
                world_position: hit.point,
                world_normal: hit.normal,
                screen_position: pointer.position,
                display_index,
            });
        }
        hits.clear();
    }
}

/// Casts through the pointer's screen position.
#[derive(Debug)]
pub struct CursorRaycaster<K> {
    inner: RayCaster<K>,
}

impl<K: Copy> CursorRaycaster<K> {
    /// A provider for `camera` backed by `geometry`.
    pub fn new(camera: Camera, geometry: Rc<dyn GeometryQuery<K>>, config: RaycasterConfig) -> Self {
        Self {
            inner: RayCaster::new(camera, geometry, config),
        }
    }

    /// Nest this provider under `root` for depth ordering.
    #[must_use]
    pub fn with_root(mut self, root: ProviderId) -> Self {
        self.inner.root = root;
        self
    }

    /// This provider's identity.
    pub fn id(&self) -> ProviderId {
        self.inner.id
    }

    /// Current camera.
    pub fn camera(&self) -> Camera {
        self.inner.camera.get()
    }

    /// Replace the camera, for example after the view moved.
    pub fn set_camera(&self, camera: Camera) {
        self.inner.camera.set(camera);
    }

    /// Enable or disable the provider.
    pub fn set_active(&self, active: bool) {
        self.inner.active.set(active);
    }

    /// Ray and far-plane distance for `pointer`, or `None` when the pointer is
    /// on another display or outside the camera's pixel rect.
    pub fn ray_for(&self, pointer: &PointerData<K>) -> Option<(Ray, f32)> {
        let camera = self.inner.camera.get();
        if pointer.display_index != camera.target_display {
            return None;
        }
        if !camera.pixel_rect.contains(pointer.position) {
            return None;
        }
        let ray = camera.screen_point_to_ray(pointer.position);
        let projection = ray.direction.dot(camera.forward);
        let clip_distance = if projection > -f32::EPSILON && projection < f32::EPSILON {
            f32::INFINITY
        } else {
            abs((camera.far - camera.near) / projection)
        };
        Some((ray, clip_distance))
    }
}

fn abs(v: f32) -> f32 {
    if v < 0.0 { -v } else { v }
}

impl<K: Copy> QueryProvider<K> for CursorRaycaster<K> {
    fn key(&self) -> ProviderKey {
        self.inner.key()
    }

    fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    fn raycast(&self, pointer: &PointerData<K>, out: &mut Vec<RaycastResult<K>>) {
        let Some((ray, clip_distance)) = self.ray_for(pointer) else {
            return;
        };
        self.inner
            .cast(&ray, clip_distance, pointer, pointer.display_index, out);
    }
}

/// Casts along the camera's forward axis.
#[derive(Debug)]
pub struct CameraForwardRaycaster<K> {
    inner: RayCaster<K>,
}

impl<K: Copy> CameraForwardRaycaster<K> {
    /// A provider for `camera` backed by `geometry`.
    pub fn new(camera: Camera, geometry: Rc<dyn GeometryQuery<K>>, config: RaycasterConfig) -> Self {
        Self {
            inner: RayCaster::new(camera, geometry, config),
        }
    }

    /// Nest this provider under `root` for depth ordering.
    #[must_use]
    pub fn with_root(mut self, root: ProviderId) -> Self {
        self.inner.root = root;
        self
    }

    /// This provider's identity.
    pub fn id(&self) -> ProviderId {
        self.inner.id
    }

    /// Replace the camera.
    pub fn set_camera(&self, camera: Camera) {
        self.inner.camera.set(camera);
    }

    /// Enable or disable the provider.
    pub fn set_active(&self, active: bool) {
        self.inner.active.set(active);
    }
}

impl<K: Copy> QueryProvider<K> for CameraForwardRaycaster<K> {
    fn key(&self) -> ProviderKey {
        self.inner.key()
    }

    fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    fn raycast(&self, pointer: &PointerData<K>, out: &mut Vec<RaycastResult<K>>) {
        let camera = self.inner.camera.get();
        let ray = camera.forward_ray();
        self.inner.cast(&ray, camera.far - camera.near, pointer, 0, out);
    }
}
