//! Transform component for the ECS system
//!
//! Local position, rotation and scale are the authoritative state. The local,
//! world and inverse-world matrices are derived lazily: each sits behind its
//! own dirty flag, is rebuilt on first access after being invalidated, and
//! stays clean until the pose of this transform or of an ancestor changes.
//!
//! The pose is only written through the world's transform setters
//! (`World::set_position` and friends), which route every write through the
//! same dirtification path so descendants are never left stale.

use crate::ecs::Entity;
use crate::events::EventSignal;
use crate::foundation::math::{trs_matrix, Mat4, Quat, Vec3};
use std::cell::Cell;

/// Payload of a transform's `changed` event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformChanged {
    /// Entity whose world matrix was invalidated
    pub entity: Entity,
}

/// ECS Transform component
#[derive(Debug)]
pub struct TransformComponent {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,

    local_matrix: Cell<Mat4>,
    world_matrix: Cell<Mat4>,
    inv_world_matrix: Cell<Mat4>,
    local_dirty: Cell<bool>,
    world_dirty: Cell<bool>,
    inv_world_dirty: Cell<bool>,
    world_version: Cell<u64>,

    /// Set while `World::reset_transform` batches its three writes
    pub(crate) disable_dirtification: bool,

    /// Fired once per effective world-matrix invalidation
    pub changed: EventSignal<TransformChanged>,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::from_transform(Vec3::zeros(), Quat::identity(), Vec3::new(1.0, 1.0, 1.0))
    }
}

impl TransformComponent {
    /// Create identity transform
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self::from_transform(position, Quat::identity(), Vec3::new(1.0, 1.0, 1.0))
    }

    /// Create from full transform specification
    pub fn from_transform(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            local_matrix: Cell::new(Mat4::identity()),
            world_matrix: Cell::new(Mat4::identity()),
            inv_world_matrix: Cell::new(Mat4::identity()),
            local_dirty: Cell::new(true),
            world_dirty: Cell::new(true),
            inv_world_dirty: Cell::new(true),
            world_version: Cell::new(0),
            disable_dirtification: false,
            changed: EventSignal::new(),
        }
    }

    /// Builder pattern: Set rotation from quaternion
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set rotation from Euler angles (radians, roll/pitch/yaw)
    pub fn with_rotation_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler_angles(x, y, z);
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Local matrix (TRS), rebuilt only when the pose changed
    pub fn local_matrix(&self) -> Mat4 {
        if self.local_dirty.get() {
            self.local_matrix
                .set(trs_matrix(&self.position, &self.rotation, &self.scale));
            self.local_dirty.set(false);
        }
        self.local_matrix.get()
    }

    /// Number of times the world matrix has been rebuilt
    pub fn world_version(&self) -> u64 {
        self.world_version.get()
    }

    /// Whether the cached world matrix is stale
    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    pub(crate) fn write_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub(crate) fn write_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    pub(crate) fn write_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Own pose changed: local, world and inverse are all stale
    pub(crate) fn mark_dirty(&self) {
        self.local_dirty.set(true);
        self.mark_world_dirty();
    }

    /// An ancestor changed: only the composed matrices are stale
    pub(crate) fn mark_world_dirty(&self) {
        self.world_dirty.set(true);
        self.inv_world_dirty.set(true);
    }

    /// Cached world matrix, `None` while dirty
    pub(crate) fn cached_world_matrix(&self) -> Option<Mat4> {
        if self.world_dirty.get() {
            None
        } else {
            Some(self.world_matrix.get())
        }
    }

    pub(crate) fn store_world_matrix(&self, world: Mat4) {
        self.world_matrix.set(world);
        self.world_dirty.set(false);
        self.inv_world_dirty.set(true);
        self.world_version.set(self.world_version.get() + 1);
    }

    /// Cached inverse, `None` while dirty
    pub(crate) fn cached_inv_world_matrix(&self) -> Option<Mat4> {
        if self.inv_world_dirty.get() || self.world_dirty.get() {
            None
        } else {
            Some(self.inv_world_matrix.get())
        }
    }

    pub(crate) fn store_inv_world_matrix(&self, inverse: Mat4) {
        self.inv_world_matrix.set(inverse);
        self.inv_world_dirty.set(false);
    }
}
