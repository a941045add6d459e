//! Transform hierarchy: pose setters, dirtification and matrix resolution
//!
//! Writes go through the world so that a change to one transform invalidates
//! the world matrix of every descendant. Reads resolve lazily: a world matrix
//! is rebuilt as `parent_world * local` only when its dirty flag is set.
//!
//! Dirtification is two-phase. The first phase walks the whole subtree and
//! marks every cached matrix stale while collecting the entities whose
//! `changed` event is due. Only once the walk is complete does the second
//! phase fire those events, in walk order. A listener that reads a world
//! matrix therefore never observes a half-invalidated hierarchy.

use crate::ecs::components::{TransformChanged, TransformComponent};
use crate::ecs::world::WorldError;
use crate::ecs::{Entity, World};
use crate::foundation::math::{rotation_of, transform_point, translation_of, Mat4, Quat, Vec3};

impl World {
    fn transform_or_err(&self, entity: Entity) -> Result<&TransformComponent, WorldError> {
        self.ensure_alive(entity)?;
        self.get_component::<TransformComponent>(entity)
            .ok_or(WorldError::MissingComponent {
                entity,
                component: "TransformComponent",
            })
    }

    fn transform_mut_or_err(&mut self, entity: Entity) -> Result<&mut TransformComponent, WorldError> {
        self.ensure_alive(entity)?;
        match self.get_component_mut::<TransformComponent>(entity) {
            Some(transform) => Ok(transform),
            None => {
                log::warn!("Transform write on {} which has no TransformComponent", entity);
                Err(WorldError::MissingComponent {
                    entity,
                    component: "TransformComponent",
                })
            }
        }
    }

    /// Set the local position
    pub fn set_position(&mut self, entity: Entity, position: Vec3) -> Result<(), WorldError> {
        self.transform_mut_or_err(entity)?.write_position(position);
        self.dirtify_world_matrix(entity)
    }

    /// Set one component of the local position
    pub fn set_position_x(&mut self, entity: Entity, x: f32) -> Result<(), WorldError> {
        let mut position = self.transform_or_err(entity)?.position();
        position.x = x;
        self.set_position(entity, position)
    }

    /// Set one component of the local position
    pub fn set_position_y(&mut self, entity: Entity, y: f32) -> Result<(), WorldError> {
        let mut position = self.transform_or_err(entity)?.position();
        position.y = y;
        self.set_position(entity, position)
    }

    /// Set one component of the local position
    pub fn set_position_z(&mut self, entity: Entity, z: f32) -> Result<(), WorldError> {
        let mut position = self.transform_or_err(entity)?.position();
        position.z = z;
        self.set_position(entity, position)
    }

    /// Set the local rotation
    pub fn set_rotation(&mut self, entity: Entity, rotation: Quat) -> Result<(), WorldError> {
        self.transform_mut_or_err(entity)?.write_rotation(rotation);
        self.dirtify_world_matrix(entity)
    }

    /// Set the local rotation from Euler angles (radians, roll/pitch/yaw)
    pub fn set_rotation_euler(&mut self, entity: Entity, x: f32, y: f32, z: f32) -> Result<(), WorldError> {
        self.set_rotation(entity, Quat::from_euler_angles(x, y, z))
    }

    /// Set the local scale
    pub fn set_scale(&mut self, entity: Entity, scale: Vec3) -> Result<(), WorldError> {
        self.transform_mut_or_err(entity)?.write_scale(scale);
        self.dirtify_world_matrix(entity)
    }

    /// Set the whole local pose with a single dirtification
    pub fn set_local_transform(
        &mut self,
        entity: Entity,
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) -> Result<(), WorldError> {
        let transform = self.transform_mut_or_err(entity)?;
        transform.write_position(position);
        transform.write_rotation(rotation);
        transform.write_scale(scale);
        self.dirtify_world_matrix(entity)
    }

    /// Back to identity: zero position, identity rotation, unit scale.
    /// Dirtifies (and notifies) exactly once.
    pub fn reset_transform(&mut self, entity: Entity) -> Result<(), WorldError> {
        self.transform_mut_or_err(entity)?.disable_dirtification = true;
        let writes = self
            .set_position(entity, Vec3::zeros())
            .and_then(|()| self.set_rotation(entity, Quat::identity()))
            .and_then(|()| self.set_scale(entity, Vec3::new(1.0, 1.0, 1.0)));
        self.transform_mut_or_err(entity)?.disable_dirtification = false;
        writes?;
        self.dirtify_world_matrix(entity)
    }

    /// Invalidate this transform's matrices and the world matrices of every
    /// descendant, then fire each affected transform's `changed` event once.
    pub fn dirtify_world_matrix(&mut self, entity: Entity) -> Result<(), WorldError> {
        self.transform_or_err(entity)?;
        self.dirtify_from(entity);
        Ok(())
    }

    /// Dirtify starting at `entity`, which may or may not carry a transform
    /// itself (hierarchy edits on plain grouping entities still move the
    /// transforms below them).
    pub(crate) fn dirtify_from(&mut self, entity: Entity) {
        if let Some(transform) = self.get_component::<TransformComponent>(entity) {
            transform.mark_dirty();
            if transform.disable_dirtification {
                return;
            }
        }

        let mut pending = std::mem::take(&mut self.pending_changes);
        if self.has_component::<TransformComponent>(entity) {
            pending.push(entity);
        }
        self.visit_descendants(entity, |descendant| {
            if let Some(transform) = self.get_component::<TransformComponent>(descendant) {
                transform.mark_world_dirty();
                pending.push(descendant);
            }
            true
        });

        for changed in &pending {
            if let Some(transform) = self.get_component::<TransformComponent>(*changed) {
                transform.changed.emit(self, &TransformChanged { entity: *changed });
            }
        }

        pending.clear();
        self.pending_changes = pending;
    }

    /// Nearest ancestor carrying a transform
    pub(crate) fn parent_transform_entity(&self, entity: Entity) -> Option<Entity> {
        let mut current = self.parent(entity);
        while let Some(candidate) = current {
            if self.has_component::<TransformComponent>(candidate) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Local matrix of an entity's transform
    pub fn local_matrix(&self, entity: Entity) -> Option<Mat4> {
        Some(self.get_component::<TransformComponent>(entity)?.local_matrix())
    }

    /// World matrix (`parent_world * local`; identity parent at the root)
    pub fn world_matrix(&self, entity: Entity) -> Option<Mat4> {
        let transform = self.get_component::<TransformComponent>(entity)?;
        if let Some(cached) = transform.cached_world_matrix() {
            return Some(cached);
        }

        let local = transform.local_matrix();
        let world = match self
            .parent_transform_entity(entity)
            .and_then(|parent| self.world_matrix(parent))
        {
            Some(parent_world) => parent_world * local,
            None => local,
        };
        transform.store_world_matrix(world);
        Some(world)
    }

    /// Inverse of the world matrix, cached separately
    pub fn inv_world_matrix(&self, entity: Entity) -> Option<Mat4> {
        let world = self.world_matrix(entity)?;
        let transform = self.get_component::<TransformComponent>(entity)?;
        if let Some(cached) = transform.cached_inv_world_matrix() {
            return Some(cached);
        }

        // A zero scale makes the matrix singular; identity keeps callers finite.
        let inverse = world.try_inverse().unwrap_or_else(Mat4::identity);
        transform.store_inv_world_matrix(inverse);
        Some(inverse)
    }

    /// World-space position
    pub fn world_position(&self, entity: Entity) -> Option<Vec3> {
        self.world_matrix(entity).map(|world| translation_of(&world))
    }

    /// World-space rotation
    pub fn world_rotation(&self, entity: Entity) -> Option<Quat> {
        self.world_matrix(entity).map(|world| rotation_of(&world))
    }

    /// Place an entity at a world-space position by converting it into the
    /// parent's space first
    pub fn set_world_position(&mut self, entity: Entity, position: Vec3) -> Result<(), WorldError> {
        self.transform_or_err(entity)?;
        let local = match self
            .parent_transform_entity(entity)
            .and_then(|parent| self.inv_world_matrix(parent))
        {
            Some(parent_inverse) => transform_point(&parent_inverse, &position),
            None => position,
        };
        self.set_position(entity, local)
    }
}
