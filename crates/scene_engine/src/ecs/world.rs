//! ECS World implementation

use super::components::TransformComponent;
use super::storage::{AnyStorage, ComponentStorage};
use super::{Component, Entity};
use crate::foundation::collections::MeshHandle;
use crate::physics::collision::{MeshStore, TriangleBuffer};
use std::any::TypeId;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by world and hierarchy operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The entity was never created or has been despawned
    #[error("{0} does not exist")]
    UnknownEntity(Entity),

    /// The entity lacks a component the operation needs
    #[error("{entity} has no {component}")]
    MissingComponent {
        /// Entity that was addressed
        entity: Entity,
        /// Name of the missing component type
        component: &'static str,
    },

    /// Parenting would make an entity its own ancestor
    #[error("parenting {child} under {parent} would create a cycle")]
    HierarchyCycle {
        /// Entity being re-parented
        child: Entity,
        /// Requested parent
        parent: Entity,
    },
}

/// Per-entity bookkeeping that is not a component
#[derive(Debug, Clone, Default)]
pub(super) struct EntityRecord {
    pub(super) parent: Option<Entity>,
    pub(super) children: Vec<Entity>,
    pub(super) enabled: bool,
}

/// ECS World containing all entities, their hierarchy and components
pub struct World {
    next_entity_id: u32,
    entities: Vec<Entity>,
    pub(super) records: HashMap<Entity, EntityRecord>,
    component_storages: HashMap<TypeId, Box<dyn AnyStorage>>,
    meshes: MeshStore,
    /// Reusable worklist of transforms whose `changed` event is pending
    pub(super) pending_changes: Vec<Entity>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            next_entity_id: 0,
            entities: Vec::new(),
            records: HashMap::new(),
            component_storages: HashMap::new(),
            meshes: MeshStore::with_key(),
            pending_changes: Vec::new(),
        }
    }

    /// Create a new root entity
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.next_entity_id);
        self.next_entity_id += 1;
        self.entities.push(entity);
        self.records.insert(
            entity,
            EntityRecord {
                enabled: true,
                ..EntityRecord::default()
            },
        );
        entity
    }

    /// Destroy an entity, its whole subtree and every component they own
    pub fn despawn(&mut self, entity: Entity) -> Result<(), WorldError> {
        self.ensure_alive(entity)?;

        let mut doomed = vec![entity];
        self.visit_descendants(entity, |descendant| {
            doomed.push(descendant);
            true
        });

        if let Some(parent) = self.records.get(&entity).and_then(|record| record.parent) {
            if let Some(parent_record) = self.records.get_mut(&parent) {
                parent_record.children.retain(|child| *child != entity);
            }
        }

        for dead in &doomed {
            self.records.remove(dead);
            for storage in self.component_storages.values_mut() {
                storage.remove_entity(*dead);
            }
        }
        self.entities.retain(|alive| !doomed.contains(alive));

        log::debug!("Despawned {} ({} entities in subtree)", entity, doomed.len());
        Ok(())
    }

    /// True if the entity exists
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.records.contains_key(&entity)
    }

    pub(super) fn ensure_alive(&self, entity: Entity) -> Result<(), WorldError> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(WorldError::UnknownEntity(entity))
        }
    }

    /// Enable or disable an entity. Disabled entities take no part in collision.
    pub fn set_enabled(&mut self, entity: Entity, enabled: bool) -> Result<(), WorldError> {
        let record = self
            .records
            .get_mut(&entity)
            .ok_or(WorldError::UnknownEntity(entity))?;
        record.enabled = enabled;
        Ok(())
    }

    /// Whether the entity exists and is enabled
    pub fn is_enabled(&self, entity: Entity) -> bool {
        self.records.get(&entity).is_some_and(|record| record.enabled)
    }

    /// Add (or replace) a component on an entity
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), WorldError> {
        self.ensure_alive(entity)?;
        self.storage_mut::<T>().insert(entity, component);
        if TypeId::of::<T>() == TypeId::of::<TransformComponent>() {
            // Descendants composed against whatever stood in for this transform before.
            self.dirtify_from(entity);
        }
        Ok(())
    }

    /// Remove a component from an entity, returning it
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let removed = self
            .component_storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any_mut().downcast_mut::<ComponentStorage<T>>())
            .and_then(|storage| storage.remove(entity));
        if removed.is_some() && TypeId::of::<T>() == TypeId::of::<TransformComponent>() {
            self.dirtify_from(entity);
        }
        removed
    }

    /// Get a component from an entity
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Get a mutable component from an entity
    ///
    /// `TransformComponent` only exposes its pose through getters here; pose
    /// writes go through the world's transform setters.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()?
            .get_mut(entity)
    }

    /// Whether the entity has a component of type `T`
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.get_component::<T>(entity).is_some()
    }

    /// Every `(entity, component)` of type `T`, in entity order
    pub fn query<T: Component>(&self) -> Vec<(Entity, &T)> {
        self.storage::<T>()
            .map(|storage| storage.iter().collect())
            .unwrap_or_default()
    }

    /// Entities holding a component of type `T`, in entity order
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.storage::<T>()
            .map(|storage| storage.iter().map(|(entity, _)| entity).collect())
            .unwrap_or_default()
    }

    fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.component_storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
    }

    fn storage_mut<T: Component>(&mut self) -> &mut ComponentStorage<T> {
        let storage = self
            .component_storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()));
        match storage.as_any_mut().downcast_mut::<ComponentStorage<T>>() {
            Some(typed) => typed,
            None => unreachable!("component storage keyed by the wrong TypeId"),
        }
    }

    /// Store a triangle buffer and return a handle shapes can refer to
    pub fn add_mesh(&mut self, mesh: TriangleBuffer) -> MeshHandle {
        self.meshes.insert(mesh)
    }

    /// Drop a triangle buffer. Shapes still pointing at it contribute nothing.
    pub fn remove_mesh(&mut self, handle: MeshHandle) -> Option<TriangleBuffer> {
        self.meshes.remove(handle)
    }

    /// Triangle buffer for a handle
    pub fn mesh(&self, handle: MeshHandle) -> Option<&TriangleBuffer> {
        self.meshes.get(handle)
    }

    /// Every stored triangle buffer
    pub fn meshes(&self) -> &MeshStore {
        &self.meshes
    }

    /// Get an iterator over all entities in creation order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
