//! Type-erased component storage
//!
//! Each component type lives in its own [`ComponentStorage`], keyed by entity
//! and ordered by entity id so iteration is deterministic.

use super::{Component, Entity};
use std::any::Any;
use std::collections::BTreeMap;

/// Storage for every instance of one component type
pub struct ComponentStorage<T: Component> {
    components: BTreeMap<Entity, T>,
}

impl<T: Component> ComponentStorage<T> {
    /// Create an empty storage
    pub fn new() -> Self {
        Self {
            components: BTreeMap::new(),
        }
    }

    /// Insert or replace the component for `entity`
    pub fn insert(&mut self, entity: Entity, component: T) -> Option<T> {
        self.components.insert(entity, component)
    }

    /// Remove the component for `entity`
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.components.remove(&entity)
    }

    /// Component for `entity`
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.components.get(&entity)
    }

    /// Mutable component for `entity`
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.get_mut(&entity)
    }

    /// Iterate in entity order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.components.iter().map(|(entity, component)| (*entity, component))
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True if no entity has this component
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Object-safe view of a storage so the world can drop an entity from every
/// storage without knowing the component types.
pub(crate) trait AnyStorage {
    fn remove_entity(&mut self, entity: Entity);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyStorage for ComponentStorage<T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.components.remove(&entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::TransformComponent;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_insert_replaces_and_iterates_in_entity_order() {
        let mut storage = ComponentStorage::<TransformComponent>::new();
        assert!(storage.is_empty());

        storage.insert(Entity::new(3), TransformComponent::new());
        storage.insert(Entity::new(1), TransformComponent::new());
        let replaced = storage.insert(Entity::new(3), TransformComponent::from_position(Vec3::new(0.0, 2.0, 0.0)));

        assert!(replaced.is_some());
        assert_eq!(storage.len(), 2);
        let order: Vec<u32> = storage.iter().map(|(entity, _)| entity.id()).collect();
        assert_eq!(order, vec![1, 3]);
        assert_eq!(storage.get(Entity::new(3)).map(TransformComponent::position), Some(Vec3::new(0.0, 2.0, 0.0)));

        storage.remove_entity(Entity::new(1));
        assert_eq!(storage.len(), 1);
    }
}
