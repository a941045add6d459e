//! Parent/child links between entities
//!
//! The hierarchy is the traversal structure that transform dirtification
//! walks. Cycles are rejected at `set_parent` time, so every walk terminates.

use super::world::WorldError;
use super::{Entity, World};

impl World {
    /// Parent of an entity, if any
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.records.get(&entity)?.parent
    }

    /// Direct children of an entity, in attachment order
    pub fn children(&self, entity: Entity) -> &[Entity] {
        match self.records.get(&entity) {
            Some(record) => &record.children,
            None => &[],
        }
    }

    /// Re-parent `child` under `parent` (or make it a root with `None`)
    ///
    /// The child keeps its local pose; its subtree's world matrices are
    /// invalidated and their `changed` events fire.
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> Result<(), WorldError> {
        self.ensure_alive(child)?;
        if let Some(parent) = parent {
            self.ensure_alive(parent)?;
            if parent == child || self.is_ancestor_of(child, parent) {
                return Err(WorldError::HierarchyCycle { child, parent });
            }
        }

        let previous = self.records.get(&child).and_then(|record| record.parent);
        if previous == parent {
            return Ok(());
        }
        if let Some(previous) = previous {
            if let Some(record) = self.records.get_mut(&previous) {
                record.children.retain(|existing| *existing != child);
            }
        }
        if let Some(parent) = parent {
            if let Some(record) = self.records.get_mut(&parent) {
                record.children.push(child);
            }
        }
        if let Some(record) = self.records.get_mut(&child) {
            record.parent = parent;
        }

        self.dirtify_from(child);
        Ok(())
    }

    /// True if `ancestor` appears on `entity`'s parent chain
    pub fn is_ancestor_of(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut current = self.parent(entity);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    /// Depth-first, pre-order walk over every descendant of `entity`
    /// (excluding `entity` itself). Returning `false` from `visit` skips that
    /// descendant's own subtree.
    pub fn visit_descendants<F>(&self, entity: Entity, mut visit: F)
    where
        F: FnMut(Entity) -> bool,
    {
        let mut stack: Vec<Entity> = self.children(entity).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if visit(current) {
                stack.extend(self.children(current).iter().rev().copied());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_descendants_is_preorder() {
        let mut world = World::new();
        let root = world.create_entity();
        let a = world.create_entity();
        let a1 = world.create_entity();
        let b = world.create_entity();
        world.set_parent(a, Some(root)).unwrap();
        world.set_parent(a1, Some(a)).unwrap();
        world.set_parent(b, Some(root)).unwrap();

        let mut visited = Vec::new();
        world.visit_descendants(root, |entity| {
            visited.push(entity);
            true
        });

        assert_eq!(visited, vec![a, a1, b]);
    }

    #[test]
    fn test_visit_descendants_prunes_subtree() {
        let mut world = World::new();
        let root = world.create_entity();
        let a = world.create_entity();
        let a1 = world.create_entity();
        let b = world.create_entity();
        world.set_parent(a, Some(root)).unwrap();
        world.set_parent(a1, Some(a)).unwrap();
        world.set_parent(b, Some(root)).unwrap();

        let mut visited = Vec::new();
        world.visit_descendants(root, |entity| {
            visited.push(entity);
            entity != a
        });

        assert_eq!(visited, vec![a, b]);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut world = World::new();
        let root = world.create_entity();
        let child = world.create_entity();
        world.set_parent(child, Some(root)).unwrap();

        assert_eq!(
            world.set_parent(root, Some(child)),
            Err(WorldError::HierarchyCycle { child: root, parent: child })
        );
        assert_eq!(
            world.set_parent(root, Some(root)),
            Err(WorldError::HierarchyCycle { child: root, parent: root })
        );
    }

    #[test]
    fn test_reparent_moves_child_between_lists() {
        let mut world = World::new();
        let first = world.create_entity();
        let second = world.create_entity();
        let child = world.create_entity();

        world.set_parent(child, Some(first)).unwrap();
        world.set_parent(child, Some(second)).unwrap();

        assert!(world.children(first).is_empty());
        assert_eq!(world.children(second), &[child]);
        assert_eq!(world.parent(child), Some(second));

        world.set_parent(child, None).unwrap();
        assert_eq!(world.parent(child), None);
    }
}
