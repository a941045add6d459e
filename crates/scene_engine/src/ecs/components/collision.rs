//! Collision components for ECS
//!
//! A [`ColliderComponent`] owns an ordered list of shapes evaluated against
//! the entity's world transform, an optional collision group, and the
//! `collision` event the collision system posts to.

use crate::events::EventSignal;
use crate::physics::collision::CollisionShape;
use crate::physics::{CollisionGroup, CollisionInfo, GroupFilter};

/// Component that marks an entity as having collision detection enabled
#[derive(Debug)]
pub struct ColliderComponent {
    /// Shapes in entity-local space, tested in order
    pub shapes: Vec<CollisionShape>,

    /// Group this collider belongs to
    pub group: Option<CollisionGroup>,

    /// Which partner groups this collider is tested against
    pub filter: GroupFilter,

    /// Disabled colliders are invisible to both pairwise tests and
    /// character sweeps
    pub enabled: bool,

    /// Fired once per collision involving this collider, with `this`
    /// set to the owning entity
    pub collision: EventSignal<CollisionInfo>,
}

impl ColliderComponent {
    /// Collider with the given shapes, no group, accepting everything
    pub fn new(shapes: Vec<CollisionShape>) -> Self {
        Self {
            shapes,
            group: None,
            filter: GroupFilter::ALL,
            enabled: true,
            collision: EventSignal::new(),
        }
    }

    /// Collider with a single shape
    pub fn from_shape(shape: CollisionShape) -> Self {
        Self::new(vec![shape])
    }

    /// Append a shape
    #[must_use]
    pub fn with_shape(mut self, shape: CollisionShape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Put the collider in a group
    #[must_use]
    pub fn with_group(mut self, group: CollisionGroup) -> Self {
        self.group = Some(group);
        self
    }

    /// Restrict which groups this collider is tested against
    #[must_use]
    pub fn with_filter(mut self, filter: GroupFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Whether a pair with `other` should be tested at all. Both sides'
    /// filters must accept the other's group.
    pub fn accepts(&self, other: &Self) -> bool {
        self.filter.passes(other.group) && other.filter.passes(self.group)
    }

    /// Highest test priority among the shapes
    pub fn max_test_priority(&self) -> u8 {
        self.shapes.iter().map(CollisionShape::test_priority).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::physics::CollisionGroupRegistry;

    #[test]
    fn test_accepts_requires_both_filters() {
        let registry = CollisionGroupRegistry::from_names(&["player", "walls", "ghosts"]).unwrap();
        let player = registry.get("player").unwrap();
        let walls = registry.get("walls").unwrap();
        let ghosts = registry.get("ghosts").unwrap();

        let hero = ColliderComponent::from_shape(CollisionShape::sphere(Vec3::zeros(), 0.5))
            .with_group(player)
            .with_filter(GroupFilter::ALL.excluding(&[ghosts]));
        let wall = ColliderComponent::from_shape(CollisionShape::cuboid(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)))
            .with_group(walls);
        let ghost = ColliderComponent::from_shape(CollisionShape::sphere(Vec3::zeros(), 0.5)).with_group(ghosts);

        assert!(hero.accepts(&wall));
        assert!(wall.accepts(&hero));
        assert!(!hero.accepts(&ghost));
        assert!(!ghost.accepts(&hero));
    }

    #[test]
    fn test_max_test_priority() {
        let collider = ColliderComponent::from_shape(CollisionShape::sphere(Vec3::zeros(), 1.0))
            .with_shape(CollisionShape::particles(0.1, vec![Vec3::zeros()]));
        assert_eq!(collider.max_test_priority(), 2);
        assert_eq!(ColliderComponent::new(Vec::new()).max_test_priority(), 0);
        assert!(collider.enabled);
    }
}
