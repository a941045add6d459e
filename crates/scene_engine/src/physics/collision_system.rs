//! Core pairwise collision detection
//!
//! Every tick each unordered pair of active colliders is tested once,
//! brute force. Within a pair every shape is tested against every shape, and
//! the shape with the higher test priority initiates the test so composite
//! shapes (particles) can report which element collided.
//!
//! Results live in a pooled buffer that is flushed at the start of the next
//! tick. The ECS side (`ecs::systems::collision_system`) dispatches them.

use super::collision::ShapePose;
use crate::ecs::components::ColliderComponent;
use crate::ecs::{Entity, World};
use crate::foundation::memory::Pool;
use std::collections::HashSet;

/// One collision between two shapes of two colliders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionInfo {
    /// Entity receiving this info
    pub this: Entity,
    /// Entity it collided with
    pub other: Entity,
    /// Index of the colliding shape on `this`
    pub this_shape: usize,
    /// Index of the colliding shape on `other`
    pub other_shape: usize,
    /// Colliding particle of a particle shape on `this`
    pub particle_index: Option<usize>,
}

impl CollisionInfo {
    /// Same collision seen from the other side
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self {
            this: self.other,
            other: self.this,
            this_shape: self.other_shape,
            other_shape: self.this_shape,
            particle_index: self.particle_index,
        }
    }
}

impl Default for CollisionInfo {
    fn default() -> Self {
        let placeholder = Entity::new(u32::MAX);
        Self {
            this: placeholder,
            other: placeholder,
            this_shape: 0,
            other_shape: 0,
            particle_index: None,
        }
    }
}

/// Brute-force pairwise tester
#[derive(Debug, Default)]
pub struct PairwiseCollisionDetector {
    infos: Pool<CollisionInfo>,
    seen: HashSet<(Entity, Entity)>,
    pairs_tested: usize,
}

impl PairwiseCollisionDetector {
    /// Create a new detector
    pub fn new() -> Self {
        Self::default()
    }

    /// Test every pair of enabled colliders and return this tick's
    /// collisions. The previous tick's results are discarded first.
    pub fn detect(&mut self, world: &World) -> &[CollisionInfo] {
        self.infos.flush();
        self.seen.clear();
        self.pairs_tested = 0;

        let colliders: Vec<(Entity, &ColliderComponent, ShapePose)> = world
            .query::<ColliderComponent>()
            .into_iter()
            .filter(|(entity, collider)| collider.enabled && world.is_enabled(*entity))
            .map(|(entity, collider)| {
                let pose = world
                    .world_matrix(entity)
                    .map_or_else(ShapePose::identity, ShapePose::from_matrix);
                (entity, collider, pose)
            })
            .collect();

        for (a, collider_a, pose_a) in &colliders {
            for (b, collider_b, pose_b) in &colliders {
                if a == b {
                    continue;
                }
                let key = if a < b { (*a, *b) } else { (*b, *a) };
                if !self.seen.insert(key) {
                    continue;
                }
                if !collider_a.accepts(collider_b) {
                    continue;
                }

                self.pairs_tested += 1;
                let infos = &mut self.infos;
                for (index_a, shape_a) in collider_a.shapes.iter().enumerate() {
                    for (index_b, shape_b) in collider_b.shapes.iter().enumerate() {
                        if shape_b.test_priority() > shape_a.test_priority() {
                            shape_b.collide(pose_b, shape_a, pose_a, world.meshes(), &mut |particle_index| {
                                *infos.acquire() = CollisionInfo {
                                    this: *b,
                                    other: *a,
                                    this_shape: index_b,
                                    other_shape: index_a,
                                    particle_index,
                                };
                            });
                        } else {
                            shape_a.collide(pose_a, shape_b, pose_b, world.meshes(), &mut |particle_index| {
                                *infos.acquire() = CollisionInfo {
                                    this: *a,
                                    other: *b,
                                    this_shape: index_a,
                                    other_shape: index_b,
                                    particle_index,
                                };
                            });
                        }
                    }
                }
            }
        }

        log::debug!(
            "Collision tick: {} colliders, {} pairs tested, {} collisions",
            colliders.len(),
            self.pairs_tested,
            self.infos.len()
        );
        self.infos.as_slice()
    }

    /// Collisions from the last `detect` call
    pub fn last_collisions(&self) -> &[CollisionInfo] {
        self.infos.as_slice()
    }

    /// Pairs that passed filtering in the last `detect` call
    pub fn pairs_tested(&self) -> usize {
        self.pairs_tested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::TransformComponent;
    use crate::foundation::math::Vec3;
    use crate::physics::collision::CollisionShape;
    use crate::physics::{CollisionGroupRegistry, GroupFilter};

    fn spawn(world: &mut World, position: Vec3, collider: ColliderComponent) -> Entity {
        let entity = world.create_entity();
        world.add_component(entity, TransformComponent::from_position(position)).unwrap();
        world.add_component(entity, collider).unwrap();
        entity
    }

    fn ball(radius: f32) -> ColliderComponent {
        ColliderComponent::from_shape(CollisionShape::sphere(Vec3::zeros(), radius))
    }

    #[test]
    fn test_each_pair_tested_once() {
        let mut world = World::new();
        let a = spawn(&mut world, Vec3::zeros(), ball(1.0));
        let b = spawn(&mut world, Vec3::new(1.5, 0.0, 0.0), ball(1.0));
        spawn(&mut world, Vec3::new(50.0, 0.0, 0.0), ball(1.0));

        let mut detector = PairwiseCollisionDetector::new();
        let infos = detector.detect(&world).to_vec();

        assert_eq!(detector.pairs_tested(), 3);
        assert_eq!(
            infos,
            vec![CollisionInfo {
                this: a,
                other: b,
                this_shape: 0,
                other_shape: 0,
                particle_index: None
            }]
        );
    }

    #[test]
    fn test_results_are_flushed_each_tick() {
        let mut world = World::new();
        spawn(&mut world, Vec3::zeros(), ball(1.0));
        let mover = spawn(&mut world, Vec3::new(1.0, 0.0, 0.0), ball(1.0));

        let mut detector = PairwiseCollisionDetector::new();
        assert_eq!(detector.detect(&world).len(), 1);

        world.set_position(mover, Vec3::new(10.0, 0.0, 0.0)).unwrap();
        assert!(detector.detect(&world).is_empty());
        assert!(detector.last_collisions().is_empty());
    }

    #[test]
    fn test_particle_shape_initiates_and_reports_index() {
        let mut world = World::new();
        let target = spawn(
            &mut world,
            Vec3::zeros(),
            ColliderComponent::from_shape(CollisionShape::cuboid(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))),
        );
        let emitter = world.create_entity();
        world
            .add_component(
                emitter,
                ColliderComponent::from_shape(CollisionShape::sphere(Vec3::new(100.0, 0.0, 0.0), 0.1)).with_shape(
                    CollisionShape::particles(0.2, vec![Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.5, 0.9, 0.0)]),
                ),
            )
            .unwrap();

        let mut detector = PairwiseCollisionDetector::new();
        let infos = detector.detect(&world);

        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].this, emitter);
        assert_eq!(infos[0].other, target);
        assert_eq!(infos[0].this_shape, 1);
        assert_eq!(infos[0].other_shape, 0);
        assert_eq!(infos[0].particle_index, Some(1));
    }

    #[test]
    fn test_filtered_and_disabled_colliders_are_skipped() {
        let registry = CollisionGroupRegistry::from_names(&["a", "b"]).unwrap();
        let group_a = registry.get("a").unwrap();
        let group_b = registry.get("b").unwrap();

        let mut world = World::new();
        spawn(&mut world, Vec3::zeros(), ball(1.0).with_group(group_a));
        spawn(
            &mut world,
            Vec3::new(0.5, 0.0, 0.0),
            ball(1.0).with_group(group_b).with_filter(GroupFilter::ALL.excluding(&[group_a])),
        );
        let sleeper = spawn(&mut world, Vec3::new(-0.5, 0.0, 0.0), ball(1.0));
        world.set_enabled(sleeper, false).unwrap();

        let mut detector = PairwiseCollisionDetector::new();
        assert!(detector.detect(&world).is_empty());
        assert_eq!(detector.pairs_tested(), 0);
    }

    #[test]
    fn test_mirrored_swaps_roles() {
        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        let info = CollisionInfo {
            this: a,
            other: b,
            this_shape: 2,
            other_shape: 0,
            particle_index: Some(4),
        };

        let mirror = info.mirrored();
        assert_eq!((mirror.this, mirror.other), (b, a));
        assert_eq!((mirror.this_shape, mirror.other_shape), (0, 2));
        assert_eq!(mirror.particle_index, Some(4));
        assert_eq!(mirror.mirrored(), info);
    }
}
