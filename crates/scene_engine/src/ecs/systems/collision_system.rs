//! ECS collision system
//!
//! Runs once per tick:
//! 1. Pairwise detection over every enabled collider.
//! 2. Dispatch. Each collision goes to the initiating collider's `collision`
//!    signal and its attached handlers, then its mirror goes to the other
//!    side the same way.
//! 3. Character colliders are swept and moved.

use crate::ecs::components::ColliderComponent;
use crate::ecs::{Entity, System, World};
use crate::physics::character;
use crate::physics::{CollisionInfo, PairwiseCollisionDetector};
use std::collections::HashMap;

/// Receiver for collisions of one entity, for script-style reactions that
/// keep their own state
pub trait CollisionHandler {
    /// Called for every collision posted to the entity the handler is attached to
    fn on_collision(&mut self, world: &World, info: &CollisionInfo);
}

impl<F> CollisionHandler for F
where
    F: FnMut(&World, &CollisionInfo),
{
    fn on_collision(&mut self, world: &World, info: &CollisionInfo) {
        self(world, info);
    }
}

/// ECS collision system that integrates collision detection with the ECS World
#[derive(Default)]
pub struct CollisionSystem {
    detector: PairwiseCollisionDetector,
    handlers: HashMap<Entity, Vec<Box<dyn CollisionHandler>>>,
    dispatch: Vec<CollisionInfo>,
    characters_moved: usize,
}

impl CollisionSystem {
    /// Create a new collision system
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a handler receiving every collision posted to `entity`
    pub fn attach_handler<H>(&mut self, entity: Entity, handler: H)
    where
        H: CollisionHandler + 'static,
    {
        self.handlers.entry(entity).or_default().push(Box::new(handler));
    }

    /// Drop every handler attached to `entity`, returning how many there were
    pub fn detach_handlers(&mut self, entity: Entity) -> usize {
        self.handlers.remove(&entity).map_or(0, |handlers| handlers.len())
    }

    /// Main update: detect, dispatch, then move characters
    pub fn update(&mut self, world: &mut World) {
        self.dispatch.clear();
        self.dispatch.extend_from_slice(self.detector.detect(world));

        for info in &self.dispatch {
            Self::post(&mut self.handlers, world, info);
            Self::post(&mut self.handlers, world, &info.mirrored());
        }

        self.characters_moved = character::update_characters(world);
    }

    fn post(handlers: &mut HashMap<Entity, Vec<Box<dyn CollisionHandler>>>, world: &World, info: &CollisionInfo) {
        if let Some(collider) = world.get_component::<ColliderComponent>(info.this) {
            collider.collision.emit(world, info);
        }
        if let Some(attached) = handlers.get_mut(&info.this) {
            for handler in attached.iter_mut() {
                handler.on_collision(world, info);
            }
        }
    }

    /// Collisions found by the last update (until the next one)
    pub fn last_collisions(&self) -> &[CollisionInfo] {
        self.detector.last_collisions()
    }

    /// Character colliders moved by the last update
    pub fn characters_moved(&self) -> usize {
        self.characters_moved
    }
}

impl System for CollisionSystem {
    fn run(&mut self, world: &mut World) {
        self.update(world);
    }
}
