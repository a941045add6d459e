//! # Scene Engine
//!
//! Runtime core of a real-time 3D scene: an entity hierarchy with lazily
//! cached world matrices, collider shapes with pairwise overlap events, and
//! swept-ellipsoid character movement that slides along collider geometry.
//!
//! ## Features
//!
//! - **Transform hierarchy**: world matrices rebuilt on demand, with every
//!   descendant invalidated and notified when an ancestor moves
//! - **Collision shapes**: box, sphere, mesh, plane, visual and particle
//!   shapes with group filtering
//! - **Character collision**: collide-and-slide against the triangles of
//!   every eligible collider
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! let mut world = World::new();
//!
//! let platform = world.create_entity();
//! world.add_component(platform, TransformComponent::new()).unwrap();
//! world
//!     .add_component(
//!         platform,
//!         ColliderComponent::from_shape(CollisionShape::cuboid(Vec3::zeros(), Vec3::new(5.0, 0.5, 5.0))),
//!     )
//!     .unwrap();
//!
//! let player = world.create_entity();
//! world
//!     .add_component(player, TransformComponent::from_position(Vec3::new(0.0, 5.0, 0.0)))
//!     .unwrap();
//! world
//!     .add_component(
//!         player,
//!         CharacterColliderComponent::new(Vec3::new(1.0, 1.0, 1.0)).with_velocity(Vec3::new(0.0, -10.0, 0.0)),
//!     )
//!     .unwrap();
//!
//! let mut collisions = CollisionSystem::new();
//! collisions.run(&mut world);
//!
//! let y = world.world_position(player).unwrap().y;
//! assert!(y >= 1.5 && y <= 1.5 + 2.0 * scene_engine::physics::character::SKIN_WIDTH);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod physics;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{CharacterConfig, CollisionConfig, Config, ConfigError},
        ecs::{
            components::{CharacterColliderComponent, ColliderComponent, TransformChanged, TransformComponent},
            systems::{CollisionHandler, CollisionSystem},
            Component, Entity, System, World, WorldError,
        },
        events::{EventSignal, ListenerId},
        foundation::math::{Mat4, Quat, Vec3},
        physics::{
            collision::CollisionShape, CollisionGroup, CollisionGroupRegistry, CollisionInfo, GroupFilter,
            PhysicsError, SlideResult,
        },
    };
}
