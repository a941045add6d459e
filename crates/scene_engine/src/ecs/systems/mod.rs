//! ECS Systems module

pub mod collision_system;
pub mod transform_propagation;

pub use collision_system::{CollisionHandler, CollisionSystem};
