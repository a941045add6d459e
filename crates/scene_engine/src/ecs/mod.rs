//! Entity-Component-System implementation
//!
//! The world owns entities, their parent/child hierarchy, type-keyed
//! component storage and the mesh assets collider shapes refer to.

pub mod component;
pub mod components;
pub mod entity;
pub mod hierarchy;
pub mod storage;
pub mod system;
pub mod systems;
pub mod world;

#[cfg(test)]
mod tests;

pub use component::Component;
pub use entity::Entity;
pub use system::System;
pub use world::{World, WorldError};
