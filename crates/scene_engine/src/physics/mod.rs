//! Physics module for collision detection and response
//!
//! Pairwise shape overlap tests feed collision events, and the swept-ellipsoid
//! character engine turns a desired motion into a collision-free one by
//! sliding along the world's collider triangles.

pub mod character;
pub mod collision;
pub mod collision_groups;
pub mod collision_system;

use thiserror::Error;

pub use character::{CharacterCollisionEngine, SlideContact, SlideResult};
pub use collision::{CollisionShape, Plane, Triangle, TriangleBuffer};
pub use collision_groups::{CollisionGroup, CollisionGroupRegistry, GroupFilter};
pub use collision_system::{CollisionInfo, PairwiseCollisionDetector};

/// Errors raised while configuring collision data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhysicsError {
    /// Every group bit is in use
    #[error("cannot register more than {} collision groups", collision_groups::MAX_GROUPS)]
    TooManyGroups,

    /// A filter referenced a group that was never registered
    #[error("unknown collision group: {0}")]
    UnknownGroup(String),

    /// Flat vertex data whose length is not a whole number of elements
    #[error("triangle buffer length {len} is not a multiple of the element size")]
    InvalidTriangleBuffer {
        /// Offending length
        len: usize,
    },
}
