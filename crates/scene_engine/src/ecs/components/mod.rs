//! ECS components

pub mod character;
pub mod collision;
pub mod transform;

pub use character::CharacterColliderComponent;
pub use collision::ColliderComponent;
pub use transform::{TransformChanged, TransformComponent};
