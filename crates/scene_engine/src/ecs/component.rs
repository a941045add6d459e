//! Component trait and implementations

/// Marker trait for components
///
/// The scene core is single-threaded (transforms cache matrices in `Cell`s and
/// events hold plain closures), so components only need to be `'static`.
pub trait Component: 'static {}

impl Component for crate::ecs::components::TransformComponent {}
impl Component for crate::ecs::components::ColliderComponent {}
impl Component for crate::ecs::components::CharacterColliderComponent {}
