//! Character collider component
//!
//! Marks an entity as a swept ellipsoid that the collision system moves each
//! tick by `velocity`, sliding along whatever collider geometry its filter
//! accepts.

use crate::config::CharacterConfig;
use crate::foundation::math::Vec3;
use crate::physics::{CollisionGroupRegistry, GroupFilter, PhysicsError, SlideResult};

/// Swept-ellipsoid character volume
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterColliderComponent {
    /// Gravity scalar for movement code. The sweep consumes `velocity`,
    /// which is expected to already include gravity.
    pub gravity: f32,

    /// Ellipsoid radii
    pub radius: Vec3,

    /// World-space displacement applied on the next update
    pub velocity: Vec3,

    /// Which collider groups the character collides with
    pub filter: GroupFilter,

    /// Disabled characters are not moved
    pub enabled: bool,

    last_result: Option<SlideResult>,
}

impl Default for CharacterColliderComponent {
    fn default() -> Self {
        let defaults = CharacterConfig::default();
        Self::new(defaults.radius).with_gravity(defaults.gravity)
    }
}

impl CharacterColliderComponent {
    /// Character with the given radii and no motion
    pub fn new(radius: Vec3) -> Self {
        Self {
            gravity: 0.0,
            radius,
            velocity: Vec3::zeros(),
            filter: GroupFilter::ALL,
            enabled: true,
            last_result: None,
        }
    }

    /// Character built from configuration, resolving group names
    pub fn from_config(config: &CharacterConfig, groups: &CollisionGroupRegistry) -> Result<Self, PhysicsError> {
        Ok(Self::new(config.radius)
            .with_gravity(config.gravity)
            .with_filter(groups.filter(&config.include, &config.exclude)?))
    }

    /// Set gravity
    #[must_use]
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the collision filter
    #[must_use]
    pub fn with_filter(mut self, filter: GroupFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the pending motion
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Outcome of the most recent update
    pub fn last_result(&self) -> Option<&SlideResult> {
        self.last_result.as_ref()
    }

    /// True if the last update slid along a surface facing mostly up
    pub fn is_grounded(&self) -> bool {
        self.last_result.is_some_and(|result| result.grounded)
    }

    pub(crate) fn record(&mut self, result: SlideResult) {
        self.last_result = Some(result);
    }
}
