//! Character collision and sliding response
//!
//! A character is an ellipsoid moved by a velocity once per tick. Dividing
//! positions, velocity and geometry by the ellipsoid radii turns the problem
//! into a unit sphere sweep, which is resolved in at most three passes:
//!
//! 1. Sweep, stop just short of the first contact, and clip the remaining
//!    motion onto the sliding plane at that contact.
//! 2. Sweep again; a second contact constrains motion to the crease where
//!    the two sliding planes meet.
//! 3. Sweep once more and accept the result.
//!
//! The final position is scaled back out of ellipsoid space and written to
//! the character's transform.

use super::collision::sweep::{sweep_sphere, SweepHit};
use super::collision::{Plane, Triangle};
use super::GroupFilter;
use crate::ecs::components::{CharacterColliderComponent, ColliderComponent};
use crate::ecs::{Entity, World};
use crate::foundation::math::{Mat4, Vec3};

/// Gap kept between the unit sphere and geometry
pub const SKIN_WIDTH: f32 = 0.01;

/// Sweep passes per update
pub const MAX_ITERATIONS: usize = 3;

/// Minimum world-space `y` of a sliding normal that counts as ground
const GROUND_NORMAL_Y: f32 = 0.7;

const MIN_NORMAL_LENGTH: f32 = 1e-6;

/// Outcome of one collide-and-slide update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideResult {
    /// Final world-space position
    pub position: Vec3,
    /// True if any pass hit geometry
    pub collided: bool,
    /// Number of passes that hit geometry and triggered a response
    pub iterations: usize,
    /// True if any sliding plane faced mostly up
    pub grounded: bool,
    /// First surface hit during the update
    pub contact: Option<SlideContact>,
}

/// World-space description of a sweep contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideContact {
    /// Point on the geometry
    pub point: Vec3,
    /// Point on the ellipsoid surface touching the geometry
    pub sphere_point: Vec3,
    /// Normal of the triangle that was hit
    pub surface_normal: Vec3,
}

/// Ellipsoid-space triangle soup for one character
#[derive(Debug, Clone)]
pub struct CharacterCollisionEngine {
    radius: Vec3,
    triangles: Vec<Triangle>,
}

impl CharacterCollisionEngine {
    /// Empty engine for an ellipsoid with the given radii
    pub fn new(radius: Vec3) -> Self {
        Self {
            radius,
            triangles: Vec::new(),
        }
    }

    /// Gather every triangle the character can collide with: all enabled
    /// colliders on enabled entities passing `filter`, except the
    /// character's own.
    pub fn gather(world: &World, character: Entity, radius: Vec3, filter: &GroupFilter) -> Self {
        let mut engine = Self::new(radius);
        let mut scratch = Vec::new();

        for (entity, collider) in world.query::<ColliderComponent>() {
            if entity == character || !collider.enabled || !world.is_enabled(entity) {
                continue;
            }
            if !filter.passes(collider.group) {
                continue;
            }

            let world_matrix = world.world_matrix(entity).unwrap_or_else(Mat4::identity);
            scratch.clear();
            for shape in &collider.shapes {
                shape.collect_world_triangles(&world_matrix, world.meshes(), &mut scratch);
            }
            engine.add_world_triangles(&scratch);
        }

        log::trace!("Gathered {} triangles for {}", engine.triangles.len(), character);
        engine
    }

    /// Add world-space triangles, converting them into ellipsoid space
    pub fn add_world_triangles(&mut self, triangles: &[Triangle]) {
        let radius = self.radius;
        self.triangles
            .extend(triangles.iter().map(|triangle| triangle.map(|v| v.component_div(&radius))));
    }

    /// Ellipsoid radii
    pub fn radius(&self) -> Vec3 {
        self.radius
    }

    /// Number of gathered triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Move from `position` by `velocity` (both world space), sliding along
    /// the gathered geometry
    pub fn collide_and_slide(&self, position: &Vec3, velocity: &Vec3) -> SlideResult {
        let mut position = position.component_div(&self.radius);
        let mut velocity = velocity.component_div(&self.radius);
        let mut destination = position + velocity;
        let mut first_plane: Option<Plane> = None;

        let mut collided = false;
        let mut grounded = false;
        let mut iterations = 0;
        let mut contact = None;

        for pass in 0..MAX_ITERATIONS {
            let Some(hit) = sweep_sphere(&self.triangles, &position, &velocity) else {
                position = destination;
                break;
            };
            collided = true;
            iterations += 1;
            log::trace!("Slide pass {}: hit at distance {:.4}", pass, hit.distance);
            if contact.is_none() {
                contact = Some(self.world_contact(&hit));
            }

            let advance = (hit.distance - SKIN_WIDTH).max(0.0);
            position += velocity.normalize() * advance;

            let Some(normal) = (position - hit.contact).try_normalize(MIN_NORMAL_LENGTH) else {
                break;
            };
            let sliding_plane = Plane::from_point_normal(&hit.contact, &normal);
            grounded |= self.is_ground_normal(&normal);

            match pass {
                0 => {
                    destination = Self::clip_to_plane(&sliding_plane, &destination);
                    velocity = destination - position;
                    first_plane = Some(sliding_plane);
                }
                1 => {
                    let crease = first_plane
                        .and_then(|first| first.normal.cross(&sliding_plane.normal).try_normalize(MIN_NORMAL_LENGTH));
                    match crease {
                        Some(crease) => {
                            velocity = crease * (destination - position).dot(&crease);
                            destination = position + velocity;
                        }
                        None => {
                            // Parallel planes leave no crease; slide on the new plane instead
                            destination = Self::clip_to_plane(&sliding_plane, &destination);
                            velocity = destination - position;
                        }
                    }
                }
                _ => destination = position,
            }
        }

        SlideResult {
            position: position.component_mul(&self.radius),
            collided,
            iterations,
            grounded,
            contact,
        }
    }

    fn world_contact(&self, hit: &SweepHit) -> SlideContact {
        SlideContact {
            point: hit.contact.component_mul(&self.radius),
            sphere_point: hit.sphere_point.component_mul(&self.radius),
            surface_normal: hit
                .plane
                .normal
                .component_div(&self.radius)
                .try_normalize(MIN_NORMAL_LENGTH)
                .unwrap_or(hit.plane.normal),
        }
    }

    /// Push a point out to one unit plus skin in front of the plane
    fn clip_to_plane(plane: &Plane, point: &Vec3) -> Vec3 {
        let long_radius = 1.0 + SKIN_WIDTH;
        point - plane.normal * (plane.signed_distance(point) - long_radius)
    }

    fn is_ground_normal(&self, normal: &Vec3) -> bool {
        normal
            .component_div(&self.radius)
            .try_normalize(MIN_NORMAL_LENGTH)
            .is_some_and(|world_normal| world_normal.y > GROUND_NORMAL_Y)
    }
}

/// Run one collide-and-slide update for a character entity and write the
/// result to its transform. `None` if the entity has no enabled character
/// collider or no transform.
pub fn update_character(world: &mut World, entity: Entity) -> Option<SlideResult> {
    let (radius, velocity, filter) = {
        let character = world.get_component::<CharacterColliderComponent>(entity)?;
        if !character.enabled || !world.is_enabled(entity) {
            return None;
        }
        (character.radius, character.velocity, character.filter)
    };
    let start = world.world_position(entity)?;

    let result = CharacterCollisionEngine::gather(world, entity, radius, &filter).collide_and_slide(&start, &velocity);

    if let Err(error) = world.set_world_position(entity, result.position) {
        log::warn!("Could not move character {}: {}", entity, error);
        return None;
    }
    if let Some(character) = world.get_component_mut::<CharacterColliderComponent>(entity) {
        character.record(result);
    }
    Some(result)
}

/// Update every character collider in entity order, returning how many moved
pub fn update_characters(world: &mut World) -> usize {
    world
        .entities_with::<CharacterColliderComponent>()
        .into_iter()
        .filter(|&entity| update_character(world, entity).is_some())
        .count()
}
