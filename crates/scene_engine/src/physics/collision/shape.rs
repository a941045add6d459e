//! Collision shapes
//!
//! Shapes are stored in the owning entity's local space and have no
//! transform of their own. Every test evaluates them against a [`ShapePose`]
//! built from the entity's world matrix.

use super::mesh::{unit_box, unit_sphere, MeshStore};
use super::overlap;
use super::primitives::{Aabb, Plane, Triangle};
use crate::foundation::collections::MeshHandle;
use crate::foundation::math::{rotation_of, transform_point, translation_of, Mat4, Quat, Vec3};

/// World placement of a shape's owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapePose {
    /// World matrix
    pub matrix: Mat4,
    /// World translation
    pub position: Vec3,
    /// World rotation with scale removed
    pub rotation: Quat,
}

impl ShapePose {
    /// Pose from a world matrix
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self {
            position: translation_of(&matrix),
            rotation: rotation_of(&matrix),
            matrix,
        }
    }

    /// Pose at the origin
    pub fn identity() -> Self {
        Self::from_matrix(Mat4::identity())
    }

    /// Local offset rotated into world space and translated by the owner
    pub fn place(&self, local: &Vec3) -> Vec3 {
        self.position + self.rotation * local
    }
}

impl Default for ShapePose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Box with an offset center and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxShape {
    /// Local center offset
    pub center: Vec3,
    /// Half size along each axis
    pub extent: Vec3,
}

impl BoxShape {
    /// Box from center and half extents
    pub fn new(center: Vec3, extent: Vec3) -> Self {
        Self { center, extent }
    }

    /// World-axis-aligned bounds. The center follows the owner's rotation,
    /// the extents stay on the world axes.
    pub fn world_aabb(&self, pose: &ShapePose) -> Aabb {
        Aabb::from_center_extent(&pose.place(&self.center), &self.extent)
    }
}

/// Sphere with an offset center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereShape {
    /// Local center offset
    pub center: Vec3,
    /// Radius
    pub radius: f32,
}

impl SphereShape {
    /// Sphere from center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// World-space center
    pub fn world_center(&self, pose: &ShapePose) -> Vec3 {
        pose.place(&self.center)
    }
}

/// Reference to a triangle buffer in the world's mesh store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshShape {
    /// Mesh asset; `None` or a removed asset contributes nothing
    pub mesh: Option<MeshHandle>,
}

/// Infinite plane `normal . p = offset` in local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneShape {
    /// Local normal
    pub normal: Vec3,
    /// Distance from the local origin along the normal
    pub offset: f32,
}

impl PlaneShape {
    /// World-space plane. `None` when the normal is zero.
    pub fn world_plane(&self, pose: &ShapePose) -> Option<Plane> {
        let normal = (pose.rotation * self.normal).try_normalize(f32::EPSILON)?;
        let point = pose.place(&(self.normal * self.offset));
        Some(Plane::from_point_normal(&point, &normal))
    }
}

/// Particles of an externally simulated emitter, tested as small spheres
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleShape {
    /// Particle radius
    pub radius: f32,
    /// World-space particle positions, refreshed by the particle system
    pub positions: Vec<Vec3>,
}

/// Shape attached to a collider
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionShape {
    /// Axis-aligned box
    Box(BoxShape),
    /// Sphere
    Sphere(SphereShape),
    /// Triangle mesh
    Mesh(MeshShape),
    /// One-sided plane, everything behind it collides
    Plane(PlaneShape),
    /// Box derived from a visual's local bounds
    Visual(BoxShape),
    /// Per-particle spheres
    Particle(ParticleShape),
}

impl CollisionShape {
    /// Box shape
    pub fn cuboid(center: Vec3, extent: Vec3) -> Self {
        Self::Box(BoxShape::new(center, extent))
    }

    /// Sphere shape
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere(SphereShape::new(center, radius))
    }

    /// Mesh shape
    pub fn mesh(handle: MeshHandle) -> Self {
        Self::Mesh(MeshShape { mesh: Some(handle) })
    }

    /// Plane shape
    pub fn plane(normal: Vec3, offset: f32) -> Self {
        Self::Plane(PlaneShape { normal, offset })
    }

    /// Box covering a visual's local bounds
    pub fn visual(bounds_min: Vec3, bounds_max: Vec3) -> Self {
        let bounds = Aabb { min: bounds_min, max: bounds_max };
        Self::Visual(BoxShape::new(bounds.center(), bounds.extent()))
    }

    /// Particle shape
    pub fn particles(radius: f32, positions: Vec<Vec3>) -> Self {
        Self::Particle(ParticleShape { radius, positions })
    }

    /// Higher priority shapes initiate pairwise tests
    pub fn test_priority(&self) -> u8 {
        match self {
            Self::Particle(_) => 2,
            _ => 1,
        }
    }

    fn as_box(&self) -> Option<&BoxShape> {
        match self {
            Self::Box(shape) | Self::Visual(shape) => Some(shape),
            _ => None,
        }
    }

    /// Run this shape against `other`, calling `on_hit` once per contact.
    /// Particle shapes report the colliding particle index.
    pub fn collide(
        &self,
        pose: &ShapePose,
        other: &Self,
        other_pose: &ShapePose,
        meshes: &MeshStore,
        on_hit: &mut dyn FnMut(Option<usize>),
    ) {
        match self {
            Self::Particle(particles) => {
                for (index, position) in particles.positions.iter().enumerate() {
                    if other.intersects_sphere(other_pose, position, particles.radius, meshes) {
                        on_hit(Some(index));
                    }
                }
            }
            _ => {
                if self.intersects(pose, other, other_pose, meshes) {
                    on_hit(None);
                }
            }
        }
    }

    /// Boolean overlap for single-volume shapes. Particles never match
    /// here, they go through [`Self::collide`].
    pub fn intersects(&self, pose: &ShapePose, other: &Self, other_pose: &ShapePose, meshes: &MeshStore) -> bool {
        match (self, other) {
            (Self::Particle(_), _) | (_, Self::Particle(_)) => false,
            (_, Self::Sphere(sphere)) => {
                self.intersects_sphere(pose, &sphere.world_center(other_pose), sphere.radius, meshes)
            }
            (Self::Sphere(sphere), _) => {
                other.intersects_sphere(other_pose, &sphere.world_center(pose), sphere.radius, meshes)
            }
            (Self::Plane(plane), _) => other
                .as_box()
                .is_some_and(|shape| overlap::plane_shape_intersects_box_shape(plane, pose, shape, other_pose)),
            (_, Self::Plane(plane)) => self
                .as_box()
                .is_some_and(|shape| overlap::plane_shape_intersects_box_shape(plane, other_pose, shape, pose)),
            _ => match (self.as_box(), other.as_box()) {
                (Some(a), Some(b)) => overlap::box_shape_intersects_box_shape(a, pose, b, other_pose),
                _ => false,
            },
        }
    }

    /// Overlap with a world-space sphere
    pub fn intersects_sphere(&self, pose: &ShapePose, center: &Vec3, radius: f32, meshes: &MeshStore) -> bool {
        match self {
            Self::Box(shape) | Self::Visual(shape) => {
                overlap::box_shape_intersects_sphere(shape, pose, center, radius)
            }
            Self::Sphere(shape) => {
                overlap::sphere_intersects_with_sphere(&shape.world_center(pose), shape.radius, center, radius)
            }
            Self::Plane(shape) => shape
                .world_plane(pose)
                .is_some_and(|plane| overlap::plane_intersects_with_sphere(&plane, center, radius)),
            Self::Mesh(shape) => shape
                .mesh
                .and_then(|handle| meshes.get(handle))
                .is_some_and(|buffer| {
                    buffer
                        .triangles()
                        .any(|triangle| overlap::triangle_intersects_with_sphere(&triangle.transformed(&pose.matrix), center, radius))
                }),
            Self::Particle(_) => false,
        }
    }

    /// Append this shape's world-space triangles for the character sweep.
    /// Boxes and spheres are tessellated from the shared unit meshes; planes,
    /// visuals and particles contribute nothing.
    pub fn collect_world_triangles(&self, world_matrix: &Mat4, meshes: &MeshStore, out: &mut Vec<Triangle>) {
        match self {
            Self::Box(shape) => out.extend(unit_box().triangles().map(|triangle| {
                triangle.map(|v| transform_point(world_matrix, &(shape.center + v.component_mul(&shape.extent))))
            })),
            Self::Sphere(shape) => out.extend(
                unit_sphere()
                    .triangles()
                    .map(|triangle| triangle.map(|v| transform_point(world_matrix, &(shape.center + v * shape.radius)))),
            ),
            Self::Mesh(shape) => {
                let Some(buffer) = shape.mesh.and_then(|handle| meshes.get(handle)) else {
                    return;
                };
                if !buffer.is_triangle_soup() {
                    log::trace!("Skipping indexed or non-triangle mesh in character sweep");
                    return;
                }
                out.extend(buffer.triangles().map(|triangle| triangle.transformed(world_matrix)));
            }
            Self::Plane(_) | Self::Visual(_) | Self::Particle(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::TriangleBuffer;

    fn at(position: Vec3) -> ShapePose {
        ShapePose::from_matrix(Mat4::new_translation(&position))
    }

    #[test]
    fn test_particles_outrank_volumes() {
        assert_eq!(CollisionShape::particles(0.1, vec![]).test_priority(), 2);
        assert_eq!(CollisionShape::cuboid(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)).test_priority(), 1);
        assert_eq!(CollisionShape::sphere(Vec3::zeros(), 1.0).test_priority(), 1);
        assert_eq!(CollisionShape::plane(Vec3::y(), 0.0).test_priority(), 1);
    }

    #[test]
    fn test_particle_hits_report_indices() {
        let meshes = MeshStore::with_key();
        let particles = CollisionShape::particles(
            0.5,
            vec![Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.2, 0.0), Vec3::new(0.0, 1.4, 0.0)],
        );
        let sphere = CollisionShape::sphere(Vec3::zeros(), 1.0);

        let mut hits = Vec::new();
        particles.collide(&ShapePose::identity(), &sphere, &ShapePose::identity(), &meshes, &mut |index| {
            hits.push(index);
        });
        assert_eq!(hits, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_plane_is_one_sided() {
        let meshes = MeshStore::with_key();
        let ground = CollisionShape::plane(Vec3::y(), 0.0);
        let sphere = CollisionShape::sphere(Vec3::zeros(), 0.5);

        assert!(ground.intersects(&ShapePose::identity(), &sphere, &at(Vec3::new(0.0, 0.4, 0.0)), &meshes));
        assert!(ground.intersects(&ShapePose::identity(), &sphere, &at(Vec3::new(0.0, -20.0, 0.0)), &meshes));
        assert!(!ground.intersects(&ShapePose::identity(), &sphere, &at(Vec3::new(0.0, 2.0, 0.0)), &meshes));

        let crate_box = CollisionShape::cuboid(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        assert!(crate_box.intersects(&at(Vec3::new(0.0, 0.5, 0.0)), &ground, &ShapePose::identity(), &meshes));
        assert!(!crate_box.intersects(&at(Vec3::new(0.0, 1.5, 0.0)), &ground, &ShapePose::identity(), &meshes));
    }

    #[test]
    fn test_mesh_against_sphere_and_missing_asset() {
        let mut meshes = MeshStore::with_key();
        let floor = TriangleBuffer::from_flat(vec![-5.0, 0.0, -5.0, -5.0, 0.0, 5.0, 5.0, 0.0, 0.0]).unwrap();
        let handle = meshes.insert(floor);
        let mesh = CollisionShape::mesh(handle);
        let sphere = CollisionShape::sphere(Vec3::zeros(), 1.0);

        assert!(mesh.intersects(&ShapePose::identity(), &sphere, &at(Vec3::new(0.0, 0.5, 0.0)), &meshes));
        assert!(!mesh.intersects(&ShapePose::identity(), &sphere, &at(Vec3::new(0.0, 1.5, 0.0)), &meshes));

        meshes.remove(handle);
        assert!(!mesh.intersects(&ShapePose::identity(), &sphere, &at(Vec3::new(0.0, 0.5, 0.0)), &meshes));
    }

    #[test]
    fn test_visual_behaves_as_box() {
        let meshes = MeshStore::with_key();
        let visual = CollisionShape::visual(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0));
        let cuboid = CollisionShape::cuboid(Vec3::zeros(), Vec3::new(0.5, 0.5, 0.5));

        assert!(visual.intersects(&ShapePose::identity(), &cuboid, &at(Vec3::new(0.0, 2.2, 0.0)), &meshes));
        assert!(!visual.intersects(&ShapePose::identity(), &cuboid, &at(Vec3::new(0.0, 3.0, 0.0)), &meshes));
    }

    #[test]
    fn test_unsupported_pairs_never_collide() {
        let mut meshes = MeshStore::with_key();
        let handle = meshes.insert(TriangleBuffer::from_flat(vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]).unwrap());
        let mesh = CollisionShape::mesh(handle);
        let cuboid = CollisionShape::cuboid(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let plane = CollisionShape::plane(Vec3::y(), 0.0);

        assert!(!mesh.intersects(&ShapePose::identity(), &cuboid, &ShapePose::identity(), &meshes));
        assert!(!plane.intersects(&ShapePose::identity(), &plane, &ShapePose::identity(), &meshes));
    }

    #[test]
    fn test_box_triangles_follow_center_extent_and_matrix() {
        let meshes = MeshStore::with_key();
        let cuboid = CollisionShape::cuboid(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 0.5, 2.0));
        let mut triangles = Vec::new();
        cuboid.collect_world_triangles(&Mat4::new_translation(&Vec3::new(10.0, 0.0, 0.0)), &meshes, &mut triangles);

        assert_eq!(triangles.len(), 12);
        let max_y = triangles.iter().flat_map(|t| [t.v0.y, t.v1.y, t.v2.y]).fold(f32::MIN, f32::max);
        let min_x = triangles.iter().flat_map(|t| [t.v0.x, t.v1.x, t.v2.x]).fold(f32::MAX, f32::min);
        assert!((max_y - 1.5).abs() < 1e-6);
        assert!((min_x - 8.0).abs() < 1e-6);
    }
}
