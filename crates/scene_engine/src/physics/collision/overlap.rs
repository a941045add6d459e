//! Boolean overlap tests between primitive volumes
//!
//! All comparisons are strict with no epsilon: volumes that only touch do
//! not intersect.
//!
//! Box tests are axis-aligned in world space. The shape-aware variants rotate
//! a box's local center by the owner's world rotation but leave its extents
//! on the world axes.

use super::primitives::{Plane, Triangle};
use super::shape::{BoxShape, PlaneShape, ShapePose, SphereShape};
use crate::foundation::math::Vec3;

/// Box positioned at `box_world_pos` (center offset applied unrotated)
/// against a world-space sphere
pub fn box_intersects_with_sphere(shape: &BoxShape, box_world_pos: &Vec3, sphere_center: &Vec3, sphere_radius: f32) -> bool {
    let bounds = BoxShape::new(box_world_pos + shape.center, shape.extent).world_aabb(&ShapePose::identity());
    bounds.distance_squared_to_point(sphere_center) < sphere_radius * sphere_radius
}

/// Two boxes at world positions, center offsets applied unrotated
pub fn box_intersects_with_box(a: &BoxShape, a_world_pos: &Vec3, b: &BoxShape, b_world_pos: &Vec3) -> bool {
    let a_bounds = BoxShape::new(a_world_pos + a.center, a.extent).world_aabb(&ShapePose::identity());
    let b_bounds = BoxShape::new(b_world_pos + b.center, b.extent).world_aabb(&ShapePose::identity());
    a_bounds.intersects(&b_bounds)
}

/// Squared center distance against the squared radius sum
pub fn sphere_intersects_with_sphere(a_center: &Vec3, a_radius: f32, b_center: &Vec3, b_radius: f32) -> bool {
    let radius_sum = a_radius + b_radius;
    (a_center - b_center).magnitude_squared() < radius_sum * radius_sum
}

/// Box shape under a pose against a world-space sphere
pub fn box_shape_intersects_sphere(shape: &BoxShape, pose: &ShapePose, sphere_center: &Vec3, sphere_radius: f32) -> bool {
    box_intersects_with_sphere(
        &BoxShape::new(pose.rotation * shape.center, shape.extent),
        &pose.position,
        sphere_center,
        sphere_radius,
    )
}

/// Box shape against box shape, each under its own pose
pub fn box_shape_intersects_box_shape(a: &BoxShape, a_pose: &ShapePose, b: &BoxShape, b_pose: &ShapePose) -> bool {
    a.world_aabb(a_pose).intersects(&b.world_aabb(b_pose))
}

/// Sphere shape against sphere shape, each under its own pose
pub fn sphere_shape_intersects_sphere_shape(a: &SphereShape, a_pose: &ShapePose, b: &SphereShape, b_pose: &ShapePose) -> bool {
    sphere_intersects_with_sphere(&a.world_center(a_pose), a.radius, &b.world_center(b_pose), b.radius)
}

/// One-sided: a sphere collides when any part of it is behind the plane
pub fn plane_intersects_with_sphere(plane: &Plane, sphere_center: &Vec3, sphere_radius: f32) -> bool {
    plane.signed_distance(sphere_center) < sphere_radius
}

/// One-sided plane shape against a box shape's world bounds
pub fn plane_shape_intersects_box_shape(plane: &PlaneShape, plane_pose: &ShapePose, shape: &BoxShape, box_pose: &ShapePose) -> bool {
    let Some(plane) = plane.world_plane(plane_pose) else {
        return false;
    };
    let bounds = shape.world_aabb(box_pose);
    let extent = bounds.extent();
    let projected_radius = plane.normal.abs().dot(&extent);
    plane.signed_distance(&bounds.center()) - projected_radius < 0.0
}

/// World-space triangle against a world-space sphere
pub fn triangle_intersects_with_sphere(triangle: &Triangle, sphere_center: &Vec3, sphere_radius: f32) -> bool {
    (triangle.closest_point(sphere_center) - sphere_center).magnitude_squared() < sphere_radius * sphere_radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Quat};
    use std::f32::consts::FRAC_PI_2;

    fn unit_cube() -> BoxShape {
        BoxShape::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_identical_boxes_intersect_and_offset_boxes_do_not() {
        let cube = unit_cube();
        assert!(box_intersects_with_box(&cube, &Vec3::zeros(), &cube, &Vec3::zeros()));
        assert!(!box_intersects_with_box(&cube, &Vec3::zeros(), &cube, &Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_touching_volumes_do_not_intersect() {
        let cube = unit_cube();
        assert!(!box_intersects_with_box(&cube, &Vec3::zeros(), &cube, &Vec3::new(2.0, 0.0, 0.0)));
        assert!(!sphere_intersects_with_sphere(&Vec3::zeros(), 1.0, &Vec3::new(2.0, 0.0, 0.0), 1.0));
        assert!(!box_intersects_with_sphere(&cube, &Vec3::zeros(), &Vec3::new(2.0, 0.0, 0.0), 1.0));
    }

    #[test]
    fn test_sphere_sphere_is_symmetric() {
        let cases = [
            (Vec3::zeros(), 1.0, Vec3::new(1.5, 0.0, 0.0), 0.6),
            (Vec3::new(3.0, -1.0, 2.0), 0.2, Vec3::new(0.0, 0.0, 0.0), 3.0),
            (Vec3::new(0.0, 4.0, 0.0), 2.0, Vec3::new(0.0, 0.0, 0.0), 2.0),
        ];
        for (a, ra, b, rb) in cases {
            assert_eq!(
                sphere_intersects_with_sphere(&a, ra, &b, rb),
                sphere_intersects_with_sphere(&b, rb, &a, ra)
            );
        }
    }

    #[test]
    fn test_box_sphere_corner_distance() {
        let cube = unit_cube();
        // Corner at (1, 1, 0); sphere center sqrt(0.5) away diagonally
        let center = Vec3::new(1.5, 1.5, 0.0);
        assert!(box_intersects_with_sphere(&cube, &Vec3::zeros(), &center, 0.8));
        assert!(!box_intersects_with_sphere(&cube, &Vec3::zeros(), &center, 0.7));
    }

    #[test]
    fn test_rotation_moves_center_but_not_extent() {
        let offset_box = BoxShape::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(1.0, 0.1, 0.1));
        let rotated = ShapePose::from_matrix(Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2).to_homogeneous());

        // Center swings from +x to -z; the thin extent stays along world x.
        let probe = Vec3::new(0.9, 0.0, -3.0);
        assert!(box_shape_intersects_sphere(&offset_box, &rotated, &probe, 0.2));
        assert!(!box_shape_intersects_sphere(&offset_box, &ShapePose::identity(), &probe, 0.2));

        let along_z = Vec3::new(0.0, 0.0, -3.9);
        assert!(!box_shape_intersects_sphere(&offset_box, &rotated, &along_z, 0.2));
    }

    #[test]
    fn test_shape_wrappers_use_pose_translation() {
        let cube = unit_cube();
        let here = ShapePose::identity();
        let there = ShapePose::from_matrix(Mat4::new_translation(&Vec3::new(1.5, 0.0, 0.0)));
        assert!(box_shape_intersects_box_shape(&cube, &here, &cube, &there));

        let ball = SphereShape::new(Vec3::new(0.0, 1.0, 0.0), 0.5);
        let near = ShapePose::from_matrix(Mat4::new_translation(&Vec3::new(0.8, 0.0, 0.0)));
        let touching = ShapePose::from_matrix(Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)));
        assert!(sphere_shape_intersects_sphere_shape(&ball, &here, &ball, &near));
        assert!(!sphere_shape_intersects_sphere_shape(&ball, &here, &ball, &touching));
    }

    #[test]
    fn test_triangle_sphere() {
        let triangle = Triangle::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(triangle_intersects_with_sphere(&triangle, &Vec3::new(0.2, 0.3, 0.2), 0.5));
        assert!(!triangle_intersects_with_sphere(&triangle, &Vec3::new(2.0, 0.0, 2.0), 0.5));
    }
}
