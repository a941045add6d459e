//! Swept unit sphere against triangles
//!
//! Every quantity here is in ellipsoid space, where the moving volume is a
//! sphere of radius 1. A triangle is tested against its plane first; when the
//! plane contact lies outside the triangle the sweep falls back to the three
//! vertices and the three edges.

use super::primitives::{Plane, Triangle};
use crate::foundation::math::Vec3;

/// Earliest contact found by a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Fraction of the velocity travelled before contact, in `[0, 1]`
    pub time: f32,
    /// Distance travelled before contact (`time * |velocity|`)
    pub distance: f32,
    /// Contact point on the geometry
    pub contact: Vec3,
    /// Point on the sphere surface touching the geometry at `time`
    pub sphere_point: Vec3,
    /// Plane of the triangle that was hit
    pub plane: Plane,
}

/// Smallest root of `a t^2 + b t + c = 0` in `(0, max)`.
///
/// A negative discriminant means no root. Degenerate coefficients are not
/// special-cased; NaN and infinite roots fail the range test.
pub fn lowest_root(a: f32, b: f32, c: f32, max: f32) -> Option<f32> {
    let determinant = b * b - 4.0 * a * c;
    if determinant < 0.0 {
        return None;
    }

    let sqrt_d = determinant.sqrt();
    let mut r1 = (-b - sqrt_d) / (2.0 * a);
    let mut r2 = (-b + sqrt_d) / (2.0 * a);
    if r1 > r2 {
        std::mem::swap(&mut r1, &mut r2);
    }

    if r1 > 0.0 && r1 < max {
        return Some(r1);
    }
    if r2 > 0.0 && r2 < max {
        return Some(r2);
    }
    None
}

/// Sweep a unit sphere at `base` along `velocity` against one triangle.
///
/// Returns the contact time within the frame and the contact point. Back
/// faces, triangles the motion moves away from and zero motion never hit.
pub fn sweep_triangle(triangle: &Triangle, base: &Vec3, velocity: &Vec3) -> Option<(f32, Vec3)> {
    if velocity.magnitude_squared() == 0.0 {
        return None;
    }
    let plane = Plane::from_triangle(triangle)?;
    if !plane.is_front_facing_to(velocity) {
        return None;
    }

    let signed_distance = plane.signed_distance(base);
    let normal_dot_velocity = plane.normal.dot(velocity);

    let embedded = normal_dot_velocity == 0.0;
    let mut started_inside = false;
    let t0 = if embedded {
        // Moving parallel to the plane: inside the slab for the whole frame or never
        if signed_distance.abs() >= 1.0 {
            return None;
        }
        0.0
    } else {
        let mut t0 = (-1.0 - signed_distance) / normal_dot_velocity;
        let mut t1 = (1.0 - signed_distance) / normal_dot_velocity;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > 1.0 || t1 < 0.0 {
            return None;
        }
        started_inside = t0 < 0.0;
        t0.clamp(0.0, 1.0)
    };

    if !embedded {
        // Starting closer than one unit: the contact is the foot of the
        // center on the plane, not a point below the surface.
        let plane_contact = if started_inside {
            base - plane.normal * signed_distance
        } else {
            base - plane.normal + velocity * t0
        };
        if triangle.contains_point(&plane_contact) {
            return Some((t0, plane_contact));
        }
    }

    let mut best: Option<(f32, Vec3)> = None;
    let mut t = 1.0_f32;
    let velocity_sq = velocity.magnitude_squared();

    // Vertices
    for vertex in [triangle.v0, triangle.v1, triangle.v2] {
        let a = velocity_sq;
        let b = 2.0 * velocity.dot(&(base - vertex));
        let c = (vertex - base).magnitude_squared() - 1.0;
        if let Some(root) = lowest_root(a, b, c, t) {
            t = root;
            best = Some((root, vertex));
        }
    }

    // Edges
    for (start, end) in [
        (triangle.v0, triangle.v1),
        (triangle.v1, triangle.v2),
        (triangle.v2, triangle.v0),
    ] {
        let edge = end - start;
        let base_to_vertex = start - base;
        let edge_sq = edge.magnitude_squared();
        let edge_dot_velocity = edge.dot(velocity);
        let edge_dot_base_to_vertex = edge.dot(&base_to_vertex);

        let a = edge_sq * -velocity_sq + edge_dot_velocity * edge_dot_velocity;
        let b = edge_sq * (2.0 * velocity.dot(&base_to_vertex)) - 2.0 * edge_dot_velocity * edge_dot_base_to_vertex;
        let c = edge_sq * (1.0 - base_to_vertex.magnitude_squared()) + edge_dot_base_to_vertex * edge_dot_base_to_vertex;

        if let Some(root) = lowest_root(a, b, c, t) {
            let f = (edge_dot_velocity * root - edge_dot_base_to_vertex) / edge_sq;
            if (0.0..=1.0).contains(&f) {
                t = root;
                best = Some((root, start + edge * f));
            }
        }
    }

    best
}

/// Nearest hit of a unit sphere sweep across a triangle soup
pub fn sweep_sphere(triangles: &[Triangle], base: &Vec3, velocity: &Vec3) -> Option<SweepHit> {
    let speed = velocity.magnitude();
    if speed == 0.0 {
        return None;
    }

    let mut nearest: Option<SweepHit> = None;
    for triangle in triangles {
        let Some((time, contact)) = sweep_triangle(triangle, base, velocity) else {
            continue;
        };
        let distance = time * speed;
        if nearest.is_some_and(|hit| hit.distance <= distance) {
            continue;
        }

        let Some(plane) = Plane::from_triangle(triangle) else {
            continue;
        };
        let center = base + velocity * time;
        let sphere_point = (contact - center)
            .try_normalize(f32::EPSILON)
            .map_or(contact, |direction| center + direction);
        nearest = Some(SweepHit {
            time,
            distance,
            contact,
            sphere_point,
            plane,
        });
    }
    nearest
}
