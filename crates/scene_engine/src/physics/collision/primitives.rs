//! Primitive collision geometry
//!
//! Planes, triangles and axis-aligned boxes with the classification,
//! containment and closest-point queries the overlap and sweep tests use.

use crate::foundation::math::{transform_point, Mat4, Vec3};

/// Which side of a plane a point lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Positive half-space
    Front,
    /// Negative half-space
    Back,
    /// Exactly on the plane
    On,
}

/// Plane `normal . p + constant = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal
    pub normal: Vec3,
    /// Negated distance of the plane from the origin along the normal
    pub constant: f32,
}

impl Plane {
    /// Plane through `point` with the given (already normalized) normal
    pub fn from_point_normal(point: &Vec3, normal: &Vec3) -> Self {
        Self {
            normal: *normal,
            constant: -normal.dot(point),
        }
    }

    /// Plane of a triangle, normal following its winding.
    /// `None` for a degenerate triangle.
    pub fn from_triangle(triangle: &Triangle) -> Option<Self> {
        let normal = (triangle.v1 - triangle.v0)
            .cross(&(triangle.v2 - triangle.v0))
            .try_normalize(f32::EPSILON)?;
        Some(Self::from_point_normal(&triangle.v0, &normal))
    }

    /// Signed distance from the plane, positive in front
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }

    /// True when motion along `direction` approaches the front face
    pub fn is_front_facing_to(&self, direction: &Vec3) -> bool {
        self.normal.dot(direction) <= 0.0
    }

    /// Exact side classification
    pub fn classify(&self, point: &Vec3) -> PlaneSide {
        let distance = self.signed_distance(point);
        if distance > 0.0 {
            PlaneSide::Front
        } else if distance < 0.0 {
            PlaneSide::Back
        } else {
            PlaneSide::On
        }
    }
}

/// A triangle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub v0: Vec3,
    /// Second vertex
    pub v1: Vec3,
    /// Third vertex
    pub v2: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Build from 9 consecutive floats (x, y, z per vertex)
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        match values {
            [x0, y0, z0, x1, y1, z1, x2, y2, z2] => Some(Self::new(
                Vec3::new(*x0, *y0, *z0),
                Vec3::new(*x1, *y1, *z1),
                Vec3::new(*x2, *y2, *z2),
            )),
            _ => None,
        }
    }

    /// Unit normal (right-hand rule). Zero for a degenerate triangle.
    pub fn normal(&self) -> Vec3 {
        (self.v1 - self.v0)
            .cross(&(self.v2 - self.v0))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros)
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    /// Apply `f` to every vertex
    #[must_use]
    pub fn map(&self, f: impl Fn(&Vec3) -> Vec3) -> Self {
        Self::new(f(&self.v0), f(&self.v1), f(&self.v2))
    }

    /// Transform every vertex by an affine matrix
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        self.map(|vertex| transform_point(matrix, vertex))
    }

    /// Barycentric containment of a point assumed to lie in the triangle's
    /// plane. Edges and vertices count as inside.
    pub fn contains_point(&self, point: &Vec3) -> bool {
        let e0 = self.v1 - self.v0;
        let e1 = self.v2 - self.v0;
        let p = point - self.v0;

        let d00 = e0.dot(&e0);
        let d01 = e0.dot(&e1);
        let d11 = e1.dot(&e1);
        let d20 = p.dot(&e0);
        let d21 = p.dot(&e1);

        let denominator = d00 * d11 - d01 * d01;
        if denominator == 0.0 {
            return false;
        }
        let v = (d11 * d20 - d01 * d21) / denominator;
        let w = (d00 * d21 - d01 * d20) / denominator;
        v >= 0.0 && w >= 0.0 && v + w <= 1.0
    }

    /// Get the closest point on the triangle to a given point
    pub fn closest_point(&self, point: &Vec3) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        // Vertex region outside v0
        let v0_to_point = point - self.v0;
        let d1 = edge1.dot(&v0_to_point);
        let d2 = edge2.dot(&v0_to_point);
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.v0;
        }

        // Vertex region outside v1
        let v1_to_point = point - self.v1;
        let d3 = edge1.dot(&v1_to_point);
        let d4 = edge2.dot(&v1_to_point);
        if d3 >= 0.0 && d4 <= d3 {
            return self.v1;
        }

        // Vertex region outside v2
        let v2_to_point = point - self.v2;
        let d5 = edge1.dot(&v2_to_point);
        let d6 = edge2.dot(&v2_to_point);
        if d6 >= 0.0 && d5 <= d6 {
            return self.v2;
        }

        // Edge regions
        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            return self.v0 + edge1 * (d1 / (d1 - d3));
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            return self.v0 + edge2 * (d2 / (d2 - d6));
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return self.v1 + (self.v2 - self.v1) * w;
        }

        // Face region
        let denom = 1.0 / (va + vb + vc);
        self.v0 + edge1 * (vb * denom) + edge2 * (vc * denom)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Box spanning `center - extent ..= center + extent`
    pub fn from_center_extent(center: &Vec3, extent: &Vec3) -> Self {
        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half size along each axis
    pub fn extent(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Strict overlap on every axis; boxes that only touch do not intersect
    pub fn intersects(&self, other: &Self) -> bool {
        (0..3).all(|axis| self.min[axis] < other.max[axis] && self.max[axis] > other.min[axis])
    }

    /// Squared distance from a point to the box (zero inside)
    pub fn distance_squared_to_point(&self, point: &Vec3) -> f32 {
        (0..3)
            .map(|axis| {
                let value = point[axis];
                if value < self.min[axis] {
                    (self.min[axis] - value).powi(2)
                } else if value > self.max[axis] {
                    (value - self.max[axis]).powi(2)
                } else {
                    0.0
                }
            })
            .sum()
    }
}
