//! Triangle buffers for mesh collision
//!
//! Geometry arrives from the asset side as flat vertex positions. Only
//! non-indexed triangle lists (9 floats per triangle) are usable by the
//! collision code; other layouts are stored but skipped at query time.
//!
//! The unit box and unit sphere are shared primitive meshes that box and
//! sphere shapes are tessellated from.

use super::primitives::Triangle;
use crate::foundation::collections::{HandleMap, MeshHandle};
use crate::foundation::math::Vec3;
use crate::physics::PhysicsError;
use std::f32::consts::PI;
use std::sync::OnceLock;

/// Floats per triangle in a flat buffer
pub const FLOATS_PER_TRIANGLE: usize = 9;

/// Mesh assets keyed by handle
pub type MeshStore = HandleMap<MeshHandle, TriangleBuffer>;

/// Primitive assembly of a vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    /// Independent triangles, three vertices each
    #[default]
    Triangles,
    /// Triangle strip
    TriangleStrip,
    /// Line list
    Lines,
    /// Point list
    Points,
}

/// Vertex positions plus optional indices
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleBuffer {
    positions: Vec<f32>,
    indices: Option<Vec<u32>>,
    topology: Topology,
}

impl TriangleBuffer {
    /// Non-indexed triangle list in `[x, y, z, x, y, z, x, y, z, ...]` layout
    pub fn from_flat(positions: Vec<f32>) -> Result<Self, PhysicsError> {
        if positions.len() % FLOATS_PER_TRIANGLE != 0 {
            return Err(PhysicsError::InvalidTriangleBuffer { len: positions.len() });
        }
        Ok(Self {
            positions,
            indices: None,
            topology: Topology::Triangles,
        })
    }

    /// Triangle list from raw native-endian `f32` vertex bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PhysicsError> {
        let float_size = std::mem::size_of::<f32>();
        if bytes.len() % float_size != 0 {
            return Err(PhysicsError::InvalidTriangleBuffer { len: bytes.len() });
        }
        let positions = bytes
            .chunks_exact(float_size)
            .map(bytemuck::pod_read_unaligned::<f32>)
            .collect();
        Self::from_flat(positions)
    }

    /// Build from triangles
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let positions = triangles
            .iter()
            .flat_map(|t| [t.v0, t.v1, t.v2])
            .flat_map(|v| [v.x, v.y, v.z])
            .collect();
        Self {
            positions,
            indices: None,
            topology: Topology::Triangles,
        }
    }

    /// Indexed vertex buffer (3 floats per vertex). Stored as-is; the
    /// collision code does not resolve indices.
    pub fn indexed(positions: Vec<f32>, indices: Vec<u32>) -> Result<Self, PhysicsError> {
        if positions.len() % 3 != 0 {
            return Err(PhysicsError::InvalidTriangleBuffer { len: positions.len() });
        }
        Ok(Self {
            positions,
            indices: Some(indices),
            topology: Topology::Triangles,
        })
    }

    /// Override the primitive topology
    #[must_use]
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    /// Raw positions
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Index list, if any
    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    /// Primitive topology
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// True for a non-indexed triangle list, the only layout collision reads
    pub fn is_triangle_soup(&self) -> bool {
        self.indices.is_none() && self.topology == Topology::Triangles
    }

    /// Triangle count of a triangle soup (zero for anything else)
    pub fn triangle_count(&self) -> usize {
        if self.is_triangle_soup() {
            self.positions.len() / FLOATS_PER_TRIANGLE
        } else {
            0
        }
    }

    /// Iterate triangles in model space. Empty unless `is_triangle_soup`.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        let values: &[f32] = if self.is_triangle_soup() { &self.positions } else { &[] };
        values.chunks_exact(FLOATS_PER_TRIANGLE).filter_map(Triangle::from_slice)
    }

    /// Distance of the farthest vertex from the origin
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .chunks_exact(3)
            .map(|v| Vec3::new(v[0], v[1], v[2]).magnitude_squared())
            .fold(0.0_f32, f32::max)
            .sqrt()
    }
}

const SPHERE_STACKS: usize = 8;
const SPHERE_SLICES: usize = 16;

/// Cube spanning `[-1, 1]` on every axis, outward counter-clockwise winding
pub fn unit_box() -> &'static TriangleBuffer {
    static UNIT_BOX: OnceLock<TriangleBuffer> = OnceLock::new();
    UNIT_BOX.get_or_init(|| {
        let axes = [Vec3::x(), Vec3::y(), Vec3::z()];
        let mut triangles = Vec::with_capacity(12);
        for axis in 0..3 {
            for sign in [1.0_f32, -1.0] {
                let normal = axes[axis] * sign;
                // u x v == normal keeps the winding outward
                let (u, v) = if sign > 0.0 {
                    (axes[(axis + 1) % 3], axes[(axis + 2) % 3])
                } else {
                    (axes[(axis + 2) % 3], axes[(axis + 1) % 3])
                };
                let corners = [normal - u - v, normal + u - v, normal + u + v, normal - u + v];
                triangles.push(Triangle::new(corners[0], corners[1], corners[2]));
                triangles.push(Triangle::new(corners[0], corners[2], corners[3]));
            }
        }
        TriangleBuffer::from_triangles(&triangles)
    })
}

/// Latitude/longitude sphere of radius 1, outward winding
pub fn unit_sphere() -> &'static TriangleBuffer {
    static UNIT_SPHERE: OnceLock<TriangleBuffer> = OnceLock::new();
    UNIT_SPHERE.get_or_init(|| {
        let vertex = |stack: usize, slice: usize| {
            let theta = PI * stack as f32 / SPHERE_STACKS as f32;
            let phi = 2.0 * PI * slice as f32 / SPHERE_SLICES as f32;
            Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin())
        };

        let mut triangles = Vec::with_capacity(2 * SPHERE_STACKS * SPHERE_SLICES);
        for stack in 0..SPHERE_STACKS {
            for slice in 0..SPHERE_SLICES {
                let a = vertex(stack, slice);
                let b = vertex(stack, slice + 1);
                let c = vertex(stack + 1, slice + 1);
                let d = vertex(stack + 1, slice);
                // Pole rows collapse one triangle of the quad
                if stack != 0 {
                    triangles.push(Triangle::new(a, b, c));
                }
                if stack != SPHERE_STACKS - 1 {
                    triangles.push(Triangle::new(a, c, d));
                }
            }
        }
        TriangleBuffer::from_triangles(&triangles)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_flat_rejects_partial_triangles() {
        assert_eq!(
            TriangleBuffer::from_flat(vec![0.0; 10]),
            Err(PhysicsError::InvalidTriangleBuffer { len: 10 })
        );
        assert_eq!(TriangleBuffer::from_flat(vec![0.0; 18]).unwrap().triangle_count(), 2);
    }

    #[test]
    fn test_from_bytes_reads_f32_positions() {
        let floats: [f32; 9] = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0];
        let bytes: Vec<u8> = floats.iter().flat_map(|f| f.to_ne_bytes()).collect();

        let buffer = TriangleBuffer::from_bytes(&bytes).unwrap();
        assert_eq!(buffer.positions(), &floats);
        assert!(TriangleBuffer::from_bytes(&bytes[..7]).is_err());
    }

    #[test]
    fn test_indexed_and_non_triangle_buffers_yield_no_triangles() {
        let indexed = TriangleBuffer::indexed(vec![0.0; 9], vec![0, 1, 2]).unwrap();
        assert!(!indexed.is_triangle_soup());
        assert_eq!(indexed.triangles().count(), 0);

        let lines = TriangleBuffer::from_flat(vec![0.0; 9]).unwrap().with_topology(Topology::Lines);
        assert_eq!(lines.triangle_count(), 0);
        assert_eq!(lines.triangles().count(), 0);
    }

    #[test]
    fn test_unit_box_faces_point_outward() {
        let cube = unit_box();
        assert_eq!(cube.triangle_count(), 12);
        for triangle in cube.triangles() {
            let outward = triangle.centroid();
            assert!(triangle.normal().dot(&outward) > 0.0);
        }
        assert_relative_eq!(cube.bounding_radius(), 3.0_f32.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_unit_sphere_is_closed_and_outward() {
        let sphere = unit_sphere();
        assert_eq!(sphere.triangle_count(), 2 * SPHERE_STACKS * SPHERE_SLICES - 2 * SPHERE_SLICES);
        for triangle in sphere.triangles() {
            assert!(triangle.normal().dot(&triangle.centroid()) > 0.0);
        }
        assert_relative_eq!(sphere.bounding_radius(), 1.0, epsilon = 1e-5);
    }
}
