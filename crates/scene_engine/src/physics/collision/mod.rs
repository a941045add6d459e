//! Collision geometry and tests
//!
//! Shapes are stored in model space and evaluated against their owner's
//! world matrix only while a test runs.
//!
//! - [`primitives`] - planes, triangles and axis-aligned boxes
//! - [`mesh`] - triangle buffers and the shared unit box/sphere meshes
//! - [`shape`] - collider shapes and pairwise dispatch
//! - [`overlap`] - boolean volume overlap tests
//! - [`sweep`] - swept unit sphere against triangles

pub mod mesh;
pub mod overlap;
pub mod primitives;
pub mod shape;
pub mod sweep;

pub use mesh::{unit_box, unit_sphere, MeshStore, Topology, TriangleBuffer};
pub use primitives::{Aabb, Plane, PlaneSide, Triangle};
pub use shape::{BoxShape, CollisionShape, MeshShape, ParticleShape, PlaneShape, ShapePose, SphereShape};
pub use sweep::{lowest_root, sweep_sphere, SweepHit};
