//! Geometric primitives and ray queries
//!
//! - [`primitives`] - Basic geometric primitives (rays, spheres, triangles)
//! - [`mesh`] - World-space triangle meshes with nearest-hit queries

pub mod primitives;
pub mod mesh;

pub use primitives::{BoundingSphere, Ray, Triangle};
pub use mesh::WorldSpaceMesh;
