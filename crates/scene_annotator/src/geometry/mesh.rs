//! World-space triangle meshes for ray queries
//!
//! Meshes are stored in model space by the scene and transformed on demand;
//! a [`WorldSpaceMesh`] is the transformed copy used for one frame.

use crate::foundation::math::Vec3;
use super::primitives::{BoundingSphere, Ray, Triangle};

/// World-space triangle soup with a bounding sphere for early rejection
#[derive(Debug, Clone)]
pub struct WorldSpaceMesh {
    /// Triangles in world space
    pub triangles: Vec<Triangle>,
    /// Sphere enclosing every vertex
    pub bounds: BoundingSphere,
}

impl WorldSpaceMesh {
    /// Build a mesh and its bounding sphere from world-space triangles
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let vertices: Vec<Vec3> = triangles
            .iter()
            .flat_map(|tri| [tri.v0, tri.v1, tri.v2])
            .collect();
        let bounds = BoundingSphere::enclosing(&vertices);

        Self { triangles, bounds }
    }

    /// Distance to the closest triangle hit along the ray, if any
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        if self.triangles.is_empty() {
            return None;
        }

        // First check bounding sphere
        self.bounds.intersect_ray(ray)?;

        self.triangles
            .iter()
            .filter_map(|triangle| triangle.intersect_ray(ray).map(|(t, _, _)| t))
            .fold(None, |closest: Option<f32>, t| match closest {
                Some(best) if best <= t => Some(best),
                _ => Some(t),
            })
    }
}
