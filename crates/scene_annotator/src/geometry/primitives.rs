//! Primitive shapes and intersection algorithms
//!
//! Provides basic geometric primitives (rays, spheres, triangles) with
//! the intersection tests the visibility ray caster is built on.

use crate::foundation::math::Vec3;

/// A ray for ray casting
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A bounding sphere used as a cheap rejection test
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Smallest sphere around the centroid that contains every point
    pub fn enclosing(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Self::new(Vec3::zeros(), 0.0);
        }

        let center = points.iter().fold(Vec3::zeros(), |acc, p| acc + p) / points.len() as f32;
        let radius = points
            .iter()
            .map(|p| (p - center).magnitude())
            .fold(0.0f32, f32::max);

        Self::new(center, radius)
    }

    /// Test ray intersection with this sphere
    ///
    /// Returns the distance to the closest non-negative hit, which is the
    /// exit point when the origin lies inside the sphere.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        // Solve: |origin + t*direction - center|^2 = radius^2
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t1 = (-b - sqrt_discriminant) / (2.0 * a);
        let t2 = (-b + sqrt_discriminant) / (2.0 * a);

        if t1 >= 0.0 {
            Some(t1)
        } else if t2 >= 0.0 {
            Some(t2)
        } else {
            None
        }
    }
}

/// A triangle in world space
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

    /// Calculates the normal of the triangle (right-hand rule)
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).normalize()
    }

    /// Signed volume of the tetrahedron spanned by the origin and this triangle
    ///
    /// Positive when the triangle winds counter-clockwise seen from outside
    /// a surface that encloses the origin side.
    pub fn signed_volume_from_origin(&self) -> f64 {
        let v0 = self.v0.cast::<f64>();
        let v1 = self.v1.cast::<f64>();
        let v2 = self.v2.cast::<f64>();
        v0.dot(&v1.cross(&v2)) / 6.0
    }

    /// Möller-Trumbore ray-triangle intersection algorithm
    ///
    /// Returns (t, u, v) barycentric coordinates if hit, None otherwise.
    /// See: "Fast, Minimum Storage Ray/Triangle Intersection" by Möller & Trumbore
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32, f32)> {
        const EPSILON: f32 = 0.000_001;

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;

        let h = ray.direction.cross(&edge2);
        let a = edge1.dot(&h);

        // Ray parallel to triangle
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * ray.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        if t >= 0.0 {
            Some((t, u, v))
        } else {
            None
        }
    }
}
