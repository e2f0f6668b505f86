//! Math utilities and types
//!
//! Provides the fundamental math types shared by the projector, the
//! visibility sampler and the volume integration.

pub use nalgebra::{
    Vector2, Vector3,
    Matrix4,
    Quaternion,
    Unit,
};

use serde::{Deserialize, Serialize};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Object-to-world transform: position, rotation and non-uniform scale
///
/// Applied in scale → rotate → translate order, matching how a scene
/// host composes an object's world matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Builder-style scale override
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: &Point3) -> Point3 {
        let scaled = Point3::from(point.coords.component_mul(&self.scale));
        Point3::from(self.rotation * scaled.coords + self.position)
    }

    /// Rotation as XYZ euler angles in radians
    pub fn euler_angles(&self) -> Vec3 {
        let (roll, pitch, yaw) = self.rotation.euler_angles();
        Vec3::new(roll, pitch, yaw)
    }

    /// Interpolate between two transforms
    ///
    /// Position and scale are interpolated linearly, rotation spherically.
    pub fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(&other.position, t),
            rotation: self.rotation.slerp(&other.rotation, t),
            scale: self.scale.lerp(&other.scale, t),
        }
    }
}

/// Math utility functions
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Evenly spaced samples over `[start, end]`, endpoints included
    ///
    /// A single sample yields `start`; zero samples yield nothing.
    pub fn linspace(start: f32, end: f32, count: usize) -> Vec<f32> {
        match count {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (end - start) / (count - 1) as f32;
                (0..count).map(|i| start + step * i as f32).collect()
            }
        }
    }
}
