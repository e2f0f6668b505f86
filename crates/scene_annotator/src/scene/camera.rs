//! # Camera View
//!
//! The camera as the annotation pipeline sees it: a world pose plus the four
//! corners of the view frame in camera-local space.
//!
//! ## Coordinate System
//! Camera-local space is right-handed with:
//! - X+ = Right
//! - Y+ = Up
//! - Z- = Viewing direction
//!
//! The frame corners all lie on the plane `z = -depth`. For perspective
//! cameras a point at distance `d` in front of the camera is inside the view
//! when its `(x, y)` scaled by `depth / d` falls inside the corners; for
//! orthographic cameras no scaling happens.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Quat, Transform, Vec3};

/// Projection model of the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraProjection {
    /// Pinhole camera, rays diverge from the camera position
    Perspective,
    /// Parallel projection
    Orthographic,
}

/// Four corners of the view frame in camera-local space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameCorners {
    /// Top-left corner
    pub top_left: Vec3,
    /// Top-right corner
    pub top_right: Vec3,
    /// Bottom-left corner
    pub bottom_left: Vec3,
    /// Bottom-right corner
    pub bottom_right: Vec3,
}

impl FrameCorners {
    /// Symmetric frame with the given half extents at `z = -depth`
    pub fn symmetric(half_width: f32, half_height: f32, depth: f32) -> Self {
        Self {
            top_left: Vec3::new(-half_width, half_height, -depth),
            top_right: Vec3::new(half_width, half_height, -depth),
            bottom_left: Vec3::new(-half_width, -half_height, -depth),
            bottom_right: Vec3::new(half_width, -half_height, -depth),
        }
    }

    /// Distance of the frame plane in front of the camera
    pub fn depth(&self) -> f32 {
        -self.top_left.z
    }

    /// Left edge x coordinate
    pub fn left(&self) -> f32 {
        self.top_left.x
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.top_right.x
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.top_left.y
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.bottom_left.y
    }
}

/// Camera pose and intrinsics for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    /// Camera position in world space
    pub position: Vec3,
    /// Camera orientation, mapping camera-local to world directions
    pub rotation: Quat,
    /// Projection model
    pub projection: CameraProjection,
    /// View frame corners in camera-local space
    pub frame: FrameCorners,
}

impl CameraView {
    /// Create a perspective camera
    ///
    /// The field of view spans the larger of the two render axes, the other
    /// axis follows the aspect ratio.
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `rotation` - Camera orientation
    /// * `fov_degrees` - Field of view along the larger render axis
    /// * `width` - Render width in pixels
    /// * `height` - Render height in pixels
    pub fn perspective(position: Vec3, rotation: Quat, fov_degrees: f32, width: f32, height: f32) -> Self {
        let half_extent = (utils::deg_to_rad(fov_degrees) * 0.5).tan();
        let (half_width, half_height) = fit_to_larger_axis(half_extent, width, height);

        Self {
            position,
            rotation,
            projection: CameraProjection::Perspective,
            frame: FrameCorners::symmetric(half_width, half_height, 1.0),
        }
    }

    /// Create an orthographic camera whose larger axis spans `ortho_scale` world units
    pub fn orthographic(position: Vec3, rotation: Quat, ortho_scale: f32, width: f32, height: f32) -> Self {
        let (half_width, half_height) = fit_to_larger_axis(ortho_scale * 0.5, width, height);

        Self {
            position,
            rotation,
            projection: CameraProjection::Orthographic,
            frame: FrameCorners::symmetric(half_width, half_height, 1.0),
        }
    }

    /// Orientation that points the camera from `position` at `target`
    ///
    /// The up vector doesn't need to be perpendicular to the view direction;
    /// it only has to be non-parallel.
    pub fn look_at_rotation(position: Vec3, target: Vec3, up: Vec3) -> Quat {
        // face_towards maps local +Z onto its argument, the camera looks down -Z
        Quat::face_towards(&(position - target), &up)
    }

    /// Camera pose as a transform with unit scale
    pub fn pose(&self) -> Transform {
        Transform::from_position_rotation(self.position, self.rotation)
    }

    /// Replace the pose, keeping the intrinsics
    pub fn set_pose(&mut self, pose: &Transform) {
        self.position = pose.position;
        self.rotation = pose.rotation;
        log::trace!("Camera pose updated to: {:?}", self.position);
    }

    /// Map a camera-local point to world space
    pub fn local_to_world(&self, local: &Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Map a world point to camera-local space
    pub fn world_to_local(&self, world: &Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position)
    }
}

fn fit_to_larger_axis(half_extent: f32, width: f32, height: f32) -> (f32, f32) {
    if width >= height {
        (half_extent, half_extent * height / width)
    } else {
        (half_extent * width / height, half_extent)
    }
}
