//! Scene snapshot provider contract
//!
//! The annotation pipeline never owns the scene. Everything it needs per
//! frame comes through [`SceneProvider`], and line-of-sight queries go
//! through the narrow [`RayCaster`] seam so the sampler does not depend on
//! any particular acceleration structure.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use super::camera::CameraView;
use super::object::{ObjectId, SceneObject};

/// Output resolution, frame rate and keyed frame range of the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Base horizontal resolution in pixels
    pub resolution_x: u32,
    /// Base vertical resolution in pixels
    pub resolution_y: u32,
    /// Percentage applied to the base resolution
    pub resolution_percentage: u32,
    /// Frames per second
    pub fps: u32,
    /// First frame of the scene range
    pub frame_start: i32,
    /// One past the last frame of the scene range
    pub frame_end: i32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution_x: 640,
            resolution_y: 480,
            resolution_percentage: 100,
            fps: 24,
            frame_start: 0,
            frame_end: 1,
        }
    }
}

impl RenderSettings {
    /// Settings for a static single-frame scene at the given resolution
    pub fn with_resolution(resolution_x: u32, resolution_y: u32) -> Self {
        Self {
            resolution_x,
            resolution_y,
            ..Self::default()
        }
    }

    /// Effective render width in pixels
    pub fn render_width(&self) -> f64 {
        f64::from(self.resolution_x) * f64::from(self.resolution_percentage) / 100.0
    }

    /// Effective render height in pixels
    pub fn render_height(&self) -> f64 {
        f64::from(self.resolution_y) * f64::from(self.resolution_percentage) / 100.0
    }
}

/// Nearest-hit ray query against the whole scene
pub trait RayCaster {
    /// Object hit first by the ray from `origin` along `direction`, if any
    fn cast_ray(&self, origin: Vec3, direction: Vec3) -> Option<ObjectId>;
}

/// Per-frame read access to the scene plus control over scene time
pub trait SceneProvider: RayCaster {
    /// Frame the snapshot currently reflects
    fn current_frame(&self) -> i32;

    /// Advance (or rewind) scene time, re-evaluating animated state
    fn set_frame(&mut self, frame: i32);

    /// Active camera at the current frame
    fn camera(&self) -> &CameraView;

    /// Resolution and timing settings
    fn render_settings(&self) -> &RenderSettings;

    /// Object by handle
    fn object(&self, id: ObjectId) -> Option<&SceneObject>;

    /// Handles of every object, in a stable order
    fn object_ids(&self) -> Vec<ObjectId>;

    /// Handle of the object with the given name
    fn find_object(&self, name: &str) -> Option<ObjectId> {
        self.object_ids()
            .into_iter()
            .find(|&id| self.object(id).is_some_and(|object| object.name == name))
    }
}
