//! Camera projection of object bounds
//!
//! Every world-space vertex of the evaluated mesh is mapped into normalized
//! view coordinates through the camera frame corners: `(0, 0)` is the
//! bottom-left frame corner and `(1, 1)` the top-right one. The extremes are
//! then scaled to pixels, flipped so y grows downwards and rounded.
//!
//! Vertices at or behind the camera plane of a perspective camera are
//! skipped. Results are not clamped to the frame, so boxes of objects that
//! leave the view extend past it; the validator rejects those.

use crate::scene::{CameraProjection, CameraView, RenderSettings, SceneObject};
use crate::foundation::math::Vec3;
use super::bbox::BoundingBox2D;

/// Closest distance in front of a perspective camera that still projects
const MIN_PROJECTION_DEPTH: f32 = 1e-6;

/// Projects scene objects into pixel-space boxes for one render size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraProjector {
    render_width: f64,
    render_height: f64,
}

impl CameraProjector {
    /// Create a projector for an explicit render size
    pub const fn new(render_width: f64, render_height: f64) -> Self {
        Self { render_width, render_height }
    }

    /// Create a projector for the effective size of the render settings
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(settings.render_width(), settings.render_height())
    }

    /// Render width in pixels
    pub const fn render_width(&self) -> f64 {
        self.render_width
    }

    /// Render height in pixels
    pub const fn render_height(&self) -> f64 {
        self.render_height
    }

    /// Normalized view coordinates of a world point, `None` behind the camera
    pub fn world_to_view(&self, camera: &CameraView, world: &Vec3) -> Option<(f64, f64)> {
        let local = camera.world_to_local(world);
        let frame = &camera.frame;

        let (x, y) = match camera.projection {
            CameraProjection::Perspective => {
                let distance = -local.z;
                if distance <= MIN_PROJECTION_DEPTH {
                    return None;
                }
                let scale = frame.depth() / distance;
                (local.x * scale, local.y * scale)
            }
            CameraProjection::Orthographic => (local.x, local.y),
        };

        let u = f64::from(x - frame.left()) / f64::from(frame.right() - frame.left());
        let v = f64::from(y - frame.bottom()) / f64::from(frame.top() - frame.bottom());
        Some((u, v))
    }

    /// Pixel-space bounding box of an object
    ///
    /// Objects with no projectable vertices, or whose rounded width or
    /// height is zero, yield [`BoundingBox2D::zero`].
    pub fn project(&self, camera: &CameraView, object: &SceneObject) -> BoundingBox2D {
        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut projected = 0_usize;

        for vertex in object.mesh.world_vertices(&object.transform) {
            let Some((u, v)) = self.world_to_view(camera, &vertex) else {
                continue;
            };
            min = (min.0.min(u), min.1.min(v));
            max = (max.0.max(u), max.1.max(v));
            projected += 1;
        }

        if projected == 0 {
            log::trace!("Object '{}' has no vertices in front of the camera", object.name);
            return BoundingBox2D::zero();
        }

        let width = ((max.0 - min.0) * self.render_width).round();
        let height = ((max.1 - min.1) * self.render_height).round();
        if width == 0.0 || height == 0.0 {
            return BoundingBox2D::zero();
        }

        BoundingBox2D {
            x: (min.0 * self.render_width).round(),
            y: (self.render_height - max.1 * self.render_height).round(),
            width,
            height,
        }
    }
}
