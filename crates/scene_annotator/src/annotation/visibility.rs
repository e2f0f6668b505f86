//! Visibility sampling
//!
//! Casts a sparse grid of rays through the camera frame and collects every
//! object hit first by at least one ray. The grid has `render_size /
//! downsample_factor` samples per axis, spread evenly over the frame
//! including its corners.
//!
//! # Limitations
//!
//! This is a cheap approximation. Objects that fall between grid rays are
//! reported as invisible even when a few pixels of them show in the render,
//! so small or distant objects can be dropped. Lower the downsample factor
//! to trade speed for recall.

use std::collections::HashSet;

use crate::foundation::math::{utils, Vec3};
use crate::scene::{CameraProjection, CameraView, ObjectId, RayCaster, RenderSettings, SceneProvider};

/// Default ratio between render pixels and visibility rays per axis
pub const DEFAULT_DOWNSAMPLE_FACTOR: u32 = 10;

/// One ray of the visibility grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilitySample {
    /// Ray origin in world space
    pub origin: Vec3,
    /// Ray direction in world space, not necessarily normalized
    pub direction: Vec3,
}

impl VisibilitySample {
    /// Object hit first by this ray
    pub fn cast(&self, caster: &(impl RayCaster + ?Sized)) -> Option<ObjectId> {
        caster.cast_ray(self.origin, self.direction)
    }
}

/// Ray-grid visibility sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilitySampler {
    downsample_factor: u32,
}

impl Default for VisibilitySampler {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNSAMPLE_FACTOR)
    }
}

impl VisibilitySampler {
    /// Create a sampler; a factor of zero is treated as one
    pub fn new(downsample_factor: u32) -> Self {
        Self {
            downsample_factor: downsample_factor.max(1),
        }
    }

    /// Ratio between render pixels and rays per axis
    pub const fn downsample_factor(&self) -> u32 {
        self.downsample_factor
    }

    /// Number of rays along each axis
    pub fn grid_resolution(&self, settings: &RenderSettings) -> (usize, usize) {
        let factor = f64::from(self.downsample_factor);
        (
            (settings.render_width() / factor) as usize,
            (settings.render_height() / factor) as usize,
        )
    }

    /// All rays of the grid, row by row from the top-left corner
    pub fn samples(&self, camera: &CameraView, settings: &RenderSettings) -> Vec<VisibilitySample> {
        let (columns, rows) = self.grid_resolution(settings);
        let frame = &camera.frame;

        let xs = utils::linspace(frame.top_left.x, frame.top_right.x, columns);
        let ys = utils::linspace(frame.top_left.y, frame.bottom_left.y, rows);
        let depth = frame.top_left.z;
        let forward = camera.rotation * Vec3::new(0.0, 0.0, -1.0);

        let mut samples = Vec::with_capacity(columns * rows);
        for &y in &ys {
            for &x in &xs {
                let sample = match camera.projection {
                    CameraProjection::Perspective => {
                        let through = camera.local_to_world(&Vec3::new(x, y, depth));
                        VisibilitySample {
                            origin: camera.position,
                            direction: through - camera.position,
                        }
                    }
                    CameraProjection::Orthographic => VisibilitySample {
                        origin: camera.local_to_world(&Vec3::new(x, y, 0.0)),
                        direction: forward,
                    },
                };
                samples.push(sample);
            }
        }
        samples
    }

    /// Objects hit first by at least one grid ray at the scene's current frame
    pub fn visible_objects<S: SceneProvider + ?Sized>(&self, scene: &S) -> HashSet<ObjectId> {
        let samples = self.samples(scene.camera(), scene.render_settings());
        let visible: HashSet<ObjectId> = samples.iter().filter_map(|sample| sample.cast(scene)).collect();

        log::debug!(
            "Visibility: {} rays hit {} distinct objects at frame {}",
            samples.len(),
            visible.len(),
            scene.current_frame()
        );
        visible
    }
}

/// Filter candidates down to the visible ones, preserving their order
pub fn only_visible_objects<S: SceneProvider + ?Sized>(
    scene: &S,
    candidates: &[ObjectId],
    sampler: &VisibilitySampler,
) -> Vec<ObjectId> {
    let visible = sampler.visible_objects(scene);
    candidates.iter().copied().filter(|id| visible.contains(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Quat, Transform};
    use crate::scene::{MeshData, SceneObject, SceneSnapshot};
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn cube(name: &str, half: f32, position: Vec3) -> SceneObject {
        SceneObject::new(name, Arc::new(MeshData::cuboid(Vec3::new(half, half, half))))
            .with_transform(Transform::from_position(position))
    }

    fn scene() -> SceneSnapshot {
        let camera = CameraView::perspective(Vec3::zeros(), Quat::identity(), 90.0, 640.0, 480.0);
        SceneSnapshot::new(camera, RenderSettings::default())
    }

    #[test]
    fn test_grid_resolution_truncates() {
        let settings = RenderSettings {
            resolution_x: 645,
            resolution_y: 480,
            resolution_percentage: 50,
            ..RenderSettings::default()
        };
        assert_eq!(VisibilitySampler::default().grid_resolution(&settings), (32, 24));
        assert_eq!(VisibilitySampler::new(0).downsample_factor(), 1);
    }

    #[test]
    fn test_samples_cover_frame_corners() {
        let camera = CameraView::perspective(Vec3::zeros(), Quat::identity(), 90.0, 640.0, 480.0);
        let samples = VisibilitySampler::default().samples(&camera, &RenderSettings::default());

        assert_eq!(samples.len(), 64 * 48);
        let first = samples[0];
        let last = samples[samples.len() - 1];
        assert_relative_eq!(first.direction, camera.frame.top_left, epsilon = 1e-6);
        assert_relative_eq!(last.direction, camera.frame.bottom_right, epsilon = 1e-6);
    }

    #[test]
    fn test_occluded_object_is_invisible() {
        let mut scene = scene();
        let front = scene.add_object(cube("front", 4.0, Vec3::new(0.0, 0.0, -10.0)));
        let hidden = scene.add_object(cube("hidden", 1.0, Vec3::new(0.0, 0.0, -30.0)));

        let visible = VisibilitySampler::default().visible_objects(&scene);
        assert!(visible.contains(&front));
        assert!(!visible.contains(&hidden));
    }

    #[test]
    fn test_object_outside_view_is_invisible() {
        let mut scene = scene();
        let behind = scene.add_object(cube("behind", 1.0, Vec3::new(0.0, 0.0, 10.0)));
        let aside = scene.add_object(cube("aside", 1.0, Vec3::new(50.0, 0.0, -10.0)));

        let visible = VisibilitySampler::default().visible_objects(&scene);
        assert!(!visible.contains(&behind));
        assert!(!visible.contains(&aside));
    }

    #[test]
    fn test_only_visible_objects_keeps_candidate_order() {
        let mut scene = scene();
        let left = scene.add_object(cube("left", 1.0, Vec3::new(-3.0, 0.0, -10.0)));
        let hidden = scene.add_object(cube("hidden", 0.5, Vec3::new(-12.0, 0.0, -40.0)));
        let right = scene.add_object(cube("right", 1.0, Vec3::new(3.0, 0.0, -10.0)));

        let filtered = only_visible_objects(&scene, &[right, hidden, left], &VisibilitySampler::default());
        assert_eq!(filtered, vec![right, left]);
    }

    #[test]
    fn test_orthographic_rays_are_parallel() {
        let camera = CameraView::orthographic(Vec3::zeros(), Quat::identity(), 20.0, 640.0, 480.0);
        let samples = VisibilitySampler::new(80).samples(&camera, &RenderSettings::default());

        assert_eq!(samples.len(), 8 * 6);
        for sample in samples {
            assert_relative_eq!(sample.direction, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
            assert_relative_eq!(sample.origin.z, 0.0, epsilon = 1e-6);
        }
    }
}
