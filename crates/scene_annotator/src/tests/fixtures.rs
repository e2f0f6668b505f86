//! Shared scene builders for pipeline tests
//!
//! The camera sits at the origin looking down -Z with a 90 degree field of
//! view over a 640x480 render, so the view frame at distance `d` spans
//! `[-d, d]` horizontally and `[-0.75 d, 0.75 d]` vertically.

use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::foundation::math::{Quat, Transform, Vec3};
use crate::outputs::{ImageType, OutputDescriptor, OutputRegistry, RGB_OUTPUT_KEY};
use crate::scene::{
    CameraView, MeshData, ObjectId, RayCaster, RenderSettings, SceneObject, SceneProvider,
    SceneSnapshot,
};

pub const WIDTH: f64 = 640.0;
pub const HEIGHT: f64 = 480.0;

pub fn camera() -> CameraView {
    CameraView::perspective(Vec3::zeros(), Quat::identity(), 90.0, WIDTH as f32, HEIGHT as f32)
}

pub fn empty_scene() -> SceneSnapshot {
    crate::foundation::logging::init_for_tests();
    SceneSnapshot::new(camera(), RenderSettings::default())
}

/// Camera-facing quad at `depth` whose projection is the pixel rect `(x0, y0)-(x1, y1)`
pub fn panel_covering(name: &str, rect: [f64; 4], depth: f32) -> SceneObject {
    let [x0, y0, x1, y1] = rect;
    let world_x = |px: f64| ((2.0 * px / WIDTH - 1.0) as f32) * depth;
    let world_y = |py: f64| ((0.75 - 1.5 * py / HEIGHT) as f32) * depth;

    let (left, right) = (world_x(x0), world_x(x1));
    let (top, bottom) = (world_y(y0), world_y(y1));
    let mesh = MeshData::new(
        vec![
            Vec3::new(left, bottom, 0.0),
            Vec3::new(right, bottom, 0.0),
            Vec3::new(right, top, 0.0),
            Vec3::new(left, top, 0.0),
        ],
        vec![vec![0, 1, 2, 3]],
    )
    .unwrap();

    SceneObject::new(name, Arc::new(mesh))
        .with_transform(Transform::from_position(Vec3::new(0.0, 0.0, -depth)))
}

/// Axis-aligned cube with edge length `size`
pub fn cube(name: &str, size: f32, position: Vec3) -> SceneObject {
    let half = size / 2.0;
    SceneObject::new(name, Arc::new(MeshData::cuboid(Vec3::new(half, half, half))))
        .with_transform(Transform::from_position(position))
}

/// Registry with the color renderer's PNG series registered
pub fn rgb_outputs() -> OutputRegistry {
    OutputRegistry::new().with_output(OutputDescriptor::for_images(
        RGB_OUTPUT_KEY,
        "rgb_%04d",
        ImageType::Png,
    ))
}

pub fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap()
}

/// Provider wrapper counting ray queries
pub struct CountingScene {
    pub inner: SceneSnapshot,
    pub rays: Cell<usize>,
}

impl CountingScene {
    pub const fn new(inner: SceneSnapshot) -> Self {
        Self {
            inner,
            rays: Cell::new(0),
        }
    }
}

impl RayCaster for CountingScene {
    fn cast_ray(&self, origin: Vec3, direction: Vec3) -> Option<ObjectId> {
        self.rays.set(self.rays.get() + 1);
        self.inner.cast_ray(origin, direction)
    }
}

impl SceneProvider for CountingScene {
    fn current_frame(&self) -> i32 {
        self.inner.current_frame()
    }

    fn set_frame(&mut self, frame: i32) {
        self.inner.set_frame(frame);
    }

    fn camera(&self) -> &CameraView {
        self.inner.camera()
    }

    fn render_settings(&self) -> &RenderSettings {
        self.inner.render_settings()
    }

    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.inner.object(id)
    }

    fn object_ids(&self) -> Vec<ObjectId> {
        self.inner.object_ids()
    }
}
