//! Per-frame writer context
//!
//! The orchestrator builds one [`FrameContext`] after moving the scene to a
//! frame and hands it to every writer in turn. Visibility is expensive, so
//! the visible set is computed on first request and shared by all writers of
//! that frame.

use std::cell::OnceCell;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::outputs::OutputRegistry;
use crate::scene::{ObjectId, SceneObject, SceneProvider};
use super::bbox::BoundingBox2D;
use super::projection::CameraProjector;
use super::validation::BoundingBoxValidator;
use super::visibility::VisibilitySampler;
use super::AnnotationError;

/// Everything a writer may read while producing output for one frame
pub struct FrameContext<'a> {
    frame: i32,
    scene: &'a dyn SceneProvider,
    output_dir: &'a Path,
    outputs: &'a OutputRegistry,
    validator: &'a BoundingBoxValidator,
    sampler: &'a VisibilitySampler,
    projector: CameraProjector,
    visible: OnceCell<HashSet<ObjectId>>,
}

impl<'a> FrameContext<'a> {
    /// Create the context for the frame the scene is currently at
    pub fn new(
        scene: &'a dyn SceneProvider,
        output_dir: &'a Path,
        outputs: &'a OutputRegistry,
        validator: &'a BoundingBoxValidator,
        sampler: &'a VisibilitySampler,
    ) -> Self {
        Self {
            frame: scene.current_frame(),
            projector: CameraProjector::from_settings(scene.render_settings()),
            scene,
            output_dir,
            outputs,
            validator,
            sampler,
            visible: OnceCell::new(),
        }
    }

    /// Frame being written
    pub const fn frame(&self) -> i32 {
        self.frame
    }

    /// The scene, positioned at [`frame`](Self::frame)
    pub fn scene(&self) -> &'a dyn SceneProvider {
        self.scene
    }

    /// Directory that receives writer output
    pub fn output_dir(&self) -> &'a Path {
        self.output_dir
    }

    /// Outputs registered by earlier stages
    pub fn outputs(&self) -> &'a OutputRegistry {
        self.outputs
    }

    /// Box validator shared by all writers
    pub fn validator(&self) -> &'a BoundingBoxValidator {
        self.validator
    }

    /// Effective render width in pixels
    pub const fn render_width(&self) -> f64 {
        self.projector.render_width()
    }

    /// Effective render height in pixels
    pub const fn render_height(&self) -> f64 {
        self.projector.render_height()
    }

    /// Resolve an object handle
    pub fn object(&self, id: ObjectId) -> Result<&'a SceneObject, AnnotationError> {
        self.scene
            .object(id)
            .ok_or_else(|| AnnotationError::UnknownObject(format!("{id:?}")))
    }

    /// Pixel-space bounding box of an object at this frame
    pub fn project(&self, object: &SceneObject) -> BoundingBox2D {
        self.projector.project(self.scene.camera(), object)
    }

    /// Objects visible at this frame, sampled on first use
    pub fn visible_objects(&self) -> &HashSet<ObjectId> {
        self.visible.get_or_init(|| self.sampler.visible_objects(self.scene))
    }

    /// Whether an object is visible at this frame
    pub fn is_visible(&self, id: ObjectId) -> bool {
        self.visible_objects().contains(&id)
    }
}

/// A pipeline stage that writes output for each frame
pub trait FrameWriter {
    /// Name used in log messages
    fn name(&self) -> &str;

    /// Produce this writer's output for the context's frame
    fn write_frame(&mut self, ctx: &FrameContext<'_>) -> Result<(), AnnotationError>;
}

/// Create `path`, fill it through `write` and flush it before returning
///
/// Parent directories are created as needed. The file is closed on every
/// exit path; a failed write leaves a partial file behind.
pub(crate) fn write_file<F>(path: &Path, write: F) -> Result<(), AnnotationError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), AnnotationError>,
{
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}
