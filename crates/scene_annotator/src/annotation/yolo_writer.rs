//! YOLO annotation writer
//!
//! Writes one text file per frame next to the rendered image, one line per
//! annotated object: `<classId> <cx> <cy> <w> <h> `. The file name is the
//! image file name with its extension replaced by `txt`.
//!
//! Every selected object must carry an integer `classId`; a missing one
//! aborts the run. Objects whose box fails validation are skipped, as are
//! invisible objects when the visibility filter is on; skips are logged at
//! debug level. A frame with no surviving objects still gets an empty file.

use std::io::Write;

use crate::outputs::RGB_OUTPUT_KEY;
use crate::scene::ObjectId;
use super::bbox::AnnotationRecord;
use super::frame::{write_file, FrameContext, FrameWriter};
use super::AnnotationError;

/// Emits YOLO text annotations for a fixed set of objects
#[derive(Debug, Clone)]
pub struct AnnotationEmitter {
    objects: Vec<ObjectId>,
    rgb_output_key: String,
    only_visible: bool,
    avoid_rendering: bool,
}

impl AnnotationEmitter {
    /// Annotate the given objects
    pub fn new(objects: Vec<ObjectId>) -> Self {
        Self {
            objects,
            rgb_output_key: RGB_OUTPUT_KEY.to_string(),
            only_visible: false,
            avoid_rendering: false,
        }
    }

    /// Read image paths from a different registered output
    #[must_use]
    pub fn with_rgb_output_key(mut self, key: impl Into<String>) -> Self {
        self.rgb_output_key = key.into();
        self
    }

    /// Toggle the visibility filter
    #[must_use]
    pub fn with_only_visible(mut self, only_visible: bool) -> Self {
        self.only_visible = only_visible;
        self
    }

    /// Turn the writer into a no-op, for debug runs without rendering
    #[must_use]
    pub fn with_avoid_rendering(mut self, avoid_rendering: bool) -> Self {
        if avoid_rendering {
            log::info!("Avoid rendering is on, no annotations will be written");
        }
        self.avoid_rendering = avoid_rendering;
        self
    }

    /// Objects this writer annotates
    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    /// Records that would be written for the context's frame
    pub fn annotate(&self, ctx: &FrameContext<'_>) -> Result<Vec<AnnotationRecord>, AnnotationError> {
        let (width, height) = (ctx.render_width(), ctx.render_height());
        let mut records = Vec::new();

        for &id in &self.objects {
            let object = ctx.object(id)?;
            let class_id = object.class_id().ok_or_else(|| AnnotationError::MissingClassId {
                object: object.name.clone(),
            })?;

            if self.only_visible && !ctx.is_visible(id) {
                log::debug!("Frame {}: skipping '{}', not visible", ctx.frame(), object.name);
                continue;
            }

            let bbox = ctx.project(object);
            if let Err(rejection) = ctx.validator().check(&bbox, width, height) {
                log::debug!("Frame {}: skipping '{}', {rejection}", ctx.frame(), object.name);
                continue;
            }

            records.push(AnnotationRecord {
                frame: ctx.frame(),
                class_id,
                bbox: bbox.normalize(width, height),
            });
        }

        Ok(records)
    }
}

impl FrameWriter for AnnotationEmitter {
    fn name(&self) -> &str {
        "yolo_annotations"
    }

    fn write_frame(&mut self, ctx: &FrameContext<'_>) -> Result<(), AnnotationError> {
        if self.avoid_rendering {
            return Ok(());
        }

        let path = ctx
            .outputs()
            .require(&self.rgb_output_key)?
            .annotation_path(ctx.output_dir(), ctx.frame())?;
        let records = self.annotate(ctx)?;

        write_file(&path, |writer| {
            for record in &records {
                writer.write_all(record.to_line().as_bytes())?;
            }
            Ok(())
        })?;

        log::debug!(
            "Frame {}: wrote {} annotations to {}",
            ctx.frame(),
            records.len(),
            path.display()
        );
        Ok(())
    }
}
