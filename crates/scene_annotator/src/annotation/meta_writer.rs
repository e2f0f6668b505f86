//! Per-frame metadata writer
//!
//! Writes `meta_info_<frame:04>.json` holding a JSON array with one object
//! per recorded scene object. Only objects whose projected box passes
//! validation are recorded. Each entry starts with the object's `name`
//! followed by the requested attributes in request order.
//!
//! Attribute names resolve as follows:
//! - `volume` and `cp_volume` are computed from the world-space mesh
//! - `cp_<name>` reads the custom property `<name>`
//! - anything else is a built-in attribute (`name`, `type`, `location`,
//!   `rotation_euler`, `scale`) or a user attribute
//!
//! Unresolvable attributes are written as `null`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::scene::{ObjectId, SceneObject};
use super::frame::{write_file, FrameContext, FrameWriter};
use super::volume::object_volume;
use super::AnnotationError;

/// Attribute names that trigger a volume computation
const VOLUME_ATTRIBUTES: [&str; 2] = ["volume", "cp_volume"];

/// Path of the metadata file for one frame
pub fn meta_info_path(output_dir: &Path, frame: i32) -> PathBuf {
    output_dir.join(format!("meta_info_{frame:04}.json"))
}

/// Attributes of one object at one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    /// Object name
    pub name: String,
    /// Requested attributes in request order, `name` excluded
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Records chosen attributes of a fixed set of objects every frame
#[derive(Debug, Clone)]
pub struct MetadataRecorder {
    objects: Vec<ObjectId>,
    attributes: Vec<String>,
    only_visible: bool,
}

impl MetadataRecorder {
    /// Record `attributes` for every one of `objects`
    pub fn new(objects: Vec<ObjectId>, attributes: Vec<String>) -> Self {
        Self {
            objects,
            attributes,
            only_visible: false,
        }
    }

    /// Restrict records to objects visible at the frame
    #[must_use]
    pub fn with_only_visible(mut self, only_visible: bool) -> Self {
        self.only_visible = only_visible;
        self
    }

    /// Requested attribute names
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Records that would be written for the context's frame
    pub fn record(&self, ctx: &FrameContext<'_>) -> Result<Vec<MetadataRecord>, AnnotationError> {
        let (width, height) = (ctx.render_width(), ctx.render_height());
        let mut records = Vec::with_capacity(self.objects.len());

        for &id in &self.objects {
            let object = ctx.object(id)?;
            if self.only_visible && !ctx.is_visible(id) {
                continue;
            }
            if let Err(rejection) = ctx.validator().check(&ctx.project(object), width, height) {
                log::debug!("Frame {}: not recording '{}', {rejection}", ctx.frame(), object.name);
                continue;
            }

            let mut attributes = Map::new();
            for attribute in self.attributes.iter().filter(|attribute| *attribute != "name") {
                let value = resolve(object, attribute)?.unwrap_or_else(|| {
                    log::warn!(
                        "Object '{}' has no attribute '{}', writing null",
                        object.name,
                        attribute
                    );
                    Value::Null
                });
                attributes.insert(attribute.clone(), value);
            }

            records.push(MetadataRecord {
                name: object.name.clone(),
                attributes,
            });
        }

        Ok(records)
    }
}

fn resolve(object: &SceneObject, attribute: &str) -> Result<Option<Value>, AnnotationError> {
    if VOLUME_ATTRIBUTES.contains(&attribute) {
        return Ok(Some(Value::from(object_volume(object))));
    }

    object
        .resolve_attribute(attribute)
        .map(serde_json::to_value)
        .transpose()
        .map_err(AnnotationError::from)
}

impl FrameWriter for MetadataRecorder {
    fn name(&self) -> &str {
        "meta_information"
    }

    fn write_frame(&mut self, ctx: &FrameContext<'_>) -> Result<(), AnnotationError> {
        let records = self.record(ctx)?;
        let path = meta_info_path(ctx.output_dir(), ctx.frame());

        write_file(&path, |writer| {
            serde_json::to_writer(writer, &records)?;
            Ok(())
        })?;

        log::debug!("Frame {}: wrote metadata of {} objects", ctx.frame(), records.len());
        Ok(())
    }
}
