//! Scene-to-annotation projection and visibility
//!
//! Turns a frame of scene state into detector training data. The pieces,
//! leaves first:
//!
//! - [`bbox`] - Pixel and normalized boxes, annotation records
//! - [`projection`] - Object mesh to pixel-space bounding box
//! - [`validation`] - Degenerate and border-touching box rejection
//! - [`visibility`] - Sparse ray-grid line-of-sight sampling
//! - [`volume`] - Signed-tetrahedron mesh volume
//! - [`frame`] - Per-frame context handed to writers
//! - [`yolo_writer`] - One YOLO text file per frame
//! - [`meta_writer`] - One JSON metadata file per frame

pub mod bbox;
pub mod projection;
pub mod validation;
pub mod visibility;
pub mod volume;
pub mod frame;
pub mod yolo_writer;
pub mod meta_writer;

pub use bbox::{AnnotationRecord, BoundingBox2D, NormalizedBox};
pub use projection::CameraProjector;
pub use validation::{BoundingBoxValidator, EdgeDistances, Rejection, DEFAULT_EDGE_EPSILON};
pub use visibility::{only_visible_objects, VisibilitySample, VisibilitySampler, DEFAULT_DOWNSAMPLE_FACTOR};
pub use volume::{object_volume, signed_volume};
pub use frame::{FrameContext, FrameWriter};
pub use yolo_writer::AnnotationEmitter;
pub use meta_writer::{meta_info_path, MetadataRecord, MetadataRecorder};

use thiserror::Error;

/// Errors raised while producing annotation output
///
/// All of these abort the run; rejected boxes are not errors.
#[derive(Error, Debug)]
pub enum AnnotationError {
    /// An object selected for annotation has no integer `classId`
    #[error(
        "There is no classId attribute registered to the object: {object}. \
         You have to assign the attribute to every object you want to annotate"
    )]
    MissingClassId {
        /// Name of the offending object
        object: String,
    },

    /// The output the writer depends on was never registered
    #[error("There is no output registered with key {key}. Are you sure you ran the rendering step before?")]
    UnregisteredOutput {
        /// The missing key
        key: String,
    },

    /// Image or file type outside the supported set
    #[error("Unsupported image/file type: {0}")]
    UnsupportedFileType(String),

    /// Output path pattern without a usable frame placeholder
    #[error("Invalid output path pattern: {0}")]
    InvalidPathPattern(String),

    /// An annotation line could not be parsed back
    #[error("Malformed annotation record: {0}")]
    MalformedRecord(String),

    /// A handle no longer resolves to a scene object
    #[error("Unknown scene object: {0}")]
    UnknownObject(String),

    /// Filesystem failure while writing a frame file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
