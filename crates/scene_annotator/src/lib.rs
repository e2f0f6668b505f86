//! # Scene Annotator
//!
//! Turns an animated 3D scene into per-frame training data for object
//! detectors.
//!
//! ## Features
//!
//! - **Bounding Boxes**: Camera projection of evaluated meshes into pixel boxes
//! - **Validation**: Rejection of degenerate and frame-clipped boxes
//! - **Visibility**: Sparse ray-grid line-of-sight sampling
//! - **YOLO Output**: One normalized text annotation file per frame
//! - **Metadata**: Per-frame JSON records of object attributes and mesh volume
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_annotator::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     scene_annotator::foundation::logging::init();
//!
//!     let camera = CameraView::perspective(
//!         Vec3::new(0.0, 0.0, 10.0),
//!         Quat::identity(),
//!         50.0,
//!         640.0,
//!         480.0,
//!     );
//!     let mut scene = SceneSnapshot::new(camera, RenderSettings::default());
//!     scene.add_object(
//!         SceneObject::new("crate", Arc::new(MeshData::cuboid(Vec3::new(0.5, 0.5, 0.5))))
//!             .with_attribute(CLASS_ID_ATTRIBUTE, 1_i64),
//!     );
//!
//!     let outputs = OutputRegistry::new()
//!         .with_output(OutputDescriptor::for_images(RGB_OUTPUT_KEY, "rgb_%04d", ImageType::Png));
//!     let config = PipelineConfig::load_from_file("pipeline.toml")?;
//!
//!     let mut orchestrator = FrameOrchestrator::from_config(&config, outputs, &scene)?;
//!     orchestrator.run(&mut scene)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core pipeline modules
pub mod core;
pub mod config;
pub mod foundation;
pub mod geometry;
pub mod scene;
pub mod annotation;
pub mod outputs;
pub mod orchestrator;
pub mod sampler;

#[cfg(test)]
mod tests;

/// Common imports for pipeline users
pub mod prelude {
    pub use crate::{
        annotation::{
            AnnotationEmitter, AnnotationError, AnnotationRecord, BoundingBox2D,
            BoundingBoxValidator, CameraProjector, FrameContext, FrameWriter, MetadataRecorder,
            NormalizedBox, VisibilitySampler,
        },
        config::{Config, ConfigError, ConfigFormat},
        core::config::{FrameConfig, ObjectSelection, PipelineConfig, WriterConfig},
        foundation::math::{Quat, Transform, Vec3},
        orchestrator::{FrameOrchestrator, FrameRange, PipelineError},
        outputs::{ImageType, OutputDescriptor, OutputRegistry, RGB_OUTPUT_KEY},
        scene::{
            CameraView, MeshData, ObjectId, RenderSettings, SceneObject, SceneProvider,
            SceneSnapshot, TransformTrack, CLASS_ID_ATTRIBUTE,
        },
    };
}
