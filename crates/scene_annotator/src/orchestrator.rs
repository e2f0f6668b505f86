//! Frame orchestration
//!
//! Drives the writers over a frame range. For every frame the scene is moved
//! to that frame first, then each writer runs in configuration order against
//! a shared [`FrameContext`]. The first error aborts the run; the scene frame
//! is restored either way.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::annotation::{
    AnnotationEmitter, AnnotationError, BoundingBoxValidator, FrameContext, FrameWriter,
    MetadataRecorder, VisibilitySampler,
};
use crate::config::ConfigError;
use crate::core::config::{FrameConfig, PipelineConfig, WriterConfig};
use crate::outputs::OutputRegistry;
use crate::scene::{FrameGuard, RenderSettings, SceneError, SceneProvider};

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Writer failure
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    /// Scene lookup failure while assembling writers
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Output directory could not be prepared
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert a time in seconds to a frame index, truncating toward zero
pub fn seconds_to_frames(seconds: f64, fps: u32) -> i32 {
    (seconds * f64::from(fps)) as i32
}

/// Half-open range of frames `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    /// First frame
    pub start: i32,
    /// One past the last frame
    pub end: i32,
}

impl FrameRange {
    /// Create a range
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Range selected by the frame configuration for a scene
    pub fn from_config(frames: &FrameConfig, settings: &RenderSettings) -> Self {
        if frames.for_animation {
            Self::new(
                seconds_to_frames(frames.animation_start, settings.fps),
                seconds_to_frames(frames.animation_end, settings.fps),
            )
        } else {
            Self::new(settings.frame_start, settings.frame_end)
        }
    }

    /// Frames in order
    pub fn iter(&self) -> Range<i32> {
        self.start..self.end
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        usize::try_from(self.end.saturating_sub(self.start)).unwrap_or(0)
    }

    /// True when no frame would be processed
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Build the writer a configuration entry describes
///
/// Object names are resolved against the scene here, once, so a misspelt
/// name fails before any output is written.
pub fn build_writer(
    config: &WriterConfig,
    scene: &(impl SceneProvider + ?Sized),
) -> Result<Box<dyn FrameWriter>, PipelineError> {
    let writer: Box<dyn FrameWriter> = match config {
        WriterConfig::YoloAnnotations {
            rgb_output_key,
            avoid_rendering,
            objects,
            only_visible,
        } => Box::new(
            AnnotationEmitter::new(objects.resolve(scene)?)
                .with_rgb_output_key(rgb_output_key.clone())
                .with_only_visible(*only_visible)
                .with_avoid_rendering(*avoid_rendering),
        ),
        WriterConfig::MetaInformation {
            objects,
            attributes,
            only_visible,
        } => Box::new(
            MetadataRecorder::new(objects.resolve(scene)?, attributes.clone())
                .with_only_visible(*only_visible),
        ),
    };
    Ok(writer)
}

/// Runs writers frame by frame
pub struct FrameOrchestrator {
    output_dir: PathBuf,
    outputs: OutputRegistry,
    frames: FrameConfig,
    validator: BoundingBoxValidator,
    sampler: VisibilitySampler,
    writers: Vec<Box<dyn FrameWriter>>,
}

impl FrameOrchestrator {
    /// Create an orchestrator with default tuning and no writers
    pub fn new(output_dir: impl Into<PathBuf>, outputs: OutputRegistry) -> Self {
        Self {
            output_dir: output_dir.into(),
            outputs,
            frames: FrameConfig::default(),
            validator: BoundingBoxValidator::default(),
            sampler: VisibilitySampler::default(),
            writers: Vec::new(),
        }
    }

    /// Assemble an orchestrator from configuration
    ///
    /// `outputs` holds what earlier stages (rendering) registered.
    pub fn from_config(
        config: &PipelineConfig,
        outputs: OutputRegistry,
        scene: &(impl SceneProvider + ?Sized),
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        let mut orchestrator = Self::new(&config.output_dir, outputs)
            .with_frames(config.frames.clone())
            .with_validator(BoundingBoxValidator::new(config.validation.epsilon))
            .with_sampler(VisibilitySampler::new(config.visibility.downsample_factor));

        for writer in &config.writers {
            log::debug!("Building writer '{}'", writer.module_name());
            orchestrator.add_writer(build_writer(writer, scene)?);
        }
        Ok(orchestrator)
    }

    /// Set the frame range selection
    #[must_use]
    pub fn with_frames(mut self, frames: FrameConfig) -> Self {
        self.frames = frames;
        self
    }

    /// Set the box validator
    #[must_use]
    pub fn with_validator(mut self, validator: BoundingBoxValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Set the visibility sampler
    #[must_use]
    pub fn with_sampler(mut self, sampler: VisibilitySampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Builder-style [`add_writer`](Self::add_writer)
    #[must_use]
    pub fn with_writer(mut self, writer: impl FrameWriter + 'static) -> Self {
        self.add_writer(Box::new(writer));
        self
    }

    /// Append a writer; writers run in insertion order
    pub fn add_writer(&mut self, writer: Box<dyn FrameWriter>) {
        self.writers.push(writer);
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Registered outputs, for stages that register late
    pub fn outputs_mut(&mut self) -> &mut OutputRegistry {
        &mut self.outputs
    }

    /// Number of writers
    pub fn writer_count(&self) -> usize {
        self.writers.len()
    }

    /// Process every frame of the configured range
    ///
    /// Returns the range that was processed. The scene is back at its
    /// original frame when this returns, whether it succeeded or not.
    pub fn run<S: SceneProvider>(&mut self, scene: &mut S) -> Result<FrameRange, PipelineError> {
        let range = FrameRange::from_config(&self.frames, scene.render_settings());
        if range.is_empty() {
            log::warn!("Frame range {}..{} is empty, nothing to do", range.start, range.end);
            return Ok(range);
        }

        fs::create_dir_all(&self.output_dir)?;
        log::info!(
            "Annotating frames {}..{} with {} writers into {}",
            range.start,
            range.end,
            self.writers.len(),
            self.output_dir.display()
        );

        let mut scene = FrameGuard::new(scene);
        for frame in range.iter() {
            scene.set_frame(frame);

            let ctx = FrameContext::new(
                &*scene,
                &self.output_dir,
                &self.outputs,
                &self.validator,
                &self.sampler,
            );
            for writer in &mut self.writers {
                log::trace!("Frame {frame}: running writer '{}'", writer.name());
                writer.write_frame(&ctx).map_err(|e| {
                    log::error!("Writer '{}' failed at frame {frame}: {e}", writer.name());
                    e
                })?;
            }
        }

        log::info!("Annotated {} frames", range.len());
        Ok(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_frames_truncates() {
        assert_eq!(seconds_to_frames(0.0, 24), 0);
        assert_eq!(seconds_to_frames(1.0, 24), 24);
        assert_eq!(seconds_to_frames(0.99, 24), 23);
        assert_eq!(seconds_to_frames(2.5, 30), 75);
    }

    #[test]
    fn test_frame_range_from_animation_config() {
        let settings = RenderSettings::default();
        let range = FrameRange::from_config(&FrameConfig::animation(0.5, 2.0), &settings);

        assert_eq!(range, FrameRange::new(12, 48));
        assert_eq!(range.len(), 36);
        assert_eq!(range.iter().last(), Some(47));
    }

    #[test]
    fn test_static_config_uses_scene_range() {
        let range = FrameRange::from_config(&FrameConfig::default(), &RenderSettings::default());
        assert_eq!(range, FrameRange::new(0, 1));
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_reversed_range_is_empty() {
        let range = FrameRange::new(5, 2);
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert_eq!(range.iter().count(), 0);
    }
}
