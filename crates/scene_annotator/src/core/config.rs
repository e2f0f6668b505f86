//! # Pipeline Configuration
//!
//! Everything an annotation run reads from its configuration file: where
//! output goes, which frames to process, sampling and validation tuning, and
//! the ordered list of writers.
//!
//! ## Example (TOML)
//!
//! ```toml
//! output_dir = "output"
//!
//! [frames]
//! for_animation = true
//! animation_start = 0.0
//! animation_end = 2.0
//!
//! [[writers]]
//! module = "yolo_annotations"
//! objects = "all"
//!
//! [[writers]]
//! module = "meta_information"
//! objects = { named = ["rock_01", "rock_02"] }
//! attributes = ["location", "volume", "cp_material"]
//! ```

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};
use crate::annotation::{DEFAULT_DOWNSAMPLE_FACTOR, DEFAULT_EDGE_EPSILON};
use crate::outputs::RGB_OUTPUT_KEY;
use crate::scene::{ObjectId, SceneError, SceneProvider};

/// Frame range selection
///
/// With `for_animation` on, frames `[start * fps, end * fps)` are processed,
/// times being in seconds. Otherwise the scene's own frame range applies,
/// which is a single static frame unless the host says differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FrameConfig {
    /// Derive the range from `animation_start`/`animation_end`
    pub for_animation: bool,
    /// Start time in seconds, inclusive
    pub animation_start: f64,
    /// End time in seconds, exclusive
    pub animation_end: f64,
}

impl FrameConfig {
    /// Animate from `start` to `end` seconds
    pub fn animation(start: f64, end: f64) -> Self {
        Self {
            for_animation: true,
            animation_start: start,
            animation_end: end,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.for_animation && self.animation_end < self.animation_start {
            return Err(ConfigError::InvalidValue {
                key: "frames.animation_end".to_string(),
                reason: format!(
                    "end ({}) lies before start ({})",
                    self.animation_end, self.animation_start
                ),
            });
        }
        Ok(())
    }
}

/// Visibility sampling tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Render pixels per visibility ray along each axis
    pub downsample_factor: u32,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            downsample_factor: DEFAULT_DOWNSAMPLE_FACTOR,
        }
    }
}

/// Bounding box validation tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum distance in pixels between a box edge and the frame border
    pub epsilon: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EDGE_EPSILON,
        }
    }
}

/// Which scene objects a writer handles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObjectSelection {
    /// Every object in the scene
    #[default]
    All,
    /// The listed objects, by name
    Named(Vec<String>),
}

impl ObjectSelection {
    /// Resolve the selection against a scene
    ///
    /// Fails on the first name that matches no object.
    pub fn resolve(&self, scene: &(impl SceneProvider + ?Sized)) -> Result<Vec<ObjectId>, SceneError> {
        match self {
            Self::All => Ok(scene.object_ids()),
            Self::Named(names) => names
                .iter()
                .map(|name| {
                    scene
                        .find_object(name)
                        .ok_or_else(|| SceneError::UnknownObject(name.clone()))
                })
                .collect(),
        }
    }
}

fn default_rgb_output_key() -> String {
    RGB_OUTPUT_KEY.to_string()
}

/// One writer stage, tagged by `module`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "module", rename_all = "snake_case")]
pub enum WriterConfig {
    /// YOLO text annotations next to the rendered images
    YoloAnnotations {
        /// Registered output holding the rendered image paths
        #[serde(default = "default_rgb_output_key")]
        rgb_output_key: String,
        /// Skip writing entirely
        #[serde(default)]
        avoid_rendering: bool,
        /// Objects to annotate
        #[serde(default)]
        objects: ObjectSelection,
        /// Only annotate objects the visibility sampler sees
        #[serde(default)]
        only_visible: bool,
    },
    /// Per-frame JSON attribute dumps
    MetaInformation {
        /// Objects to record
        #[serde(default)]
        objects: ObjectSelection,
        /// Attribute names to record for each object
        #[serde(default)]
        attributes: Vec<String>,
        /// Only record objects the visibility sampler sees
        #[serde(default)]
        only_visible: bool,
    },
}

impl WriterConfig {
    /// Stage name as written in configuration files
    pub const fn module_name(&self) -> &'static str {
        match self {
            Self::YoloAnnotations { .. } => "yolo_annotations",
            Self::MetaInformation { .. } => "meta_information",
        }
    }

    /// Default YOLO writer over all objects
    pub fn yolo_annotations() -> Self {
        Self::YoloAnnotations {
            rgb_output_key: default_rgb_output_key(),
            avoid_rendering: false,
            objects: ObjectSelection::All,
            only_visible: false,
        }
    }

    /// Metadata writer over all objects
    pub fn meta_information(attributes: Vec<String>) -> Self {
        Self::MetaInformation {
            objects: ObjectSelection::All,
            attributes,
            only_visible: false,
        }
    }
}

/// # Pipeline Configuration
///
/// Top-level configuration of an annotation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory receiving all writer output
    pub output_dir: String,
    /// Frame range selection
    pub frames: FrameConfig,
    /// Visibility sampling tuning
    pub visibility: VisibilityConfig,
    /// Box validation tuning
    pub validation: ValidationConfig,
    /// Writers, run in order for every frame
    pub writers: Vec<WriterConfig>,
}

impl PipelineConfig {
    /// Create a configuration writing to `output_dir`
    pub fn new(output_dir: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            frames: FrameConfig::default(),
            visibility: VisibilityConfig::default(),
            validation: ValidationConfig::default(),
            writers: Vec::new(),
        }
    }

    /// Set the frame range selection
    #[must_use]
    pub fn with_frames(mut self, frames: FrameConfig) -> Self {
        self.frames = frames;
        self
    }

    /// Append a writer stage
    #[must_use]
    pub fn with_writer(mut self, writer: WriterConfig) -> Self {
        self.writers.push(writer);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "output_dir".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.visibility.downsample_factor == 0 {
            return Err(ConfigError::InvalidValue {
                key: "visibility.downsample_factor".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.validation.epsilon.is_nan() || self.validation.epsilon < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "validation.epsilon".to_string(),
                reason: format!("must be a non-negative number, got {}", self.validation.epsilon),
            });
        }
        self.frames.validate()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new("output")
    }
}

impl Config for PipelineConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    const PIPELINE_TOML: &str = r#"
        output_dir = "out"

        [frames]
        for_animation = true
        animation_start = 0.5
        animation_end = 2.0

        [visibility]
        downsample_factor = 20

        [[writers]]
        module = "yolo_annotations"
        objects = "all"
        only_visible = true

        [[writers]]
        module = "meta_information"
        objects = { named = ["rock_01"] }
        attributes = ["location", "volume"]
    "#;

    #[test]
    fn test_parse_toml_pipeline() {
        let config = PipelineConfig::from_str_with_format(PIPELINE_TOML, ConfigFormat::Toml).unwrap();

        assert_eq!(config.output_dir, "out");
        assert_eq!(config.frames, FrameConfig::animation(0.5, 2.0));
        assert_eq!(config.visibility.downsample_factor, 20);
        assert_eq!(config.validation, ValidationConfig::default());
        assert_eq!(
            config.writers,
            vec![
                WriterConfig::YoloAnnotations {
                    rgb_output_key: "colors".to_string(),
                    avoid_rendering: false,
                    objects: ObjectSelection::All,
                    only_visible: true,
                },
                WriterConfig::MetaInformation {
                    objects: ObjectSelection::Named(vec!["rock_01".to_string()]),
                    attributes: vec!["location".to_string(), "volume".to_string()],
                    only_visible: false,
                },
            ]
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_writer_module_is_rejected() {
        let text = r#"
            [[writers]]
            module = "coco_annotations"
        "#;
        assert!(matches!(
            PipelineConfig::from_str_with_format(text, ConfigFormat::Toml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = PipelineConfig::from_str_with_format("", ConfigFormat::Toml).unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert!(!config.frames.for_animation);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = PipelineConfig::default();
        config.visibility.downsample_factor = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));

        let config = PipelineConfig::default().with_frames(FrameConfig::animation(2.0, 1.0));
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));

        let mut config = PipelineConfig::default();
        config.validation.epsilon = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_reload_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        let config = PipelineConfig::new("renders")
            .with_frames(FrameConfig::animation(0.0, 1.0))
            .with_writer(WriterConfig::yolo_annotations())
            .with_writer(WriterConfig::meta_information(vec!["cp_volume".to_string()]));

        config.save_to_file(&path).unwrap();
        assert_eq!(PipelineConfig::load_from_file(&path).unwrap(), config);
    }
}
