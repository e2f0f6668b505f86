//! Registered pipeline outputs
//!
//! Earlier pipeline stages (the renderer, most importantly) register the
//! files they produce under a key, with a printf-style frame placeholder in
//! the path. Writers look those entries up to derive their own per-frame
//! file names next to the rendered images.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationError;

/// Key under which the color renderer registers its images
pub const RGB_OUTPUT_KEY: &str = "colors";

/// Image formats the renderer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageType {
    /// Lossless PNG
    Png,
    /// JPEG
    Jpeg,
}

impl ImageType {
    /// File extension without the dot
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Recognize an image file extension, case-insensitively
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

impl FromStr for ImageType {
    type Err = AnnotationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_uppercase().as_str() {
            "PNG" => Ok(Self::Png),
            "JPEG" | "JPG" => Ok(Self::Jpeg),
            _ => Err(AnnotationError::UnsupportedFileType(name.to_string())),
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => f.write_str("PNG"),
            Self::Jpeg => f.write_str("JPEG"),
        }
    }
}

/// A per-frame file series produced by a pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    /// Lookup key
    pub key: String,
    /// Path pattern with a `%d` or `%0Nd` frame placeholder
    pub path: String,
    /// Format version of the files
    pub version: String,
}

impl OutputDescriptor {
    /// Create a descriptor
    pub fn new(key: impl Into<String>, path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            version: version.into(),
        }
    }

    /// Descriptor for a rendered image series, e.g. `rgb_%04d` + PNG
    pub fn for_images(key: impl Into<String>, stem_pattern: &str, image_type: ImageType) -> Self {
        Self::new(key, format!("{stem_pattern}.{}", image_type.extension()), "1.0.0")
    }

    /// Path of the file for one frame
    pub fn frame_path(&self, frame: i32) -> Result<PathBuf, AnnotationError> {
        format_frame_pattern(&self.path, frame).map(PathBuf::from)
    }

    /// Path of the text annotation belonging to this image series at one frame
    ///
    /// The image extension is swapped for `txt`. Relative patterns are
    /// resolved against `output_dir`.
    pub fn annotation_path(&self, output_dir: &Path, frame: i32) -> Result<PathBuf, AnnotationError> {
        let image_path = self.frame_path(frame)?;

        let extension = image_path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default();
        if ImageType::from_extension(extension).is_none() {
            return Err(AnnotationError::UnsupportedFileType(format!(
                "'{}' (output '{}' must be a png or jpg image series)",
                image_path.display(),
                self.key
            )));
        }

        Ok(output_dir.join(image_path.with_extension("txt")))
    }
}

/// Outputs registered so far in this pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRegistry {
    outputs: Vec<OutputDescriptor>,
}

impl OutputRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an output, replacing any previous one with the same key
    pub fn register(&mut self, output: OutputDescriptor) {
        log::debug!("Registering output '{}' -> {}", output.key, output.path);
        match self.outputs.iter_mut().find(|existing| existing.key == output.key) {
            Some(existing) => *existing = output,
            None => self.outputs.push(output),
        }
    }

    /// Builder-style registration
    #[must_use]
    pub fn with_output(mut self, output: OutputDescriptor) -> Self {
        self.register(output);
        self
    }

    /// Look up an output by key
    pub fn find(&self, key: &str) -> Option<&OutputDescriptor> {
        self.outputs.iter().find(|output| output.key == key)
    }

    /// Look up an output that must have been registered by an earlier stage
    pub fn require(&self, key: &str) -> Result<&OutputDescriptor, AnnotationError> {
        self.find(key).ok_or_else(|| AnnotationError::UnregisteredOutput { key: key.to_string() })
    }

    /// All registered outputs in registration order
    pub fn iter(&self) -> impl Iterator<Item = &OutputDescriptor> {
        self.outputs.iter()
    }

    /// Number of registered outputs
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// True when nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// Substitute the frame number into a printf-style path pattern
///
/// Supports `%d`, zero-padded `%0Nd` and the `%%` escape. The pattern must
/// contain at least one frame placeholder.
pub fn format_frame_pattern(pattern: &str, frame: i32) -> Result<String, AnnotationError> {
    let invalid = |reason: &str| AnnotationError::InvalidPathPattern(format!("'{pattern}': {reason}"));

    let mut formatted = String::with_capacity(pattern.len() + 8);
    let mut placeholders = 0;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            formatted.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            formatted.push('%');
            continue;
        }

        let zero_pad = chars.next_if_eq(&'0').is_some();
        let mut width = String::new();
        while let Some(digit) = chars.next_if(char::is_ascii_digit) {
            width.push(digit);
        }
        if chars.next() != Some('d') {
            return Err(invalid("only %d and %0Nd placeholders are supported"));
        }

        let width: usize = if width.is_empty() {
            0
        } else {
            width.parse().map_err(|_| invalid("placeholder width is too large"))?
        };
        if zero_pad {
            formatted.push_str(&format!("{frame:0width$}"));
        } else {
            formatted.push_str(&format!("{frame:width$}"));
        }
        placeholders += 1;
    }

    if placeholders == 0 {
        return Err(invalid("no frame placeholder"));
    }
    Ok(formatted)
}
