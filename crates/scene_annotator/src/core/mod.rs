//! # Core Pipeline Module
//!
//! Shared configuration types used to assemble an annotation run.
//!
//! ## Organization
//!
//! - **Config**: Pipeline, frame range, sampling and writer configuration

pub mod config;

// Re-export commonly used config types
pub use config::{
    Config,
    ConfigError,
    FrameConfig,
    ObjectSelection,
    PipelineConfig,
    ValidationConfig,
    VisibilityConfig,
    WriterConfig,
};
