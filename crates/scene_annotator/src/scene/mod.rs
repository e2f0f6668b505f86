//! Scene snapshot model
//!
//! Read-only view of the host scene at one frame: camera, render settings,
//! objects with their evaluated meshes and attributes, and a nearest-hit ray
//! query. The module also ships an in-memory implementation and the scope
//! guard used to restore scene time after a pass.
//!
//! # Module Organization
//!
//! - [`camera`] - Camera pose and view frame corners
//! - [`mesh`] - Model-space polygon meshes
//! - [`object`] - Scene objects, handles and typed attributes
//! - [`animation`] - Keyframed transform tracks
//! - [`provider`] - The provider and ray caster traits
//! - [`snapshot`] - In-memory provider
//! - [`guard`] - Frame restore guard

pub mod camera;
pub mod mesh;
pub mod object;
pub mod animation;
pub mod provider;
pub mod snapshot;
pub mod guard;

pub use camera::{CameraProjection, CameraView, FrameCorners};
pub use mesh::MeshData;
pub use object::{AttributeValue, ObjectId, SceneObject, CLASS_ID_ATTRIBUTE, CUSTOM_PROPERTY_PREFIX};
pub use animation::TransformTrack;
pub use provider::{RayCaster, RenderSettings, SceneProvider};
pub use snapshot::SceneSnapshot;
pub use guard::FrameGuard;

use thiserror::Error;

/// Scene access errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// No object with that name or handle
    #[error("Unknown scene object: {0}")]
    UnknownObject(String),

    /// Mesh data failed validation
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),
}
