//! Scene objects and their attributes

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::foundation::math::Transform;
use super::mesh::MeshData;

slotmap::new_key_type! {
    /// Stable handle of an object inside a scene snapshot
    pub struct ObjectId;
}

/// Prefix that routes an attribute lookup to the custom property namespace
pub const CUSTOM_PROPERTY_PREFIX: &str = "cp_";

/// Attribute name carrying the detector class label
pub const CLASS_ID_ATTRIBUTE: &str = "classId";

/// A typed attribute value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
    /// Fixed-size numeric vector (locations, scales, angles)
    Vector(Vec<f64>),
}

impl AttributeValue {
    /// Integer payload, if this is an integer
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Vector(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<crate::foundation::math::Vec3> for AttributeValue {
    fn from(value: crate::foundation::math::Vec3) -> Self {
        Self::Vector(value.iter().map(|&c| f64::from(c)).collect())
    }
}

/// An object as seen at one frame
///
/// The mesh is shared with the scene host and never modified here.
#[derive(Debug, Clone)]
pub struct SceneObject {
    /// Unique object name
    pub name: String,
    /// Host object type, e.g. `MESH`
    pub object_type: String,
    /// Object-to-world transform at the current frame
    pub transform: Transform,
    /// Evaluated geometry in model space
    pub mesh: Arc<MeshData>,
    /// User attributes such as `classId`
    pub attributes: BTreeMap<String, AttributeValue>,
    /// User-defined custom properties
    pub custom_properties: BTreeMap<String, AttributeValue>,
}

impl SceneObject {
    /// Create a mesh object with an identity transform and no attributes
    pub fn new(name: impl Into<String>, mesh: Arc<MeshData>) -> Self {
        Self {
            name: name.into(),
            object_type: "MESH".to_string(),
            transform: Transform::identity(),
            mesh,
            attributes: BTreeMap::new(),
            custom_properties: BTreeMap::new(),
        }
    }

    /// Builder-style transform override
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder-style attribute insertion
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder-style custom property insertion
    #[must_use]
    pub fn with_custom_property(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.custom_properties.insert(name.into(), value.into());
        self
    }

    /// Detector class label, present only when `classId` is an integer
    pub fn class_id(&self) -> Option<i64> {
        self.attributes.get(CLASS_ID_ATTRIBUTE).and_then(AttributeValue::as_int)
    }

    /// Look up a user-defined custom property
    pub fn custom_property(&self, name: &str) -> Option<&AttributeValue> {
        self.custom_properties.get(name)
    }

    /// Attributes every object carries
    pub fn builtin_attribute(&self, name: &str) -> Option<AttributeValue> {
        match name {
            "name" => Some(self.name.clone().into()),
            "type" => Some(self.object_type.clone().into()),
            "location" => Some(self.transform.position.into()),
            "rotation_euler" => Some(self.transform.euler_angles().into()),
            "scale" => Some(self.transform.scale.into()),
            _ => None,
        }
    }

    /// Resolve an attribute by name
    ///
    /// `cp_<name>` reads the custom property `<name>`; anything else is a
    /// built-in attribute or an entry of the attribute map.
    pub fn resolve_attribute(&self, name: &str) -> Option<AttributeValue> {
        if let Some(property) = name.strip_prefix(CUSTOM_PROPERTY_PREFIX) {
            return self.custom_property(property).cloned();
        }

        self.builtin_attribute(name)
            .or_else(|| self.attributes.get(name).cloned())
    }
}
