// Metadata for codeplug image files

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata stored in the trailer of .rdt files
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Metadata {
    /// Vendor name
    #[serde(default)]
    pub vendor: String,

    /// Model name
    #[serde(default)]
    pub model: String,

    /// Model variant
    #[serde(default)]
    pub variant: String,

    /// Tool version that created the file
    #[serde(default)]
    pub created_with: String,

    /// Additional properties
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Metadata {
    pub fn new(vendor: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            model: model.into(),
            created_with: crate::VERSION.to_string(),
            ..Default::default()
        }
    }

    /// Set an extra property
    pub fn set_extra(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.extra.insert(key.into(), value);
    }

    /// Get an extra property
    pub fn get_extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
