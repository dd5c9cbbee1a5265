//! Session configuration.

use crate::labels::LabelPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Label shown when reverse geocoding fails or finds nothing.
pub const DEFAULT_FALLBACK_LABEL: &str = "Unknown Location";

/// Zoom level assumed when the provider does not report one.
pub const DEFAULT_ZOOM: f64 = 12.0;

/// Upper bound on polygon vertices accepted from the provider.
pub const DEFAULT_MAX_POLYGON_VERTICES: usize = 256;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid config: {0}")]
    Parse(String),
}

/// Settings for a drawing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Label applied when a lookup fails or returns no result.
    pub fallback_label: String,
    /// How overlapping label lookups for one shape are reconciled.
    pub label_policy: LabelPolicy,
    /// Zoom recorded for shapes completed without one.
    pub default_zoom: f64,
    /// Maximum number of polygon vertices.
    pub max_polygon_vertices: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fallback_label: DEFAULT_FALLBACK_LABEL.to_string(),
            label_policy: LabelPolicy::default(),
            default_zoom: DEFAULT_ZOOM,
            max_polygon_vertices: DEFAULT_MAX_POLYGON_VERTICES,
        }
    }
}

impl SessionConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn with_label_policy(mut self, policy: LabelPolicy) -> Self {
        self.label_policy = policy;
        self
    }

    pub fn with_fallback_label(mut self, label: impl Into<String>) -> Self {
        self.fallback_label = label.into();
        self
    }
}
