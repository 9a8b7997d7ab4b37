//! Configuration for the Vigil gateway.
//!
//! Loaded from a single YAML file (`vigil.yaml` by convention) and passed
//! explicitly into the components that need it; there is no global handle.

pub mod store;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub use store::{StoreBackend, StoreConfig};

/// Complete gateway configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Project name, used only for display.
    #[serde(default)]
    pub project: Option<String>,

    /// Audit store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Review queue and query limits.
    #[serde(default)]
    pub review: ReviewConfig,
}

impl GatewayConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config = serde_yaml::from_str(&raw)?;
        Ok(config)
    }

    /// Secret-free summary for the health surface.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "project": self.project,
            "store_backend": self.store.backend,
            "default_page_limit": self.review.default_page_limit,
            "max_page_limit": self.review.max_page_limit,
            "velocity_window_hours": self.review.velocity_window_hours,
        })
    }
}

/// Limits applied to reviewer-facing queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Page size used when a caller passes no limit.
    #[serde(default = "default_page_limit")]
    pub default_page_limit: usize,

    /// Hard ceiling on any caller-supplied limit.
    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: usize,

    /// Trailing window, in hours, for the velocity count primitive.
    #[serde(default = "default_velocity_window_hours")]
    pub velocity_window_hours: i64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            default_page_limit: default_page_limit(),
            max_page_limit: default_max_page_limit(),
            velocity_window_hours: default_velocity_window_hours(),
        }
    }
}

fn default_page_limit() -> usize {
    20
}

fn default_max_page_limit() -> usize {
    200
}

fn default_velocity_window_hours() -> i64 {
    24
}

/// Errors loading or parsing gateway configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}
