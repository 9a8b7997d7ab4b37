//! Audit store configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the audit store backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Which backend holds the audit trail.
    #[serde(default)]
    pub backend: StoreBackend,

    /// Directory for the file backend's log.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            directory: default_directory(),
        }
    }
}

/// Audit store backend type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-memory only; entries do not survive the process.
    Memory,
    /// JSON Lines log on disk, reloaded on startup.
    #[default]
    File,
}

fn default_directory() -> PathBuf {
    PathBuf::from("./vigil-data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_backend_is_the_default() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, StoreBackend::File);
        assert_eq!(config.directory, PathBuf::from("./vigil-data"));
    }

    #[test]
    fn backend_parses_lowercase_names() {
        let backend: StoreBackend = serde_yaml::from_str("memory").unwrap();
        assert_eq!(backend, StoreBackend::Memory);
    }
}
