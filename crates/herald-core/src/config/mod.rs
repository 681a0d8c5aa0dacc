//! # Herald Configuration
//!
//! File-format handling shared by dispatcher configuration and anything else
//! herald reads from disk. The format is picked from the file extension:
//! `.json` always, `.yaml`/`.yml` with the `yaml-config` feature and `.toml`
//! with the `toml-config` feature.
use std::fs;
use std::path::Path;

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{HeraldError, Result};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }

    /// Deserialize a value from `data`
    pub fn parse<T: DeserializeOwned>(&self, data: &str) -> Result<T> {
        let deserialize_error = |reason: String| HeraldError::ConfigDeserialize {
            format: self.extension(),
            reason,
        };
        match self {
            ConfigFormat::Json => {
                serde_json::from_str(data).map_err(|e| deserialize_error(e.to_string()))
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                serde_yaml::from_str(data).map_err(|e| deserialize_error(e.to_string()))
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| deserialize_error(e.to_string())),
        }
    }

    /// Serialize `value` to a string in this format
    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let serialize_error = |reason: String| HeraldError::ConfigSerialize {
            format: self.extension(),
            reason,
        };
        match self {
            ConfigFormat::Json => {
                serde_json::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                serde_yaml::to_string(value).map_err(|e| serialize_error(e.to_string()))
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => {
                toml::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))
            }
        }
    }
}

/// Read and deserialize a file, choosing the format from its extension
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| HeraldError::UnsupportedConfigFormat {
        path: path.to_path_buf(),
    })?;
    let data = fs::read_to_string(path).map_err(|source| HeraldError::ConfigIo {
        operation: "read",
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loading {} config from {}", format.extension(), path.display());
    format.parse(&data)
}

/// Serialize a value and write it to a file, choosing the format from its
/// extension
pub fn save_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| HeraldError::UnsupportedConfigFormat {
        path: path.to_path_buf(),
    })?;
    let data = format.render(value)?;
    fs::write(path, data).map_err(|source| HeraldError::ConfigIo {
        operation: "write",
        path: path.to_path_buf(),
        source,
    })
}

/// Behaviour switches for an [`EventDispatcher`](crate::event::EventDispatcher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Drop a priority level once its last listener is removed, and the
    /// event name once its last priority level is gone. When disabled, empty
    /// entries linger and `has_listener` keeps reporting `true` for the name.
    pub prune_empty_entries: bool,
}

impl DispatcherConfig {
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self> {
        format.parse(data)
    }

    pub fn load(path: &Path) -> Result<Self> {
        load_file(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        save_file(path, self)
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            prune_empty_entries: true,
        }
    }
}
