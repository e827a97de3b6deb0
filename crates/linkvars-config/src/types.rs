//! Core type definitions for link settings.

use indexmap::IndexMap;
use linkvars_template::RoutePreference;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// The persisted settings.
///
/// Maps keep the order they were written in, so the settings file stays
/// stable across load/save cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Replacement for `/`, `\` and `:` in structural links.
    pub substitution: String,

    /// Dictionary shared by every device.
    pub defaults: IndexMap<String, String>,

    /// Per-key channel restrictions. Keys without an entry allow both.
    pub preferences: IndexMap<String, RoutePreference>,

    /// Device profiles, in the order they were added.
    pub profiles: Vec<DeviceProfile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            substitution: linkvars_template::resolver::DEFAULT_SUBSTITUTION.to_string(),
            defaults: IndexMap::new(),
            preferences: IndexMap::new(),
            profiles: Vec::new(),
        }
    }
}

/// Overrides that apply on one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub name: String,

    /// Vault location on that device, used to pick the profile automatically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Values replacing defaults. The ignore sentinel hides a key.
    #[serde(default)]
    pub overrides: IndexMap<String, String>,
}

impl DeviceProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            overrides: IndexMap::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Errors raised while loading or editing settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the settings file failed.
    #[error("Failed to access settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The settings file is not valid YAML for [`Settings`].
    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Dictionary keys must not be empty")]
    EmptyKey,

    /// `:` selects document properties and `,` separates alternatives.
    #[error("Key '{key}' contains the reserved character '{character}'")]
    ReservedCharacter { key: String, character: char },

    /// Two keys that differ only in case.
    #[error("Key '{key}' duplicates '{existing}' (keys are case-insensitive)")]
    DuplicateKey { key: String, existing: String },

    /// A preference that would leave a key with nowhere to open.
    #[error("Key '{key}' must keep at least one channel enabled")]
    NoChannel { key: String },

    #[error("Profile names must not be empty")]
    EmptyProfileName,

    #[error("Duplicate profile: {name}")]
    DuplicateProfile { name: String },

    #[error("Unknown profile: {name}")]
    UnknownProfile { name: String },
}

/// Result type for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
