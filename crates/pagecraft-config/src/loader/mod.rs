//! Layered settings loader.
//!
//! Discovers settings layers (user, cwd, runtime overrides), validates each
//! against the schema, merges them, and produces the final `ServerSettings`.

mod layer_io;
mod merge;
mod schema;

#[cfg(test)]
mod tests;

use crate::{ConfigError, ServerSettings};
use log::{debug, info};
use serde_json::Value;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default settings filename in local layers.
const DEFAULT_SETTINGS_FILE: &str = "pagecraft.json5";
/// Default settings directory under the user's home.
const DEFAULT_SETTINGS_DIR: &str = ".pagecraft";

/// Effective settings plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredSettings {
    /// The merged, validated settings.
    pub settings: ServerSettings,
    /// Metadata for each layer that contributed.
    pub layers: Vec<SettingsLayer>,
}

/// Origin for a single settings layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsLayerSource {
    /// User-specific settings.
    User,
    /// Current working directory settings.
    Cwd,
    /// Runtime overrides (highest precedence).
    Runtime,
}

impl SettingsLayerSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Cwd => "cwd",
            Self::Runtime => "runtime",
        }
    }
}

/// Metadata about a settings layer.
#[derive(Debug, Clone)]
pub struct SettingsLayer {
    /// Layer origin.
    pub source: SettingsLayerSource,
    /// Location on disk if present.
    pub path: Option<PathBuf>,
}

/// Options controlling layered settings discovery and overrides.
#[derive(Debug, Clone)]
pub struct LayeredSettingsOptions {
    /// Working directory used to resolve the cwd layer.
    pub cwd: PathBuf,
    /// Optional user settings path (defaults to `~/.pagecraft/pagecraft.json5`).
    pub user_settings_path: Option<PathBuf>,
    /// Runtime override paths applied last.
    pub runtime_paths: Vec<PathBuf>,
}

impl LayeredSettingsOptions {
    /// Create options with default layer locations for the provided cwd.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            user_settings_path: layer_io::default_user_settings_path(),
            runtime_paths: Vec::new(),
        }
    }

    /// Add a runtime override path that is applied last.
    pub fn with_runtime_path(mut self, path: impl AsRef<Path>) -> Self {
        self.runtime_paths.push(path.as_ref().to_path_buf());
        self
    }
}

impl ServerSettings {
    /// Load settings from a single path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("loading settings from path: {}", path.display());
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&contents)
    }

    /// Load settings from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading settings from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents).map_err(|source| ConfigError::Syntax {
            layer: "settings".to_string(),
            source,
        })?;
        schema::validate_layer_schema(&value, "settings")?;
        settings_from_value(value)
    }

    /// Load a layered settings stack using the default layer locations.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredSettings, ConfigError> {
        Self::load_layered_with_options(LayeredSettingsOptions::new(cwd))
    }

    /// Load a layered settings stack using explicit layer locations.
    ///
    /// Layer precedence (low -> high): built-in defaults, user, cwd, runtime.
    pub fn load_layered_with_options(
        options: LayeredSettingsOptions,
    ) -> Result<LayeredSettings, ConfigError> {
        let mut loaded = Vec::new();
        if let Some(user_path) = options.user_settings_path.as_deref() {
            loaded.extend(layer_io::read_optional(SettingsLayerSource::User, user_path)?);
        }
        let cwd_path = options.cwd.join(DEFAULT_SETTINGS_FILE);
        loaded.extend(layer_io::read_optional(SettingsLayerSource::Cwd, &cwd_path)?);
        for runtime_path in &options.runtime_paths {
            loaded.push(layer_io::read_required(SettingsLayerSource::Runtime, runtime_path)?);
        }

        let mut merged = Value::Object(serde_json::Map::new());
        let mut layers = Vec::with_capacity(loaded.len());
        for layer in loaded {
            debug!("merging settings layer (source={:?})", layer.meta.source);
            merge::merge_json_values(&mut merged, &layer.value);
            layers.push(layer.meta);
        }

        let settings = settings_from_value(merged)?;
        info!("layered settings loaded (layers={})", layers.len());
        Ok(LayeredSettings { settings, layers })
    }

    /// Validate invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Value {
                field: "bind",
                message: format!("expected socket address, got {}", self.bind),
            });
        }
        if self.admin.cookie_name.trim().is_empty() {
            return Err(ConfigError::Value {
                field: "admin.cookie_name",
                message: "must not be empty".to_string(),
            });
        }
        if self.landing.structure_key.trim().is_empty() {
            return Err(ConfigError::Value {
                field: "landing.structure_key",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Parsed bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind.parse().map_err(|_| ConfigError::Value {
            field: "bind",
            message: format!("expected socket address, got {}", self.bind),
        })
    }
}

/// Internal representation of a loaded settings layer.
#[derive(Debug, Clone)]
struct LoadedLayer {
    meta: SettingsLayer,
    value: Value,
}

fn settings_from_value(value: Value) -> Result<ServerSettings, ConfigError> {
    let settings: ServerSettings = serde_json::from_value(value)?;
    settings.validate()?;
    Ok(settings)
}
