//! Reading settings layers from disk.

use super::{
    DEFAULT_SETTINGS_DIR, DEFAULT_SETTINGS_FILE, LoadedLayer, SettingsLayer, SettingsLayerSource,
    schema,
};
use crate::ConfigError;
use directories::UserDirs;
use log::debug;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read a layer that may be absent. User and cwd layers are optional.
pub(super) fn read_optional(
    source: SettingsLayerSource,
    path: &Path,
) -> Result<Option<LoadedLayer>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => parse_layer(source, path, &contents).map(Some),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("no {} settings layer at {}", source.label(), path.display());
            Ok(None)
        }
        Err(source) => Err(ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read a layer the caller asked for explicitly; absence is an error.
pub(super) fn read_required(
    source: SettingsLayerSource,
    path: &Path,
) -> Result<LoadedLayer, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|err| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source: err,
    })?;
    parse_layer(source, path, &contents)
}

fn parse_layer(
    source: SettingsLayerSource,
    path: &Path,
    contents: &str,
) -> Result<LoadedLayer, ConfigError> {
    debug!(
        "parsing settings layer (source={}, path={}, len={})",
        source.label(),
        path.display(),
        contents.len()
    );
    let layer = format!("{}({})", source.label(), path.display());
    let value: Value = json5::from_str(contents).map_err(|err| ConfigError::Syntax {
        layer: layer.clone(),
        source: err,
    })?;
    schema::validate_layer_schema(&value, &layer)?;
    Ok(LoadedLayer {
        meta: SettingsLayer {
            source,
            path: Some(path.to_path_buf()),
        },
        value,
    })
}

/// `~/.pagecraft/pagecraft.json5`, when a home directory is known.
pub(super) fn default_user_settings_path() -> Option<PathBuf> {
    let dirs = UserDirs::new()?;
    Some(
        dirs.home_dir()
            .join(DEFAULT_SETTINGS_DIR)
            .join(DEFAULT_SETTINGS_FILE),
    )
}
