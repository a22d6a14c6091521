//! Failures while loading server settings.

use std::path::PathBuf;
use thiserror::Error;

/// Why a settings stack could not be turned into [`crate::ServerSettings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A settings file exists (or was named explicitly) but cannot be read.
    #[error("cannot read settings file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A layer is not valid JSON5.
    #[error("{layer} is not valid JSON5: {source}")]
    Syntax {
        layer: String,
        #[source]
        source: json5::Error,
    },
    /// A layer uses an unknown key or a value of the wrong type.
    #[error("{layer}: {path}: {message}")]
    Schema {
        layer: String,
        path: String,
        message: String,
    },
    /// The merged layers do not decode into the settings model.
    #[error("merged settings do not decode: {0}")]
    Model(#[from] serde_json::Error),
    /// A merged value is well-typed but unusable.
    #[error("invalid {field}: {message}")]
    Value { field: &'static str, message: String },
}
