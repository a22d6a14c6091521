//! Error types for config service operations.

use crate::store::StoreError;
use thiserror::Error;

/// Errors returned by config service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Admin credential missing or rejected.
    #[error("admin credential missing or invalid")]
    Unauthorized,
    /// Request failed validation; nothing was written.
    #[error("invalid request: {0}")]
    Validation(String),
    /// Writing the document failed; the previous document is intact.
    #[error("failed to persist site config: {0}")]
    Persistence(#[from] StoreError),
    /// A value could not be encoded as JSON before writing.
    #[error("failed to encode config value: {0}")]
    Encode(#[from] serde_json::Error),
}
