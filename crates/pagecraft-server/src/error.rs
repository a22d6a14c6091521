//! Error types and HTTP status mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use pagecraft_config::ConfigError;
use pagecraft_core::ServiceError;
use pagecraft_protocol::ErrorBody;
use thiserror::Error;

/// Errors raised while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid settings: {0}")]
    Settings(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handler error rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Persistence(_) | ServiceError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            ServiceError::Unauthorized => "Unauthorized".to_string(),
            ServiceError::Validation(message) => message.clone(),
            ServiceError::Persistence(err) => {
                error!("config write failed: {err}");
                "Failed to save config".to_string()
            }
            ServiceError::Encode(err) => {
                error!("config value encoding failed: {err}");
                "Failed to save config".to_string()
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use pagecraft_core::{ServiceError, StoreError};
    use pretty_assertions::assert_eq;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                ServiceError::Validation("key is required".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Persistence(StoreError::Io(std::io::Error::other("disk full"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }

        let encode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            ApiError(ServiceError::Encode(encode)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
