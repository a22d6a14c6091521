//! Request handlers for `/config` and `/healthz`.

use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::IntoResponse;
use log::debug;
use pagecraft_core::ServiceError;
use pagecraft_protocol::{SetConfigRequest, SetConfigResponse};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Default, Deserialize)]
pub struct ConfigQuery {
    pub key: Option<String>,
}

/// `GET /config[?key=...]`
pub async fn get_config(
    State(state): State<AppState>,
    Query(query): Query<ConfigQuery>,
) -> impl IntoResponse {
    let body = state.service.get(query.key.as_deref()).await;
    (
        [
            (
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            ),
            (header::PRAGMA, HeaderValue::from_static("no-cache")),
        ],
        Json(body),
    )
}

/// `POST /config` with `{ key, value }`; requires the admin cookie.
///
/// The credential is verified before the body is validated.
pub async fn set_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SetConfigResponse>, ApiError> {
    let credential = admin_cookie(&headers, &state.cookie_name);
    state.service.authorize(credential.as_deref())?;
    let request = serde_json::from_slice::<SetConfigRequest>(&body)
        .map_err(|err| ServiceError::Validation(format!("invalid request body: {err}")))?;
    state.service.set(credential.as_deref(), request).await?;
    Ok(Json(SetConfigResponse { success: true }))
}

/// `GET /healthz`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Value of the named cookie from the request's `Cookie` headers.
pub(crate) fn admin_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string());
    if cookie.is_none() {
        debug!("no admin cookie on request (cookie={name})");
    }
    cookie
}
