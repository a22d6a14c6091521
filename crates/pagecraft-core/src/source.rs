//! Sources for the committed landing structure seen by a renderer.

use crate::service::ConfigService;
use async_trait::async_trait;
use log::{debug, warn};
use pagecraft_protocol::{LANDING_STRUCTURE_KEY, StructureOverride};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Fetches the committed structure layer for a render context.
///
/// Implementations never fail outward: an unreachable or malformed source
/// yields `None` so the page renders from defaults.
#[async_trait]
pub trait CommittedSource: Send + Sync {
    async fn fetch(&self) -> Option<StructureOverride>;
}

#[async_trait]
impl CommittedSource for ConfigService {
    async fn fetch(&self) -> Option<StructureOverride> {
        self.committed_structure().await
    }
}

/// No committed layer; renders defaults (plus preview).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCommittedSource;

#[async_trait]
impl CommittedSource for NoCommittedSource {
    async fn fetch(&self) -> Option<StructureOverride> {
        None
    }
}

/// Errors from the HTTP config endpoint.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Upper bound for one committed-structure fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads the committed structure from a remote `GET /config` endpoint,
/// the way a published page does at load time.
///
/// Every request is bounded by a timeout so a stalled server degrades to
/// "no committed layer" instead of blocking the first render.
#[derive(Debug, Clone)]
pub struct HttpConfigSource {
    client: reqwest::Client,
    config_url: String,
    key: String,
}

impl HttpConfigSource {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:8787`.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, SourceError> {
        Self::with_timeout(base_url, DEFAULT_FETCH_TIMEOUT)
    }

    /// Like [`HttpConfigSource::new`] with an explicit request timeout.
    pub fn with_timeout(
        base_url: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;
        let base = base_url.as_ref().trim_end_matches('/');
        Ok(Self {
            client,
            config_url: format!("{base}/config"),
            key: LANDING_STRUCTURE_KEY.to_string(),
        })
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Raw value stored under the configured key (`null` when unset).
    pub async fn fetch_value(&self) -> Result<Value, SourceError> {
        let response = self
            .client
            .get(&self.config_url)
            .query(&[("key", self.key.as_str())])
            .send()
            .await?
            .error_for_status()?;
        let body: Value = response.json().await?;
        match body {
            Value::Object(mut map) => Ok(map.remove("value").unwrap_or(Value::Null)),
            other => Err(SourceError::UnexpectedResponse(format!(
                "expected object, got {other}"
            ))),
        }
    }
}

#[async_trait]
impl CommittedSource for HttpConfigSource {
    async fn fetch(&self) -> Option<StructureOverride> {
        match self.fetch_value().await {
            Ok(value) => {
                debug!("fetched committed structure (url={})", self.config_url);
                StructureOverride::from_committed(&value)
            }
            Err(err) => {
                warn!(
                    "failed to fetch committed structure (url={}): {err}",
                    self.config_url
                );
                None
            }
        }
    }
}
