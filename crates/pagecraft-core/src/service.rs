//! Read and write operations over the site config store.

use crate::auth::AdminVerifier;
use crate::error::ServiceError;
use crate::store::ConfigStore;
use log::{debug, info, warn};
use pagecraft_config::{default_structure, merge_structure};
use pagecraft_protocol::{
    ConfigGetResponse, LANDING_STRUCTURE_KEY, LandingStructure, SetConfigRequest,
    StructureOverride,
};
use serde_json::Value;
use std::sync::Arc;

/// Public read / admin write access to the site config.
///
/// `set` is a plain read-modify-write with no cross-call locking; two
/// concurrent writes to different keys can lose one of the updates.
#[derive(Clone)]
pub struct ConfigService {
    store: Arc<dyn ConfigStore>,
    verifier: Arc<dyn AdminVerifier>,
    structure_key: String,
}

impl ConfigService {
    pub fn new(store: Arc<dyn ConfigStore>, verifier: Arc<dyn AdminVerifier>) -> Self {
        Self {
            store,
            verifier,
            structure_key: LANDING_STRUCTURE_KEY.to_string(),
        }
    }

    /// Use a different key for the committed landing structure.
    pub fn with_structure_key(mut self, key: impl Into<String>) -> Self {
        self.structure_key = key.into();
        self
    }

    pub fn structure_key(&self) -> &str {
        &self.structure_key
    }

    /// Fetch one key (`{ value }`, null when unset) or the whole document.
    pub async fn get(&self, key: Option<&str>) -> ConfigGetResponse {
        let document = self.store.read().await;
        match key.filter(|key| !key.is_empty()) {
            Some(key) => {
                debug!("config get (key={key})");
                ConfigGetResponse::Value {
                    value: document.get(key).cloned().unwrap_or(Value::Null),
                }
            }
            None => {
                debug!("config get (document, keys={})", document.len());
                ConfigGetResponse::Document(document)
            }
        }
    }

    /// String setting such as a tracking id; non-string values read as unset.
    pub async fn get_string(&self, key: &str) -> Option<String> {
        match self.store.read().await.get(key) {
            Some(Value::String(value)) => Some(value.clone()),
            Some(_) => {
                warn!("config value is not a string (key={key})");
                None
            }
            None => None,
        }
    }

    /// Check an admin credential without touching the store.
    pub fn authorize(&self, credential: Option<&str>) -> Result<(), ServiceError> {
        if self.verifier.verify(credential) {
            return Ok(());
        }
        warn!("rejected config write: admin credential missing or invalid");
        Err(ServiceError::Unauthorized)
    }

    /// Replace one key's value after verifying the admin credential.
    ///
    /// The credential is checked before the store is touched; a missing or
    /// empty key is rejected without writing.
    pub async fn set(
        &self,
        credential: Option<&str>,
        request: SetConfigRequest,
    ) -> Result<(), ServiceError> {
        self.authorize(credential)?;
        let key = match request.key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(ServiceError::Validation("key is required".to_string())),
        };
        self.write_key(&key, request.value).await
    }

    /// Replace one key's value without a credential check.
    ///
    /// For operator tooling with direct access to the store.
    pub async fn write_key(&self, key: &str, value: Value) -> Result<(), ServiceError> {
        let mut document = self.store.read().await;
        document.insert(key.to_string(), value);
        self.store.write(&document).await?;
        info!("config key updated (key={key})");
        Ok(())
    }

    /// Committed landing structure, decoded leniently.
    pub async fn committed_structure(&self) -> Option<StructureOverride> {
        let document = self.store.read().await;
        document
            .get(&self.structure_key)
            .and_then(StructureOverride::from_committed)
    }

    /// Merge defaults, the committed structure, and an optional preview.
    pub async fn resolve(&self, preview: Option<&StructureOverride>) -> LandingStructure {
        let committed = self.committed_structure().await;
        merge_structure(default_structure(), committed.as_ref(), preview)
    }
}
