//! Durable site config document persisted as a single JSON file.

use async_trait::async_trait;
use log::{debug, info, warn};
use pagecraft_protocol::SiteConfig;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Persistent store for the whole site config document.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the full document. Never fails: unreadable or malformed
    /// documents are reported as empty.
    async fn read(&self) -> SiteConfig;
    /// Replace the full document.
    async fn write(&self, config: &SiteConfig) -> Result<(), StoreError>;
}

/// Errors returned when persisting the document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// File-backed store using write-to-temp then rename.
///
/// Readers see either the previous or the new document, never a partial
/// one: the canonical file is only ever replaced by a rename within the
/// same directory.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        info!("initialized file config store (path={})", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unique sibling path for an in-flight write.
    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "site-config.json".to_string());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()))
    }

    async fn write_temp(&self, temp_path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        let mut file = fs::File::create(temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn read(&self) -> SiteConfig {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("site config missing (path={})", self.path.display());
                return SiteConfig::new();
            }
            Err(err) => {
                warn!(
                    "failed to read site config (path={}): {err}",
                    self.path.display()
                );
                return SiteConfig::new();
            }
        };
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!(
                    "site config is not an object; using empty document (path={})",
                    self.path.display()
                );
                SiteConfig::new()
            }
            Err(err) => {
                warn!(
                    "site config is malformed; using empty document (path={}): {err}",
                    self.path.display()
                );
                SiteConfig::new()
            }
        }
    }

    async fn write(&self, config: &SiteConfig) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(config)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let temp_path = self.temp_path();
        let result = match self.write_temp(&temp_path, &bytes).await {
            Ok(()) => fs::rename(&temp_path, &self.path)
                .await
                .map_err(StoreError::from),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!(
                "failed to write site config (path={}): {err}",
                self.path.display()
            );
            let _ = fs::remove_file(&temp_path).await;
            return result;
        }
        info!(
            "wrote site config (path={}, keys={})",
            self.path.display(),
            config.len()
        );
        Ok(())
    }
}
