use async_trait::async_trait;
use pagecraft_core::{ConfigStore, StoreError};
use pagecraft_protocol::SiteConfig;
use parking_lot::Mutex;
use std::sync::Arc;

/// In-memory store that records every written document.
#[derive(Clone, Default)]
pub struct MemoryConfigStore {
    document: Arc<Mutex<SiteConfig>>,
    writes: Arc<Mutex<Vec<SiteConfig>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: SiteConfig) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
            writes: Arc::default(),
        }
    }

    pub fn snapshot(&self) -> SiteConfig {
        self.document.lock().clone()
    }

    pub fn writes(&self) -> Vec<SiteConfig> {
        self.writes.lock().clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn read(&self) -> SiteConfig {
        self.document.lock().clone()
    }

    async fn write(&self, config: &SiteConfig) -> Result<(), StoreError> {
        *self.document.lock() = config.clone();
        self.writes.lock().push(config.clone());
        Ok(())
    }
}

/// Store whose reads succeed but every write fails with an io error.
#[derive(Clone, Default)]
pub struct FailingConfigStore {
    document: SiteConfig,
}

impl FailingConfigStore {
    pub fn new(document: SiteConfig) -> Self {
        Self { document }
    }
}

#[async_trait]
impl ConfigStore for FailingConfigStore {
    async fn read(&self) -> SiteConfig {
        self.document.clone()
    }

    async fn write(&self, _config: &SiteConfig) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }
}
