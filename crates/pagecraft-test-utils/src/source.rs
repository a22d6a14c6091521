use async_trait::async_trait;
use pagecraft_core::CommittedSource;
use pagecraft_protocol::StructureOverride;
use std::sync::Arc;
use tokio::sync::Notify;

/// Source returning a fixed committed layer immediately.
#[derive(Debug, Clone, Default)]
pub struct FixedSource {
    committed: Option<StructureOverride>,
}

impl FixedSource {
    pub fn new(committed: Option<StructureOverride>) -> Self {
        Self { committed }
    }
}

#[async_trait]
impl CommittedSource for FixedSource {
    async fn fetch(&self) -> Option<StructureOverride> {
        self.committed.clone()
    }
}

/// Source that holds its answer until [`GatedSource::release`] is called,
/// simulating a slow committed fetch.
#[derive(Debug, Clone, Default)]
pub struct GatedSource {
    committed: Option<StructureOverride>,
    gate: Arc<Notify>,
}

impl GatedSource {
    pub fn new(committed: Option<StructureOverride>) -> Self {
        Self {
            committed,
            gate: Arc::new(Notify::new()),
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl CommittedSource for GatedSource {
    async fn fetch(&self) -> Option<StructureOverride> {
        self.gate.notified().await;
        self.committed.clone()
    }
}
