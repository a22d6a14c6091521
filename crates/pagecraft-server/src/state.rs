//! Shared handler state.

use pagecraft_core::ConfigService;
use std::sync::Arc;

/// State shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ConfigService>,
    /// Cookie carrying the admin session credential.
    pub cookie_name: Arc<str>,
}

impl AppState {
    pub fn new(service: ConfigService, cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            service: Arc::new(service),
            cookie_name: cookie_name.into(),
        }
    }
}
