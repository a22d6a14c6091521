//! Router assembly and the listening loop.

use crate::error::ServerError;
use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use log::info;
use pagecraft_config::ServerSettings;
use pagecraft_core::{ConfigService, FileConfigStore, SharedTokenVerifier};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// HTTP server exposing the site config.
pub struct Server {
    addr: SocketAddr,
    app: Router,
}

impl Server {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self {
            addr,
            app: Self::build_app(state),
        }
    }

    /// Wire the file store, shared-token verifier, and routes from settings.
    pub fn from_settings(settings: &ServerSettings) -> Result<Self, ServerError> {
        let addr = settings.bind_addr()?;
        let store = Arc::new(FileConfigStore::new(&settings.store.path));
        let verifier = Arc::new(SharedTokenVerifier::new(settings.admin.resolve_token()));
        let service = ConfigService::new(store, verifier)
            .with_structure_key(settings.landing.structure_key.clone());
        let state = AppState::new(service, settings.admin.cookie_name.as_str());
        Ok(Self::new(addr, state))
    }

    pub fn build_app(state: AppState) -> Router {
        Router::new()
            .route(
                "/config",
                get(handlers::get_config).post(handlers::set_config),
            )
            .route("/healthz", get(handlers::health))
            .with_state(state)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("pagecraft server listening (addr={})", listener.local_addr()?);
        axum::serve(listener, self.app).await?;
        Ok(())
    }
}
