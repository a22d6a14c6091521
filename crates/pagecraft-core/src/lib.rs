//! Core primitives for Pagecraft.
//!
//! This crate owns the site config store, the admin-gated config service,
//! and the live preview machinery (channel, renderer state, render session,
//! structure editor) used by the server and SDK.

pub mod auth;
pub mod error;
pub mod preview;
pub mod service;
pub mod source;
pub mod store;

/// Admin credential verification.
pub use auth::{AdminVerifier, SharedTokenVerifier};
pub use error::ServiceError;
/// Live preview building blocks.
pub use preview::{
    BroadcastPreviewChannel, LiveRenderer, PreviewChannel, PreviewReceiver, RenderPhase,
    RenderSession, RenderSessionHandle, SectionRenderer, StructureEditor,
};
pub use service::ConfigService;
pub use source::{CommittedSource, HttpConfigSource, NoCommittedSource, SourceError};
pub use store::{ConfigStore, FileConfigStore, StoreError};
