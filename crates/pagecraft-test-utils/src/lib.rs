//! Test helpers shared across Pagecraft crates.

pub mod auth;
pub mod render;
pub mod source;
pub mod store;

pub use auth::FixedVerifier;
pub use render::{RecordedRender, RecordingRenderer};
pub use source::{FixedSource, GatedSource};
pub use store::{FailingConfigStore, MemoryConfigStore};
