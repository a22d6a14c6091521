//! Public SDK surface for Pagecraft.
//!
//! This crate re-exports the building blocks and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use pagecraft_config as config;
pub use pagecraft_core as core;
/// Re-export for convenience.
pub use pagecraft_protocol as protocol;
pub use pagecraft_server as server;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}

pub mod cli;
