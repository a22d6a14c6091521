//! HTTP surface for the Pagecraft site config.

mod error;
mod handlers;
mod server;
mod state;

pub use error::{ApiError, ServerError};
pub use server::Server;
pub use state::AppState;
