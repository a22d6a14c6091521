//! Landing structure layering and server settings.
//!
//! This crate owns the compiled default structure, the layer merger shared
//! by the published page and the live preview, and the layered settings
//! loader used by the server and CLI.

mod defaults;
mod error;
mod layers;
mod loader;
mod model;

/// Compiled default landing structure.
pub use defaults::default_structure;
/// Public error type returned by settings loading and validation APIs.
pub use error::ConfigError;
/// Structure layering and render planning.
pub use layers::{
    PlannedSection, RenderPlan, ResolvedStructure, StructureLayer, merge_structure,
    resolve_structure,
};
/// Layered settings types and loader options.
pub use loader::{LayeredSettings, LayeredSettingsOptions, SettingsLayer, SettingsLayerSource};
/// Settings schema models.
pub use model::*;
