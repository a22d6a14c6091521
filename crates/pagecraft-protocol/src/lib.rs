//! Wire protocol types for Pagecraft: site config documents, landing
//! structures, preview messages, and HTTP request/response bodies.

mod preview;
mod section;
mod structure;

pub use preview::{LAYOUT_UPDATE_TAG, PreviewMessage};
pub use section::{LayoutParams, LayoutValue, SectionId, UnknownSection};
pub use structure::{
    LANDING_STRUCTURE_KEY, LandingStructure, ShapeError, StructureOverride, decode_layouts,
    decode_order, decode_visibility,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Whole site config document: opaque keys to arbitrary JSON values.
pub type SiteConfig = Map<String, Value>;

/// Response body for `GET /config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigGetResponse {
    /// Single key lookup; `null` when the key is unset.
    Value { value: Value },
    /// Full document when no key was requested.
    Document(SiteConfig),
}

/// Request body for `POST /config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetConfigRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl SetConfigRequest {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: Some(key.into()),
            value,
        }
    }
}

/// Response body for a successful `POST /config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetConfigResponse {
    pub success: bool,
}

/// JSON error body returned by the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
