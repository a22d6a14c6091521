//! Settings schema for the Pagecraft server and CLI.

use pagecraft_protocol::LANDING_STRUCTURE_KEY;
use serde::{Deserialize, Serialize};

/// Root settings for a Pagecraft deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub admin: AdminSettings,
    #[serde(default)]
    pub landing: LandingSettings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            schema: None,
            bind: default_bind(),
            store: StoreSettings::default(),
            admin: AdminSettings::default(),
            landing: LandingSettings::default(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

/// Location of the persisted site config document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> String {
    ".pagecraft/site-config.json".to_string()
}

/// Admin session settings gating config writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminSettings {
    /// Cookie carrying the admin session credential.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Expected session credential. Usually supplied through `token_env`.
    #[serde(default)]
    pub token: Option<String>,
    /// Environment variable consulted when `token` is unset.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            token: None,
            token_env: default_token_env(),
        }
    }
}

impl AdminSettings {
    /// Configured token, falling back to the environment.
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .or_else(|| std::env::var(&self.token_env).ok())
            .filter(|token| !token.trim().is_empty())
    }
}

fn default_cookie_name() -> String {
    "admin_session".to_string()
}

fn default_token_env() -> String {
    "PAGECRAFT_ADMIN_TOKEN".to_string()
}

/// Landing page settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LandingSettings {
    /// Site config key holding the committed landing structure.
    #[serde(default = "default_structure_key")]
    pub structure_key: String,
}

impl Default for LandingSettings {
    fn default() -> Self {
        Self {
            structure_key: default_structure_key(),
        }
    }
}

fn default_structure_key() -> String {
    LANDING_STRUCTURE_KEY.to_string()
}
