//! Schema validation helpers for Pagecraft JSON5 settings.

use crate::ConfigError;
use serde_json::{Map, Value};
use std::net::SocketAddr;

/// Validate a single settings layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, &["$schema", "bind", "store", "admin", "landing"], layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("bind") {
        validate_bind(value, layer, "bind")?;
    }
    if let Some(value) = map.get("store") {
        validate_store(value, layer, "store")?;
    }
    if let Some(value) = map.get("admin") {
        validate_admin(value, layer, "admin")?;
    }
    if let Some(value) = map.get("landing") {
        validate_landing(value, layer, "landing")?;
    }
    Ok(())
}

/// Validate the "bind" address.
fn validate_bind(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Some(addr) = value.as_str() else {
        return Err(invalid_field(layer, path, "expected string"));
    };
    if addr.parse::<SocketAddr>().is_err() {
        return Err(invalid_field(layer, path, "expected socket address"));
    }
    Ok(())
}

/// Validate the "store" block.
fn validate_store(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["path"], layer, path)?;
    if let Some(value) = map.get("path") {
        expect_non_empty_string(value, layer, &join_path(path, "path"))?;
    }
    Ok(())
}

/// Validate the "admin" block.
fn validate_admin(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["cookie_name", "token", "token_env"], layer, path)?;
    if let Some(value) = map.get("cookie_name") {
        expect_non_empty_string(value, layer, &join_path(path, "cookie_name"))?;
    }
    if let Some(value) = map.get("token") {
        expect_string(value, layer, &join_path(path, "token"))?;
    }
    if let Some(value) = map.get("token_env") {
        expect_non_empty_string(value, layer, &join_path(path, "token_env"))?;
    }
    Ok(())
}

/// Validate the "landing" block.
fn validate_landing(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["structure_key"], layer, path)?;
    if let Some(value) = map.get("structure_key") {
        expect_non_empty_string(value, layer, &join_path(path, "structure_key"))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

fn expect_non_empty_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    match value.as_str() {
        Some(text) if !text.trim().is_empty() => Ok(()),
        Some(_) => Err(invalid_field(layer, path, "must not be empty")),
        None => Err(invalid_field(layer, path, "expected string")),
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    ConfigError::Schema {
        layer: layer.to_string(),
        path: if path.is_empty() { "root" } else { path }.to_string(),
        message: message.to_string(),
    }
}
