//! Tests for layered settings loading.

use super::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Verify that empty settings parse with defaults.
#[test]
fn parse_minimal_settings() {
    let settings = ServerSettings::load_from_str("{}").expect("settings");
    assert_eq!(settings, ServerSettings::default());
    assert_eq!(settings.admin.cookie_name, "admin_session");
    assert_eq!(settings.landing.structure_key, "landingStructure");
}

/// Reject unexpected top-level keys.
#[test]
fn rejects_unknown_top_level_key() {
    let err = ServerSettings::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("unknown key"));
}

/// Reject a bind value that is not a socket address.
#[test]
fn rejects_invalid_bind_address() {
    let err = ServerSettings::load_from_str(r#"{ bind: "localhost" }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("bind"));
}

/// Reject an empty cookie name.
#[test]
fn rejects_empty_cookie_name() {
    let err = ServerSettings::load_from_str(r#"{ admin: { cookie_name: " " } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("admin.cookie_name"));
}

/// Runtime layers win over cwd layers, which win over user layers.
#[test]
fn layered_settings_respect_precedence() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let cwd = root.join("site");
    fs::create_dir_all(&cwd).expect("cwd");

    let user = root.join("user.json5");
    write_json5(
        &user,
        r#"{ bind: "127.0.0.1:9000", admin: { cookie_name: "user_cookie" } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_SETTINGS_FILE),
        r#"{ store: { path: "cwd.json" }, admin: { token_env: "CWD_TOKEN" } }"#,
    );
    let runtime = root.join("runtime.json5");
    write_json5(&runtime, r#"{ store: { path: "runtime.json" } }"#);

    let mut options = LayeredSettingsOptions::new(&cwd).with_runtime_path(&runtime);
    options.user_settings_path = Some(user);

    let layered = ServerSettings::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.layers.len(), 3);
    assert_eq!(layered.settings.bind, "127.0.0.1:9000");
    assert_eq!(layered.settings.store.path, "runtime.json");
    assert_eq!(layered.settings.admin.cookie_name, "user_cookie");
    assert_eq!(layered.settings.admin.token_env, "CWD_TOKEN");
}

/// Missing optional layers are skipped, missing runtime layers are errors.
#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let mut options = LayeredSettingsOptions::new(temp.path());
    options.user_settings_path = Some(temp.path().join("absent.json5"));

    let layered = ServerSettings::load_layered_with_options(options.clone()).expect("layered");
    assert!(layered.layers.is_empty());
    assert_eq!(layered.settings, ServerSettings::default());

    let options = options.with_runtime_path(temp.path().join("missing.json5"));
    let err = ServerSettings::load_layered_with_options(options).unwrap_err();
    let ConfigError::Unreadable { path, .. } = err else {
        panic!("expected unreadable runtime layer, got {err}");
    };
    assert_eq!(path, temp.path().join("missing.json5"));
}

/// Schema errors carry the layer label and field path.
#[test]
fn schema_errors_name_the_layer() {
    let temp = TempDir::new().expect("tmp");
    write_json5(
        &temp.path().join(DEFAULT_SETTINGS_FILE),
        r#"{ landing: { structure_key: 3 } }"#,
    );
    let mut options = LayeredSettingsOptions::new(temp.path());
    options.user_settings_path = None;

    let err = ServerSettings::load_layered_with_options(options).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("));
    assert!(msg.contains("landing.structure_key"));
}

/// Malformed JSON5 reports which layer failed to parse.
#[test]
fn syntax_errors_name_the_layer() {
    let temp = TempDir::new().expect("tmp");
    let runtime = temp.path().join("runtime.json5");
    write_json5(&runtime, "{ bind: ");
    let mut options = LayeredSettingsOptions::new(temp.path()).with_runtime_path(&runtime);
    options.user_settings_path = None;

    let err = ServerSettings::load_layered_with_options(options).unwrap_err();
    let ConfigError::Syntax { layer, .. } = &err else {
        panic!("expected syntax error, got {err}");
    };
    assert_eq!(layer, &format!("runtime({})", runtime.display()));
}

/// Usable-value failures name the offending field.
#[test]
fn value_errors_name_the_field() {
    let err = ServerSettings::load_from_str(r#"{ bind: "localhost" }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Value { field: "bind", .. }));

    let err = ServerSettings::load_from_str(r#"{ landing: { structure_key: "" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Value { field: "landing.structure_key", .. }));
}

/// The configured token takes precedence over the environment.
#[test]
fn explicit_token_is_used() {
    let settings = ServerSettings::load_from_str(
        r#"{ admin: { token: "s3cret", token_env: "PAGECRAFT_TEST_UNSET_VAR" } }"#,
    )
    .expect("settings");
    assert_eq!(settings.admin.resolve_token(), Some("s3cret".to_string()));

    let settings = ServerSettings::load_from_str(
        r#"{ admin: { token_env: "PAGECRAFT_TEST_UNSET_VAR" } }"#,
    )
    .expect("settings");
    assert_eq!(settings.admin.resolve_token(), None);
}
