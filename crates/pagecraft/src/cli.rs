//! Helpers behind the `pagecraft` command line.

use anyhow::{Context, bail};
use log::{debug, info};
use pagecraft_config::{LayeredSettingsOptions, RenderPlan, ServerSettings, resolve_structure};
use pagecraft_core::{ConfigService, FileConfigStore, SharedTokenVerifier};
use pagecraft_protocol::{PreviewMessage, StructureOverride};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;

/// Load layered settings from `cwd`, with an optional explicit file on top.
pub fn load_settings(cwd: &Path, config: Option<&Path>) -> anyhow::Result<ServerSettings> {
    let mut options = LayeredSettingsOptions::new(cwd);
    if let Some(path) = config {
        info!("loading settings with runtime layer: {}", path.display());
        options = options.with_runtime_path(path);
    }
    let layered = ServerSettings::load_layered_with_options(options)
        .context("failed to load layered settings")?;
    debug!("layered settings loaded (layers={})", layered.layers.len());
    Ok(layered.settings)
}

/// Config service over the file store named in `settings`.
pub fn local_service(settings: &ServerSettings) -> ConfigService {
    let store = Arc::new(FileConfigStore::new(&settings.store.path));
    let verifier = Arc::new(SharedTokenVerifier::new(settings.admin.resolve_token()));
    ConfigService::new(store, verifier).with_structure_key(settings.landing.structure_key.clone())
}

/// Parse a `--value` argument as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Decode a `--preview` argument: a layout update message as JSON.
pub fn parse_preview(raw: &str) -> anyhow::Result<StructureOverride> {
    let value: Value = serde_json::from_str(raw).context("preview is not valid JSON")?;
    let message = PreviewMessage::decode(&value).context("preview is not a layout update")?;
    let preview = message.into_override();
    if preview.is_empty() {
        bail!("preview message carries no fields");
    }
    Ok(preview)
}

/// Merged structure, its render plan, and where each value came from.
pub async fn resolve_report(
    service: &ConfigService,
    preview: Option<&StructureOverride>,
) -> anyhow::Result<Value> {
    let committed = service.committed_structure().await;
    let resolved = resolve_structure(
        pagecraft_config::default_structure(),
        committed.as_ref(),
        preview,
    );
    let plan = RenderPlan::from_structure(&resolved.structure);
    let sections: Vec<Value> = plan
        .sections
        .iter()
        .map(|section| json!({ "id": section.id, "layout": section.layout }))
        .collect();
    let overridden: Vec<Value> = resolved
        .overridden_sections()
        .into_iter()
        .map(|id| json!(id))
        .collect();
    Ok(json!({
        "structure": serde_json::to_value(&resolved.structure)
            .context("failed to encode merged structure")?,
        "plan": sections,
        "orderSource": format!("{:?}", resolved.order_source).to_lowercase(),
        "overriddenSections": overridden,
    }))
}
