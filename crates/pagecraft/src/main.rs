//! `pagecraft` command line: serve the config API or inspect the local store.

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use pagecraft::cli::{load_settings, local_service, parse_preview, parse_value, resolve_report};
use pagecraft::protocol::ConfigGetResponse;
use pagecraft::server::Server;
use std::path::PathBuf;

/// Command-line options for the Pagecraft binary.
#[derive(Parser)]
#[command(name = "pagecraft", version)]
struct Cli {
    /// Optional path to a pagecraft.json5 settings file layered on top
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the site config store path
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve GET/POST /config over HTTP
    Serve {
        /// Socket address to bind, e.g. 0.0.0.0:8787
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print one key or the whole site config
    Get {
        #[arg(long)]
        key: Option<String>,
    },
    /// Write one key directly to the local store (no admin check)
    Set {
        #[arg(long)]
        key: String,
        /// JSON value; non-JSON input is stored as a string
        #[arg(long)]
        value: String,
    },
    /// Print the merged landing structure and its render plan
    Resolve {
        /// Layout update message applied as the preview layer
        #[arg(long)]
        preview: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pagecraft::init_logging();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let mut settings = load_settings(&cwd, cli.config.as_deref())?;
    if let Some(store) = cli.store {
        settings.store.path = store.to_string_lossy().to_string();
    }

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                settings.bind = bind;
            }
            settings.validate().context("invalid settings")?;
            info!(
                "starting server (bind={}, store={})",
                settings.bind, settings.store.path
            );
            Server::from_settings(&settings)
                .context("failed to build server")?
                .run()
                .await
                .context("server stopped")?;
        }
        Command::Get { key } => {
            let service = local_service(&settings);
            let response = service.get(key.as_deref()).await;
            let output = match response {
                ConfigGetResponse::Value { value } => value,
                ConfigGetResponse::Document(document) => document.into(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Set { key, value } => {
            let service = local_service(&settings);
            service
                .write_key(&key, parse_value(&value))
                .await
                .with_context(|| format!("failed to write key {key}"))?;
            println!("updated {key}");
        }
        Command::Resolve { preview } => {
            let preview = preview.as_deref().map(parse_preview).transpose()?;
            let service = local_service(&settings);
            let report = resolve_report(&service, preview.as_ref()).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
