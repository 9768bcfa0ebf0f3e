//! # mediatree-server
//!
//! Serves one media directory tree to the mediatree player: browse, search,
//! video metadata, byte-range streaming and playlist/favorite storage.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use mediatree_config::{ConfigLoad, ConfigLoader, ConfigLoaderOptions, ConfigOverrides};
use mediatree_server::{AppState, create_app, infra::startup::init_tracing};

#[derive(Parser, Debug)]
#[command(name = "mediatree-server")]
#[command(about = "Browse, search and stream a sandboxed media directory")]
struct Cli {
    /// Path to a mediatree.toml file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a .env file (defaults to ./.env when present)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Media root directory (overrides config)
    #[arg(long)]
    media_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let ConfigLoad { config, warnings } =
        ConfigLoader::with_options(ConfigLoaderOptions {
            config_path: cli.config,
            env_file: cli.env_file,
            overrides: ConfigOverrides {
                host: cli.host,
                port: cli.port,
                media_root: cli.media_root,
            },
        })
        .load()
        .context("failed to load configuration")?;

    init_tracing();

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "loaded configuration file");
    }
    warnings.log();

    config
        .ensure_directories()
        .context("failed to create data directory")?;

    let bind_address = config.bind_address();
    let state = AppState::from_config(Arc::new(config))
        .context("failed to initialise application state")?;
    let app = create_app(state);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!("mediatree listening on http://{bind_address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
