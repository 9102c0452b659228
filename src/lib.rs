pub mod api;
pub mod cli;
pub mod core;
pub mod sync;

use crate::api::HttpBackend;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Commands the application can execute once configuration is loaded.
pub enum AppCommand {
    Quotes,
    History { symbol: String },
    Limits,
    Watch { symbol: Option<String> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Crypto tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let backend = HttpBackend::new(&config.api.base_url)?;

    match command {
        AppCommand::Quotes => cli::quotes::run(&backend).await,
        AppCommand::History { symbol } => cli::history::run(&backend, &symbol).await,
        AppCommand::Limits => cli::limits::run(&backend).await,
        AppCommand::Watch { symbol } => {
            cli::watch::run(&config, Arc::new(backend), symbol.as_deref()).await
        }
    }
}
