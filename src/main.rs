// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use captcha_assist_server::{
    api::{create_router, start_server, AppState},
    config::ServerConfig,
    version,
    vision::{ImageLoader, VisionModelManager},
};
use clap::Parser;
use std::{fs::OpenOptions, path::Path, sync::Mutex};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = ServerConfig::parse();
    init_logging(config.log_file().as_deref())?;

    info!("🚀 Starting captcha assist server {}", version::get_version_string());

    let addr = config.listen_addr()?;

    info!("🧠 Loading recognition models...");
    let manager = VisionModelManager::new(config.vision_config()).await?;
    for model in manager.list_models() {
        info!(
            "   {} ({}): {}",
            model.name,
            model.model_type,
            if model.available { "ready" } else { "unavailable" }
        );
    }

    let loader = ImageLoader::new(&config.loader_config()).context("failed to build image loader")?;
    let state = AppState::from_manager(manager, loader);
    let app = create_router(state, config.max_body_bytes);

    start_server(addr, app).await?;

    info!("👋 Goodbye!");
    Ok(())
}
