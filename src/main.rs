//! video-gateway - role-based video download service

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_gateway::config::Config;
use video_gateway::downloader::{MediaExtractor, PresetTable};
use video_gateway::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "video_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    info!("Starting video-gateway v{}", env!("CARGO_PKG_VERSION"));

    let extractor = config.build_extractor();
    info!("Extractor: {} [{}]", extractor.mode(), extractor.name());

    if let Some(dir) = &config.workspace_dir {
        std::fs::create_dir_all(dir)?;
        info!("Workspaces under {}", dir.display());
    }

    let presets = PresetTable::standard();
    for (role, label) in presets.labels() {
        info!("Preset {} -> {}", role, label);
    }

    let state = AppState::new(presets, Arc::new(extractor))
        .with_workspace_root(config.workspace_dir.clone());
    let app = build_router(state);

    let listener = config.bind().await?;
    info!("video-gateway listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
