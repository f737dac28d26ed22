//! video-gateway library
//!
//! HTTP facade over yt-dlp: `/download` maps the caller's role to a quality
//! preset, lets yt-dlp fetch and mux the video into a per-request temporary
//! directory, and streams the result back.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod config;
pub mod downloader;

use downloader::{MediaExtractor, PresetTable};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Role → preset mapping, read-only after startup
    pub presets: Arc<PresetTable>,
    pub extractor: Arc<dyn MediaExtractor>,
    /// Parent of per-request workspaces; system temp dir when `None`
    pub workspace_root: Option<PathBuf>,
}

impl AppState {
    pub fn new(presets: PresetTable, extractor: Arc<dyn MediaExtractor>) -> Self {
        Self {
            presets: Arc::new(presets),
            extractor,
            workspace_root: None,
        }
    }

    pub fn with_workspace_root(mut self, root: Option<PathBuf>) -> Self {
        self.workspace_root = root;
        self
    }
}

/// Build application router
///
/// CORS mirrors any origin and allows credentials, methods and headers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/download", get(api::download_video))
        .route("/quality-info", get(api::quality_info))
        .merge(api::health_routes())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
