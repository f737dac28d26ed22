//! `GET /download?url=<string>&quality=<role>`
//!
//! Runs the extractor into a fresh workspace and streams the muxed file
//! back. The workspace is owned by the response body and removed when the
//! body is dropped; on any earlier failure it is dropped before the error
//! payload is returned.

use axum::{
    body::Body,
    extract::{RawQuery, State},
    http::{header, HeaderName, Response, StatusCode},
    response::IntoResponse,
};
use tracing::{info, warn};

use super::error::ApiError;
use crate::downloader::{
    sanitize_filename, DownloadRequest, ExtractorOptions, QualityPreset, Role, Workspace,
};
use crate::AppState;

/// Exposes the resolved preset label to the client
pub const X_VIDEO_QUALITY: HeaderName = HeaderName::from_static("x-video-quality");

pub async fn download_video(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Response<Body> {
    let params = DownloadRequest::from_query(query.as_deref());

    let (role, preset) = state.presets.resolve(params.quality.as_deref());

    let Some(url) = params.url else {
        return ApiError::MissingUrl.into_response();
    };

    match serve_download(&state, &url, role, preset).await {
        Ok(response) => response,
        Err(e) => {
            warn!(url = %url, role = %role, "Download failed: {}", e);
            e.into_response()
        }
    }
}

#[tracing::instrument(skip(state, preset), fields(quality = %preset.label))]
async fn serve_download(
    state: &AppState,
    url: &str,
    role: Role,
    preset: &QualityPreset,
) -> Result<Response<Body>, ApiError> {
    let workspace = match &state.workspace_root {
        Some(root) => Workspace::create_in(root)?,
        None => Workspace::create()?,
    };
    let options = ExtractorOptions::for_preset(preset, workspace.output_template());

    info!(extractor = state.extractor.name(), "Starting download");
    let media = state.extractor.extract_and_download(url, &options).await?;

    let output = media.output_path(&options.outtmpl);
    let safe_title = sanitize_filename(media.display_title());
    info!(id = %media.id, file = %output.display(), "Download finished, streaming");

    let stream = workspace.stream_file(output).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.mp4\"", safe_title),
        )
        .header(header::CACHE_CONTROL, "no-cache")
        .header(X_VIDEO_QUALITY, preset.label.as_str())
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::Response(e.to_string()))
}
