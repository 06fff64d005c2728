//! Request handlers.
//!
//! One blocking operation per request: metadata queries and downloads run
//! yt-dlp to completion before responding. Downloads are bounded by the
//! configured timeout; expiry surfaces as a 504.

use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{info, warn};

use super::error::ApiError;
use super::AppState;
use crate::extractor::{MediaFormat, VideoInfo};
use crate::{filename, urls};

#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    pub url: Option<String>,
}

/// POST /api/fetch-video: metadata-only query.
pub async fn fetch_video(
    State(state): State<AppState>,
    Json(req): Json<FetchRequest>,
) -> Result<Json<VideoInfo>, ApiError> {
    let url = req.url.unwrap_or_default();
    let url = url.trim();
    if url.is_empty() {
        return Err(ApiError::BadRequest("Video URL is required".to_string()));
    }
    if !urls::is_valid_video_url(url) {
        return Err(ApiError::BadRequest(
            "Please provide a valid YouTube URL".to_string(),
        ));
    }

    info!(%url, "fetching video metadata");
    let video = state.extractor.fetch_metadata(url).await?;
    Ok(Json(video))
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub id: Option<String>,
    pub format: Option<String>,
    pub quality: Option<String>,
    #[serde(default)]
    pub title: String,
}

/// POST /api/download-video: download (and for mp3, transcode), then stream
/// the produced file back as an attachment.
pub async fn download_video(
    State(state): State<AppState>,
    Json(req): Json<DownloadRequest>,
) -> Result<Response, ApiError> {
    let id = req.id.unwrap_or_default();
    let id = id.trim();
    let format_raw = req.format.unwrap_or_default();
    let quality = req.quality.unwrap_or_default();
    if id.is_empty() || format_raw.trim().is_empty() || quality.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Video ID, format, and quality are required".to_string(),
        ));
    }
    // The id becomes a filesystem path component (via the empty-title
    // fallback) and a Content-Disposition value; reject anything that is
    // not a bare id before it gets there.
    if !urls::is_valid_video_id(id) {
        return Err(ApiError::BadRequest("Invalid video ID".to_string()));
    }
    let format = MediaFormat::parse(format_raw.trim())
        .ok_or_else(|| ApiError::BadRequest("Invalid format specified".to_string()))?;
    let quality = quality.trim();

    // Attachment name comes from the sanitized title; the on-disk base name
    // additionally carries the uniqueness token.
    let sanitized = filename::sanitize_title(&req.title);
    let display_name = if sanitized.is_empty() {
        id.to_string()
    } else {
        sanitized
    };
    let base_name = filename::unique_base_name(&req.title, id, Utc::now());
    let url = urls::watch_url_for_id(id);

    info!(%id, format = format.as_str(), %quality, "starting download");
    let timeout = Duration::from_secs(state.config.download_timeout_secs);
    match tokio::time::timeout(
        timeout,
        state.extractor.download_media(&url, format, quality, &base_name),
    )
    .await
    {
        Err(_) => {
            warn!(%id, timeout_secs = timeout.as_secs(), "download timed out");
            return Err(ApiError::Timeout);
        }
        Ok(Err(e)) => {
            warn!(%id, error = %e, "download failed");
            return Err(e.into());
        }
        Ok(Ok(())) => {}
    }

    // yt-dlp resolved the extension; find the file by prefix.
    let path = state
        .store
        .find_by_prefix(&base_name)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or(ApiError::DownloadFailed)?;

    let file = File::open(&path).await.map_err(|_| ApiError::DownloadFailed)?;
    let length = file.metadata().await.ok().map(|m| m.len());

    info!(%id, path = %path.display(), "streaming download to client");

    // The served-as name uses the requested format even when the on-disk
    // extension differs (yt-dlp may negotiate another container).
    let mut builder = Response::builder()
        .header(header::CONTENT_TYPE, format.content_type())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.{}\"", display_name, format.as_str()),
        )
        .header(header::CACHE_CONTROL, "no-store");
    if let Some(length) = length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }
    builder
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// POST /api/cleanup: clear the download directory unconditionally.
pub async fn cleanup(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = state
        .store
        .clear()
        .await
        .map_err(|e| ApiError::Internal(format!("Cleanup failed: {e}")))?;
    info!(removed, "download directory cleared");
    Ok(Json(json!({ "message": format!("Cleaned up {removed} files") })))
}

/// GET /health.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "message": "vidgrab is running" }))
}
