//! Request-boundary error type.
//!
//! Every failure is recovered here and converted to a JSON `{error}` body
//! with a status code; no request failure is fatal to the process.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::extractor::ExtractError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Playlist URLs are not supported. Please provide a single video URL")]
    Playlist,

    #[error("{0}")]
    Extraction(String),

    #[error("Download failed, file not found on server")]
    DownloadFailed,

    #[error("ffmpeg is required for audio conversion but was not found on the server")]
    TranscoderMissing,

    #[error("The download timed out")]
    Timeout,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Playlist => StatusCode::BAD_REQUEST,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Extraction(_)
            | ApiError::DownloadFailed
            | ApiError::TranscoderMissing
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Playlist => ApiError::Playlist,
            ExtractError::TranscoderMissing => ApiError::TranscoderMissing,
            other => ApiError::Extraction(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
