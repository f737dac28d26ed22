//! Error payload returned by `/download`
//!
//! Failures are reported as `{"error": "<message>"}`. Extraction failures
//! keep status 200, so clients detect them from the body; a request without
//! `url` is rejected with 422 before any work starts.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::downloader::ExtractionError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required query parameter: url")]
    MissingUrl,

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Failed to build response: {0}")]
    Response(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingUrl => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Extraction(_) | Self::Response(_) => StatusCode::OK,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingUrl.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let missing = ApiError::from(ExtractionError::MissingOutput(PathBuf::from("/w/a.mp4")));
        assert_eq!(missing.status_code(), StatusCode::OK);
        assert_eq!(ApiError::Response("bad".into()).status_code(), StatusCode::OK);
    }
}
