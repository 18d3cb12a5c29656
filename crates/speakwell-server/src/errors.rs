//! HTTP error mapping.
//!
//! Every error renders as `{"detail": "<message>"}`.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use speakwell_transcription::JobError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Error returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Upload rejected before transcription.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Transcription service failed.
    #[error(transparent)]
    Job(#[from] JobError),
    /// Multipart body could not be read.
    #[error(transparent)]
    Multipart(#[from] MultipartError),
    /// Server-side failure unrelated to the request.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Status code this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(ValidationError::UnsupportedContentType { .. }) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Job(_) => StatusCode::BAD_GATEWAY,
            Self::Multipart(e) => e.status(),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Multipart(e) => e.body_text(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}
