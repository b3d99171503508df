//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::IngestError;
use crate::validation::UNKNOWN_COLUMN_DIAGNOSTIC;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (e.g. unreadable upload name)
    BadRequest(String),
    /// Pipeline error on the read path
    Ingest(IngestError),
}

impl AppError {
    /// Client-facing message for a pipeline error. Internal detail stays in the logs.
    fn ingest_message(err: &IngestError) -> &'static str {
        match err {
            IngestError::UnsupportedFormat { .. } => "Error reading file: unsupported format",
            IngestError::MalformedTable { .. } => "Error reading file: malformed table",
            IngestError::Io { .. } => "Error reading file",
            IngestError::ValidationFailed { .. } => UNKNOWN_COLUMN_DIAGNOSTIC,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("BAD_REQUEST", msg),
            ),
            AppError::Ingest(e) => {
                tracing::error!(error = %e, "request failed on the read path");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new(e.kind(), Self::ingest_message(&e)),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::Ingest(err)
    }
}
