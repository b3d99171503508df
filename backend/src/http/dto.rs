//! Data Transfer Objects for the HTTP API.
//!
//! The three legacy response bodies live in [`crate::envelope`] and are
//! re-exported here; this module adds the request-side types and the bodies
//! of the endpoints that only exist in this service.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

pub use crate::envelope::{
    Composition, CompositionElement, CompositionResult, DataTable, Numeric, Property,
    ResponseEnvelope, SpectrumRow, TableResult, ValidationResult,
};
use crate::parsing::TabularTable;

/// Legacy endpoints always answer 200 with the envelope as the JSON body.
impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Query parameters accepted by the upload endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UploadQuery {
    /// Client-side file name; the `X-File-Name` header takes precedence
    #[serde(default)]
    pub filename: Option<String>,
}

/// Summary of a parsed upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableSummary {
    /// Upload name the table was read under
    pub name: String,
    /// Header columns in file order
    pub columns: Vec<String>,
    /// Number of data rows
    pub row_count: usize,
}

impl TableSummary {
    pub fn new(name: impl Into<String>, table: &TabularTable) -> Self {
        Self {
            name: name.into(),
            columns: table.columns().to_vec(),
            row_count: table.len(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Crate version
    pub version: String,
}
