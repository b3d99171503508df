//! HTTP handlers for the REST API.
//!
//! Upload endpoints take the raw `application/octet-stream` body. The upload
//! name comes from the `X-File-Name` header or the `filename` query parameter
//! and defaults to `upload.txt`.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    Json,
};

use super::dto::{
    CompositionResult, HealthResponse, ResponseEnvelope, TableResult, TableSummary, UploadQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::storage::DEFAULT_UPLOAD_NAME;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Header carrying the client-side file name.
pub const FILE_NAME_HEADER: &str = "x-file-name";

/// Resolve the upload name: header first, then query, then the default.
pub fn upload_name(headers: &HeaderMap, query: &UploadQuery) -> Result<String, AppError> {
    if let Some(value) = headers.get(FILE_NAME_HEADER) {
        let name = value
            .to_str()
            .map_err(|_| AppError::BadRequest(format!("{} must be visible ASCII", FILE_NAME_HEADER)))?;
        return Ok(name.to_string());
    }
    Ok(query
        .filename
        .clone()
        .unwrap_or_else(|| DEFAULT_UPLOAD_NAME.to_string()))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Legacy EDX endpoints
// =============================================================================

/// POST /databasevaluesbody
///
/// Returns the fixed sample composition. The body is not inspected.
pub async fn composition_values() -> ResponseEnvelope {
    CompositionResult::template().into()
}

/// POST /validation/body
///
/// Validates the uploaded file. Failures are reported in the body
/// (`Code: 500`) with transport status 200.
pub async fn validate_body(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ResponseEnvelope, AppError> {
    let name = upload_name(&headers, &query)?;
    Ok(state.pipeline.validate_upload(&body, &name).await.into())
}

/// POST /tablebody
///
/// Returns the fixed measurement table. The body is not inspected.
pub async fn table_body() -> ResponseEnvelope {
    TableResult::template().into()
}

// =============================================================================
// Inspection
// =============================================================================

/// POST /inspection/body
///
/// Parses the uploaded file as a tab-delimited table and returns its header
/// and row count.
pub async fn inspect_body(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResult<TableSummary> {
    let name = upload_name(&headers, &query)?;
    let table = state.pipeline.read_upload(&body, &name).await?;
    Ok(Json(TableSummary::new(name, &table)))
}
