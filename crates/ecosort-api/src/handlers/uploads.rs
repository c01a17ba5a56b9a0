//! Public file serving under `/uploads`

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use ecosort_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Serve a persisted image by its path below the uploads root.
#[tracing::instrument(skip(state), fields(operation = "serve_upload"))]
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, HttpAppError> {
    let file = state.files.open(&path).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.content_type)
        .header(header::CONTENT_LENGTH, file.size)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from_stream(file.stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })
}
