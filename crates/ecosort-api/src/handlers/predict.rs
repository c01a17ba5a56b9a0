use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    Json,
};
use ecosort_core::AppError;
use ecosort_infra::ErrorResponse;
use ecosort_storage::keys::normalize_mime_type;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::HttpAppError;
use crate::services::submission::Prediction;
use crate::state::AppState;
use crate::utils::upload::{inline_body_limit, multipart_body_limit, ImageSource};

/// Successful classification with its reward
#[derive(Debug, Serialize, ToSchema)]
pub struct PredictResponse {
    /// Always `true`
    pub success: bool,
    /// Waste category, e.g. "plastic"
    #[serde(rename = "type")]
    pub category: String,
    /// Confidence as reported by the classifier
    pub confidence: f64,
    pub coins: u32,
    /// The classifier's own class label
    pub raw_prediction: Option<String>,
    #[serde(rename = "isFallback")]
    pub is_fallback: bool,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        PredictResponse {
            success: true,
            category: prediction.category.to_string(),
            confidence: prediction.confidence,
            coins: prediction.coins,
            raw_prediction: prediction.raw_label,
            is_fallback: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InlineImageRequest {
    image: Option<String>,
}

/// Classify a waste image and compute its reward
///
/// Accepts `multipart/form-data` with a file field `file` (or a text field
/// `image`), or `application/json` with a base64 `image`. The submitted image
/// is stored only for the duration of the request.
///
/// # Errors
/// - `AppError::MissingImage` - No image in the request
/// - `AppError::InvalidMediaType` - Not an allowed image type
/// - `AppError::PayloadTooLarge` - Image exceeds the size limit
/// - `AppError::ClassifierUnavailable` - Classifier failed, timed out or answered garbage
/// - `AppError::Internal` - Storage failure or a crashed pipeline
#[utoipa::path(
    post,
    path = "/api/ml/predict",
    tag = "classification",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image classified", body = PredictResponse),
        (status = 400, description = "Missing, invalid or oversized image", body = ErrorResponse),
        (status = 503, description = "ML service unavailable", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "predict"))]
pub async fn predict(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<PredictResponse>, HttpAppError> {
    let max_file_size = state.config.max_file_size_bytes;
    let source = read_image_source(&state, request, max_file_size).await?;

    // Run detached so a client disconnect cannot interrupt cleanup.
    let service = state.submissions();
    let task = tokio::spawn(async move { source.submit(&service).await });

    let prediction = task.await.map_err(|e| {
        if e.is_panic() {
            AppError::Internal("submission task panicked".to_string())
        } else {
            AppError::Internal(format!("submission task failed: {}", e))
        }
    })??;

    Ok(Json(PredictResponse::from(prediction)))
}

async fn read_image_source(
    state: &Arc<AppState>,
    request: Request,
    max_file_size: u64,
) -> Result<ImageSource, AppError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(normalize_mime_type)
        .unwrap_or_default();

    let content_length = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let reject_declared = |limit: u64| -> Result<(), AppError> {
        match content_length {
            Some(len) if len > limit => Err(AppError::PayloadTooLarge(format!(
                "declared body of {} bytes exceeds limit {} bytes",
                len, limit
            ))),
            _ => Ok(()),
        }
    };

    match content_type.as_str() {
        "multipart/form-data" => {
            reject_declared(multipart_body_limit(max_file_size))?;
            let multipart = Multipart::from_request(request, state)
                .await
                .map_err(|e| AppError::InvalidInput(e.body_text()))?;
            Ok(ImageSource::Multipart(multipart))
        }
        "application/json" => {
            reject_declared(inline_body_limit(max_file_size))?;
            let body = Bytes::from_request(request, state).await.map_err(|e| {
                if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    AppError::PayloadTooLarge(e.body_text())
                } else {
                    AppError::InvalidInput(e.body_text())
                }
            })?;
            let payload: InlineImageRequest = serde_json::from_slice(&body)?;
            payload
                .image
                .filter(|s| !s.trim().is_empty())
                .map(ImageSource::Inline)
                .ok_or(AppError::MissingImage)
        }
        _ => Err(AppError::MissingImage),
    }
}
