//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`; anything convertible into
//! `AppError` renders with the status, body and log level the variant declares.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ecosort_core::{AppError, ErrorMetadata, LogLevel};
use ecosort_infra::ErrorResponse;
use ecosort_storage::StorageError;

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: neither the trait nor AppError is local to this crate)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(storage_error_to_app(err))
    }
}

/// Map a storage failure onto the shared taxonomy
pub fn storage_error_to_app(err: StorageError) -> AppError {
    match err {
        StorageError::UnsupportedMediaType(ct) => AppError::InvalidMediaType(ct),
        StorageError::TooLarge { size, max } => AppError::PayloadTooLarge(format!(
            "at least {} bytes exceeds max {} bytes",
            size, max
        )),
        StorageError::Empty => AppError::MissingImage,
        StorageError::BodyRead(msg) => {
            AppError::InvalidInput(format!("Failed to read upload: {}", msg))
        }
        StorageError::NotFound(_) => AppError::NotFound("File not found".to_string()),
        StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
        StorageError::UploadFailed(msg) => AppError::Internal(msg),
        StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
        StorageError::ConfigError(msg) => AppError::Internal(msg),
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details only outside production, and never for sensitive errors.
        let details = if is_production_env() || app_error.is_sensitive() {
            None
        } else {
            Some(app_error.detailed_message())
        };

        let body = ErrorResponse::new(app_error.client_message(), app_error.error_code())
            .with_details(details);

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_map_to_client_errors() {
        assert!(matches!(
            storage_error_to_app(StorageError::UnsupportedMediaType("text/plain".into())),
            AppError::InvalidMediaType(_)
        ));
        assert!(matches!(
            storage_error_to_app(StorageError::TooLarge { size: 11, max: 10 }),
            AppError::PayloadTooLarge(_)
        ));
        assert!(matches!(
            storage_error_to_app(StorageError::Empty),
            AppError::MissingImage
        ));
    }

    #[test]
    fn test_storage_write_failures_are_internal() {
        let err = storage_error_to_app(StorageError::UploadFailed("disk full".into()));
        assert_eq!(err.http_status_code(), 500);
    }

    #[test]
    fn test_classifier_unavailable_renders_503() {
        let response = HttpAppError(AppError::ClassifierUnavailable("timed out".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
