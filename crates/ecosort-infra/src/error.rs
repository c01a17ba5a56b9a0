//! HTTP error response body
//!
//! `IntoResponse` for `AppError` lives in the API crate; only the wire shape is
//! shared here.

use serde::Serialize;
use utoipa::ToSchema;

/// Error body returned by every endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    pub error: String,
    /// Machine-readable error code (e.g. "MISSING_IMAGE")
    pub code: String,
    /// Always `false`: a failed classification is never replaced by a guess
    #[serde(rename = "isFallback")]
    pub is_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
            is_fallback: false,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_fallback_flag_in_camel_case() {
        let body = serde_json::to_value(ErrorResponse::new("No image provided", "MISSING_IMAGE"))
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "error": "No image provided",
                "code": "MISSING_IMAGE",
                "isFallback": false
            })
        );
    }

    #[test]
    fn test_details_included_when_present() {
        let body = serde_json::to_value(
            ErrorResponse::new("File too large", "PAYLOAD_TOO_LARGE")
                .with_details(Some("11 MB".to_string())),
        )
        .unwrap();
        assert_eq!(body["details"], "11 MB");
    }
}
