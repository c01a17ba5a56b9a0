use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::WasteCategory;

/// A successful classification of one uploaded image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub category: WasteCategory,
    /// Confidence as reported by the service, passed through unscaled
    pub confidence: f64,
    /// The model's own class label, kept for diagnostics
    pub raw_label: Option<String>,
}

impl Classification {
    pub fn reward(&self) -> u32 {
        self.category.reward()
    }
}

/// Why a classification attempt produced no usable result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The service did not answer within the configured timeout
    Timeout,
    /// Connection refused, reset, DNS failure and the like
    Network(String),
    /// The service answered with a non-success HTTP status
    Status(u16),
    /// The service answered `success: false`
    Rejected(Option<String>),
    /// The body could not be decoded or lacks required fields
    Malformed(String),
    /// The stored upload could not be read
    Io(String),
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FailureReason::Timeout => write!(f, "timed out"),
            FailureReason::Network(msg) => write!(f, "network error: {}", msg),
            FailureReason::Status(code) => write!(f, "unexpected status {}", code),
            FailureReason::Rejected(Some(msg)) => write!(f, "rejected: {}", msg),
            FailureReason::Rejected(None) => write!(f, "rejected"),
            FailureReason::Malformed(msg) => write!(f, "malformed response: {}", msg),
            FailureReason::Io(msg) => write!(f, "upload unreadable: {}", msg),
        }
    }
}

/// Outcome of exactly one classification attempt.
///
/// The client never raises past its own boundary: every failure mode of the
/// external service is folded into `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Succeeded(Classification),
    Failed(FailureReason),
}

impl ClassificationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ClassificationOutcome::Succeeded(_))
    }
}

/// Flat, serializable view of a `ClassificationOutcome`
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ClassificationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_label: Option<String>,
}

impl From<&ClassificationOutcome> for ClassificationResult {
    fn from(outcome: &ClassificationOutcome) -> Self {
        match outcome {
            ClassificationOutcome::Succeeded(c) => ClassificationResult {
                success: true,
                category: Some(c.category.to_string()),
                confidence: Some(c.confidence),
                raw_label: c.raw_label.clone(),
            },
            ClassificationOutcome::Failed(_) => ClassificationResult {
                success: false,
                category: None,
                confidence: None,
                raw_label: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_view_carries_category() {
        let outcome = ClassificationOutcome::Succeeded(Classification {
            category: WasteCategory::Plastic,
            confidence: 0.92,
            raw_label: Some("PET_bottle".to_string()),
        });
        let view = ClassificationResult::from(&outcome);
        assert!(view.success);
        assert_eq!(view.category.as_deref(), Some("plastic"));
        assert_eq!(view.raw_label.as_deref(), Some("PET_bottle"));
    }

    #[test]
    fn failure_view_has_no_category_or_confidence() {
        let outcome = ClassificationOutcome::Failed(FailureReason::Timeout);
        assert!(!outcome.is_success());
        let json = serde_json::to_value(ClassificationResult::from(&outcome)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false }));
    }

    #[test]
    fn failure_reasons_render_for_logs() {
        assert_eq!(FailureReason::Status(502).to_string(), "unexpected status 502");
        assert_eq!(
            FailureReason::Rejected(Some("No file uploaded".to_string())).to_string(),
            "rejected: No file uploaded"
        );
    }
}
