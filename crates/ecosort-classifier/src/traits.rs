use async_trait::async_trait;
use ecosort_core::{ClassificationOutcome, UploadRecord};
use thiserror::Error;

/// Errors from the classifier's health probe
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier did not respond in time")]
    Timeout,

    #[error("classifier unreachable: {0}")]
    Unreachable(String),

    #[error("classifier unhealthy: status {0}")]
    Unhealthy(u16),

    #[error("classifier configuration error: {0}")]
    Config(String),
}

#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the image stored behind `record`. Exactly one attempt, no retries.
    async fn classify(&self, record: &UploadRecord) -> ClassificationOutcome;

    /// Liveness probe of the classification service
    async fn health(&self) -> Result<(), ClassifierError>;
}
