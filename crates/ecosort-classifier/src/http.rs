//! HTTP client for the classification service
//!
//! `POST {base}/predict` with one multipart field `file`, answered by
//! `{success, waste_category, confidence, original_class}`.

use async_trait::async_trait;
use ecosort_core::{
    Classification, ClassificationOutcome, FailureReason, UploadRecord, WasteCategory,
};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::{Duration, Instant};
use tokio_util::io::ReaderStream;

use crate::traits::{Classifier, ClassifierError};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Body returned by `/predict`
#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    success: bool,
    waste_category: Option<String>,
    confidence: Option<f64>,
    original_class: Option<String>,
    error: Option<String>,
}

pub struct HttpClassifier {
    http_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl Debug for HttpClassifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HttpClassifier")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpClassifier {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClassifierError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ClassifierError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn build_form(&self, record: &UploadRecord) -> Result<Form, FailureReason> {
        let file = tokio::fs::File::open(&record.path)
            .await
            .map_err(|e| FailureReason::Io(format!("{}: {}", record.path.display(), e)))?;

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let part = Part::stream_with_length(body, record.size_bytes)
            .file_name(record.file_name.clone())
            .mime_str(&record.content_type)
            .map_err(|e| FailureReason::Io(format!("invalid content type: {}", e)))?;

        Ok(Form::new().part("file", part))
    }

    async fn request(&self, record: &UploadRecord) -> Result<PredictResponse, FailureReason> {
        let form = self.build_form(record).await?;

        let response = self
            .http_client
            .post(format!("{}/predict", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FailureReason::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(transport_failure)?;

        serde_json::from_slice::<PredictResponse>(&body)
            .map_err(|e| FailureReason::Malformed(e.to_string()))
    }
}

fn transport_failure(err: reqwest::Error) -> FailureReason {
    if err.is_timeout() {
        FailureReason::Timeout
    } else {
        FailureReason::Network(err.to_string())
    }
}

/// Turn a decoded envelope into an outcome. `success: true` without a
/// category or a finite confidence is malformed.
fn interpret(envelope: PredictResponse) -> ClassificationOutcome {
    if !envelope.success {
        return ClassificationOutcome::Failed(FailureReason::Rejected(envelope.error));
    }

    let Some(label) = envelope
        .waste_category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
    else {
        return ClassificationOutcome::Failed(FailureReason::Malformed(
            "missing waste_category".to_string(),
        ));
    };

    let Some(confidence) = envelope.confidence.filter(|c| c.is_finite()) else {
        return ClassificationOutcome::Failed(FailureReason::Malformed(
            "missing confidence".to_string(),
        ));
    };

    ClassificationOutcome::Succeeded(Classification {
        category: WasteCategory::from(label),
        confidence,
        raw_label: envelope.original_class,
    })
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, record: &UploadRecord) -> ClassificationOutcome {
        let start = Instant::now();

        let outcome = match self.request(record).await {
            Ok(envelope) => interpret(envelope),
            Err(reason) => ClassificationOutcome::Failed(reason),
        };

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        match &outcome {
            ClassificationOutcome::Succeeded(c) => tracing::info!(
                file_name = %record.file_name,
                category = %c.category,
                confidence = c.confidence,
                duration_ms = duration_ms,
                "Classification succeeded"
            ),
            ClassificationOutcome::Failed(reason) => tracing::warn!(
                file_name = %record.file_name,
                reason = %reason,
                duration_ms = duration_ms,
                "Classification failed"
            ),
        }

        outcome
    }

    async fn health(&self) -> Result<(), ClassifierError> {
        let response = self
            .http_client
            .get(format!("{}/health", self.base_url))
            .timeout(HEALTH_TIMEOUT.min(self.timeout))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout
                } else {
                    ClassifierError::Unreachable(e.to_string())
                }
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClassifierError::Unhealthy(response.status().as_u16()))
        }
    }
}
