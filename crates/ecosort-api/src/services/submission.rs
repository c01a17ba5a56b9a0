//! Submission pipeline: store, classify, reward, clean up.

use chrono::Utc;
use ecosort_classifier::Classifier;
use ecosort_core::{
    AppError, Classification, ClassificationOutcome, ClassificationResult, RewardEvent,
    RewardReporter, WasteCategory,
};
use ecosort_storage::{InboundUpload, UploadLease, UploadStore};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::error::storage_error_to_app;

/// A rewarded classification, ready to be returned to the client
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub category: WasteCategory,
    pub confidence: f64,
    pub coins: u32,
    pub raw_label: Option<String>,
}

impl From<Classification> for Prediction {
    fn from(classification: Classification) -> Self {
        let coins = classification.reward();
        Prediction {
            category: classification.category,
            confidence: classification.confidence,
            coins,
            raw_label: classification.raw_label,
        }
    }
}

#[derive(Clone)]
pub struct SubmissionService {
    uploads: Arc<dyn UploadStore>,
    classifier: Arc<dyn Classifier>,
    rewards: Arc<dyn RewardReporter>,
}

impl SubmissionService {
    pub fn new(
        uploads: Arc<dyn UploadStore>,
        classifier: Arc<dyn Classifier>,
        rewards: Arc<dyn RewardReporter>,
    ) -> Self {
        Self {
            uploads,
            classifier,
            rewards,
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.uploads.max_file_size()
    }

    /// Run one submission end to end.
    ///
    /// Validation failures happen before anything is written. Once the upload
    /// is stored, its file is released before this returns, whatever the
    /// classifier did, including panicking.
    pub async fn submit(&self, upload: InboundUpload<'_>) -> Result<Prediction, AppError> {
        let record = self
            .uploads
            .accept(upload)
            .await
            .map_err(storage_error_to_app)?;

        let lease = UploadLease::new(Arc::clone(&self.uploads), record);
        let classified = AssertUnwindSafe(self.classifier.classify(lease.record()))
            .catch_unwind()
            .await;
        lease.release().await;

        let outcome = classified
            .map_err(|_| AppError::Internal("classifier panicked".to_string()))?;

        tracing::debug!(
            result = ?ClassificationResult::from(&outcome),
            "Classification finished"
        );

        match outcome {
            ClassificationOutcome::Succeeded(classification) => {
                let prediction = Prediction::from(classification);
                tracing::info!(
                    category = %prediction.category,
                    confidence = prediction.confidence,
                    coins = prediction.coins,
                    "Submission rewarded"
                );
                self.report(&prediction);
                Ok(prediction)
            }
            ClassificationOutcome::Failed(reason) => {
                Err(AppError::ClassifierUnavailable(reason.to_string()))
            }
        }
    }

    fn report(&self, prediction: &Prediction) {
        let rewards = Arc::clone(&self.rewards);
        let event = RewardEvent {
            category: prediction.category.to_string(),
            confidence: prediction.confidence,
            coins: prediction.coins,
            raw_label: prediction.raw_label.clone(),
            classified_at: Utc::now(),
        };

        tokio::spawn(async move {
            if let Err(e) = rewards.report_reward(event).await {
                tracing::warn!(error = %e, "Failed to report reward");
            }
        });
    }
}
