use ecosort_classifier::Classifier;
use ecosort_core::{Config, RewardReporter};
use ecosort_storage::{PublicFiles, UploadStore};
use std::sync::Arc;

use crate::services::submission::SubmissionService;

/// Shared application state
pub struct AppState {
    pub config: Config,
    /// Transient store for in-flight submission images
    pub uploads: Arc<dyn UploadStore>,
    /// Persisted images served under `/uploads`
    pub files: PublicFiles,
    pub classifier: Arc<dyn Classifier>,
    pub rewards: Arc<dyn RewardReporter>,
}

impl AppState {
    pub fn submissions(&self) -> SubmissionService {
        SubmissionService::new(
            Arc::clone(&self.uploads),
            Arc::clone(&self.classifier),
            Arc::clone(&self.rewards),
        )
    }
}
