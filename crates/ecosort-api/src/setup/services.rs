//! Construction of the shared state

use crate::state::AppState;
use anyhow::{Context, Result};
use ecosort_classifier::HttpClassifier;
use ecosort_core::{Config, NoOpRewardReporter};
use ecosort_storage::{PublicFiles, TempUploadStore};
use std::sync::Arc;

/// Create the upload directories and wire the pipeline components
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let files = PublicFiles::new(&config.upload_dir)
        .await
        .context("Failed to prepare uploads directory")?;

    let uploads = TempUploadStore::new(
        config.temp_upload_dir(),
        config.max_file_size_bytes,
        config.allowed_content_types.clone(),
    )
    .await
    .context("Failed to prepare temporary upload directory")?;

    let classifier = HttpClassifier::new(&config.ml_service_url, config.ml_timeout)
        .context("Failed to create classifier client")?;

    tracing::info!(
        upload_dir = %config.upload_dir.display(),
        temp_dir = %config.temp_upload_dir().display(),
        ml_service_url = %config.ml_service_url,
        ml_timeout_secs = config.ml_timeout.as_secs(),
        "Services initialized"
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        uploads: Arc::new(uploads),
        files,
        classifier: Arc::new(classifier),
        rewards: Arc::new(NoOpRewardReporter),
    }))
}
