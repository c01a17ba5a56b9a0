//! Health check handlers and response types.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use ecosort_core::constants::SERVICE_NAME;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns status string "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub service: String,
    pub environment: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeepHealthResponse {
    pub status: String,
    pub classifier: String,
    pub upload_dir: String,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses((status = 200, description = "Service is running", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        service: SERVICE_NAME.to_string(),
        environment: state.config.environment.clone(),
    })
}

/// Dependency check: classification service and upload directory
#[utoipa::path(
    get,
    path = "/api/health/deep",
    tag = "health",
    responses(
        (status = 200, description = "All dependencies healthy", body = DeepHealthResponse),
        (status = 503, description = "A dependency is degraded", body = DeepHealthResponse)
    )
)]
pub async fn deep_health(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<DeepHealthResponse>) {
    let (classifier, upload_dir) = tokio::join!(
        run_check(CHECK_TIMEOUT, state.classifier.health(), "unhealthy"),
        run_check(CHECK_TIMEOUT, check_upload_dir(&state), "unhealthy"),
    );

    let healthy = classifier == "healthy" && upload_dir == "healthy";
    if !healthy {
        tracing::warn!(
            classifier = %classifier,
            upload_dir = %upload_dir,
            "Deep health check degraded"
        );
    }

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(DeepHealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            classifier,
            upload_dir,
        }),
    )
}

async fn check_upload_dir(state: &AppState) -> Result<(), String> {
    let dir = state.uploads.directory();
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(format!("{} is not a directory", dir.display())),
        Err(e) => Err(e.to_string()),
    }
}
