//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p ecosort-api`.

#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use axum::Router;
use axum_test::TestServer;
use ecosort_api::setup::routes;
use ecosort_api::AppState;
use ecosort_classifier::{Classifier, HttpClassifier};
use ecosort_core::{Config, NoOpRewardReporter};
use ecosort_storage::{PublicFiles, TempUploadStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use storage::CountingStore;

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    /// The same router, for requests that bypass the test client
    pub router: Router,
    pub store: Arc<CountingStore>,
    pub config: Config,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn temp_upload_dir(&self) -> PathBuf {
        self.config.temp_upload_dir()
    }

    /// Number of files currently in the temp upload directory
    pub fn temp_file_count(&self) -> usize {
        std::fs::read_dir(self.temp_upload_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Knobs for `setup_test_app`
pub struct TestOptions {
    pub ml_service_url: String,
    pub ml_timeout: Duration,
    pub max_file_size_bytes: u64,
    /// Replaces the HTTP classifier when set
    pub classifier: Option<Arc<dyn Classifier>>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            ml_service_url: "http://127.0.0.1:9".to_string(),
            ml_timeout: Duration::from_secs(5),
            max_file_size_bytes: 10 * 1024 * 1024,
            classifier: None,
        }
    }
}

impl TestOptions {
    pub fn with_ml_service(url: impl Into<String>) -> Self {
        Self {
            ml_service_url: url.into(),
            ..Self::default()
        }
    }
}

/// Setup a test app with isolated upload directories.
pub async fn setup_test_app(options: TestOptions) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let config = Config {
        upload_dir: temp_dir.path().join("uploads"),
        ml_service_url: options.ml_service_url.clone(),
        ml_timeout: options.ml_timeout,
        max_file_size_bytes: options.max_file_size_bytes,
        ..Config::default()
    };

    let inner = TempUploadStore::new(
        config.temp_upload_dir(),
        config.max_file_size_bytes,
        config.allowed_content_types.clone(),
    )
    .await
    .expect("Failed to create upload store");
    let store = Arc::new(CountingStore::new(inner));

    let files = PublicFiles::new(&config.upload_dir)
        .await
        .expect("Failed to create public files");

    let classifier: Arc<dyn Classifier> = match options.classifier {
        Some(classifier) => classifier,
        None => Arc::new(
            HttpClassifier::new(&config.ml_service_url, config.ml_timeout)
                .expect("Failed to create classifier"),
        ),
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        uploads: store.clone(),
        files,
        classifier,
        rewards: Arc::new(NoOpRewardReporter),
    });

    let router = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(router.clone()).expect("Failed to create test server");

    TestApp {
        server,
        router,
        store,
        config,
        _temp_dir: temp_dir,
    }
}

/// A classification service that accepts connections and never answers.
pub async fn spawn_silent_classifier() -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    let handle = tokio::spawn(async move {
        let mut open = Vec::new();
        loop {
            if let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        }
    });

    (format!("http://{}", addr), handle)
}
