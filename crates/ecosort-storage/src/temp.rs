use crate::keys::{content_type_allowed, generate_file_name, normalize_mime_type};
use crate::traits::{InboundUpload, StorageError, StorageResult, UploadStore};
use async_trait::async_trait;
use ecosort_core::UploadRecord;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Filesystem store for images that only live for the duration of one submission
#[derive(Clone)]
pub struct TempUploadStore {
    dir: PathBuf,
    max_file_size: u64,
    allowed_content_types: Arc<[String]>,
}

impl TempUploadStore {
    /// Create a new TempUploadStore, creating `dir` if needed
    ///
    /// # Arguments
    /// * `dir` - Directory for in-flight files (e.g., "uploads/temp")
    /// * `max_file_size` - Upper bound on a single upload, in bytes
    /// * `allowed_content_types` - MIME allowlist; `image/*` style wildcards allowed
    pub async fn new(
        dir: impl Into<PathBuf>,
        max_file_size: u64,
        allowed_content_types: Vec<String>,
    ) -> StorageResult<Self> {
        let dir = dir.into();

        fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create upload directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        Ok(TempUploadStore {
            dir,
            max_file_size,
            allowed_content_types: allowed_content_types.into(),
        })
    }

    /// Stream `body` into `path`, stopping as soon as the limit is crossed.
    async fn write_body(
        &self,
        path: &Path,
        mut body: impl tokio::io::AsyncRead + Unpin,
    ) -> StorageResult<u64> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        let mut written: u64 = 0;

        loop {
            let n = body
                .read(&mut buf)
                .await
                .map_err(|e| StorageError::BodyRead(e.to_string()))?;
            if n == 0 {
                break;
            }

            written += n as u64;
            if written > self.max_file_size {
                return Err(StorageError::TooLarge {
                    size: written,
                    max: self.max_file_size,
                });
            }

            file.write_all(&buf[..n]).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to write file {}: {}",
                    path.display(),
                    e
                ))
            })?;
        }

        if written == 0 {
            return Err(StorageError::Empty);
        }

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(written)
    }

    /// Remove a partially written file
    async fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove rejected upload"
                );
            }
        }
    }
}

#[async_trait]
impl UploadStore for TempUploadStore {
    async fn accept(&self, upload: InboundUpload<'_>) -> StorageResult<UploadRecord> {
        let InboundUpload {
            original_name,
            content_type,
            declared_size,
            body,
        } = upload;

        let content_type = normalize_mime_type(&content_type);
        if !content_type_allowed(&content_type, &self.allowed_content_types) {
            return Err(StorageError::UnsupportedMediaType(content_type));
        }

        if let Some(size) = declared_size {
            if size > self.max_file_size {
                return Err(StorageError::TooLarge {
                    size,
                    max: self.max_file_size,
                });
            }
        }

        let file_name = generate_file_name(&original_name, &content_type)?;
        let path = self.dir.join(&file_name);
        let start = std::time::Instant::now();

        let size_bytes = match self.write_body(&path, body).await {
            Ok(size) => size,
            Err(e) => {
                self.discard(&path).await;
                return Err(e);
            }
        };

        tracing::info!(
            path = %path.display(),
            content_type = %content_type,
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Temporary upload stored"
        );

        Ok(UploadRecord {
            file_name,
            path,
            content_type,
            size_bytes,
        })
    }

    async fn release(&self, record: &UploadRecord) {
        match fs::remove_file(&record.path).await {
            Ok(()) => {
                tracing::debug!(path = %record.path.display(), "Temporary upload released");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    path = %record.path.display(),
                    "Temporary upload already gone"
                );
            }
            Err(e) => {
                tracing::warn!(
                    path = %record.path.display(),
                    error = %e,
                    "Failed to remove temporary upload"
                );
            }
        }
    }

    fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    fn directory(&self) -> &Path {
        &self.dir
    }
}
