//! Read-only access to persisted images under the uploads root

use crate::keys::{content_type_for_path, key_to_path};
use crate::traits::{StorageError, StorageResult};
use bytes::Bytes;
use ecosort_core::constants::TEMP_SUBDIR;
use futures::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio_util::io::ReaderStream;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// An opened file ready to be streamed to a client
pub struct StoredFile {
    pub content_type: &'static str,
    pub size: u64,
    pub stream: ByteStream,
}

#[derive(Clone, Debug)]
pub struct PublicFiles {
    root: PathBuf,
}

impl PublicFiles {
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create uploads directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open `key` (relative to the root) for streaming.
    ///
    /// In-flight submission files under the temp directory are never served.
    pub async fn open(&self, key: &str) -> StorageResult<StoredFile> {
        let path = key_to_path(&self.root, key)?;

        if self.is_temp_path(&path).await {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let meta = match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => return Err(StorageError::NotFound(key.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => return Err(StorageError::IoError(e)),
        };

        let file = fs::File::open(&path).await?;
        let stream = ReaderStream::new(file).map(|r| r.map_err(StorageError::from));

        tracing::debug!(
            path = %path.display(),
            size_bytes = meta.len(),
            "Serving uploaded file"
        );

        Ok(StoredFile {
            content_type: content_type_for_path(&path),
            size: meta.len(),
            stream: Box::pin(stream),
        })
    }

    async fn is_temp_path(&self, path: &Path) -> bool {
        let temp_dir = self.root.join(TEMP_SUBDIR);
        if path.starts_with(&temp_dir) {
            return true;
        }

        // Symlinks or case-insensitive filesystems can still reach it.
        match (
            fs::canonicalize(path).await,
            fs::canonicalize(&temp_dir).await,
        ) {
            (Ok(resolved), Ok(temp)) => resolved.starts_with(temp),
            _ => false,
        }
    }
}
