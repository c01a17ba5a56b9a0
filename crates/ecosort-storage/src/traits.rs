//! Upload store abstraction
//!
//! The submission orchestrator only talks to `UploadStore`, so tests can wrap
//! the filesystem store to observe every accept/release pair.

use async_trait::async_trait;
use ecosort_core::UploadRecord;
use std::path::Path;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Upload of at least {size} bytes exceeds limit of {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("Upload is empty")]
    Empty,

    #[error("Failed to read upload body: {0}")]
    BodyRead(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An image arriving from a client, not yet written anywhere
pub struct InboundUpload<'a> {
    /// Filename as sent by the client; sanitized before use
    pub original_name: String,
    /// MIME type as declared by the client
    pub content_type: String,
    /// Size declared up front, when the transport carries one
    pub declared_size: Option<u64>,
    pub body: Pin<Box<dyn AsyncRead + Send + Unpin + 'a>>,
}

impl std::fmt::Debug for InboundUpload<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundUpload")
            .field("original_name", &self.original_name)
            .field("content_type", &self.content_type)
            .field("declared_size", &self.declared_size)
            .finish_non_exhaustive()
    }
}

/// Transient storage for submission images
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Validate and persist an inbound upload.
    ///
    /// Rejects unsupported media types and oversized uploads before writing
    /// anything. A stream that turns out to exceed the limit is cut off at the
    /// limit and its partial file removed.
    async fn accept(&self, upload: InboundUpload<'_>) -> StorageResult<UploadRecord>;

    /// Delete the file behind `record`. A missing file is not an error;
    /// failures are logged and never propagated.
    async fn release(&self, record: &UploadRecord);

    /// Maximum accepted upload size in bytes
    fn max_file_size(&self) -> u64;

    /// Directory the store writes into
    fn directory(&self) -> &Path;
}
