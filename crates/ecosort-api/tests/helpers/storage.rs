//! Upload store wrapper that counts accepts and releases.

use async_trait::async_trait;
use ecosort_core::UploadRecord;
use ecosort_storage::{InboundUpload, StorageResult, TempUploadStore, UploadStore};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct CountingStore {
    inner: TempUploadStore,
    accepted: AtomicUsize,
    released: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: TempUploadStore) -> Self {
        Self {
            inner,
            accepted: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    /// Successful accepts so far
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UploadStore for CountingStore {
    async fn accept(&self, upload: InboundUpload<'_>) -> StorageResult<UploadRecord> {
        let record = self.inner.accept(upload).await?;
        self.accepted.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    async fn release(&self, record: &UploadRecord) {
        self.inner.release(record).await;
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    fn max_file_size(&self) -> u64 {
        self.inner.max_file_size()
    }

    fn directory(&self) -> &Path {
        self.inner.directory()
    }
}
