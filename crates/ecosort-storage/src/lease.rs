//! Release-once ownership of an accepted upload
//!
//! An `UploadLease` is created right after `UploadStore::accept` succeeds. The
//! orchestrator releases it explicitly on every path it controls; if the lease
//! is dropped instead (panic, cancelled task) the file is still removed.

use crate::traits::UploadStore;
use ecosort_core::UploadRecord;
use std::sync::Arc;

pub struct UploadLease {
    store: Arc<dyn UploadStore>,
    record: UploadRecord,
    released: bool,
}

impl UploadLease {
    pub fn new(store: Arc<dyn UploadStore>, record: UploadRecord) -> Self {
        Self {
            store,
            record,
            released: false,
        }
    }

    pub fn record(&self) -> &UploadRecord {
        &self.record
    }

    /// Delete the underlying file. Consumes the lease so it cannot run twice.
    pub async fn release(mut self) {
        self.store.release(&self.record).await;
        self.released = true;
    }
}

impl Drop for UploadLease {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        tracing::warn!(
            path = %self.record.path.display(),
            "Upload lease dropped without release, cleaning up"
        );

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = Arc::clone(&self.store);
                let record = self.record.clone();
                handle.spawn(async move {
                    store.release(&record).await;
                });
            }
            Err(_) => {
                if let Err(e) = std::fs::remove_file(&self.record.path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(
                            path = %self.record.path.display(),
                            error = %e,
                            "Failed to remove temporary upload"
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temp::TempUploadStore;
    use crate::traits::InboundUpload;
    use std::time::Duration;

    async fn accepted() -> (tempfile::TempDir, Arc<dyn UploadStore>, UploadRecord) {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn UploadStore> = Arc::new(
            TempUploadStore::new(dir.path(), 1024, vec!["image/*".to_string()])
                .await
                .unwrap(),
        );
        let record = store
            .accept(InboundUpload {
                original_name: "can.png".to_string(),
                content_type: "image/png".to_string(),
                declared_size: None,
                body: Box::pin(&b"png"[..]),
            })
            .await
            .unwrap();
        (dir, store, record)
    }

    #[tokio::test]
    async fn test_release_removes_file() {
        let (_dir, store, record) = accepted().await;
        let path = record.path.clone();

        let lease = UploadLease::new(store, record);
        assert_eq!(lease.record().path, path);
        lease.release().await;

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_without_release_still_cleans_up() {
        let (_dir, store, record) = accepted().await;
        let path = record.path.clone();

        drop(UploadLease::new(store, record));

        for _ in 0..50 {
            if !path.exists() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("file was not removed after lease drop");
    }

    #[test]
    fn test_drop_outside_runtime_removes_synchronously() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (_dir, store, record) = rt.block_on(accepted());
        let path = record.path.clone();

        drop(UploadLease::new(store, record));

        assert!(!path.exists());
    }
}
