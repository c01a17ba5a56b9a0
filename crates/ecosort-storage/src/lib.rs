//! Ecosort Storage Library
//!
//! Local filesystem storage for the submission pipeline:
//!
//! - `TempUploadStore` writes each inbound image to the temp directory under a
//!   collision-resistant name and deletes it again on release.
//! - `UploadLease` pairs one accepted upload with exactly one release.
//! - `PublicFiles` serves previously persisted images by relative key.
//!
//! # Naming
//!
//! Stored names are `{unix millis}-{random}-{sanitized original name}`. Keys
//! handed to `PublicFiles` must not contain `..` or a leading `/`.

pub mod files;
pub mod keys;
pub mod lease;
pub mod temp;
pub mod traits;

// Re-export commonly used types
pub use files::{PublicFiles, StoredFile};
pub use lease::UploadLease;
pub use temp::TempUploadStore;
pub use traits::{InboundUpload, StorageError, StorageResult, UploadStore};
