use std::path::PathBuf;

/// One transient file written for a single submission.
///
/// Immutable once created; the store that produced it is the only thing that
/// deletes the file behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    /// `{unix millis}-{random}-{sanitized original name}`
    pub file_name: String,
    pub path: PathBuf,
    /// Normalized MIME type (parameters stripped, lowercase)
    pub content_type: String,
    pub size_bytes: u64,
}
