//! Naming and key rules for stored files

use crate::traits::{StorageError, StorageResult};
use chrono::Utc;
use rand::Rng;
use std::path::{Component, Path, PathBuf};

const MAX_FILENAME_LENGTH: usize = 255;

/// Build the on-disk name for an upload: `{unix millis}-{random}-{sanitized name}`.
///
/// If the sanitized name carries no extension, one is derived from the
/// content type so the classifier can still recognise the format.
pub fn generate_file_name(original_name: &str, content_type: &str) -> StorageResult<String> {
    let mut name = sanitize_filename(original_name)?;

    if Path::new(&name).extension().is_none() {
        if let Some(ext) = extension_for_content_type(content_type) {
            name = format!("{}.{}", name, ext);
        }
    }

    let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
    let prefix = format!("{}-{}-", Utc::now().timestamp_millis(), suffix);
    let name = truncate_keeping_extension(&name, MAX_FILENAME_LENGTH - prefix.len());
    Ok(format!("{}{}", prefix, name))
}

/// Shorten an ASCII file name to `max` bytes, cutting the stem rather than
/// the extension.
fn truncate_keeping_extension(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }

    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() + 2 <= max => {
            let keep = max - ext.len() - 1;
            format!("{}.{}", &stem[..keep.min(stem.len())], ext)
        }
        _ => name[..max].to_string(),
    }
}

/// Sanitize a client-supplied filename.
///
/// Directory components are dropped and any character outside
/// `[A-Za-z0-9._-]` is replaced with `_`. Names left shorter than three
/// characters become `file`; long names are shortened to
/// `MAX_FILENAME_LENGTH` bytes with the extension kept.
pub fn sanitize_filename(filename: &str) -> StorageResult<String> {
    let filename_only = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if filename_only.contains("..") {
        return Err(StorageError::InvalidKey(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('_').is_empty() || sanitized.len() < 3 {
        return Ok("file".to_string());
    }

    Ok(truncate_keeping_extension(&sanitized, MAX_FILENAME_LENGTH))
}

/// Normalize a MIME type by stripping parameters and lowercasing
/// (e.g. "Image/JPEG; charset=utf-8" -> "image/jpeg").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// Check a normalized content type against the allowlist.
/// Entries ending in `/*` match the whole top-level type.
pub fn content_type_allowed(content_type: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|entry| {
        let entry = entry.to_lowercase();
        match entry.strip_suffix("/*") {
            Some(top) => content_type
                .split_once('/')
                .map(|(t, sub)| t == top && !sub.is_empty())
                .unwrap_or(false),
            None => entry == content_type,
        }
    })
}

pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    match normalize_mime_type(content_type).as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/bmp" | "image/x-ms-bmp" => Some("bmp"),
        _ => None,
    }
}

/// Guess the content type of a stored file from its extension
pub fn content_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Resolve a relative key below `base`, refusing anything that could escape it.
pub(crate) fn key_to_path(base: &Path, key: &str) -> StorageResult<PathBuf> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }

    // `.` components would let a key alias another one.
    if !Path::new(key)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
        || key.split('/').any(|part| part == ".")
    {
        return Err(StorageError::InvalidKey(
            "Storage key must be a plain relative path".to_string(),
        ));
    }

    let path = base.join(key);

    let base_canonical = base.canonicalize().map_err(|e| {
        StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
    })?;

    // Symlinks inside the base could still point elsewhere.
    if let Ok(canonical) = path.canonicalize() {
        if canonical.strip_prefix(&base_canonical).is_err() {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }
    }

    Ok(path)
}
