//! Defaults shared by configuration, storage and the HTTP layer.

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ML_SERVICE_URL: &str = "http://localhost:5001";
pub const DEFAULT_ML_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_CLIENT_URL: &str = "http://localhost:5173";
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &str =
    "image/jpeg,image/png,image/gif,image/webp,image/bmp";

/// Subdirectory of the uploads root holding in-flight submission files
pub const TEMP_SUBDIR: &str = "temp";

/// Service name reported by the health endpoint and logs
pub const SERVICE_NAME: &str = "waste-classification-api";
