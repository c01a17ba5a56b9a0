//! Configuration module
//!
//! Runtime settings for the API: listen port, CORS origins, upload limits and
//! the location of the external classification service. Values come from the
//! environment (optionally seeded from a `.env` file).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_ALLOWED_CONTENT_TYPES, DEFAULT_ALLOWED_ORIGINS, DEFAULT_CLIENT_URL,
    DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_ML_SERVICE_URL, DEFAULT_ML_TIMEOUT_SECS, DEFAULT_PORT,
    DEFAULT_UPLOAD_DIR, TEMP_SUBDIR,
};

/// Output format of the tracing subscriber
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// Origin allowed to fetch files under `/uploads`
    pub client_url: String,
    pub ml_service_url: String,
    pub ml_timeout: Duration,
    pub max_file_size_bytes: u64,
    pub allowed_content_types: Vec<String>,
    pub upload_dir: PathBuf,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            environment: "development".to_string(),
            cors_origins: split_list(DEFAULT_ALLOWED_ORIGINS),
            client_url: DEFAULT_CLIENT_URL.to_string(),
            ml_service_url: DEFAULT_ML_SERVICE_URL.to_string(),
            ml_timeout: Duration::from_secs(DEFAULT_ML_TIMEOUT_SECS),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_content_types: split_list(DEFAULT_ALLOWED_CONTENT_TYPES)
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            log_format: LogFormat::Pretty,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or(defaults.environment);

        let client_url = env::var("CLIENT_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().trim_end_matches('/').to_string());

        let mut cors_origins = env::var("ALLOWED_ORIGINS")
            .map(|s| split_list(&s))
            .unwrap_or(defaults.cors_origins);

        let is_production = is_production_env(&environment);
        if let (true, Some(url)) = (is_production, client_url.as_ref()) {
            if !cors_origins.contains(url) {
                cors_origins.push(url.clone());
            }
        }

        let max_file_size_bytes = parse_max_file_size(
            &env::var("MAX_FILE_SIZE_MB").unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_MB.to_string()),
        )?;

        let ml_timeout_secs = env::var("ML_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_ML_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("ML_TIMEOUT_SECS must be a whole number of seconds"))?;

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .map(|s| split_list(&s).into_iter().map(|s| s.to_lowercase()).collect())
            .unwrap_or(defaults.allowed_content_types);

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            client_url: client_url.unwrap_or(defaults.client_url),
            ml_service_url: env::var("ML_SERVICE_URL")
                .unwrap_or(defaults.ml_service_url)
                .trim()
                .trim_end_matches('/')
                .to_string(),
            ml_timeout: Duration::from_secs(ml_timeout_secs),
            max_file_size_bytes,
            allowed_content_types,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.ml_timeout.is_zero() {
            return Err(anyhow::anyhow!("ML_TIMEOUT_SECS must be greater than 0"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if !(self.ml_service_url.starts_with("http://")
            || self.ml_service_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "ML_SERVICE_URL must be an http(s) URL, got '{}'",
                self.ml_service_url
            ));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES must list at least one image type"
            ));
        }

        if let Some(bad) = self
            .allowed_content_types
            .iter()
            .find(|ct| !ct.starts_with("image/"))
        {
            return Err(anyhow::anyhow!(
                "ALLOWED_CONTENT_TYPES may only contain image types, got '{}'",
                bad
            ));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "ALLOWED_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.environment)
    }

    /// Directory holding in-flight submission files
    pub fn temp_upload_dir(&self) -> PathBuf {
        self.upload_dir.join(TEMP_SUBDIR)
    }
}

/// Parse `MAX_FILE_SIZE_MB` into a byte count
fn parse_max_file_size(value: &str) -> Result<u64, anyhow::Error> {
    let mb = value
        .trim()
        .parse::<u64>()
        .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_MB must be a whole number of megabytes"))?;
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large: {}", mb))
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}
