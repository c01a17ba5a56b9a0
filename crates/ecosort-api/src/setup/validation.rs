//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use ecosort_core::Config;

/// Validate critical configuration values
///
/// Hard errors come from `Config::validate`; settings that work but are
/// likely mistakes in production only produce warnings.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() {
        let env_var = std::env::var("ENVIRONMENT")
            .or_else(|_| std::env::var("APP_ENV"))
            .ok();
        if env_var.is_none() {
            tracing::warn!(
                "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
            );
        }

        if config.ml_service_url.contains("localhost") || config.ml_service_url.contains("127.0.0.1")
        {
            tracing::warn!(
                ml_service_url = %config.ml_service_url,
                "ML_SERVICE_URL points at localhost in production"
            );
        }

        if config.client_url.starts_with("http://localhost") {
            tracing::warn!(
                client_url = %config.client_url,
                "CLIENT_URL is a localhost origin in production"
            );
        }
    }

    if config.ml_timeout.as_secs() > 60 {
        tracing::warn!(
            ml_timeout_secs = config.ml_timeout.as_secs(),
            "ML_TIMEOUT_SECS is very high - clients may give up before the classifier does"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config {
            max_file_size_bytes: 0,
            ml_timeout: Duration::from_secs(15),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
