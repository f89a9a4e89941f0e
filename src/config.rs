//! Runtime configuration for the forge.
//!
//! Collects the knobs that parameterize generated build tasks: the
//! container images the task steps run in and the poll interval of the
//! wait step. Values come from environment variables with sensible
//! defaults, so a bare `ForgeConfig::default()` reproduces the stock
//! build protocol.

use thiserror::Error;

/// Default image for the curl/rm utility steps.
const DEFAULT_UTILITY_IMAGE: &str = "registry.access.redhat.com/ubi9:latest";

/// Default image for the compose polling step.
const DEFAULT_COMPOSER_IMAGE: &str = "quay.io/cgament/composer-cli";

/// Default interval between compose queue polls, in seconds.
///
/// The generated wait script embeds this value. The build-and-poll
/// protocol is specified with a 30 second cadence; overriding it changes
/// the protocol for every task generated afterwards.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration for task generation.
#[derive(Debug, Clone)]
pub struct ForgeConfig {
    /// Container image used for the curl and cleanup steps.
    pub utility_image: String,
    /// Container image used for the compose polling step.
    pub composer_image: String,
    /// Seconds between compose queue polls in the wait script.
    pub poll_interval_secs: u64,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            utility_image: DEFAULT_UTILITY_IMAGE.to_string(),
            composer_image: DEFAULT_COMPOSER_IMAGE.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl ForgeConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FORGE_UTILITY_IMAGE`: image for curl/cleanup steps
    /// - `FORGE_COMPOSER_IMAGE`: image for the polling step
    /// - `FORGE_POLL_INTERVAL_SECS`: queue poll cadence in seconds
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(image) = std::env::var("FORGE_UTILITY_IMAGE") {
            config.utility_image = image;
        }
        if let Ok(image) = std::env::var("FORGE_COMPOSER_IMAGE") {
            config.composer_image = image;
        }
        if let Ok(value) = std::env::var("FORGE_POLL_INTERVAL_SECS") {
            config.poll_interval_secs =
                value
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "FORGE_POLL_INTERVAL_SECS".to_string(),
                        message: format!("'{value}' is not a valid number of seconds"),
                    })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.utility_image.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "utility image must not be empty".to_string(),
            ));
        }
        if self.composer_image.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "composer image must not be empty".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "poll interval must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ForgeConfig::default();
        assert_eq!(config.utility_image, DEFAULT_UTILITY_IMAGE);
        assert_eq!(config.composer_image, DEFAULT_COMPOSER_IMAGE);
        assert_eq!(config.poll_interval_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_image() {
        let config = ForgeConfig {
            utility_image: String::new(),
            ..ForgeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let config = ForgeConfig {
            poll_interval_secs: 0,
            ..ForgeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }
}
