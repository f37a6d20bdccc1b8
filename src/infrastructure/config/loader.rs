use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::VerifierConfig;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Fleet tag cannot be empty")]
    EmptyFleetTag,

    #[error("Bucket cannot be empty")]
    EmptyBucket,

    #[error("Key prefix cannot be empty")]
    EmptyKeyPrefix,

    #[error("Marker prefix cannot be empty")]
    EmptyMarkerPrefix,

    #[error("Invalid {phase} timeout: {seconds}s. Must be positive")]
    InvalidTimeout { phase: &'static str, seconds: u64 },

    #[error("Invalid {phase} poll interval: {seconds}s. Must be positive and at most the timeout")]
    InvalidPollInterval { phase: &'static str, seconds: u64 },

    #[error("Invalid max_concurrency: {0}. Must be at least 1")]
    InvalidMaxConcurrency(usize),

    #[error("Invalid report window: {0} minutes. Must be positive")]
    InvalidReportWindow(i64),

    #[error("Scale-in target ({scale_in}) exceeds scale-out target ({scale_out})")]
    InvertedTargets { scale_in: usize, scale_out: usize },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. fleetcheck.yaml in the working directory
    /// 3. Environment variables (`FLEETCHECK_*` prefix, highest priority)
    pub fn load() -> Result<VerifierConfig> {
        let config: VerifierConfig = Figment::new()
            .merge(Serialized::defaults(VerifierConfig::default()))
            .merge(Yaml::file("fleetcheck.yaml"))
            .merge(Env::prefixed("FLEETCHECK_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<VerifierConfig> {
        let config: VerifierConfig = Figment::new()
            .merge(Serialized::defaults(VerifierConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("FLEETCHECK_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &VerifierConfig) -> Result<(), ConfigError> {
        if config.fleet_tag.trim().is_empty() {
            return Err(ConfigError::EmptyFleetTag);
        }
        if config.bucket.trim().is_empty() {
            return Err(ConfigError::EmptyBucket);
        }
        if config.key_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyKeyPrefix);
        }
        if config.probe.marker_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyMarkerPrefix);
        }

        for (phase, scale) in [
            ("scale_out", &config.scale_out),
            ("scale_in", &config.scale_in),
        ] {
            if scale.timeout_seconds == 0 {
                return Err(ConfigError::InvalidTimeout {
                    phase,
                    seconds: scale.timeout_seconds,
                });
            }
            if scale.poll_interval_seconds == 0
                || scale.poll_interval_seconds > scale.timeout_seconds
            {
                return Err(ConfigError::InvalidPollInterval {
                    phase,
                    seconds: scale.poll_interval_seconds,
                });
            }
        }

        if config.max_concurrency == 0 {
            return Err(ConfigError::InvalidMaxConcurrency(config.max_concurrency));
        }

        if config.report_window_minutes <= 0 {
            return Err(ConfigError::InvalidReportWindow(config.report_window_minutes));
        }

        if config.scale_in.target_count > config.scale_out.target_count {
            return Err(ConfigError::InvertedTargets {
                scale_in: config.scale_in.target_count,
                scale_out: config.scale_out.target_count,
            });
        }

        Ok(())
    }
}
