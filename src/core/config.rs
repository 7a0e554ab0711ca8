//! Timing Configuration
//!
//! One immutable [`TimingConfig`] is constructed per request and threaded
//! explicitly through every component call. There is no global mutable
//! configuration and no environment-driven toggles inside the engine.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Provider fallback order must list at least one provider")]
    EmptyFallbackOrder,

    #[error("Unknown synthesis provider in fallback order: {0}")]
    UnknownProvider(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Per-request timing configuration.
///
/// The enumerated surface is exactly: fallback order, per-provider timeout,
/// section size limit, global caption offset, and worker pool size. Nothing
/// else is recognized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimingConfig {
    /// Ordered list of synthesis provider identifiers; the first healthy
    /// provider wins, the rest are the retry policy
    #[serde(default = "default_fallback_order")]
    pub provider_fallback_order: Vec<String>,

    /// Timeout applied to each external adapter call, in seconds
    #[serde(default = "default_provider_timeout")]
    pub per_provider_timeout_sec: f64,

    /// Maximum characters per section (provider request limit)
    #[serde(default = "default_max_section_chars")]
    pub max_section_chars: usize,

    /// Uniform caption timing correction in seconds; may be negative
    #[serde(default)]
    pub global_offset_seconds: f64,

    /// Number of sections synthesized/recognized concurrently
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,
}

fn default_fallback_order() -> Vec<String> {
    vec![
        "elevenlabs".to_string(),
        "coqui".to_string(),
        "speecht5".to_string(),
    ]
}

fn default_provider_timeout() -> f64 {
    30.0
}

fn default_max_section_chars() -> usize {
    // Conservative limit below the strictest provider's per-request cap
    2000
}

fn default_worker_pool_size() -> usize {
    num_cpus::get().clamp(1, 4)
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            provider_fallback_order: default_fallback_order(),
            per_provider_timeout_sec: default_provider_timeout(),
            max_section_chars: default_max_section_chars(),
            global_offset_seconds: 0.0,
            worker_pool_size: default_worker_pool_size(),
        }
    }
}

impl TimingConfig {
    /// Loads a config from a JSON file, filling omitted fields with defaults
    /// and clamping out-of-range values.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: TimingConfig = serde_json::from_str(&content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Normalizes and clamps values so a loaded config is always usable.
    ///
    /// Tolerant on ranges, strict on structure: bad numbers are corrected,
    /// but an empty fallback order still fails validation.
    pub fn normalize(&mut self) {
        self.per_provider_timeout_sec = clamp_f64(self.per_provider_timeout_sec, 1.0, 600.0);
        self.worker_pool_size = self.worker_pool_size.clamp(1, 32);
        if !self.global_offset_seconds.is_finite() {
            self.global_offset_seconds = 0.0;
        }
    }

    /// Validates structural requirements that clamping cannot repair.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.provider_fallback_order.is_empty() {
            return Err(ConfigError::EmptyFallbackOrder);
        }
        if self.max_section_chars == 0 {
            return Err(ConfigError::InvalidValue(
                "maxSectionChars must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Per-provider timeout as a [`Duration`]
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.per_provider_timeout_sec)
    }

    /// Sets the fallback order
    pub fn with_fallback_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provider_fallback_order = order.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the per-provider timeout in seconds
    pub fn with_provider_timeout(mut self, seconds: f64) -> Self {
        self.per_provider_timeout_sec = seconds;
        self
    }

    /// Sets the maximum section length in characters
    pub fn with_max_section_chars(mut self, max_chars: usize) -> Self {
        self.max_section_chars = max_chars;
        self
    }

    /// Sets the global caption offset in seconds
    pub fn with_global_offset(mut self, seconds: f64) -> Self {
        self.global_offset_seconds = seconds;
        self
    }

    /// Sets the worker pool size
    pub fn with_worker_pool_size(mut self, size: usize) -> Self {
        self.worker_pool_size = size;
        self
    }
}

fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.clamp(min, max)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TimingConfig::default();
        assert_eq!(config.provider_fallback_order.len(), 3);
        assert_eq!(config.provider_fallback_order[0], "elevenlabs");
        assert_eq!(config.per_provider_timeout_sec, 30.0);
        assert_eq!(config.max_section_chars, 2000);
        assert_eq!(config.global_offset_seconds, 0.0);
        assert!(config.worker_pool_size >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = TimingConfig::default()
            .with_fallback_order(["coqui"])
            .with_provider_timeout(10.0)
            .with_max_section_chars(500)
            .with_global_offset(-0.25)
            .with_worker_pool_size(2);

        assert_eq!(config.provider_fallback_order, vec!["coqui"]);
        assert_eq!(config.per_provider_timeout_sec, 10.0);
        assert_eq!(config.max_section_chars, 500);
        assert_eq!(config.global_offset_seconds, -0.25);
        assert_eq!(config.worker_pool_size, 2);
    }

    #[test]
    fn test_normalize_clamps_out_of_range_values() {
        let mut config = TimingConfig::default()
            .with_provider_timeout(10_000.0)
            .with_worker_pool_size(500);
        config.global_offset_seconds = f64::NAN;

        config.normalize();

        assert_eq!(config.per_provider_timeout_sec, 600.0);
        assert_eq!(config.worker_pool_size, 32);
        assert_eq!(config.global_offset_seconds, 0.0);
    }

    #[test]
    fn test_validate_empty_fallback_order() {
        let config = TimingConfig::default().with_fallback_order(Vec::<String>::new());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyFallbackOrder)
        ));
    }

    #[test]
    fn test_validate_zero_section_chars() {
        let config = TimingConfig::default().with_max_section_chars(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timing.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"providerFallbackOrder": ["coqui"]}}"#).unwrap();

        let config = TimingConfig::load(&path).unwrap();
        assert_eq!(config.provider_fallback_order, vec!["coqui"]);
        // Omitted fields fall back to defaults
        assert_eq!(config.max_section_chars, 2000);
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timing.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"unknownOption": true}}"#).unwrap();

        assert!(matches!(
            TimingConfig::load(&path),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = TimingConfig::default().with_global_offset(0.5);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: TimingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
