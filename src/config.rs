//! # Configuration
//!
//! Settings for the progress monitor and the normalizer.
//!
//! Precedence (highest to lowest):
//! 1. Command-line flags (applied by the binary)
//! 2. Environment variables (`NATAL_BATCH_*`)
//! 3. Config file (`./natal-batch.toml` or `./config/natal-batch.toml`)
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::constants::{artifacts, monitor, normalizer};
use crate::error::{BatchError, BatchResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub monitor: MonitorConfig,
    pub normalizer: NormalizerConfig,
}

/// Progress monitor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Expected number of profiles in the batch
    pub target_count: usize,
    /// Delay between polls in milliseconds
    pub poll_interval_ms: u64,
    pub summary_path: PathBuf,
    pub results_path: PathBuf,
    pub totals_path: PathBuf,
    /// Numeric field of each totals entry that must be positive to count
    pub score_field: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target_count: monitor::DEFAULT_TARGET_COUNT,
            poll_interval_ms: monitor::DEFAULT_POLL_INTERVAL_SECS * 1000,
            summary_path: PathBuf::from(artifacts::SUMMARY_PATH),
            results_path: PathBuf::from(artifacts::RESULTS_PATH),
            totals_path: PathBuf::from(artifacts::TOTALS_PATH),
            score_field: artifacts::SCORE_FIELD.to_string(),
        }
    }
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Point all three artifact paths at their default file names inside `dir`
    pub fn with_artifact_dir(mut self, dir: &Path) -> Self {
        let file_name = |path: &str| {
            Path::new(path)
                .file_name()
                .map(|name| dir.join(name))
                .unwrap_or_else(|| dir.join(path))
        };
        self.summary_path = file_name(artifacts::SUMMARY_PATH);
        self.results_path = file_name(artifacts::RESULTS_PATH);
        self.totals_path = file_name(artifacts::TOTALS_PATH);
        self
    }

    pub fn validate(&self) -> BatchResult<()> {
        if self.target_count == 0 {
            return Err(BatchError::config_error("monitor.target_count must be positive"));
        }
        if self.poll_interval_ms == 0 {
            return Err(BatchError::config_error(
                "monitor.poll_interval_ms must be positive",
            ));
        }
        if self.score_field.trim().is_empty() {
            return Err(BatchError::config_error("monitor.score_field must not be empty"));
        }
        Ok(())
    }
}

/// Normalizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Destination of the canonical stream when none is given explicitly
    pub output_path: PathBuf,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(normalizer::DEFAULT_OUTPUT_PATH),
        }
    }
}

impl BatchConfig {
    /// Load from the first config file found, then apply environment overrides
    pub fn load() -> BatchResult<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                debug!("Loading config from: {}", path.display());
                Self::load_from_file(&path)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        debug!("Loaded batch configuration: {:?}", config);
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> BatchResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BatchError::config_error(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Ok(toml::from_str(&content)?)
    }

    fn find_config_file() -> Option<PathBuf> {
        [
            Path::new("./natal-batch.toml"),
            Path::new("./config/natal-batch.toml"),
        ]
        .into_iter()
        .find(|path| path.is_file())
        .map(Path::to_path_buf)
    }

    /// Apply `NATAL_BATCH_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> BatchResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(target) = lookup("NATAL_BATCH_TARGET_COUNT") {
            self.monitor.target_count = target.parse().map_err(|e| {
                BatchError::config_error(format!("Invalid NATAL_BATCH_TARGET_COUNT: {e}"))
            })?;
        }
        if let Some(interval) = lookup("NATAL_BATCH_POLL_INTERVAL_MS") {
            self.monitor.poll_interval_ms = interval.parse().map_err(|e| {
                BatchError::config_error(format!("Invalid NATAL_BATCH_POLL_INTERVAL_MS: {e}"))
            })?;
        }
        if let Some(path) = lookup("NATAL_BATCH_SUMMARY_PATH") {
            self.monitor.summary_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("NATAL_BATCH_RESULTS_PATH") {
            self.monitor.results_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("NATAL_BATCH_TOTALS_PATH") {
            self.monitor.totals_path = PathBuf::from(path);
        }
        if let Some(field) = lookup("NATAL_BATCH_SCORE_FIELD") {
            self.monitor.score_field = field;
        }
        if let Some(path) = lookup("NATAL_BATCH_OUTPUT_PATH") {
            self.normalizer.output_path = PathBuf::from(path);
        }
        Ok(())
    }

    pub fn validate(&self) -> BatchResult<()> {
        self.monitor.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = BatchConfig::default();
        assert_eq!(config.monitor.target_count, 1000);
        assert_eq!(config.monitor.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.monitor.score_field, "TOTAL_SCORE");
        assert_eq!(
            config.monitor.summary_path,
            PathBuf::from("outputs/supabase_batch_summary.csv")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("natal-batch.toml");
        std::fs::write(&path, "[monitor]\ntarget_count = 500\npoll_interval_ms = 2000\n").unwrap();

        let config = BatchConfig::load_from_file(&path).unwrap();
        assert_eq!(config.monitor.target_count, 500);
        assert_eq!(config.monitor.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.monitor.score_field, "TOTAL_SCORE");
        assert_eq!(
            config.normalizer.output_path,
            PathBuf::from("profiles_converted.txt")
        );
    }

    #[test]
    fn test_unparsable_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("natal-batch.toml");
        std::fs::write(&path, "[monitor\n").unwrap();

        let err = BatchConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, BatchError::Configuration(_)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("NATAL_BATCH_TARGET_COUNT", "2000"),
            ("NATAL_BATCH_POLL_INTERVAL_MS", "250"),
            ("NATAL_BATCH_SCORE_FIELD", "SCORE"),
        ]
        .into_iter()
        .collect();

        let mut config = BatchConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.monitor.target_count, 2000);
        assert_eq!(config.monitor.poll_interval_ms, 250);
        assert_eq!(config.monitor.score_field, "SCORE");
    }

    #[test]
    fn test_invalid_override() {
        let mut config = BatchConfig::default();
        let err = config
            .apply_overrides(|key| (key == "NATAL_BATCH_TARGET_COUNT").then(|| "many".to_string()))
            .unwrap_err();
        assert!(matches!(err, BatchError::Configuration(_)));
    }

    #[test]
    fn test_validation() {
        let mut config = MonitorConfig::default();
        config.target_count = 0;
        assert!(config.validate().is_err());

        let mut config = MonitorConfig::default();
        config.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_artifact_dir() {
        let config = MonitorConfig::default().with_artifact_dir(Path::new("/tmp/run"));
        assert_eq!(
            config.summary_path,
            PathBuf::from("/tmp/run/supabase_batch_summary.csv")
        );
        assert_eq!(config.totals_path, PathBuf::from("/tmp/run/animal_totals.json"));
    }
}
