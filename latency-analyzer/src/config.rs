//! Configuration loading for latency-analyzer.
//!
//! Supports loading configuration from TOML files, with sensible defaults
//! for all settings.

use anyhow::{bail, Context, Result};
use latency_analyzer_core::{BucketRange, DEFAULT_PERCENTILES, DEFAULT_WINDOW};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for latency-analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for the statistical analysis.
    pub analysis: AnalysisConfig,
    /// Display names of the two datasets.
    pub labels: LabelsConfig,
    /// Settings for report output.
    pub output: OutputConfig,
}

/// Configuration for the statistical analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Percentile levels (0-100) to report.
    pub percentiles: Vec<f64>,
    /// Number of messages in the trailing moving average.
    pub moving_average_window: usize,
    /// Number of equal-width histogram bins.
    pub histogram_bins: usize,
    /// Confidence level for the significance test (e.g., 0.95 for 95% confidence).
    pub confidence_level: f64,
    /// Latency ranges for the distribution table; must tile [0, inf).
    pub buckets: Vec<BucketConfig>,
}

/// One latency range. A missing `upper` means unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    pub lower: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    pub label: String,
}

/// Display names of the primary and secondary datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub primary: String,
    pub secondary: String,
}

/// Configuration for report output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Whether to color terminal output.
    pub colors: bool,
    /// Write the full report as JSON to this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            percentiles: DEFAULT_PERCENTILES.to_vec(),
            moving_average_window: DEFAULT_WINDOW,
            histogram_bins: 50,
            confidence_level: 0.95,
            buckets: latency_analyzer_core::default_ranges()
                .into_iter()
                .map(BucketConfig::from)
                .collect(),
        }
    }
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            primary: "A2P (HTTP)".to_string(),
            secondary: "P2P (WebSocket)".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            colors: true,
            json_path: None,
        }
    }
}

impl From<BucketRange> for BucketConfig {
    fn from(range: BucketRange) -> Self {
        Self {
            lower: range.lower_ms,
            upper: range.upper_ms.is_finite().then_some(range.upper_ms),
            label: range.label,
        }
    }
}

impl From<&BucketConfig> for BucketRange {
    fn from(config: &BucketConfig) -> Self {
        BucketRange::new(
            config.lower,
            config.upper.unwrap_or(f64::INFINITY),
            config.label.clone(),
        )
    }
}

impl AnalysisConfig {
    /// The configured buckets as engine ranges.
    pub fn bucket_ranges(&self) -> Vec<BucketRange> {
        self.buckets.iter().map(BucketRange::from).collect()
    }
}

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".latency-analyzer.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from `path` if it exists, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Config> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Reject settings the analysis cannot run with.
    ///
    /// Percentile levels, windows, bins and buckets are checked by the engine
    /// itself; the confidence level is checked here because the significance
    /// test panics on an out-of-range value.
    pub fn validate(&self) -> Result<()> {
        let level = self.analysis.confidence_level;
        if !(level > 0.0 && level < 1.0) {
            bail!(
                "confidence_level must be between 0 and 1 (exclusive), got {}",
                level
            );
        }
        Ok(())
    }
}
