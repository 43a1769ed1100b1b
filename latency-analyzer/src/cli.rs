//! Command-line interface for latency-analyzer.

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "latency-analyzer")]
#[command(about = "Summarize and compare message-delivery latency recorded by the load test")]
#[command(version)]
pub struct Cli {
    /// CSV of the primary dataset (A2P over HTTP)
    pub primary: PathBuf,

    /// CSV of the secondary dataset (P2P over WebSocket); enables comparison
    pub secondary: Option<PathBuf>,

    /// Path to config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Messages per moving-average window
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Percentile level to report (repeatable, replaces the configured set)
    #[arg(short, long = "percentile")]
    pub percentiles: Vec<f64>,

    /// Number of histogram bins
    #[arg(long)]
    pub bins: Option<usize>,

    /// Confidence level for the significance test (0.0-1.0)
    #[arg(long)]
    pub confidence_level: Option<f64>,

    /// Display name of the primary dataset
    #[arg(long)]
    pub primary_label: Option<String>,

    /// Display name of the secondary dataset
    #[arg(long)]
    pub secondary_label: Option<String>,

    /// Also write the full report as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values.
    /// Only non-None optional values will override the config.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(window) = self.window {
            config.analysis.moving_average_window = window;
        }

        if !self.percentiles.is_empty() {
            config.analysis.percentiles = self.percentiles.clone();
        }

        if let Some(bins) = self.bins {
            config.analysis.histogram_bins = bins;
        }

        if let Some(confidence_level) = self.confidence_level {
            config.analysis.confidence_level = confidence_level;
        }

        if let Some(label) = &self.primary_label {
            config.labels.primary = label.clone();
        }

        if let Some(label) = &self.secondary_label {
            config.labels.secondary = label.clone();
        }

        if let Some(path) = &self.json {
            config.output.json_path = Some(path.clone());
        }

        if self.no_color {
            config.output.colors = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_minimal() {
        let cli = Cli::parse_from(["latency-analyzer", "a2p-latency-1700000000.csv"]);

        assert_eq!(cli.primary, PathBuf::from("a2p-latency-1700000000.csv"));
        assert!(cli.secondary.is_none());
        assert_eq!(cli.config, PathBuf::from(".latency-analyzer.toml"));
        assert!(cli.window.is_none());
        assert!(cli.percentiles.is_empty());
        assert!(!cli.no_color);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_two_datasets() {
        let cli = Cli::parse_from([
            "latency-analyzer",
            "a2p.csv",
            "p2p.csv",
            "--window",
            "20",
            "-p",
            "50",
            "-p",
            "99.9",
            "--json",
            "report.json",
            "--verbose",
        ]);

        assert_eq!(cli.secondary, Some(PathBuf::from("p2p.csv")));
        assert_eq!(cli.window, Some(20));
        assert_eq!(cli.percentiles, vec![50.0, 99.9]);
        assert_eq!(cli.json, Some(PathBuf::from("report.json")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_requires_primary() {
        assert!(Cli::try_parse_from(["latency-analyzer"]).is_err());
    }

    #[test]
    fn test_apply_to_config_with_overrides() {
        let cli = Cli::parse_from([
            "latency-analyzer",
            "a2p.csv",
            "--window",
            "10",
            "--percentile",
            "90",
            "--bins",
            "25",
            "--confidence-level",
            "0.99",
            "--primary-label",
            "HTTP",
            "--secondary-label",
            "WS",
            "--no-color",
        ]);

        let mut config = Config::default();
        cli.apply_to_config(&mut config);

        assert_eq!(config.analysis.moving_average_window, 10);
        assert_eq!(config.analysis.percentiles, vec![90.0]);
        assert_eq!(config.analysis.histogram_bins, 25);
        assert_eq!(config.analysis.confidence_level, 0.99);
        assert_eq!(config.labels.primary, "HTTP");
        assert_eq!(config.labels.secondary, "WS");
        assert!(!config.output.colors);
    }

    #[test]
    fn test_apply_to_config_without_overrides() {
        let cli = Cli::parse_from(["latency-analyzer", "a2p.csv"]);

        let mut config = Config::default();
        cli.apply_to_config(&mut config);

        // Values should remain unchanged
        assert_eq!(config.analysis.moving_average_window, 50);
        assert_eq!(config.analysis.percentiles.len(), 5);
        assert_eq!(config.labels.primary, "A2P (HTTP)");
        assert!(config.output.colors);
        assert!(config.output.json_path.is_none());
    }
}
