//! latency-analyzer: compare message-delivery latency of the A2P and P2P paths
//!
//! This library loads the CSV files written by the notification-service load
//! test and runs the analysis engine of `latency-analyzer-core` over them.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod loader;

// Re-export core types for convenience
pub use latency_analyzer_core::report::{
    AnalysisReport, ComparisonReport, DatasetReport, JsonReporter, ReportError, Reporter,
    TerminalReporter,
};
pub use latency_analyzer_core::{
    AnalysisError, ComparisonResult, Faster, LatencySample, Metric, SampleStore,
    SummaryStatistics,
};

// Re-export main types from this crate
pub use analysis::{analyze_dataset, compare_datasets, load_datasets, run};
pub use cli::Cli;
pub use config::Config;
pub use loader::{load_from_reader, load_store, LoadError};
