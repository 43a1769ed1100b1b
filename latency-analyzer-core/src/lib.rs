//! Latency distribution analysis engine.
//!
//! Every operation is a pure function over an immutable [`SampleStore`]:
//! summary statistics, fixed-range buckets, the empirical CDF, a smoothed
//! time series, per-chat groups, and the comparison of two datasets.

pub mod buckets;
pub mod cdf;
pub mod compare;
pub mod error;
pub mod groups;
pub mod report;
pub mod sample;
pub mod stats;
pub mod timeseries;

// Re-export main types for convenience
pub use buckets::{classify, default_ranges, histogram, Bucket, BucketDistribution, BucketRange};
pub use cdf::{build_cdf, markers, CdfCurve, CdfMarker, CdfPoint, MARKER_LEVELS};
pub use compare::{compare, compare_metric, compare_metrics, ComparisonResult, Faster, Metric};
pub use error::AnalysisError;
pub use groups::{aggregate, GroupAggregation, GroupKey, GroupSummary};
pub use report::{
    AnalysisReport, ComparisonReport, DatasetReport, JsonReporter, ReportError, Reporter,
    TerminalReporter,
};
pub use sample::{LatencySample, SampleStore};
pub use stats::{
    percentile, summarize, BoxPlot, StatisticalTest, SummaryStatistics, TestResult, WelchTTest,
    DEFAULT_PERCENTILES,
};
pub use timeseries::{smooth, TimeSeriesPoint, DEFAULT_WINDOW};
