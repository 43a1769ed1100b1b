use serde::Serialize;
use thiserror::Error;

use crate::buckets::{BucketDistribution, HistogramBin};
use crate::cdf::{CdfCurve, CdfMarker};
use crate::compare::ComparisonResult;
use crate::groups::GroupAggregation;
use crate::stats::{BoxPlot, SummaryStatistics, TestResult};
use crate::timeseries::TimeSeriesPoint;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything derived from one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetReport {
    pub name: String,
    pub summary: SummaryStatistics,
    pub buckets: BucketDistribution,
    pub cdf: CdfCurve,
    /// P95 and P99 reference lines on `cdf`.
    pub cdf_markers: Vec<CdfMarker>,
    pub time_series: Vec<TimeSeriesPoint>,
    /// Window the moving average in `time_series` was computed with.
    pub moving_average_window: usize,
    pub histogram: Vec<HistogramBin>,
    pub box_plot: BoxPlot,
    pub groups: GroupAggregation,
}

/// Comparison of the primary (A) and secondary (B) datasets.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub name_a: String,
    pub name_b: String,
    /// The mean comparison first, followed by the other key metrics.
    pub metrics: Vec<ComparisonResult>,
    pub significance: TestResult,
}

impl ComparisonReport {
    /// The comparison on mean latency, if present.
    pub fn mean(&self) -> Option<&ComparisonResult> {
        self.metrics
            .iter()
            .find(|r| r.metric == crate::compare::Metric::Mean)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub datasets: Vec<DatasetReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonReport>,
}

pub trait Reporter: Send + Sync {
    fn report(&self, report: &AnalysisReport) -> Result<(), ReportError>;
}

mod json;
mod terminal;
pub use json::JsonReporter;
pub use terminal::TerminalReporter;
