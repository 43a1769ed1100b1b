use thiserror::Error;

/// Errors produced by the analysis engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A summary, curve, or comparison was requested over a store with no samples.
    #[error("Dataset '{dataset}' has no samples")]
    EmptyDataset { dataset: String },

    /// A sample carried a negative or non-finite latency.
    #[error("Dataset '{dataset}': sample {index} has invalid latency {value}")]
    InvalidLatency {
        dataset: String,
        index: usize,
        value: f64,
    },

    /// A percentile level outside `[0, 100]`.
    #[error("Percentile level must be within [0, 100], got {0}")]
    InvalidPercentile(f64),

    /// A moving-average window of zero samples.
    #[error("Moving average window must be at least 1")]
    InvalidWindow,

    /// A histogram with zero bins.
    #[error("Histogram must have at least 1 bin")]
    InvalidBins,

    /// Bucket ranges that do not tile `[0, inf)`.
    #[error("Invalid bucket ranges: {0}")]
    InvalidBuckets(String),
}

impl AnalysisError {
    pub(crate) fn empty(dataset: &str) -> Self {
        Self::EmptyDataset {
            dataset: dataset.to_string(),
        }
    }
}
