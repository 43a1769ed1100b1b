use serde::Serialize;

use crate::compare::Faster;
use crate::error::AnalysisError;
use crate::sample::SampleStore;

/// Percentile levels reported when none are configured.
pub const DEFAULT_PERCENTILES: [f64; 5] = [50.0, 75.0, 90.0, 95.0, 99.0];

/// A single percentile level and its latency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileValue {
    /// Level in `[0, 100]`.
    pub level: f64,
    pub value_ms: f64,
}

/// Descriptive statistics of one dataset (or one group of it).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean_ms: f64,
    pub median_ms: f64,
    /// Sample standard deviation; `None` with fewer than two samples.
    pub std_dev_ms: Option<f64>,
    pub min_ms: f64,
    pub max_ms: f64,
    /// Requested percentiles in the order they were requested.
    pub percentiles: Vec<PercentileValue>,
}

impl SummaryStatistics {
    /// Look up a computed percentile by level.
    pub fn percentile(&self, level: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|p| p.level == level)
            .map(|p| p.value_ms)
    }
}

/// Check that every level lies in `[0, 100]`.
pub fn validate_levels(levels: &[f64]) -> Result<(), AnalysisError> {
    match levels.iter().find(|l| !(0.0..=100.0).contains(*l)) {
        Some(&bad) => Err(AnalysisError::InvalidPercentile(bad)),
        None => Ok(()),
    }
}

/// Linear interpolation between closest ranks (Hyndman & Fan type 7).
///
/// `sorted` must be non-empty and ascending; `level` must lie in `[0, 100]`.
pub(crate) fn interpolate(sorted: &[f64], level: f64) -> f64 {
    let rank = level / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of an ascending, non-empty slice.
pub(crate) fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Sample variance with Bessel's correction; `None` below two samples.
pub(crate) fn variance(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let sum_sq_diff: f64 = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum();
    Some(sum_sq_diff / (values.len() - 1) as f64)
}

/// Summarize an ascending, non-empty slice of latencies.
pub(crate) fn summarize_sorted(sorted: &[f64], levels: &[f64]) -> SummaryStatistics {
    let mean_ms = mean(sorted);

    SummaryStatistics {
        count: sorted.len(),
        mean_ms,
        median_ms: median(sorted),
        std_dev_ms: variance(sorted, mean_ms).map(f64::sqrt),
        min_ms: sorted[0],
        max_ms: sorted[sorted.len() - 1],
        percentiles: levels
            .iter()
            .map(|&level| PercentileValue {
                level,
                value_ms: interpolate(sorted, level),
            })
            .collect(),
    }
}

/// Compute count, mean, median, standard deviation, extremes and the
/// requested percentiles of a store.
///
/// # Errors
///
/// `EmptyDataset` if the store has no samples, `InvalidPercentile` if any
/// level lies outside `[0, 100]`.
pub fn summarize(store: &SampleStore, levels: &[f64]) -> Result<SummaryStatistics, AnalysisError> {
    store.ensure_non_empty()?;
    validate_levels(levels)?;
    Ok(summarize_sorted(store.sorted_latencies(), levels))
}

/// A single percentile of a store.
pub fn percentile(store: &SampleStore, level: f64) -> Result<f64, AnalysisError> {
    store.ensure_non_empty()?;
    validate_levels(&[level])?;
    Ok(interpolate(store.sorted_latencies(), level))
}

/// Five-number summary used to draw a box plot.
///
/// Whiskers reach the most extreme samples within 1.5 IQR of the quartiles;
/// anything beyond is an outlier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlot {
    pub q1_ms: f64,
    pub median_ms: f64,
    pub q3_ms: f64,
    pub iqr_ms: f64,
    pub lower_whisker_ms: f64,
    pub upper_whisker_ms: f64,
    pub outliers_ms: Vec<f64>,
}

impl BoxPlot {
    const WHISKER_SPAN: f64 = 1.5;

    /// Build from an ascending, non-empty slice.
    pub(crate) fn from_sorted(sorted: &[f64]) -> Self {
        let q1 = interpolate(sorted, 25.0);
        let q3 = interpolate(sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - Self::WHISKER_SPAN * iqr;
        let high_fence = q3 + Self::WHISKER_SPAN * iqr;

        let fences = low_fence..=high_fence;
        let (inside, outliers_ms): (Vec<f64>, Vec<f64>) =
            sorted.iter().copied().partition(|v| fences.contains(v));

        Self {
            q1_ms: q1,
            median_ms: median(sorted),
            q3_ms: q3,
            iqr_ms: iqr,
            lower_whisker_ms: inside.first().copied().unwrap_or(q1),
            upper_whisker_ms: inside.last().copied().unwrap_or(q3),
            outliers_ms,
        }
    }

    /// Box-plot summary of a store.
    pub fn from_store(store: &SampleStore) -> Result<Self, AnalysisError> {
        store.ensure_non_empty()?;
        Ok(Self::from_sorted(store.sorted_latencies()))
    }
}

/// The result of a significance test between two latency samples.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Probability of observing a difference at least this large by chance.
    pub p_value: f64,
    /// Whether the difference is significant at the configured confidence level.
    pub statistically_significant: bool,
    /// The confidence level used for the test (e.g., 0.95 for 95% confidence).
    pub confidence_level: f64,
    /// The dataset with the lower mean, only when the difference is significant.
    pub winner: Option<Faster>,
    pub mean_a_ms: f64,
    pub mean_b_ms: f64,
}

/// Trait for statistical tests that compare two sets of latencies.
pub trait StatisticalTest: Send + Sync {
    /// Analyze latencies of datasets A and B.
    fn analyze(&self, a: &[f64], b: &[f64]) -> TestResult;
}

mod ttest;
pub use ttest::WelchTTest;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::LatencySample;

    fn store(values: &[f64]) -> SampleStore {
        SampleStore::from_pairs(
            "test",
            values.iter().enumerate().map(|(i, &v)| (i as i64, v)),
        )
        .unwrap()
    }

    #[test]
    fn test_summarize_simple_store() {
        let stats =
            summarize(&store(&[10.0, 20.0, 30.0, 40.0, 50.0]), &DEFAULT_PERCENTILES).unwrap();

        assert_eq!(stats.count, 5);
        assert_eq!(stats.mean_ms, 30.0);
        assert_eq!(stats.median_ms, 30.0);
        assert_eq!(stats.percentile(50.0), Some(30.0));
        assert_eq!(stats.min_ms, 10.0);
        assert_eq!(stats.max_ms, 50.0);
        // sqrt(1000 / 4)
        assert!((stats.std_dev_ms.unwrap() - 15.811388).abs() < 1e-6);
    }

    #[test]
    fn test_percentile_interpolation() {
        let s = store(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        // rank = 0.95 * 4 = 3.8 -> 40 + 0.8 * 10
        assert!((percentile(&s, 95.0).unwrap() - 48.0).abs() < 1e-9);
        // rank = 0.75 * 4 = 3.0 -> exactly 40
        assert_eq!(percentile(&s, 75.0).unwrap(), 40.0);
        assert_eq!(percentile(&s, 0.0).unwrap(), 10.0);
        assert_eq!(percentile(&s, 100.0).unwrap(), 50.0);
    }

    #[test]
    fn test_percentile_unsorted_input() {
        let s = store(&[4.0, 1.0, 3.0, 2.0]);
        // rank = 0.5 * 3 = 1.5 -> 2 + 0.5 * 1
        assert_eq!(percentile(&s, 50.0).unwrap(), 2.5);
    }

    #[test]
    fn test_median_even_count() {
        let stats = summarize(&store(&[1.0, 2.0, 3.0, 10.0]), &[]).unwrap();
        assert_eq!(stats.median_ms, 2.5);
        assert!(stats.percentiles.is_empty());
    }

    #[test]
    fn test_single_sample_has_no_std_dev() {
        let stats = summarize(&store(&[42.0]), &DEFAULT_PERCENTILES).unwrap();
        assert_eq!(stats.count, 1);
        assert!(stats.std_dev_ms.is_none());
        assert_eq!(stats.percentile(99.0), Some(42.0));
    }

    #[test]
    fn test_summarize_empty_store() {
        let empty = SampleStore::new("A2P", Vec::<LatencySample>::new()).unwrap();
        assert_eq!(
            summarize(&empty, &DEFAULT_PERCENTILES),
            Err(AnalysisError::EmptyDataset {
                dataset: "A2P".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_percentile_level() {
        let s = store(&[1.0, 2.0]);
        assert_eq!(
            summarize(&s, &[50.0, 101.0]),
            Err(AnalysisError::InvalidPercentile(101.0))
        );
        assert!(matches!(
            percentile(&s, f64::NAN),
            Err(AnalysisError::InvalidPercentile(_))
        ));
    }

    #[test]
    fn test_box_plot_with_outlier() {
        let s = store(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0]);
        let plot = BoxPlot::from_store(&s).unwrap();

        assert_eq!(plot.q1_ms, 3.0);
        assert_eq!(plot.median_ms, 5.0);
        assert_eq!(plot.q3_ms, 7.0);
        assert_eq!(plot.iqr_ms, 4.0);
        assert_eq!(plot.lower_whisker_ms, 1.0);
        assert_eq!(plot.upper_whisker_ms, 8.0);
        assert_eq!(plot.outliers_ms, vec![100.0]);
    }

    #[test]
    fn test_box_plot_constant_values() {
        let plot = BoxPlot::from_store(&store(&[5.0, 5.0, 5.0])).unwrap();
        assert_eq!(plot.iqr_ms, 0.0);
        assert_eq!(plot.lower_whisker_ms, 5.0);
        assert_eq!(plot.upper_whisker_ms, 5.0);
        assert!(plot.outliers_ms.is_empty());
    }
}
