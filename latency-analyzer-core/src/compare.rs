//! Two-sample comparison of key latency metrics.

use std::fmt;

use serde::Serialize;

use crate::error::AnalysisError;
use crate::sample::SampleStore;
use crate::stats::{interpolate, mean, median};

/// Which of the two compared datasets has the lower value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Faster {
    A,
    B,
    Tie,
}

impl Faster {
    /// The same verdict seen from the other side of the comparison.
    pub fn swapped(self) -> Self {
        match self {
            Faster::A => Faster::B,
            Faster::B => Faster::A,
            Faster::Tie => Faster::Tie,
        }
    }
}

/// A metric two datasets can be compared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    Mean,
    Median,
    P95,
    P99,
}

impl Metric {
    /// The metrics shown side by side when two delivery paths are compared.
    pub const KEY_METRICS: [Metric; 4] = [Metric::Mean, Metric::Median, Metric::P95, Metric::P99];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Mean => "Mean",
            Metric::Median => "Median",
            Metric::P95 => "P95",
            Metric::P99 => "P99",
        }
    }

    /// Evaluate this metric over a store.
    pub fn evaluate(self, store: &SampleStore) -> Result<f64, AnalysisError> {
        store.ensure_non_empty()?;
        let sorted = store.sorted_latencies();
        Ok(match self {
            Metric::Mean => mean(sorted),
            Metric::Median => median(sorted),
            Metric::P95 => interpolate(sorted, 95.0),
            Metric::P99 => interpolate(sorted, 99.0),
        })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Difference of one metric between datasets A and B.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub metric: Metric,
    pub value_a: f64,
    pub value_b: f64,
    pub absolute_difference: f64,
    /// Absolute difference as a percentage of the larger value.
    pub relative_difference_percent: f64,
    pub faster: Faster,
}

impl ComparisonResult {
    /// Compare two already-computed values of `metric`.
    pub fn from_values(metric: Metric, value_a: f64, value_b: f64) -> Self {
        let absolute_difference = (value_a - value_b).abs();
        let larger = value_a.max(value_b);
        let relative_difference_percent = if larger == 0.0 {
            0.0
        } else {
            100.0 * absolute_difference / larger
        };

        let faster = if value_a < value_b {
            Faster::A
        } else if value_a > value_b {
            Faster::B
        } else {
            Faster::Tie
        };

        Self {
            metric,
            value_a,
            value_b,
            absolute_difference,
            relative_difference_percent,
            faster,
        }
    }
}

/// Compare `metric` between stores `a` and `b`.
///
/// # Errors
///
/// `EmptyDataset` if either store has no samples.
pub fn compare_metric(
    metric: Metric,
    a: &SampleStore,
    b: &SampleStore,
) -> Result<ComparisonResult, AnalysisError> {
    let value_a = metric.evaluate(a)?;
    let value_b = metric.evaluate(b)?;
    Ok(ComparisonResult::from_values(metric, value_a, value_b))
}

/// Compare mean latency between stores `a` and `b`.
pub fn compare(a: &SampleStore, b: &SampleStore) -> Result<ComparisonResult, AnalysisError> {
    compare_metric(Metric::Mean, a, b)
}

/// Compare several metrics, in the order given.
pub fn compare_metrics(
    a: &SampleStore,
    b: &SampleStore,
    metrics: &[Metric],
) -> Result<Vec<ComparisonResult>, AnalysisError> {
    metrics
        .iter()
        .map(|&metric| compare_metric(metric, a, b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(name: &str, values: &[f64]) -> SampleStore {
        SampleStore::from_pairs(name, values.iter().enumerate().map(|(i, &v)| (i as i64, v)))
            .unwrap()
    }

    #[test]
    fn test_a_faster() {
        let result = ComparisonResult::from_values(Metric::Mean, 120.0, 150.0);
        assert_eq!(result.absolute_difference, 30.0);
        assert_eq!(result.relative_difference_percent, 20.0);
        assert_eq!(result.faster, Faster::A);
    }

    #[test]
    fn test_b_faster() {
        let result = ComparisonResult::from_values(Metric::Mean, 150.0, 120.0);
        assert_eq!(result.absolute_difference, 30.0);
        assert_eq!(result.relative_difference_percent, 20.0);
        assert_eq!(result.faster, Faster::B);
    }

    #[test]
    fn test_tie() {
        let result = ComparisonResult::from_values(Metric::Median, 80.0, 80.0);
        assert_eq!(result.absolute_difference, 0.0);
        assert_eq!(result.relative_difference_percent, 0.0);
        assert_eq!(result.faster, Faster::Tie);
    }

    #[test]
    fn test_both_zero() {
        let result = ComparisonResult::from_values(Metric::Mean, 0.0, 0.0);
        assert_eq!(result.relative_difference_percent, 0.0);
        assert_eq!(result.faster, Faster::Tie);
    }

    #[test]
    fn test_compare_stores_by_mean() {
        let a = store("A2P", &[100.0, 120.0, 140.0]);
        let b = store("P2P", &[140.0, 150.0, 160.0]);

        let result = compare(&a, &b).unwrap();
        assert_eq!(result.metric, Metric::Mean);
        assert_eq!(result.value_a, 120.0);
        assert_eq!(result.value_b, 150.0);
        assert_eq!(result.faster, Faster::A);
    }

    #[test]
    fn test_compare_is_symmetric() {
        let a = store("A2P", &[10.0, 35.0, 80.0]);
        let b = store("P2P", &[12.0, 18.0, 30.0, 44.0]);

        let ab = compare(&a, &b).unwrap();
        let ba = compare(&b, &a).unwrap();
        assert_eq!(ab.absolute_difference, ba.absolute_difference);
        assert_eq!(ab.relative_difference_percent, ba.relative_difference_percent);
        assert_eq!(ab.faster, ba.faster.swapped());
    }

    #[test]
    fn test_compare_key_metrics() {
        let a = store("A2P", &[10.0, 20.0, 30.0, 40.0, 50.0]);
        let b = store("P2P", &[10.0, 20.0, 30.0, 40.0, 500.0]);

        let results = compare_metrics(&a, &b, &Metric::KEY_METRICS).unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].metric, Metric::Mean);
        assert_eq!(results[0].faster, Faster::A);
        // Medians are equal
        assert_eq!(results[1].faster, Faster::Tie);
        assert_eq!(results[2].metric, Metric::P95);
        assert_eq!(results[3].faster, Faster::A);
    }

    #[test]
    fn test_compare_empty_store() {
        let a = store("A2P", &[10.0]);
        let empty = SampleStore::new("P2P", Vec::new()).unwrap();

        assert_eq!(
            compare(&a, &empty),
            Err(AnalysisError::EmptyDataset {
                dataset: "P2P".to_string()
            })
        );
    }
}
