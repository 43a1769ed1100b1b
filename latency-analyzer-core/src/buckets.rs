//! Fixed latency ranges and equal-width histograms.

use serde::Serialize;

use crate::error::AnalysisError;
use crate::sample::SampleStore;

/// A half-open latency range `[lower_ms, upper_ms)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketRange {
    pub lower_ms: f64,
    /// Exclusive; `f64::INFINITY` for the open-ended last range.
    pub upper_ms: f64,
    pub label: String,
}

impl BucketRange {
    pub fn new(lower_ms: f64, upper_ms: f64, label: impl Into<String>) -> Self {
        Self {
            lower_ms,
            upper_ms,
            label: label.into(),
        }
    }

    pub fn contains(&self, latency_ms: f64) -> bool {
        self.lower_ms <= latency_ms && latency_ms < self.upper_ms
    }
}

/// The ranges reported when none are configured.
pub fn default_ranges() -> Vec<BucketRange> {
    vec![
        BucketRange::new(0.0, 100.0, "< 100ms"),
        BucketRange::new(100.0, 200.0, "100-200ms"),
        BucketRange::new(200.0, 500.0, "200-500ms"),
        BucketRange::new(500.0, 1000.0, "500-1000ms"),
        BucketRange::new(1000.0, f64::INFINITY, "> 1000ms"),
    ]
}

/// Check that `ranges` tile `[0, inf)` in ascending order.
pub fn validate_ranges(ranges: &[BucketRange]) -> Result<(), AnalysisError> {
    let invalid = |reason: String| Err(AnalysisError::InvalidBuckets(reason));

    let (Some(first), Some(last)) = (ranges.first(), ranges.last()) else {
        return invalid("at least one range is required".to_string());
    };
    if first.lower_ms != 0.0 {
        return invalid(format!("first range must start at 0, got {}", first.lower_ms));
    }
    if last.upper_ms != f64::INFINITY {
        return invalid(format!("last range must be unbounded, got {}", last.upper_ms));
    }
    if let Some(range) = ranges.iter().find(|r| !(r.lower_ms < r.upper_ms)) {
        return invalid(format!("range '{}' is empty", range.label));
    }
    if let Some(pair) = ranges.windows(2).find(|w| w[0].upper_ms != w[1].lower_ms) {
        return invalid(format!(
            "'{}' ends at {} but '{}' starts at {}",
            pair[0].label, pair[0].upper_ms, pair[1].label, pair[1].lower_ms
        ));
    }
    Ok(())
}

/// Sample count and share of one range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub lower_ms: f64,
    pub upper_ms: f64,
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

impl Bucket {
    /// A bar of one block per two percentage points.
    pub fn density_bar(&self) -> String {
        "\u{2588}".repeat((self.percentage / 2.0) as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketDistribution {
    pub total: usize,
    pub buckets: Vec<Bucket>,
}

/// Count how many samples fall in each range.
///
/// With an empty store every bucket reports zero samples and zero percent.
pub fn classify(
    store: &SampleStore,
    ranges: &[BucketRange],
) -> Result<BucketDistribution, AnalysisError> {
    validate_ranges(ranges)?;

    let mut counts = vec![0usize; ranges.len()];
    for latency in store.latencies() {
        // Ranges tile [0, inf) and latencies are non-negative, so one always matches
        if let Some(idx) = ranges.iter().position(|r| r.contains(latency)) {
            counts[idx] += 1;
        }
    }

    let total = store.len();
    let buckets = ranges
        .iter()
        .zip(counts)
        .map(|(range, count)| Bucket {
            lower_ms: range.lower_ms,
            upper_ms: range.upper_ms,
            label: range.label.clone(),
            count,
            percentage: if total == 0 {
                0.0
            } else {
                100.0 * count as f64 / total as f64
            },
        })
        .collect();

    Ok(BucketDistribution { total, buckets })
}

/// One equal-width histogram bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower_ms: f64,
    pub upper_ms: f64,
    pub count: usize,
}

/// Split `[min, max]` into `bins` equal-width bins.
///
/// Every bin is half-open except the last, which also holds the maximum.
/// When all samples share one value a single unit-width bin centred on it is returned.
pub fn histogram(store: &SampleStore, bins: usize) -> Result<Vec<HistogramBin>, AnalysisError> {
    if bins == 0 {
        return Err(AnalysisError::InvalidBins);
    }
    store.ensure_non_empty()?;

    let sorted = store.sorted_latencies();
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    if min == max {
        return Ok(vec![HistogramBin {
            lower_ms: min - 0.5,
            upper_ms: max + 0.5,
            count: sorted.len(),
        }]);
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower_ms: min + width * i as f64,
            upper_ms: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &latency in sorted {
        let idx = (((latency - min) / width) as usize).min(bins - 1);
        result[idx].count += 1;
    }

    Ok(result)
}
