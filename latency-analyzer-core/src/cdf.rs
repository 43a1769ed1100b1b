//! Empirical cumulative distribution of latencies.

use serde::Serialize;

use crate::error::AnalysisError;
use crate::sample::SampleStore;
use crate::stats::percentile;

/// Percentile levels marked on the CDF.
pub const MARKER_LEVELS: [f64; 2] = [95.0, 99.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CdfPoint {
    pub latency_ms: f64,
    pub cumulative_percentage: f64,
}

/// Points sorted by latency; equal latencies keep one point each,
/// which consumers draw as a vertical jump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CdfCurve {
    pub points: Vec<CdfPoint>,
}

impl CdfCurve {
    /// Percentage of samples at or below `latency_ms`.
    pub fn percentile_at(&self, latency_ms: f64) -> f64 {
        let at_or_below = self.points.partition_point(|p| p.latency_ms <= latency_ms);
        match at_or_below {
            0 => 0.0,
            n => self.points[n - 1].cumulative_percentage,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A vertical reference line drawn on the CDF at a percentile's latency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CdfMarker {
    pub level: f64,
    pub latency_ms: f64,
    /// Height of the curve at `latency_ms`.
    pub cumulative_percentage: f64,
}

/// Markers for each of `levels`, placed on `curve`.
pub fn markers(
    store: &SampleStore,
    curve: &CdfCurve,
    levels: &[f64],
) -> Result<Vec<CdfMarker>, AnalysisError> {
    levels
        .iter()
        .map(|&level| {
            let latency_ms = percentile(store, level)?;
            Ok(CdfMarker {
                level,
                latency_ms,
                cumulative_percentage: curve.percentile_at(latency_ms),
            })
        })
        .collect()
}

/// Build the empirical CDF: the i-th smallest latency sits at `100 * (i + 1) / n`.
pub fn build_cdf(store: &SampleStore) -> Result<CdfCurve, AnalysisError> {
    store.ensure_non_empty()?;

    let sorted = store.sorted_latencies();
    let n = sorted.len() as f64;
    let points = sorted
        .iter()
        .enumerate()
        .map(|(i, &latency_ms)| CdfPoint {
            latency_ms,
            cumulative_percentage: 100.0 * (i + 1) as f64 / n,
        })
        .collect();

    Ok(CdfCurve { points })
}
