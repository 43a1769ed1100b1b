//! Latency over elapsed time with a trailing moving average.

use serde::Serialize;

use crate::error::AnalysisError;
use crate::sample::SampleStore;

/// Number of messages averaged when no window is configured.
pub const DEFAULT_WINDOW: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub timestamp: i64,
    /// Seconds since the earliest sample of the dataset.
    pub relative_time_seconds: f64,
    pub latency_ms: f64,
    /// Mean of this sample and the `window - 1` before it; `None` until
    /// a full window is available.
    pub moving_average_ms: Option<f64>,
}

/// Order samples by timestamp and attach a trailing moving average of `window` samples.
///
/// # Errors
///
/// `InvalidWindow` if `window` is zero.
pub fn smooth(store: &SampleStore, window: usize) -> Result<Vec<TimeSeriesPoint>, AnalysisError> {
    if window == 0 {
        return Err(AnalysisError::InvalidWindow);
    }

    let mut ordered: Vec<(i64, f64)> = store
        .samples()
        .iter()
        .map(|s| (s.timestamp, s.latency_ms))
        .collect();
    ordered.sort_by_key(|&(timestamp, _)| timestamp);

    let Some(&(start, _)) = ordered.first() else {
        return Ok(Vec::new());
    };

    let latencies: Vec<f64> = ordered.iter().map(|&(_, latency)| latency).collect();
    let averages = latencies
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64);
    // windows() yields nothing for a series shorter than the window,
    // so the leading Nones alone cover it
    let moving = std::iter::repeat(None)
        .take(window - 1)
        .chain(averages.map(Some));

    Ok(ordered
        .iter()
        .zip(moving)
        .map(|(&(timestamp, latency_ms), moving_average_ms)| TimeSeriesPoint {
            timestamp,
            relative_time_seconds: timestamp.abs_diff(start) as f64 / 1000.0,
            latency_ms,
            moving_average_ms,
        })
        .collect())
}
