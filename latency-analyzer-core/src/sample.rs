//! Latency samples and the immutable store that owns them.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// A single observed message delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencySample {
    /// Wall-clock time of the observation in epoch milliseconds.
    pub timestamp: i64,
    /// Delivery latency in milliseconds.
    pub latency_ms: f64,
    /// Chat or session the message belonged to, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

impl LatencySample {
    /// Create a sample without a group.
    pub fn new(timestamp: i64, latency_ms: f64) -> Self {
        Self {
            timestamp,
            latency_ms,
            group_id: None,
        }
    }

    /// Create a sample belonging to `group_id`.
    pub fn with_group(timestamp: i64, latency_ms: f64, group_id: impl Into<String>) -> Self {
        Self {
            timestamp,
            latency_ms,
            group_id: Some(group_id.into()),
        }
    }
}

/// All samples of one dataset (e.g. one delivery path).
///
/// A store is validated once on construction and never mutated afterwards,
/// so derived values such as the sorted latency vector are computed at most once.
#[derive(Debug)]
pub struct SampleStore {
    name: String,
    samples: Vec<LatencySample>,
    sorted: OnceLock<Vec<f64>>,
}

impl SampleStore {
    /// Build a store, rejecting negative or non-finite latencies.
    pub fn new(
        name: impl Into<String>,
        samples: Vec<LatencySample>,
    ) -> Result<Self, AnalysisError> {
        let name = name.into();

        if let Some((index, sample)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| !s.latency_ms.is_finite() || s.latency_ms < 0.0)
        {
            return Err(AnalysisError::InvalidLatency {
                dataset: name,
                index,
                value: sample.latency_ms,
            });
        }

        Ok(Self {
            name,
            samples,
            sorted: OnceLock::new(),
        })
    }

    /// Build a store of ungrouped samples from `(timestamp, latency_ms)` pairs.
    pub fn from_pairs(
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (i64, f64)>,
    ) -> Result<Self, AnalysisError> {
        let samples = pairs
            .into_iter()
            .map(|(ts, latency)| LatencySample::new(ts, latency))
            .collect();
        Self::new(name, samples)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[LatencySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Latencies in load order.
    pub fn latencies(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.latency_ms)
    }

    /// Latencies sorted ascending.
    pub fn sorted_latencies(&self) -> &[f64] {
        self.sorted.get_or_init(|| {
            let mut values: Vec<f64> = self.latencies().collect();
            values.sort_by(|a, b| a.total_cmp(b));
            values
        })
    }

    /// Whether any sample carries a group id.
    pub fn has_groups(&self) -> bool {
        self.samples.iter().any(|s| s.group_id.is_some())
    }

    /// Fail with `EmptyDataset` when the store has no samples.
    pub fn ensure_non_empty(&self) -> Result<(), AnalysisError> {
        if self.is_empty() {
            Err(AnalysisError::empty(&self.name))
        } else {
            Ok(())
        }
    }
}
