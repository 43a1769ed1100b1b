//! Per-chat breakdown of a dataset.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::AnalysisError;
use crate::sample::SampleStore;
use crate::stats::{summarize_sorted, validate_levels, BoxPlot, SummaryStatistics};

/// Identifies a group of samples.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Id(String),
    /// Samples recorded without a chat id.
    Ungrouped,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Id(id) => f.write_str(id),
            GroupKey::Ungrouped => f.write_str("no group"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: GroupKey,
    /// Latencies in load order.
    pub latencies_ms: Vec<f64>,
    pub stats: SummaryStatistics,
    pub box_plot: BoxPlot,
}

/// Outcome of grouping a store by chat id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "groups", rename_all = "snake_case")]
pub enum GroupAggregation {
    /// Groups in the order their first sample appears.
    Available(Vec<GroupSummary>),
    /// No sample carries a group id.
    Unavailable,
}

impl GroupAggregation {
    pub fn is_available(&self) -> bool {
        matches!(self, GroupAggregation::Available(_))
    }

    pub fn groups(&self) -> &[GroupSummary] {
        match self {
            GroupAggregation::Available(groups) => groups,
            GroupAggregation::Unavailable => &[],
        }
    }
}

/// Partition a store by group id and summarize each group with `levels`.
///
/// Samples without an id are collected under [`GroupKey::Ungrouped`] as long as
/// at least one other sample has an id.
pub fn aggregate(store: &SampleStore, levels: &[f64]) -> Result<GroupAggregation, AnalysisError> {
    validate_levels(levels)?;
    if !store.has_groups() {
        return Ok(GroupAggregation::Unavailable);
    }

    let mut order: Vec<GroupKey> = Vec::new();
    let mut members: HashMap<GroupKey, Vec<f64>> = HashMap::new();

    for sample in store.samples() {
        let key = match &sample.group_id {
            Some(id) => GroupKey::Id(id.clone()),
            None => GroupKey::Ungrouped,
        };
        members
            .entry(key)
            .or_insert_with_key(|key| {
                order.push(key.clone());
                Vec::new()
            })
            .push(sample.latency_ms);
    }

    let groups = order
        .into_iter()
        .map(|key| {
            let latencies_ms = members.remove(&key).unwrap_or_default();
            let mut sorted = latencies_ms.clone();
            sorted.sort_by(|a, b| a.total_cmp(b));

            GroupSummary {
                stats: summarize_sorted(&sorted, levels),
                box_plot: BoxPlot::from_sorted(&sorted),
                key,
                latencies_ms,
            }
        })
        .collect();

    Ok(GroupAggregation::Available(groups))
}
