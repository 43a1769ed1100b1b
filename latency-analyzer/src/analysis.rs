//! Runs every analysis over the loaded datasets and assembles the report.
//!
//! Each dataset is analyzed independently; the two datasets are processed on
//! separate threads and the comparison runs once both are done.

use std::path::Path;
use std::thread;

use latency_analyzer_core::{
    build_cdf, classify, compare_metrics, histogram, markers, smooth, summarize, AnalysisError,
    AnalysisReport, BoxPlot, ComparisonReport, DatasetReport, Metric, SampleStore,
    StatisticalTest, WelchTTest, MARKER_LEVELS,
};
use tracing::{debug, info, warn};

use crate::config::{AnalysisConfig, LabelsConfig};
use crate::loader::{load_store, LoadError};

/// Load the primary dataset and, when a path is given, the secondary one.
///
/// The primary dataset is required: a load failure or an empty file is an
/// error. A secondary dataset that cannot be loaded or has no samples is
/// logged and skipped.
pub fn load_datasets(
    primary: &Path,
    secondary: Option<&Path>,
    labels: &LabelsConfig,
) -> Result<(SampleStore, Option<SampleStore>), LoadError> {
    let primary = load_store(primary, &labels.primary)?;
    primary
        .ensure_non_empty()
        .map_err(|source| LoadError::invalid(&labels.primary, source))?;
    info!(samples = primary.len(), "Loaded {}", primary.name());

    let secondary = secondary.and_then(|path| load_secondary(path, &labels.secondary));
    Ok((primary, secondary))
}

fn load_secondary(path: &Path, label: &str) -> Option<SampleStore> {
    match load_store(path, label) {
        Ok(store) if store.is_empty() => {
            warn!("Skipping {}: {} has no samples", label, path.display());
            None
        }
        Ok(store) => {
            info!(samples = store.len(), "Loaded {}", store.name());
            Some(store)
        }
        Err(err) => {
            warn!("Skipping {}: {}", label, err);
            None
        }
    }
}

/// Derive every per-dataset structure from `store`.
///
/// # Errors
///
/// `EmptyDataset` for a store without samples, or an argument error when
/// the configuration holds an invalid percentile, window, bin count or bucket set.
pub fn analyze_dataset(
    store: &SampleStore,
    config: &AnalysisConfig,
) -> Result<DatasetReport, AnalysisError> {
    let summary = summarize(store, &config.percentiles)?;
    let buckets = classify(store, &config.bucket_ranges())?;
    let cdf = build_cdf(store)?;
    let cdf_markers = markers(store, &cdf, &MARKER_LEVELS)?;
    let time_series = smooth(store, config.moving_average_window)?;
    let histogram = histogram(store, config.histogram_bins)?;
    let box_plot = BoxPlot::from_store(store)?;
    let groups = latency_analyzer_core::aggregate(store, &config.percentiles)?;

    debug!(
        dataset = store.name(),
        samples = summary.count,
        groups = groups.groups().len(),
        "Analyzed dataset"
    );

    Ok(DatasetReport {
        name: store.name().to_string(),
        summary,
        buckets,
        cdf,
        cdf_markers,
        time_series,
        moving_average_window: config.moving_average_window,
        histogram,
        box_plot,
        groups,
    })
}

/// Compare the key metrics of `a` and `b` and test the difference in means.
///
/// # Panics
/// Panics if the configured confidence level is not in the range (0, 1).
pub fn compare_datasets(
    a: &SampleStore,
    b: &SampleStore,
    config: &AnalysisConfig,
) -> Result<ComparisonReport, AnalysisError> {
    let metrics = compare_metrics(a, b, &Metric::KEY_METRICS)?;
    let test = WelchTTest::new(config.confidence_level);
    let significance = test.analyze(a.sorted_latencies(), b.sorted_latencies());

    Ok(ComparisonReport {
        name_a: a.name().to_string(),
        name_b: b.name().to_string(),
        metrics,
        significance,
    })
}

/// Analyze the primary dataset and, when given, the secondary one plus the comparison.
///
/// An empty secondary dataset is skipped along with the comparison.
pub fn run(
    primary: &SampleStore,
    secondary: Option<&SampleStore>,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let secondary = secondary.filter(|store| {
        if store.is_empty() {
            warn!("Skipping {}: no samples", store.name());
        }
        !store.is_empty()
    });
    let Some(secondary) = secondary else {
        return Ok(AnalysisReport {
            datasets: vec![analyze_dataset(primary, config)?],
            comparison: None,
        });
    };

    let (primary_report, secondary_report) = thread::scope(|scope| {
        let handle = scope.spawn(|| analyze_dataset(secondary, config));
        let primary_report = analyze_dataset(primary, config);
        let secondary_report = handle
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (primary_report, secondary_report)
    });

    let datasets = vec![primary_report?, secondary_report?];
    let comparison = compare_datasets(primary, secondary, config)?;

    Ok(AnalysisReport {
        datasets,
        comparison: Some(comparison),
    })
}
