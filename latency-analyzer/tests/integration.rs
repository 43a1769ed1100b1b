//! Integration tests for latency-analyzer.
//!
//! These tests write load-test CSV files to a temporary directory and run
//! them through loading, analysis and reporting.

use std::io::Write;

use latency_analyzer::config::AnalysisConfig;
use latency_analyzer::{load_store, run, Faster, LoadError};
use tempfile::NamedTempFile;

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// Rows `Timestamp,Latency (ms),Chat ID` with timestamps 100ms apart.
fn load_test_csv(latencies: &[f64], chats: usize) -> String {
    let mut csv = String::from("Timestamp,Latency (ms),Chat ID\n");
    for (i, latency) in latencies.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},chat-{}\n",
            1_700_000_000_000i64 + i as i64 * 100,
            latency,
            i % chats
        ));
    }
    csv
}

/// Test the full pipeline over two datasets.
#[test]
fn test_compare_two_paths() {
    let a2p: Vec<f64> = (0..120).map(|i| 80.0 + (i % 10) as f64).collect();
    let p2p: Vec<f64> = (0..120).map(|i| 40.0 + (i % 10) as f64).collect();
    let a2p_file = csv_file(&load_test_csv(&a2p, 3));
    let p2p_file = csv_file(&load_test_csv(&p2p, 4));

    let primary = load_store(a2p_file.path(), "A2P (HTTP)").unwrap();
    let secondary = load_store(p2p_file.path(), "P2P (WebSocket)").unwrap();
    let report = run(&primary, Some(&secondary), &AnalysisConfig::default()).unwrap();

    assert_eq!(report.datasets.len(), 2);

    let a2p_report = &report.datasets[0];
    assert_eq!(a2p_report.summary.count, 120);
    assert_eq!(a2p_report.summary.mean_ms, 84.5);
    assert_eq!(a2p_report.groups.groups().len(), 3);
    // 120 samples with a 50-message window
    let defined = a2p_report
        .time_series
        .iter()
        .filter(|p| p.moving_average_ms.is_some())
        .count();
    assert_eq!(defined, 71);
    assert_eq!(a2p_report.time_series[119].relative_time_seconds, 11.9);

    let comparison = report.comparison.unwrap();
    let mean = comparison.mean().unwrap();
    assert_eq!(mean.faster, Faster::B);
    assert_eq!(mean.absolute_difference, 40.0);
    assert!(comparison.significance.statistically_significant);
    assert_eq!(comparison.significance.winner, Some(Faster::B));
}

/// Test that a single dataset is analyzed without a comparison.
#[test]
fn test_single_dataset() {
    let file = csv_file("Timestamp,Latency (ms)\n1000,10\n2000,20\n3000,30\n4000,40\n5000,50\n");

    let store = load_store(file.path(), "A2P").unwrap();
    let report = run(&store, None, &AnalysisConfig::default()).unwrap();

    let dataset = &report.datasets[0];
    assert_eq!(dataset.summary.mean_ms, 30.0);
    assert_eq!(dataset.summary.median_ms, 30.0);
    assert_eq!(dataset.buckets.buckets[0].percentage, 100.0);
    assert!(!dataset.groups.is_available());
    assert!(dataset.time_series.iter().all(|p| p.moving_average_ms.is_none()));
    assert!(report.comparison.is_none());
}

/// Test that schema problems surface as load errors naming the dataset.
#[test]
fn test_malformed_file() {
    let file = csv_file("time,latency\n1,2\n");

    let err = load_store(file.path(), "P2P").unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn { .. }));
    assert!(err.to_string().contains("P2P"));
}

#[cfg(test)]
mod report_tests {
    use super::*;
    use latency_analyzer::{JsonReporter, Reporter, TerminalReporter};

    fn two_path_report() -> latency_analyzer::AnalysisReport {
        let a2p_file = csv_file(&load_test_csv(&[120.0, 110.0, 130.0, 600.0], 2));
        let p2p_file = csv_file(&load_test_csv(&[150.0, 140.0, 160.0, 150.0], 2));
        let primary = load_store(a2p_file.path(), "A2P (HTTP)").unwrap();
        let secondary = load_store(p2p_file.path(), "P2P (WebSocket)").unwrap();
        run(&primary, Some(&secondary), &AnalysisConfig::default()).unwrap()
    }

    /// Test the terminal output of a two-path comparison.
    #[test]
    fn test_terminal_report() {
        let report = two_path_report();

        let mut buffer = Vec::new();
        TerminalReporter::without_colors()
            .write_report(&mut buffer, &report)
            .unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("A2P (HTTP) - Statistical Summary"));
        assert!(output.contains("500-1000ms  :     1 ( 25.0%)"));
        assert!(output.contains("Chats:      2"));
        // Means are 240 and 150
        assert!(output.contains("P2P (WebSocket) is faster by 90.00ms (37.5%)"));
    }

    /// Test that the JSON export carries the series needed for charts.
    #[test]
    fn test_json_report_file() {
        let report = two_path_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latency-report.json");

        JsonReporter::to_file(&path).report(&report).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["datasets"].as_array().unwrap().len(), 2);
        assert_eq!(value["datasets"][0]["cdf"]["points"].as_array().unwrap().len(), 4);
        assert_eq!(value["datasets"][0]["cdf_markers"][1]["level"], 99.0);
        assert_eq!(value["comparison"]["metrics"][0]["metric"], "Mean");
        assert_eq!(value["comparison"]["metrics"][0]["faster"], "B");
    }
}
