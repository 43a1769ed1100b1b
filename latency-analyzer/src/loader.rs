//! Reading latency samples from the load-test CSV files.
//!
//! The load test writes one row per delivered message:
//!
//! ```text
//! Timestamp,Latency (ms),Chat ID
//! 1700000000123,84.2,chat-1
//! ```
//!
//! `Chat ID` is optional, both as a column and per row.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use latency_analyzer_core::{AnalysisError, LatencySample, SampleStore};
use serde::Deserialize;
use thiserror::Error;

const TIMESTAMP_COLUMN: &str = "Timestamp";
const LATENCY_COLUMN: &str = "Latency (ms)";

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened.
    #[error("Dataset '{dataset}': cannot open {}: {source}", path.display())]
    Io {
        dataset: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be read or did not match the schema.
    #[error("Dataset '{dataset}': malformed record at line {line}: {source}")]
    Csv {
        dataset: String,
        line: u64,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header.
    #[error("Dataset '{dataset}': missing required column '{column}'")]
    MissingColumn { dataset: String, column: String },

    /// The rows parsed but violate a sample invariant, or the dataset is unusable.
    #[error("Dataset '{dataset}' is invalid: {source}")]
    Invalid {
        dataset: String,
        #[source]
        source: AnalysisError,
    },
}

impl LoadError {
    pub(crate) fn invalid(dataset: &str, source: AnalysisError) -> Self {
        LoadError::Invalid {
            dataset: dataset.to_string(),
            source,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Record {
    #[serde(rename = "Timestamp")]
    timestamp: i64,
    #[serde(rename = "Latency (ms)")]
    latency_ms: f64,
    #[serde(rename = "Chat ID", default)]
    chat_id: Option<String>,
}

impl From<Record> for LatencySample {
    fn from(record: Record) -> Self {
        LatencySample {
            timestamp: record.timestamp,
            latency_ms: record.latency_ms,
            group_id: record.chat_id.filter(|id| !id.is_empty()),
        }
    }
}

/// Parse CSV rows from `reader` into a store named `dataset`.
pub fn load_from_reader<R: Read>(reader: R, dataset: &str) -> Result<SampleStore, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let csv_error = |source: csv::Error| LoadError::Csv {
        dataset: dataset.to_string(),
        line: source.position().map(|p| p.line()).unwrap_or(1),
        source,
    };

    let headers = csv_reader.headers().map_err(csv_error)?;
    for column in [TIMESTAMP_COLUMN, LATENCY_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                dataset: dataset.to_string(),
                column: column.to_string(),
            });
        }
    }

    let samples = csv_reader
        .deserialize::<Record>()
        .map(|row| row.map(LatencySample::from).map_err(csv_error))
        .collect::<Result<Vec<_>, _>>()?;

    SampleStore::new(dataset, samples).map_err(|source| LoadError::invalid(dataset, source))
}

/// Load the CSV file at `path` into a store named `dataset`.
pub fn load_store(path: &Path, dataset: &str) -> Result<SampleStore, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        dataset: dataset.to_string(),
        path: path.to_path_buf(),
        source,
    })?;
    load_from_reader(file, dataset)
}
