use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{AnalysisReport, ReportError, Reporter};

/// Writes the full report as pretty-printed JSON for chart rendering.
///
/// Unbounded bucket limits are written as `null`.
#[derive(Debug, Clone)]
pub struct JsonReporter {
    /// Destination file; stdout when `None`.
    path: Option<PathBuf>,
}

impl JsonReporter {
    /// Write to the given file, replacing it if it exists.
    pub fn to_file(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    pub fn to_stdout() -> Self {
        Self { path: None }
    }

    pub fn write_report(
        &self,
        writer: &mut impl Write,
        report: &AnalysisReport,
    ) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut *writer, report)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Reporter for JsonReporter {
    fn report(&self, report: &AnalysisReport) -> Result<(), ReportError> {
        match &self.path {
            Some(path) => {
                let mut writer = BufWriter::new(File::create(path)?);
                self.write_report(&mut writer, report)?;
                writer.flush()?;
            }
            None => {
                let stdout = io::stdout();
                self.write_report(&mut stdout.lock(), report)?;
            }
        }
        Ok(())
    }
}
