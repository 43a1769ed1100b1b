use std::io::{self, Write};

use colored::Colorize;

use super::{AnalysisReport, ComparisonReport, DatasetReport, ReportError, Reporter};
use crate::compare::{ComparisonResult, Faster};

const RULE_WIDTH: usize = 70;

/// A reporter that prints summaries and comparisons to the terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    fn format_ms(ms: f64) -> String {
        format!("{:.2} ms", ms)
    }

    /// Format a percentile level as `P50`, or `P99.9` for fractional levels.
    fn format_level(level: f64) -> String {
        if level.fract() == 0.0 {
            format!("P{}", level as u64)
        } else {
            format!("P{}", level)
        }
    }

    /// The one-line verdict on mean latency.
    fn verdict(name_a: &str, name_b: &str, result: &ComparisonResult) -> String {
        let winner = match result.faster {
            Faster::A => name_a,
            Faster::B => name_b,
            Faster::Tie => {
                return format!("No difference between {} and {}", name_a, name_b);
            }
        };
        format!(
            "{} is faster by {:.2}ms ({:.1}%)",
            winner, result.absolute_difference, result.relative_difference_percent
        )
    }

    fn heading(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn print_rule(&self, writer: &mut impl Write) -> io::Result<()> {
        writeln!(writer, "{}", "=".repeat(RULE_WIDTH))
    }

    /// Print the statistical summary and bucket table of one dataset.
    fn print_dataset(&self, writer: &mut impl Write, dataset: &DatasetReport) -> io::Result<()> {
        let summary = &dataset.summary;

        writeln!(writer)?;
        self.print_rule(writer)?;
        writeln!(
            writer,
            "{}",
            self.heading(&format!("{} - Statistical Summary", dataset.name))
        )?;
        self.print_rule(writer)?;

        writeln!(writer, "Count:      {}", summary.count)?;
        writeln!(writer, "Mean:       {}", Self::format_ms(summary.mean_ms))?;
        writeln!(writer, "Median:     {}", Self::format_ms(summary.median_ms))?;
        match summary.std_dev_ms {
            Some(std_dev) => writeln!(writer, "Std Dev:    {}", Self::format_ms(std_dev))?,
            None => writeln!(writer, "Std Dev:    n/a")?,
        }
        writeln!(writer, "Min:        {}", Self::format_ms(summary.min_ms))?;
        writeln!(writer, "Max:        {}", Self::format_ms(summary.max_ms))?;

        if !summary.percentiles.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Percentiles:")?;
            for p in &summary.percentiles {
                let label = format!("{}:", Self::format_level(p.level));
                writeln!(writer, "  {:<9} {}", label, Self::format_ms(p.value_ms))?;
            }
        }

        writeln!(writer)?;
        writeln!(writer, "Latency Distribution:")?;
        for bucket in &dataset.buckets.buckets {
            writeln!(
                writer,
                "  {:<12}: {:>5} ({:>5.1}%) {}",
                bucket.label,
                bucket.count,
                bucket.percentage,
                bucket.density_bar()
            )?;
        }

        writeln!(writer)?;
        if dataset.groups.is_available() {
            writeln!(writer, "Chats:      {}", dataset.groups.groups().len())?;
        } else {
            writeln!(writer, "Chats:      not recorded")?;
        }

        Ok(())
    }

    /// Print the key-metric table and the verdict.
    fn print_comparison(
        &self,
        writer: &mut impl Write,
        comparison: &ComparisonReport,
    ) -> io::Result<()> {
        writeln!(writer)?;
        self.print_rule(writer)?;
        writeln!(writer, "{}", self.heading("Comparison Analysis"))?;
        self.print_rule(writer)?;

        let header = format!(
            "{:<8} {:>14} {:>14} {:>12} {:>10}",
            "Metric", comparison.name_a, comparison.name_b, "Difference", "Relative"
        );
        writeln!(writer, "{}", self.heading(&header))?;
        for result in &comparison.metrics {
            writeln!(
                writer,
                "{:<8} {:>14} {:>14} {:>12} {:>9.1}%",
                result.metric.name(),
                Self::format_ms(result.value_a),
                Self::format_ms(result.value_b),
                Self::format_ms(result.absolute_difference),
                result.relative_difference_percent
            )?;
        }

        if let Some(mean) = comparison.mean() {
            let verdict = Self::verdict(&comparison.name_a, &comparison.name_b, mean);
            writeln!(writer)?;
            if self.use_colors {
                writeln!(writer, "{}", verdict.green().bold())?;
            } else {
                writeln!(writer, "{}", verdict)?;
            }
        }

        let significance = &comparison.significance;
        let text = format!(
            "Welch's t-test: p = {:.4} ({} at {:.0}% confidence)",
            significance.p_value,
            if significance.statistically_significant {
                "significant"
            } else {
                "inconclusive"
            },
            significance.confidence_level * 100.0
        );
        if self.use_colors && !significance.statistically_significant {
            writeln!(writer, "{}", text.yellow())?;
        } else {
            writeln!(writer, "{}", text)?;
        }

        Ok(())
    }

    /// Write the complete report to `writer`.
    pub fn write_report(&self, writer: &mut impl Write, report: &AnalysisReport) -> io::Result<()> {
        for dataset in &report.datasets {
            self.print_dataset(writer, dataset)?;
        }

        if let Some(comparison) = &report.comparison {
            self.print_comparison(writer, comparison)?;
        }

        writeln!(writer)?;
        Ok(())
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, report: &AnalysisReport) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.write_report(&mut writer, report)?;
        Ok(())
    }
}
