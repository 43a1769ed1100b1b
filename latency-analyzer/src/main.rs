use anyhow::{Context, Result};
use clap::Parser;
use latency_analyzer::{load_datasets, run, Cli, Config, JsonReporter, Reporter, TerminalReporter};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Load config and apply CLI overrides
    let mut config = Config::load_or_default(&cli.config)?;
    cli.apply_to_config(&mut config);
    config.validate()?;
    debug!(?config, "Configuration");

    // 1. Load datasets; only the primary one is required
    let (primary, secondary) =
        load_datasets(&cli.primary, cli.secondary.as_deref(), &config.labels)
            .context("Failed to load primary dataset")?;

    // 2. Analyze
    let report = run(&primary, secondary.as_ref(), &config.analysis)
        .context("Failed to analyze latency data")?;

    // 3. Report
    let terminal = if config.output.colors {
        TerminalReporter::new()
    } else {
        TerminalReporter::without_colors()
    };
    terminal.report(&report)?;

    if let Some(path) = &config.output.json_path {
        JsonReporter::to_file(path)
            .report(&report)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Saved JSON report: {}", path.display());
    }

    info!("Analysis complete");
    Ok(())
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
