#![warn(missing_docs)]
//! SweepBench CLI Library
//!
//! Loads a sweep configuration, runs every enabled implementation across the
//! parameter grid, and writes the collected timings as a report and chart.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     sweepbench_cli::run()
//! }
//! ```

mod config;
mod executor;
mod planner;
mod supervisor;

pub use config::*;
pub use executor::{SweepError, SweepProgress, SweepRunner, build_report, format_human_output};
pub use planner::{ExecutionPlan, GridStep, ParameterGrid, build_plan, format_plan, iteration_count};
pub use supervisor::*;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sweepbench_report::{
    ChartRenderer, OutputFormat, Report, SvgChartRenderer, generate_csv_report,
    generate_json_report,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// SweepBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "sweepbench")]
#[command(
    author,
    version,
    about = "SweepBench - time external executables across a parameter sweep"
)]
pub struct Cli {
    /// Sweep configuration file (JSON, or TOML with a .toml extension)
    pub config: PathBuf,

    /// Output format: human, json, csv (overrides the config file)
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write an SVG chart to this path
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Abort on the first failed invocation instead of recording its time
    #[arg(long)]
    pub strict: bool,

    /// Kill any invocation running longer than this (e.g. "30s", "500ms")
    #[arg(long, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Dry run - list the planned invocations without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_timeout(s: &str) -> Result<Duration, String> {
    let timeout = SweepConfig::parse_duration(s).map_err(|e| e.to_string())?;
    if timeout.is_zero() {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(timeout)
}

/// Run the SweepBench CLI with the process arguments.
///
/// Argument errors print usage and exit with a non-zero status before
/// anything else happens.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the SweepBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    // Everything is validated before the first process is spawned
    let config = resolve_config(&cli)?;

    if cli.dry_run {
        print!("{}", format_plan(&build_plan(&config)));
        return Ok(());
    }

    let report = run_sweep(&config)?;
    write_outputs(&config, &report)?;

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "sweepbench=debug"
    } else {
        "sweepbench=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded or under test
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

/// Load the configuration file and layer CLI overrides on top.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<SweepConfig> {
    let mut config = SweepConfig::load(&cli.config).context("Unable to parse config file")?;

    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(ref path) = cli.output {
        config.output.path = Some(path.clone());
    }
    if let Some(ref chart) = cli.chart {
        config.output.chart = Some(chart.clone());
    }
    if cli.strict {
        config.runner.failure_policy = FailurePolicy::Strict;
    }
    if let Some(timeout) = cli.timeout {
        config.runner.timeout = Some(timeout);
    }

    Ok(config)
}

/// Run the sweep with real processes and a terminal progress bar.
pub fn run_sweep(config: &SweepConfig) -> anyhow::Result<Report> {
    let plan = build_plan(config);
    info!(
        implementations = plan.implementations.len(),
        invocations = plan.total_invocations(),
        strict = config.runner.failure_policy == FailurePolicy::Strict,
        "starting sweep"
    );

    let pb = ProgressBar::new(plan.total_invocations());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let start_time = Instant::now();
    let mut runner = SweepRunner::new(ProcessTimer::from_options(&config.runner));
    let results = runner.run_with_progress(config, |progress| {
        pb.inc(progress.points_in_step);
        pb.set_message(format!(
            "{} {}/{}",
            progress.implementation, progress.steps_completed, progress.total_steps
        ));
    });
    pb.finish_with_message("Complete");
    let results = results?;

    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    info!(
        samples = results.total_samples(),
        duration_ms = total_duration_ms,
        "sweep finished"
    );

    Ok(build_report(results, config, total_duration_ms))
}

/// Write the report (and chart, if configured) where the config says.
pub fn write_outputs(config: &SweepConfig, report: &Report) -> anyhow::Result<()> {
    let output = match config.output.format {
        OutputFormat::Json => generate_json_report(report)?,
        OutputFormat::Csv => generate_csv_report(report),
        OutputFormat::Human => format_human_output(report),
    };

    if let Some(ref path) = config.output.path {
        write_file(path, &output)?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }

    if let Some(ref path) = config.output.chart {
        let svg = SvgChartRenderer::default().render(&report.results);
        write_file(path, &svg)?;
        eprintln!("Chart written to: {}", path.display());
    }

    Ok(())
}

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
