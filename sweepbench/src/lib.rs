#![warn(missing_docs)]
//! # SweepBench
//!
//! Benchmark sweeps over external executables.
//!
//! SweepBench runs each enabled implementation across a grid of iteration
//! counts and a secondary parameter, timing every invocation as a separate
//! child process, and reports the results as a table, JSON, CSV or an SVG
//! chart.
//!
//! ## Quick Start
//!
//! ```text
//! sweepbench config.json
//! sweepbench config.json --format json -o target/sweep.json --chart target/sweep.svg
//! ```
//!
//! ## Configuration
//!
//! ```json
//! {
//!   "plots": {
//!     "minIterations": 10, "maxIterations": 100, "numSteps": 3,
//!     "minSecondaryParam": 1, "maxSecondaryParam": 2
//!   },
//!   "implementation": { "cpp": true, "go": false }
//! }
//! ```
//!
//! ## Library Use
//!
//! ```ignore
//! use sweepbench::prelude::*;
//!
//! let config = SweepConfig::load("config.json")?;
//! let results = SweepRunner::new(ProcessTimer::from_options(&config.runner)).run(&config)?;
//! ```

// Re-export core types
pub use sweepbench_core::{
    CommandTemplate, Dataset, GridPoint, ImplementationId, Invocation, InvocationTimer,
    ProcessError, Sample, SweepResults, Timer,
};

// Re-export report types
pub use sweepbench_report::{
    ChartOptions, ChartRenderer, OutputFormat, Report, ReportSummary, SvgChartRenderer,
    generate_csv_report, generate_json_report,
};

// Re-export runner types
pub use sweepbench_cli::{
    Cli, ConfigError, FailurePolicy, ParameterGrid, ProcessTimer, RunnerOptions, SweepConfig,
    SweepError, SweepRunner, build_report, resolve_config, run_with_cli,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        FailurePolicy, InvocationTimer, ProcessTimer, Report, SweepConfig, SweepResults,
        SweepRunner,
    };
}

/// Run the SweepBench CLI.
///
/// This is the whole binary:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     sweepbench::run()
/// }
/// ```
pub use sweepbench_cli::run;
