//! Integration tests for SweepBench
//!
//! These drive the CLI end to end against small `sh` scripts standing in for
//! benchmark executables.

#![cfg(unix)]

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use sweepbench::{Cli, ConfigError, Report, SweepError, resolve_config, run_with_cli};

struct Sweep {
    dir: tempfile::TempDir,
}

impl Sweep {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a config sweeping a single `foo` implementation that runs `script`
    fn config(&self, plots: &str, script: &str) -> PathBuf {
        let contents = format!(
            r#"{{
                "plots": {plots},
                "implementation": {{"foo": true, "cpp": false, "go": false}},
                "commands": {{
                    "foo": {{"program": "sh", "args": ["-c", {script}, "sh", "{{iterations}}", "{{secondary}}"]}}
                }}
            }}"#,
            plots = plots,
            script = serde_json::to_string(script).unwrap(),
        );
        let path = self.path("sweep.json");
        fs::write(&path, contents).unwrap();
        path
    }

    fn run(&self, config: &Path, extra: &[&str]) -> anyhow::Result<()> {
        let mut args = vec!["sweepbench".to_string(), config.display().to_string()];
        args.extend(extra.iter().map(|s| s.to_string()));
        let cli = Cli::try_parse_from(args).unwrap();
        run_with_cli(cli)
    }

    fn run_json(&self, config: &Path, extra: &[&str]) -> Report {
        let out = self.path("report.json");
        let out_arg = out.display().to_string();
        let mut args = vec!["--format", "json", "-o", out_arg.as_str()];
        args.extend_from_slice(extra);
        self.run(config, &args).unwrap();
        serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap()
    }
}

const SMALL_GRID: &str = r#"{"minIterations": 10, "maxIterations": 100, "numSteps": 3,
                             "minSecondaryParam": 1, "maxSecondaryParam": 2}"#;

/// The invocation order and parameters reach the child process
#[test]
fn test_end_to_end_sweep() {
    let sweep = Sweep::new();
    let log = sweep.path("calls.log");
    let script = format!("echo \"$1 $2\" >> '{}'", log.display());
    let config = sweep.config(SMALL_GRID, &script);

    let report = sweep.run_json(&config, &[]);

    let calls = fs::read_to_string(&log).unwrap();
    assert_eq!(
        calls.lines().collect::<Vec<_>>(),
        vec!["10 1", "10 2", "40 1", "40 2", "70 1", "70 2"]
    );

    let dataset = report.results.dataset("foo").unwrap();
    let points: Vec<(u64, i64)> = dataset
        .iter()
        .map(|s| (s.iteration_count, s.secondary_param))
        .collect();
    assert_eq!(
        points,
        vec![(10, 1), (10, 2), (40, 1), (40, 2), (70, 1), (70, 2)]
    );
    assert!(dataset.iter().all(|s| s.elapsed_seconds > 0.0));

    // Disabled builtins produce no dataset
    assert_eq!(report.results.datasets.len(), 1);
    assert_eq!(report.results.secondary_bounds, (1, 2));
    assert_eq!(report.summary.total_samples, 6);
}

/// Elapsed time covers the whole child run
#[test]
fn test_elapsed_includes_child_runtime() {
    let sweep = Sweep::new();
    let plots = r#"{"minIterations": 1, "maxIterations": 1, "numSteps": 1,
                    "minSecondaryParam": 1, "maxSecondaryParam": 1}"#;
    let config = sweep.config(plots, "sleep 0.1");

    let report = sweep.run_json(&config, &[]);
    let dataset = report.results.dataset("foo").unwrap();

    assert_eq!(dataset.len(), 1);
    assert!(dataset.samples()[0].elapsed_seconds >= 0.1);
}

/// A failing child still yields a sample under the default policy
#[test]
fn test_nonzero_exit_is_still_recorded() {
    let sweep = Sweep::new();
    let config = sweep.config(SMALL_GRID, "exit 7");

    let report = sweep.run_json(&config, &[]);
    assert_eq!(report.results.dataset("foo").unwrap().len(), 6);
}

/// `--strict` turns the first failure into an error
#[test]
fn test_strict_aborts_on_failure() {
    let sweep = Sweep::new();
    let config = sweep.config(SMALL_GRID, "exit 7");
    let out = sweep.path("report.json");

    let err = sweep
        .run(&config, &["--strict", "-o", &out.display().to_string()])
        .unwrap_err();

    match err.downcast_ref::<SweepError>() {
        Some(SweepError::Invocation {
            implementation,
            step,
            ..
        }) => {
            assert_eq!(implementation.as_str(), "foo");
            assert_eq!(*step, 0);
        }
        None => panic!("unexpected error: {err:#}"),
    }
    assert!(!out.exists());
}

/// Invalid configurations are rejected before anything runs
#[test]
fn test_invalid_config_spawns_nothing() {
    let sweep = Sweep::new();
    let marker = sweep.path("spawned");
    let script = format!("touch '{}'", marker.display());

    let zero_steps = r#"{"minIterations": 10, "maxIterations": 100, "numSteps": 0,
                         "minSecondaryParam": 1, "maxSecondaryParam": 2}"#;
    let config = sweep.config(zero_steps, &script);
    let err = sweep.run(&config, &[]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::NonPositiveSteps(0))
    ));

    let inverted = r#"{"minIterations": 100, "maxIterations": 10, "numSteps": 3,
                       "minSecondaryParam": 1, "maxSecondaryParam": 2}"#;
    let config = sweep.config(inverted, &script);
    let err = sweep.run(&config, &[]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvertedRange { .. })
    ));

    assert!(!marker.exists());
}

#[test]
fn test_missing_config_file() {
    let sweep = Sweep::new();
    let err = sweep.run(&sweep.path("absent.json"), &[]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::Io { .. })
    ));
}

/// Dry runs list the plan without executing it
#[test]
fn test_dry_run_spawns_nothing() {
    let sweep = Sweep::new();
    let marker = sweep.path("spawned");
    let config = sweep.config(SMALL_GRID, &format!("touch '{}'", marker.display()));

    sweep.run(&config, &["--dry-run"]).unwrap();
    assert!(!marker.exists());
}

#[test]
fn test_csv_and_chart_outputs() {
    let sweep = Sweep::new();
    let config = sweep.config(SMALL_GRID, "exit 0");
    let csv = sweep.path("out/sweep.csv");
    let chart = sweep.path("charts/sweep.svg");

    sweep
        .run(
            &config,
            &[
                "--format",
                "csv",
                "-o",
                &csv.display().to_string(),
                "--chart",
                &chart.display().to_string(),
            ],
        )
        .unwrap();

    let csv = fs::read_to_string(csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "implementation,iterations,secondary,elapsed_seconds");
    assert_eq!(lines.len(), 7);
    assert!(lines[1].starts_with("foo,10,1,"));
    assert!(lines[6].starts_with("foo,70,2,"));

    let svg = fs::read_to_string(chart).unwrap();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("foo implementation"));
}

/// TOML configs go through the same validation
#[test]
fn test_toml_config() {
    let sweep = Sweep::new();
    let path = sweep.path("sweep.toml");
    fs::write(
        &path,
        r#"
[plots]
minIterations = 10
maxIterations = 100
numSteps = 3
minSecondaryParam = 1
maxSecondaryParam = 2

[implementation]
foo = true

[commands.foo]
program = "true"

[output]
format = "csv"
"#,
    )
    .unwrap();

    let cli = Cli::try_parse_from(["sweepbench", path.to_str().unwrap()])
        .unwrap();
    let config = resolve_config(&cli).unwrap();
    assert_eq!(config.implementations.len(), 1);
    assert_eq!(config.output.format, sweepbench::OutputFormat::Csv);
}
