//! Output Formatting
//!
//! Human-readable output formatting for sweep reports.
//!
//! Each implementation gets a table with one row per step and one column per
//! secondary parameter value:
//!
//! ```text
//! Implementation: cpp
//! ------------------------------------------------------------
//!   iterations   secondary=1   secondary=2
//!           10     12.031 ms     12.554 ms
//! ```

use std::collections::BTreeMap;
use sweepbench_core::{Dataset, Sample};
use sweepbench_report::{Report, format_seconds};

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("SweepBench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    if report.results.datasets.is_empty() {
        output.push_str("No implementations were swept.\n");
    }

    for (id, dataset) in &report.results.datasets {
        output.push_str(&format!("Implementation: {}\n", id));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        format_dataset(&mut output, dataset);
        output.push('\n');
    }

    output.push_str("Summary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Implementations: {}  Samples: {}  Measured: {}  Total: {}\n",
        report.summary.implementations,
        report.summary.total_samples,
        format_seconds(report.summary.measured_seconds),
        format_seconds(report.summary.total_duration_ms / 1000.0),
    ));

    output
}

fn format_dataset(output: &mut String, dataset: &Dataset) {
    let columns: Vec<i64> = dataset.secondary_values().into_iter().collect();

    output.push_str(&format!("  {:>12}", "iterations"));
    for secondary in &columns {
        output.push_str(&format!("  {:>14}", format!("secondary={}", secondary)));
    }
    output.push('\n');

    for row in rows(dataset) {
        output.push_str(&format!("  {:>12}", row.iteration_count));
        for secondary in &columns {
            let cell = row
                .cells
                .get(secondary)
                .map(|secs| format_seconds(*secs))
                .unwrap_or_else(|| "-".to_string());
            output.push_str(&format!("  {:>14}", cell));
        }
        output.push('\n');
    }
}

struct Row {
    iteration_count: u64,
    cells: BTreeMap<i64, f64>,
}

/// Group consecutive samples into steps.
///
/// A new row starts when the iteration count changes or a secondary value
/// repeats, so steps that share an iteration count stay separate.
fn rows(dataset: &Dataset) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    for Sample {
        iteration_count,
        secondary_param,
        elapsed_seconds,
    } in dataset.iter().copied()
    {
        let starts_row = rows.last().is_none_or(|row| {
            row.iteration_count != iteration_count || row.cells.contains_key(&secondary_param)
        });
        if starts_row {
            rows.push(Row {
                iteration_count,
                cells: BTreeMap::new(),
            });
        }
        if let Some(row) = rows.last_mut() {
            row.cells.insert(secondary_param, elapsed_seconds);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sweepbench_core::{ImplementationId, SweepResults};
    use sweepbench_report::{ReportConfig, ReportMeta, ReportSummary, SCHEMA_VERSION, SystemInfo};

    fn dataset(points: &[(u64, i64, f64)]) -> Dataset {
        let mut dataset = Dataset::new();
        for &(iteration_count, secondary_param, elapsed_seconds) in points {
            dataset.push(Sample {
                iteration_count,
                secondary_param,
                elapsed_seconds,
            });
        }
        dataset
    }

    fn report(results: SweepResults) -> Report {
        Report {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: "0.1.0".to_string(),
                timestamp: Utc::now(),
                system: SystemInfo {
                    os: "linux".to_string(),
                    arch: "x86_64".to_string(),
                    cpu_cores: 1,
                },
                config: ReportConfig {
                    min_iterations: 1,
                    max_iterations: 1,
                    num_steps: 1,
                    min_secondary_param: 1,
                    max_secondary_param: 2,
                    implementations: Vec::new(),
                    timeout_ms: None,
                    strict: false,
                },
            },
            summary: ReportSummary::from_results(&results, 1500.0),
            results,
        }
    }

    #[test]
    fn test_rows_split_repeated_iteration_counts() {
        // min == max gives the same iteration count on every step
        let data = dataset(&[(5, 1, 0.1), (5, 2, 0.2), (5, 1, 0.3), (5, 2, 0.4)]);
        let rows = rows(&data);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].cells.get(&1), Some(&0.3));
    }

    #[test]
    fn test_human_output_table() {
        let mut results = SweepResults::new((1, 2));
        results.datasets.insert(
            ImplementationId::new("cpp"),
            dataset(&[(10, 1, 0.012), (10, 2, 0.5), (40, 1, 2.0)]),
        );

        let output = format_human_output(&report(results));
        assert!(output.contains("Implementation: cpp"));
        assert!(output.contains("secondary=1"));
        assert!(output.contains("12.000 ms"));
        assert!(output.contains("2.000 s"));
        // Missing cell for (40, 2)
        let last_row = output
            .lines()
            .find(|l| l.trim_start().starts_with("40"))
            .unwrap();
        assert!(last_row.trim_end().ends_with('-'));
        assert!(output.contains("Samples: 3"));
    }

    #[test]
    fn test_human_output_empty() {
        let output = format_human_output(&report(SweepResults::new((0, 0))));
        assert!(output.contains("No implementations were swept."));
    }
}
