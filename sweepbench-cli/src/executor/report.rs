//! Report Building
//!
//! Wraps finished sweep results with metadata and summary totals.

use super::metadata::build_report_meta;
use crate::config::SweepConfig;
use sweepbench_core::SweepResults;
use sweepbench_report::{Report, ReportSummary};

/// Build a complete Report from sweep results
///
/// # Arguments
/// * `results` - Datasets produced by the sweep
/// * `config` - Configuration the sweep ran with
/// * `total_duration_ms` - Wall-clock time of the whole sweep in milliseconds
pub fn build_report(results: SweepResults, config: &SweepConfig, total_duration_ms: f64) -> Report {
    let summary = ReportSummary::from_results(&results, total_duration_ms);
    Report {
        meta: build_report_meta(config),
        results,
        summary,
    }
}
