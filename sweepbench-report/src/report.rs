//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sweepbench_core::SweepResults;

/// Version of the JSON report layout
pub const SCHEMA_VERSION: u32 = 1;

/// Complete sweep report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Run metadata
    pub meta: ReportMeta,
    /// Collected datasets
    pub results: SweepResults,
    /// Totals
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report layout version
    pub schema_version: u32,
    /// SweepBench version that produced the report
    pub version: String,
    /// When the sweep finished
    pub timestamp: DateTime<Utc>,
    /// Host the sweep ran on
    pub system: SystemInfo,
    /// Sweep configuration the results were collected with
    pub config: ReportConfig,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// Available parallelism
    pub cpu_cores: u32,
}

/// Sweep configuration captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Lower iteration bound
    pub min_iterations: u64,
    /// Upper iteration bound
    pub max_iterations: u64,
    /// Number of steps between the bounds
    pub num_steps: u64,
    /// Lower secondary parameter bound
    pub min_secondary_param: i64,
    /// Upper secondary parameter bound
    pub max_secondary_param: i64,
    /// Active implementations, in sweep order
    pub implementations: Vec<String>,
    /// Per-invocation timeout, if one was configured
    pub timeout_ms: Option<u64>,
    /// Whether invocation failures aborted the sweep
    pub strict: bool,
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Implementations swept
    pub implementations: usize,
    /// Samples recorded
    pub total_samples: usize,
    /// Sum of all recorded sample times
    pub measured_seconds: f64,
    /// Wall-clock duration of the whole sweep
    pub total_duration_ms: f64,
}

impl ReportSummary {
    /// Summarize a result set
    pub fn from_results(results: &SweepResults, total_duration_ms: f64) -> Self {
        Self {
            implementations: results.datasets.len(),
            total_samples: results.total_samples(),
            measured_seconds: results
                .datasets
                .values()
                .flat_map(|d| d.iter())
                .map(|s| s.elapsed_seconds)
                .sum(),
            total_duration_ms,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sweepbench_core::{Dataset, ImplementationId, Sample};

    pub(crate) fn sample_report() -> Report {
        let mut results = SweepResults::new((1, 2));
        for (id, scale) in [("cpp", 1.0), ("go", 2.0)] {
            let mut dataset = Dataset::new();
            for secondary in 1..=2 {
                dataset.push(Sample {
                    iteration_count: 10,
                    secondary_param: secondary,
                    elapsed_seconds: 0.1 * secondary as f64 * scale,
                });
            }
            results.datasets.insert(ImplementationId::new(id), dataset);
        }

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
                    min_iterations: 10,
                    max_iterations: 100,
                    num_steps: 1,
                    min_secondary_param: 1,
                    max_secondary_param: 2,
                    implementations: vec!["cpp".to_string(), "go".to_string()],
                    timeout_ms: None,
                    strict: false,
                },
            },
            summary: ReportSummary::from_results(&results, 12.0),
            results,
        }
    }

    #[test]
    fn test_summary_totals() {
        let report = sample_report();
        assert_eq!(report.summary.implementations, 2);
        assert_eq!(report.summary.total_samples, 4);
        assert!((report.summary.measured_seconds - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let report = sample_report();
        let json = crate::generate_json_report(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();

        let cpp = parsed.results.dataset("cpp").unwrap();
        let secondaries: Vec<i64> = cpp.iter().map(|s| s.secondary_param).collect();
        assert_eq!(secondaries, vec![1, 2]);
        assert_eq!(parsed.results.secondary_bounds, (1, 2));
    }
}
