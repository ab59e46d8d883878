//! Report Metadata Collection
//!
//! Captures the host and the sweep configuration alongside the results, so a
//! saved report can be interpreted without the config file that produced it.

use crate::config::{FailurePolicy, SweepConfig};
use chrono::Utc;
use sweepbench_report::{ReportConfig, ReportMeta, SCHEMA_VERSION, SystemInfo};

/// Build report metadata for a finished sweep
pub fn build_report_meta(config: &SweepConfig) -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu_cores: num_cpus(),
    };

    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        system,
        config: report_config(config),
    }
}

fn report_config(config: &SweepConfig) -> ReportConfig {
    ReportConfig {
        min_iterations: config.min_iterations,
        max_iterations: config.max_iterations,
        num_steps: config.num_steps,
        min_secondary_param: config.min_secondary_param,
        max_secondary_param: config.max_secondary_param,
        implementations: config
            .implementations
            .iter()
            .map(|i| i.id.to_string())
            .collect(),
        timeout_ms: config
            .runner
            .timeout
            .map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
        strict: config.runner.failure_policy == FailurePolicy::Strict,
    }
}

fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}
