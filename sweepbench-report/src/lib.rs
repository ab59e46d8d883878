#![warn(missing_docs)]
//! SweepBench Report - Reporting and Visualization
//!
//! Turns `SweepResults` into output:
//! - JSON (machine-readable, full report with metadata)
//! - CSV (one row per sample)
//! - SVG chart (one panel per implementation, one line per secondary value)

mod chart;
mod csv;
mod json;
mod report;

pub use chart::{ChartOptions, ChartRenderer, Series, SvgChartRenderer, extract_series};
pub use csv::generate_csv_report;
pub use json::generate_json_report;
pub use report::{
    Report, ReportConfig, ReportMeta, ReportSummary, SCHEMA_VERSION, SystemInfo,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    #[default]
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Format a duration given in seconds with an adaptive unit
pub fn format_seconds(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{:.3} s", seconds)
    } else if seconds >= 1e-3 {
        format!("{:.3} ms", seconds * 1e3)
    } else {
        format!("{:.3} us", seconds * 1e6)
    }
}
