//! Sweep Executor
//!
//! Runs the sweep and turns its results into output.
//!
//! ## Pipeline Overview
//!
//! ```text
//! SweepConfig (validated)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Grid × implementations, one timed invocation per point
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Wrap results with metadata and totals
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - The sweep loop (`SweepRunner`)
//! - [`report`] - Report building
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - Host and configuration metadata

mod execution;
mod formatting;
mod metadata;
mod report;

// Re-export public API
pub use execution::{SweepError, SweepProgress, SweepRunner};
pub use formatting::format_human_output;
pub use report::build_report;
