#![warn(missing_docs)]
//! SweepBench Core - Sweep Data Model
//!
//! This crate holds the pieces every other SweepBench crate agrees on:
//! - `ImplementationId`, `GridPoint`, `Sample`, `Dataset` and `SweepResults`
//! - `CommandTemplate` for turning a grid point into an argument vector
//! - Wall-clock timing (`Timer`) and the `InvocationTimer` seam used by the runner

mod command;
mod measure;
mod model;

pub use command::{
    BUILTIN_IMPLEMENTATIONS, CommandTemplate, ITERATIONS_PLACEHOLDER, Invocation,
    SECONDARY_PLACEHOLDER,
};
pub use measure::{InvocationTimer, ProcessError, Timer};
pub use model::{Dataset, GridPoint, ImplementationId, Sample, SweepResults};
