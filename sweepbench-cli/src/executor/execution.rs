//! Sweep Execution
//!
//! Drives the parameter grid through an `InvocationTimer`, one implementation
//! after another.
//!
//! ## Data Flow
//!
//! ```text
//!   SweepConfig
//!        │
//!        ▼
//!  ParameterGrid ──► GridPoint ──► CommandTemplate::render ──► Invocation
//!                                                                 │
//!                                                                 ▼
//!                                                         InvocationTimer
//!                                                                 │
//!                                                                 ▼
//!                                            Dataset (per implementation)
//! ```
//!
//! Everything runs on the calling thread, one invocation at a time. Running
//! grid points concurrently would let them contend for CPU and IO and skew the
//! very timings being collected.

use crate::config::{Implementation, SweepConfig};
use crate::planner::ParameterGrid;
use std::time::Duration;
use sweepbench_core::{
    Dataset, GridPoint, ImplementationId, InvocationTimer, ProcessError, Sample, SweepResults,
};
use thiserror::Error;
use tracing::{debug, info};

/// Upper bound on samples reserved before a dataset starts filling
const MAX_PREALLOCATED_SAMPLES: u64 = 4096;

/// Sweep aborted by a failed invocation (strict failure policy only)
#[derive(Debug, Error)]
pub enum SweepError {
    /// An invocation failed while the strict failure policy was in effect
    #[error(
        "`{implementation}` failed at step {step} (iterations={iteration_count}, secondary={secondary_param}): {source}"
    )]
    Invocation {
        /// Implementation being swept
        implementation: ImplementationId,
        /// Zero-based step index
        step: u64,
        /// Iteration count passed to the command
        iteration_count: u64,
        /// Secondary parameter passed to the command
        secondary_param: i64,
        /// Underlying process failure
        #[source]
        source: ProcessError,
    },
}

/// Notification emitted after every completed step
#[derive(Debug, Clone, Copy)]
pub struct SweepProgress<'a> {
    /// Implementation being swept
    pub implementation: &'a ImplementationId,
    /// Steps finished so far for this implementation
    pub steps_completed: u64,
    /// Steps in the grid
    pub total_steps: u64,
    /// Grid points finished within the step just completed
    pub points_in_step: u64,
}

/// Runs every grid point of every enabled implementation
pub struct SweepRunner<T> {
    timer: T,
}

impl<T: InvocationTimer> SweepRunner<T> {
    /// Create a runner around `timer`
    pub fn new(timer: T) -> Self {
        Self { timer }
    }

    /// Give back the timer
    pub fn into_inner(self) -> T {
        self.timer
    }

    /// Run the sweep without progress reporting
    pub fn run(&mut self, config: &SweepConfig) -> Result<SweepResults, SweepError> {
        self.run_with_progress(config, |_| {})
    }

    /// Run the sweep, calling `on_progress` after each completed step.
    ///
    /// Nothing is returned unless the whole sweep finishes: under the strict
    /// policy the first failed invocation discards everything collected.
    pub fn run_with_progress<F>(
        &mut self,
        config: &SweepConfig,
        mut on_progress: F,
    ) -> Result<SweepResults, SweepError>
    where
        F: FnMut(&SweepProgress<'_>),
    {
        let grid = ParameterGrid::from_config(config);
        let mut results = SweepResults::new(config.secondary_bounds());

        for id in &config.disabled {
            debug!(implementation = %id, "disabled, skipping");
        }

        for implementation in &config.implementations {
            info!(
                implementation = %implementation.id,
                points = grid.len(),
                "sweeping"
            );
            let dataset = self.sweep_implementation(implementation, &grid, &mut on_progress)?;
            results
                .datasets
                .insert(implementation.id.clone(), dataset);
        }

        Ok(results)
    }

    fn sweep_implementation<F>(
        &mut self,
        implementation: &Implementation,
        grid: &ParameterGrid,
        on_progress: &mut F,
    ) -> Result<Dataset, SweepError>
    where
        F: FnMut(&SweepProgress<'_>),
    {
        let reserved = grid.len().min(MAX_PREALLOCATED_SAMPLES);
        let capacity = usize::try_from(reserved).unwrap_or(0);
        let mut dataset = Dataset::with_capacity(capacity);
        let total_steps = grid.num_steps();

        for step in grid.steps() {
            let mut points_in_step = 0;
            for point in step.points() {
                let elapsed = self.measure(implementation, &point)?;
                dataset.push(Sample::new(&point, elapsed));
                points_in_step += 1;
            }

            let progress = SweepProgress {
                implementation: &implementation.id,
                steps_completed: step.step + 1,
                total_steps,
                points_in_step,
            };
            debug!(
                "{} {}/{} data generated",
                implementation.id, progress.steps_completed, total_steps
            );
            on_progress(&progress);
        }

        Ok(dataset)
    }

    fn measure(
        &mut self,
        implementation: &Implementation,
        point: &GridPoint,
    ) -> Result<Duration, SweepError> {
        let invocation = implementation
            .command
            .render(point.iteration_count, point.secondary_param);
        debug!(command = %invocation, step = point.step, "invoking");

        self.timer
            .time(&invocation)
            .map_err(|source| SweepError::Invocation {
                implementation: implementation.id.clone(),
                step: point.step,
                iteration_count: point.iteration_count,
                secondary_param: point.secondary_param,
                source,
            })
    }
}
