//! Sweep Planner
//!
//! Derives the grid of (iteration count, secondary parameter) combinations.
//!
//! Ordering: steps ascending on the outside, secondary values ascending on
//! the inside. For step `s` in `0..num_steps` the iteration count is
//!
//! ```text
//! clamp(min + (max - min) * s / num_steps, min, max)
//! ```
//!
//! truncated toward zero. `s == num_steps` is never generated, so the last
//! step stays below `max` unless the span rounds up to it.

use crate::config::{Implementation, SweepConfig};
use std::ops::RangeInclusive;
use sweepbench_core::GridPoint;

/// Iteration count for one step
pub fn iteration_count(min_iterations: u64, max_iterations: u64, step: u64, num_steps: u64) -> u64 {
    if num_steps == 0 {
        return min_iterations;
    }
    let span = u128::from(max_iterations.saturating_sub(min_iterations));
    let raw = u128::from(min_iterations) + span * u128::from(step) / u128::from(num_steps);
    // raw <= u64::MAX after clamping to max_iterations
    raw.clamp(u128::from(min_iterations), u128::from(max_iterations)) as u64
}

/// Ordered set of grid points, shared by every implementation of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterGrid {
    min_iterations: u64,
    max_iterations: u64,
    num_steps: u64,
    min_secondary_param: i64,
    max_secondary_param: i64,
}

impl ParameterGrid {
    /// Build a grid; bounds are expected to be validated already
    pub fn new(
        min_iterations: u64,
        max_iterations: u64,
        num_steps: u64,
        secondary: RangeInclusive<i64>,
    ) -> Self {
        Self {
            min_iterations,
            max_iterations,
            num_steps,
            min_secondary_param: *secondary.start(),
            max_secondary_param: *secondary.end(),
        }
    }

    /// Grid described by a validated configuration
    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(
            config.min_iterations,
            config.max_iterations,
            config.num_steps,
            config.min_secondary_param..=config.max_secondary_param,
        )
    }

    /// Number of steps (outer loop length)
    pub fn num_steps(&self) -> u64 {
        self.num_steps
    }

    /// Iteration count used at `step`
    pub fn iteration_count(&self, step: u64) -> u64 {
        iteration_count(self.min_iterations, self.max_iterations, step, self.num_steps)
    }

    /// Secondary parameter values (inner loop)
    pub fn secondary_values(&self) -> RangeInclusive<i64> {
        self.min_secondary_param..=self.max_secondary_param
    }

    /// Number of grid points per step
    pub fn points_per_step(&self) -> u64 {
        if self.min_secondary_param > self.max_secondary_param {
            return 0;
        }
        let count = i128::from(self.max_secondary_param) - i128::from(self.min_secondary_param) + 1;
        // The full i64 range has one value more than u64 can count
        u64::try_from(count).unwrap_or(u64::MAX)
    }

    /// Total number of grid points
    pub fn len(&self) -> u64 {
        self.num_steps.saturating_mul(self.points_per_step())
    }

    /// Whether the grid has no points
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Steps in order, each carrying its iteration count
    pub fn steps(&self) -> impl Iterator<Item = GridStep> + '_ {
        (0..self.num_steps).map(|step| GridStep {
            step,
            iteration_count: self.iteration_count(step),
            secondary: self.secondary_values(),
        })
    }

    /// Every grid point, lazily, in sweep order
    pub fn points(&self) -> impl Iterator<Item = GridPoint> + '_ {
        self.steps().flat_map(|step| step.points())
    }
}

/// One step of the grid: a fixed iteration count across all secondary values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridStep {
    /// Zero-based step index
    pub step: u64,
    /// Iteration count for this step
    pub iteration_count: u64,
    /// Secondary values swept within the step
    pub secondary: RangeInclusive<i64>,
}

impl GridStep {
    /// Points of this step, secondary ascending
    pub fn points(&self) -> impl Iterator<Item = GridPoint> + use<> {
        let (step, iteration_count) = (self.step, self.iteration_count);
        self.secondary.clone().map(move |secondary_param| GridPoint {
            step,
            iteration_count,
            secondary_param,
        })
    }
}

/// Execution plan for a sweep
pub struct ExecutionPlan<'a> {
    /// Implementations to sweep, in order
    pub implementations: &'a [Implementation],
    /// Grid applied to each implementation
    pub grid: ParameterGrid,
}

impl ExecutionPlan<'_> {
    /// Number of process invocations the plan will make
    pub fn total_invocations(&self) -> u64 {
        self.grid.len().saturating_mul(self.implementations.len() as u64)
    }
}

/// Build execution plan from a validated configuration
pub fn build_plan(config: &SweepConfig) -> ExecutionPlan<'_> {
    ExecutionPlan {
        implementations: &config.implementations,
        grid: ParameterGrid::from_config(config),
    }
}

/// Describe a plan without running it
pub fn format_plan(plan: &ExecutionPlan<'_>) -> String {
    let mut output = String::new();
    output.push_str("SweepBench Plan:\n");

    for implementation in plan.implementations {
        output.push_str(&format!("├── {}\n", implementation.id));
        for step in plan.grid.steps() {
            let example = implementation
                .command
                .render(step.iteration_count, *step.secondary.start());
            output.push_str(&format!(
                "│   ├── step {}: {} iterations × secondary {}..={} ({})\n",
                step.step + 1,
                step.iteration_count,
                step.secondary.start(),
                step.secondary.end(),
                example
            ));
        }
    }

    output.push_str(&format!(
        "{} invocations planned.\n",
        plan.total_invocations()
    ));
    output
}
