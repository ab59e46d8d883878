//! Wall-Clock Timing
//!
//! Subprocess sweeps measure whole invocations, so only monotonic wall-clock
//! time matters here; there is no cycle counter.

use crate::command::Invocation;
use std::process::ExitStatus;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Timer for measuring a single invocation
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed wall-clock time since `start`
    #[inline(always)]
    pub fn stop(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Failure of a single external invocation.
///
/// Only surfaced when the runner is configured for strict failure handling;
/// the default policy records a timing sample instead.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started (not found, not executable, ...)
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child failed after it was spawned
    #[error("failed to wait for `{program}`: {source}")]
    Wait {
        /// Program being waited on
        program: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// The program ran but reported failure
    #[error("`{program}` exited with {status}")]
    ExitStatus {
        /// Program that failed
        program: String,
        /// Reported exit status
        status: ExitStatus,
    },

    /// The program was killed after exceeding the configured timeout
    #[error("`{program}` exceeded timeout of {timeout:?}")]
    Timeout {
        /// Program that timed out
        program: String,
        /// Timeout that was exceeded
        timeout: Duration,
    },
}

/// Measures how long one invocation takes.
///
/// The sweep runner is generic over this so that it can be driven by real
/// processes or by an in-memory stand-in.
pub trait InvocationTimer {
    /// Run `invocation` to completion and return its elapsed wall-clock time
    fn time(&mut self, invocation: &Invocation) -> Result<Duration, ProcessError>;
}

impl<F> InvocationTimer for F
where
    F: FnMut(&Invocation) -> Result<Duration, ProcessError>,
{
    fn time(&mut self, invocation: &Invocation) -> Result<Duration, ProcessError> {
        self(invocation)
    }
}
