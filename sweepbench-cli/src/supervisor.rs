//! Process Supervisor
//!
//! Spawns one implementation invocation at a time and times it.
//!
//! The child's stdout goes to a null sink and stderr is inherited. The clock
//! starts right before spawn and stops right after the child is reaped, so
//! fork/exec/wait overhead is part of every sample.
//!
//! Under the default permissive policy nothing about the child's fate is an
//! error: a missing executable, a crash or a non-zero exit all still produce
//! an elapsed time. This hides broken implementations behind plausible
//! looking timings; use `FailurePolicy::Strict` to surface them instead.

use crate::config::{FailurePolicy, RunnerOptions};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use sweepbench_core::{Invocation, InvocationTimer, ProcessError, Timer};
use tracing::{debug, warn};

/// Polling interval while waiting on a child that has a timeout
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Times external invocations as child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTimer {
    policy: FailurePolicy,
    timeout: Option<Duration>,
}

impl ProcessTimer {
    /// Create a timer with an explicit policy and optional timeout
    pub fn new(policy: FailurePolicy, timeout: Option<Duration>) -> Self {
        Self { policy, timeout }
    }

    /// Create a timer from configured runner options
    pub fn from_options(options: &RunnerOptions) -> Self {
        Self::new(options.failure_policy, options.timeout)
    }

    /// Failure policy in effect
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    fn spawn(invocation: &Invocation) -> Result<Child, ProcessError> {
        Command::new(&invocation.program)
            .args(&invocation.args)
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: invocation.program.clone(),
                source,
            })
    }

    /// Run to completion, returning the exit status
    fn run(&self, invocation: &Invocation) -> Result<ExitStatus, ProcessError> {
        let mut child = Self::spawn(invocation)?;
        let waited = match self.timeout {
            Some(timeout) => wait_with_timeout(&mut child, timeout, &invocation.program),
            None => child.wait().map_err(|source| ProcessError::Wait {
                program: invocation.program.clone(),
                source,
            }),
        };
        let status = waited?;

        if status.success() {
            Ok(status)
        } else {
            Err(ProcessError::ExitStatus {
                program: invocation.program.clone(),
                status,
            })
        }
    }
}

impl InvocationTimer for ProcessTimer {
    fn time(&mut self, invocation: &Invocation) -> Result<Duration, ProcessError> {
        let timer = Timer::start();
        let outcome = self.run(invocation);
        let elapsed = timer.stop();

        match (outcome, self.policy) {
            (Ok(_), _) => Ok(elapsed),
            (Err(err), FailurePolicy::Strict) => Err(err),
            (Err(err @ ProcessError::ExitStatus { .. }), FailurePolicy::Permissive) => {
                debug!(command = %invocation, "{}; recording sample anyway", err);
                Ok(elapsed)
            }
            (Err(err), FailurePolicy::Permissive) => {
                warn!(command = %invocation, "{}; recording sample anyway", err);
                Ok(elapsed)
            }
        }
    }
}

/// Wait for `child`, killing it once `timeout` has passed
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
    program: &str,
) -> Result<ExitStatus, ProcessError> {
    let wait_error = |source| ProcessError::Wait {
        program: program.to_string(),
        source,
    };
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(status) = child.try_wait().map_err(wait_error)? {
            return Ok(status);
        }

        let now = Instant::now();
        if now >= deadline {
            if let Err(e) = child.kill() {
                debug!("failed to kill {}: {}", program, e);
            }
            // Reap so no zombie is left behind
            child.wait().map_err(wait_error)?;
            return Err(ProcessError::Timeout {
                program: program.to_string(),
                timeout,
            });
        }

        std::thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}
