//! Command Templates
//!
//! Each implementation under test is described by a program path plus an
//! argument vector. Arguments may contain the `{iterations}` and `{secondary}`
//! placeholders, which are substituted per grid point. Programs are executed
//! directly, never through a shell.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder replaced with the grid point's iteration count
pub const ITERATIONS_PLACEHOLDER: &str = "{iterations}";

/// Placeholder replaced with the grid point's secondary parameter
pub const SECONDARY_PLACEHOLDER: &str = "{secondary}";

/// Implementations that have a built-in command template
pub const BUILTIN_IMPLEMENTATIONS: &[&str] = &["cpp", "go"];

/// Invocation template for one implementation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTemplate {
    /// Executable path, resolved relative to the working directory
    pub program: String,
    /// Argument vector, possibly containing placeholders
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandTemplate {
    /// Create a template from a program and its arguments
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Built-in template for a known implementation.
    ///
    /// Both generators take the same flags: `PW CS <iterations> --limit 1
    /// --patternBytes <secondary>`. `--limit 1` bounds the run so a single
    /// invocation terminates promptly.
    pub fn builtin(id: &str) -> Option<Self> {
        let program = match id {
            "cpp" => "./../cpp/RBG",
            "go" => "./../go/generator/generator",
            _ => return None,
        };
        Some(Self::new(
            program,
            [
                "PW",
                "CS",
                ITERATIONS_PLACEHOLDER,
                "--limit",
                "1",
                "--patternBytes",
                SECONDARY_PLACEHOLDER,
            ],
        ))
    }

    /// Substitute a grid point into the template
    pub fn render(&self, iteration_count: u64, secondary_param: i64) -> Invocation {
        let iterations = iteration_count.to_string();
        let secondary = secondary_param.to_string();
        let args = self
            .args
            .iter()
            .map(|arg| {
                arg.replace(ITERATIONS_PLACEHOLDER, &iterations)
                    .replace(SECONDARY_PLACEHOLDER, &secondary)
            })
            .collect();
        Invocation::new(self.program.clone(), args)
    }
}

/// A fully-formed command ready to be spawned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable path
    pub program: String,
    /// Concrete arguments
    pub args: Vec<String>,
}

impl Invocation {
    /// Create an invocation
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
