//! Sweep Configuration
//!
//! The configuration file is JSON (or TOML when the path ends in `.toml`):
//!
//! ```json
//! {
//!   "plots": {
//!     "minIterations": 10, "maxIterations": 100, "numSteps": 3,
//!     "minSecondaryParam": 1, "maxSecondaryParam": 2
//!   },
//!   "implementation": { "cpp": true, "go": false },
//!   "commands": { "rust": { "program": "./rbg", "args": ["{iterations}", "{secondary}"] } },
//!   "runner": { "timeout": "30s", "strict": false },
//!   "output": { "format": "json", "path": "sweep.json", "chart": "sweep.svg" }
//! }
//! ```
//!
//! The document is parsed into a generic value tree and then walked field by
//! field, so every rejection names the offending dotted path. Validation never
//! has side effects and always completes before anything is spawned.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sweepbench_core::{CommandTemplate, ImplementationId};
use sweepbench_report::OutputFormat;
use thiserror::Error;

/// Reasons a configuration is rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or TOML
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// A required field is absent
    #[error("missing required field `{0}`")]
    MissingField(String),

    /// A field has the wrong JSON type
    #[error("field `{field}` must be {expected}")]
    WrongType {
        /// Dotted field path
        field: String,
        /// Expected type
        expected: &'static str,
    },

    /// A number is below its allowed minimum
    #[error("field `{field}` must be at least {minimum}, got {value}")]
    BelowMinimum {
        /// Dotted field path
        field: String,
        /// Smallest allowed value
        minimum: i64,
        /// Value found
        value: i64,
    },

    /// `plots.numSteps` is zero or negative
    #[error("field `plots.numSteps` must be positive, got {0}")]
    NonPositiveSteps(i64),

    /// A min/max pair is inverted
    #[error("`{min_field}` ({min}) is greater than `{max_field}` ({max})")]
    InvertedRange {
        /// Lower bound field
        min_field: String,
        /// Upper bound field
        max_field: String,
        /// Lower bound value
        min: i64,
        /// Upper bound value
        max: i64,
    },

    /// The `implementation` block is empty
    #[error("`implementation` must list at least one implementation")]
    NoImplementations,

    /// An enabled implementation has neither a builtin nor a custom command
    #[error("implementation `{0}` is enabled but has no command; add one under `commands.{0}`")]
    UnknownImplementation(String),

    /// A value has the right type but is unusable
    #[error("field `{field}` is invalid: {reason}")]
    InvalidValue {
        /// Dotted field path
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// What to do when an invocation fails (cannot spawn, non-zero exit, timeout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the elapsed time as a normal sample and keep going
    #[default]
    Permissive,
    /// Abort the sweep with the invocation error
    Strict,
}

/// One enabled implementation and how to invoke it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Implementation {
    /// Implementation identifier
    pub id: ImplementationId,
    /// Command run for every grid point
    pub command: CommandTemplate,
}

/// Options controlling how invocations are run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunnerOptions {
    /// Kill an invocation after this long; `None` waits forever
    pub timeout: Option<Duration>,
    /// What a failed invocation does to the sweep
    pub failure_policy: FailurePolicy,
}

/// Where and how results are written
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputOptions {
    /// Report format
    pub format: OutputFormat,
    /// Report file (stdout if not specified)
    pub path: Option<PathBuf>,
    /// SVG chart file (no chart if not specified)
    pub chart: Option<PathBuf>,
}

/// Validated sweep configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// Iteration count of the first step (at least 1)
    pub min_iterations: u64,
    /// Upper iteration bound, never exceeded
    pub max_iterations: u64,
    /// Number of steps (at least 1)
    pub num_steps: u64,
    /// First secondary parameter value
    pub min_secondary_param: i64,
    /// Last secondary parameter value, inclusive
    pub max_secondary_param: i64,
    /// Enabled implementations, ordered by id
    pub implementations: Vec<Implementation>,
    /// Implementations listed but switched off, ordered by id
    pub disabled: Vec<ImplementationId>,
    /// Invocation options
    pub runner: RunnerOptions,
    /// Output options
    pub output: OutputOptions,
}

impl SweepConfig {
    /// Load and validate a configuration file.
    ///
    /// Files ending in `.toml` are parsed as TOML, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Validate a JSON document
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let value: toml::Value =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let value = serde_json::to_value(value).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Validate an already-parsed document
    pub fn from_value(root: &Value) -> Result<Self, ConfigError> {
        let root = as_object(root, "<root>")?;

        let plots = as_object(required(root, "", "plots")?, "plots")?;
        let min_iterations = integer(required(plots, "plots", "minIterations")?, "plots.minIterations")?;
        let max_iterations = integer(required(plots, "plots", "maxIterations")?, "plots.maxIterations")?;
        let num_steps = integer(required(plots, "plots", "numSteps")?, "plots.numSteps")?;
        let (min_secondary_field, min_secondary) =
            aliased_integer(plots, "minSecondaryParam", "minPatternBytes")?;
        let (max_secondary_field, max_secondary) =
            aliased_integer(plots, "maxSecondaryParam", "maxPatternBytes")?;

        at_least(min_iterations, 1, "plots.minIterations")?;
        at_least(max_iterations, 1, "plots.maxIterations")?;

        let flags = as_object(required(root, "", "implementation")?, "implementation")?;

        if num_steps <= 0 {
            return Err(ConfigError::NonPositiveSteps(num_steps));
        }
        ordered(
            ("plots.minIterations", min_iterations),
            ("plots.maxIterations", max_iterations),
        )?;
        ordered(
            (min_secondary_field.as_str(), min_secondary),
            (max_secondary_field.as_str(), max_secondary),
        )?;

        let custom = match root.get("commands") {
            Some(value) => commands(value)?,
            None => Map::new(),
        };

        if flags.is_empty() {
            return Err(ConfigError::NoImplementations);
        }

        let mut implementations = Vec::new();
        let mut disabled = Vec::new();
        for (id, flag) in flags {
            let enabled = boolean(flag, &format!("implementation.{}", id))?;
            if !enabled {
                disabled.push(ImplementationId::new(id.as_str()));
                continue;
            }
            let command = match custom.get(id) {
                Some(value) => command_template(value, &format!("commands.{}", id))?,
                None => CommandTemplate::builtin(id)
                    .ok_or_else(|| ConfigError::UnknownImplementation(id.clone()))?,
            };
            implementations.push(Implementation {
                id: ImplementationId::new(id.as_str()),
                command,
            });
        }
        // Sweep order is id order, independent of how the map was parsed
        implementations.sort_by(|a, b| a.id.cmp(&b.id));
        disabled.sort();

        let runner = match root.get("runner") {
            Some(value) => runner_options(value)?,
            None => RunnerOptions::default(),
        };
        let output = match root.get("output") {
            Some(value) => output_options(value)?,
            None => OutputOptions::default(),
        };

        Ok(Self {
            // Both were checked to be >= 1 and ordered
            min_iterations: min_iterations as u64,
            max_iterations: max_iterations as u64,
            num_steps: num_steps as u64,
            min_secondary_param: min_secondary,
            max_secondary_param: max_secondary,
            implementations,
            disabled,
            runner,
            output,
        })
    }

    /// Inclusive secondary parameter bounds
    pub fn secondary_bounds(&self) -> (i64, i64) {
        (self.min_secondary_param, self.max_secondary_param)
    }

    /// Generate an example configuration as a JSON string
    pub fn example_json() -> String {
        r#"{
  "plots": {
    "minIterations": 1000,
    "maxIterations": 100000,
    "numSteps": 10,
    "minSecondaryParam": 1,
    "maxSecondaryParam": 4
  },
  "implementation": {
    "cpp": true,
    "go": true
  },
  "runner": {
    "timeout": "60s",
    "strict": false
  },
  "output": {
    "format": "human",
    "chart": "target/sweepbench/sweep.svg"
  }
}
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m"); a bare number means seconds
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Invalid duration number: {}", num_part));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * multiplier as f64) as u64))
    }
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn required<'a>(map: &'a Map<String, Value>, parent: &str, key: &str) -> Result<&'a Value, ConfigError> {
    map.get(key)
        .ok_or_else(|| ConfigError::MissingField(join(parent, key)))
}

fn as_object<'a>(value: &'a Value, field: &str) -> Result<&'a Map<String, Value>, ConfigError> {
    value.as_object().ok_or_else(|| ConfigError::WrongType {
        field: field.to_string(),
        expected: "an object",
    })
}

fn integer(value: &Value, field: &str) -> Result<i64, ConfigError> {
    value.as_i64().ok_or_else(|| ConfigError::WrongType {
        field: field.to_string(),
        expected: "an integer",
    })
}

fn boolean(value: &Value, field: &str) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| ConfigError::WrongType {
        field: field.to_string(),
        expected: "a boolean",
    })
}

fn string<'a>(value: &'a Value, field: &str) -> Result<&'a str, ConfigError> {
    value.as_str().ok_or_else(|| ConfigError::WrongType {
        field: field.to_string(),
        expected: "a string",
    })
}

/// Secondary bounds also accept the older `*PatternBytes` spelling
fn aliased_integer(
    plots: &Map<String, Value>,
    key: &str,
    alias: &str,
) -> Result<(String, i64), ConfigError> {
    let (name, value) = match (plots.get(key), plots.get(alias)) {
        (Some(value), _) => (key, value),
        (None, Some(value)) => (alias, value),
        (None, None) => return Err(ConfigError::MissingField(join("plots", key))),
    };
    let field = join("plots", name);
    let value = integer(value, &field)?;
    Ok((field, value))
}

fn at_least(value: i64, minimum: i64, field: &str) -> Result<(), ConfigError> {
    if value < minimum {
        return Err(ConfigError::BelowMinimum {
            field: field.to_string(),
            minimum,
            value,
        });
    }
    Ok(())
}

fn ordered((min_field, min): (&str, i64), (max_field, max): (&str, i64)) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedRange {
            min_field: min_field.to_string(),
            max_field: max_field.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

fn commands(value: &Value) -> Result<Map<String, Value>, ConfigError> {
    let map = as_object(value, "commands")?;
    for (id, template) in map {
        command_template(template, &format!("commands.{}", id))?;
    }
    Ok(map.clone())
}

fn command_template(value: &Value, field: &str) -> Result<CommandTemplate, ConfigError> {
    let map = as_object(value, field)?;

    let program_field = join(field, "program");
    let program = string(required(map, field, "program")?, &program_field)?;
    if program.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: program_field,
            reason: "program must not be empty".to_string(),
        });
    }

    let args_field = join(field, "args");
    let args = match map.get("args") {
        Some(value) => value
            .as_array()
            .ok_or_else(|| ConfigError::WrongType {
                field: args_field.clone(),
                expected: "an array of strings",
            })?
            .iter()
            .enumerate()
            .map(|(i, arg)| string(arg, &format!("{}[{}]", args_field, i)).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(CommandTemplate::new(program, args))
}

fn runner_options(value: &Value) -> Result<RunnerOptions, ConfigError> {
    let map = as_object(value, "runner")?;
    let mut options = RunnerOptions::default();

    if let Some(timeout) = map.get("timeout") {
        let raw = string(timeout, "runner.timeout")?;
        let parsed = SweepConfig::parse_duration(raw).map_err(|e| ConfigError::InvalidValue {
            field: "runner.timeout".to_string(),
            reason: e.to_string(),
        })?;
        if parsed.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "runner.timeout".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }
        options.timeout = Some(parsed);
    }

    if let Some(strict) = map.get("strict") {
        if boolean(strict, "runner.strict")? {
            options.failure_policy = FailurePolicy::Strict;
        }
    }

    Ok(options)
}

fn output_options(value: &Value) -> Result<OutputOptions, ConfigError> {
    let map = as_object(value, "output")?;
    let mut options = OutputOptions::default();

    if let Some(format) = map.get("format") {
        options.format = string(format, "output.format")?
            .parse()
            .map_err(|reason| ConfigError::InvalidValue {
                field: "output.format".to_string(),
                reason,
            })?;
    }
    if let Some(path) = map.get("path") {
        options.path = Some(PathBuf::from(string(path, "output.path")?));
    }
    if let Some(chart) = map.get("chart") {
        options.chart = Some(PathBuf::from(string(chart, "output.chart")?));
    }

    Ok(options)
}
