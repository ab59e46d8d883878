//! Sweep Data Model

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::time::Duration;

/// Identifier of one implementation under comparison (e.g. `cpp`, `go`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImplementationId(String);

impl ImplementationId {
    /// Create an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImplementationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImplementationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for ImplementationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One combination of parameters to benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPoint {
    /// Zero-based step index
    pub step: u64,
    /// Iteration count passed to the implementation
    pub iteration_count: u64,
    /// Secondary parameter passed to the implementation
    pub secondary_param: i64,
}

/// Result of one process invocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Iteration count the implementation was run with
    pub iteration_count: u64,
    /// Secondary parameter the implementation was run with
    pub secondary_param: i64,
    /// Wall-clock time of the invocation in seconds
    pub elapsed_seconds: f64,
}

impl Sample {
    /// Build a sample from the grid point it measured
    pub fn new(point: &GridPoint, elapsed: Duration) -> Self {
        Self {
            iteration_count: point.iteration_count,
            secondary_param: point.secondary_param,
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }
}

/// Samples for one implementation, in grid traversal order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dataset with room for `capacity` samples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Append a sample
    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    /// All samples in insertion order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample was recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate over samples in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// Samples recorded for one secondary parameter value.
    ///
    /// Selection is by value, not by position, so the result does not depend
    /// on how the grid interleaved the secondary values.
    pub fn series(&self, secondary_param: i64) -> impl Iterator<Item = &Sample> {
        self.samples
            .iter()
            .filter(move |s| s.secondary_param == secondary_param)
    }

    /// Distinct secondary parameter values present, ascending
    pub fn secondary_values(&self) -> BTreeSet<i64> {
        self.samples.iter().map(|s| s.secondary_param).collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Everything a sweep produced: one dataset per implementation plus the
/// secondary parameter bounds the sweep covered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResults {
    /// Datasets keyed by implementation, in implementation order
    pub datasets: BTreeMap<ImplementationId, Dataset>,
    /// Inclusive `(min, max)` secondary parameter bounds
    pub secondary_bounds: (i64, i64),
}

impl SweepResults {
    /// Create an empty result set for the given secondary bounds
    pub fn new(secondary_bounds: (i64, i64)) -> Self {
        Self {
            datasets: BTreeMap::new(),
            secondary_bounds,
        }
    }

    /// Dataset for one implementation
    pub fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.datasets.get(id)
    }

    /// Total number of samples across all implementations
    pub fn total_samples(&self) -> usize {
        self.datasets.values().map(Dataset::len).sum()
    }

    /// Inclusive range of secondary parameter values
    pub fn secondary_range(&self) -> std::ops::RangeInclusive<i64> {
        self.secondary_bounds.0..=self.secondary_bounds.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(iterations: u64, secondary: i64, secs: f64) -> Sample {
        Sample {
            iteration_count: iterations,
            secondary_param: secondary,
            elapsed_seconds: secs,
        }
    }

    #[test]
    fn test_sample_from_point() {
        let point = GridPoint {
            step: 2,
            iteration_count: 70,
            secondary_param: 1,
        };
        let s = Sample::new(&point, Duration::from_millis(1500));
        assert_eq!(s.iteration_count, 70);
        assert_eq!(s.secondary_param, 1);
        assert!((s.elapsed_seconds - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_series_filters_by_value() {
        let mut dataset = Dataset::new();
        dataset.push(sample(10, 1, 0.1));
        dataset.push(sample(10, 2, 0.2));
        dataset.push(sample(40, 1, 0.3));
        dataset.push(sample(40, 2, 0.4));

        let ones: Vec<_> = dataset.series(1).map(|s| s.iteration_count).collect();
        assert_eq!(ones, vec![10, 40]);
        assert_eq!(dataset.secondary_values().into_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(dataset.series(3).count(), 0);
    }

    #[test]
    fn test_results_lookup_by_str() {
        let mut results = SweepResults::new((1, 2));
        let mut dataset = Dataset::new();
        dataset.push(sample(10, 1, 0.1));
        results.datasets.insert(ImplementationId::new("cpp"), dataset);

        assert_eq!(results.dataset("cpp").map(Dataset::len), Some(1));
        assert!(results.dataset("go").is_none());
        assert_eq!(results.total_samples(), 1);
        assert_eq!(results.secondary_range().count(), 2);
    }

    #[test]
    fn test_implementation_ids_order() {
        let mut ids = vec![ImplementationId::new("go"), ImplementationId::new("cpp")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "cpp");
    }

    #[test]
    fn test_dataset_serializes_as_list() {
        let mut dataset = Dataset::new();
        dataset.push(sample(10, 1, 0.5));
        let json = serde_json::to_value(&dataset).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["iteration_count"], 10);
    }
}
