//! CSV Output

use crate::report::Report;
use std::borrow::Cow;

/// Header row of the CSV report
const HEADER: &str = "implementation,iterations,secondary,elapsed_seconds";

/// Generate a CSV report with one row per sample.
///
/// Rows follow implementation order, then sample insertion order.
pub fn generate_csv_report(report: &Report) -> String {
    let mut output = String::from(HEADER);
    output.push('\n');

    for (id, dataset) in &report.results.datasets {
        for sample in dataset {
            output.push_str(&format!(
                "{},{},{},{:.9}\n",
                escape_field(id.as_str()),
                sample.iteration_count,
                sample.secondary_param,
                sample.elapsed_seconds
            ));
        }
    }

    output
}

/// Quote a field containing a delimiter, quote or line break
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_report;
    use sweepbench_core::{Dataset, ImplementationId, Sample};

    #[test]
    fn test_csv_rows_in_order() {
        let csv = generate_csv_report(&sample_report());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], HEADER);
        assert_eq!(lines.len(), 1 + 4);
        assert_eq!(lines[1], "cpp,10,1,0.100000000");
        assert_eq!(lines[2], "cpp,10,2,0.200000000");
        assert!(lines[3].starts_with("go,10,1,"));
    }

    #[test]
    fn test_implementation_id_is_quoted_when_needed() {
        let mut report = sample_report();
        let mut dataset = Dataset::new();
        dataset.push(Sample {
            iteration_count: 10,
            secondary_param: 1,
            elapsed_seconds: 0.5,
        });
        report
            .results
            .datasets
            .insert(ImplementationId::new("a,\"b\""), dataset);

        let csv = generate_csv_report(&report);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "\"a,\"\"b\"\"\",10,1,0.500000000");
        assert_eq!(lines[2], "cpp,10,1,0.100000000");
    }
}
