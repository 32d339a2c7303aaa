//! Pure conversion of accumulated report data into measures.

use super::{metrics, FileMeasures, MeasureValue};
use crate::report::{FileCoverage, FileTestResults, ReportCategory};

/// Coverage measures of one file, keyed with the category's prefix.
pub fn coverage_measures(category: ReportCategory, coverage: &FileCoverage) -> FileMeasures {
    let prefix = category.metric_prefix();
    let key = |name: &str| format!("{}{}", prefix, name);
    let mut measures = FileMeasures::default();

    let lines_to_cover = coverage.lines_to_cover();
    let uncovered_lines = coverage.uncovered_lines();
    let conditions_to_cover = coverage.conditions_to_cover();
    let uncovered_conditions = coverage.uncovered_conditions();

    measures.insert(key(metrics::LINES_TO_COVER), MeasureValue::Int(lines_to_cover));
    measures.insert(key(metrics::UNCOVERED_LINES), MeasureValue::Int(uncovered_lines));
    measures.insert(
        key(metrics::CONDITIONS_TO_COVER),
        MeasureValue::Int(conditions_to_cover),
    );
    measures.insert(
        key(metrics::UNCOVERED_CONDITIONS),
        MeasureValue::Int(uncovered_conditions),
    );

    if let Some(value) = percentage(lines_to_cover - uncovered_lines, lines_to_cover) {
        measures.insert(key(metrics::LINE_COVERAGE), MeasureValue::Float(value));
    }
    if let Some(value) = percentage(
        conditions_to_cover - uncovered_conditions,
        conditions_to_cover,
    ) {
        measures.insert(key(metrics::BRANCH_COVERAGE), MeasureValue::Float(value));
    }
    let elements = lines_to_cover + conditions_to_cover;
    let uncovered = uncovered_lines + uncovered_conditions;
    if let Some(value) = percentage(elements - uncovered, elements) {
        measures.insert(key(metrics::COVERAGE), MeasureValue::Float(value));
    }

    let hits = join_data(coverage.lines().iter().map(|(line, l)| (*line, l.hits)));
    if !hits.is_empty() {
        measures.insert(key(metrics::LINE_HITS_DATA), MeasureValue::Data(hits));
    }

    let with_conditions: Vec<_> = coverage
        .lines()
        .iter()
        .filter(|(_, l)| l.conditions > 0)
        .collect();
    if !with_conditions.is_empty() {
        let conditions = join_data(
            with_conditions
                .iter()
                .map(|(line, l)| (**line, u64::from(l.conditions))),
        );
        let covered = join_data(
            with_conditions
                .iter()
                .map(|(line, l)| (**line, u64::from(l.covered_conditions))),
        );
        measures.insert(key(metrics::CONDITIONS_BY_LINE), MeasureValue::Data(conditions));
        measures.insert(
            key(metrics::COVERED_CONDITIONS_BY_LINE),
            MeasureValue::Data(covered),
        );
    }

    measures
}

/// Unit-test measures of one test file, carrying its test plan.
pub fn test_measures(results: &FileTestResults) -> FileMeasures {
    let mut measures = FileMeasures::default();

    measures.insert(metrics::TESTS, MeasureValue::Int(results.tests()));
    measures.insert(metrics::SKIPPED_TESTS, MeasureValue::Int(results.skipped()));
    measures.insert(metrics::TEST_FAILURES, MeasureValue::Int(results.failures()));
    measures.insert(metrics::TEST_ERRORS, MeasureValue::Int(results.errors()));
    measures.insert(
        metrics::TEST_EXECUTION_TIME,
        MeasureValue::Int(results.execution_time()),
    );
    if let Some(density) = results.success_density() {
        measures.insert(metrics::TEST_SUCCESS_DENSITY, MeasureValue::Float(density));
    }
    measures.test_cases = results.cases().to_vec();

    measures
}

fn percentage(part: u64, total: u64) -> Option<f64> {
    (total > 0).then(|| part as f64 * 100.0 / total as f64)
}

/// `line=value;line=value` encoding used by the data measures.
fn join_data(entries: impl Iterator<Item = (u32, u64)>) -> String {
    entries
        .map(|(line, value)| format!("{}={}", line, value))
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{TestCase, TestStatus};
    use pretty_assertions::assert_eq;

    fn sample_coverage() -> FileCoverage {
        let mut coverage = FileCoverage::new();
        coverage.record(1, true, 0, 0);
        coverage.record(2, false, 0, 0);
        coverage.record(4, true, 2, 1);
        coverage.record(5, true, 0, 0);
        coverage
    }

    #[test]
    fn test_unit_coverage_measures() {
        let measures = coverage_measures(ReportCategory::UnitCoverage, &sample_coverage());

        assert_eq!(measures.get("lines_to_cover"), Some(&MeasureValue::Int(4)));
        assert_eq!(measures.get("uncovered_lines"), Some(&MeasureValue::Int(1)));
        assert_eq!(measures.get("conditions_to_cover"), Some(&MeasureValue::Int(2)));
        assert_eq!(measures.get("uncovered_conditions"), Some(&MeasureValue::Int(1)));
        assert_eq!(measures.get("line_coverage"), Some(&MeasureValue::Float(75.0)));
        assert_eq!(measures.get("branch_coverage"), Some(&MeasureValue::Float(50.0)));
        assert_eq!(
            measures.get("coverage_line_hits_data"),
            Some(&MeasureValue::Data("1=1;2=0;4=1;5=1".to_string()))
        );
        assert_eq!(
            measures.get("conditions_by_line"),
            Some(&MeasureValue::Data("4=2".to_string()))
        );
        assert_eq!(
            measures.get("covered_conditions_by_line"),
            Some(&MeasureValue::Data("4=1".to_string()))
        );
        let coverage = measures.get("coverage").and_then(MeasureValue::as_float).unwrap();
        assert!((coverage - 400.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_prefix_applied() {
        let measures =
            coverage_measures(ReportCategory::IntegrationCoverage, &sample_coverage());
        assert!(measures.get("it_lines_to_cover").is_some());
        assert!(measures.get("lines_to_cover").is_none());

        let measures = coverage_measures(ReportCategory::OverallCoverage, &sample_coverage());
        assert!(measures.get("overall_uncovered_lines").is_some());
    }

    #[test]
    fn test_no_branch_measures_without_conditions() {
        let mut coverage = FileCoverage::new();
        coverage.record(3, false, 0, 0);

        let measures = coverage_measures(ReportCategory::UnitCoverage, &coverage);

        assert!(measures.get("branch_coverage").is_none());
        assert!(measures.get("conditions_by_line").is_none());
        assert_eq!(measures.get("line_coverage"), Some(&MeasureValue::Float(0.0)));
    }

    #[test]
    fn test_unit_test_measures() {
        let mut results = FileTestResults::new();
        for (name, status) in [
            ("ok", TestStatus::Ok),
            ("ok2", TestStatus::Ok),
            ("skip", TestStatus::Skipped),
            ("fail", TestStatus::Failure),
        ] {
            results
                .try_push(TestCase {
                    name: name.to_string(),
                    duration_ms: 10,
                    status,
                    message: None,
                    stack_trace: None,
                })
                .unwrap();
        }

        let measures = test_measures(&results);

        assert_eq!(measures.get("tests"), Some(&MeasureValue::Int(3)));
        assert_eq!(measures.get("skipped_tests"), Some(&MeasureValue::Int(1)));
        assert_eq!(measures.get("test_failures"), Some(&MeasureValue::Int(1)));
        assert_eq!(measures.get("test_errors"), Some(&MeasureValue::Int(0)));
        assert_eq!(measures.get("test_execution_time"), Some(&MeasureValue::Int(40)));
        let density = measures
            .get("test_success_density")
            .and_then(MeasureValue::as_float)
            .unwrap();
        assert!((density - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(measures.test_cases.len(), 4);
    }
}
