//! Setting keys understood by the importer.

/// Unit coverage report paths.
pub const REPORT_PATHS: &str = "genericcoverage.reportPaths";
/// Deprecated single-key alias of [`REPORT_PATHS`].
pub const LEGACY_REPORT_PATH: &str = "genericcoverage.reportPath";
/// Integration-test coverage report paths.
pub const IT_REPORT_PATHS: &str = "genericcoverage.itReportPaths";
/// Overall coverage report paths.
pub const OVERALL_REPORT_PATHS: &str = "genericcoverage.overallReportPaths";
/// Unit-test execution report paths.
pub const UNIT_TEST_REPORT_PATHS: &str = "genericcoverage.unitTestReportPaths";

/// Globs classifying project files as tests.
pub const TEST_PATTERNS: &str = "project.testPatterns";
/// Globs removing files from the project index.
pub const EXCLUSIONS: &str = "project.exclusions";

pub const DEFAULT_TEST_PATTERNS: &str =
    "**/test/**,**/tests/**,**/*_test.*,**/*Test.*,**/test_*";

/// Every key that can enable an import run.
pub const REPORT_KEYS: [&str; 5] = [
    LEGACY_REPORT_PATH,
    REPORT_PATHS,
    IT_REPORT_PATHS,
    OVERALL_REPORT_PATHS,
    UNIT_TEST_REPORT_PATHS,
];
