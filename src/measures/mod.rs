//! Measures derived from imported reports and the sink they are saved to.
//!
//! The loader hands one [`FileMeasures`] per project file to a
//! [`MeasureSink`] when a category is committed. [`InMemoryMeasureStore`] is
//! the sink used by the CLI and by tests.

mod compute;
mod store;

pub use compute::{coverage_measures, test_measures};
pub use store::{InMemoryMeasureStore, StoredFile};

use serde::Serialize;
use std::collections::BTreeMap;

use crate::project::ProjectFile;
use crate::report::TestCase;

/// Metric keys. Coverage keys are prefixed per category (`it_`, `overall_`).
pub mod metrics {
    pub const LINES_TO_COVER: &str = "lines_to_cover";
    pub const UNCOVERED_LINES: &str = "uncovered_lines";
    pub const CONDITIONS_TO_COVER: &str = "conditions_to_cover";
    pub const UNCOVERED_CONDITIONS: &str = "uncovered_conditions";
    pub const LINE_HITS_DATA: &str = "coverage_line_hits_data";
    pub const CONDITIONS_BY_LINE: &str = "conditions_by_line";
    pub const COVERED_CONDITIONS_BY_LINE: &str = "covered_conditions_by_line";
    pub const LINE_COVERAGE: &str = "line_coverage";
    pub const BRANCH_COVERAGE: &str = "branch_coverage";
    pub const COVERAGE: &str = "coverage";

    pub const TESTS: &str = "tests";
    pub const SKIPPED_TESTS: &str = "skipped_tests";
    pub const TEST_FAILURES: &str = "test_failures";
    pub const TEST_ERRORS: &str = "test_errors";
    pub const TEST_EXECUTION_TIME: &str = "test_execution_time";
    pub const TEST_SUCCESS_DENSITY: &str = "test_success_density";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MeasureValue {
    Int(u64),
    Float(f64),
    Data(String),
}

impl MeasureValue {
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::Data(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&str> {
        match self {
            Self::Data(v) => Some(v),
            _ => None,
        }
    }
}

/// Measures computed for one project file by one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileMeasures {
    pub values: BTreeMap<String, MeasureValue>,
    /// Test plan entries; only unit-test imports fill this.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test_cases: Vec<TestCase>,
}

impl FileMeasures {
    pub fn insert(&mut self, key: impl Into<String>, value: MeasureValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&MeasureValue> {
        self.values.get(key)
    }
}

/// Persistence target for imported measures.
pub trait MeasureSink {
    fn save(&mut self, file: &ProjectFile, measures: FileMeasures);
}
