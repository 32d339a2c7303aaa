use serde::Serialize;
use std::fmt;

use crate::config::keys;

/// The four report kinds, in import order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    UnitCoverage,
    IntegrationCoverage,
    OverallCoverage,
    UnitTest,
}

impl ReportCategory {
    /// Fixed processing order of an import run.
    pub const ORDER: [ReportCategory; 4] = [
        ReportCategory::UnitCoverage,
        ReportCategory::IntegrationCoverage,
        ReportCategory::OverallCoverage,
        ReportCategory::UnitTest,
    ];

    /// Human-readable label used in logs and error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::UnitCoverage => "coverage",
            Self::IntegrationCoverage => "IT coverage",
            Self::OverallCoverage => "Overall coverage",
            Self::UnitTest => "unit test",
        }
    }

    /// Setting key holding this category's report paths.
    pub fn setting_key(self) -> &'static str {
        match self {
            Self::UnitCoverage => keys::REPORT_PATHS,
            Self::IntegrationCoverage => keys::IT_REPORT_PATHS,
            Self::OverallCoverage => keys::OVERALL_REPORT_PATHS,
            Self::UnitTest => keys::UNIT_TEST_REPORT_PATHS,
        }
    }

    /// Deprecated alias key, if the category has one.
    pub fn legacy_setting_key(self) -> Option<&'static str> {
        match self {
            Self::UnitCoverage => Some(keys::LEGACY_REPORT_PATH),
            _ => None,
        }
    }

    /// Root element a report of this category must start with.
    pub fn root_element(self) -> &'static str {
        match self {
            Self::UnitTest => "unitTest",
            _ => "coverage",
        }
    }

    /// Prefix applied to coverage metric keys.
    pub fn metric_prefix(self) -> &'static str {
        match self {
            Self::IntegrationCoverage => "it_",
            Self::OverallCoverage => "overall_",
            Self::UnitCoverage | Self::UnitTest => "",
        }
    }

    pub fn is_coverage(self) -> bool {
        !matches!(self, Self::UnitTest)
    }
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
