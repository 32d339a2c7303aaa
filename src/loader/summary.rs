use serde::Serialize;
use std::path::PathBuf;

use crate::report::{ParseStats, ReportCategory};

/// Outcome of loading every report of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResult {
    Success(ParseStats),
    Failure { path: PathBuf, reason: FailureReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// A configured report does not exist.
    MissingReport,
}

/// What happened to a category during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryStatus {
    /// No report paths configured; nothing to do.
    NotConfigured,
    /// Every report loaded and the measures were saved.
    Imported(ParseStats),
    /// A configured report was missing; the run stopped here.
    Failed { path: PathBuf, reason: FailureReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    pub category: ReportCategory,
    pub label: &'static str,
    #[serde(flatten)]
    pub status: CategoryStatus,
}

/// Warnings raised during a run that did not stop it from completing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    DeprecatedKey {
        deprecated: &'static str,
        replacement: &'static str,
    },
    MissingReport {
        category: ReportCategory,
        path: PathBuf,
    },
}

/// Record of one import run.
///
/// Categories appear in processing order; a category after a failed one is
/// never attempted and so never listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub categories: Vec<CategoryReport>,
    pub notices: Vec<Notice>,
    /// Category whose missing report ended the run early.
    pub stopped_at: Option<ReportCategory>,
}

impl ImportSummary {
    pub(crate) fn record(&mut self, category: ReportCategory, status: CategoryStatus) {
        self.categories.push(CategoryReport {
            category,
            label: category.label(),
            status,
        });
    }

    pub fn status(&self, category: ReportCategory) -> Option<&CategoryStatus> {
        self.categories
            .iter()
            .find(|report| report.category == category)
            .map(|report| &report.status)
    }

    /// Statistics of a category that was imported.
    pub fn stats(&self, category: ReportCategory) -> Option<&ParseStats> {
        match self.status(category)? {
            CategoryStatus::Imported(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn was_attempted(&self, category: ReportCategory) -> bool {
        self.status(category).is_some()
    }

    /// Whether every category was processed.
    pub fn completed(&self) -> bool {
        self.stopped_at.is_none()
    }

    pub fn deprecation_notices(&self) -> usize {
        self.notices
            .iter()
            .filter(|notice| matches!(notice, Notice::DeprecatedKey { .. }))
            .count()
    }

    pub fn total_matched_files(&self) -> usize {
        self.categories
            .iter()
            .filter_map(|report| match &report.status {
                CategoryStatus::Imported(stats) => Some(stats.matched_files),
                _ => None,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_queries() {
        let mut summary = ImportSummary::default();
        summary.record(
            ReportCategory::UnitCoverage,
            CategoryStatus::Imported(ParseStats {
                matched_files: 3,
                unknown_files: 0,
                first_unknown_files: vec![],
            }),
        );
        summary.record(ReportCategory::IntegrationCoverage, CategoryStatus::NotConfigured);

        assert_eq!(summary.stats(ReportCategory::UnitCoverage).unwrap().matched_files, 3);
        assert!(summary.stats(ReportCategory::IntegrationCoverage).is_none());
        assert!(summary.was_attempted(ReportCategory::IntegrationCoverage));
        assert!(!summary.was_attempted(ReportCategory::UnitTest));
        assert_eq!(summary.total_matched_files(), 3);
        assert!(summary.completed());
    }

    #[test]
    fn test_summary_serializes_status_inline() {
        let mut summary = ImportSummary::default();
        summary.record(
            ReportCategory::OverallCoverage,
            CategoryStatus::Failed {
                path: PathBuf::from("/p/missing.xml"),
                reason: FailureReason::MissingReport,
            },
        );

        let json = serde_json::to_value(&summary).unwrap();
        let category = &json["categories"][0];
        assert_eq!(category["category"], "overall_coverage");
        assert_eq!(category["label"], "Overall coverage");
        assert_eq!(category["status"], "failed");
        assert_eq!(category["reason"], "missing_report");
    }
}
