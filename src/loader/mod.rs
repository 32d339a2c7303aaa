//! Report-loading orchestrator.
//!
//! An import run walks the report categories in their fixed order:
//!
//! ```text
//! PENDING → LOADING(c) → SAVED(c) → LOADING(next) → … → DONE
//!                      ↘ SKIPPED (configured report missing, run ends cleanly)
//!                      ↘ ABORTED (report cannot be parsed, run fails)
//! ```
//!
//! Each category gets its own [`ReportParser`], fed every configured report
//! in order and saved exactly once when all of them loaded. A category with
//! no configured paths is skipped as a success, while a configured path that
//! does not exist ends the run; these stay two different outcomes.

mod summary;

pub use summary::{
    CategoryReport, CategoryStatus, FailureReason, ImportSummary, LoadResult, Notice,
};

use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::errors::ImportError;
use crate::measures::MeasureSink;
use crate::paths::{split_path_list, to_absolute};
use crate::project::FileIndex;
use crate::report::{ReportCategory, ReportParser};

/// Raw report setting chosen for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfiguredPaths<'s> {
    pub value: Option<&'s str>,
    /// Set when the value came from a deprecated key.
    pub deprecated_key: Option<&'static str>,
}

/// Pick the raw report setting for `category`.
///
/// The current key wins. The legacy alias is only consulted when the
/// current key is unset.
pub fn resolve_report_paths(settings: &Settings, category: ReportCategory) -> ConfiguredPaths<'_> {
    let current = settings.get(category.setting_key());
    if current.is_some() {
        return ConfiguredPaths {
            value: current,
            deprecated_key: None,
        };
    }

    match category
        .legacy_setting_key()
        .and_then(|key| settings.get(key).map(|value| (key, value)))
    {
        Some((key, value)) => ConfiguredPaths {
            value: Some(value),
            deprecated_key: Some(key),
        },
        None => ConfiguredPaths {
            value: None,
            deprecated_key: None,
        },
    }
}

/// Loads configured reports into a measure sink.
pub struct ReportLoader<'a, I: FileIndex + ?Sized, S: MeasureSink + ?Sized> {
    index: &'a I,
    sink: &'a mut S,
}

impl<'a, I: FileIndex + ?Sized, S: MeasureSink + ?Sized> ReportLoader<'a, I, S> {
    pub fn new(index: &'a I, sink: &'a mut S) -> Self {
        Self { index, sink }
    }

    /// Import every configured report category.
    ///
    /// A missing report ends the run early but still returns `Ok`; earlier
    /// categories stay saved. A report that cannot be parsed fails the run.
    pub fn run(&mut self, settings: &Settings, base_dir: &Path) -> Result<ImportSummary, ImportError> {
        let mut summary = ImportSummary::default();

        for category in ReportCategory::ORDER {
            let configured = resolve_report_paths(settings, category);
            if let Some(deprecated) = configured.deprecated_key {
                let replacement = category.setting_key();
                warn!(
                    "Use the new property \"{}\" instead of the deprecated \"{}\"",
                    replacement, deprecated
                );
                summary.notices.push(Notice::DeprecatedKey {
                    deprecated,
                    replacement,
                });
            }

            let paths = split_path_list(configured.value);
            if paths.is_empty() {
                debug!("No {} reports configured", category);
                summary.record(category, CategoryStatus::NotConfigured);
                continue;
            }

            match self.load_category(category, &paths, base_dir)? {
                LoadResult::Success(stats) => {
                    summary.record(category, CategoryStatus::Imported(stats));
                }
                LoadResult::Failure { path, reason } => {
                    summary.notices.push(Notice::MissingReport {
                        category,
                        path: path.clone(),
                    });
                    summary.record(category, CategoryStatus::Failed { path, reason });
                    summary.stopped_at = Some(category);
                    break;
                }
            }
        }

        Ok(summary)
    }

    /// Load all reports of one category through a single parser.
    pub fn load_category(
        &mut self,
        category: ReportCategory,
        paths: &[String],
        base_dir: &Path,
    ) -> Result<LoadResult, ImportError> {
        let label = category.label();
        let mut parser = ReportParser::new(category, self.index);

        for path in paths {
            let report = to_absolute(path, base_dir);
            info!("Parsing {}", report.display());

            if !report.exists() {
                warn!("Cannot find {} report to parse: {}", label, report.display());
                return Ok(LoadResult::Failure {
                    path: report,
                    reason: FailureReason::MissingReport,
                });
            }

            parser
                .parse(&report, path)
                .map_err(|e| ImportError::from_parse(label, &report, e))?;
        }

        let stats = parser.save_measures(&mut *self.sink);

        info!("Imported {} data for {} files", label, stats.matched_files);
        if stats.unknown_files > 0 {
            info!(
                "{} data ignored for {} unknown files, including:\n{}",
                label,
                stats.unknown_files,
                stats.first_unknown_files.join("\n")
            );
        }

        Ok(LoadResult::Success(stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keys;

    #[test]
    fn test_current_key_wins_over_legacy() {
        let settings = Settings::new()
            .with(keys::LEGACY_REPORT_PATH, "old.xml")
            .with(keys::REPORT_PATHS, "new.xml");

        let configured = resolve_report_paths(&settings, ReportCategory::UnitCoverage);

        assert_eq!(configured.value, Some("new.xml"));
        assert_eq!(configured.deprecated_key, None);
    }

    #[test]
    fn test_legacy_key_used_when_current_unset() {
        let settings = Settings::new().with(keys::LEGACY_REPORT_PATH, "old.xml");

        let configured = resolve_report_paths(&settings, ReportCategory::UnitCoverage);

        assert_eq!(configured.value, Some("old.xml"));
        assert_eq!(configured.deprecated_key, Some(keys::LEGACY_REPORT_PATH));
    }

    #[test]
    fn test_blank_current_key_falls_back_to_legacy() {
        let settings = Settings::new()
            .with(keys::REPORT_PATHS, "   ")
            .with(keys::LEGACY_REPORT_PATH, "old.xml");

        let configured = resolve_report_paths(&settings, ReportCategory::UnitCoverage);

        assert_eq!(configured.value, Some("old.xml"));
    }

    #[test]
    fn test_legacy_key_ignored_for_other_categories() {
        let settings = Settings::new().with(keys::LEGACY_REPORT_PATH, "old.xml");

        for category in &ReportCategory::ORDER[1..] {
            let configured = resolve_report_paths(&settings, *category);
            assert_eq!(configured.value, None);
            assert_eq!(configured.deprecated_key, None);
        }
    }

    #[test]
    fn test_nothing_configured() {
        let settings = Settings::new();
        let configured = resolve_report_paths(&settings, ReportCategory::UnitTest);
        assert_eq!(
            configured,
            ConfiguredPaths {
                value: None,
                deprecated_key: None
            }
        );
    }
}
