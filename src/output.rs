//! Rendering of an import run for the terminal or as JSON.
//!
//! The terminal summary streams into any `io::Write` and propagates its
//! errors; `render_*` collect the output into a `String`.

use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use crate::loader::{CategoryStatus, ImportSummary, Notice};
use crate::measures::InMemoryMeasureStore;
use crate::report::ReportCategory;

/// Everything an import run produced, as emitted by `--format json`.
#[derive(Debug, Serialize)]
pub struct ImportReport<'a> {
    pub base_dir: &'a Path,
    pub summary: &'a ImportSummary,
    pub files: &'a InMemoryMeasureStore,
}

pub fn render_json(report: &ImportReport<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn render_terminal(report: &ImportReport<'_>) -> io::Result<String> {
    let mut out = Vec::new();
    write_terminal(report, &mut out)?;
    String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write the human-readable summary of an import run.
pub fn write_terminal<W: Write>(report: &ImportReport<'_>, out: &mut W) -> io::Result<()> {
    let summary = report.summary;

    writeln!(out, "{}", "GENERIC COVERAGE IMPORT".bold().blue())?;
    writeln!(out, "Base directory: {}", report.base_dir.display())?;
    writeln!(out)?;

    for category in ReportCategory::ORDER {
        let status = match summary.status(category) {
            Some(status) => format_status(status),
            None => "not attempted".dimmed().to_string(),
        };
        writeln!(out, "  {:<18} {}", category.label(), status)?;

        if let Some(stats) = summary.stats(category) {
            for name in &stats.first_unknown_files {
                writeln!(out, "      {} {}", "?".yellow(), name)?;
            }
        }
    }

    let deprecated: Vec<_> = summary
        .notices
        .iter()
        .filter_map(|notice| match notice {
            Notice::DeprecatedKey {
                deprecated,
                replacement,
            } => Some(format!("\"{}\" is deprecated, use \"{}\"", deprecated, replacement)),
            Notice::MissingReport { .. } => None,
        })
        .collect();
    if !deprecated.is_empty() {
        writeln!(out)?;
        for line in deprecated {
            writeln!(out, "{} {}", "warning:".yellow().bold(), line)?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "Measures saved for {} files",
        report.files.len().to_string().bold()
    )?;
    if let Some(category) = summary.stopped_at {
        writeln!(
            out,
            "{}",
            format!("Stopped at {} reports; later categories were skipped", category).red()
        )?;
    }

    Ok(())
}

fn format_status(status: &CategoryStatus) -> String {
    match status {
        CategoryStatus::NotConfigured => "not configured".dimmed().to_string(),
        CategoryStatus::Imported(stats) => {
            let imported = format!("imported {} files", stats.matched_files).green();
            if stats.unknown_files > 0 {
                format!(
                    "{}, {}",
                    imported,
                    format!("{} unknown", stats.unknown_files).yellow()
                )
            } else {
                imported.to_string()
            }
        }
        CategoryStatus::Failed { path, .. } => {
            format!("missing report {}", path.display()).red().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ParseStats;
    use std::path::PathBuf;

    fn summary() -> ImportSummary {
        ImportSummary {
            categories: vec![
                crate::loader::CategoryReport {
                    category: ReportCategory::UnitCoverage,
                    label: "coverage",
                    status: CategoryStatus::Imported(ParseStats {
                        matched_files: 2,
                        unknown_files: 1,
                        first_unknown_files: vec!["vendor/lib.js".to_string()],
                    }),
                },
                crate::loader::CategoryReport {
                    category: ReportCategory::IntegrationCoverage,
                    label: "IT coverage",
                    status: CategoryStatus::Failed {
                        path: PathBuf::from("/p/it.xml"),
                        reason: crate::loader::FailureReason::MissingReport,
                    },
                },
            ],
            notices: vec![],
            stopped_at: Some(ReportCategory::IntegrationCoverage),
        }
    }

    #[test]
    fn test_render_terminal_lists_every_category() {
        colored::control::set_override(false);
        let summary = summary();
        let store = InMemoryMeasureStore::new();
        let report = ImportReport {
            base_dir: Path::new("/p"),
            summary: &summary,
            files: &store,
        };

        let text = render_terminal(&report).unwrap();

        assert!(text.contains("imported 2 files, 1 unknown"), "{}", text);
        assert!(text.contains("vendor/lib.js"));
        assert!(text.contains("missing report /p/it.xml"));
        assert!(text.contains("unit test"));
        assert!(text.contains("not attempted"));
        assert!(text.contains("Stopped at IT coverage reports"));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_terminal_propagates_writer_errors() {
        let summary = summary();
        let store = InMemoryMeasureStore::new();
        let report = ImportReport {
            base_dir: Path::new("/p"),
            summary: &summary,
            files: &store,
        };

        let err = write_terminal(&report, &mut FailingWriter).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_render_json_shape() {
        let summary = summary();
        let store = InMemoryMeasureStore::new();
        let report = ImportReport {
            base_dir: Path::new("/p"),
            summary: &summary,
            files: &store,
        };

        let json: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();

        assert_eq!(json["summary"]["categories"][0]["matched_files"], 2);
        assert_eq!(json["summary"]["stopped_at"], "integration_coverage");
        assert!(json["files"].as_object().unwrap().is_empty());
    }
}
