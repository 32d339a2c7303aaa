//! Generic report parser.
//!
//! One [`ReportParser`] serves one category for one import run. Every report
//! of the category is parsed into the same instance, so per-file data and
//! match statistics accumulate across reports; [`ReportParser::save_measures`]
//! consumes the parser and commits everything at once.
//!
//! Reading the file is the only I/O here. The document is walked with the
//! streaming [`XmlCursor`](super::xml::XmlCursor) and each element is
//! validated against the grammar of the category's mode.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::category::ReportCategory;
use super::coverage::FileCoverage;
use super::stats::{ParseStats, UnknownFiles};
use super::unit_test::{FileTestResults, TestCase, TestStatus};
use super::xml::{Element, XmlCursor};
use crate::errors::ReportParseError;
use crate::measures::{coverage_measures, test_measures, MeasureSink};
use crate::project::{FileIndex, ProjectFile};

const SUPPORTED_VERSION: &str = "1";

enum FileData {
    Coverage(FileCoverage),
    Tests(FileTestResults),
}

struct MatchedFile {
    file: ProjectFile,
    data: FileData,
}

pub struct ReportParser<'i, I: FileIndex + ?Sized> {
    category: ReportCategory,
    index: &'i I,
    matched: BTreeMap<String, MatchedFile>,
    unknown: UnknownFiles,
}

impl<'i, I: FileIndex + ?Sized> ReportParser<'i, I> {
    pub fn new(category: ReportCategory, index: &'i I) -> Self {
        Self {
            category,
            index,
            matched: BTreeMap::new(),
            unknown: UnknownFiles::default(),
        }
    }

    pub fn category(&self) -> ReportCategory {
        self.category
    }

    /// Read `file` and parse it into this parser.
    ///
    /// `declared_path` is the path as configured, used for diagnostics only.
    pub fn parse(&mut self, file: &Path, declared_path: &str) -> Result<(), ReportParseError> {
        tracing::debug!(
            "Reading {} report {} (configured as {})",
            self.category,
            file.display(),
            declared_path
        );
        let source = fs::read_to_string(file)?;
        self.parse_str(&source)
    }

    /// Parse an in-memory report document.
    pub fn parse_str(&mut self, source: &str) -> Result<(), ReportParseError> {
        let mut cursor = XmlCursor::new(source);
        let root = cursor.root()?;
        check_element_name(&root, self.category.root_element())?;

        let version = root.attribute("version");
        if version != Some(SUPPORTED_VERSION) {
            return Err(ReportParseError::report(
                format!(
                    "Unknown report version: {}. This parser only handles version {}.",
                    version.unwrap_or("(none)"),
                    SUPPORTED_VERSION
                ),
                root.line,
            ));
        }

        while let Some(file_element) = cursor.next_child(&root)? {
            self.parse_file(&mut cursor, &file_element)?;
        }
        cursor.finish()
    }

    fn parse_file(
        &mut self,
        cursor: &mut XmlCursor<'_>,
        element: &Element,
    ) -> Result<(), ReportParseError> {
        check_element_name(element, "file")?;
        let path = mandatory_attribute(element, "path")?;

        let index = self.index;
        let Some(project_file) = index.resolve(path) else {
            self.unknown.record(path);
            return cursor.skip(element);
        };

        if self.category == ReportCategory::UnitTest && !project_file.is_test() {
            return Err(ReportParseError::report(
                format!(
                    "Line {} of report refers to a file which is not configured as a test file: {}",
                    element.line, path
                ),
                element.line,
            ));
        }

        let category = self.category;
        let entry = self
            .matched
            .entry(project_file.relative_path.clone())
            .or_insert_with(|| MatchedFile {
                file: project_file.clone(),
                data: if category.is_coverage() {
                    FileData::Coverage(FileCoverage::new())
                } else {
                    FileData::Tests(FileTestResults::new())
                },
            });

        match &mut entry.data {
            FileData::Coverage(coverage) => {
                parse_lines_to_cover(cursor, element, &entry.file, coverage)
            }
            FileData::Tests(results) => parse_test_cases(cursor, element, &entry.file, results),
        }
    }

    pub fn matched_files(&self) -> usize {
        self.matched.len()
    }

    pub fn unknown_files(&self) -> usize {
        self.unknown.count()
    }

    pub fn first_unknown_files(&self) -> &[String] {
        self.unknown.sample()
    }

    pub fn stats(&self) -> ParseStats {
        ParseStats {
            matched_files: self.matched_files(),
            unknown_files: self.unknown_files(),
            first_unknown_files: self.first_unknown_files().to_vec(),
        }
    }

    /// Commit the accumulated measures of every matched file.
    ///
    /// Consumes the parser, so a category is saved at most once.
    pub fn save_measures<S: MeasureSink + ?Sized>(self, sink: &mut S) -> ParseStats {
        let stats = self.stats();
        for matched in self.matched.into_values() {
            let measures = match &matched.data {
                FileData::Coverage(coverage) => coverage_measures(self.category, coverage),
                FileData::Tests(results) => test_measures(results),
            };
            sink.save(&matched.file, measures);
        }
        stats
    }
}

fn parse_lines_to_cover(
    cursor: &mut XmlCursor<'_>,
    file_element: &Element,
    file: &ProjectFile,
    coverage: &mut FileCoverage,
) -> Result<(), ReportParseError> {
    while let Some(element) = cursor.next_child(file_element)? {
        check_element_name(&element, "lineToCover")?;

        let line_number = int_attribute(&element, "lineNumber", 1)?;
        if line_number > file.lines as u64 {
            return Err(ReportParseError::report(
                format!(
                    "Line {} is out of range in the file {} (lines: {})",
                    line_number, file.relative_path, file.lines
                ),
                element.line,
            ));
        }
        let covered = bool_attribute(&element, "covered")?;

        let branches = match element.attribute("branchesToCover") {
            Some(_) => int_attribute(&element, "branchesToCover", 0)?,
            None => 0,
        };
        let covered_branches = if branches > 0 {
            let covered_branches = int_attribute(&element, "coveredBranches", 0)?;
            if covered_branches > branches {
                return Err(ReportParseError::report(
                    "Number of covered branches cannot be greater than number of branches to cover",
                    element.line,
                ));
            }
            covered_branches
        } else {
            0
        };

        coverage.record(
            to_u32(line_number, "lineNumber", &element)?,
            covered,
            to_u32(branches, "branchesToCover", &element)?,
            to_u32(covered_branches, "coveredBranches", &element)?,
        );
        cursor.skip(&element)?;
    }
    Ok(())
}

fn parse_test_cases(
    cursor: &mut XmlCursor<'_>,
    file_element: &Element,
    file: &ProjectFile,
    results: &mut FileTestResults,
) -> Result<(), ReportParseError> {
    while let Some(element) = cursor.next_child(file_element)? {
        check_element_name(&element, "testCase")?;

        let name = mandatory_attribute(&element, "name")?.to_string();
        let duration_ms = int_attribute(&element, "duration", 0)?;

        let mut case = TestCase {
            name,
            duration_ms,
            status: TestStatus::Ok,
            message: None,
            stack_trace: None,
        };

        if let Some(outcome) = cursor.next_child(&element)? {
            case.status = TestStatus::from_element(&outcome.name).ok_or_else(|| {
                ReportParseError::report(
                    format!(
                        "Unknown element: {}, expected skipped, failure or error",
                        outcome.name
                    ),
                    outcome.line,
                )
            })?;
            case.message = outcome.attribute("message").map(String::from);
            let text = cursor.text(&outcome)?;
            let text = text.trim();
            if !text.is_empty() {
                case.stack_trace = Some(text.to_string());
            }

            if let Some(extra) = cursor.next_child(&element)? {
                return Err(ReportParseError::report(
                    format!(
                        "Unexpected element: {}, a testCase holds at most one of skipped, failure or error",
                        extra.name
                    ),
                    extra.line,
                ));
            }
        }

        let line = element.line;
        results.try_push(case).map_err(|case| {
            ReportParseError::report(
                format!(
                    "Total duration of test cases in file {} overflows at testCase \"{}\" (duration: {})",
                    file.relative_path, case.name, case.duration_ms
                ),
                line,
            )
        })?;
    }
    Ok(())
}

fn check_element_name(element: &Element, expected: &str) -> Result<(), ReportParseError> {
    if element.name == expected {
        Ok(())
    } else {
        Err(ReportParseError::report(
            format!("Unknown element: {}, expected {}", element.name, expected),
            element.line,
        ))
    }
}

fn mandatory_attribute<'e>(element: &'e Element, name: &str) -> Result<&'e str, ReportParseError> {
    element.attribute(name).ok_or_else(|| {
        ReportParseError::report(
            format!(
                "Missing attribute \"{}\" in element {}",
                name, element.name
            ),
            element.line,
        )
    })
}

fn int_attribute(element: &Element, name: &str, min: u64) -> Result<u64, ReportParseError> {
    let raw = mandatory_attribute(element, name)?;
    let value = raw.trim().parse::<i64>().map_err(|_| {
        ReportParseError::report(
            format!(
                "Expected an integer instead of \"{}\" for attribute \"{}\"",
                raw, name
            ),
            element.line,
        )
    })?;
    if value < min as i64 {
        return Err(ReportParseError::report(
            format!(
                "Value of attribute \"{}\" is \"{}\" but it should be greater than or equal to {}",
                name, value, min
            ),
            element.line,
        ));
    }
    Ok(value as u64)
}

fn bool_attribute(element: &Element, name: &str) -> Result<bool, ReportParseError> {
    let raw = mandatory_attribute(element, name)?;
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ReportParseError::report(
            format!(
                "Expected \"true\" or \"false\" instead of \"{}\" for attribute \"{}\"",
                raw, name
            ),
            element.line,
        )),
    }
}

fn to_u32(value: u64, name: &str, element: &Element) -> Result<u32, ReportParseError> {
    u32::try_from(value).map_err(|_| {
        ReportParseError::report(
            format!("Value of attribute \"{}\" is too large: {}", name, value),
            element.line,
        )
    })
}
