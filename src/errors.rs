//! Error types for report parsing and import runs.
//!
//! Two layers exist:
//!
//! - [`ReportParseError`] is raised by the report parser for a single file. It
//!   knows the line inside the document but nothing about where the file came
//!   from.
//! - [`ImportError`] is what an import run surfaces to its caller. It wraps a
//!   parse failure with the report category label and the absolute report
//!   path so the message can stand on its own.
//!
//! A missing report file is not an error at either layer: the loader turns it
//! into a skip decision (see [`crate::loader`]).

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while parsing one report document.
#[derive(Debug, Error)]
pub enum ReportParseError {
    /// The document is not well-formed XML.
    #[error("{message}")]
    MalformedStream {
        message: String,
        line: Option<usize>,
    },

    /// The document is well-formed but violates the report schema.
    #[error("{message}")]
    MalformedReport { message: String, line: usize },

    /// The report could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ReportParseError {
    pub fn stream(message: impl Into<String>, line: Option<usize>) -> Self {
        Self::MalformedStream {
            message: message.into(),
            line,
        }
    }

    pub fn report(message: impl Into<String>, line: usize) -> Self {
        Self::MalformedReport {
            message: message.into(),
            line,
        }
    }

    /// 1-based line of the failure inside the document, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedStream { line, .. } => *line,
            Self::MalformedReport { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}

/// Fatal failure of an import run.
///
/// Every variant names the category label and the absolute report path.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The report is not well-formed XML.
    #[error("Cannot parse {category} report {}{}: {message}", .path.display(), line_suffix(.line))]
    MalformedStream {
        category: &'static str,
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    /// The report violates the schema at a known line.
    #[error("Error at line {line} of {category} report {}: {message}", .path.display())]
    MalformedReport {
        category: &'static str,
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The report exists but could not be read.
    #[error("Cannot read {category} report {}", .path.display())]
    Unreadable {
        category: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ImportError {
    /// Attach category and path context to a parse failure.
    pub fn from_parse(category: &'static str, path: &Path, error: ReportParseError) -> Self {
        let path = path.to_path_buf();
        match error {
            ReportParseError::MalformedStream { message, line } => Self::MalformedStream {
                category,
                path,
                line,
                message,
            },
            ReportParseError::MalformedReport { message, line } => Self::MalformedReport {
                category,
                path,
                line,
                message,
            },
            ReportParseError::Io(source) => Self::Unreadable {
                category,
                path,
                source,
            },
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::MalformedStream { category, .. }
            | Self::MalformedReport { category, .. }
            | Self::Unreadable { category, .. } => category,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::MalformedStream { path, .. }
            | Self::MalformedReport { path, .. }
            | Self::Unreadable { path, .. } => path,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedStream { line, .. } => *line,
            Self::MalformedReport { line, .. } => Some(*line),
            Self::Unreadable { .. } => None,
        }
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" (line {})", l)).unwrap_or_default()
}
