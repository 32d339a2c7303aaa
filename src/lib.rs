// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod loader;
pub mod measures;
pub mod observability;
pub mod output;
pub mod paths;
pub mod project;
pub mod report;

// Re-export commonly used types
pub use crate::config::{should_run, Settings};
pub use crate::errors::{ImportError, ReportParseError};
pub use crate::loader::{CategoryStatus, ImportSummary, LoadResult, Notice, ReportLoader};
pub use crate::measures::{FileMeasures, InMemoryMeasureStore, MeasureSink, MeasureValue};
pub use crate::project::{FileIndex, FileKind, ProjectFile, ProjectFileIndex};
pub use crate::report::{ParseStats, ReportCategory, ReportParser};
