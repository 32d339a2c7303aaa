//! Generic coverage and test-execution reports.
//!
//! # Module Structure
//!
//! - [`category`] - The four report kinds and their keys, labels and roots
//! - [`coverage`] - Per-file line/branch accumulation (pure)
//! - [`unit_test`] - Per-file test-case accumulation (pure)
//! - [`stats`] - Matched/unknown file statistics
//! - `xml` - Streaming element cursor with line tracking
//! - [`parser`] - Grammar validation and accumulation (I/O boundary)
//!
//! # Report Grammar
//!
//! ```text
//! <coverage version="1">
//!   <file path="src/lib.rs">
//!     <lineToCover lineNumber="3" covered="true" branchesToCover="2" coveredBranches="1"/>
//!   </file>
//! </coverage>
//!
//! <unitTest version="1">
//!   <file path="tests/lib_test.rs">
//!     <testCase name="works" duration="5"/>
//!     <testCase name="breaks" duration="7"><failure message="boom">trace</failure></testCase>
//!   </file>
//! </unitTest>
//! ```

pub mod category;
pub mod coverage;
pub mod parser;
pub mod stats;
mod xml;

pub use category::ReportCategory;
pub use coverage::{FileCoverage, LineHits};
pub use parser::ReportParser;
pub use stats::{ParseStats, MAX_UNKNOWN_FILE_SAMPLE};
pub use unit_test::{FileTestResults, TestCase, TestStatus};
