//! Project file model.
//!
//! Reports declare files by path. The importer only records data for paths
//! that resolve to a known project file; everything else counts as an
//! unknown file. [`FileIndex`] is the lookup seam, [`ProjectFileIndex`] the
//! implementation backed by a scan of the base directory.

mod index;

pub use index::{IndexOptions, ProjectFileIndex};

use serde::Serialize;
use std::path::PathBuf;

/// Whether a project file holds production code or tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Main,
    Test,
}

/// A file known to the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectFile {
    /// Path relative to the base directory, `/`-separated.
    pub relative_path: String,
    pub absolute_path: PathBuf,
    /// Number of lines; a trailing newline opens one more (empty) line.
    pub lines: usize,
    pub kind: FileKind,
}

impl ProjectFile {
    pub fn is_test(&self) -> bool {
        self.kind == FileKind::Test
    }
}

/// Resolves the path a report declares to a project file.
pub trait FileIndex {
    fn resolve(&self, declared: &str) -> Option<&ProjectFile>;
}
