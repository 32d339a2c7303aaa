use serde::Serialize;
use std::collections::HashSet;

/// How many unknown file names a summary keeps.
pub const MAX_UNKNOWN_FILE_SAMPLE: usize = 5;

/// Match statistics of one category's reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Distinct project files that received data.
    pub matched_files: usize,
    /// `<file>` entries with no project file; a path repeated within or
    /// across reports counts each time.
    pub unknown_files: usize,
    /// The first distinct unknown paths, in the order they were seen.
    pub first_unknown_files: Vec<String>,
}

/// Tracks report paths that did not resolve to a project file.
#[derive(Debug, Clone, Default)]
pub(crate) struct UnknownFiles {
    occurrences: usize,
    sampled: HashSet<String>,
    sample: Vec<String>,
}

impl UnknownFiles {
    pub fn record(&mut self, path: &str) {
        self.occurrences += 1;
        if self.sample.len() < MAX_UNKNOWN_FILE_SAMPLE && self.sampled.insert(path.to_string()) {
            self.sample.push(path.to_string());
        }
    }

    pub fn count(&self) -> usize {
        self.occurrences
    }

    pub fn sample(&self) -> &[String] {
        &self.sample
    }
}
