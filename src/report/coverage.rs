//! Per-file line and branch coverage accumulated from coverage reports.

use serde::Serialize;
use std::collections::BTreeMap;

/// Coverage of one source line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineHits {
    /// Number of reports that saw the line executed.
    pub hits: u64,
    pub conditions: u32,
    pub covered_conditions: u32,
}

impl LineHits {
    /// Fold another observation of the same line into this one.
    ///
    /// Hits add up; branch counts keep the largest value seen.
    pub fn merge(&mut self, covered: bool, conditions: u32, covered_conditions: u32) {
        if covered {
            self.hits += 1;
        }
        self.conditions = self.conditions.max(conditions);
        self.covered_conditions = self
            .covered_conditions
            .max(covered_conditions)
            .min(self.conditions);
    }

    pub fn is_covered(&self) -> bool {
        self.hits > 0
    }

    pub fn uncovered_conditions(&self) -> u32 {
        self.conditions - self.covered_conditions
    }
}

/// Line coverage of a single project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileCoverage {
    lines: BTreeMap<u32, LineHits>,
}

impl FileCoverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, line: u32, covered: bool, conditions: u32, covered_conditions: u32) {
        self.lines
            .entry(line)
            .or_default()
            .merge(covered, conditions, covered_conditions);
    }

    pub fn lines(&self) -> &BTreeMap<u32, LineHits> {
        &self.lines
    }

    pub fn lines_to_cover(&self) -> u64 {
        self.lines.len() as u64
    }

    pub fn uncovered_lines(&self) -> u64 {
        self.lines.values().filter(|l| !l.is_covered()).count() as u64
    }

    pub fn conditions_to_cover(&self) -> u64 {
        self.lines.values().map(|l| u64::from(l.conditions)).sum()
    }

    pub fn uncovered_conditions(&self) -> u64 {
        self.lines
            .values()
            .map(|l| u64::from(l.uncovered_conditions()))
            .sum()
    }
}
