use serde::Serialize;
use std::collections::BTreeMap;

use super::{FileMeasures, MeasureSink, MeasureValue};
use crate::project::ProjectFile;
use crate::report::TestCase;

/// Everything saved for one project file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoredFile {
    pub measures: BTreeMap<String, MeasureValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test_cases: Vec<TestCase>,
}

/// Measure sink keeping saved measures in memory, keyed by relative path.
///
/// Saving a metric that already exists replaces it, so importing the same
/// reports twice leaves the store unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct InMemoryMeasureStore {
    files: BTreeMap<String, StoredFile>,
}

impl InMemoryMeasureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self, relative_path: &str) -> Option<&StoredFile> {
        self.files.get(relative_path)
    }

    pub fn measure(&self, relative_path: &str, key: &str) -> Option<&MeasureValue> {
        self.file(relative_path)?.measures.get(key)
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &StoredFile)> {
        self.files.iter().map(|(path, file)| (path.as_str(), file))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl MeasureSink for InMemoryMeasureStore {
    fn save(&mut self, file: &ProjectFile, measures: FileMeasures) {
        let stored = self.files.entry(file.relative_path.clone()).or_default();
        stored.measures.extend(measures.values);
        if !measures.test_cases.is_empty() {
            stored.test_cases = measures.test_cases;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::FileKind;
    use std::path::PathBuf;

    fn project_file(path: &str) -> ProjectFile {
        ProjectFile {
            relative_path: path.to_string(),
            absolute_path: PathBuf::from("/p").join(path),
            lines: 10,
            kind: FileKind::Main,
        }
    }

    fn measures(pairs: &[(&str, u64)]) -> FileMeasures {
        let mut measures = FileMeasures::default();
        for (key, value) in pairs {
            measures.insert(*key, MeasureValue::Int(*value));
        }
        measures
    }

    #[test]
    fn test_save_merges_keys_per_file() {
        let mut store = InMemoryMeasureStore::new();
        let file = project_file("src/a.rs");

        store.save(&file, measures(&[("lines_to_cover", 4)]));
        store.save(&file, measures(&[("it_lines_to_cover", 2)]));

        assert_eq!(store.len(), 1);
        assert_eq!(store.measure("src/a.rs", "lines_to_cover"), Some(&MeasureValue::Int(4)));
        assert_eq!(store.measure("src/a.rs", "it_lines_to_cover"), Some(&MeasureValue::Int(2)));
    }

    #[test]
    fn test_save_replaces_existing_values() {
        let mut store = InMemoryMeasureStore::new();
        let file = project_file("src/a.rs");

        store.save(&file, measures(&[("uncovered_lines", 4)]));
        store.save(&file, measures(&[("uncovered_lines", 1)]));

        assert_eq!(store.measure("src/a.rs", "uncovered_lines"), Some(&MeasureValue::Int(1)));
        assert!(store.measure("src/b.rs", "uncovered_lines").is_none());
    }
}
