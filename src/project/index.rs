use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use super::{FileIndex, FileKind, ProjectFile};
use crate::config::{keys, Settings};
use crate::paths::split_path_list;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Classification and exclusion rules for a scan.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    test_patterns: Vec<Pattern>,
    exclusions: Vec<Pattern>,
}

impl IndexOptions {
    pub fn new(test_patterns: &[String], exclusions: &[String]) -> Result<Self> {
        Ok(Self {
            test_patterns: compile_patterns(test_patterns)?,
            exclusions: compile_patterns(exclusions)?,
        })
    }

    /// Read `project.testPatterns` and `project.exclusions`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let test_patterns = match settings.get(keys::TEST_PATTERNS) {
            Some(value) => split_path_list(Some(value)),
            None => split_path_list(Some(keys::DEFAULT_TEST_PATTERNS)),
        };
        let exclusions = settings.get_list(keys::EXCLUSIONS);
        Self::new(&test_patterns, &exclusions)
    }

    pub fn classify(&self, relative_path: &str) -> FileKind {
        if matches_any(&self.test_patterns, relative_path) {
            FileKind::Test
        } else {
            FileKind::Main
        }
    }

    pub fn is_excluded(&self, relative_path: &str) -> bool {
        matches_any(&self.exclusions, relative_path)
    }
}

fn compile_patterns(raw: &[String]) -> Result<Vec<Pattern>> {
    raw.iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid glob pattern: {}", p)))
        .collect()
}

fn matches_any(patterns: &[Pattern], path: &str) -> bool {
    patterns.iter().any(|p| p.matches_with(path, GLOB_OPTIONS))
}

/// Project files keyed by their base-relative path.
#[derive(Debug, Clone, Default)]
pub struct ProjectFileIndex {
    base_dir: PathBuf,
    files: HashMap<String, ProjectFile>,
}

impl ProjectFileIndex {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            files: HashMap::new(),
        }
    }

    pub fn from_files(base_dir: impl Into<PathBuf>, files: Vec<ProjectFile>) -> Self {
        let mut index = Self::new(base_dir);
        for file in files {
            index.insert(file);
        }
        index
    }

    pub fn insert(&mut self, file: ProjectFile) {
        self.files.insert(file.relative_path.clone(), file);
    }

    /// Walk `base_dir`, honouring `.gitignore`, and index every regular file.
    ///
    /// Entries that cannot be listed or read are logged and left out of the
    /// index; reports naming them see an unknown file.
    pub fn scan(base_dir: &Path, options: &IndexOptions) -> Result<Self> {
        let mut index = Self::new(base_dir);
        let walker = WalkBuilder::new(base_dir).git_ignore(true).build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable project entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(relative_path) = relative_key(base_dir, path) else {
                continue;
            };
            if options.is_excluded(&relative_path) {
                tracing::trace!("Excluded {}", relative_path);
                continue;
            }

            let lines = match count_lines(path) {
                Ok(lines) => lines,
                Err(e) => {
                    tracing::warn!("Skipping project file {}: {:#}", relative_path, e);
                    continue;
                }
            };
            let kind = options.classify(&relative_path);
            index.insert(ProjectFile {
                relative_path,
                absolute_path: path.to_path_buf(),
                lines,
                kind,
            });
        }

        tracing::debug!(
            "Indexed {} project files under {}",
            index.len(),
            base_dir.display()
        );
        Ok(index)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = &ProjectFile> {
        self.files.values()
    }
}

impl FileIndex for ProjectFileIndex {
    fn resolve(&self, declared: &str) -> Option<&ProjectFile> {
        let declared_path = Path::new(declared);
        let key = if declared_path.is_absolute() {
            relative_key(&self.base_dir, declared_path)?
        } else {
            normalize_relative(declared)
        };
        self.files.get(&key)
    }
}

/// `/`-separated path of `path` relative to `base`, if it lies under it.
fn relative_key(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn normalize_relative(declared: &str) -> String {
    let mut normalized = declared.replace('\\', "/");
    while let Some(rest) = normalized.strip_prefix("./") {
        normalized = rest.to_string();
    }
    normalized
}

/// Count lines the way reports number them: every newline starts a line.
fn count_lines(path: &Path) -> Result<usize> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(bytes.iter().filter(|&&b| b == b'\n').count() + 1)
}
