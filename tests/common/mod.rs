// Test utility module for genericcov integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use genericcov::commands::{run_import, ImportOutcome};
use genericcov::config::Settings;
use genericcov::errors::ImportError;

/// A throwaway project directory with source files and reports.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> &Self {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(path, contents).expect("write fixture file");
        self
    }

    /// A source file with `lines` lines.
    pub fn source(&self, relative: &str, lines: usize) -> &Self {
        let contents = (1..lines).map(|n| format!("line {}\n", n)).collect::<String>()
            + &format!("line {}", lines);
        self.write(relative, &contents)
    }

    pub fn import(&self, settings: &Settings) -> ImportOutcome {
        run_import(self.path(), settings).expect("import should succeed")
    }

    pub fn import_err(&self, settings: &Settings) -> ImportError {
        let err = run_import(self.path(), settings).expect_err("import should fail");
        err.downcast::<ImportError>()
            .expect("failure should be an ImportError")
    }
}

/// `<coverage>` document with one `<file>` per entry; each entry lists
/// `(line, covered)` pairs.
pub fn coverage_report(files: &[(&str, &[(u32, bool)])]) -> String {
    let mut xml = String::from("<coverage version=\"1\">\n");
    for (path, lines) in files {
        xml.push_str(&format!("  <file path=\"{}\">\n", path));
        for (line, covered) in *lines {
            xml.push_str(&format!(
                "    <lineToCover lineNumber=\"{}\" covered=\"{}\"/>\n",
                line, covered
            ));
        }
        xml.push_str("  </file>\n");
    }
    xml.push_str("</coverage>\n");
    xml
}
