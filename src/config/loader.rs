use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml::{Table, Value};

use super::settings::Settings;

pub const CONFIG_FILE_NAME: &str = ".genericcov.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Errors while building a settings snapshot.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Unsupported value for \"{key}\" in {}: {kind} values cannot be used as settings", .path.display())]
    UnsupportedValue {
        path: PathBuf,
        key: String,
        kind: &'static str,
    },

    #[error("Invalid setting override \"{0}\", expected KEY=VALUE")]
    InvalidOverride(String),
}

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse TOML contents into a flat settings snapshot.
///
/// Nested tables become dotted keys, string arrays are joined with commas
/// and other scalars are stringified.
pub fn parse_settings(contents: &str, origin: &Path) -> Result<Settings, ConfigError> {
    let table = toml::from_str::<Table>(contents).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    let mut settings = Settings::new();
    flatten_table("", &table, origin, &mut settings)?;
    Ok(settings)
}

fn flatten_table(
    prefix: &str,
    table: &Table,
    origin: &Path,
    settings: &mut Settings,
) -> Result<(), ConfigError> {
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };

        match value {
            Value::Table(nested) => flatten_table(&key, nested, origin, settings)?,
            Value::Array(items) => {
                let joined = items
                    .iter()
                    .map(|item| scalar_to_string(item, &key, origin))
                    .collect::<Result<Vec<_>, _>>()?
                    .join(",");
                settings.set(key, joined);
            }
            scalar => {
                let text = scalar_to_string(scalar, &key, origin)?;
                settings.set(key, text);
            }
        }
    }
    Ok(())
}

fn scalar_to_string(value: &Value, key: &str, origin: &Path) -> Result<String, ConfigError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(d) => Ok(d.to_string()),
        Value::Array(_) => Err(unsupported(key, "nested array", origin)),
        Value::Table(_) => Err(unsupported(key, "inline table", origin)),
    }
}

fn unsupported(key: &str, kind: &'static str, origin: &Path) -> ConfigError {
    ConfigError::UnsupportedValue {
        path: origin.to_path_buf(),
        key: key.to_string(),
        kind,
    }
}

/// Read and flatten a settings file.
pub fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    let contents = read_config_file(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = parse_settings(&contents, path)?;
    tracing::debug!(
        "Loaded {} settings from {}",
        settings.len(),
        path.display()
    );
    Ok(settings)
}

/// Generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest config file at or above `start`.
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Build the settings snapshot for a run.
///
/// An explicit config path must exist. Without one, the nearest
/// `.genericcov.toml` at or above `base_dir` is used, falling back to empty
/// settings.
pub fn load_settings(base_dir: &Path, explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    if let Some(path) = explicit {
        return load_settings_file(path);
    }

    match discover_config(base_dir) {
        Some(path) => load_settings_file(&path),
        None => {
            tracing::debug!(
                "No {} found after checking {} directories. Using empty settings.",
                CONFIG_FILE_NAME,
                MAX_TRAVERSAL_DEPTH
            );
            Ok(Settings::new())
        }
    }
}

/// Parse a `KEY=VALUE` command-line override.
pub fn parse_override(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidOverride(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_parse_settings_flattens_tables() {
        let contents = indoc! {r#"
            [genericcoverage]
            reportPaths = "a.xml, b.xml"
            itReportPaths = ["it1.xml", "it2.xml"]

            [project]
            testPatterns = "**/tests/**"
        "#};

        let settings = parse_settings(contents, Path::new("cfg.toml")).unwrap();

        assert_eq!(settings.get("genericcoverage.reportPaths"), Some("a.xml, b.xml"));
        assert_eq!(
            settings.get("genericcoverage.itReportPaths"),
            Some("it1.xml,it2.xml")
        );
        assert_eq!(settings.get("project.testPatterns"), Some("**/tests/**"));
    }

    #[test]
    fn test_parse_settings_accepts_quoted_dotted_keys() {
        let contents = r#""genericcoverage.reportPath" = "legacy.xml""#;

        let settings = parse_settings(contents, Path::new("cfg.toml")).unwrap();

        assert_eq!(settings.get("genericcoverage.reportPath"), Some("legacy.xml"));
    }

    #[test]
    fn test_parse_settings_stringifies_scalars() {
        let settings = parse_settings("a = 3\nb = true\n", Path::new("cfg.toml")).unwrap();
        assert_eq!(settings.get("a"), Some("3"));
        assert_eq!(settings.get("b"), Some("true"));
    }

    #[test]
    fn test_parse_settings_rejects_nested_arrays() {
        let err = parse_settings("a = [[\"x\"]]\n", Path::new("cfg.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedValue { .. }));
    }

    #[test]
    fn test_parse_settings_reports_invalid_toml() {
        let err = parse_settings("not toml = = =", Path::new("cfg.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("cfg.toml"));
    }

    #[test]
    fn test_load_settings_discovers_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("module").join("sub");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[genericcoverage]\nreportPaths = \"cov.xml\"\n",
        )
        .unwrap();

        let settings = load_settings(&nested, None).unwrap();

        assert_eq!(settings.get("genericcoverage.reportPaths"), Some("cov.xml"));
    }

    #[test]
    fn test_load_settings_explicit_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = load_settings(dir.path(), Some(&missing)).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let ancestors: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(ancestors, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("genericcoverage.reportPaths=a.xml,b.xml").unwrap(),
            (
                "genericcoverage.reportPaths".to_string(),
                "a.xml,b.xml".to_string()
            )
        );
        assert_eq!(
            parse_override("key=").unwrap(),
            ("key".to_string(), String::new())
        );
        assert!(parse_override("novalue").is_err());
        assert!(parse_override("=value").is_err());
    }
}
