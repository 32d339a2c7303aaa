//! Report path handling.
//!
//! Report locations arrive as comma-separated configuration values. This
//! module turns those values into ordered path lists and anchors relative
//! entries at the project base directory. Both functions are pure: existence
//! checks belong to the caller.

use std::path::{Path, PathBuf};

/// Split a comma-separated path list.
///
/// Segments are trimmed and empty segments dropped; the remaining order is
/// preserved. An absent value yields an empty list.
///
/// # Example
///
/// ```rust
/// use genericcov::paths::split_path_list;
///
/// assert_eq!(
///     split_path_list(Some(" a.xml, ,b.xml ,")),
///     vec!["a.xml".to_string(), "b.xml".to_string()]
/// );
/// assert!(split_path_list(None).is_empty());
/// ```
pub fn split_path_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Anchor `path` at `base_dir` unless it is already absolute.
pub fn to_absolute(path: &str, base_dir: &Path) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    }
}
