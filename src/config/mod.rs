//! Settings snapshot and its sources.
//!
//! An import run reads every option from a flat [`Settings`] snapshot. The
//! snapshot is built from the nearest `.genericcov.toml` (nested tables
//! flatten into dotted keys) overlaid with `-D KEY=VALUE` command-line
//! overrides. Key names live in [`keys`].

pub mod keys;
mod loader;
mod settings;

pub use loader::{
    directory_ancestors, discover_config, load_settings, load_settings_file, parse_override,
    parse_settings, ConfigError, CONFIG_FILE_NAME,
};
pub use settings::Settings;

/// Whether any report key carries a value.
///
/// A run with nothing configured has nothing to import.
pub fn should_run(settings: &Settings) -> bool {
    keys::REPORT_KEYS.iter().any(|key| settings.has(key))
}
