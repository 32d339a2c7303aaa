//! CLI command implementations.
//!
//! - **import**: load the configured coverage and test reports
//! - **init**: write a default `.genericcov.toml`

pub mod import;
pub mod init;

pub use import::{build_settings, handle_import, run_import, ImportConfig, ImportOutcome};
pub use init::init_config;
