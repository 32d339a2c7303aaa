use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::CONFIG_FILE_NAME;

const DEFAULT_CONFIG: &str = r#"# genericcov configuration
#
# Report paths are comma-separated and resolve against the project base
# directory unless absolute. Categories left empty are skipped.

[genericcoverage]
reportPaths = ""
itReportPaths = ""
overallReportPaths = ""
unitTestReportPaths = ""

[project]
testPatterns = ["**/test/**", "**/tests/**", "**/*_test.*", "**/*Test.*", "**/test_*"]
exclusions = ["target/**", "node_modules/**"]
"#;

pub fn init_config(force: bool) -> Result<()> {
    let path = write_default_config(Path::new("."), force)?;
    println!("Created {} configuration file", path.display());
    Ok(())
}

/// Write the default settings file into `dir`.
pub fn write_default_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(config_path)
}
