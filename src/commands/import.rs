//! `genericcov import`: load the configured reports and emit the result.
//!
//! Settings and the project index are built first, then the loader runs
//! once and the outcome is rendered. A report that cannot be parsed fails
//! the command; a missing report only ends the import early.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::OutputFormat;
use crate::config::{load_settings, parse_override, should_run, Settings};
use crate::loader::{ImportSummary, ReportLoader};
use crate::measures::InMemoryMeasureStore;
use crate::output::{render_json, render_terminal, ImportReport};
use crate::project::{IndexOptions, ProjectFileIndex};

#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub base_dir: PathBuf,
    pub config: Option<PathBuf>,
    pub defines: Vec<String>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Result of a completed import, before rendering.
#[derive(Debug)]
pub struct ImportOutcome {
    pub base_dir: PathBuf,
    pub summary: ImportSummary,
    pub store: InMemoryMeasureStore,
}

/// Settings file overlaid with `KEY=VALUE` defines.
pub fn build_settings(base_dir: &Path, config: Option<&Path>, defines: &[String]) -> Result<Settings> {
    let file_settings = load_settings(base_dir, config)?;
    let overrides = defines
        .iter()
        .map(|raw| parse_override(raw))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(file_settings.merge(Settings::from_pairs(overrides)))
}

/// Run the import against `base_dir` with an already-built settings snapshot.
pub fn run_import(base_dir: &Path, settings: &Settings) -> Result<ImportOutcome> {
    let options = IndexOptions::from_settings(settings)?;
    let index = ProjectFileIndex::scan(base_dir, &options)
        .with_context(|| format!("Failed to index project files under {}", base_dir.display()))?;

    let mut store = InMemoryMeasureStore::new();
    let summary = ReportLoader::new(&index, &mut store).run(settings, base_dir)?;

    Ok(ImportOutcome {
        base_dir: base_dir.to_path_buf(),
        summary,
        store,
    })
}

pub fn handle_import(config: ImportConfig) -> Result<()> {
    let base_dir = config
        .base_dir
        .canonicalize()
        .with_context(|| format!("Base directory not found: {}", config.base_dir.display()))?;

    let settings = build_settings(&base_dir, config.config.as_deref(), &config.defines)?;
    if !should_run(&settings) {
        info!("No report paths configured, nothing to import");
        return Ok(());
    }

    let outcome = run_import(&base_dir, &settings)?;
    let report = ImportReport {
        base_dir: &outcome.base_dir,
        summary: &outcome.summary,
        files: &outcome.store,
    };
    let rendered = match config.format {
        OutputFormat::Terminal => render_terminal(&report)?,
        OutputFormat::Json => render_json(&report)?,
    };

    match config.output {
        Some(path) => fs::write(&path, rendered)
            .with_context(|| format!("Failed to write output to {}", path.display()))?,
        None => println!("{}", rendered),
    }
    Ok(())
}
