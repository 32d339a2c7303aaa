use anyhow::Result;
use clap::Parser;
use genericcov::cli::{Cli, Commands};
use genericcov::commands::{handle_import, init_config, ImportConfig};
use genericcov::observability::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            base_dir,
            config,
            defines,
            format,
            output,
            plain,
            verbosity,
            quiet,
        } => {
            init_logging(verbosity, quiet)?;
            if plain {
                colored::control::set_override(false);
            }
            handle_import(ImportConfig {
                base_dir,
                config,
                defines,
                format,
                output,
            })
        }
        Commands::Init { force } => {
            init_logging(0, false)?;
            init_config(force)
        }
    }
}
