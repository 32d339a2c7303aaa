use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Terminal,
    /// Summary and saved measures as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "genericcov")]
#[command(about = "Import generic XML coverage and test-execution reports", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import the configured reports and print the saved measures
    Import {
        /// Project base directory; relative report paths resolve against it
        #[arg(long = "base-dir", default_value = ".")]
        base_dir: PathBuf,

        /// Settings file (defaults to the nearest .genericcov.toml)
        #[arg(short, long, env = "GENERICCOV_CONFIG")]
        config: Option<PathBuf>,

        /// Override a setting, e.g. -D genericcoverage.reportPaths=cov.xml
        #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
        defines: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colors
        #[arg(long)]
        plain: bool,

        /// Increase log verbosity (-v: debug, -vv: trace)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,

        /// Only log warnings
        #[arg(short, long, conflicts_with = "verbosity")]
        quiet: bool,
    },

    /// Write a default .genericcov.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
