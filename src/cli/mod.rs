//! Command-line interface for resource-selector
//!
//! Parses arguments with clap, sets up logging from the verbosity flags, and
//! dispatches to the command implementations in [`commands`].

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod commands;
mod output;

pub use output::Output;

#[derive(Parser)]
#[command(
    name = "resource-selector",
    version = env!("CARGO_PKG_VERSION"),
    about = "Find and parse resource files in a project tree",
    long_about = "resource-selector walks a project tree, picks out JSON, XML, YAML, properties, \
                  protobuf and HCL files while skipping build output, excluded globs, subprojects \
                  and oversized files, and parses what is left."
)]
pub struct Cli {
    /// Base directory (defaults to the current working directory)
    #[arg(short = 'C', long = "directory", value_name = "DIR", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the files that would be parsed, grouped by format
    List(commands::list::ListArgs),
    /// Select and parse resource files
    Parse(commands::parse::ParseArgs),
    /// Show the effective configuration
    Config(commands::config::ConfigArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let base_dir = resolve_base_dir(self.directory.as_deref())?;
        let output = Output::new(self.verbose > 0, self.quiet);
        let config_path = self.config.as_deref();
        tracing::debug!("Base directory: {}", base_dir.display());

        match self.command {
            Commands::List(args) => commands::list::execute(args, &base_dir, config_path, &output),
            Commands::Parse(args) => {
                commands::parse::execute(args, &base_dir, config_path, &output)
            }
            Commands::Config(args) => {
                commands::config::execute(args, &base_dir, config_path, &output)
            }
        }
    }
}

fn resolve_base_dir(directory: Option<&Path>) -> Result<PathBuf> {
    let dir = match directory {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    dir.canonicalize()
        .with_context(|| format!("Base directory not found: {}", dir.display()))
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
