use super::OutputFormat;
use crate::cli::Output;
use crate::config::{ConfigOverrides, SelectorConfig};
use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Output format (text prints TOML)
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn execute(
    args: ConfigArgs,
    base_dir: &Path,
    config_path: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let config = SelectorConfig::load(base_dir, config_path, &ConfigOverrides::default())?;

    let rendered = match args.format {
        OutputFormat::Text => {
            toml::to_string_pretty(&config).context("Failed to render configuration as TOML")?
        }
        OutputFormat::Json => serde_json::to_string_pretty(&config)?,
    };
    output.result(rendered.trim_end());

    match config_path {
        Some(path) => output.verbose(&format!("Loaded from {}", path.display())),
        None => output.verbose(&format!("Resolved for {}", base_dir.display())),
    }
    Ok(())
}
