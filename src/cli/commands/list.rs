use super::{OutputFormat, SelectionArgs, display_path};
use crate::cli::Output;
use crate::config::SelectorConfig;
use crate::selector::ResourceSelector;
use anyhow::Result;
use clap::Args;
use std::path::Path;

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn execute(
    args: ListArgs,
    base_dir: &Path,
    config_path: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let config = SelectorConfig::load(base_dir, config_path, &args.selection.overrides(None))?;
    let selector = ResourceSelector::from_config(&config, base_dir)?;
    let search_dir = args.selection.resolve_search_dir(base_dir)?;

    let paths: Vec<String> = selector
        .enumerate(base_dir, &search_dir)?
        .iter()
        .map(|path| display_path(base_dir, path))
        .collect();

    match args.format {
        OutputFormat::Text => {
            for path in &paths {
                output.result(path);
            }
        }
        OutputFormat::Json => output.result(&serde_json::to_string_pretty(&paths)?),
    }

    output.verbose(&format!(
        "{} resource files under {}",
        paths.len(),
        search_dir.display()
    ));
    Ok(())
}
