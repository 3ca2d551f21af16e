use super::{OutputFormat, SelectionArgs};
use crate::cli::Output;
use crate::config::SelectorConfig;
use crate::formats::{Document, DocumentBody, FormatKind, ParseContext, ParseIssue};
use crate::selector::{ClaimedPaths, ResourceSelector};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Fail on the first malformed file instead of reporting it
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct ParseReport<'a> {
    documents: &'a [Document],
    issues: &'a [ParseIssue],
    claimed: usize,
}

pub fn execute(
    args: ParseArgs,
    base_dir: &Path,
    config_path: Option<&Path>,
    output: &Output,
) -> Result<()> {
    let strict = args.strict.then_some(true);
    let config = SelectorConfig::load(base_dir, config_path, &args.selection.overrides(strict))?;
    let selector = ResourceSelector::from_config(&config, base_dir)?;
    let search_dir = args.selection.resolve_search_dir(base_dir)?;

    let mut claimed = ClaimedPaths::new();
    let mut ctx = ParseContext::new(config.strict);
    let documents = selector.select_and_parse(base_dir, &search_dir, &mut claimed, &mut ctx)?;

    match args.format {
        OutputFormat::Json => {
            let report = ParseReport {
                documents: &documents,
                issues: ctx.issues(),
                claimed: claimed.len(),
            };
            output.result(&serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_summary(&documents, claimed.len(), output),
    }

    Ok(())
}

fn print_summary(documents: &[Document], claimed: usize, output: &Output) {
    let mut per_format: BTreeMap<FormatKind, (usize, usize)> = BTreeMap::new();
    for document in documents {
        let (parsed, malformed) = per_format.entry(document.format).or_default();
        if document.is_malformed() {
            *malformed += 1;
        } else {
            *parsed += 1;
        }
    }

    output.header("Parsed resources");
    for (format, (parsed, malformed)) in &per_format {
        let summary = if *malformed > 0 {
            format!("{parsed} parsed, {malformed} malformed")
        } else {
            format!("{parsed} parsed")
        };
        output.table_row(format.as_str(), &summary);
    }

    for document in documents {
        if let DocumentBody::Malformed { message } = &document.body {
            output.warning(&format!("{}: {}", document.source_path, message));
        }
        output.verbose(&format!("{} ({} bytes)", document.source_path, document.size_bytes));
    }

    output.success(&format!(
        "{} documents parsed, {} paths claimed",
        documents.len(),
        claimed
    ));
}
