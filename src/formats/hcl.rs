use super::lexical::{DepthCursor, check_balanced, mask};
use super::{Document, FormatKind, ParseContext, ResourceFormat, parse_batch};
use anyhow::Result;
use regex::Regex;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*([A-Za-z_][\w-]*)((?:[ \t]+(?:"[^"\n]*"|[A-Za-z_][\w-]*))*)[ \t]*\{"#)
        .expect("valid regex")
});
static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"\n]*)"|([A-Za-z_][\w-]*)"#).expect("valid regex")
});
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*([A-Za-z_][\w-]*)[ \t]*=[^=]").expect("valid regex")
});

/// HCL / Terraform configuration
///
/// Lists top-level blocks with their labels and top-level attribute names.
pub struct HclFormat;

impl ResourceFormat for HclFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::Hcl
    }

    fn parse(
        &self,
        paths: &[PathBuf],
        base_dir: &Path,
        ctx: &mut ParseContext,
    ) -> Result<Vec<Document>> {
        parse_batch(self.kind(), paths, base_dir, ctx, describe)
    }
}

fn describe(text: &str) -> Result<Value> {
    let masked = mask(text, true)?;
    check_balanced(&masked.structure)?;

    let mut cursor = DepthCursor::new(&masked.structure);
    let mut blocks = Vec::new();
    for caps in BLOCK.captures_iter(&masked.code) {
        let Some(whole) = caps.get(0) else { continue };
        if cursor.depth_at(whole.start()) != 0 {
            continue;
        }
        let labels: Vec<&str> = LABEL
            .captures_iter(&caps[2])
            .filter_map(|label| label.get(1).or_else(|| label.get(2)))
            .map(|label| label.as_str())
            .collect();
        blocks.push(json!({ "type": &caps[1], "labels": labels }));
    }

    let mut cursor = DepthCursor::new(&masked.structure);
    let attributes: Vec<&str> = ATTRIBUTE
        .captures_iter(&masked.structure)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            (cursor.depth_at(whole.start()) == 0).then(|| caps.get(1))?
        })
        .map(|name| name.as_str())
        .collect();

    Ok(json!({
        "blocks": blocks,
        "attributes": attributes,
    }))
}
