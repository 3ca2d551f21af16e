use super::{Document, FormatKind, ParseContext, ResourceFormat, parse_batch};
use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// JSON documents, parsed into a `serde_json::Value`
pub struct JsonFormat;

impl ResourceFormat for JsonFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::Json
    }

    fn parse(
        &self,
        paths: &[PathBuf],
        base_dir: &Path,
        ctx: &mut ParseContext,
    ) -> Result<Vec<Document>> {
        parse_batch(self.kind(), paths, base_dir, ctx, |text| {
            Ok(serde_json::from_str::<Value>(text)?)
        })
    }
}
