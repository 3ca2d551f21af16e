use super::{Document, FormatKind, ParseContext, ResourceFormat, parse_batch};
use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// YAML streams; every `---` separated document becomes one array element
pub struct YamlFormat;

impl ResourceFormat for YamlFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::Yaml
    }

    fn parse(
        &self,
        paths: &[PathBuf],
        base_dir: &Path,
        ctx: &mut ParseContext,
    ) -> Result<Vec<Document>> {
        parse_batch(self.kind(), paths, base_dir, ctx, parse_stream)
    }
}

fn parse_stream(text: &str) -> Result<Value> {
    let mut documents = Vec::new();
    for document in serde_yml::Deserializer::from_str(text) {
        documents.push(Value::deserialize(document)?);
    }
    Ok(Value::Array(documents))
}
