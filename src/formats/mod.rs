//! Resource formats
//!
//! A format is a recognizer and a parser behind one trait. The selector only
//! ever asks two questions of it: "is this path yours?" and "turn this batch of
//! paths into documents". Built-in formats extract enough structure to confirm
//! a file is well formed and to describe its top-level shape.

mod document;
mod hcl;
mod json;
mod lexical;
mod properties;
mod proto;
mod registry;
mod xml;
mod yaml;

pub use document::{Document, DocumentBody, ParseContext, ParseIssue};
pub use hcl::HclFormat;
pub use json::JsonFormat;
pub use properties::PropertiesFormat;
pub use proto::ProtoFormat;
pub use registry::FormatRegistry;
pub use xml::XmlFormat;
pub use yaml::YamlFormat;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// Core trait that all resource formats implement
pub trait ResourceFormat: Send + Sync {
    /// Which format this is
    fn kind(&self) -> FormatKind;

    /// Whether this format claims responsibility for `path`
    ///
    /// Must be a pure function of the path. The default matches the file
    /// extension case-insensitively against [`FormatKind::extensions`].
    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.kind()
                    .extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }

    /// Parse a batch of selected paths into documents
    ///
    /// # Arguments
    /// * `paths` - Files chosen by the selector, in walk order
    /// * `base_dir` - Directory document source paths are made relative to
    /// * `ctx` - Shared context collecting non-fatal issues
    fn parse(&self, paths: &[PathBuf], base_dir: &Path, ctx: &mut ParseContext)
    -> Result<Vec<Document>>;
}

/// The supported resource formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Json,
    Xml,
    Yaml,
    Properties,
    Protobuf,
    Hcl,
}

impl FormatKind {
    /// File extensions (without dot) recognized for this format
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FormatKind::Json => &["json"],
            FormatKind::Xml => &[
                "xml", "xsd", "xsl", "xslt", "wsdl", "xhtml", "xmi", "tld", "xjb", "jsp",
            ],
            FormatKind::Yaml => &["yaml", "yml"],
            FormatKind::Properties => &["properties"],
            FormatKind::Protobuf => &["proto"],
            FormatKind::Hcl => &["tf", "tfvars", "hcl"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormatKind::Json => "json",
            FormatKind::Xml => "xml",
            FormatKind::Yaml => "yaml",
            FormatKind::Properties => "properties",
            FormatKind::Protobuf => "protobuf",
            FormatKind::Hcl => "hcl",
        }
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read and parse each path in turn with a text-level parser
///
/// Read failures are always fatal. Content the parser rejects is fatal only
/// when the context is strict; otherwise it becomes a `Malformed` document and
/// an issue on the context.
pub(crate) fn parse_batch<F>(
    kind: FormatKind,
    paths: &[PathBuf],
    base_dir: &Path,
    ctx: &mut ParseContext,
    parse_text: F,
) -> Result<Vec<Document>>
where
    F: Fn(&str) -> Result<Value>,
{
    let mut documents = Vec::with_capacity(paths.len());

    for path in paths {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read {} file: {}", kind, path.display()))?;
        let size_bytes = bytes.len() as u64;

        let parsed = std::str::from_utf8(&bytes)
            .context("content is not valid UTF-8")
            .and_then(|text| parse_text(text.strip_prefix('\u{feff}').unwrap_or(text)));

        let body = match parsed {
            Ok(value) => DocumentBody::Parsed { value },
            Err(e) if ctx.is_strict() => {
                return Err(e.context(format!("Malformed {} file: {}", kind, path.display())));
            }
            Err(e) => {
                let message = format!("{e:#}");
                tracing::warn!("Malformed {} file {}: {}", kind, path.display(), message);
                ctx.record(ParseIssue {
                    path: path.clone(),
                    format: kind,
                    message: message.clone(),
                });
                DocumentBody::Malformed { message }
            }
        };

        documents.push(Document::new(kind, path, base_dir, size_bytes, body));
    }

    Ok(documents)
}
