use super::FormatKind;
use crate::shared::paths::{relativize, to_slash};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A parsed resource file
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Path relative to the base directory, `/` separated
    pub source_path: String,
    /// Path exactly as the selector produced it
    #[serde(skip)]
    pub path: PathBuf,
    pub format: FormatKind,
    pub size_bytes: u64,
    pub body: DocumentBody,
}

/// Outcome of parsing one document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DocumentBody {
    /// Structured view of the content
    Parsed { value: Value },
    /// Content could not be parsed; only produced by a lenient context
    Malformed { message: String },
}

impl Document {
    pub fn new(
        format: FormatKind,
        path: &Path,
        base_dir: &Path,
        size_bytes: u64,
        body: DocumentBody,
    ) -> Self {
        Self {
            source_path: to_slash(&relativize(base_dir, path)),
            path: path.to_path_buf(),
            format,
            size_bytes,
            body,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self.body, DocumentBody::Malformed { .. })
    }

    /// The parsed value, if parsing succeeded
    pub fn value(&self) -> Option<&Value> {
        match &self.body {
            DocumentBody::Parsed { value } => Some(value),
            DocumentBody::Malformed { .. } => None,
        }
    }
}

/// Problem recorded while parsing in lenient mode
#[derive(Debug, Clone, Serialize)]
pub struct ParseIssue {
    pub path: PathBuf,
    pub format: FormatKind,
    pub message: String,
}

/// State shared by every format during one select-and-parse sweep
#[derive(Debug, Default)]
pub struct ParseContext {
    strict: bool,
    issues: Vec<ParseIssue>,
}

impl ParseContext {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            issues: Vec::new(),
        }
    }

    /// A context that turns malformed content into a parser failure
    pub fn strict() -> Self {
        Self::new(true)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn record(&mut self, issue: ParseIssue) {
        self.issues.push(issue);
    }

    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_source_path_is_base_relative() {
        let doc = Document::new(
            FormatKind::Yaml,
            Path::new("/repo/app/config/app.yaml"),
            Path::new("/repo"),
            12,
            DocumentBody::Parsed { value: json!([]) },
        );
        assert_eq!(doc.source_path, "app/config/app.yaml");
        assert_eq!(doc.path, PathBuf::from("/repo/app/config/app.yaml"));
        assert!(!doc.is_malformed());
    }

    #[test]
    fn test_document_serializes_with_status_tag() {
        let doc = Document::new(
            FormatKind::Json,
            Path::new("/repo/a.json"),
            Path::new("/repo"),
            2,
            DocumentBody::Malformed {
                message: "EOF".to_string(),
            },
        );
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["source_path"], "a.json");
        assert_eq!(value["format"], "json");
        assert_eq!(value["body"]["status"], "malformed");
        assert_eq!(value["body"]["message"], "EOF");
        assert!(value.get("path").is_none());
    }

    #[test]
    fn test_context_defaults_to_lenient() {
        let ctx = ParseContext::default();
        assert!(!ctx.is_strict());
        assert!(ctx.issues().is_empty());
        assert!(ParseContext::strict().is_strict());
    }
}
