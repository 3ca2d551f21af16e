use super::{Document, FormatKind, ParseContext, ResourceFormat, parse_batch};
use anyhow::{Result, bail};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};

/// XML family documents, reduced to an element outline
///
/// The outline records the root element, the distinct names of its direct
/// children, the total element count and the maximum nesting depth.
pub struct XmlFormat;

impl ResourceFormat for XmlFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::Xml
    }

    fn parse(
        &self,
        paths: &[PathBuf],
        base_dir: &Path,
        ctx: &mut ParseContext,
    ) -> Result<Vec<Document>> {
        parse_batch(self.kind(), paths, base_dir, ctx, outline)
    }
}

fn element_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

fn outline(text: &str) -> Result<Value> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut root: Option<String> = None;
    let mut children: Vec<String> = Vec::new();
    let mut elements = 0usize;
    let mut depth = 0usize;
    let mut max_depth = 0usize;

    let mut visit = |name: String, depth: usize| -> Result<()> {
        elements += 1;
        match depth {
            0 if root.is_some() => bail!("multiple root elements ('{name}')"),
            0 => root = Some(name),
            1 if !children.contains(&name) => children.push(name),
            _ => {}
        }
        Ok(())
    };

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                visit(element_name(&element), depth)?;
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            Event::Empty(element) => {
                visit(element_name(&element), depth)?;
                max_depth = max_depth.max(depth + 1);
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        bail!("{depth} unclosed element(s) at end of document");
    }
    let Some(root) = root else {
        bail!("document has no root element");
    };

    Ok(json!({
        "root": root,
        "children": children,
        "elements": elements,
        "depth": max_depth,
    }))
}
