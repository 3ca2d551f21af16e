use super::lexical::{DepthCursor, check_balanced, mask};
use super::{Document, FormatKind, ParseContext, ResourceFormat, parse_batch};
use anyhow::Result;
use regex::Regex;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*(syntax|edition)\s*=\s*["']([^"']+)["']\s*;"#).expect("valid regex")
});
static PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*package\s+([\w.]+)\s*;").expect("valid regex"));
static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+(?:(?:public|weak)\s+)?["']([^"']+)["']\s*;"#)
        .expect("valid regex")
});
static DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(message|enum|service|extend)\s+([\w.]+)\s*\{").expect("valid regex")
});

/// Protocol buffer schemas
///
/// Extracts the syntax (or edition), package, imports and top-level
/// definitions. Nested messages are not listed.
pub struct ProtoFormat;

impl ResourceFormat for ProtoFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::Protobuf
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
    let masked = mask(text, false)?;
    check_balanced(&masked.structure)?;

    let syntax = SYNTAX
        .captures(&masked.code)
        .map(|caps| json!({ "keyword": &caps[1], "value": &caps[2] }));
    let package = PACKAGE.captures(&masked.code).map(|caps| caps[1].to_string());
    let imports: Vec<String> = IMPORT
        .captures_iter(&masked.code)
        .map(|caps| caps[1].to_string())
        .collect();

    let mut cursor = DepthCursor::new(&masked.structure);
    let definitions: Vec<Value> = DEFINITION
        .captures_iter(&masked.structure)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            (cursor.depth_at(whole.start()) == 0)
                .then(|| json!({ "kind": &caps[1], "name": &caps[2] }))
        })
        .collect();

    Ok(json!({
        "syntax": syntax,
        "package": package,
        "imports": imports,
        "definitions": definitions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
// Orders API
syntax = "proto3";

package shop.orders.v1;

import "google/protobuf/timestamp.proto";
import public "shop/common.proto";

/* message Commented { } */
message Order {
  string id = 1;
  message Line {
    string sku = 1;
  }
  repeated Line lines = 2;
  string note = 3 [default = "message Fake {"];
}

enum Status {
  STATUS_UNSPECIFIED = 0;
}

service Orders {
  rpc Get(Order) returns (Order);
}
"#;

    #[test]
    fn test_describe_schema() {
        let value = describe(SCHEMA).unwrap();

        assert_eq!(value["syntax"]["keyword"], "syntax");
        assert_eq!(value["syntax"]["value"], "proto3");
        assert_eq!(value["package"], "shop.orders.v1");
        assert_eq!(
            value["imports"],
            json!(["google/protobuf/timestamp.proto", "shop/common.proto"])
        );
        assert_eq!(
            value["definitions"],
            json!([
                {"kind": "message", "name": "Order"},
                {"kind": "enum", "name": "Status"},
                {"kind": "service", "name": "Orders"},
            ])
        );
    }

    #[test]
    fn test_missing_header_is_null() {
        let value = describe("message A {}\n").unwrap();
        assert!(value["syntax"].is_null());
        assert!(value["package"].is_null());
        assert_eq!(value["definitions"][0]["name"], "A");
    }

    #[test]
    fn test_unbalanced_braces_rejected() {
        assert!(describe("message A {\n  string id = 1;\n").is_err());
    }
}
