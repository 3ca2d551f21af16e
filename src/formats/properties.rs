use super::{Document, FormatKind, ParseContext, ResourceFormat, parse_batch};
use anyhow::{Result, bail};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

const WHITESPACE: &[char] = &[' ', '\t', '\x0c'];

/// Java-style `.properties` files, parsed into a flat key/value object
///
/// Supports `=`, `:` and whitespace separators, `#` and `!` comments,
/// backslash line continuations and the usual escapes including `\uXXXX`.
/// Later duplicates of a key replace earlier ones.
pub struct PropertiesFormat;

impl ResourceFormat for PropertiesFormat {
    fn kind(&self) -> FormatKind {
        FormatKind::Properties
    }

    fn parse(
        &self,
        paths: &[PathBuf],
        base_dir: &Path,
        ctx: &mut ParseContext,
    ) -> Result<Vec<Document>> {
        parse_batch(self.kind(), paths, base_dir, ctx, parse_properties)
    }
}

fn parse_properties(text: &str) -> Result<Value> {
    let mut entries = Map::new();
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        let line = line.trim_start_matches(WHITESPACE);
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = String::new();
        let mut current = line;
        while continues(current) {
            logical.push_str(&current[..current.len() - 1]);
            match lines.next() {
                Some(next) => current = next.trim_start_matches(WHITESPACE),
                None => {
                    current = "";
                    break;
                }
            }
        }
        logical.push_str(current);

        let (key, value) = split_entry(&logical);
        entries.insert(unescape(key)?, Value::String(unescape(value)?));
    }

    Ok(Value::Object(entries))
}

/// A line continues when it ends in an odd number of backslashes
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                let mut rest = line[index..].trim_start_matches(WHITESPACE);
                if let Some(stripped) = rest.strip_prefix(&['=', ':'][..]) {
                    rest = stripped.trim_start_matches(WHITESPACE);
                }
                return (&line[..index], rest);
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|_| hex.len() == 4);
                match code.and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => bail!("malformed \\uxxxx encoding: \\u{hex}"),
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_separators() {
        let value = parse_properties("a=1\nb: 2\nc 3\nd = 4\ne\n").unwrap();
        assert_eq!(
            value,
            json!({"a": "1", "b": "2", "c": "3", "d": "4", "e": ""})
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let value = parse_properties("# comment\n! also\n\n   \nkey=value\n").unwrap();
        assert_eq!(value, json!({"key": "value"}));
    }

    #[test]
    fn test_continuation_lines() {
        let value = parse_properties("list = one, \\\n       two, \\\n       three\n").unwrap();
        assert_eq!(value["list"], "one, two, three");
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let value = parse_properties("path=C:\\\\dir\\\\\nnext=1\n").unwrap();
        assert_eq!(value["path"], "C:\\dir\\");
        assert_eq!(value["next"], "1");
    }

    #[test]
    fn test_escaped_separator_in_key() {
        let value = parse_properties("a\\=b=c\nspace\\ key=v\n").unwrap();
        assert_eq!(value["a=b"], "c");
        assert_eq!(value["space key"], "v");
    }

    #[test]
    fn test_unicode_escape() {
        let value = parse_properties("greeting=caf\\u00e9\n").unwrap();
        assert_eq!(value["greeting"], "café");
    }

    #[test]
    fn test_malformed_unicode_escape() {
        assert!(parse_properties("bad=\\u12\n").is_err());
        assert!(parse_properties("bad=\\uzzzz\n").is_err());
    }

    #[test]
    fn test_last_duplicate_wins() {
        let value = parse_properties("k=1\nk=2\n").unwrap();
        assert_eq!(value["k"], "2");
    }
}
