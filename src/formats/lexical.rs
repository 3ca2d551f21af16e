//! Comment and string masking for brace-structured formats
//!
//! Protobuf and HCL are inspected with regular expressions, which only works
//! once comments are out of the way and braces inside string literals no
//! longer count. Masking replaces bytes with spaces (newlines kept), so byte
//! offsets in the masked text line up with the original.

use anyhow::{Result, bail};

/// Source text with two levels of masking applied
pub(crate) struct Masked {
    /// Comments blanked; string literals intact
    pub code: String,
    /// Comments and string literal contents blanked
    pub structure: String,
}

#[derive(Clone, Copy, PartialEq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Str(char),
    Heredoc,
    HeredocEnd,
}

fn blank(out: &mut String, c: char) {
    if c == '\n' {
        out.push('\n');
    } else {
        out.extend(std::iter::repeat_n(' ', c.len_utf8()));
    }
}

/// Mask comments and string literals
///
/// `//` and `/* */` comments are always recognized. `hcl` additionally enables
/// `#` comments and `<<EOF` / `<<-EOF` heredocs, and restricts string quotes to
/// `"`.
pub(crate) fn mask(text: &str, hcl: bool) -> Result<Masked> {
    let mut code = String::with_capacity(text.len());
    let mut structure = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut heredoc_tag = String::new();
    let mut line_start = true;

    let mut chars = text.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);

        match state {
            State::Code => {
                let comment = match (c, next) {
                    ('/', Some('/')) => Some(State::LineComment),
                    ('/', Some('*')) => Some(State::BlockComment),
                    ('#', _) if hcl => Some(State::LineComment),
                    _ => None,
                };
                if let Some(comment) = comment {
                    state = comment;
                    blank(&mut code, c);
                    blank(&mut structure, c);
                    if comment == State::BlockComment {
                        // consume the '*' so "/*/" does not close immediately
                        if let Some((_, star)) = chars.next() {
                            blank(&mut code, star);
                            blank(&mut structure, star);
                        }
                    }
                    line_start = false;
                    continue;
                }

                if hcl && c == '<' && next == Some('<') {
                    if let Some(tag) = heredoc_marker(&text[offset..]) {
                        heredoc_tag = tag;
                        state = State::Heredoc;
                    }
                } else if c == '"' || (!hcl && c == '\'') {
                    state = State::Str(c);
                }
                code.push(c);
                structure.push(c);
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                }
                blank(&mut code, c);
                blank(&mut structure, c);
            }
            State::BlockComment => {
                if c == '*' && next == Some('/') {
                    state = State::Code;
                    blank(&mut code, c);
                    blank(&mut structure, c);
                    if let Some((_, slash)) = chars.next() {
                        blank(&mut code, slash);
                        blank(&mut structure, slash);
                    }
                    continue;
                }
                blank(&mut code, c);
                blank(&mut structure, c);
            }
            State::Str(quote) => {
                code.push(c);
                if c == '\\' {
                    blank(&mut structure, c);
                    if let Some((_, escaped)) = chars.next() {
                        code.push(escaped);
                        blank(&mut structure, escaped);
                    }
                    continue;
                }
                if c == quote {
                    state = State::Code;
                    structure.push(c);
                } else if c == '\n' {
                    bail!("unterminated string literal at byte {offset}");
                } else {
                    blank(&mut structure, c);
                }
            }
            State::Heredoc => {
                code.push(c);
                blank(&mut structure, c);
                if line_start && is_closing_line(&text[offset..], &heredoc_tag) {
                    state = State::HeredocEnd;
                }
            }
            State::HeredocEnd => {
                code.push(c);
                blank(&mut structure, c);
                if c == '\n' {
                    state = State::Code;
                }
            }
        }

        line_start = c == '\n';
    }

    match state {
        State::BlockComment => bail!("unterminated block comment"),
        State::Str(_) => bail!("unterminated string literal"),
        State::Heredoc => bail!("unterminated heredoc '{heredoc_tag}'"),
        State::Code | State::LineComment | State::HeredocEnd => {}
    }

    Ok(Masked { code, structure })
}

/// Whether the line starting at `rest` closes the heredoc `tag`
fn is_closing_line(rest: &str, tag: &str) -> bool {
    rest.lines().next().map(str::trim) == Some(tag)
}

/// Parse `<<TAG` or `<<-TAG` followed by a line break
fn heredoc_marker(rest: &str) -> Option<String> {
    let rest = rest.strip_prefix("<<")?;
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    let tag: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    let after = &rest[tag.len()..];
    let line_break = after.starts_with('\n') || after.starts_with("\r\n");
    (!tag.is_empty() && line_break).then_some(tag)
}

/// Ensure every `{` has a matching `}` in masked structure text
pub(crate) fn check_balanced(structure: &str) -> Result<()> {
    let mut depth = 0usize;
    for (offset, c) in structure.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => bail!("unexpected '}}' at byte {offset}"),
            '}' => depth -= 1,
            _ => {}
        }
    }
    if depth != 0 {
        bail!("{depth} unclosed '{{' at end of file");
    }
    Ok(())
}

/// Brace depth at increasing byte offsets of masked structure text
pub(crate) struct DepthCursor<'a> {
    structure: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> DepthCursor<'a> {
    pub fn new(structure: &'a str) -> Self {
        Self {
            structure: structure.as_bytes(),
            pos: 0,
            depth: 0,
        }
    }

    /// Depth just before `offset`; offsets must not decrease between calls
    pub fn depth_at(&mut self, offset: usize) -> usize {
        let end = offset.min(self.structure.len());
        while self.pos < end {
            match self.structure[self.pos] {
                b'{' => self.depth += 1,
                b'}' => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }
            self.pos += 1;
        }
        self.depth
    }
}
