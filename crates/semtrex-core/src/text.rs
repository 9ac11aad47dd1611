//! Human-readable tree form: `(LABEL[:surface] child*)`.
//!
//! Surfaces are written as JSON-quoted strings, decimal numbers (floats
//! always carry a fractional part), `true`/`false`/`null`, `{ctx,kind,id}`
//! for identifiers, and `<blob:N>` for byte arrays. Reading inflates blobs
//! as zeroed arrays. Char surfaces are written as one-character strings;
//! the reader cannot tell them apart and yields strings.

use std::fmt::Write;

use crate::registry::Registry;
use crate::semid::{SemId, SemKind};
use crate::surface::Surface;
use crate::tree::{NodeId, Tree};

/// Errors from the text reader, positioned by byte offset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("unexpected character at byte {pos}")]
    Unexpected { pos: usize },
    #[error("unknown label `{label}` at byte {pos}")]
    UnknownLabel { label: String, pos: usize },
    #[error("unterminated string starting at byte {pos}")]
    UnterminatedString { pos: usize },
    #[error("malformed number at byte {pos}")]
    BadNumber { pos: usize },
    #[error("malformed identifier surface at byte {pos}")]
    BadIdentifier { pos: usize },
}

/// Render the subtree at `node`.
pub fn to_text(tree: &Tree, node: NodeId, registry: &Registry) -> String {
    let mut out = String::new();
    write_node(tree, node, registry, &mut out);
    out
}

fn write_node(tree: &Tree, node: NodeId, registry: &Registry, out: &mut String) {
    out.push('(');
    match registry.label(tree.symbol(node)) {
        Some(label) => out.push_str(label),
        None => {
            let _ = write!(out, "{}", tree.symbol(node));
        }
    }
    if !tree.surface(node).is_null() {
        out.push(':');
        write_surface(tree.surface(node), out);
    }
    for &child in tree.children(node) {
        out.push(' ');
        write_node(tree, child, registry, out);
    }
    out.push(')');
}

fn write_surface(surface: &Surface, out: &mut String) {
    match surface {
        Surface::Null => out.push_str("null"),
        Surface::Int(v) => {
            let _ = write!(out, "{v}");
        }
        // `{:?}` keeps the fractional part (`42.0`), which is what lets
        // the reader give floats back as floats.
        Surface::Float(v) => {
            let _ = write!(out, "{v:?}");
        }
        Surface::Char(c) => write_quoted(&c.to_string(), out),
        Surface::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
        Surface::Str(s) => write_quoted(s, out),
        Surface::Bytes(b) => {
            let _ = write!(out, "<blob:{}>", b.len());
        }
        Surface::Id(id) => {
            let _ = write!(out, "{id}");
        }
    }
}

fn write_quoted(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

/// Parse a tree from its text form, resolving labels via `registry`.
pub fn from_text(input: &str, registry: &Registry) -> Result<(Tree, NodeId), TextError> {
    let mut reader = Reader {
        bytes: input.as_bytes(),
        pos: 0,
        registry,
    };
    let mut tree = Tree::new();
    let root = reader.read_node(&mut tree)?;
    reader.skip_ws();
    if reader.pos != reader.bytes.len() {
        return Err(TextError::Unexpected { pos: reader.pos });
    }
    Ok((tree, root))
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    registry: &'a Registry,
}

impl Reader<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), TextError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(TextError::Unexpected { pos: self.pos })
        }
    }

    fn read_node(&mut self, tree: &mut Tree) -> Result<NodeId, TextError> {
        self.skip_ws();
        self.expect(b'(')?;
        let label_pos = self.pos;
        let label = self.read_label()?;
        let symbol = self
            .registry
            .symbol_named(&label)
            .ok_or(TextError::UnknownLabel {
                label,
                pos: label_pos,
            })?;
        let surface = if self.peek() == Some(b':') {
            self.pos += 1;
            self.read_surface()?
        } else {
            Surface::Null
        };
        let node = tree.new_node(symbol, surface);
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b')') => {
                    self.pos += 1;
                    return Ok(node);
                }
                Some(b'(') => {
                    let child = self.read_node(tree)?;
                    tree.add_child(node, child);
                }
                _ => return Err(TextError::Unexpected { pos: self.pos }),
            }
        }
    }

    fn read_label(&mut self) -> Result<String, TextError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start || self.bytes[start].is_ascii_digit() {
            return Err(TextError::Unexpected { pos: start });
        }
        Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }

    fn read_surface(&mut self) -> Result<Surface, TextError> {
        match self.peek() {
            Some(b'"') => self.read_string(),
            Some(b'{') => self.read_identifier(),
            Some(b'<') => self.read_blob(),
            Some(b'-') => self.read_number(),
            Some(b) if b.is_ascii_digit() => self.read_number(),
            Some(b't') | Some(b'f') | Some(b'n') => self.read_keyword(),
            _ => Err(TextError::Unexpected { pos: self.pos }),
        }
    }

    fn read_string(&mut self) -> Result<Surface, TextError> {
        let start = self.pos;
        self.pos += 1; // opening quote
        let mut s = String::new();
        loop {
            match self.peek() {
                None => return Err(TextError::UnterminatedString { pos: start }),
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(Surface::Str(s));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek() {
                        Some(b'n') => s.push('\n'),
                        Some(b't') => s.push('\t'),
                        Some(b'r') => s.push('\r'),
                        Some(b'"') => s.push('"'),
                        Some(b'\\') => s.push('\\'),
                        _ => return Err(TextError::Unexpected { pos: self.pos }),
                    }
                    self.pos += 1;
                }
                Some(_) => {
                    // Multi-byte UTF-8 sequences pass through unchanged.
                    let rest = &self.bytes[self.pos..];
                    let text = std::str::from_utf8(rest)
                        .map_err(|_| TextError::Unexpected { pos: self.pos })?;
                    let c = text.chars().next().expect("peeked a byte");
                    s.push(c);
                    self.pos += c.len_utf8();
                }
            }
        }
    }

    fn read_number(&mut self) -> Result<Surface, TextError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        let mut is_float = false;
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| TextError::BadNumber { pos: start })?;
        if is_float {
            text.parse()
                .map(Surface::Float)
                .map_err(|_| TextError::BadNumber { pos: start })
        } else {
            text.parse()
                .map(Surface::Int)
                .map_err(|_| TextError::BadNumber { pos: start })
        }
    }

    fn read_keyword(&mut self) -> Result<Surface, TextError> {
        for (word, surface) in [
            ("true", Surface::Bool(true)),
            ("false", Surface::Bool(false)),
            ("null", Surface::Null),
        ] {
            if self.bytes[self.pos..].starts_with(word.as_bytes()) {
                self.pos += word.len();
                return Ok(surface);
            }
        }
        Err(TextError::Unexpected { pos: self.pos })
    }

    fn read_identifier(&mut self) -> Result<Surface, TextError> {
        let start = self.pos;
        self.expect(b'{')?;
        let context = self.read_u32(start)?;
        self.expect(b',')?;
        let kind_code = self.read_u32(start)? as i32;
        self.expect(b',')?;
        let id = self.read_u32(start)?;
        self.expect(b'}')?;
        let kind = SemKind::from_code(kind_code).ok_or(TextError::BadIdentifier { pos: start })?;
        Ok(Surface::Id(SemId::new(context, kind, id)))
    }

    fn read_u32(&mut self, err_pos: usize) -> Result<u32, TextError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|t| t.parse().ok())
            .ok_or(TextError::BadIdentifier { pos: err_pos })
    }

    fn read_blob(&mut self) -> Result<Surface, TextError> {
        let start = self.pos;
        if !self.bytes[self.pos..].starts_with(b"<blob:") {
            return Err(TextError::Unexpected { pos: start });
        }
        self.pos += "<blob:".len();
        let len = self.read_u32(start)? as usize;
        self.expect(b'>')?;
        // Blob contents are not carried by the text form; inflate zeroed.
        Ok(Surface::Bytes(vec![0; len]))
    }
}
