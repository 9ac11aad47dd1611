//! Fixed binary tree form.
//!
//! Per node, little-endian:
//! `[context:i32][kind:i32][id:i32][childCount:u32][surfaceTag:u8][surface]`
//! followed by the children in order. Surface tags: 0 = null, 1 = float64,
//! 2 = utf8 (u32 length prefix), 3 = bool, 4 = bytes (u32 length prefix),
//! 5 = identifier (3×i32). Int surfaces are written as float64 and char
//! surfaces as utf8; decoding yields `Float` / `Str` for those tags.

use crate::semid::{SemId, SemKind};
use crate::surface::Surface;
use crate::tree::{NodeId, Tree};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BinaryError {
    #[error("unexpected end of input at byte {pos}")]
    UnexpectedEof { pos: usize },
    #[error("unknown surface tag {tag} at byte {pos}")]
    BadTag { tag: u8, pos: usize },
    #[error("unknown identifier kind {code} at byte {pos}")]
    BadKind { code: i32, pos: usize },
    #[error("invalid utf-8 in surface at byte {pos}")]
    BadUtf8 { pos: usize },
    #[error("trailing bytes after tree at byte {pos}")]
    TrailingBytes { pos: usize },
}

const TAG_NULL: u8 = 0;
const TAG_FLOAT: u8 = 1;
const TAG_STR: u8 = 2;
const TAG_BOOL: u8 = 3;
const TAG_BYTES: u8 = 4;
const TAG_ID: u8 = 5;

/// Encode the subtree at `node`.
pub fn to_binary(tree: &Tree, node: NodeId) -> Vec<u8> {
    let mut out = Vec::new();
    encode_node(tree, node, &mut out);
    out
}

fn encode_node(tree: &Tree, node: NodeId, out: &mut Vec<u8>) {
    let symbol = tree.symbol(node);
    encode_id(symbol, out);
    out.extend_from_slice(&(tree.child_count(node) as u32).to_le_bytes());
    encode_surface(tree.surface(node), out);
    for &child in tree.children(node) {
        encode_node(tree, child, out);
    }
}

fn encode_id(id: SemId, out: &mut Vec<u8>) {
    out.extend_from_slice(&(id.context as i32).to_le_bytes());
    out.extend_from_slice(&id.kind.code().to_le_bytes());
    out.extend_from_slice(&(id.id as i32).to_le_bytes());
}

fn encode_surface(surface: &Surface, out: &mut Vec<u8>) {
    match surface {
        Surface::Null => out.push(TAG_NULL),
        Surface::Int(v) => {
            out.push(TAG_FLOAT);
            out.extend_from_slice(&(*v as f64).to_le_bytes());
        }
        Surface::Float(v) => {
            out.push(TAG_FLOAT);
            out.extend_from_slice(&v.to_le_bytes());
        }
        Surface::Char(c) => {
            out.push(TAG_STR);
            let mut buf = [0u8; 4];
            let s = c.encode_utf8(&mut buf);
            out.extend_from_slice(&(s.len() as u32).to_le_bytes());
            out.extend_from_slice(s.as_bytes());
        }
        Surface::Str(s) => {
            out.push(TAG_STR);
            out.extend_from_slice(&(s.len() as u32).to_le_bytes());
            out.extend_from_slice(s.as_bytes());
        }
        Surface::Bool(v) => {
            out.push(TAG_BOOL);
            out.push(u8::from(*v));
        }
        Surface::Bytes(b) => {
            out.push(TAG_BYTES);
            out.extend_from_slice(&(b.len() as u32).to_le_bytes());
            out.extend_from_slice(b);
        }
        Surface::Id(id) => {
            out.push(TAG_ID);
            encode_id(*id, out);
        }
    }
}

/// Decode a tree from its binary form.
pub fn from_binary(bytes: &[u8]) -> Result<(Tree, NodeId), BinaryError> {
    let mut reader = Reader { bytes, pos: 0 };
    let mut tree = Tree::new();
    let root = reader.decode_node(&mut tree)?;
    if reader.pos != bytes.len() {
        return Err(BinaryError::TrailingBytes { pos: reader.pos });
    }
    Ok((tree, root))
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take(&mut self, n: usize) -> Result<&[u8], BinaryError> {
        if self.pos + n > self.bytes.len() {
            return Err(BinaryError::UnexpectedEof { pos: self.pos });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_i32(&mut self) -> Result<i32, BinaryError> {
        Ok(i32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn read_u32(&mut self) -> Result<u32, BinaryError> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    fn read_u8(&mut self) -> Result<u8, BinaryError> {
        Ok(self.take(1)?[0])
    }

    fn read_id(&mut self) -> Result<SemId, BinaryError> {
        let pos = self.pos;
        let context = self.read_i32()? as u32;
        let code = self.read_i32()?;
        let id = self.read_i32()? as u32;
        let kind = SemKind::from_code(code).ok_or(BinaryError::BadKind { code, pos })?;
        Ok(SemId::new(context, kind, id))
    }

    fn decode_node(&mut self, tree: &mut Tree) -> Result<NodeId, BinaryError> {
        let symbol = self.read_id()?;
        let child_count = self.read_u32()?;
        let surface = self.decode_surface()?;
        let node = tree.new_node(symbol, surface);
        for _ in 0..child_count {
            let child = self.decode_node(tree)?;
            tree.add_child(node, child);
        }
        Ok(node)
    }

    fn decode_surface(&mut self) -> Result<Surface, BinaryError> {
        let tag_pos = self.pos;
        let tag = self.read_u8()?;
        match tag {
            TAG_NULL => Ok(Surface::Null),
            TAG_FLOAT => {
                let bits = self.take(8)?.try_into().unwrap();
                Ok(Surface::Float(f64::from_le_bytes(bits)))
            }
            TAG_STR => {
                let len = self.read_u32()? as usize;
                let pos = self.pos;
                let raw = self.take(len)?;
                let s = std::str::from_utf8(raw).map_err(|_| BinaryError::BadUtf8 { pos })?;
                Ok(Surface::Str(s.to_owned()))
            }
            TAG_BOOL => Ok(Surface::Bool(self.read_u8()? != 0)),
            TAG_BYTES => {
                let len = self.read_u32()? as usize;
                Ok(Surface::Bytes(self.take(len)?.to_vec()))
            }
            TAG_ID => Ok(Surface::Id(self.read_id()?)),
            _ => Err(BinaryError::BadTag { tag, pos: tag_pos }),
        }
    }
}
