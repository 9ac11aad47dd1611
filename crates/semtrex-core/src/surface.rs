//! Scalar payloads attached to tree nodes.

use serde::{Deserialize, Serialize};

use crate::semid::SemId;

/// The value payload of a tree node.
///
/// Equality is structural: byte arrays compare by content, identifiers
/// componentwise. `Int`, `Float` and `Char` stay distinct variants because
/// the pattern language distinguishes `42`, `42.0` and `'x'`, even though
/// the fixed binary tag set collapses them (ints to float64, chars to utf8).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Surface {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Char(char),
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>),
    Id(SemId),
}

impl Surface {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Surface::Null)
    }
}

impl From<i64> for Surface {
    fn from(v: i64) -> Self {
        Surface::Int(v)
    }
}

impl From<f64> for Surface {
    fn from(v: f64) -> Self {
        Surface::Float(v)
    }
}

impl From<char> for Surface {
    fn from(v: char) -> Self {
        Surface::Char(v)
    }
}

impl From<bool> for Surface {
    fn from(v: bool) -> Self {
        Surface::Bool(v)
    }
}

impl From<&str> for Surface {
    fn from(v: &str) -> Self {
        Surface::Str(v.to_owned())
    }
}

impl From<String> for Surface {
    fn from(v: String) -> Self {
        Surface::Str(v)
    }
}

impl From<SemId> for Surface {
    fn from(v: SemId) -> Self {
        Surface::Id(v)
    }
}
