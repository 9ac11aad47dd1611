//! Semantic identifiers.
//!
//! A `SemId` names a concept: a `(context, kind, id)` triple. Comparing two
//! ids is a cheap componentwise comparison; labels live in the [`Registry`].
//!
//! [`Registry`]: crate::registry::Registry

use serde::{Deserialize, Serialize};

/// What kind of concept an identifier names.
///
/// Discriminants are stable: they are written as `i32` in the binary tree
/// form and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SemKind {
    Structure = 0,
    Symbol = 1,
    Process = 2,
    Receptor = 3,
    Protocol = 4,
}

impl SemKind {
    /// Wire code for the binary tree form.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Inverse of [`code`](Self::code). `None` for unknown codes.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(SemKind::Structure),
            1 => Some(SemKind::Symbol),
            2 => Some(SemKind::Process),
            3 => Some(SemKind::Receptor),
            4 => Some(SemKind::Protocol),
            _ => None,
        }
    }
}

/// A semantic identifier: `(context, kind, id)`.
///
/// `context` is a namespace (0 is the system context). `id` is unique
/// within its `(context, kind)` partition and allocated by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SemId {
    pub context: u32,
    pub kind: SemKind,
    pub id: u32,
}

/// The null symbol, `(0, Symbol, 0)`.
pub const NULL_SYMBOL: SemId = SemId::symbol(0, 0);

/// The null structure, `(0, Structure, 0)`. Distinct from [`NULL_SYMBOL`].
pub const NULL_STRUCTURE: SemId = SemId::structure(0, 0);

impl SemId {
    #[inline]
    pub const fn new(context: u32, kind: SemKind, id: u32) -> Self {
        Self { context, kind, id }
    }

    #[inline]
    pub const fn symbol(context: u32, id: u32) -> Self {
        Self::new(context, SemKind::Symbol, id)
    }

    #[inline]
    pub const fn structure(context: u32, id: u32) -> Self {
        Self::new(context, SemKind::Structure, id)
    }

    /// True for either of the two null sentinels.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.context == 0 && self.id == 0
    }
}

impl std::fmt::Display for SemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{},{},{}}}", self.context, self.kind.code(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls_are_distinct() {
        assert_ne!(NULL_SYMBOL, NULL_STRUCTURE);
        assert!(NULL_SYMBOL.is_null());
        assert!(NULL_STRUCTURE.is_null());
    }

    #[test]
    fn componentwise_equality() {
        assert_eq!(SemId::symbol(1, 7), SemId::symbol(1, 7));
        assert_ne!(SemId::symbol(1, 7), SemId::symbol(2, 7));
        assert_ne!(SemId::symbol(1, 7), SemId::structure(1, 7));
    }

    #[test]
    fn kind_codes_round_trip() {
        for kind in [
            SemKind::Structure,
            SemKind::Symbol,
            SemKind::Process,
            SemKind::Receptor,
            SemKind::Protocol,
        ] {
            assert_eq!(SemKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(SemKind::from_code(5), None);
    }

    #[test]
    fn display_form() {
        assert_eq!(SemId::symbol(0, 20).to_string(), "{0,1,20}");
    }
}
