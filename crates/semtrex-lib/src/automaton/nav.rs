//! Cursor motion attached to successor edges.
//!
//! A transition is an integer: `+1` descends to the first child, `0`
//! advances to the next sibling, `-k` pops `k` levels and then advances,
//! and a reserved sentinel leaves the cursor alone. The builder does
//! arithmetic on transitions when patching fragment outputs, so the raw
//! integer stays accessible behind this type.

const NONE_SENTINEL: i32 = i32::MIN;

/// A single transition. See the module docs for the encoding.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Nav(i32);

impl Nav {
    /// Do not move the cursor.
    pub const NONE: Nav = Nav(NONE_SENTINEL);
    /// Descend to the first child.
    pub const DOWN: Nav = Nav(1);
    /// Advance to the next sibling.
    pub const NEXT: Nav = Nav(0);

    /// Pop `levels` parents, then advance to the next sibling.
    pub const fn up(levels: u32) -> Nav {
        Nav(-(levels as i32))
    }

    /// Creation-time transition for an output slot: the current build
    /// level (0 or negative).
    pub const fn at_level(level: i32) -> Nav {
        Nav(level)
    }

    /// Patch-time adjustment. The sentinel is sticky.
    pub fn shift(self, delta: i32) -> Nav {
        if self.0 == NONE_SENTINEL {
            self
        } else {
            Nav(self.0 + delta)
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == NONE_SENTINEL
    }

    pub fn kind(self) -> NavKind {
        match self.0 {
            NONE_SENTINEL => NavKind::None,
            1 => NavKind::Down,
            0 => NavKind::Next,
            n if n < 0 => NavKind::Up((-n) as u32),
            n => unreachable!("transition {n} out of range"),
        }
    }
}

/// Decoded transition, for matcher dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKind {
    None,
    Down,
    Next,
    Up(u32),
}

impl std::fmt::Debug for Nav {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            NavKind::None => write!(f, "none"),
            NavKind::Down => write!(f, "down"),
            NavKind::Next => write!(f, "next"),
            NavKind::Up(k) => write!(f, "up({k})"),
        }
    }
}
