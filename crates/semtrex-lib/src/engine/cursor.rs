//! Tree cursor with past-end positions.
//!
//! A cursor that has advanced past the last child of some parent still
//! knows where it is (`End(parent)`), so an up-transition from there can
//! climb the right number of levels. `Done` is past the root: nothing
//! above, nothing beside.

use semtrex_core::{NodeId, Tree};

use crate::automaton::{Nav, NavKind};

/// Position of the matcher in the target tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// On a node.
    At(NodeId),
    /// Past the last child of `parent` (or inside a childless `parent`).
    End(NodeId),
    /// Past the root.
    Done,
}

impl Cursor {
    /// The node under the cursor, if it is on one.
    #[inline]
    pub fn node(self) -> Option<NodeId> {
        match self {
            Cursor::At(n) => Some(n),
            _ => None,
        }
    }

    /// True for the past-end positions consuming states fail on.
    #[inline]
    pub fn is_null(self) -> bool {
        !matches!(self, Cursor::At(_))
    }
}

/// Advance from a node to its next sibling, or to the appropriate
/// past-end position.
fn sibling_advance(tree: &Tree, n: NodeId) -> Cursor {
    if let Some(sibling) = tree.next_sibling(n) {
        return Cursor::At(sibling);
    }
    match tree.parent(n) {
        Some(parent) => Cursor::End(parent),
        None => Cursor::Done,
    }
}

fn ancestor(tree: &Tree, n: NodeId, levels: u32) -> Option<NodeId> {
    let mut cur = n;
    for _ in 0..levels {
        cur = tree.parent(cur)?;
    }
    Some(cur)
}

/// Apply a transition. `None` means the motion is impossible from here
/// (descending from a past-end position, climbing past the root).
pub fn apply(tree: &Tree, cursor: Cursor, nav: Nav) -> Option<Cursor> {
    match nav.kind() {
        NavKind::None => Some(cursor),
        NavKind::Down => match cursor {
            Cursor::At(n) => Some(
                tree.first_child(n)
                    .map(Cursor::At)
                    .unwrap_or(Cursor::End(n)),
            ),
            _ => None,
        },
        NavKind::Next => match cursor {
            Cursor::At(n) => Some(sibling_advance(tree, n)),
            _ => None,
        },
        NavKind::Up(levels) => {
            let target = match cursor {
                Cursor::At(n) => ancestor(tree, n, levels)?,
                // A past-end cursor sits at child level of its parent:
                // popping one level lands on the parent itself.
                Cursor::End(parent) => ancestor(tree, parent, levels - 1)?,
                Cursor::Done => return None,
            };
            Some(sibling_advance(tree, target))
        }
    }
}
