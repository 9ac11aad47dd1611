//! Ordered semantic trees.
//!
//! Nodes live in a flat arena and are referenced by `NodeId`, so the
//! structure is a forest: detaching a subtree simply turns it into another
//! root in the same arena. All child addressing is 1-indexed, matching the
//! path convention used throughout.

use crate::semid::SemId;
use crate::surface::Surface;

/// Index into the tree's node arena.
pub type NodeId = u32;

/// A path from a root to a node: 1-indexed child positions. The empty
/// path is the root itself.
pub type TreePath = Vec<u32>;

/// Errors from mutation on invalid indices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("child index {index} out of range (node has {len} children)")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone)]
struct NodeData {
    symbol: SemId,
    surface: Surface,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena forest of `(symbol, surface, children)` nodes.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor: an arena holding a single root.
    pub fn with_root(symbol: SemId, surface: Surface) -> (Self, NodeId) {
        let mut tree = Self::new();
        let root = tree.new_node(symbol, surface);
        (tree, root)
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id as usize]
    }

    /// Number of nodes ever allocated in the arena (detached nodes
    /// included).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────────────────

    /// Allocate a detached node (a new root).
    pub fn new_node(&mut self, symbol: SemId, surface: Surface) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(NodeData {
            symbol,
            surface,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a node appended to `parent`.
    pub fn new_child(&mut self, parent: NodeId, symbol: SemId, surface: Surface) -> NodeId {
        let child = self.new_node(symbol, surface);
        self.add_child(parent, child);
        child
    }

    /// Append `child` to `parent`, detaching it from any prior parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            !self.is_ancestor(child, parent),
            "add_child would create a cycle"
        );
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut cur = Some(of);
        while let Some(n) = cur {
            if n == candidate {
                return true;
            }
            cur = self.node(n).parent;
        }
        false
    }

    // ─────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────

    #[inline]
    pub fn symbol(&self, n: NodeId) -> SemId {
        self.node(n).symbol
    }

    #[inline]
    pub fn surface(&self, n: NodeId) -> &Surface {
        &self.node(n).surface
    }

    pub fn set_surface(&mut self, n: NodeId, surface: Surface) {
        self.node_mut(n).surface = surface;
    }

    #[inline]
    pub fn parent(&self, n: NodeId) -> Option<NodeId> {
        self.node(n).parent
    }

    #[inline]
    pub fn children(&self, n: NodeId) -> &[NodeId] {
        &self.node(n).children
    }

    #[inline]
    pub fn child_count(&self, n: NodeId) -> usize {
        self.node(n).children.len()
    }

    /// 1-indexed child access; out of range yields `None`.
    pub fn child_at(&self, n: NodeId, index: usize) -> Option<NodeId> {
        if index == 0 {
            return None;
        }
        self.node(n).children.get(index - 1).copied()
    }

    /// First child, if any.
    pub fn first_child(&self, n: NodeId) -> Option<NodeId> {
        self.node(n).children.first().copied()
    }

    pub fn next_sibling(&self, n: NodeId) -> Option<NodeId> {
        let parent = self.node(n).parent?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&c| c == n)?;
        siblings.get(pos + 1).copied()
    }

    /// 1-based position of `n` among its siblings; `None` for roots.
    pub fn node_index(&self, n: NodeId) -> Option<usize> {
        let parent = self.node(n).parent?;
        self.node(parent)
            .children
            .iter()
            .position(|&c| c == n)
            .map(|p| p + 1)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Paths
    // ─────────────────────────────────────────────────────────────────────

    /// Path from the containing root down to `n` (empty for a root).
    pub fn path_of(&self, n: NodeId) -> TreePath {
        let mut path = Vec::new();
        let mut cur = n;
        while let Some(index) = self.node_index(cur) {
            path.push(index as u32);
            cur = self.node(cur).parent.expect("node_index implies parent");
        }
        path.reverse();
        path
    }

    /// Strict navigation by path: any out-of-range step yields `None`.
    pub fn node_at_path(&self, root: NodeId, path: &[u32]) -> Option<NodeId> {
        let mut cur = root;
        for &step in path {
            cur = self.child_at(cur, step as usize)?;
        }
        Some(cur)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────

    /// Unlink `n` from its parent; it becomes a root owning its subtree.
    pub fn detach(&mut self, n: NodeId) -> NodeId {
        if let Some(parent) = self.node(n).parent {
            self.node_mut(parent).children.retain(|&c| c != n);
            self.node_mut(n).parent = None;
        }
        n
    }

    /// Deep-copy the subtree at `n`; the copy is a new root in this arena.
    pub fn clone_subtree(&mut self, n: NodeId) -> NodeId {
        let symbol = self.node(n).symbol;
        let surface = self.node(n).surface.clone();
        let copy = self.new_node(symbol, surface);
        for i in 0..self.child_count(n) {
            let child = self.node(n).children[i];
            let child_copy = self.clone_subtree(child);
            self.add_child(copy, child_copy);
        }
        copy
    }

    /// Deep-copy a subtree from another arena into this one; the copy is
    /// a new root here.
    pub fn copy_from(&mut self, src: &Tree, n: NodeId) -> NodeId {
        let copy = self.new_node(src.symbol(n), src.surface(n).clone());
        for &child in src.children(n) {
            let child_copy = self.copy_from(src, child);
            self.add_child(copy, child_copy);
        }
        copy
    }

    /// Overwrite `dst`'s symbol and surface from `src`, preserving
    /// children and parent.
    pub fn morph(&mut self, dst: NodeId, src: NodeId) {
        let symbol = self.node(src).symbol;
        let surface = self.node(src).surface.clone();
        let node = self.node_mut(dst);
        node.symbol = symbol;
        node.surface = surface;
    }

    /// Replace `dst`'s content with `src`'s: symbol, surface, and children
    /// (reparented onto `dst`). `src` is left childless; `dst`'s former
    /// children become detached roots.
    pub fn replace_node(&mut self, dst: NodeId, src: NodeId) {
        let old_children = std::mem::take(&mut self.node_mut(dst).children);
        for child in old_children {
            self.node_mut(child).parent = None;
        }
        self.morph(dst, src);
        let moved = std::mem::take(&mut self.node_mut(src).children);
        for &child in &moved {
            self.node_mut(child).parent = Some(dst);
        }
        self.node_mut(dst).children = moved;
    }

    /// Insert `child` as the `index`-th child of `parent` (1-indexed;
    /// `len + 1` appends).
    pub fn insert_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        let len = self.child_count(parent);
        if index == 0 || index > len + 1 {
            return Err(TreeError::OutOfRange { index, len });
        }
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.insert(index - 1, child);
        Ok(())
    }

    /// Swap the `index`-th child of `parent` for `new`, returning the old
    /// child as a detached root.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        index: usize,
        new: NodeId,
    ) -> Result<NodeId, TreeError> {
        let len = self.child_count(parent);
        if index == 0 || index > len {
            return Err(TreeError::OutOfRange { index, len });
        }
        let old = self.node(parent).children[index - 1];
        self.detach(new);
        self.node_mut(new).parent = Some(parent);
        self.node_mut(parent).children[index - 1] = new;
        self.node_mut(old).parent = None;
        Ok(old)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Depth-first traversal
    // ─────────────────────────────────────────────────────────────────────

    /// One pre-order step within the subtree rooted at `origin`, or `None`
    /// when the subtree is exhausted.
    pub fn step_in_walk(&self, origin: NodeId, cur: NodeId) -> Option<NodeId> {
        if let Some(child) = self.first_child(cur) {
            return Some(child);
        }
        let mut n = cur;
        loop {
            if n == origin {
                return None;
            }
            if let Some(sibling) = self.next_sibling(n) {
                return Some(sibling);
            }
            n = self.parent(n)?;
        }
    }

    /// Pre-order iterator over the subtree rooted at `origin`.
    pub fn walk(&self, origin: NodeId) -> Walk<'_> {
        Walk {
            tree: self,
            origin,
            next: Some(origin),
        }
    }

    /// Structural equality of two subtrees (possibly across arenas).
    pub fn subtree_eq(&self, a: NodeId, other: &Tree, b: NodeId) -> bool {
        if self.symbol(a) != other.symbol(b) || self.surface(a) != other.surface(b) {
            return false;
        }
        let ac = self.children(a);
        let bc = other.children(b);
        if ac.len() != bc.len() {
            return false;
        }
        ac.iter()
            .zip(bc.iter())
            .all(|(&x, &y)| self.subtree_eq(x, other, y))
    }
}

/// See [`Tree::walk`].
pub struct Walk<'t> {
    tree: &'t Tree,
    origin: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Walk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.tree.step_in_walk(self.origin, cur);
        Some(cur)
    }
}
