//! Capture results and the published extraction helpers.

use serde::Serialize;

use semtrex_core::{NodeId, SemId, Tree, TreePath};

/// One completed capture group.
///
/// `path` addresses the first matched node from the target root, so
/// results stay valid without holding node references. `siblings_count`
/// is how many consecutive siblings the group spans, at least 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub symbol: SemId,
    pub path: TreePath,
    pub siblings_count: usize,
    pub children: Vec<MatchResult>,
}

/// Depth-first search for the first capture bearing `symbol`.
pub fn match_by_symbol<'r>(results: &'r [MatchResult], symbol: SemId) -> Option<&'r MatchResult> {
    for result in results {
        if result.symbol == symbol {
            return Some(result);
        }
        if let Some(found) = match_by_symbol(&result.children, symbol) {
            return Some(found);
        }
    }
    None
}

/// Resolve a capture back to the node slice it matched: the node at its
/// path plus `siblings_count - 1` following siblings. Empty if the path
/// no longer resolves.
pub fn matched_nodes(tree: &Tree, root: NodeId, result: &MatchResult) -> Vec<NodeId> {
    let Some(first) = tree.node_at_path(root, &result.path) else {
        return Vec::new();
    };
    let mut nodes = vec![first];
    let mut cur = first;
    for _ in 1..result.siblings_count {
        match tree.next_sibling(cur) {
            Some(next) => {
                nodes.push(next);
                cur = next;
            }
            None => break,
        }
    }
    nodes
}
