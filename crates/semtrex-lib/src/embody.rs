//! Rebuilding trees from match results.
//!
//! Three collaborators over the capture shape: `embody_from_match` turns
//! captures into a fresh tree, `stx_replace` rewrites every top-level
//! match site with a replacement subtree, and `match_results_to_sem_map`
//! flattens captures into a `SEMANTIC_MAP` tree.

use semtrex_core::builtins::symbols as sym;
use semtrex_core::{NodeId, Surface, Tree};

use crate::Semtrex;
use crate::engine::{MatchError, MatchResult, matched_nodes};

/// Build a tree embodying the captures.
///
/// A single top-level capture becomes one node bearing the capture
/// symbol: nested captures recurse into its children; otherwise a single
/// childless matched node contributes its surface, and anything wider
/// contributes clones of the matched nodes as children. Multiple
/// top-level captures are collected under a wrapper root bearing the
/// first capture's symbol.
pub fn embody_from_match(
    results: &[MatchResult],
    tree: &Tree,
    root: NodeId,
    out: &mut Tree,
) -> Option<NodeId> {
    match results {
        [] => None,
        [single] => Some(embody_one(single, tree, root, out)),
        [first, ..] => {
            let wrapper = out.new_node(first.symbol, Surface::Null);
            for result in results {
                let child = embody_one(result, tree, root, out);
                out.add_child(wrapper, child);
            }
            Some(wrapper)
        }
    }
}

fn embody_one(result: &MatchResult, tree: &Tree, root: NodeId, out: &mut Tree) -> NodeId {
    let node = out.new_node(result.symbol, Surface::Null);
    if !result.children.is_empty() {
        for nested in &result.children {
            let child = embody_one(nested, tree, root, out);
            out.add_child(node, child);
        }
        return node;
    }
    let matched = matched_nodes(tree, root, result);
    if let [only] = matched[..] {
        if tree.child_count(only) == 0 {
            out.set_surface(node, tree.surface(only).clone());
            return node;
        }
    }
    for m in matched {
        let clone = out.copy_from(tree, m);
        out.add_child(node, clone);
    }
    node
}

/// Replace every top-level match site with a deep clone of `replacement`.
///
/// Returns whether anything matched. Paths are resolved against the tree
/// as matched; replacements do not change sibling positions, so the
/// recorded paths stay valid while they are applied.
pub fn stx_replace(
    semtrex: &Semtrex,
    tree: &mut Tree,
    root: NodeId,
    replacement: NodeId,
) -> Result<bool, MatchError> {
    let Some(results) = semtrex.captures(tree, root)? else {
        return Ok(false);
    };
    for result in &results {
        let Some(target) = tree.node_at_path(root, &result.path) else {
            continue;
        };
        let clone = tree.clone_subtree(replacement);
        match (tree.parent(target), tree.node_index(target)) {
            (Some(parent), Some(index)) => {
                tree.replace_child(parent, index, clone)
                    .expect("index of an attached child is in range");
            }
            // A root match site: replace its content in place.
            _ => tree.replace_node(target, clone),
        }
    }
    Ok(true)
}

/// Build a `SEMANTIC_MAP`: one `SEMANTIC_LINK` per capture, flattened
/// depth-first, each holding a `USAGE` (surface = the capture symbol)
/// and a `REPLACEMENT_VALUE` with clones of the matched nodes.
pub fn match_results_to_sem_map(
    results: &[MatchResult],
    tree: &Tree,
    root: NodeId,
    out: &mut Tree,
) -> NodeId {
    let map = out.new_node(sym::SEMANTIC_MAP, Surface::Null);
    for result in results {
        add_links(result, tree, root, out, map);
    }
    map
}

fn add_links(result: &MatchResult, tree: &Tree, root: NodeId, out: &mut Tree, map: NodeId) {
    let link = out.new_child(map, sym::SEMANTIC_LINK, Surface::Null);
    out.new_child(link, sym::USAGE, Surface::Id(result.symbol));
    let value = out.new_child(link, sym::REPLACEMENT_VALUE, Surface::Null);
    for m in matched_nodes(tree, root, result) {
        let clone = out.copy_from(tree, m);
        out.add_child(value, clone);
    }
    for nested in &result.children {
        add_links(nested, tree, root, out, map);
    }
}
