//! Pattern-tree inspection helpers.

use std::fmt::Write;

use semtrex_core::{NodeId, Registry, Surface, Tree};

/// Render a surface for dumps: labels for identifiers where the registry
/// knows them, Rust-style escapes for strings.
pub(crate) fn fmt_surface(surface: &Surface, registry: &Registry) -> String {
    match surface {
        Surface::Null => "null".to_owned(),
        Surface::Int(v) => v.to_string(),
        Surface::Float(v) => format!("{v:?}"),
        Surface::Char(c) => format!("'{c}'"),
        Surface::Bool(v) => v.to_string(),
        Surface::Str(s) => format!("{s:?}"),
        Surface::Bytes(b) => format!("<blob:{}>", b.len()),
        Surface::Id(id) => registry
            .label(*id)
            .map(str::to_owned)
            .unwrap_or_else(|| id.to_string()),
    }
}

/// Indented dump of a pattern tree, one node per line.
pub fn dump_pattern(tree: &Tree, node: NodeId, registry: &Registry) -> String {
    let mut out = String::new();
    dump_node(tree, node, registry, 0, &mut out);
    out
}

fn dump_node(tree: &Tree, node: NodeId, registry: &Registry, indent: usize, out: &mut String) {
    for _ in 0..indent {
        out.push_str("  ");
    }
    let symbol = tree.symbol(node);
    match registry.label(symbol) {
        Some(label) => out.push_str(label),
        None => {
            let _ = write!(out, "{symbol}");
        }
    }
    if !tree.surface(node).is_null() {
        let _ = write!(out, ":{}", fmt_surface(tree.surface(node), registry));
    }
    out.push('\n');
    for &child in tree.children(node) {
        dump_node(tree, child, registry, indent + 1, out);
    }
}
