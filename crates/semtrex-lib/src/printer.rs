//! Pattern pretty-printer.
//!
//! Emits the `/`-prefixed surface syntax for a pattern tree, inserting
//! parentheses only where the grammar demands them, so every valid pattern
//! re-parses to a structurally identical tree.

use std::fmt::Write;

use semtrex_core::builtins::symbols as sym;
use semtrex_core::{NodeId, Registry, SemId, Surface, Tree};

/// Where a subexpression is being printed; decides parenthesization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ctx {
    /// Alternation level: everything may appear bare.
    Alt,
    /// Operand of `|`: sequences bare, alternations parenthesized.
    SeqOperand,
    /// Element level (sequence operand, quantifier/prefix body):
    /// sequences and alternations both need parentheses.
    Element,
}

/// Render the pattern rooted at `node` back to surface syntax.
pub fn print_pattern(tree: &Tree, node: NodeId, registry: &Registry) -> String {
    let mut out = String::from("/");
    print_expr(tree, node, registry, Ctx::Alt, &mut out);
    out
}

fn print_expr(tree: &Tree, node: NodeId, registry: &Registry, ctx: Ctx, out: &mut String) {
    let symbol = tree.symbol(node);
    let children = tree.children(node);

    if symbol == sym::SEMTREX_OR {
        let parens = ctx != Ctx::Alt;
        if parens {
            out.push('(');
        }
        print_expr(tree, children[0], registry, Ctx::SeqOperand, out);
        out.push('|');
        print_expr(tree, children[1], registry, Ctx::Alt, out);
        if parens {
            out.push(')');
        }
        return;
    }

    if symbol == sym::SEMTREX_SEQUENCE {
        let parens = ctx == Ctx::Element;
        if parens {
            out.push('(');
        }
        for (i, &child) in children.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            print_expr(tree, child, registry, Ctx::Element, out);
        }
        if parens {
            out.push(')');
        }
        return;
    }

    if let Some(suffix) = quantifier_suffix(symbol) {
        print_expr(tree, children[0], registry, Ctx::Element, out);
        out.push(suffix);
        return;
    }

    match symbol {
        s if s == sym::SEMTREX_WALK => {
            out.push('%');
            print_expr(tree, children[0], registry, Ctx::Element, out);
        }
        s if s == sym::SEMTREX_NOT => {
            out.push('~');
            print_expr(tree, children[0], registry, Ctx::Element, out);
        }
        s if s == sym::SEMTREX_DESCEND => {
            out.push('/');
            print_expr(tree, children[0], registry, Ctx::Element, out);
        }
        s if s == sym::SEMTREX_GROUP => {
            out.push('<');
            if let Surface::Id(capture) = tree.surface(node) {
                push_label(*capture, registry, out);
            }
            out.push(':');
            print_expr(tree, children[0], registry, Ctx::Alt, out);
            out.push('>');
        }
        s if s == sym::SEMTREX_SYMBOL_ANY => out.push('.'),
        s if s == sym::SEMTREX_SYMBOL_LITERAL => {
            print_symbol_spec(tree, children[0], registry, out);
            if let Some(&descent) = children.get(1) {
                out.push('/');
                print_expr(tree, descent, registry, Ctx::Element, out);
            }
        }
        s if s == sym::SEMTREX_SYMBOL_LITERAL_NOT => {
            out.push('!');
            print_symbol_spec(tree, children[0], registry, out);
        }
        s if s == sym::SEMTREX_VALUE_LITERAL => {
            print_value_literal(tree, node, registry, false, out);
        }
        s if s == sym::SEMTREX_VALUE_LITERAL_NOT => {
            print_value_literal(tree, node, registry, true, out);
        }
        _ => {
            // Not an operator node; render its label so malformed trees
            // are at least visible.
            push_label(symbol, registry, out);
        }
    }
}

fn quantifier_suffix(symbol: SemId) -> Option<char> {
    if symbol == sym::SEMTREX_ZERO_OR_MORE {
        Some('*')
    } else if symbol == sym::SEMTREX_ONE_OR_MORE {
        Some('+')
    } else if symbol == sym::SEMTREX_ZERO_OR_ONE {
        Some('?')
    } else {
        None
    }
}

/// A `SEMTREX_SYMBOL` payload or a `SEMTREX_SYMBOL_SET` of them.
fn print_symbol_spec(tree: &Tree, node: NodeId, registry: &Registry, out: &mut String) {
    if tree.symbol(node) == sym::SEMTREX_SYMBOL_SET {
        out.push('{');
        for (i, &child) in tree.children(node).iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            if let Surface::Id(id) = tree.surface(child) {
                push_label(*id, registry, out);
            }
        }
        out.push('}');
        return;
    }
    if let Surface::Id(id) = tree.surface(node) {
        push_label(*id, registry, out);
    }
}

fn print_value_literal(
    tree: &Tree,
    node: NodeId,
    registry: &Registry,
    negated: bool,
    out: &mut String,
) {
    let payload = tree.children(node)[0];
    let is_set = tree.symbol(payload) == sym::SEMTREX_VALUE_SET;
    let first_value = if is_set {
        tree.children(payload)[0]
    } else {
        payload
    };
    push_label(tree.symbol(first_value), registry, out);
    out.push_str(if negated { "!=" } else { "=" });
    if is_set {
        out.push('{');
        for (i, &value) in tree.children(payload).iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            print_value(tree.surface(value), out);
        }
        out.push('}');
    } else {
        print_value(tree.surface(payload), out);
    }
}

fn print_value(surface: &Surface, out: &mut String) {
    match surface {
        Surface::Int(v) => {
            let _ = write!(out, "{v}");
        }
        Surface::Float(v) => {
            let _ = write!(out, "{v:?}");
        }
        Surface::Char(c) => {
            let _ = write!(out, "'{c}'");
        }
        Surface::Str(s) => {
            out.push('"');
            for c in s.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    _ => out.push(c),
                }
            }
            out.push('"');
        }
        // Value literals in the surface syntax are only ever the four
        // literal forms above.
        _ => {}
    }
}

fn push_label(id: SemId, registry: &Registry, out: &mut String) {
    match registry.label(id) {
        Some(label) => out.push_str(label),
        None => {
            let _ = write!(out, "{id}");
        }
    }
}
