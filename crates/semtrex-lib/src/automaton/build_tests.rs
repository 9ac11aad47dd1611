use semtrex_core::builtins::{structures, symbols as sym};
use semtrex_core::{Registry, SemId, Surface, Tree};

use super::build::{BuildError, build};
use crate::parser::parse;

fn registry() -> Registry {
    let mut registry = Registry::bootstrap();
    for label in ["A", "B", "G", "MY_INT"] {
        registry.define_symbol(1, structures::CSTRING, label);
    }
    registry
}

fn snapshot(input: &str) -> String {
    let registry = registry();
    let (tree, root) = parse(input, &registry).expect("pattern parses");
    match build(&tree, root) {
        Ok(automaton) => automaton.dump(&registry),
        Err(e) => format!("error: {e}\n"),
    }
}

#[test]
fn single_symbol() {
    insta::assert_snapshot!(snapshot("/A"), @r"
    0: accept
    1: symbol(A) <start> out=0:next
    ");
}

#[test]
fn symbol_set_and_negation_share_the_symbol_state() {
    insta::assert_snapshot!(snapshot("/{A,B}"), @r"
    0: accept
    1: symbol(A,B) <start> out=0:next
    ");
    insta::assert_snapshot!(snapshot("/!A"), @r"
    0: accept
    1: symbol!(A) <start> out=0:next
    ");
}

#[test]
fn value_literal() {
    insta::assert_snapshot!(snapshot("/MY_INT={1,2}"), @r"
    0: accept
    1: value(MY_INT=1,2) <start> out=0:next
    ");
}

#[test]
fn descent_sugar_emits_a_down_edge_and_an_up_exit() {
    insta::assert_snapshot!(snapshot("/A/(B,B)"), @r"
    0: accept
    1: symbol(A) <start> out=2:down
    2: symbol(B) out=3:next
    3: symbol(B) out=0:up(1)
    ");
}

#[test]
fn explicit_descend_state() {
    insta::assert_snapshot!(snapshot("//A"), @r"
    0: accept
    1: descend <start> out=2:down
    2: symbol(A) out=0:up(1)
    ");
}

#[test]
fn alternation_is_a_split() {
    insta::assert_snapshot!(snapshot("/A|B"), @r"
    0: accept
    1: split <start> out=2:none out1=3:none
    2: symbol(A) out=0:next
    3: symbol(B) out=0:next
    ");
}

#[test]
fn zero_or_more_loops_back_through_the_split() {
    insta::assert_snapshot!(snapshot("/A/B*"), @r"
    0: accept
    1: symbol(A) <start> out=2:down
    2: split out=3:none out1=0:up(1)
    3: symbol(B) out=2:next
    ");
}

#[test]
fn one_or_more_starts_at_the_body() {
    insta::assert_snapshot!(snapshot("/A/B+"), @r"
    0: accept
    1: symbol(A) <start> out=3:down
    2: split out=3:none out1=0:up(1)
    3: symbol(B) out=2:next
    ");
}

#[test]
fn zero_or_one_has_a_bypass_arm() {
    insta::assert_snapshot!(snapshot("/B?"), @r"
    0: accept
    1: split <start> out=2:none out1=0:none
    2: symbol(B) out=0:next
    ");
}

#[test]
fn group_wraps_open_and_close() {
    insta::assert_snapshot!(snapshot("/<G:A>"), @r"
    0: accept
    1: group-open(G,0) <start> out=3:none
    2: group-close(1) out=0:none
    3: symbol(A) out=2:next
    ");
}

#[test]
fn group_uids_reset_per_build() {
    let registry = registry();
    let (tree, root) = parse("/<G:A>", &registry).unwrap();
    let first = build(&tree, root).unwrap();
    let second = build(&tree, root).unwrap();
    assert_eq!(first.dump(&registry), second.dump(&registry));
}

#[test]
fn walk_and_not_are_structural_states() {
    insta::assert_snapshot!(snapshot("/%A"), @r"
    0: accept
    1: walk <start> out=2:none
    2: symbol(A) out=0:next
    ");
    insta::assert_snapshot!(snapshot("/~A"), @r"
    0: accept
    1: not <start> out=2:none out1=0:none
    2: symbol(A) out=0:next
    ");
}

// ─────────────────────────────────────────────────────────────────────────
// Malformed pattern trees
// ─────────────────────────────────────────────────────────────────────────

fn symbol_literal(tree: &mut Tree, symbol: SemId) -> semtrex_core::NodeId {
    let literal = tree.new_node(sym::SEMTREX_SYMBOL_LITERAL, Surface::Null);
    let payload = tree.new_node(sym::SEMTREX_SYMBOL, Surface::Id(symbol));
    tree.add_child(literal, payload);
    literal
}

#[test]
fn or_demands_exactly_two_children() {
    let mut tree = Tree::new();
    let or = tree.new_node(sym::SEMTREX_OR, Surface::Null);
    let only = symbol_literal(&mut tree, SemId::symbol(1, 1));
    tree.add_child(or, only);
    assert_eq!(
        build(&tree, or).unwrap_err(),
        BuildError::BadArity {
            op: "SEMTREX_OR",
            got: 1,
            expected: "exactly 2",
        }
    );
}

#[test]
fn empty_sequence_is_rejected() {
    let mut tree = Tree::new();
    let seq = tree.new_node(sym::SEMTREX_SEQUENCE, Surface::Null);
    assert_eq!(
        build(&tree, seq).unwrap_err(),
        BuildError::BadArity {
            op: "SEMTREX_SEQUENCE",
            got: 0,
            expected: "at least 1",
        }
    );
}

#[test]
fn quantifier_demands_one_child() {
    let mut tree = Tree::new();
    let star = tree.new_node(sym::SEMTREX_ZERO_OR_MORE, Surface::Null);
    let a = symbol_literal(&mut tree, SemId::symbol(1, 1));
    let b = symbol_literal(&mut tree, SemId::symbol(1, 2));
    tree.add_child(star, a);
    tree.add_child(star, b);
    assert_eq!(
        build(&tree, star).unwrap_err(),
        BuildError::BadArity {
            op: "SEMTREX_ZERO_OR_MORE",
            got: 2,
            expected: "exactly 1",
        }
    );
}

#[test]
fn group_without_capture_symbol_is_rejected() {
    let mut tree = Tree::new();
    let group = tree.new_node(sym::SEMTREX_GROUP, Surface::Null);
    let body = symbol_literal(&mut tree, SemId::symbol(1, 1));
    tree.add_child(group, body);
    assert_eq!(
        build(&tree, group).unwrap_err(),
        BuildError::BadShape {
            what: "SEMTREX_GROUP surface must be the capture symbol",
        }
    );
}

#[test]
fn non_operator_node_is_rejected() {
    let (tree, root) = Tree::with_root(SemId::symbol(1, 1), Surface::Null);
    assert_eq!(
        build(&tree, root).unwrap_err(),
        BuildError::BadShape {
            what: "node is not a SEMTREX_* operator",
        }
    );
}
