use semtrex_core::builtins::structures;
use semtrex_core::{NodeId, Registry, SemId, Surface, Tree};

use crate::engine::{FuelLimits, MatchError, NoopTracer, match_by_symbol, matched_nodes};
use crate::Semtrex;

fn registry() -> Registry {
    let mut registry = Registry::bootstrap();
    for label in [
        "P", "A", "B", "C", "G", "H", "MY_INT", "MY_CHAR", "TITLE", "lat", "lon", "HomeLocation",
        "PARENT", "child1", "DEEP", "DEEPER",
    ] {
        registry.define_symbol(1, structures::CSTRING, label);
    }
    registry
}

fn sym(registry: &Registry, label: &str) -> SemId {
    registry.symbol_named(label).expect("label defined")
}

fn compile(pattern: &str, registry: &Registry) -> Semtrex {
    Semtrex::parse(pattern, registry).expect("pattern compiles")
}

/// `P(A, B, C)`
fn p_abc(registry: &Registry) -> (Tree, NodeId) {
    let (mut tree, root) = Tree::with_root(sym(registry, "P"), Surface::Null);
    tree.new_child(root, sym(registry, "A"), Surface::Null);
    tree.new_child(root, sym(registry, "B"), Surface::Null);
    tree.new_child(root, sym(registry, "C"), Surface::Null);
    (tree, root)
}

/// `PARENT(child1(DEEP(DEEPER)))`
fn deep_tree(registry: &Registry) -> (Tree, NodeId) {
    let (mut tree, root) = Tree::with_root(sym(registry, "PARENT"), Surface::Null);
    let child1 = tree.new_child(root, sym(registry, "child1"), Surface::Null);
    let deep = tree.new_child(child1, sym(registry, "DEEP"), Surface::Null);
    tree.new_child(deep, sym(registry, "DEEPER"), Surface::Null);
    (tree, root)
}

#[test]
fn matches_the_root_symbol() {
    let registry = registry();
    let (tree, root) = Tree::with_root(sym(&registry, "A"), Surface::Null);
    assert!(compile("/A", &registry).matches(&tree, root).unwrap());
    assert!(!compile("/B", &registry).matches(&tree, root).unwrap());
}

#[test]
fn sequences_are_prefix_matching() {
    let registry = registry();
    let (tree, root) = p_abc(&registry);
    assert!(compile("/P/(A,B,C)", &registry).matches(&tree, root).unwrap());
    assert!(compile("/P/(A,B)", &registry).matches(&tree, root).unwrap());
    assert!(compile("/P/(A)", &registry).matches(&tree, root).unwrap());
    assert!(!compile("/P/(A,C)", &registry).matches(&tree, root).unwrap());
    assert!(!compile("/P/(B)", &registry).matches(&tree, root).unwrap());
}

#[test]
fn descent_consumes_exactly_one_level() {
    let registry = registry();
    let (tree, root) = deep_tree(&registry);
    assert!(compile("/PARENT/child1", &registry).matches(&tree, root).unwrap());
    // DEEP is two levels down, not one.
    assert!(!compile("/PARENT/DEEP", &registry).matches(&tree, root).unwrap());
    assert!(
        compile("/PARENT/child1/DEEP/DEEPER", &registry)
            .matches(&tree, root)
            .unwrap()
    );
}

#[test]
fn explicit_descend_ignores_the_root_symbol() {
    let registry = registry();
    let (tree, root) = p_abc(&registry);
    assert!(compile("//A", &registry).matches(&tree, root).unwrap());
    assert!(!compile("//B", &registry).matches(&tree, root).unwrap());

    let (leaf_tree, leaf) = Tree::with_root(sym(&registry, "A"), Surface::Null);
    assert!(!compile("//A", &registry).matches(&leaf_tree, leaf).unwrap());
}

#[test]
fn any_matches_any_symbol_but_not_absence() {
    let registry = registry();
    let (tree, root) = p_abc(&registry);
    assert!(compile("/P/(A,.,C)", &registry).matches(&tree, root).unwrap());
    assert!(compile("/.", &registry).matches(&tree, root).unwrap());

    let (empty_tree, empty) = Tree::with_root(sym(&registry, "P"), Surface::Null);
    assert!(!compile("/P/.", &registry).matches(&empty_tree, empty).unwrap());
}

#[test]
fn quantifiers_over_children() {
    let registry = registry();
    let (tree, root) = p_abc(&registry);
    assert!(compile("/P/.+", &registry).matches(&tree, root).unwrap());
    assert!(compile("/P/.*", &registry).matches(&tree, root).unwrap());
    assert!(compile("/P/(A,B?,C)", &registry).matches(&tree, root).unwrap());

    let (empty_tree, empty) = Tree::with_root(sym(&registry, "P"), Surface::Null);
    assert!(!compile("/P/.+", &registry).matches(&empty_tree, empty).unwrap());
    assert!(compile("/P/.*", &registry).matches(&empty_tree, empty).unwrap());
}

#[test]
fn optional_element_may_be_absent() {
    let registry = registry();
    let (mut tree, root) = Tree::with_root(sym(&registry, "P"), Surface::Null);
    tree.new_child(root, sym(&registry, "B"), Surface::Null);
    assert!(compile("/P/(A?,B)", &registry).matches(&tree, root).unwrap());
}

#[test]
fn alternation_backtracks_between_branches() {
    let registry = registry();
    let (mut tree, root) = Tree::with_root(sym(&registry, "P"), Surface::Null);
    tree.new_child(root, sym(&registry, "A"), Surface::Null);
    tree.new_child(root, sym(&registry, "C"), Surface::Null);
    let stx = compile("/P/((A,B)|(A,C))", &registry);
    assert!(stx.matches(&tree, root).unwrap());

    let (a_tree, a_root) = Tree::with_root(sym(&registry, "A"), Surface::Null);
    assert!(compile("/A|B", &registry).matches(&a_tree, a_root).unwrap());
    assert!(compile("/B|A", &registry).matches(&a_tree, a_root).unwrap());
    assert!(!compile("/B|C", &registry).matches(&a_tree, a_root).unwrap());
}

#[test]
fn value_literals_compare_structurally() {
    let registry = registry();
    let (tree, root) = Tree::with_root(sym(&registry, "MY_INT"), Surface::Int(42));
    assert!(compile("/MY_INT=42", &registry).matches(&tree, root).unwrap());
    assert!(!compile("/MY_INT=41", &registry).matches(&tree, root).unwrap());
    // An integer surface is not a float surface.
    assert!(!compile("/MY_INT=42.0", &registry).matches(&tree, root).unwrap());

    let (chars, char_root) = Tree::with_root(sym(&registry, "MY_CHAR"), Surface::Char('x'));
    assert!(compile("/MY_CHAR='x'", &registry).matches(&chars, char_root).unwrap());
    assert!(!compile("/MY_CHAR='y'", &registry).matches(&chars, char_root).unwrap());

    let (titles, title_root) =
        Tree::with_root(sym(&registry, "TITLE"), Surface::Str("hi\n".into()));
    assert!(
        compile(r#"/TITLE="hi\n""#, &registry)
            .matches(&titles, title_root)
            .unwrap()
    );
}

#[test]
fn value_sets_and_negation() {
    let registry = registry();
    let (tree, root) = Tree::with_root(sym(&registry, "MY_INT"), Surface::Int(42));
    assert!(
        compile("/MY_INT={1,2,42}", &registry)
            .matches(&tree, root)
            .unwrap()
    );
    assert!(
        !compile("/MY_INT!={1,2,42}", &registry)
            .matches(&tree, root)
            .unwrap()
    );
    assert!(compile("/MY_INT!=99", &registry).matches(&tree, root).unwrap());
}

#[test]
fn symbol_negation_and_sets() {
    let registry = registry();
    let (tree, root) = Tree::with_root(sym(&registry, "A"), Surface::Null);
    assert!(!compile("/!A", &registry).matches(&tree, root).unwrap());
    assert!(compile("/!B", &registry).matches(&tree, root).unwrap());
    assert!(!compile("/!{A,B}", &registry).matches(&tree, root).unwrap());
    assert!(compile("/{A,B}", &registry).matches(&tree, root).unwrap());

    let (c_tree, c_root) = Tree::with_root(sym(&registry, "C"), Surface::Null);
    assert!(compile("/!{A,B}", &registry).matches(&c_tree, c_root).unwrap());
    assert!(!compile("/{A,B}", &registry).matches(&c_tree, c_root).unwrap());
}

#[test]
fn negation_is_an_isolated_sub_match() {
    let registry = registry();
    let (tree, root) = Tree::with_root(sym(&registry, "A"), Surface::Null);
    assert!(!compile("/~A", &registry).matches(&tree, root).unwrap());
    assert!(compile("/~B", &registry).matches(&tree, root).unwrap());
}

#[test]
fn double_negation_preserves_matchability() {
    let registry = registry();
    let (a_tree, a_root) = Tree::with_root(sym(&registry, "A"), Surface::Null);
    let (b_tree, b_root) = Tree::with_root(sym(&registry, "B"), Surface::Null);
    for (tree, root) in [(&a_tree, a_root), (&b_tree, b_root)] {
        let plain = compile("/A", &registry).matches(tree, root).unwrap();
        let doubled = compile("/~~A", &registry).matches(tree, root).unwrap();
        assert_eq!(plain, doubled);
    }
}

#[test]
fn negation_at_a_past_end_cursor() {
    let registry = registry();
    let (mut tree, root) = Tree::with_root(sym(&registry, "P"), Surface::Null);
    tree.new_child(root, sym(&registry, "A"), Surface::Null);
    // After A the cursor is past the last child; ~B holds there.
    assert!(compile("/P/(A,~B)", &registry).matches(&tree, root).unwrap());

    tree.new_child(root, sym(&registry, "B"), Surface::Null);
    assert!(!compile("/P/(A,~B)", &registry).matches(&tree, root).unwrap());
}

#[test]
fn negation_discards_inner_captures() {
    let registry = registry();
    let (tree, root) = Tree::with_root(sym(&registry, "B"), Surface::Null);
    let results = compile("/~<G:A>", &registry)
        .captures(&tree, root)
        .unwrap()
        .expect("negation holds on B");
    assert!(results.is_empty());
}

#[test]
fn walk_finds_matches_anywhere_in_the_subtree() {
    let registry = registry();
    let (tree, root) = deep_tree(&registry);
    assert!(compile("/%DEEPER", &registry).matches(&tree, root).unwrap());
    assert!(compile("/%DEEP/DEEPER", &registry).matches(&tree, root).unwrap());
    assert!(!compile("/%DEEP/A", &registry).matches(&tree, root).unwrap());
    assert!(!compile("/%A", &registry).matches(&tree, root).unwrap());
}

#[test]
fn walk_prefers_the_shallowest_leftmost_match() {
    let registry = registry();
    let (tree, root) = deep_tree(&registry);
    let results = compile("/%<G:.>", &registry)
        .captures(&tree, root)
        .unwrap()
        .expect("walk matches");
    // First DFS position that matches `.` is the walk origin itself.
    assert_eq!(results[0].path, Vec::<u32>::new());
}

#[test]
fn captures_record_symbol_path_and_span() {
    let registry = registry();
    let (mut tree, root) = Tree::with_root(sym(&registry, "HomeLocation"), Surface::Null);
    tree.new_child(root, sym(&registry, "lat"), Surface::Float(42.25));
    tree.new_child(root, sym(&registry, "lon"), Surface::Float(73.25));

    let stx = compile("/HomeLocation/(<lat:lat>,<lon:lon>)", &registry);
    let results = stx.captures(&tree, root).unwrap().expect("matches");
    assert_eq!(results.len(), 2);

    assert_eq!(results[0].symbol, sym(&registry, "lat"));
    assert_eq!(results[0].path, vec![1]);
    assert_eq!(results[0].siblings_count, 1);

    assert_eq!(results[1].symbol, sym(&registry, "lon"));
    assert_eq!(results[1].path, vec![2]);
    assert_eq!(results[1].siblings_count, 1);

    // Pre-order: the first capture's path is lexicographically first.
    assert!(results[0].path <= results[1].path);
}

#[test]
fn nested_groups_nest_their_captures() {
    let registry = registry();
    let (mut tree, root) = Tree::with_root(sym(&registry, "P"), Surface::Null);
    tree.new_child(root, sym(&registry, "A"), Surface::Null);

    let results = compile("/<G:P/<H:A>>", &registry)
        .captures(&tree, root)
        .unwrap()
        .expect("matches");
    assert_eq!(results.len(), 1);
    let g = &results[0];
    assert_eq!(g.symbol, sym(&registry, "G"));
    assert_eq!(g.path, Vec::<u32>::new());
    assert_eq!(g.siblings_count, 1);
    assert_eq!(g.children.len(), 1);
    assert_eq!(g.children[0].symbol, sym(&registry, "H"));
    assert_eq!(g.children[0].path, vec![1]);

    let h = match_by_symbol(&results, sym(&registry, "H")).expect("nested capture found");
    assert_eq!(h.path, vec![1]);
}

#[test]
fn repetition_spans_count_every_matched_sibling() {
    let registry = registry();
    let (mut tree, root) = Tree::with_root(sym(&registry, "P"), Surface::Null);
    for _ in 0..3 {
        tree.new_child(root, sym(&registry, "A"), Surface::Null);
    }
    let results = compile("/P/<G:A+>", &registry)
        .captures(&tree, root)
        .unwrap()
        .expect("matches");
    assert_eq!(results[0].siblings_count, 3);
    assert_eq!(results[0].path, vec![1]);

    let nodes = matched_nodes(&tree, root, &results[0]);
    assert_eq!(nodes.len(), 3);
    assert!(nodes.iter().all(|&n| tree.symbol(n) == sym(&registry, "A")));
}

#[test]
fn same_parent_spans_use_the_index_difference() {
    let registry = registry();
    let (tree, root) = p_abc(&registry);
    let results = compile("/P/(<G:A,B>,C)", &registry)
        .captures(&tree, root)
        .unwrap()
        .expect("matches");
    assert_eq!(results[0].siblings_count, 2);
    let nodes = matched_nodes(&tree, root, &results[0]);
    assert_eq!(nodes.len(), 2);
}

#[test]
fn backtracking_discards_captures_of_failed_branches() {
    let registry = registry();
    let (mut tree, root) = Tree::with_root(sym(&registry, "P"), Surface::Null);
    tree.new_child(root, sym(&registry, "A"), Surface::Null);
    tree.new_child(root, sym(&registry, "C"), Surface::Null);

    let results = compile("/P/((<G:A>,B)|(<G:A>,C))", &registry)
        .captures(&tree, root)
        .unwrap()
        .expect("second branch matches");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].symbol, sym(&registry, "G"));
    assert_eq!(results[0].path, vec![1]);
}

#[test]
fn walk_captures_the_node_it_lands_on() {
    let registry = registry();
    let (tree, root) = deep_tree(&registry);
    let results = compile("/%<G:DEEPER>", &registry)
        .captures(&tree, root)
        .unwrap()
        .expect("matches");
    assert_eq!(results[0].path, vec![1, 1, 1]);
    assert_eq!(results[0].siblings_count, 1);
}

#[test]
fn match_bool_iff_captures_present() {
    let registry = registry();
    let (tree, root) = p_abc(&registry);
    for pattern in ["/P/(A,B)", "/P/(A,C)", "/%B", "/~P", "/P/<G:.+>"] {
        let stx = compile(pattern, &registry);
        let matched = stx.matches(&tree, root).unwrap();
        let results = stx.captures(&tree, root).unwrap();
        assert_eq!(matched, results.is_some(), "pattern {pattern}");
    }
}

#[test]
fn non_consuming_loop_burns_fuel_instead_of_hanging() {
    let registry = registry();
    let (tree, root) = Tree::with_root(sym(&registry, "B"), Surface::Null);
    let stx = compile("/(~A)*", &registry);
    let limits = FuelLimits {
        step_fuel: 500,
        not_depth: 8,
    };
    let err = stx
        .captures_with(&tree, root, limits, &mut NoopTracer)
        .unwrap_err();
    assert_eq!(err, MatchError::StepFuelExhausted { limit: 500 });
}

#[test]
fn deep_negation_nesting_is_bounded() {
    let registry = registry();
    let (tree, root) = Tree::with_root(sym(&registry, "B"), Surface::Null);
    let stx = compile("/~~~A", &registry);
    let limits = FuelLimits {
        step_fuel: 10_000,
        not_depth: 2,
    };
    let err = stx
        .captures_with(&tree, root, limits, &mut NoopTracer)
        .unwrap_err();
    assert_eq!(err, MatchError::NotDepthExceeded { limit: 2 });
}
