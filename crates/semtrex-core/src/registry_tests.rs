use crate::builtins::{structures, symbols};
use crate::registry::Registry;
use crate::semid::{NULL_STRUCTURE, NULL_SYMBOL, SemId};

#[test]
fn builtins_sit_at_fixed_ids() {
    let registry = Registry::bootstrap();

    assert_eq!(registry.label(structures::BIT), Some("BIT"));
    assert_eq!(registry.label(structures::TREE_PATH), Some("TREE_PATH"));
    assert_eq!(
        registry.label(symbols::SEMTREX_SYMBOL_LITERAL),
        Some("SEMTREX_SYMBOL_LITERAL")
    );
    assert_eq!(registry.label(symbols::SEMTREX_WALK), Some("SEMTREX_WALK"));
    assert_eq!(
        registry.label(symbols::SEMTREX_MATCH_SIBLINGS_COUNT),
        Some("SEMTREX_MATCH_SIBLINGS_COUNT")
    );
    assert_eq!(
        registry.label(symbols::REPLACEMENT_VALUE),
        Some("REPLACEMENT_VALUE")
    );

    assert_eq!(symbols::SEMTREX_SYMBOL_LITERAL.id, 20);
    assert_eq!(symbols::SEMTREX_WALK.id, 36);
    assert_eq!(symbols::SEMTREX_MATCH.id, 40);
    assert_eq!(symbols::REPLACEMENT_VALUE.id, 47);
}

#[test]
fn user_definitions_never_collide_with_builtins() {
    let mut registry = Registry::bootstrap();
    let id = registry.define_symbol(0, structures::INTEGER, "USER_SYM");
    assert!(id.id > symbols::REPLACEMENT_VALUE.id);
    assert_eq!(registry.label(id), Some("USER_SYM"));
}

#[test]
fn ids_allocate_per_context_partition() {
    let mut registry = Registry::new();
    let a = registry.define_symbol(1, NULL_STRUCTURE, "A");
    let b = registry.define_symbol(1, NULL_STRUCTURE, "B");
    let c = registry.define_symbol(2, NULL_STRUCTURE, "C");
    assert_eq!(a, SemId::symbol(1, 1));
    assert_eq!(b, SemId::symbol(1, 2));
    assert_eq!(c, SemId::symbol(2, 1));

    let s = registry.define_structure(1, "S", &[]);
    assert_eq!(s, SemId::structure(1, 1));
}

#[test]
fn by_name_lookup_is_first_hit_in_context_order() {
    let mut registry = Registry::new();
    let first = registry.define_symbol(3, NULL_STRUCTURE, "SHARED");
    let _second = registry.define_symbol(7, NULL_STRUCTURE, "SHARED");
    assert_eq!(registry.symbol_named("SHARED"), Some(first));
    assert_eq!(registry.symbol_named("ABSENT"), None);
}

#[test]
fn symbol_and_structure_namespaces_are_separate() {
    let mut registry = Registry::new();
    let sym = registry.define_symbol(1, NULL_STRUCTURE, "THING");
    let strukt = registry.define_structure(1, "THING", &[]);
    assert_eq!(registry.symbol_named("THING"), Some(sym));
    assert_eq!(registry.structure_named("THING"), Some(strukt));
    assert_ne!(sym, strukt);
}

#[test]
fn structure_parts_are_kept_in_order() {
    let mut registry = Registry::bootstrap();
    let pair = registry.define_structure(
        1,
        "PAIR",
        &[structures::INTEGER, structures::CSTRING],
    );
    let def = registry.structure_def(pair).unwrap();
    assert_eq!(def.parts, vec![structures::INTEGER, structures::CSTRING]);
}

#[test]
fn null_sentinels_are_not_registered() {
    let registry = Registry::bootstrap();
    assert_eq!(registry.label(NULL_SYMBOL), None);
    assert_eq!(registry.label(NULL_STRUCTURE), None);
}

#[test]
fn symbol_defs_record_their_structure() {
    let registry = Registry::bootstrap();
    let def = registry.symbol_def(symbols::SEMTREX_GROUP).unwrap();
    assert_eq!(def.structure, structures::SYMBOL);
}
