//! System definitions installed at fixed ids.
//!
//! Ids here are part of the compatibility surface: serialized trees refer
//! to them, so they never move. The installer writes them into the system
//! context (0) and bumps the allocators past the largest installed id.

use crate::registry::Registry;
use crate::semid::SemId;

/// Builtin structures, context 0, ids 1..=10.
pub mod structures {
    use crate::semid::SemId;

    pub const BIT: SemId = SemId::structure(0, 1);
    pub const INTEGER: SemId = SemId::structure(0, 2);
    pub const FLOAT: SemId = SemId::structure(0, 3);
    pub const CHAR: SemId = SemId::structure(0, 4);
    pub const CSTRING: SemId = SemId::structure(0, 5);
    pub const SYMBOL: SemId = SemId::structure(0, 6);
    pub const BLOB: SemId = SemId::structure(0, 7);
    pub const INTEGER64: SemId = SemId::structure(0, 8);
    pub const TREE: SemId = SemId::structure(0, 9);
    pub const TREE_PATH: SemId = SemId::structure(0, 10);
}

/// Builtin symbols, context 0.
///
/// The `SEMTREX_*` operators sit at 20..=36 and tag pattern-tree nodes;
/// 40..=43 describe match results; 44..=47 are used by the semantic-map
/// collaborator.
pub mod symbols {
    use crate::semid::SemId;

    pub const SEMTREX_SYMBOL_LITERAL: SemId = SemId::symbol(0, 20);
    pub const SEMTREX_SYMBOL_LITERAL_NOT: SemId = SemId::symbol(0, 21);
    pub const SEMTREX_SYMBOL: SemId = SemId::symbol(0, 22);
    pub const SEMTREX_SYMBOL_SET: SemId = SemId::symbol(0, 23);
    pub const SEMTREX_SYMBOL_ANY: SemId = SemId::symbol(0, 24);
    pub const SEMTREX_SEQUENCE: SemId = SemId::symbol(0, 25);
    pub const SEMTREX_OR: SemId = SemId::symbol(0, 26);
    pub const SEMTREX_NOT: SemId = SemId::symbol(0, 27);
    pub const SEMTREX_ZERO_OR_MORE: SemId = SemId::symbol(0, 28);
    pub const SEMTREX_ONE_OR_MORE: SemId = SemId::symbol(0, 29);
    pub const SEMTREX_ZERO_OR_ONE: SemId = SemId::symbol(0, 30);
    pub const SEMTREX_VALUE_LITERAL: SemId = SemId::symbol(0, 31);
    pub const SEMTREX_VALUE_LITERAL_NOT: SemId = SemId::symbol(0, 32);
    pub const SEMTREX_VALUE_SET: SemId = SemId::symbol(0, 33);
    pub const SEMTREX_GROUP: SemId = SemId::symbol(0, 34);
    pub const SEMTREX_DESCEND: SemId = SemId::symbol(0, 35);
    pub const SEMTREX_WALK: SemId = SemId::symbol(0, 36);

    pub const SEMTREX_MATCH: SemId = SemId::symbol(0, 40);
    pub const SEMTREX_MATCH_SYMBOL: SemId = SemId::symbol(0, 41);
    pub const SEMTREX_MATCH_PATH: SemId = SemId::symbol(0, 42);
    pub const SEMTREX_MATCH_SIBLINGS_COUNT: SemId = SemId::symbol(0, 43);

    pub const SEMANTIC_MAP: SemId = SemId::symbol(0, 44);
    pub const SEMANTIC_LINK: SemId = SemId::symbol(0, 45);
    pub const USAGE: SemId = SemId::symbol(0, 46);
    pub const REPLACEMENT_VALUE: SemId = SemId::symbol(0, 47);
}

pub(crate) fn install(registry: &mut Registry) {
    use structures as st;
    use symbols as sy;

    let structure_table: [(SemId, &str); 10] = [
        (st::BIT, "BIT"),
        (st::INTEGER, "INTEGER"),
        (st::FLOAT, "FLOAT"),
        (st::CHAR, "CHAR"),
        (st::CSTRING, "CSTRING"),
        (st::SYMBOL, "SYMBOL"),
        (st::BLOB, "BLOB"),
        (st::INTEGER64, "INTEGER64"),
        (st::TREE, "TREE"),
        (st::TREE_PATH, "TREE_PATH"),
    ];
    for (id, label) in structure_table {
        registry.install_structure(id, label, &[]);
    }

    let symbol_table: [(SemId, SemId, &str); 25] = [
        (sy::SEMTREX_SYMBOL_LITERAL, st::TREE, "SEMTREX_SYMBOL_LITERAL"),
        (
            sy::SEMTREX_SYMBOL_LITERAL_NOT,
            st::TREE,
            "SEMTREX_SYMBOL_LITERAL_NOT",
        ),
        (sy::SEMTREX_SYMBOL, st::SYMBOL, "SEMTREX_SYMBOL"),
        (sy::SEMTREX_SYMBOL_SET, st::TREE, "SEMTREX_SYMBOL_SET"),
        (sy::SEMTREX_SYMBOL_ANY, st::TREE, "SEMTREX_SYMBOL_ANY"),
        (sy::SEMTREX_SEQUENCE, st::TREE, "SEMTREX_SEQUENCE"),
        (sy::SEMTREX_OR, st::TREE, "SEMTREX_OR"),
        (sy::SEMTREX_NOT, st::TREE, "SEMTREX_NOT"),
        (sy::SEMTREX_ZERO_OR_MORE, st::TREE, "SEMTREX_ZERO_OR_MORE"),
        (sy::SEMTREX_ONE_OR_MORE, st::TREE, "SEMTREX_ONE_OR_MORE"),
        (sy::SEMTREX_ZERO_OR_ONE, st::TREE, "SEMTREX_ZERO_OR_ONE"),
        (sy::SEMTREX_VALUE_LITERAL, st::TREE, "SEMTREX_VALUE_LITERAL"),
        (
            sy::SEMTREX_VALUE_LITERAL_NOT,
            st::TREE,
            "SEMTREX_VALUE_LITERAL_NOT",
        ),
        (sy::SEMTREX_VALUE_SET, st::TREE, "SEMTREX_VALUE_SET"),
        (sy::SEMTREX_GROUP, st::SYMBOL, "SEMTREX_GROUP"),
        (sy::SEMTREX_DESCEND, st::TREE, "SEMTREX_DESCEND"),
        (sy::SEMTREX_WALK, st::TREE, "SEMTREX_WALK"),
        (sy::SEMTREX_MATCH, st::TREE, "SEMTREX_MATCH"),
        (sy::SEMTREX_MATCH_SYMBOL, st::SYMBOL, "SEMTREX_MATCH_SYMBOL"),
        (sy::SEMTREX_MATCH_PATH, st::TREE_PATH, "SEMTREX_MATCH_PATH"),
        (
            sy::SEMTREX_MATCH_SIBLINGS_COUNT,
            st::INTEGER,
            "SEMTREX_MATCH_SIBLINGS_COUNT",
        ),
        (sy::SEMANTIC_MAP, st::TREE, "SEMANTIC_MAP"),
        (sy::SEMANTIC_LINK, st::TREE, "SEMANTIC_LINK"),
        (sy::USAGE, st::SYMBOL, "USAGE"),
        (sy::REPLACEMENT_VALUE, st::TREE, "REPLACEMENT_VALUE"),
    ];
    for (id, structure, label) in symbol_table {
        registry.install_symbol(id, structure, label);
    }
}
