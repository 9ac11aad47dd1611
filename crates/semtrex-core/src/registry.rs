//! Symbol and structure registry.
//!
//! The registry is partitioned by context. Each partition maps symbol and
//! structure ids to their definitions and owns two monotonic counters for
//! id allocation. By-name lookups scan contexts in insertion order and
//! return the first hit, so resolution is deterministic.

use indexmap::IndexMap;

use crate::semid::{SemId, SemKind};

/// Definition of a symbol: a label plus the structure its surface carries.
#[derive(Debug, Clone)]
pub struct SymbolDef {
    pub label: String,
    pub structure: SemId,
}

/// Definition of a structure: a label plus its ordered parts.
#[derive(Debug, Clone)]
pub struct StructureDef {
    pub label: String,
    pub parts: Vec<SemId>,
}

#[derive(Debug, Default)]
struct ContextStore {
    symbols: IndexMap<u32, SymbolDef>,
    structures: IndexMap<u32, StructureDef>,
    /// Next id handed out by `define_symbol`. Ids start at 1; 0 is the
    /// null sentinel.
    next_symbol: u32,
    next_structure: u32,
}

impl ContextStore {
    fn new() -> Self {
        Self {
            symbols: IndexMap::new(),
            structures: IndexMap::new(),
            next_symbol: 1,
            next_structure: 1,
        }
    }
}

/// Process-local registry of symbol and structure definitions.
///
/// [`Registry::bootstrap`] installs the system definitions with fixed ids
/// before any user definition can be made, so user ids never collide with
/// them.
#[derive(Debug)]
pub struct Registry {
    contexts: IndexMap<u32, ContextStore>,
}

impl Registry {
    /// An empty registry with no definitions at all.
    pub fn new() -> Self {
        Self {
            contexts: IndexMap::new(),
        }
    }

    /// A registry with the system context populated (builtin structures
    /// and the `SEMTREX_*` operator symbols at their fixed ids).
    pub fn bootstrap() -> Self {
        let mut registry = Self::new();
        crate::builtins::install(&mut registry);
        registry
    }

    fn context_mut(&mut self, context: u32) -> &mut ContextStore {
        self.contexts
            .entry(context)
            .or_insert_with(ContextStore::new)
    }

    /// Define a symbol in `context`, allocating the next id there.
    pub fn define_symbol(&mut self, context: u32, structure: SemId, label: &str) -> SemId {
        let store = self.context_mut(context);
        let id = store.next_symbol;
        store.next_symbol += 1;
        store.symbols.insert(
            id,
            SymbolDef {
                label: label.to_owned(),
                structure,
            },
        );
        SemId::symbol(context, id)
    }

    /// Define a structure in `context`, allocating the next id there.
    pub fn define_structure(&mut self, context: u32, label: &str, parts: &[SemId]) -> SemId {
        let store = self.context_mut(context);
        let id = store.next_structure;
        store.next_structure += 1;
        store.structures.insert(
            id,
            StructureDef {
                label: label.to_owned(),
                parts: parts.to_vec(),
            },
        );
        SemId::structure(context, id)
    }

    /// Install a definition at a fixed id, bumping the allocator past it.
    ///
    /// Used by the builtin installer only; it must run before any user
    /// definitions in the same context.
    pub(crate) fn install_symbol(&mut self, id: SemId, structure: SemId, label: &str) {
        debug_assert_eq!(id.kind, SemKind::Symbol);
        let store = self.context_mut(id.context);
        store.symbols.insert(
            id.id,
            SymbolDef {
                label: label.to_owned(),
                structure,
            },
        );
        store.next_symbol = store.next_symbol.max(id.id + 1);
    }

    pub(crate) fn install_structure(&mut self, id: SemId, label: &str, parts: &[SemId]) {
        debug_assert_eq!(id.kind, SemKind::Structure);
        let store = self.context_mut(id.context);
        store.structures.insert(
            id.id,
            StructureDef {
                label: label.to_owned(),
                parts: parts.to_vec(),
            },
        );
        store.next_structure = store.next_structure.max(id.id + 1);
    }

    /// Definition of a symbol id, if registered.
    pub fn symbol_def(&self, id: SemId) -> Option<&SymbolDef> {
        if id.kind != SemKind::Symbol {
            return None;
        }
        self.contexts.get(&id.context)?.symbols.get(&id.id)
    }

    /// Definition of a structure id, if registered.
    pub fn structure_def(&self, id: SemId) -> Option<&StructureDef> {
        if id.kind != SemKind::Structure {
            return None;
        }
        self.contexts.get(&id.context)?.structures.get(&id.id)
    }

    /// Label of a symbol or structure id.
    pub fn label(&self, id: SemId) -> Option<&str> {
        match id.kind {
            SemKind::Symbol => self.symbol_def(id).map(|d| d.label.as_str()),
            SemKind::Structure => self.structure_def(id).map(|d| d.label.as_str()),
            _ => None,
        }
    }

    /// Resolve a symbol by label: first hit across contexts in
    /// insertion order.
    pub fn symbol_named(&self, label: &str) -> Option<SemId> {
        for (&context, store) in &self.contexts {
            for (&id, def) in &store.symbols {
                if def.label == label {
                    return Some(SemId::symbol(context, id));
                }
            }
        }
        None
    }

    /// Resolve a structure by label: first hit across contexts in
    /// insertion order.
    pub fn structure_named(&self, label: &str) -> Option<SemId> {
        for (&context, store) in &self.contexts {
            for (&id, def) in &store.structures {
                if def.label == label {
                    return Some(SemId::structure(context, id));
                }
            }
        }
        None
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
