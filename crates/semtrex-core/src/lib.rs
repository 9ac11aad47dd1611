//! Core data structures for Semtrex: semantic identifiers, the
//! symbol/structure registry, and ordered semantic trees with their
//! serialized forms.
//!
//! # Example
//!
//! ```
//! use semtrex_core::{Registry, Surface, Tree, builtins::structures};
//!
//! let mut registry = Registry::bootstrap();
//! let task = registry.define_symbol(1, structures::TREE, "TASK");
//! let title = registry.define_symbol(1, structures::CSTRING, "TITLE");
//!
//! let (mut tree, root) = Tree::with_root(task, Surface::Null);
//! tree.new_child(root, title, Surface::Str("write docs".into()));
//! assert_eq!(tree.child_count(root), 1);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod binary;
pub mod builtins;
pub mod json;
pub mod registry;
pub mod semid;
pub mod surface;
pub mod text;
pub mod tree;

pub use registry::{Registry, StructureDef, SymbolDef};
pub use semid::{NULL_STRUCTURE, NULL_SYMBOL, SemId, SemKind};
pub use surface::Surface;
pub use tree::{NodeId, Tree, TreeError, TreePath};

#[cfg(test)]
mod registry_tests;
