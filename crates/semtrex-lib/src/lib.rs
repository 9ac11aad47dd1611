//! Semtrex: regular expressions over semantic trees.
//!
//! A pattern string compiles to a Thompson-style automaton whose
//! transitions move a cursor through the target tree (down to a child,
//! across to a sibling, up and over). Matching is a backtracking walk of
//! that graph, tracking named capture groups.
//!
//! # Example
//!
//! ```
//! use semtrex_core::{Registry, Surface, Tree, builtins::structures};
//! use semtrex_lib::Semtrex;
//!
//! let mut registry = Registry::bootstrap();
//! let point = registry.define_symbol(1, structures::TREE, "POINT");
//! let x = registry.define_symbol(1, structures::INTEGER, "X");
//! let y = registry.define_symbol(1, structures::INTEGER, "Y");
//!
//! let (mut tree, root) = Tree::with_root(point, Surface::Null);
//! tree.new_child(root, x, Surface::Int(3));
//! tree.new_child(root, y, Surface::Int(4));
//!
//! let stx = Semtrex::parse("/POINT/(X,Y)", &registry).expect("valid pattern");
//! assert!(stx.matches(&tree, root).unwrap());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod automaton;
pub mod embody;
pub mod engine;
pub mod parser;
pub mod pattern;
pub mod printer;

pub use automaton::{Automaton, BuildError};
pub use embody::{embody_from_match, match_results_to_sem_map, stx_replace};
pub use engine::{
    FuelLimits, MatchError, MatchResult, NoopTracer, Tracer, match_by_symbol, matched_nodes,
};
pub use parser::ParseError;
pub use pattern::dump_pattern;
pub use printer::print_pattern;

use semtrex_core::{NodeId, Registry, Tree};

/// Errors from compiling a pattern string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// A compiled pattern: the pattern tree plus its automaton.
#[derive(Debug, Clone)]
pub struct Semtrex {
    pattern: Tree,
    pattern_root: NodeId,
    automaton: Automaton,
}

impl Semtrex {
    /// Parse and compile a pattern string. Labels resolve via `registry`.
    pub fn parse(source: &str, registry: &Registry) -> Result<Self, Error> {
        let (pattern, pattern_root) = parser::parse(source, registry)?;
        let automaton = automaton::build(&pattern, pattern_root)?;
        Ok(Self {
            pattern,
            pattern_root,
            automaton,
        })
    }

    /// Compile an already-built pattern tree.
    pub fn from_pattern(pattern: Tree, pattern_root: NodeId) -> Result<Self, BuildError> {
        let automaton = automaton::build(&pattern, pattern_root)?;
        Ok(Self {
            pattern,
            pattern_root,
            automaton,
        })
    }

    /// The pattern tree this automaton was compiled from.
    pub fn pattern(&self) -> (&Tree, NodeId) {
        (&self.pattern, self.pattern_root)
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Render the pattern back to surface syntax.
    pub fn print(&self, registry: &Registry) -> String {
        printer::print_pattern(&self.pattern, self.pattern_root, registry)
    }

    /// Boolean verdict against the subtree rooted at `root`.
    pub fn matches(&self, tree: &Tree, root: NodeId) -> Result<bool, MatchError> {
        Ok(self.captures(tree, root)?.is_some())
    }

    /// Match and return the completed capture groups, or `None` when the
    /// pattern does not match.
    pub fn captures(
        &self,
        tree: &Tree,
        root: NodeId,
    ) -> Result<Option<Vec<MatchResult>>, MatchError> {
        self.captures_with(tree, root, FuelLimits::default(), &mut NoopTracer)
    }

    /// As [`captures`](Self::captures), with explicit limits and tracing.
    pub fn captures_with<T: Tracer>(
        &self,
        tree: &Tree,
        root: NodeId,
        limits: FuelLimits,
        tracer: &mut T,
    ) -> Result<Option<Vec<MatchResult>>, MatchError> {
        engine::run(&self.automaton, tree, root, limits, tracer)
    }
}
