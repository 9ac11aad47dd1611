//! Thompson-style automaton over trees: depth-aware transitions, a state
//! arena, and the fragment-stitching builder.

mod build;
mod nav;
mod state;

pub use build::{BuildError, build};
pub use nav::{Nav, NavKind};
pub use state::{ACCEPT, Arm, Automaton, Edge, State, StateId, StateKind};

#[cfg(test)]
mod build_tests;
