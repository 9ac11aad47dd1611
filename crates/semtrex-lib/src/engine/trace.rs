//! Execution tracing for the matcher.
//!
//! The matcher is generic over a tracer so that the no-op implementation
//! is optimized away entirely; a collecting tracer costs nothing unless
//! you ask for one.

use semtrex_core::{NodeId, SemId};

use super::cursor::Cursor;
use crate::automaton::{Nav, StateId};

/// Hooks called as the matcher runs. All methods default to no-ops.
pub trait Tracer {
    fn state(&mut self, _id: StateId, _cursor: Cursor) {}
    fn nav(&mut self, _nav: Nav, _cursor: Cursor) {}
    fn backtrack(&mut self) {}
    fn group_open(&mut self, _symbol: SemId) {}
    fn group_close(&mut self, _symbol: SemId) {}
    fn walk_step(&mut self, _node: NodeId) {}
}

/// The default tracer; every hook compiles to nothing.
pub struct NoopTracer;

impl Tracer for NoopTracer {}

/// Collects a line per event, for tests and debugging.
#[derive(Debug, Default)]
pub struct CollectingTracer {
    pub lines: Vec<String>,
}

impl Tracer for CollectingTracer {
    fn state(&mut self, id: StateId, cursor: Cursor) {
        self.lines.push(format!("state {id} at {cursor:?}"));
    }

    fn nav(&mut self, nav: Nav, cursor: Cursor) {
        self.lines.push(format!("nav {nav:?} -> {cursor:?}"));
    }

    fn backtrack(&mut self) {
        self.lines.push("backtrack".to_owned());
    }

    fn group_open(&mut self, symbol: SemId) {
        self.lines.push(format!("open {symbol}"));
    }

    fn group_close(&mut self, symbol: SemId) {
        self.lines.push(format!("close {symbol}"));
    }

    fn walk_step(&mut self, node: NodeId) {
        self.lines.push(format!("walk -> {node}"));
    }
}
