//! Backtracking execution of a compiled automaton against a target tree.
//!
//! The machine state is `(state, cursor, captures)` plus a checkpoint
//! stack. Failure pops the most recent branch point; an empty stack means
//! "no match", which is a result, not an error. The only errors are the
//! resource limits: the surface grammar can express non-consuming loops
//! like `(~X)*`, so the matcher runs on fuel rather than trusting every
//! pattern to terminate.

use semtrex_core::{NodeId, Tree};

use super::checkpoint::{CaptureState, Checkpoint, OpenGroup};
use super::cursor::{self, Cursor};
use super::result::MatchResult;
use super::trace::Tracer;
use crate::automaton::{Automaton, Edge, StateId, StateKind};

/// Runtime limits for a single match call.
#[derive(Debug, Clone, Copy)]
pub struct FuelLimits {
    /// Maximum machine steps, shared with negation sub-matches.
    pub step_fuel: u32,
    /// Maximum nesting of `~` sub-matches.
    pub not_depth: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            step_fuel: 1_000_000,
            not_depth: 64,
        }
    }
}

/// Resource errors. "No match" is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("matcher exhausted its step fuel ({limit} steps)")]
    StepFuelExhausted { limit: u32 },
    #[error("negation sub-matches nested deeper than {limit}")]
    NotDepthExceeded { limit: u32 },
}

/// Run `automaton` against the subtree rooted at `root`.
///
/// `Ok(Some(results))` on a match (the completed top-level captures, in
/// pre-order), `Ok(None)` on no match.
pub fn run<T: Tracer>(
    automaton: &Automaton,
    tree: &Tree,
    root: NodeId,
    limits: FuelLimits,
    tracer: &mut T,
) -> Result<Option<Vec<MatchResult>>, MatchError> {
    let mut machine = Machine {
        automaton,
        tree,
        limits,
        stack: Vec::new(),
        captures: CaptureState::default(),
        cursor: Cursor::At(root),
        state: automaton.start(),
        fuel: limits.step_fuel,
        not_depth: limits.not_depth,
        tracer,
    };
    machine.run(None)
}

struct Machine<'m, T: Tracer> {
    automaton: &'m Automaton,
    tree: &'m Tree,
    limits: FuelLimits,
    stack: Vec<Checkpoint>,
    captures: CaptureState,
    cursor: Cursor,
    state: StateId,
    fuel: u32,
    not_depth: u32,
    tracer: &'m mut T,
}

impl<T: Tracer> Machine<'_, T> {
    /// The dispatch loop. With `stop` set this is a negation sub-match:
    /// reaching the stop state is acceptance and captures are discarded
    /// by the caller.
    fn run(&mut self, stop: Option<StateId>) -> Result<Option<Vec<MatchResult>>, MatchError> {
        let automaton = self.automaton;
        loop {
            if stop == Some(self.state) {
                return Ok(Some(Vec::new()));
            }
            if self.fuel == 0 {
                return Err(MatchError::StepFuelExhausted {
                    limit: self.limits.step_fuel,
                });
            }
            self.fuel -= 1;
            self.tracer.state(self.state, self.cursor);

            let state = automaton.state(self.state);
            let alive = match &state.kind {
                StateKind::Accept => {
                    return Ok(Some(std::mem::take(&mut self.captures.completed)));
                }
                StateKind::Symbol { not, symbols } => match self.cursor.node() {
                    None => self.backtrack(),
                    Some(node) => {
                        let mut matched = symbols.contains(&self.tree.symbol(node));
                        if *not {
                            matched = !matched;
                        }
                        if matched {
                            self.follow(state.out)
                        } else {
                            self.backtrack()
                        }
                    }
                },
                StateKind::Value {
                    not,
                    symbol,
                    values,
                } => match self.cursor.node() {
                    None => self.backtrack(),
                    Some(node) => {
                        let surface = self.tree.surface(node);
                        let mut matched = self.tree.symbol(node) == *symbol
                            && values.iter().any(|v| v == surface);
                        if *not {
                            matched = !matched;
                        }
                        if matched {
                            self.follow(state.out)
                        } else {
                            self.backtrack()
                        }
                    }
                },
                StateKind::Any => {
                    if self.cursor.is_null() {
                        self.backtrack()
                    } else {
                        self.follow(state.out)
                    }
                }
                StateKind::Split => {
                    self.stack.push(Checkpoint::Split {
                        state: self.state,
                        cursor: self.cursor,
                        captures: self.captures.clone(),
                    });
                    self.follow(state.out)
                }
                StateKind::GroupOpen { symbol, uid } => {
                    self.tracer.group_open(*symbol);
                    let start = self.cursor.node();
                    let start_path = start.map(|n| self.tree.path_of(n)).unwrap_or_default();
                    self.captures.open.push(OpenGroup {
                        uid: *uid,
                        symbol: *symbol,
                        start,
                        start_path,
                        children: Vec::new(),
                    });
                    self.follow(state.out)
                }
                StateKind::GroupClose { open } => {
                    let frame = self
                        .captures
                        .open
                        .pop()
                        .expect("GroupClose without open frame");
                    if let StateKind::GroupOpen { uid, .. } = &automaton.state(*open).kind {
                        debug_assert_eq!(frame.uid, *uid, "group frames must nest properly");
                    }
                    self.tracer.group_close(frame.symbol);
                    if let Some(start) = frame.start {
                        let result = MatchResult {
                            symbol: frame.symbol,
                            path: frame.start_path,
                            siblings_count: siblings_count(self.tree, start, self.cursor),
                            children: frame.children,
                        };
                        match self.captures.open.last_mut() {
                            Some(parent) => parent.children.push(result),
                            None => self.captures.completed.push(result),
                        }
                    }
                    self.follow(state.out)
                }
                StateKind::Descend => {
                    if self.cursor.is_null() {
                        self.backtrack()
                    } else {
                        self.follow(state.out)
                    }
                }
                StateKind::Walk => match self.cursor {
                    Cursor::At(origin) => {
                        self.stack.push(Checkpoint::Walk {
                            state: self.state,
                            origin,
                            pos: origin,
                            captures: self.captures.clone(),
                        });
                        self.follow(state.out)
                    }
                    // Nothing to walk over; the body gets one attempt at
                    // the null cursor and fails at its first consuming
                    // state.
                    _ => self.follow(state.out),
                },
                StateKind::Not => {
                    let body = state.out.target.expect("Not body wired");
                    let stop = state.out1.target.expect("Not continuation patched");
                    if self.submatch(body, stop)? {
                        self.backtrack()
                    } else {
                        self.follow(state.out1)
                    }
                }
            };

            if !alive {
                return Ok(None);
            }
        }
    }

    /// Execute the negated body as an isolated sub-match: private stack,
    /// discarded captures, shared fuel.
    fn submatch(&mut self, start: StateId, stop: StateId) -> Result<bool, MatchError> {
        if self.not_depth == 0 {
            return Err(MatchError::NotDepthExceeded {
                limit: self.limits.not_depth,
            });
        }
        let mut sub = Machine {
            automaton: self.automaton,
            tree: self.tree,
            limits: self.limits,
            stack: Vec::new(),
            captures: CaptureState::default(),
            cursor: self.cursor,
            state: start,
            fuel: self.fuel,
            not_depth: self.not_depth - 1,
            tracer: &mut *self.tracer,
        };
        let outcome = sub.run(Some(stop));
        self.fuel = sub.fuel;
        Ok(outcome?.is_some())
    }

    /// Take an edge: apply its transition, then enter its target. Returns
    /// false if the motion is impossible from the current cursor.
    fn take_edge(&mut self, edge: Edge) -> bool {
        let Some(target) = edge.target else {
            return false;
        };
        match cursor::apply(self.tree, self.cursor, edge.nav) {
            Some(next) => {
                self.tracer.nav(edge.nav, next);
                self.cursor = next;
                self.state = target;
                true
            }
            None => false,
        }
    }

    /// Take an edge, backtracking if it cannot be taken.
    fn follow(&mut self, edge: Edge) -> bool {
        if self.take_edge(edge) {
            true
        } else {
            self.backtrack()
        }
    }

    /// Pop branch points until one can resume. Returns false when the
    /// stack empties: the overall match has failed.
    fn backtrack(&mut self) -> bool {
        self.tracer.backtrack();
        while let Some(checkpoint) = self.stack.pop() {
            match checkpoint {
                Checkpoint::Split {
                    state,
                    cursor,
                    captures,
                } => {
                    self.cursor = cursor;
                    self.captures = captures;
                    let out1 = self.automaton.state(state).out1;
                    if self.take_edge(out1) {
                        return true;
                    }
                }
                Checkpoint::Walk {
                    state,
                    origin,
                    pos,
                    captures,
                } => {
                    if let Some(next) = self.tree.step_in_walk(origin, pos) {
                        self.tracer.walk_step(next);
                        self.cursor = Cursor::At(next);
                        self.captures = captures.clone();
                        self.stack.push(Checkpoint::Walk {
                            state,
                            origin,
                            pos: next,
                            captures,
                        });
                        let out = self.automaton.state(state).out;
                        if self.take_edge(out) {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }
}

/// Sibling span of a completed capture. When start and end share a
/// parent the span is the index difference; otherwise count sibling
/// steps from the start node until the end node is reached or siblings
/// run out. Always at least 1.
fn siblings_count(tree: &Tree, start: NodeId, end: Cursor) -> usize {
    if let Cursor::At(e) = end {
        if tree.parent(start).is_some() && tree.parent(start) == tree.parent(e) {
            let si = tree.node_index(start).unwrap_or(0);
            let ei = tree.node_index(e).unwrap_or(0);
            if ei > si {
                return ei - si;
            }
        }
    }
    let mut count = 1;
    let mut cur = start;
    while let Some(next) = tree.next_sibling(cur) {
        if Cursor::At(next) == end {
            break;
        }
        count += 1;
        cur = next;
    }
    count
}
