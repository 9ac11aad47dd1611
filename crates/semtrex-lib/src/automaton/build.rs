//! Lowering a pattern tree to the state graph.
//!
//! Every expression compiles to a fragment: a start state plus the list
//! of successor slots that are still unpatched and collectively form the
//! fragment's exit. Combinators stitch fragments by patching one
//! fragment's outputs to the next fragment's start; whatever remains at
//! the top level is patched to the shared accept state.
//!
//! The builder carries a level counter that drops by one through each
//! descent (explicit `DESCEND` or a symbol literal's descent sugar).
//! Output slots are created carrying the level at their creation point;
//! patching adjusts them by the level at the composition point, which is
//! how a transition ends up encoding "pop k levels, then advance".

use semtrex_core::builtins::symbols as sym;
use semtrex_core::{NodeId, SemId, Surface, Tree};

use super::nav::Nav;
use super::state::{ACCEPT, Arm, Automaton, Edge, State, StateId, StateKind, symbol_payload};

/// Errors for malformed pattern trees. These are programmer errors: the
/// parser never produces such trees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("{op} expects {expected} children, got {got}")]
    BadArity {
        op: &'static str,
        got: usize,
        expected: &'static str,
    },
    #[error("malformed pattern tree: {what}")]
    BadShape { what: &'static str },
}

/// An unpatched successor slot.
#[derive(Debug, Clone, Copy)]
struct Slot {
    state: StateId,
    arm: Arm,
}

/// A partial automaton: entry state plus unpatched exits.
#[derive(Debug)]
struct Fragment {
    start: StateId,
    outs: Vec<Slot>,
}

/// Compile a pattern tree into an automaton.
pub fn build(tree: &Tree, root: NodeId) -> Result<Automaton, BuildError> {
    let mut builder = Builder {
        states: vec![State::new(StateKind::Accept)],
        next_uid: 0,
    };
    let fragment = builder.compile(tree, root, 0)?;
    builder.patch(&fragment.outs, ACCEPT, 0);
    Ok(Automaton::new(builder.states, fragment.start))
}

struct Builder {
    states: Vec<State>,
    /// Group uid counter; fresh for every build.
    next_uid: u32,
}

impl Builder {
    fn add(&mut self, kind: StateKind) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(State::new(kind));
        id
    }

    fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id as usize]
    }

    /// Mark an edge as an output slot, stamping it with the current level.
    fn open_slot(&mut self, state: StateId, arm: Arm, level: i32) -> Slot {
        self.state_mut(state).edge_mut(arm).nav = Nav::at_level(level);
        Slot { state, arm }
    }

    /// Patch output slots to `target`, adjusting each transition by the
    /// level at this composition point. A structural state whose adjusted
    /// transition would advance the cursor in place gets the sentinel
    /// instead.
    fn patch(&mut self, outs: &[Slot], target: StateId, level: i32) {
        for slot in outs {
            let consuming = self.states[slot.state as usize].kind.is_consuming();
            let edge = self.state_mut(slot.state).edge_mut(slot.arm);
            edge.target = Some(target);
            edge.nav = edge.nav.shift(-level);
            if !consuming && edge.nav == Nav::NEXT {
                edge.nav = Nav::NONE;
            }
        }
    }

    fn compile(&mut self, tree: &Tree, node: NodeId, level: i32) -> Result<Fragment, BuildError> {
        let symbol = tree.symbol(node);
        let children = tree.children(node);

        if symbol == sym::SEMTREX_SYMBOL_LITERAL || symbol == sym::SEMTREX_SYMBOL_LITERAL_NOT {
            return self.compile_symbol_literal(
                tree,
                node,
                level,
                symbol == sym::SEMTREX_SYMBOL_LITERAL_NOT,
            );
        }
        if symbol == sym::SEMTREX_SYMBOL_ANY {
            return self.compile_any(tree, node, level);
        }
        if symbol == sym::SEMTREX_VALUE_LITERAL || symbol == sym::SEMTREX_VALUE_LITERAL_NOT {
            return self.compile_value_literal(
                tree,
                node,
                level,
                symbol == sym::SEMTREX_VALUE_LITERAL_NOT,
            );
        }
        if symbol == sym::SEMTREX_SEQUENCE {
            if children.is_empty() {
                return Err(BuildError::BadArity {
                    op: "SEMTREX_SEQUENCE",
                    got: 0,
                    expected: "at least 1",
                });
            }
            let mut fragments = Vec::with_capacity(children.len());
            for &child in children {
                fragments.push(self.compile(tree, child, level)?);
            }
            let mut iter = fragments.into_iter();
            let first = iter.next().expect("non-empty sequence");
            let mut outs = first.outs;
            for next in iter {
                self.patch(&outs, next.start, level);
                outs = next.outs;
            }
            return Ok(Fragment {
                start: first.start,
                outs,
            });
        }
        if symbol == sym::SEMTREX_OR {
            let [a, b] = expect_children::<2>(tree, node, "SEMTREX_OR", "exactly 2")?;
            let split = self.add(StateKind::Split);
            let left = self.compile(tree, a, level)?;
            let right = self.compile(tree, b, level)?;
            self.state_mut(split).out = Edge::to(left.start, Nav::NONE);
            self.state_mut(split).out1 = Edge::to(right.start, Nav::NONE);
            let mut outs = left.outs;
            outs.extend(right.outs);
            return Ok(Fragment { start: split, outs });
        }
        if symbol == sym::SEMTREX_ZERO_OR_MORE || symbol == sym::SEMTREX_ONE_OR_MORE {
            let op = if symbol == sym::SEMTREX_ZERO_OR_MORE {
                "SEMTREX_ZERO_OR_MORE"
            } else {
                "SEMTREX_ONE_OR_MORE"
            };
            let [child] = expect_children::<1>(tree, node, op, "exactly 1")?;
            let split = self.add(StateKind::Split);
            let inner = self.compile(tree, child, level)?;
            self.state_mut(split).out = Edge::to(inner.start, Nav::NONE);
            self.patch(&inner.outs, split, level);
            let outs = vec![self.open_slot(split, Arm::Out1, level)];
            let start = if symbol == sym::SEMTREX_ZERO_OR_MORE {
                split
            } else {
                inner.start
            };
            return Ok(Fragment { start, outs });
        }
        if symbol == sym::SEMTREX_ZERO_OR_ONE {
            let [child] = expect_children::<1>(tree, node, "SEMTREX_ZERO_OR_ONE", "exactly 1")?;
            let split = self.add(StateKind::Split);
            let inner = self.compile(tree, child, level)?;
            self.state_mut(split).out = Edge::to(inner.start, Nav::NONE);
            let mut outs = inner.outs;
            outs.push(self.open_slot(split, Arm::Out1, level));
            return Ok(Fragment { start: split, outs });
        }
        if symbol == sym::SEMTREX_GROUP {
            let [child] = expect_children::<1>(tree, node, "SEMTREX_GROUP", "exactly 1")?;
            let Surface::Id(capture) = tree.surface(node) else {
                return Err(BuildError::BadShape {
                    what: "SEMTREX_GROUP surface must be the capture symbol",
                });
            };
            let uid = self.next_uid;
            self.next_uid += 1;
            let open = self.add(StateKind::GroupOpen {
                symbol: *capture,
                uid,
            });
            let close = self.add(StateKind::GroupClose { open });
            let inner = self.compile(tree, child, level)?;
            self.state_mut(open).out = Edge::to(inner.start, Nav::NONE);
            self.patch(&inner.outs, close, level);
            let outs = vec![self.open_slot(close, Arm::Out, level)];
            return Ok(Fragment { start: open, outs });
        }
        if symbol == sym::SEMTREX_DESCEND {
            let [child] = expect_children::<1>(tree, node, "SEMTREX_DESCEND", "exactly 1")?;
            let descend = self.add(StateKind::Descend);
            let inner = self.compile(tree, child, level - 1)?;
            self.state_mut(descend).out = Edge::to(inner.start, Nav::DOWN);
            return Ok(Fragment {
                start: descend,
                outs: inner.outs,
            });
        }
        if symbol == sym::SEMTREX_NOT {
            let [child] = expect_children::<1>(tree, node, "SEMTREX_NOT", "exactly 1")?;
            let not = self.add(StateKind::Not);
            let inner = self.compile(tree, child, level)?;
            self.state_mut(not).out = Edge::to(inner.start, Nav::NONE);
            let mut outs = inner.outs;
            outs.push(self.open_slot(not, Arm::Out1, level));
            return Ok(Fragment { start: not, outs });
        }
        if symbol == sym::SEMTREX_WALK {
            let [child] = expect_children::<1>(tree, node, "SEMTREX_WALK", "exactly 1")?;
            let walk = self.add(StateKind::Walk);
            let inner = self.compile(tree, child, level)?;
            self.state_mut(walk).out = Edge::to(inner.start, Nav::NONE);
            return Ok(Fragment {
                start: walk,
                outs: inner.outs,
            });
        }

        Err(BuildError::BadShape {
            what: "node is not a SEMTREX_* operator",
        })
    }

    /// Symbol literal: payload child, plus the optional descent-sugar
    /// child that runs against the first child of whatever matched.
    fn compile_symbol_literal(
        &mut self,
        tree: &Tree,
        node: NodeId,
        level: i32,
        not: bool,
    ) -> Result<Fragment, BuildError> {
        let children = tree.children(node);
        let op = if not {
            "SEMTREX_SYMBOL_LITERAL_NOT"
        } else {
            "SEMTREX_SYMBOL_LITERAL"
        };
        if children.is_empty() || children.len() > 2 {
            return Err(BuildError::BadArity {
                op,
                got: children.len(),
                expected: "1 or 2",
            });
        }
        let symbols = symbol_payload(tree, children[0]).ok_or(BuildError::BadShape {
            what: "symbol literal payload must be SEMTREX_SYMBOL or SEMTREX_SYMBOL_SET",
        })?;
        let state = self.add(StateKind::Symbol { not, symbols });
        self.finish_consuming(tree, state, children.get(1).copied(), level)
    }

    fn compile_any(
        &mut self,
        tree: &Tree,
        node: NodeId,
        level: i32,
    ) -> Result<Fragment, BuildError> {
        let children = tree.children(node);
        if children.len() > 1 {
            return Err(BuildError::BadArity {
                op: "SEMTREX_SYMBOL_ANY",
                got: children.len(),
                expected: "0 or 1",
            });
        }
        let state = self.add(StateKind::Any);
        self.finish_consuming(tree, state, children.first().copied(), level)
    }

    fn compile_value_literal(
        &mut self,
        tree: &Tree,
        node: NodeId,
        level: i32,
        not: bool,
    ) -> Result<Fragment, BuildError> {
        let children = tree.children(node);
        let op = if not {
            "SEMTREX_VALUE_LITERAL_NOT"
        } else {
            "SEMTREX_VALUE_LITERAL"
        };
        if children.len() != 1 {
            return Err(BuildError::BadArity {
                op,
                got: children.len(),
                expected: "exactly 1",
            });
        }
        let payload = children[0];
        let (symbol, values) = value_payload(tree, payload)?;
        let state = self.add(StateKind::Value {
            not,
            symbol,
            values,
        });
        self.finish_consuming(tree, state, None, level)
    }

    /// Wire a consuming state's exit: either an open slot at the current
    /// level, or a descent into an inner fragment built one level down.
    fn finish_consuming(
        &mut self,
        tree: &Tree,
        state: StateId,
        descent: Option<NodeId>,
        level: i32,
    ) -> Result<Fragment, BuildError> {
        match descent {
            None => {
                let outs = vec![self.open_slot(state, Arm::Out, level)];
                Ok(Fragment { start: state, outs })
            }
            Some(child) => {
                let inner = self.compile(tree, child, level - 1)?;
                self.state_mut(state).out = Edge::to(inner.start, Nav::DOWN);
                Ok(Fragment {
                    start: state,
                    outs: inner.outs,
                })
            }
        }
    }
}

/// The value payload: a single `(symbol, surface)` node, or a
/// `SEMTREX_VALUE_SET` of them.
fn value_payload(tree: &Tree, node: NodeId) -> Result<(SemId, Vec<Surface>), BuildError> {
    if tree.symbol(node) == sym::SEMTREX_VALUE_SET {
        let children = tree.children(node);
        if children.is_empty() {
            return Err(BuildError::BadArity {
                op: "SEMTREX_VALUE_SET",
                got: 0,
                expected: "at least 1",
            });
        }
        let symbol = tree.symbol(children[0]);
        let values = children
            .iter()
            .map(|&child| tree.surface(child).clone())
            .collect();
        return Ok((symbol, values));
    }
    Ok((tree.symbol(node), vec![tree.surface(node).clone()]))
}

fn expect_children<const N: usize>(
    tree: &Tree,
    node: NodeId,
    op: &'static str,
    expected: &'static str,
) -> Result<[NodeId; N], BuildError> {
    let children = tree.children(node);
    children
        .try_into()
        .map_err(|_| BuildError::BadArity {
            op,
            got: children.len(),
            expected,
        })
}
