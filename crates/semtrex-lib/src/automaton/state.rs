//! State arena for the compiled automaton.
//!
//! States are stored in a flat vector and referenced by `StateId`, which
//! keeps the (cyclic) graph free of ownership cycles. The shared accept
//! state is pre-allocated at id 0.

use std::fmt::Write;

use semtrex_core::{NodeId, Registry, SemId, Surface, Tree};

use super::nav::Nav;
use crate::pattern::fmt_surface;

/// Index into [`Automaton::states`].
pub type StateId = u32;

/// The shared accept state.
pub const ACCEPT: StateId = 0;

/// Which successor slot of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arm {
    Out,
    Out1,
}

/// A successor pointer plus its transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: Option<StateId>,
    pub nav: Nav,
}

impl Edge {
    pub const UNSET: Edge = Edge {
        target: None,
        nav: Nav::NONE,
    };

    pub fn to(target: StateId, nav: Nav) -> Self {
        Self {
            target: Some(target),
            nav,
        }
    }
}

/// State discriminator plus kind-specific payload.
#[derive(Debug, Clone)]
pub enum StateKind {
    Accept,
    /// Cursor symbol must (not) be one of `symbols`.
    Symbol { not: bool, symbols: Vec<SemId> },
    /// Any symbol matches.
    Any,
    /// Cursor symbol must equal `symbol` and its surface must (not) be
    /// one of `values`.
    Value {
        not: bool,
        symbol: SemId,
        values: Vec<Surface>,
    },
    Split,
    GroupOpen { symbol: SemId, uid: u32 },
    GroupClose { open: StateId },
    Descend,
    Walk,
    Not,
}

impl StateKind {
    /// Consuming states test the node under the cursor and fail on a
    /// null cursor; the rest are structural.
    pub fn is_consuming(&self) -> bool {
        matches!(
            self,
            StateKind::Symbol { .. } | StateKind::Any | StateKind::Value { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct State {
    pub kind: StateKind,
    pub out: Edge,
    pub out1: Edge,
}

impl State {
    pub fn new(kind: StateKind) -> Self {
        Self {
            kind,
            out: Edge::UNSET,
            out1: Edge::UNSET,
        }
    }

    pub fn edge(&self, arm: Arm) -> &Edge {
        match arm {
            Arm::Out => &self.out,
            Arm::Out1 => &self.out1,
        }
    }

    pub fn edge_mut(&mut self, arm: Arm) -> &mut Edge {
        match arm {
            Arm::Out => &mut self.out,
            Arm::Out1 => &mut self.out1,
        }
    }
}

/// A compiled pattern: state graph plus entry point.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<State>,
    start: StateId,
}

impl Automaton {
    pub(crate) fn new(states: Vec<State>, start: StateId) -> Self {
        Self { states, start }
    }

    #[inline]
    pub fn start(&self) -> StateId {
        self.start
    }

    #[inline]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id as usize]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// One state per line, for tests and debugging.
    pub fn dump(&self, registry: &Registry) -> String {
        let mut out = String::new();
        for (id, state) in self.states.iter().enumerate() {
            let _ = write!(out, "{id}: {}", describe_kind(&state.kind, registry));
            if id as StateId == self.start {
                out.push_str(" <start>");
            }
            dump_edge("out", &state.out, &mut out);
            dump_edge("out1", &state.out1, &mut out);
            out.push('\n');
        }
        out
    }
}

fn dump_edge(name: &str, edge: &Edge, out: &mut String) {
    if let Some(target) = edge.target {
        let _ = write!(out, " {name}={target}:{:?}", edge.nav);
    }
}

fn describe_kind(kind: &StateKind, registry: &Registry) -> String {
    let label = |id: &SemId| {
        registry
            .label(*id)
            .map(str::to_owned)
            .unwrap_or_else(|| id.to_string())
    };
    match kind {
        StateKind::Accept => "accept".to_owned(),
        StateKind::Symbol { not, symbols } => {
            let names: Vec<String> = symbols.iter().map(label).collect();
            format!(
                "symbol{}({})",
                if *not { "!" } else { "" },
                names.join(",")
            )
        }
        StateKind::Any => "any".to_owned(),
        StateKind::Value {
            not,
            symbol,
            values,
        } => {
            let rendered: Vec<String> =
                values.iter().map(|v| fmt_surface(v, registry)).collect();
            format!(
                "value{}({}={})",
                if *not { "!" } else { "" },
                label(symbol),
                rendered.join(",")
            )
        }
        StateKind::Split => "split".to_owned(),
        StateKind::GroupOpen { symbol, uid } => {
            format!("group-open({},{uid})", label(symbol))
        }
        StateKind::GroupClose { open } => format!("group-close({open})"),
        StateKind::Descend => "descend".to_owned(),
        StateKind::Walk => "walk".to_owned(),
        StateKind::Not => "not".to_owned(),
    }
}

/// Extract the allowed-symbols payload from a `SEMTREX_SYMBOL` node or a
/// `SEMTREX_SYMBOL_SET` of them.
pub(crate) fn symbol_payload(tree: &Tree, node: NodeId) -> Option<Vec<SemId>> {
    use semtrex_core::builtins::symbols as sym;
    if tree.symbol(node) == sym::SEMTREX_SYMBOL {
        match tree.surface(node) {
            Surface::Id(id) => return Some(vec![*id]),
            _ => return None,
        }
    }
    if tree.symbol(node) == sym::SEMTREX_SYMBOL_SET {
        let mut symbols = Vec::with_capacity(tree.child_count(node));
        for &child in tree.children(node) {
            match tree.surface(child) {
                Surface::Id(id) if tree.symbol(child) == sym::SEMTREX_SYMBOL => {
                    symbols.push(*id);
                }
                _ => return None,
            }
        }
        if symbols.is_empty() {
            return None;
        }
        return Some(symbols);
    }
    None
}
