//! Branch points and capture bookkeeping.

use semtrex_core::{NodeId, SemId, TreePath};

use super::cursor::Cursor;
use super::result::MatchResult;
use crate::automaton::StateId;

/// An open capture frame, pushed at `GroupOpen` and resolved at the
/// matching `GroupClose`.
#[derive(Debug, Clone)]
pub(crate) struct OpenGroup {
    pub uid: u32,
    pub symbol: SemId,
    /// First node of the span; `None` when the group opened on a
    /// past-end cursor (such a group captures nothing).
    pub start: Option<NodeId>,
    pub start_path: TreePath,
    pub children: Vec<MatchResult>,
}

/// Capture bookkeeping at a point in time.
#[derive(Debug, Clone, Default)]
pub(crate) struct CaptureState {
    pub open: Vec<OpenGroup>,
    pub completed: Vec<MatchResult>,
}

/// A branch point. The capture state is cloned at push time; restoring a
/// shared sequence would corrupt parent frames.
#[derive(Debug, Clone)]
pub(crate) enum Checkpoint {
    /// Resume through the split state's second arm.
    Split {
        state: StateId,
        cursor: Cursor,
        captures: CaptureState,
    },
    /// Resume by advancing the walk position one pre-order step within
    /// the subtree rooted at `origin`.
    Walk {
        state: StateId,
        origin: NodeId,
        pos: NodeId,
        captures: CaptureState,
    },
}
