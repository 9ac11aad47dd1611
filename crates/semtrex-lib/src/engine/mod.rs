//! Matcher runtime: cursor, checkpoints, dispatch loop, results.

mod checkpoint;
mod cursor;
mod matcher;
mod result;
mod trace;

pub use cursor::Cursor;
pub use matcher::{FuelLimits, MatchError, run};
pub use result::{MatchResult, match_by_symbol, matched_nodes};
pub use trace::{CollectingTracer, NoopTracer, Tracer};

#[cfg(test)]
mod matcher_tests;
