//! Table-based weighted finite-state automaton engine.
//!
//! An [`Automaton`] packs one or more automata ("units") into three tables
//! (units, states, transitions) plus input and output symbol tables. On top
//! of the container the crate provides:
//!
//! - [`check`] -- Structural integrity checking (debug assertion + `verify`)
//! - [`analyze`] -- Loop, connectivity and tree detection; type classification
//! - [`compose`] -- Appending, concatenating and selecting whole units
//! - [`hmm`] -- Unfolding a unit into an HMM-style state graph
//! - [`regex`] -- Compiling a regular expression into a one-unit automaton
//!   and matching it against text
//! - [`status`] -- Human-readable summary of a container
//!
//! All operations are synchronous and single-threaded; an automaton is an
//! ordinary owned value.

pub mod analyze;
pub mod automaton;
pub mod check;
pub mod compose;
pub mod config;
pub mod hmm;
pub mod regex;
pub mod status;
pub mod transition;

pub use analyze::Properties;
pub use automaton::{Automaton, STATE_FINAL, Schema, State, Unit};
pub use check::IntegrityError;
pub use compose::{CopySummary, UnitSelection};
pub use config::MatchConfig;
pub use regex::{Match, Regex, RegexError};
pub use status::Summary;
pub use transition::{Direction, Label, Transition, TransitionIndex};
pub use wfst_core::{Semiring, SymbolTable};

/// Error type for automaton operations.
#[derive(Debug, thiserror::Error)]
pub enum FstError {
    #[error("unit {unit} out of range (automaton has {count} units)")]
    BadUnit { unit: usize, count: usize },
    #[error("state {state} out of range (unit {unit} has {count} states)")]
    BadState { unit: usize, state: u32, count: usize },
    #[error("unit {unit} has no states")]
    EmptyUnit { unit: usize },
    #[error("automaton has no units")]
    NoUnits,
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("match search exceeded the depth limit of {limit}")]
    DepthExceeded { limit: usize },
    #[error("regex syntax error: {0}")]
    Regex(#[from] RegexError),
}
