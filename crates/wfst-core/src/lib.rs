//! Shared collaborator types for the wfst automaton engine.
//!
//! - [`symbols`] -- Symbol tables (index-to-name mapping, global or per unit)
//! - [`semiring`] -- Weight semiring classification

pub mod semiring;
pub mod symbols;

pub use semiring::Semiring;
pub use symbols::SymbolTable;
