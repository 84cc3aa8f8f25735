// Automaton container: unit, state and transition tables plus symbol tables.

use wfst_core::{Semiring, SymbolTable};

use crate::FstError;
use crate::transition::Transition;

/// State flag bit: the state is final.
pub const STATE_FINAL: u8 = 0x01;

/// Unit description: one independently addressable automaton.
///
/// Units are packed contiguously: `first_state` of unit `i` equals the sum
/// of the state counts of units `0..i`, and likewise for transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    pub first_state: usize,
    pub state_count: usize,
    pub first_transition: usize,
    pub transition_count: usize,
}

impl Unit {
    fn empty(name: String, first_state: usize, first_transition: usize) -> Self {
        Self {
            name,
            first_state,
            state_count: 0,
            first_transition,
            transition_count: 0,
        }
    }
}

/// State record. Bit 0 of `flags` marks a final state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct State {
    pub flags: u8,
}

impl State {
    #[inline]
    pub fn is_final(self) -> bool {
        self.flags & STATE_FINAL != 0
    }
}

/// Which optional transition columns an automaton carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Schema {
    /// Transitions carry an input label.
    pub input: bool,
    /// Transitions carry an output label.
    pub output: bool,
    /// Transitions carry a weight in this semiring.
    pub semiring: Option<Semiring>,
}

impl Schema {
    pub const ACCEPTOR: Schema = Schema {
        input: true,
        output: false,
        semiring: None,
    };

    pub const TRANSDUCER: Schema = Schema {
        input: true,
        output: true,
        semiring: None,
    };

    /// Builder-style semiring setter.
    pub fn weighted(mut self, semiring: Semiring) -> Self {
        self.semiring = Some(semiring);
        self
    }

    /// True if `t`'s optional fields agree with this schema.
    pub fn admits(&self, t: &Transition) -> bool {
        t.input.is_some() == self.input
            && t.output.is_some() == self.output
            && t.weight.is_some() == self.semiring.is_some()
    }
}

/// A container of one or more weighted finite-state automata ("units").
///
/// States and transitions of all units live in two packed tables. Client
/// facing state indices are unit-relative; the global row of state `s` of
/// unit `u` is `units[u].first_state + s`.
///
/// All mutating operations keep the packing invariant. [`Automaton::check`]
/// asserts it in debug builds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Automaton {
    pub(crate) units: Vec<Unit>,
    pub(crate) states: Vec<State>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) schema: Schema,
    pub(crate) input_symbols: SymbolTable,
    pub(crate) output_symbols: SymbolTable,
}

impl Automaton {
    /// Create an empty automaton with the given transition schema.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    /// Create an empty, unweighted acceptor.
    pub fn acceptor() -> Self {
        Self::with_schema(Schema::ACCEPTOR)
    }

    /// Create an empty, unweighted transducer.
    pub fn transducer() -> Self {
        Self::with_schema(Schema::TRANSDUCER)
    }

    /// Assemble an automaton from raw tables without validating them.
    ///
    /// Intended for table backends that produce the packed layout
    /// themselves. Call [`Automaton::verify`] to validate the result.
    pub fn from_raw_parts(
        schema: Schema,
        units: Vec<Unit>,
        states: Vec<State>,
        transitions: Vec<Transition>,
    ) -> Self {
        Self {
            units,
            states,
            transitions,
            schema,
            input_symbols: SymbolTable::new(),
            output_symbols: SymbolTable::new(),
        }
    }

    /// Remove all units, states, transitions and symbols. The schema is kept.
    pub fn reset(&mut self) {
        self.units.clear();
        self.states.clear();
        self.transitions.clear();
        self.input_symbols.clear();
        self.output_symbols.clear();
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Total number of states over all units.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Total number of transitions over all units.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, unit: usize) -> Option<&Unit> {
        self.units.get(unit)
    }

    /// States of `unit`. Panics if the unit does not exist.
    pub fn states(&self, unit: usize) -> &[State] {
        let u = &self.units[unit];
        &self.states[u.first_state..u.first_state + u.state_count]
    }

    /// Transitions of `unit`. Panics if the unit does not exist.
    pub fn transitions(&self, unit: usize) -> &[Transition] {
        let u = &self.units[unit];
        &self.transitions[u.first_transition..u.first_transition + u.transition_count]
    }

    pub fn input_symbols(&self) -> &SymbolTable {
        &self.input_symbols
    }

    pub fn input_symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.input_symbols
    }

    pub fn output_symbols(&self) -> &SymbolTable {
        &self.output_symbols
    }

    pub fn output_symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.output_symbols
    }

    /// Append an empty unit and return its index.
    pub fn add_unit(&mut self, name: impl Into<String>) -> usize {
        self.units.push(Unit::empty(
            name.into(),
            self.states.len(),
            self.transitions.len(),
        ));
        self.units.len() - 1
    }

    /// Append `count` states to `unit` and return the unit-relative index of
    /// the first new state.
    pub fn add_states(
        &mut self,
        unit: usize,
        count: usize,
        is_final: bool,
    ) -> Result<u32, FstError> {
        self.unit_checked(unit)?;
        let flags = if is_final { STATE_FINAL } else { 0 };
        let u = &mut self.units[unit];
        let first_new = u.state_count;
        let at = u.first_state + u.state_count;
        u.state_count += count;
        self.states
            .splice(at..at, std::iter::repeat_n(State { flags }, count));
        for later in &mut self.units[unit + 1..] {
            later.first_state += count;
        }
        Ok(first_new as u32)
    }

    /// Append a copy of `src`'s state `state` of unit `src_unit` to `unit`.
    pub(crate) fn add_state_copy(
        &mut self,
        unit: usize,
        src: &Automaton,
        src_unit: usize,
        state: u32,
    ) -> Result<u32, FstError> {
        let flags = src.states(src_unit)[state as usize].flags;
        let idx = self.add_states(unit, 1, false)?;
        let row = self.units[unit].first_state + idx as usize;
        self.states[row].flags = flags;
        Ok(idx)
    }

    /// Append a transition to `unit` and return its unit-relative index.
    ///
    /// Both end points must be existing states of the unit, and the labels
    /// must agree with the schema. A missing weight on a weighted automaton
    /// defaults to the semiring's one.
    pub fn add_transition(&mut self, unit: usize, mut t: Transition) -> Result<u32, FstError> {
        let state_count = self.unit_checked(unit)?.state_count;
        for state in [t.ini, t.ter] {
            if state as usize >= state_count {
                return Err(FstError::BadState {
                    unit,
                    state,
                    count: state_count,
                });
            }
        }
        if let (Some(sr), None) = (self.schema.semiring, t.weight) {
            t.weight = Some(sr.one());
        }
        if !self.schema.admits(&t) {
            return Err(FstError::SchemaMismatch(format!(
                "transition {t:?} does not fit schema {:?}",
                self.schema
            )));
        }

        let u = &mut self.units[unit];
        let idx = u.transition_count;
        let at = u.first_transition + u.transition_count;
        u.transition_count += 1;
        self.transitions.insert(at, t);
        for later in &mut self.units[unit + 1..] {
            later.first_transition += 1;
        }
        Ok(idx as u32)
    }

    /// Set or clear the final flag of a state.
    pub fn set_final(&mut self, unit: usize, state: u32, is_final: bool) -> Result<(), FstError> {
        let row = self.state_row(unit, state)?;
        if is_final {
            self.states[row].flags |= STATE_FINAL;
        } else {
            self.states[row].flags &= !STATE_FINAL;
        }
        Ok(())
    }

    /// True if `state` of `unit` is final. Unknown states are not final.
    pub fn is_final(&self, unit: usize, state: u32) -> bool {
        self.state_row(unit, state)
            .map(|row| self.states[row].is_final())
            .unwrap_or(false)
    }

    pub(crate) fn unit_checked(&self, unit: usize) -> Result<&Unit, FstError> {
        self.units.get(unit).ok_or(FstError::BadUnit {
            unit,
            count: self.units.len(),
        })
    }

    fn state_row(&self, unit: usize, state: u32) -> Result<usize, FstError> {
        let u = self.unit_checked(unit)?;
        if state as usize >= u.state_count {
            return Err(FstError::BadState {
                unit,
                state,
                count: u.state_count,
            });
        }
        Ok(u.first_state + state as usize)
    }
}
