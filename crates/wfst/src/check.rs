// Structural integrity checking of automaton containers.

use crate::automaton::Automaton;

/// A violated structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("unit {unit}: first state is {actual}, expected {expected}")]
    StateOffset {
        unit: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unit {unit}: first transition is {actual}, expected {expected}")]
    TransitionOffset {
        unit: usize,
        expected: usize,
        actual: usize,
    },
    #[error("units describe {described} states but the state table has {actual}")]
    StateTotal { described: usize, actual: usize },
    #[error("units describe {described} transitions but the transition table has {actual}")]
    TransitionTotal { described: usize, actual: usize },
    #[error("unit {unit}, transition {transition}: state {state} out of range (unit has {count})")]
    StateOutOfRange {
        unit: usize,
        transition: usize,
        state: u32,
        count: usize,
    },
    #[error("transition {transition}: fields do not match the automaton schema")]
    Schema { transition: usize },
}

impl Automaton {
    /// Verify the structural invariants without panicking.
    ///
    /// - unit offsets equal the running sums of the preceding units' counts;
    /// - the unit counts add up to the state and transition table sizes;
    /// - every transition's end points lie inside its own unit;
    /// - every transition's optional fields match the schema.
    ///
    /// The first violation found is returned.
    pub fn verify(&self) -> Result<(), IntegrityError> {
        let mut states = 0usize;
        let mut transitions = 0usize;

        for (u, unit) in self.units.iter().enumerate() {
            if unit.first_state != states {
                return Err(IntegrityError::StateOffset {
                    unit: u,
                    expected: states,
                    actual: unit.first_state,
                });
            }
            if unit.first_transition != transitions {
                return Err(IntegrityError::TransitionOffset {
                    unit: u,
                    expected: transitions,
                    actual: unit.first_transition,
                });
            }
            states += unit.state_count;
            transitions += unit.transition_count;

            let rows = unit.first_transition..unit.first_transition + unit.transition_count;
            for (row, t) in self.transitions.get(rows).into_iter().flatten().enumerate() {
                for state in [t.ini, t.ter] {
                    if state as usize >= unit.state_count {
                        return Err(IntegrityError::StateOutOfRange {
                            unit: u,
                            transition: row,
                            state,
                            count: unit.state_count,
                        });
                    }
                }
            }
        }

        if states != self.states.len() {
            return Err(IntegrityError::StateTotal {
                described: states,
                actual: self.states.len(),
            });
        }
        if transitions != self.transitions.len() {
            return Err(IntegrityError::TransitionTotal {
                described: transitions,
                actual: self.transitions.len(),
            });
        }

        if let Some(transition) = self
            .transitions
            .iter()
            .position(|t| !self.schema.admits(t))
        {
            return Err(IntegrityError::Schema { transition });
        }

        Ok(())
    }

    /// Assert the structural invariants (debug builds only).
    ///
    /// This detects programming errors. It never mutates the automaton and
    /// is compiled to a no-op in release builds, so it must not be used to
    /// validate input; use [`Automaton::verify`] for that.
    #[inline]
    pub fn check(&self) {
        #[cfg(debug_assertions)]
        if let Err(e) = self.verify() {
            panic!("automaton integrity violated: {e}");
        }
    }
}
