// HMM topology expansion: split states by the input label they are entered with.

use hashbrown::HashMap;
use tracing::{debug, instrument};

use crate::FstError;
use crate::automaton::Automaton;
use crate::transition::{Direction, Label, Transition, TransitionIndex};

/// Origin of an expanded state: the source state and the input label of
/// the transition that entered it.
type Origin = (u32, Label);

impl Automaton {
    /// Replace `self` with the HMM expansion of one unit of `src`, or of
    /// every unit when `unit` is `None`.
    ///
    /// Each expanded state stands for a pair (source state, incoming input
    /// label) reachable from source state 0, which is entered with epsilon.
    /// States are numbered in breadth-first discovery order, so the result
    /// is deterministic. Final flags, output labels and weights are
    /// carried over; the schema and symbol tables are those of `src`.
    ///
    /// For all units the per-unit expansions are concatenated in order.
    #[instrument(level = "trace", skip(self, src))]
    pub fn hmm(&mut self, src: &Automaton, unit: Option<usize>) -> Result<(), FstError> {
        src.check();

        let expanded = match unit {
            Some(u) => src.expand_unit(u)?,
            None => {
                let mut all = Automaton::with_schema(src.schema);
                for u in 0..src.unit_count() {
                    all.cat(&src.expand_unit(u)?)?;
                }
                all.input_symbols = src.input_symbols.clone();
                all.output_symbols = src.output_symbols.clone();
                all
            }
        };

        *self = expanded;
        self.check();
        Ok(())
    }

    fn expand_unit(&self, unit: usize) -> Result<Automaton, FstError> {
        let name = self.unit_checked(unit)?.name.clone();
        let mut dst = Automaton::with_schema(self.schema);
        dst.input_symbols = self.input_symbols.clone();
        dst.output_symbols = self.output_symbols.clone();
        let du = dst.add_unit(name);
        if self.states(unit).is_empty() {
            return Ok(dst);
        }

        let outgoing = TransitionIndex::new(self, unit, Direction::Outgoing);
        let start: Origin = (0, Label::Epsilon);
        let mut origins: Vec<Origin> = vec![start];
        let mut lookup: HashMap<Origin, u32> = HashMap::new();
        lookup.insert(start, 0);
        dst.add_state_copy(du, self, unit, 0)?;

        let mut current = 0usize;
        while current < origins.len() {
            let (source_state, _) = origins[current];
            for t in outgoing.iter(source_state) {
                let key = (t.ter, t.input_label());
                let ter = match lookup.get(&key) {
                    Some(&state) => state,
                    None => {
                        let state = dst.add_state_copy(du, self, unit, t.ter)?;
                        lookup.insert(key, state);
                        origins.push(key);
                        state
                    }
                };
                dst.add_transition(
                    du,
                    Transition {
                        ini: current as u32,
                        ter,
                        ..*t
                    },
                )?;
            }
            current += 1;
        }

        debug!(
            unit,
            source_states = self.states(unit).len(),
            expanded_states = origins.len(),
            "expanded unit"
        );
        Ok(dst)
    }
}
