// Unit composition: appending, concatenating and selecting whole units.

use tracing::{debug, instrument, warn};

use crate::FstError;
use crate::automaton::Automaton;

/// Which source units [`Automaton::copy_units`] copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSelection<'a> {
    /// Every unit, in order.
    All,
    /// Exactly one unit.
    Single(usize),
    /// Units listed by index, in list order. Repetitions are copied again.
    /// Out-of-range entries are skipped.
    List(&'a [i64]),
}

/// Outcome of [`Automaton::copy_units`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopySummary {
    /// Number of units appended.
    pub copied: usize,
    /// List entries that did not name a source unit.
    pub skipped: Vec<i64>,
}

impl Automaton {
    /// Append `count` units of `src`, starting at `first_unit`, to `self`.
    ///
    /// `count` is clipped to the units available in `src`. If `self` has no
    /// units it first takes over `src`'s schema and starts from empty symbol
    /// tables. A symbol table of `self` is replaced by `src`'s only while it
    /// is empty, so per-unit tables of later units are not merged.
    ///
    /// Fails without touching `self` if no unit is selected or if `self` is
    /// non-empty and its schema differs from `src`'s.
    #[instrument(
        level = "trace",
        skip(self, src),
        fields(dst_units = self.unit_count(), src_units = src.unit_count())
    )]
    pub fn cat_ex(
        &mut self,
        src: &Automaton,
        first_unit: usize,
        count: usize,
    ) -> Result<(), FstError> {
        self.check();
        src.check();

        let count = count.min(src.unit_count().saturating_sub(first_unit));
        if count == 0 {
            return Err(FstError::BadUnit {
                unit: first_unit,
                count: src.unit_count(),
            });
        }

        if self.is_empty() {
            self.reset();
            self.schema = src.schema;
        } else if self.schema != src.schema {
            return Err(FstError::SchemaMismatch(format!(
                "cannot append {:?} units to a {:?} automaton",
                src.schema, self.schema
            )));
        }

        let selected = &src.units[first_unit..first_unit + count];
        let (first, last) = (&selected[0], &selected[count - 1]);
        let state_rows = first.first_state..last.first_state + last.state_count;
        let transition_rows = first.first_transition..last.first_transition + last.transition_count;

        let state_shift = self.states.len();
        let transition_shift = self.transitions.len();
        let first_new_unit = self.units.len();

        self.units.extend_from_slice(selected);
        self.states.extend_from_slice(&src.states[state_rows.clone()]);
        self.transitions
            .extend_from_slice(&src.transitions[transition_rows.clone()]);

        for unit in &mut self.units[first_new_unit..] {
            unit.first_state = unit.first_state - state_rows.start + state_shift;
            unit.first_transition =
                unit.first_transition - transition_rows.start + transition_shift;
        }

        if self.input_symbols.is_empty() && !src.input_symbols.is_empty() {
            self.input_symbols = src.input_symbols.clone();
        }
        if self.output_symbols.is_empty() && !src.output_symbols.is_empty() {
            self.output_symbols = src.output_symbols.clone();
        }

        debug!(
            first_unit,
            count,
            states = state_rows.len(),
            transitions = transition_rows.len(),
            "appended units"
        );
        self.check();
        Ok(())
    }

    /// Append all units of `src` to `self`.
    pub fn cat(&mut self, src: &Automaton) -> Result<(), FstError> {
        self.cat_ex(src, 0, src.unit_count())
    }

    /// Replace `self` with a selection of `src`'s units.
    ///
    /// An empty list is a successful no-op that leaves `self` untouched. A
    /// `Single` index out of range fails before any mutation. Out-of-range
    /// list entries are logged, skipped and reported in the summary.
    ///
    /// Afterwards the symbol tables of `src` are copied unless they are
    /// per-unit tables (one column per source unit).
    #[instrument(level = "trace", skip(self, src))]
    pub fn copy_units(
        &mut self,
        src: &Automaton,
        selection: UnitSelection<'_>,
    ) -> Result<CopySummary, FstError> {
        let unit_count = src.unit_count();
        match selection {
            UnitSelection::List(ids) if ids.is_empty() => return Ok(CopySummary::default()),
            UnitSelection::Single(unit) if unit >= unit_count => {
                return Err(FstError::BadUnit {
                    unit,
                    count: unit_count,
                });
            }
            _ => {}
        }

        self.reset();
        self.schema = src.schema;

        let mut summary = CopySummary::default();
        match selection {
            UnitSelection::All => {
                for unit in 0..unit_count {
                    self.cat_ex(src, unit, 1)?;
                    summary.copied += 1;
                }
            }
            UnitSelection::Single(unit) => {
                self.cat_ex(src, unit, 1)?;
                summary.copied += 1;
            }
            UnitSelection::List(ids) => {
                for &id in ids {
                    match usize::try_from(id) {
                        Ok(unit) if unit < unit_count => {
                            self.cat_ex(src, unit, 1)?;
                            summary.copied += 1;
                        }
                        _ => {
                            warn!(unit = id, unit_count, "skipping out-of-range unit index");
                            summary.skipped.push(id);
                        }
                    }
                }
            }
        }

        if src.input_symbols.column_count() != unit_count {
            self.input_symbols = src.input_symbols.clone();
        }
        if src.output_symbols.column_count() != unit_count {
            self.output_symbols = src.output_symbols.clone();
        }

        self.check();
        Ok(summary)
    }
}
