// Human-readable status report and transition listing.

use std::fmt;

use wfst_core::SymbolTable;

use crate::analyze::Properties;
use crate::automaton::Automaton;
use crate::transition::{Label, Transition};

/// Display adapter returned by [`Automaton::summary`] and [`Automaton::listing`].
pub struct Summary<'a> {
    automaton: &'a Automaton,
    transitions: bool,
}

impl Automaton {
    /// Table sizes, automaton type and per-unit topology.
    pub fn summary(&self) -> Summary<'_> {
        Summary {
            automaton: self,
            transitions: false,
        }
    }

    /// Like [`Automaton::summary`], followed by every unit's transitions.
    pub fn listing(&self) -> Summary<'_> {
        Summary {
            automaton: self,
            transitions: true,
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Rendering of a label. Regex markers use angle-bracket names; symbols are
/// looked up in `symbols` when it has entries, otherwise shown as the
/// character they encode.
fn label_text(label: Label, symbols: &SymbolTable, column: usize) -> String {
    match label {
        Label::Epsilon => "<eps>".to_string(),
        Label::AnyChar => "<any>".to_string(),
        Label::NotInSet => "<not>".to_string(),
        Label::StartAnchor => "<^>".to_string(),
        Label::EndAnchor => "<$>".to_string(),
        Label::Symbol(s) if !symbols.is_empty() => match symbols.get_in(column, s) {
            Some(name) => name.to_string(),
            None => format!("#{s}"),
        },
        Label::Symbol(s) => match char::from_u32(s) {
            Some(c) if !c.is_control() => format!("'{c}'"),
            _ => format!("#{s}"),
        },
    }
}

impl Summary<'_> {
    /// Coarse shape of a transition relative to its end points.
    fn kind(&self, unit: usize, t: &Transition) -> &'static str {
        if self.automaton.is_final(unit, t.ter) {
            "end"
        } else if t.is_loop() {
            "loop"
        } else if t.ini + 1 == t.ter {
            "next"
        } else if t.ini + 2 == t.ter {
            "2next"
        } else if t.ini == 0 {
            "start"
        } else if t.ini > t.ter {
            "back"
        } else {
            ""
        }
    }

    fn state_text(&self, unit: usize, state: u32) -> String {
        if self.automaton.is_final(unit, state) {
            format!("({state})")
        } else {
            format!(" {state} ")
        }
    }

    fn write_transitions(&self, f: &mut fmt::Formatter<'_>, unit: usize) -> fmt::Result {
        let a = self.automaton;
        let column_for = |table: &SymbolTable| {
            if table.column_count() == a.unit_count() { unit } else { 0 }
        };
        let (in_col, out_col) = (column_for(&a.input_symbols), column_for(&a.output_symbols));

        writeln!(f, "  Transitions")?;
        for (i, t) in a.transitions(unit).iter().enumerate() {
            write!(
                f,
                "  {i:>7}: {:>8} -> {:<8} {:<6}",
                self.state_text(unit, t.ini),
                self.state_text(unit, t.ter),
                self.kind(unit, t)
            )?;
            if let Some(input) = t.input {
                write!(f, " {}", label_text(input, &a.input_symbols, in_col))?;
            }
            if let Some(output) = t.output {
                write!(f, ":{}", label_text(output, &a.output_symbols, out_col))?;
            }
            if let Some(weight) = t.weight {
                write!(f, " / {weight}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.automaton;
        let kind = a.get_type(Properties::ALL);

        writeln!(f, "Units      : {}", a.unit_count())?;
        writeln!(f, "States     : {}", a.state_count())?;
        writeln!(f, "Transitions: {}", a.transition_count())?;
        writeln!(f, "In-Symbols : {}", a.input_symbols.len())?;
        writeln!(f, "Out-Symbols: {}", a.output_symbols.len())?;
        writeln!(f, "Acceptor   : {}", yes_no(kind.contains(Properties::ACCEPTOR)))?;
        writeln!(f, "Transducer : {}", yes_no(kind.contains(Properties::TRANSDUCER)))?;
        writeln!(
            f,
            "Weights    : {}",
            a.schema.semiring.map_or("none", |sr| sr.name())
        )?;

        for (u, unit) in a.units.iter().enumerate() {
            let props = a.analyze(Some(u), Properties::ALL).map_err(|_| fmt::Error)?;
            writeln!(f)?;
            writeln!(f, "Unit {u}")?;
            writeln!(f, "  Name              : '{}'", unit.name)?;
            writeln!(
                f,
                "  States            : {:<4} (offset: {})",
                unit.state_count, unit.first_state
            )?;
            writeln!(
                f,
                "  Transitions       : {:<4} (offset: {})",
                unit.transition_count, unit.first_transition
            )?;
            for (flag, name) in [
                (Properties::LOOPS, "Loops             "),
                (Properties::FWD_CONNECTED, "Forward connected "),
                (Properties::BKW_CONNECTED, "Backward connected"),
                (Properties::FWD_TREE, "Forward tree      "),
                (Properties::BKW_TREE, "Backward tree     "),
            ] {
                writeln!(f, "  {name}: {}", yes_no(props.contains(flag)))?;
            }
            if self.transitions && unit.transition_count > 0 {
                self.write_transitions(f, u)?;
            }
        }
        Ok(())
    }
}
