// Graph analysis: per-unit topology properties and automaton-wide type.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use tracing::instrument;

use crate::FstError;
use crate::automaton::Automaton;

/// Bit set of automaton type and unit topology properties.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Properties(u32);

impl Properties {
    pub const NONE: Properties = Properties(0);

    /// Transitions carry input labels.
    pub const ACCEPTOR: Properties = Properties(0x0001);
    /// Transitions carry input and output labels. Includes [`Properties::ACCEPTOR`].
    pub const TRANSDUCER: Properties = Properties(0x0003);
    /// Transitions carry weights in a known semiring.
    pub const WEIGHTED: Properties = Properties(0x0004);

    /// Some transition starts and ends in the same state.
    pub const LOOPS: Properties = Properties(0x0100);
    /// Every state except state 0 has an incoming non-loop transition.
    pub const FWD_CONNECTED: Properties = Properties(0x0200);
    /// Every non-final state has an outgoing non-loop transition.
    pub const BKW_CONNECTED: Properties = Properties(0x0400);
    /// No state has more than one incoming non-loop transition.
    pub const FWD_TREE: Properties = Properties(0x0800);
    /// No state except state 0 has more than one outgoing non-loop transition.
    pub const BKW_TREE: Properties = Properties(0x1000);

    pub const TOPOLOGY: Properties = Properties(0x1F00);
    pub const ALL: Properties = Properties(u32::MAX);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Properties(bits)
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Properties) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn remove(&mut self, other: Properties) {
        self.0 &= !other.0;
    }
}

impl BitOr for Properties {
    type Output = Properties;
    fn bitor(self, rhs: Properties) -> Properties {
        Properties(self.0 | rhs.0)
    }
}

impl BitOrAssign for Properties {
    fn bitor_assign(&mut self, rhs: Properties) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Properties {
    type Output = Properties;
    fn bitand(self, rhs: Properties) -> Properties {
        Properties(self.0 & rhs.0)
    }
}

impl fmt::Debug for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Properties, &str); 8] = [
            (Properties::TRANSDUCER, "TRANSDUCER"),
            (Properties::ACCEPTOR, "ACCEPTOR"),
            (Properties::WEIGHTED, "WEIGHTED"),
            (Properties::LOOPS, "LOOPS"),
            (Properties::FWD_CONNECTED, "FWD_CONNECTED"),
            (Properties::BKW_CONNECTED, "BKW_CONNECTED"),
            (Properties::FWD_TREE, "FWD_TREE"),
            (Properties::BKW_TREE, "BKW_TREE"),
        ];
        let mut rest = *self;
        let mut names = Vec::new();
        for (p, name) in NAMES {
            if rest.contains(p) {
                names.push(name);
                rest.remove(p);
            }
        }
        if !rest.is_empty() {
            return write!(f, "Properties({}|{:#x})", names.join("|"), rest.0);
        }
        write!(f, "Properties({})", names.join("|"))
    }
}

/// Turn an empty mask into "everything".
fn effective_mask(mask: Properties) -> Properties {
    if mask.is_empty() { Properties::ALL } else { mask }
}

impl Automaton {
    /// Classify the automaton as acceptor, transducer and/or weighted.
    ///
    /// Depends only on the transition schema, never on a unit's topology.
    pub fn get_type(&self, mask: Properties) -> Properties {
        let mut props = Properties::NONE;
        if self.schema.input {
            props |= Properties::ACCEPTOR;
        }
        if self.schema.input && self.schema.output {
            props |= Properties::TRANSDUCER;
        }
        if self.schema.semiring.is_some() {
            props |= Properties::WEIGHTED;
        }
        props & effective_mask(mask)
    }

    /// Compute the topology properties of one unit, or of all units when
    /// `unit` is `None`, combined with [`Automaton::get_type`].
    ///
    /// For all units the topology bits are the logical AND over the units.
    /// An empty `mask` selects every property.
    #[instrument(level = "trace", skip(self))]
    pub fn analyze(&self, unit: Option<usize>, mask: Properties) -> Result<Properties, FstError> {
        let mask = effective_mask(mask);
        let topology = match unit {
            Some(u) => {
                self.unit_checked(u)?;
                self.unit_topology(u)
            }
            None => (0..self.unit_count())
                .map(|u| self.unit_topology(u))
                .fold(Properties::TOPOLOGY, |acc, p| acc & p),
        };
        Ok((topology | self.get_type(Properties::ALL)) & mask)
    }

    /// Single pass over the unit's transitions counting incoming and outgoing
    /// non-loop transitions per state.
    fn unit_topology(&self, unit: usize) -> Properties {
        let states = self.states(unit);
        let n = states.len();
        let mut outgoing = vec![0u32; n];
        let mut incoming = vec![0u32; n];
        let mut props = Properties::FWD_CONNECTED
            | Properties::BKW_CONNECTED
            | Properties::FWD_TREE
            | Properties::BKW_TREE;

        for t in self.transitions(unit) {
            if t.is_loop() {
                props |= Properties::LOOPS;
                continue;
            }
            if let Some(c) = outgoing.get_mut(t.ini as usize) {
                *c += 1;
            }
            if let Some(c) = incoming.get_mut(t.ter as usize) {
                *c += 1;
            }
        }

        for (s, state) in states.iter().enumerate() {
            if s > 0 && incoming[s] == 0 {
                props.remove(Properties::FWD_CONNECTED);
            }
            if !state.is_final() && outgoing[s] == 0 {
                props.remove(Properties::BKW_CONNECTED);
            }
            if incoming[s] > 1 {
                props.remove(Properties::FWD_TREE);
            }
            if s > 0 && outgoing[s] > 1 {
                props.remove(Properties::BKW_TREE);
            }
        }

        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Schema;
    use crate::transition::{Label, Transition};
    use wfst_core::Semiring;

    fn chain(a: &mut Automaton, len: u32) -> usize {
        let u = a.add_unit("chain");
        a.add_states(u, len as usize + 1, false).unwrap();
        a.set_final(u, len, true).unwrap();
        for s in 0..len {
            a.add_transition(u, Transition::acceptor(s, s + 1, Label::Symbol(s)))
                .unwrap();
        }
        u
    }

    #[test]
    fn linear_chain_is_connected_tree() {
        let mut a = Automaton::acceptor();
        let u = chain(&mut a, 3);
        let p = a.analyze(Some(u), Properties::NONE).unwrap();
        assert!(p.contains(Properties::FWD_CONNECTED | Properties::BKW_CONNECTED));
        assert!(p.contains(Properties::FWD_TREE | Properties::BKW_TREE));
        assert!(!p.contains(Properties::LOOPS));
        assert!(p.contains(Properties::ACCEPTOR));
        assert!(!p.contains(Properties::TRANSDUCER));
    }

    #[test]
    fn self_loop_is_detected_and_not_counted() {
        let mut a = Automaton::acceptor();
        let u = chain(&mut a, 1);
        a.add_transition(u, Transition::acceptor(1, 1, Label::Symbol(9)))
            .unwrap();
        let p = a.analyze(Some(u), Properties::TOPOLOGY).unwrap();
        assert!(p.contains(Properties::LOOPS));
        // The loop adds no second incoming edge to state 1
        assert!(p.contains(Properties::FWD_TREE));
    }

    #[test]
    fn join_breaks_forward_tree() {
        let mut a = Automaton::acceptor();
        let u = a.add_unit("join");
        a.add_states(u, 3, false).unwrap();
        a.set_final(u, 2, true).unwrap();
        a.add_transition(u, Transition::acceptor(0, 1, Label::Symbol(0))).unwrap();
        a.add_transition(u, Transition::acceptor(0, 2, Label::Symbol(1))).unwrap();
        a.add_transition(u, Transition::acceptor(1, 2, Label::Symbol(2))).unwrap();
        let p = a.analyze(Some(u), Properties::NONE).unwrap();
        assert!(!p.contains(Properties::FWD_TREE));
        // State 0 may branch; state 1 has one outgoing edge
        assert!(p.contains(Properties::BKW_TREE));
    }

    #[test]
    fn branch_after_start_breaks_backward_tree() {
        let mut a = Automaton::acceptor();
        let u = a.add_unit("fork");
        a.add_states(u, 4, true).unwrap();
        a.add_transition(u, Transition::acceptor(0, 1, Label::Symbol(0))).unwrap();
        a.add_transition(u, Transition::acceptor(1, 2, Label::Symbol(1))).unwrap();
        a.add_transition(u, Transition::acceptor(1, 3, Label::Symbol(2))).unwrap();
        let p = a.analyze(Some(u), Properties::NONE).unwrap();
        assert!(!p.contains(Properties::BKW_TREE));
        assert!(p.contains(Properties::FWD_TREE));
    }

    #[test]
    fn unreachable_state_breaks_forward_connection() {
        let mut a = Automaton::acceptor();
        let u = chain(&mut a, 1);
        a.add_states(u, 1, true).unwrap();
        let p = a.analyze(Some(u), Properties::NONE).unwrap();
        assert!(!p.contains(Properties::FWD_CONNECTED));
        assert!(p.contains(Properties::BKW_CONNECTED));
    }

    #[test]
    fn lone_state_boundary() {
        let mut a = Automaton::acceptor();
        let u = a.add_unit("lone");
        a.add_states(u, 1, false).unwrap();
        let p = a.analyze(Some(u), Properties::TOPOLOGY).unwrap();
        // State 0 is exempt from the forward check only
        assert!(p.contains(Properties::FWD_CONNECTED));
        assert!(!p.contains(Properties::BKW_CONNECTED));

        a.set_final(u, 0, true).unwrap();
        let p = a.analyze(Some(u), Properties::TOPOLOGY).unwrap();
        assert!(p.contains(Properties::FWD_CONNECTED | Properties::BKW_CONNECTED));
    }

    #[test]
    fn all_units_are_anded() {
        let mut a = Automaton::acceptor();
        chain(&mut a, 2);
        let u = chain(&mut a, 1);
        a.add_transition(u, Transition::acceptor(0, 0, Label::Symbol(7)))
            .unwrap();
        let p = a.analyze(None, Properties::NONE).unwrap();
        assert!(!p.contains(Properties::LOOPS));
        assert!(p.contains(Properties::FWD_CONNECTED));
        let p1 = a.analyze(Some(1), Properties::NONE).unwrap();
        assert!(p1.contains(Properties::LOOPS));
    }

    #[test]
    fn mask_filters_result() {
        let mut a = Automaton::acceptor();
        let u = chain(&mut a, 2);
        let p = a.analyze(Some(u), Properties::LOOPS | Properties::FWD_TREE).unwrap();
        assert_eq!(p, Properties::FWD_TREE);
    }

    #[test]
    fn bad_unit_is_an_error() {
        let a = Automaton::acceptor();
        assert!(matches!(
            a.analyze(Some(0), Properties::NONE),
            Err(FstError::BadUnit { unit: 0, count: 0 })
        ));
    }

    #[test]
    fn analyze_is_idempotent() {
        let mut a = Automaton::acceptor();
        let u = chain(&mut a, 4);
        let first = a.analyze(Some(u), Properties::NONE).unwrap();
        let second = a.analyze(Some(u), Properties::NONE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn type_classification() {
        assert_eq!(Automaton::acceptor().get_type(Properties::ALL), Properties::ACCEPTOR);
        assert_eq!(
            Automaton::transducer().get_type(Properties::ALL),
            Properties::TRANSDUCER
        );
        let weighted = Automaton::with_schema(Schema::TRANSDUCER.weighted(Semiring::Tropical));
        assert!(
            weighted
                .get_type(Properties::NONE)
                .contains(Properties::WEIGHTED | Properties::TRANSDUCER)
        );
        assert_eq!(
            weighted.get_type(Properties::WEIGHTED),
            Properties::WEIGHTED
        );
        assert_eq!(
            Automaton::with_schema(Schema::default()).get_type(Properties::ALL),
            Properties::NONE
        );
    }

    #[test]
    fn debug_lists_names() {
        let p = Properties::TRANSDUCER | Properties::LOOPS;
        assert_eq!(format!("{p:?}"), "Properties(TRANSDUCER|LOOPS)");
    }
}
