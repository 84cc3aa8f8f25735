// Transition labels, transition records and per-unit transition indexes.

use crate::automaton::Automaton;

/// Input or output label of a transition.
///
/// Real symbols address a symbol table (or, for regex automata, carry a
/// character code point). The remaining variants are markers that never
/// appear in a symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// Consumed without reading input.
    Epsilon,
    /// Symbol table index, or a `char` code point in regex automata.
    Symbol(u32),
    /// Regex `.`: any single character.
    AnyChar,
    /// Regex `[^...]`: one character not among the alternatives that
    /// leave the transition's terminal state.
    NotInSet,
    /// Regex `^`.
    StartAnchor,
    /// Regex `$`.
    EndAnchor,
}

impl Label {
    /// Label for a literal character.
    #[inline]
    pub fn char(c: char) -> Self {
        Label::Symbol(c as u32)
    }

    #[inline]
    pub fn is_epsilon(self) -> bool {
        self == Label::Epsilon
    }

    /// True if the label is a real symbol (not epsilon, not a regex marker).
    #[inline]
    pub fn is_symbol(self) -> bool {
        matches!(self, Label::Symbol(_))
    }
}

/// One transition of a unit.
///
/// `ini` and `ter` are unit-relative state indices. The optional fields
/// mirror the container schema: `input` is present iff the automaton has
/// an input label column, `output` iff it has an output label column,
/// `weight` iff it carries a weight semiring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub ini: u32,
    pub ter: u32,
    pub input: Option<Label>,
    pub output: Option<Label>,
    pub weight: Option<f64>,
}

impl Transition {
    /// A transition with no labels and no weight.
    pub fn new(ini: u32, ter: u32) -> Self {
        Self {
            ini,
            ter,
            input: None,
            output: None,
            weight: None,
        }
    }

    /// An acceptor transition reading `input`.
    pub fn acceptor(ini: u32, ter: u32, input: Label) -> Self {
        Self {
            input: Some(input),
            ..Self::new(ini, ter)
        }
    }

    /// A transducer transition reading `input` and writing `output`.
    pub fn transducer(ini: u32, ter: u32, input: Label, output: Label) -> Self {
        Self {
            input: Some(input),
            output: Some(output),
            ..Self::new(ini, ter)
        }
    }

    /// Builder-style weight setter.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Input label, treating a missing input column as epsilon.
    #[inline]
    pub fn input_label(&self) -> Label {
        self.input.unwrap_or(Label::Epsilon)
    }

    /// True if the transition starts and ends in the same state.
    #[inline]
    pub fn is_loop(&self) -> bool {
        self.ini == self.ter
    }
}

/// Which end of a transition the index groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Group by initial state: iterate the transitions leaving a state.
    Outgoing,
    /// Group by terminal state: iterate the transitions entering a state.
    Incoming,
}

/// Transitions of one unit grouped by initial or terminal state.
///
/// Compressed-row layout: `offsets[s]..offsets[s + 1]` is the slice of
/// `order` holding the (unit-relative) transition indices attached to
/// state `s`, in table order. The index borrows the automaton, so any
/// mutation of the automaton requires building a new index.
pub struct TransitionIndex<'a> {
    transitions: &'a [Transition],
    offsets: Vec<u32>,
    order: Vec<u32>,
}

impl<'a> TransitionIndex<'a> {
    /// Build the index for `unit`. The caller guarantees the unit exists.
    pub fn new(automaton: &'a Automaton, unit: usize, direction: Direction) -> Self {
        let transitions = automaton.transitions(unit);
        let state_count = automaton.units()[unit].state_count;

        let key = |t: &Transition| match direction {
            Direction::Outgoing => t.ini as usize,
            Direction::Incoming => t.ter as usize,
        };

        let mut offsets = vec![0u32; state_count + 1];
        for t in transitions {
            offsets[key(t) + 1] += 1;
        }
        for s in 0..state_count {
            offsets[s + 1] += offsets[s];
        }

        let mut fill = offsets.clone();
        let mut order = vec![0u32; transitions.len()];
        for (i, t) in transitions.iter().enumerate() {
            let slot = &mut fill[key(t)];
            order[*slot as usize] = i as u32;
            *slot += 1;
        }

        Self {
            transitions,
            offsets,
            order,
        }
    }

    /// Unit-relative indices of the transitions attached to `state`.
    pub fn ids(&self, state: u32) -> &[u32] {
        let s = state as usize;
        if s + 1 >= self.offsets.len() {
            return &[];
        }
        &self.order[self.offsets[s] as usize..self.offsets[s + 1] as usize]
    }

    /// The transitions attached to `state`, in table order.
    pub fn iter(&self, state: u32) -> impl Iterator<Item = &'a Transition> + '_ {
        let transitions = self.transitions;
        self.ids(state).iter().map(move |&i| &transitions[i as usize])
    }

    /// The `k`-th transition attached to `state`.
    pub fn get(&self, state: u32, k: usize) -> Option<&'a Transition> {
        let transitions = self.transitions;
        self.ids(state).get(k).map(|&i| &transitions[i as usize])
    }

    /// Number of transitions attached to `state`.
    pub fn degree(&self, state: u32) -> usize {
        self.ids(state).len()
    }
}
