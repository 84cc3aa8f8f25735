// Backtracking matcher for compiled regex automata.

use hashbrown::{HashMap, HashSet};
use tracing::{instrument, trace};

use super::Match;
use crate::FstError;
use crate::automaton::{Automaton, State};
use crate::config::MatchConfig;
use crate::transition::{Direction, Label, Transition, TransitionIndex};

/// Search node: state, text position, and whether `^` can still hold.
type Node = (u32, usize, bool);

#[derive(Debug, Clone, Copy)]
struct Outcome {
    /// Longest match length from this node, if any path reaches a final state.
    best: Option<usize>,
    /// Some path below was cut on an epsilon cycle.
    cut: bool,
}

/// One node on the explicit search stack.
#[derive(Debug)]
struct Frame {
    node: Node,
    /// Next outgoing transition of `node.0` to try.
    cursor: usize,
    /// Characters consumed by the transition into the child being explored.
    consumed: usize,
    best: Option<usize>,
    cut: bool,
}

struct Matcher<'a> {
    index: &'a TransitionIndex<'a>,
    states: &'a [State],
    text: &'a [char],
    config: &'a MatchConfig,
    memo: HashMap<Node, Option<usize>>,
    on_path: HashSet<Node>,
    stack: Vec<Frame>,
}

impl Matcher<'_> {
    /// Longest match from `root`, searched depth first over `self.stack`.
    fn match_from(&mut self, root: Node) -> Result<Outcome, FstError> {
        let mut returned = self.enter(root)?;
        while let Some(frame) = self.stack.last_mut() {
            if let Some(sub) = returned.take() {
                frame.cut |= sub.cut;
                if let Some(len) = sub.best {
                    frame.best = frame.best.max(Some(len + frame.consumed));
                }
            }
            returned = match self.advance() {
                Some(child) => self.enter(child)?,
                None => self.stack.pop().map(|frame| self.leave(frame)),
            };
        }
        Ok(returned.unwrap_or(Outcome {
            best: None,
            cut: false,
        }))
    }

    /// Start exploring `node`. Returns its outcome right away when it is
    /// memoized or already on the current path; otherwise pushes a frame.
    fn enter(&mut self, node: Node) -> Result<Option<Outcome>, FstError> {
        if self.config.memoize {
            if let Some(&best) = self.memo.get(&node) {
                return Ok(Some(Outcome { best, cut: false }));
            }
        }
        if self.on_path.contains(&node) {
            return Ok(Some(Outcome {
                best: None,
                cut: true,
            }));
        }
        if self.stack.len() >= self.config.max_depth {
            self.stack.clear();
            self.on_path.clear();
            return Err(FstError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        self.on_path.insert(node);
        self.stack.push(Frame {
            node,
            cursor: 0,
            consumed: 0,
            best: self.states[node.0 as usize].is_final().then_some(0),
            cut: false,
        });
        Ok(None)
    }

    /// Record the outcome of a frame popped off the stack.
    fn leave(&mut self, frame: Frame) -> Outcome {
        self.on_path.remove(&frame.node);
        if self.config.memoize && !frame.cut {
            self.memo.insert(frame.node, frame.best);
        }
        Outcome {
            best: frame.best,
            cut: frame.cut,
        }
    }

    /// Move the top frame's cursor to the next transition that applies at
    /// its position and return the node that transition leads to.
    fn advance(&mut self) -> Option<Node> {
        let index = self.index;
        let (state, pos, at_start) = self.stack.last()?.node;
        loop {
            let t = index.get(state, self.stack.last()?.cursor)?;
            let step = self.step(t, pos, at_start);
            let frame = self.stack.last_mut()?;
            frame.cursor += 1;
            if let Some((ter, consumed)) = step {
                frame.consumed = consumed;
                return Some((ter, pos + consumed, at_start && consumed == 0));
            }
        }
    }

    fn step(&self, t: &Transition, pos: usize, at_start: bool) -> Option<(u32, usize)> {
        // Once the text is exhausted only epsilon and `$` can advance
        match (t.input_label(), self.text.get(pos).copied()) {
            (Label::Epsilon, _) => Some((t.ter, 0)),
            (Label::EndAnchor, None) => Some((t.ter, 0)),
            (Label::EndAnchor, Some(_)) | (_, None) => None,
            (Label::AnyChar, Some(_)) => Some((t.ter, 1)),
            (Label::NotInSet, Some(c)) => self.not_in_set(t.ter, c).map(|ter| (ter, 1)),
            (Label::StartAnchor, Some(_)) => at_start.then_some((t.ter, 0)),
            (Label::Symbol(s), Some(c)) => (s == c as u32).then_some((t.ter, 1)),
        }
    }

    /// Resolve a `[^...]` transition entering `set_state` against `c`.
    ///
    /// The alternatives are the labels leaving `set_state`. Fails if
    /// `set_state` is final, has no alternatives, or one of them is `c`;
    /// otherwise yields the target of the last alternative.
    fn not_in_set(&self, set_state: u32, c: char) -> Option<u32> {
        if self.states[set_state as usize].is_final() {
            return None;
        }
        let mut exit = None;
        for t in self.index.iter(set_state) {
            if t.input_label() == Label::char(c) {
                return None;
            }
            exit = Some(t.ter);
        }
        exit
    }
}

impl Automaton {
    /// Match the regex automaton in unit 0 against `text` with the default
    /// [`MatchConfig`].
    pub fn regex_match(&self, text: &str) -> Result<Option<Match>, FstError> {
        self.regex_match_with(text, &MatchConfig::default())
    }

    /// Find the leftmost start offset at which unit 0 accepts a prefix of
    /// the remaining text, and the longest such prefix there.
    ///
    /// Offsets `0..len` are tried in order, so empty text never matches.
    /// `^` holds only for an attempt at offset 0 before anything has been
    /// consumed. `Ok(None)` means no match.
    #[instrument(level = "trace", skip(self, config), fields(text_len = text.len()))]
    pub fn regex_match_with(
        &self,
        text: &str,
        config: &MatchConfig,
    ) -> Result<Option<Match>, FstError> {
        let unit = self.units.first().ok_or(FstError::NoUnits)?;
        if unit.state_count == 0 {
            return Err(FstError::EmptyUnit { unit: 0 });
        }
        self.check();

        let chars: Vec<char> = text.chars().collect();
        let index = TransitionIndex::new(self, 0, Direction::Outgoing);
        let mut matcher = Matcher {
            index: &index,
            states: self.states(0),
            text: &chars,
            config,
            memo: HashMap::new(),
            on_path: HashSet::new(),
            stack: Vec::new(),
        };

        for start in 0..chars.len() {
            if let Some(len) = matcher.match_from((0, start, start == 0))?.best {
                trace!(start, len, memo = matcher.memo.len(), "match found");
                return Ok(Some(Match { start, len }));
            }
        }
        Ok(None)
    }
}
