// Regex compiler building a one-unit acceptor.

use tracing::{debug, instrument};

use super::RegexError;
use crate::FstError;
use crate::automaton::{Automaton, Schema};
use crate::transition::{Label, Transition};

/// Character class shorthands (`\d` and friends) as bracket class bodies.
const CLASS_SHORTHANDS: [(char, &str); 16] = [
    ('d', "0-9"),
    ('D', "^0-9"),
    ('x', "0-9A-Fa-f"),
    ('X', "^0-9A-Fa-f"),
    ('o', "0-7"),
    ('O', "^0-7"),
    ('w', "0-9A-Za-z_"),
    ('W', "^0-9A-Za-z_"),
    ('h', "0-9A-Za-z"),
    ('H', "^0-9A-Za-z"),
    ('a', "A-Za-z"),
    ('A', "^A-Za-z"),
    ('l', "a-z"),
    ('L', "^a-z"),
    ('u', "A-Z"),
    ('U', "^A-Z"),
];

fn shorthand_class(c: char) -> Option<&'static str> {
    CLASS_SHORTHANDS
        .iter()
        .find(|(name, _)| *name == c)
        .map(|(_, class)| *class)
}

impl Automaton {
    /// Replace `self` with an acceptor for `pattern`.
    ///
    /// The result has exactly one unit named `Regex: {pattern}` whose start
    /// state is 0 and which has exactly one final state. On a syntax error
    /// `self` is left empty.
    #[instrument(level = "trace", skip(self))]
    pub fn regex_compile(&mut self, pattern: &str) -> Result<(), FstError> {
        self.reset();
        self.schema = Schema::ACCEPTOR;
        let unit = self.add_unit(format!("Regex: {pattern}"));
        self.add_states(unit, 1, false)?;

        let chars: Vec<char> = pattern.chars().collect();
        let built = Builder { fst: &mut *self }.build(&chars);
        match built {
            Ok(last) => {
                self.set_final(unit, last, true)?;
                self.check();
                Ok(())
            }
            Err(e) => {
                debug!(pattern, error = %e, "regex compilation failed");
                self.reset();
                Err(e)
            }
        }
    }
}

/// Appends states and transitions to unit 0 while parsing.
struct Builder<'a> {
    fst: &'a mut Automaton,
}

impl Builder<'_> {
    /// Parse the whole pattern and return the state reached at its end.
    ///
    /// Open groups live on an explicit stack of (entry state, position of
    /// the `(`), so nesting depth is bounded by memory only.
    fn build(&mut self, pattern: &[char]) -> Result<u32, FstError> {
        let mut groups: Vec<(u32, usize)> = Vec::new();
        let mut state = 0;
        let mut pos = 0;
        while pos < pattern.len() {
            let (entry, exit, next) = match pattern[pos] {
                '(' => {
                    groups.push((state, pos));
                    pos += 1;
                    continue;
                }
                ')' => match groups.pop() {
                    Some((entry, _)) => (entry, state, pos + 1),
                    None => (state, self.arc(state, None, Label::char(')'))?, pos + 1),
                },
                _ => {
                    let (exit, next) = self.atom(pattern, pos, state)?;
                    (state, exit, next)
                }
            };
            (state, pos) = self.quantifier(pattern, next, entry, exit)?;
        }
        if let Some(&(_, position)) = groups.last() {
            return Err(RegexError::UnmatchedParen { position }.into());
        }
        Ok(state)
    }

    fn state(&mut self) -> Result<u32, FstError> {
        self.fst.add_states(0, 1, false)
    }

    /// Add a transition from `ini`, creating its target state if `ter` is `None`.
    /// Returns the target state.
    fn arc(&mut self, ini: u32, ter: Option<u32>, label: Label) -> Result<u32, FstError> {
        let ter = match ter {
            Some(ter) => ter,
            None => self.state()?,
        };
        self.fst.add_transition(0, Transition::acceptor(ini, ter, label))?;
        Ok(ter)
    }

    /// Compile the single atom at `pattern[pos]` leaving `entry`.
    /// Returns its exit state and the position after it.
    fn atom(&mut self, pattern: &[char], pos: usize, entry: u32) -> Result<(u32, usize), FstError> {
        match pattern[pos] {
            '[' => {
                let body = &pattern[pos + 1..];
                let (exit, stop) = self.select(body, entry)?;
                if stop >= body.len() {
                    return Err(RegexError::UnmatchedBracket { position: pos }.into());
                }
                Ok((exit, pos + 1 + stop + 1))
            }
            '.' => Ok((self.arc(entry, None, Label::AnyChar)?, pos + 1)),
            '^' => Ok((self.arc(entry, None, Label::StartAnchor)?, pos + 1)),
            '$' => Ok((self.arc(entry, None, Label::EndAnchor)?, pos + 1)),
            '\\' => {
                let Some(&c) = pattern.get(pos + 1) else {
                    return Err(RegexError::TrailingEscape { position: pos }.into());
                };
                let exit = match shorthand_class(c) {
                    Some(class) => {
                        let body: Vec<char> = class.chars().collect();
                        self.select(&body, entry)?.0
                    }
                    None => self.arc(entry, None, Label::char(c))?,
                };
                Ok((exit, pos + 2))
            }
            c => Ok((self.arc(entry, None, Label::char(c))?, pos + 1)),
        }
    }

    /// Apply the quantifier at `pattern[next]`, if any, to the fragment
    /// spanning `entry..exit`. Returns the new exit state and the position
    /// after the quantifier.
    fn quantifier(
        &mut self,
        pattern: &[char],
        mut next: usize,
        entry: u32,
        mut exit: u32,
    ) -> Result<(u32, usize), FstError> {
        match pattern.get(next) {
            Some('*') => {
                self.arc(exit, Some(entry), Label::Epsilon)?;
                exit = self.arc(entry, None, Label::Epsilon)?;
                next += 1;
            }
            Some('+') => {
                self.arc(exit, Some(entry), Label::Epsilon)?;
                next += 1;
            }
            Some('?') => {
                let bypass = self.arc(exit, None, Label::Epsilon)?;
                self.arc(entry, Some(bypass), Label::Epsilon)?;
                exit = bypass;
                next += 1;
            }
            _ => {}
        }
        Ok((exit, next))
    }

    /// Compile a bracket class body (without the opening `[`).
    ///
    /// All alternatives converge on one new exit state. A leading `^` first
    /// moves to a fresh state over a [`Label::NotInSet`] transition and the
    /// alternatives leave from there. Returns the exit state and the index
    /// in `body` where parsing stopped: the closing `]`, or `body.len()`.
    fn select(&mut self, body: &[char], start: u32) -> Result<(u32, usize), FstError> {
        let exit = self.state()?;
        let mut from = start;
        let mut i = 0;
        if body.first() == Some(&'^') {
            from = self.arc(start, None, Label::NotInSet)?;
            i = 1;
        }

        while i < body.len() && body[i] != ']' {
            if body[i] == '\\' {
                i += 1;
                if i >= body.len() {
                    break;
                }
            }
            let first = body[i];
            self.arc(from, Some(exit), Label::char(first))?;

            if body.get(i + 1) == Some(&'-') && body.get(i + 2).is_some_and(|&c| c != ']') {
                // Walk from the range's far end back toward `first`
                let stop = first as u32;
                let mut c = body[i + 2] as u32;
                while c != stop {
                    self.arc(from, Some(exit), Label::Symbol(c))?;
                    if c > stop { c -= 1 } else { c += 1 }
                }
                i += 2;
            }
            i += 1;
        }

        Ok((exit, i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(a: &Automaton) -> Vec<(u32, u32, Label)> {
        a.transitions(0)
            .iter()
            .map(|t| (t.ini, t.ter, t.input_label()))
            .collect()
    }

    fn finals(a: &Automaton) -> Vec<u32> {
        (0..a.states(0).len() as u32)
            .filter(|&s| a.is_final(0, s))
            .collect()
    }

    fn compiled(pattern: &str) -> Automaton {
        let mut a = Automaton::acceptor();
        a.regex_compile(pattern).unwrap();
        a
    }

    #[test]
    fn star_adds_back_edge_and_bypass() {
        let a = compiled("a*b");
        assert_eq!(a.units()[0].name, "Regex: a*b");
        assert_eq!(
            edges(&a),
            vec![
                (0, 1, Label::char('a')),
                (1, 0, Label::Epsilon),
                (0, 2, Label::Epsilon),
                (2, 3, Label::char('b')),
            ]
        );
        assert_eq!(finals(&a), vec![3]);
    }

    #[test]
    fn plus_adds_back_edge_only() {
        let a = compiled("a+");
        assert_eq!(
            edges(&a),
            vec![(0, 1, Label::char('a')), (1, 0, Label::Epsilon)]
        );
        assert_eq!(finals(&a), vec![1]);
    }

    #[test]
    fn question_adds_bypass_only() {
        let a = compiled("a?");
        assert_eq!(
            edges(&a),
            vec![
                (0, 1, Label::char('a')),
                (1, 2, Label::Epsilon),
                (0, 2, Label::Epsilon),
            ]
        );
        assert_eq!(finals(&a), vec![2]);
    }

    #[test]
    fn group_quantifier_spans_the_group() {
        let a = compiled("(ab)+");
        assert_eq!(
            edges(&a),
            vec![
                (0, 1, Label::char('a')),
                (1, 2, Label::char('b')),
                (2, 0, Label::Epsilon),
            ]
        );
    }

    #[test]
    fn class_converges_on_one_state() {
        let a = compiled("[a0-2]");
        assert_eq!(
            edges(&a),
            vec![
                (0, 1, Label::char('a')),
                (0, 1, Label::char('0')),
                (0, 1, Label::char('2')),
                (0, 1, Label::char('1')),
            ]
        );
        assert_eq!(finals(&a), vec![1]);
    }

    #[test]
    fn descending_range() {
        let a = compiled("[c-a]");
        let labels: Vec<Label> = edges(&a).into_iter().map(|e| e.2).collect();
        assert_eq!(
            labels,
            vec![Label::char('c'), Label::char('a'), Label::char('b')]
        );
    }

    #[test]
    fn negated_class_goes_through_marker_state() {
        let a = compiled("[^xy]");
        assert_eq!(
            edges(&a),
            vec![
                (0, 2, Label::NotInSet),
                (2, 1, Label::char('x')),
                (2, 1, Label::char('y')),
            ]
        );
        assert_eq!(finals(&a), vec![1]);
    }

    #[test]
    fn escapes_inside_class() {
        let a = compiled(r"[\]\\]");
        let labels: Vec<Label> = edges(&a).into_iter().map(|e| e.2).collect();
        assert_eq!(labels, vec![Label::char(']'), Label::char('\\')]);
    }

    #[test]
    fn shorthand_classes() {
        assert_eq!(compiled(r"\d").transition_count(), 10);
        let a = compiled(r"\D");
        assert_eq!(a.transition_count(), 11);
        assert_eq!(a.transitions(0)[0].input_label(), Label::NotInSet);
        assert_eq!(compiled(r"\w").transition_count(), 63);
    }

    #[test]
    fn escaped_operator_is_literal() {
        let a = compiled(r"a\*");
        assert_eq!(
            edges(&a),
            vec![(0, 1, Label::char('a')), (1, 2, Label::char('*'))]
        );
    }

    #[test]
    fn markers() {
        let a = compiled("^.$");
        let labels: Vec<Label> = edges(&a).into_iter().map(|e| e.2).collect();
        assert_eq!(
            labels,
            vec![Label::StartAnchor, Label::AnyChar, Label::EndAnchor]
        );
    }

    #[test]
    fn stray_close_paren_and_leading_quantifier_are_literals() {
        let a = compiled(")*");
        assert_eq!(a.transitions(0)[0].input_label(), Label::char(')'));
        let b = compiled("*a");
        assert_eq!(b.transitions(0)[0].input_label(), Label::char('*'));
    }

    #[test]
    fn empty_pattern_accepts_at_start_state() {
        let a = compiled("");
        assert_eq!(a.states(0).len(), 1);
        assert_eq!(finals(&a), vec![0]);
    }

    #[test]
    fn syntax_errors_leave_automaton_empty() {
        let cases = [
            ("(ab", RegexError::UnmatchedParen { position: 0 }),
            ("x(a(b)", RegexError::UnmatchedParen { position: 1 }),
            ("((a", RegexError::UnmatchedParen { position: 1 }),
            ("[ab", RegexError::UnmatchedBracket { position: 0 }),
            (r"a[b\", RegexError::UnmatchedBracket { position: 1 }),
            (r"ab\", RegexError::TrailingEscape { position: 2 }),
        ];
        for (pattern, expected) in cases {
            let mut a = compiled("abc");
            match a.regex_compile(pattern) {
                Err(FstError::Regex(e)) => assert_eq!(e, expected, "{pattern}"),
                other => panic!("{pattern}: unexpected {other:?}"),
            }
            assert!(a.is_empty(), "{pattern}");
            assert_eq!(a.state_count(), 0);
        }
    }

    #[test]
    fn deeply_nested_groups() {
        let depth = 20_000;
        let pattern = format!("{}a{}*", "(".repeat(depth), ")".repeat(depth));
        let a = compiled(&pattern);
        assert_eq!(
            edges(&a),
            vec![
                (0, 1, Label::char('a')),
                (1, 0, Label::Epsilon),
                (0, 2, Label::Epsilon),
            ]
        );
        assert_eq!(finals(&a), vec![2]);

        let unclosed = format!("{}a{}", "(".repeat(depth), ")".repeat(depth - 1));
        let mut b = Automaton::acceptor();
        assert!(matches!(
            b.regex_compile(&unclosed),
            Err(FstError::Regex(RegexError::UnmatchedParen { position: 0 }))
        ));
    }

    #[test]
    fn nested_group_quantifiers() {
        let a = compiled("(a(b)?)+");
        assert_eq!(
            edges(&a),
            vec![
                (0, 1, Label::char('a')),
                (1, 2, Label::char('b')),
                (2, 3, Label::Epsilon),
                (1, 3, Label::Epsilon),
                (3, 0, Label::Epsilon),
            ]
        );
        assert_eq!(finals(&a), vec![3]);
    }

    #[test]
    fn recompiling_replaces_previous_pattern() {
        let mut a = Automaton::transducer();
        a.regex_compile("ab").unwrap();
        a.regex_compile("c").unwrap();
        assert_eq!(a.schema(), Schema::ACCEPTOR);
        assert_eq!(a.unit_count(), 1);
        assert_eq!(edges(&a), vec![(0, 1, Label::char('c'))]);
    }
}
