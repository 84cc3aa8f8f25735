//! Regular expressions compiled to single-unit acceptors.
//!
//! Supported syntax:
//!
//! | Syntax        | Meaning                                             |
//! |---------------|-----------------------------------------------------|
//! | `c`           | the literal character `c`                           |
//! | `\c`          | literal `c` (unless `c` names a class below)        |
//! | `.`           | any character                                       |
//! | `[abc]`       | one of the listed characters; `a-z` ranges allowed  |
//! | `[^abc]`      | any character not listed                            |
//! | `(...)`       | group                                               |
//! | `*` `+` `?`   | zero or more, one or more, optional                 |
//! | `^` `$`       | start of text, end of text                          |
//! | `\d` `\x` `\o` | decimal, hex or octal digit                         |
//! | `\w` `\h`      | word character, alphanumeric                        |
//! | `\a` `\l` `\u` | letter, lower case letter, upper case letter        |
//!
//! An upper-case class letter (`\D`, `\W`, ...) negates the class. There is
//! no alternation operator.
//!
//! Matching is leftmost, then longest: the first start offset with any
//! match wins, and at that offset the longest match is reported.

mod compile;
mod matcher;

use crate::FstError;
use crate::automaton::Automaton;
use crate::config::MatchConfig;

/// Syntax error in a regular expression. Positions are character indices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegexError {
    #[error("no matching ')' for '(' at position {position}")]
    UnmatchedParen { position: usize },
    #[error("no matching ']' for '[' at position {position}")]
    UnmatchedBracket { position: usize },
    #[error("trailing backslash at position {position}")]
    TrailingEscape { position: usize },
}

/// A successful match. Offsets are counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub len: usize,
}

impl Match {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The matched part of `text`, which must be the text that was matched.
    pub fn as_str<'t>(&self, text: &'t str) -> &'t str {
        let mut indices = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len()));
        let begin = indices.nth(self.start).unwrap_or(text.len());
        let end = if self.len == 0 {
            begin
        } else {
            indices.nth(self.len - 1).unwrap_or(text.len())
        };
        &text[begin..end]
    }
}

/// Compile `pattern` into a new acceptor.
pub fn compile(pattern: &str) -> Result<Automaton, FstError> {
    let mut automaton = Automaton::acceptor();
    automaton.regex_compile(pattern)?;
    Ok(automaton)
}

/// A compiled regular expression together with its match options.
#[derive(Debug, Clone)]
pub struct Regex {
    pattern: String,
    automaton: Automaton,
    config: MatchConfig,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self, FstError> {
        Ok(Self {
            pattern: pattern.to_string(),
            automaton: compile(pattern)?,
            config: MatchConfig::default(),
        })
    }

    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Leftmost-longest match in `text`, if any.
    pub fn find(&self, text: &str) -> Result<Option<Match>, FstError> {
        self.automaton.regex_match_with(text, &self.config)
    }

    pub fn is_match(&self, text: &str) -> Result<bool, FstError> {
        Ok(self.find(text)?.is_some())
    }
}
