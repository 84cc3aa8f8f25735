//! Golden regex vectors: pattern, text and the expected leftmost-longest
//! match, stored in `tests/data/regex_vectors.json`.
//!
//! Run: cargo test -p wfst --test regex_vectors

use std::path::PathBuf;

use serde::Deserialize;
use wfst::{Automaton, Match, MatchConfig, Regex};

#[derive(Debug, Deserialize)]
struct Vector {
    pattern: String,
    text: String,
    /// `[start, len]`, or `null` for no match.
    #[serde(rename = "match")]
    expected: Option<[usize; 2]>,
}

fn load_vectors() -> Vec<Vector> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/regex_vectors.json");
    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    serde_json::from_str(&contents)
        .unwrap_or_else(|e| panic!("failed to parse {}: {}", path.display(), e))
}

fn expected(v: &Vector) -> Option<Match> {
    v.expected.map(|[start, len]| Match { start, len })
}

#[test]
fn vector_file_is_complete() {
    assert_eq!(load_vectors().len(), 26);
}

#[test]
fn golden_vectors_memoized() {
    let mut failures = Vec::new();
    for v in load_vectors() {
        let re = Regex::new(&v.pattern)
            .unwrap_or_else(|e| panic!("failed to compile {:?}: {}", v.pattern, e));
        let got = re.find(&v.text).unwrap();
        if got != expected(&v) {
            failures.push(format!(
                "{:?} on {:?}: expected {:?}, got {:?}",
                v.pattern,
                v.text,
                expected(&v),
                got
            ));
        }
    }
    assert!(failures.is_empty(), "mismatches:\n{}", failures.join("\n"));
}

#[test]
fn golden_vectors_plain_backtracking() {
    for v in load_vectors() {
        let re = Regex::new(&v.pattern)
            .unwrap()
            .with_config(MatchConfig::unmemoized());
        assert_eq!(re.find(&v.text).unwrap(), expected(&v), "{:?} on {:?}", v.pattern, v.text);
    }
}

#[test]
fn one_automaton_recompiled_for_every_vector() {
    let mut fst = Automaton::acceptor();
    for v in load_vectors() {
        fst.regex_compile(&v.pattern).unwrap();
        assert_eq!(fst.unit_count(), 1);
        assert_eq!(fst.verify(), Ok(()));
        assert_eq!(fst.regex_match(&v.text).unwrap(), expected(&v), "{:?}", v.pattern);
    }
}

#[test]
fn every_compiled_pattern_has_one_final_state() {
    for v in load_vectors() {
        let fst = wfst::regex::compile(&v.pattern).unwrap();
        let finals = fst.states(0).iter().filter(|s| s.is_final()).count();
        assert_eq!(finals, 1, "{:?}", v.pattern);
    }
}
