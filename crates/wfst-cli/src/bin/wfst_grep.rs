// wfst-grep: Match a regular expression against lines of text.
//
// Texts are taken from the command line, or read from stdin (one per line)
// when none are given. For every text the leftmost-longest match is
// reported as:
//   START LEN    (offsets in characters)
//   -            (no match)
//
// Usage:
//   wfst-grep [OPTIONS] PATTERN [TEXT...]
//
// Options:
//   -l, --lines          Print matching lines instead of offsets
//   -o, --only-matching  Print only the matched part of each line
//   --max-depth N        Search stack limit of the matcher
//   --no-memo            Disable the matcher's result cache
//   -h, --help           Print help
//
// Exit status is 0 if any text matched, 1 otherwise.

use std::io::{self, BufRead, Write};
use std::process;

use tracing::debug;
use wfst::Regex;

fn main() {
    wfst_cli::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if wfst_cli::wants_help(&args) {
        println!("wfst-grep: Match a regular expression against lines of text.");
        println!();
        println!("Usage: wfst-grep [OPTIONS] PATTERN [TEXT...]");
        println!();
        println!("Reads texts from stdin when none are given. Prints per text:");
        println!("  START LEN    leftmost-longest match (character offsets)");
        println!("  -            no match");
        println!();
        println!("Options:");
        println!("  -l, --lines          Print matching lines instead of offsets");
        println!("  -o, --only-matching  Print only the matched part of each line");
        println!("  --max-depth N        Search stack limit of the matcher");
        println!("  --no-memo            Disable the matcher's result cache");
        println!("  -h, --help           Print this help");
        return;
    }

    let (config, mut args) =
        wfst_cli::parse_match_config(&args).unwrap_or_else(|e| wfst_cli::fatal(&e));
    let print_lines = wfst_cli::take_flag(&mut args, &["-l", "--lines"]);
    let only_matching = wfst_cli::take_flag(&mut args, &["-o", "--only-matching"]);

    let Some((pattern, texts)) = args.split_first() else {
        wfst_cli::fatal("missing PATTERN (see --help)");
    };
    let re = Regex::new(pattern)
        .unwrap_or_else(|e| wfst_cli::fatal(&e.to_string()))
        .with_config(config);
    debug!(pattern, states = re.automaton().state_count(), "compiled pattern");

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut matched_any = false;

    let mut handle = |text: &str| {
        let found = re.find(text).unwrap_or_else(|e| wfst_cli::fatal(&e.to_string()));
        match found {
            Some(m) => {
                matched_any = true;
                if only_matching {
                    let _ = writeln!(out, "{}", m.as_str(text));
                } else if print_lines {
                    let _ = writeln!(out, "{text}");
                } else {
                    let _ = writeln!(out, "{} {}", m.start, m.len);
                }
            }
            None if !print_lines && !only_matching => {
                let _ = writeln!(out, "-");
            }
            None => {}
        }
    };

    if texts.is_empty() {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(l) => handle(&l),
                Err(e) => {
                    eprintln!("error reading stdin: {e}");
                    break;
                }
            }
        }
    } else {
        for text in texts {
            handle(text);
        }
    }

    let _ = out.flush();
    if !matched_any {
        process::exit(1);
    }
}
