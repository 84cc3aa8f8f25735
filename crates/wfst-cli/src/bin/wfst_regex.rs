// wfst-regex: Compile a regular expression and describe the automaton.
//
// Prints the status report of the compiled acceptor: table sizes, type
// and the topology properties of its unit.
//
// Usage:
//   wfst-regex [OPTIONS] PATTERN
//
// Options:
//   -t, --transitions   Also list every transition
//   --hmm               Describe the HMM expansion of the automaton instead
//   -h, --help          Print help

use wfst::Automaton;

fn main() {
    wfst_cli::init_tracing();
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    if wfst_cli::wants_help(&args) {
        println!("wfst-regex: Compile a regular expression and describe the automaton.");
        println!();
        println!("Usage: wfst-regex [OPTIONS] PATTERN");
        println!();
        println!("Options:");
        println!("  -t, --transitions   Also list every transition");
        println!("  --hmm               Describe the HMM expansion of the automaton instead");
        println!("  -h, --help          Print this help");
        return;
    }

    let transitions = wfst_cli::take_flag(&mut args, &["-t", "--transitions"]);
    let hmm = wfst_cli::take_flag(&mut args, &["--hmm"]);
    let pattern = match args.as_slice() {
        [pattern] => pattern,
        [] => wfst_cli::fatal("missing PATTERN (see --help)"),
        _ => wfst_cli::fatal("expected exactly one PATTERN (see --help)"),
    };

    let mut fst = wfst::regex::compile(pattern).unwrap_or_else(|e| wfst_cli::fatal(&e.to_string()));
    if hmm {
        let src = fst;
        fst = Automaton::acceptor();
        fst.hmm(&src, None)
            .unwrap_or_else(|e| wfst_cli::fatal(&e.to_string()));
    }

    if transitions {
        print!("{}", fst.listing());
    } else {
        print!("{}", fst.summary());
    }
}
