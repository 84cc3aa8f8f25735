// wfst-cli: shared utilities for the command-line tools.

use std::process;

use tracing_subscriber::EnvFilter;
use wfst::MatchConfig;

/// Install a stderr `tracing` subscriber.
///
/// The filter comes from `RUST_LOG`; without it only warnings are shown,
/// e.g. skipped unit indices.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Remove an option with a value (`--name=VALUE`, `--name VALUE` or
/// `-s VALUE`) from `args`.
///
/// Returns `(value, remaining_args)`. The last occurrence wins. Exits with
/// an error if the option is given without a value.
pub fn take_option(
    args: &[String],
    long: &str,
    short: Option<&str>,
) -> (Option<String>, Vec<String>) {
    let prefix = format!("{long}=");
    let mut value = None;
    let mut remaining = Vec::new();
    let mut skip_next = false;

    for (i, arg) in args.iter().enumerate() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if let Some(val) = arg.strip_prefix(&prefix) {
            value = Some(val.to_string());
        } else if arg == long || short == Some(arg.as_str()) {
            match args.get(i + 1) {
                Some(next) => {
                    value = Some(next.clone());
                    skip_next = true;
                }
                None => fatal(&format!("{arg} requires a value")),
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (value, remaining)
}

/// Remove a boolean flag from `args`, returning whether it was present.
pub fn take_flag(args: &mut Vec<String>, names: &[&str]) -> bool {
    let before = args.len();
    args.retain(|a| !names.contains(&a.as_str()));
    args.len() != before
}

/// Build the matcher configuration from `--max-depth N` and `--no-memo`.
///
/// Returns the configuration and the remaining arguments.
pub fn parse_match_config(args: &[String]) -> Result<(MatchConfig, Vec<String>), String> {
    let (depth, mut rest) = take_option(args, "--max-depth", None);
    let mut config = MatchConfig::default();
    if take_flag(&mut rest, &["--no-memo"]) {
        config.memoize = false;
    }
    if let Some(depth) = depth {
        let depth: usize = depth
            .parse()
            .map_err(|e| format!("invalid --max-depth {depth:?}: {e}"))?;
        config = config.with_max_depth(depth);
    }
    Ok((config, rest))
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}
