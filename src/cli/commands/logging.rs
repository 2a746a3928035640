//! Log output flags shared by every subcommand.
//!
//! `-v` may be repeated (`-v` warn, `-vv` info, `-vvv` debug, `-vvvv` trace).
//! `--log-level` names the level directly and wins over `-v`.

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::path::PathBuf;
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_LEVEL: &str = "log-level";
pub const ARG_ERROR_LOG: &str = "error-log";

/// Parse a level name as accepted by `--log-level` and `SHOWROOM_LOG_LEVEL`.
///
/// # Errors
/// Returns an error for anything but `error`, `warn`, `info`, `debug` or `trace`.
pub fn parse_log_level(level: &str) -> Result<Level, String> {
    match level.to_ascii_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(format!(
            "unknown log level `{level}`, expected error, warn, info, debug or trace"
        )),
    }
}

/// Map the `-v` count to a level; no flag leaves the default (errors only).
#[must_use]
pub const fn verbosity_level(count: u8) -> Option<Level> {
    match count {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Raise log verbosity, repeat for more (-v warn ... -vvvv trace)")
                .global(true)
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new(ARG_LOG_LEVEL)
                .long("log-level")
                .help("Log level by name: error, warn, info, debug, trace (overrides -v)")
                .env("SHOWROOM_LOG_LEVEL")
                .global(true)
                .value_parser(parse_log_level),
        )
        .arg(
            Arg::new(ARG_ERROR_LOG)
                .long("error-log")
                .help("Also append error events as JSON lines to this file, example: logs/error.log")
                .env("SHOWROOM_ERROR_LOG")
                .global(true)
                .value_parser(value_parser!(PathBuf)),
        )
}

/// Level requested on the command line or through the environment, if any.
#[must_use]
pub fn log_level(matches: &ArgMatches) -> Option<Level> {
    matches
        .get_one::<Level>(ARG_LOG_LEVEL)
        .copied()
        .or_else(|| verbosity_level(matches.get_count(ARG_VERBOSITY)))
}

#[must_use]
pub fn error_log(matches: &ArgMatches) -> Option<PathBuf> {
    matches.get_one::<PathBuf>(ARG_ERROR_LOG).cloned()
}
