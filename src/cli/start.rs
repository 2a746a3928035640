use crate::cli::{
    actions::Action,
    commands::{self, logging},
    dispatch, telemetry,
};
use anyhow::Result;

/// Main entry point for the CLI - builds and returns the Action
///
/// # Errors
///
/// Returns an error if argument parsing, telemetry initialization, or action dispatch fails
pub fn start() -> Result<Action> {
    // 1. Parse command-line arguments
    let matches = commands::new().get_matches();

    // 2. Initialize telemetry
    telemetry::init(
        logging::log_level(&matches),
        logging::error_log(&matches).as_deref(),
    )?;

    // 3. Dispatch to appropriate action
    dispatch::handler(&matches)
}
