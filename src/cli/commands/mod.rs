//! CLI command implementations

mod inspect;
mod predict;
mod serve;

use crate::cli::{init_tracing, LogLevel};
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    let log_level = LogLevel::from_flags(cli.quiet, cli.verbose);
    init_tracing(log_level);

    match cli.command {
        Command::Serve(args) => serve::run_serve(args),
        Command::Predict(args) => predict::run_predict(args),
        Command::Inspect(args) => inspect::run_inspect(args),
    }
}
