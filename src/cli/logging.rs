//! Logging setup for CLI commands

use tracing_subscriber::EnvFilter;

/// Log level selected by the global CLI flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Errors only
    Quiet,
    /// Startup milestones and request errors
    Normal,
    /// Per-request detail
    Verbose,
}

impl LogLevel {
    /// Pick the level from the `--quiet` / `--verbose` flags; quiet wins.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Default filter directive when `RUST_LOG` is unset
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "info,tower_http=warn",
            Self::Verbose => "debug,tower_http=debug",
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the CLI flags. Calling this twice is a
/// no-op.
pub fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
