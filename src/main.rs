//! cvd-risk CLI
//!
//! # Usage
//!
//! ```bash
//! # Serve predictions on the configured address
//! cvd-risk serve --model models/model.json --dataset data/dataset.csv
//!
//! # Predict from a request body on disk
//! cvd-risk predict --input request.json
//!
//! # Show the fitted preprocessor
//! cvd-risk inspect --format json
//! ```

use clap::Parser;
use cvd_risk::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
