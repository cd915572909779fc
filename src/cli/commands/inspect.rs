//! Inspect command implementation

use crate::config::{InspectArgs, OutputFormat};
use crate::io::load_reference_table;
use crate::preprocess::Preprocessor;
use serde::Serialize;

/// Fitted preprocessor summary printed by `inspect`
#[derive(Serialize)]
struct Inspection<'a> {
    dataset: String,
    rows: usize,
    output_width: usize,
    feature_names: Vec<String>,
    fitted: &'a crate::preprocess::FittedPreprocessor,
}

pub fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let config = args.artifacts.resolve().map_err(|e| format!("Config error: {e}"))?;
    let table = load_reference_table(&config.dataset_path)
        .map_err(|e| format!("Failed to load dataset: {e}"))?;
    let fitted = Preprocessor::new(config.columns)
        .fit(&table)
        .map_err(|e| format!("Failed to fit preprocessor: {e}"))?;

    let inspection = Inspection {
        dataset: config.dataset_path.display().to_string(),
        rows: table.n_rows(),
        output_width: fitted.output_width(),
        feature_names: fitted.feature_names(),
        fitted: &fitted,
    };

    let text = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&inspection)
            .map_err(|e| format!("JSON serialization error: {e}"))?,
        OutputFormat::Yaml => serde_yaml::to_string(&inspection)
            .map_err(|e| format!("YAML serialization error: {e}"))?,
    };
    println!("{text}");

    Ok(())
}
