//! Predict command implementation

use crate::config::PredictArgs;
use crate::server::{parse_features, ApiError, ErrorResponse, PredictionResponse};
use crate::service::PredictionService;

pub fn run_predict(args: PredictArgs) -> Result<(), String> {
    let config = args.artifacts.resolve().map_err(|e| format!("Config error: {e}"))?;
    let service =
        PredictionService::from_config(&config).map_err(|e| format!("Startup failed: {e}"))?;

    let body = std::fs::read(&args.input)
        .map_err(|e| format!("Failed to read {}: {e}", args.input.display()))?;

    let result = parse_features(&body).and_then(|records| {
        let labels = service.predict(&records)?;
        PredictionResponse::from_labels(labels).ok_or(ApiError::NoRecords)
    });

    match result {
        Ok(response) => {
            let json = serde_json::to_string(&response)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
            Ok(())
        }
        Err(e) => {
            let json = serde_json::to_string(&ErrorResponse { error: e.to_string() })
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
            Err(format!("Prediction failed ({})", e.status()))
        }
    }
}
