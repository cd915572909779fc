//! Model saving functionality

use super::format::{ModelFormat, SaveConfig};
use crate::model::Model;
use crate::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save a model to a file
///
/// # Example
///
/// ```no_run
/// use cvd_risk::io::{load_model, save_model, ModelFormat, SaveConfig};
///
/// let model = load_model("model.json").unwrap();
/// save_model(&model, "model.yaml", &SaveConfig::new(ModelFormat::Yaml)).unwrap();
/// ```
pub fn save_model(model: &Model, path: impl AsRef<Path>, config: &SaveConfig) -> Result<()> {
    let state = model.to_state();

    let data = match config.format {
        ModelFormat::Json => {
            let json = if config.pretty {
                serde_json::to_string_pretty(&state)
            } else {
                serde_json::to_string(&state)
            };
            json.map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?
        }
        ModelFormat::Yaml => serde_yaml::to_string(&state)
            .map_err(|e| Error::Serialization(format!("YAML serialization failed: {e}")))?,
    };

    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;

    Ok(())
}
