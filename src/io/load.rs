//! Model loading functionality

use super::format::ModelFormat;
use super::model::ModelState;
use crate::model::Model;
use crate::{Error, Result};
use std::path::Path;

/// Load a model from a file
///
/// The format is detected from the file extension. A missing file, an
/// unknown extension, malformed content or inconsistent layer shapes are
/// all errors; the server refuses to start on any of them.
///
/// # Example
///
/// ```no_run
/// use cvd_risk::io::load_model;
///
/// let model = load_model("models/model.json").expect("failed to load model");
/// println!("Loaded model: {}", model.metadata().name);
/// ```
pub fn load_model(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::ModelNotFound { path: path.to_path_buf() });
    }

    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or_default();
    let format = ModelFormat::from_extension(ext)
        .ok_or_else(|| Error::UnsupportedFormat { extension: ext.to_string() })?;

    let content = std::fs::read_to_string(path)?;
    parse_model(&content, format)
}

/// Parse a model artifact already read into memory
pub fn parse_model(content: &str, format: ModelFormat) -> Result<Model> {
    let state: ModelState = match format {
        ModelFormat::Json => serde_json::from_str(content)
            .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))?,
        ModelFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| Error::Serialization(format!("YAML deserialization failed: {e}")))?,
    };

    Model::from_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{save_model, SaveConfig};
    use crate::model::tests::tiny_model;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_model_json() {
        let original = tiny_model();

        let temp_file = NamedTempFile::new().expect("temp file creation should succeed");
        let temp_path = temp_file.path().with_extension("json");

        save_model(&original, &temp_path, &SaveConfig::new(ModelFormat::Json))
            .expect("save should succeed");
        let loaded = load_model(&temp_path).expect("load should succeed");

        assert_eq!(loaded.metadata().name, original.metadata().name);
        assert_eq!(loaded.input_width(), original.input_width());
        assert_eq!(loaded.to_state(), original.to_state());

        std::fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_load_model_yaml() {
        let original = tiny_model();

        let temp_file = NamedTempFile::new().expect("temp file creation should succeed");
        let temp_path = temp_file.path().with_extension("yml");

        save_model(&original, &temp_path, &SaveConfig::new(ModelFormat::Yaml))
            .expect("save should succeed");
        let loaded = load_model(&temp_path).expect("load should succeed");

        assert_eq!(loaded.to_state(), original.to_state());

        std::fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_load_missing_model() {
        let err = load_model("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, Error::ModelNotFound { .. }));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let temp_file = NamedTempFile::new().expect("temp file creation should succeed");
        let temp_path = temp_file.path().with_extension("pkl");
        std::fs::write(&temp_path, b"\x80\x04").unwrap();

        let err = load_model(&temp_path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { ref extension } if extension == "pkl"));

        std::fs::remove_file(temp_path).ok();
    }

    #[test]
    fn test_parse_malformed_json() {
        let result = parse_model("{not json", ModelFormat::Json);
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_parse_rejects_inconsistent_layers() {
        let json = r#"{
            "metadata": {"name": "m", "architecture": "mlp"},
            "layers": [
                {"weights": [[1.0, 0.0], [0.0, 1.0]], "bias": [0.0, 0.0]},
                {"weights": [[1.0], [1.0], [1.0]], "bias": [0.0]}
            ]
        }"#;
        assert!(matches!(parse_model(json, ModelFormat::Json), Err(Error::InvalidModel(_))));
    }
}
