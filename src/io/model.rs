//! Model artifact structure for serialization

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Accept class labels written either as integers (`1`) or strings (`"1"`).
fn deserialize_labels<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LabelOrString {
        Label(i64),
        Str(String),
    }

    Vec::<LabelOrString>::deserialize(deserializer)?
        .into_iter()
        .map(|l| match l {
            LabelOrString::Label(v) => Ok(v),
            LabelOrString::Str(s) => s.trim().parse().map_err(|_| {
                serde::de::Error::custom(format!("expected an integer class label, got '{s}'"))
            }),
        })
        .collect()
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Model metadata carried alongside the weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name/identifier
    pub name: String,

    /// Model architecture type (e.g., "mlp", "logistic")
    pub architecture: String,

    /// Model version
    #[serde(default = "default_version")]
    pub version: String,

    /// Names of the input features, in input order, if recorded at training time
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,

    /// Custom metadata fields
    #[serde(default)]
    pub custom: HashMap<String, serde_json::Value>,
}

impl ModelMetadata {
    /// Create new metadata with minimal fields
    pub fn new(name: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architecture: architecture.into(),
            version: default_version(),
            feature_names: None,
            custom: HashMap::new(),
        }
    }
}

/// Hidden-layer activation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// max(0, x)
    #[default]
    Relu,
    /// tanh(x)
    Tanh,
    /// 1 / (1 + e^-x)
    Logistic,
    /// x
    Identity,
}

/// One dense layer as stored on disk.
///
/// `weights` is `[inputs][outputs]`, matching the layout of the training
/// framework's coefficient matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerState {
    /// Weight rows, one per input unit
    pub weights: Vec<Vec<f64>>,
    /// Bias, one per output unit
    pub bias: Vec<f64>,
}

/// Serializable classifier artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    /// Model metadata
    pub metadata: ModelMetadata,

    /// Activation applied after every hidden layer
    #[serde(default)]
    pub activation: Activation,

    /// Class labels, in output order
    #[serde(default = "default_classes", deserialize_with = "deserialize_labels")]
    pub classes: Vec<i64>,

    /// Dense layers, input layer first
    pub layers: Vec<LayerState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_metadata_creation() {
        let meta = ModelMetadata::new("cvd-mlp", "mlp");
        assert_eq!(meta.name, "cvd-mlp");
        assert_eq!(meta.architecture, "mlp");
        assert_eq!(meta.version, "0.1.0");
        assert!(meta.feature_names.is_none());
    }

    #[test]
    fn test_custom_metadata_is_kept() {
        let json = r#"{
            "name": "test",
            "architecture": "mlp",
            "custom": {"rfe_features": 94, "hidden_layer_sizes": [16]}
        }"#;
        let meta: ModelMetadata = serde_json::from_str(json).unwrap();

        assert_eq!(meta.custom.len(), 2);
        assert_eq!(meta.custom.get("rfe_features").unwrap(), &serde_json::json!(94));
    }

    #[test]
    fn test_state_defaults() {
        let json = r#"{
            "metadata": {"name": "m", "architecture": "logistic"},
            "layers": [{"weights": [[1.0], [2.0]], "bias": [0.5]}]
        }"#;
        let state: ModelState = serde_json::from_str(json).unwrap();
        assert_eq!(state.activation, Activation::Relu);
        assert_eq!(state.classes, vec![0, 1]);
        assert_eq!(state.metadata.version, "0.1.0");
    }

    #[test]
    fn test_string_class_labels() {
        let json = r#"{
            "metadata": {"name": "m", "architecture": "mlp"},
            "activation": "tanh",
            "classes": ["0", 1],
            "layers": []
        }"#;
        let state: ModelState = serde_json::from_str(json).unwrap();
        assert_eq!(state.activation, Activation::Tanh);
        assert_eq!(state.classes, vec![0, 1]);
    }

    #[test]
    fn test_non_integer_class_label_rejected() {
        let json = r#"{
            "metadata": {"name": "m", "architecture": "mlp"},
            "classes": ["No", "Yes"],
            "layers": []
        }"#;
        assert!(serde_json::from_str::<ModelState>(json).is_err());
    }
}
