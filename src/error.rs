//! Error types with actionable diagnostics.
//!
//! Every failure in the preprocessing and prediction core is a variant of
//! [`Error`]. The HTTP boundary decides how each variant is reported; the
//! core never swallows a column-level problem.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while fitting, transforming, loading or predicting.
#[derive(Error, Debug)]
pub enum Error {
    /// A column required by the column spec is absent.
    #[error("Missing required column '{column}'\n  → Every fitted column except the target must be present")]
    MissingColumn { column: String },

    /// An ordinal value outside the column's fixed category order.
    #[error("Unknown category '{value}' for ordinal column '{column}'\n  → Expected one of: {expected}")]
    UnknownCategory { column: String, value: String, expected: String },

    /// A value that cannot be used by the column's encoder.
    #[error("Invalid value '{value}' for column '{column}': {reason}")]
    InvalidValue { column: String, value: String, reason: String },

    /// The reference dataset has a header but no rows.
    #[error("Reference dataset contains no rows\n  → Fitting needs at least one record per column")]
    EmptyReference,

    /// The column spec itself is inconsistent (overlapping groups, empty vocabulary).
    #[error("Invalid column spec: {0}")]
    InvalidColumnSpec(String),

    /// Preprocessed width does not match the model input width.
    #[error("Shape mismatch: model expects {expected} features, got {actual}\n  → Check that the column spec matches the one used at training time")]
    ShapeMismatch { expected: usize, actual: usize },

    /// The model produced a NaN or infinite probability for a row.
    #[error("Model output for row {row} is not finite\n  → Check the record for NaN or infinite inputs")]
    NonFiniteOutput { row: usize },

    /// Model artifact file not found.
    #[error("Model file not found: {path}\n  → Check the --model path or the model_path config value")]
    ModelNotFound { path: PathBuf },

    /// Reference dataset file not found.
    #[error("Reference dataset not found: {path}\n  → Check the --dataset path or the dataset_path config value")]
    DatasetNotFound { path: PathBuf },

    /// Model artifact extension is not supported.
    #[error("Unsupported model format: {extension}\n  → Supported formats: json, yaml")]
    UnsupportedFormat { extension: String },

    /// Model artifact parsed but is structurally inconsistent.
    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),

    /// Configuration file could not be read or parsed.
    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// CSV reader failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the error code for structured log output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingColumn { .. } => "E001",
            Self::UnknownCategory { .. } => "E002",
            Self::InvalidValue { .. } => "E003",
            Self::EmptyReference => "E004",
            Self::InvalidColumnSpec(_) => "E005",
            Self::ShapeMismatch { .. } => "E010",
            Self::NonFiniteOutput { .. } => "E011",
            Self::ModelNotFound { .. } => "E020",
            Self::DatasetNotFound { .. } => "E021",
            Self::UnsupportedFormat { .. } => "E022",
            Self::InvalidModel(_) => "E023",
            Self::Config { .. } => "E030",
            Self::Csv(_) => "E050",
            Self::Serialization(_) => "E051",
            Self::Io(_) => "E052",
        }
    }

    /// Whether the error comes from the shape of the input data rather than
    /// from an artifact on disk.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::UnknownCategory { .. }
                | Self::InvalidValue { .. }
                | Self::EmptyReference
        )
    }

    pub(crate) fn invalid_value(
        column: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue { column: column.into(), value: value.into(), reason: reason.into() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
