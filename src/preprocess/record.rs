//! Raw feature records as they arrive from a request body.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One raw cell of a feature record.
///
/// Deserialized untagged so that `"Male"`, `23.5`, `true` and `null` are all
/// accepted; the column's encoder decides whether the value is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// JSON `null`
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number
    Number(f64),
    /// JSON string, or any CSV cell
    Text(String),
}

impl RawValue {
    /// Render the value as a category label.
    ///
    /// Numbers keep their shortest decimal form (`1.0` renders as `1`) and
    /// booleans render as `True`/`False`, so that values line up with the
    /// spelling of the reference CSV.
    pub fn as_category(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(true) => Some("True".to_string()),
            Self::Bool(false) => Some("False".to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => Some(s.clone()),
        }
    }

    /// Interpret the value as a number for `column`.
    pub fn as_number(&self, column: &str) -> Result<f64> {
        match self {
            Self::Number(n) => finite(column, *n),
            Self::Text(s) => parse_number(column, s),
            Self::Bool(b) => Err(Error::invalid_value(column, b.to_string(), "expected a number")),
            Self::Null => Err(Error::MissingColumn { column: column.to_string() }),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Mapping from column name to raw value, one per prediction.
pub type FeatureRecord = HashMap<String, RawValue>;

/// Look up `column` in `record`, treating `null` the same as an absent key.
pub fn lookup<'a>(record: &'a FeatureRecord, column: &str) -> Result<&'a RawValue> {
    match record.get(column) {
        None | Some(RawValue::Null) => Err(Error::MissingColumn { column: column.to_string() }),
        Some(value) => Ok(value),
    }
}

/// Parse a text cell as a finite number.
///
/// `NaN` and `inf` spellings parse as floats but are rejected here.
pub(crate) fn parse_number(column: &str, text: &str) -> Result<f64> {
    let value = text
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::invalid_value(column, text, "expected a number"))?;
    finite(column, value)
}

fn finite(column: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid_value(column, value.to_string(), "value must be finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_record() {
        let json = r#"{"Sex": "Male", "BMI": 23.5, "Exercise": true, "Diabetes": null}"#;
        let record: FeatureRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record["Sex"], RawValue::Text("Male".into()));
        assert_eq!(record["BMI"], RawValue::Number(23.5));
        assert_eq!(record["Exercise"], RawValue::Bool(true));
        assert_eq!(record["Diabetes"], RawValue::Null);
    }

    #[test]
    fn test_integer_number_renders_without_fraction() {
        assert_eq!(RawValue::Number(1.0).as_category(), Some("1".to_string()));
        assert_eq!(RawValue::Number(2.5).as_category(), Some("2.5".to_string()));
    }

    #[test]
    fn test_numeric_text_parses() {
        assert_eq!(RawValue::from(" 42.5 ").as_number("BMI").unwrap(), 42.5);
    }

    #[test]
    fn test_non_numeric_text_is_invalid() {
        let err = RawValue::from("tall").as_number("Height_(cm)").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref column, .. } if column == "Height_(cm)"));
    }

    #[test]
    fn test_bool_renders_like_reference_csv() {
        assert_eq!(RawValue::Bool(true).as_category(), Some("True".to_string()));
        assert_eq!(RawValue::Bool(false).as_category(), Some("False".to_string()));
    }

    #[test]
    fn test_non_finite_text_is_invalid() {
        for text in ["NaN", "nan", "inf", "-inf", "infinity"] {
            let err = RawValue::from(text).as_number("Score").unwrap_err();
            assert!(matches!(err, Error::InvalidValue { ref reason, .. } if reason.contains("finite")));
        }
    }

    #[test]
    fn test_non_finite_number_is_invalid() {
        assert!(RawValue::Number(f64::NAN).as_number("Score").is_err());
        assert!(RawValue::Number(f64::NEG_INFINITY).as_number("Score").is_err());
    }

    #[test]
    fn test_null_lookup_is_missing_column() {
        let mut record = FeatureRecord::new();
        record.insert("BMI".into(), RawValue::Null);
        let err = lookup(&record, "BMI").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column } if column == "BMI"));
        assert!(lookup(&record, "Sex").is_err());
    }
}
