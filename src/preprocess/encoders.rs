//! Per-column encoders and their fitted parameters.

use super::record::{parse_number, RawValue};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One-hot encoder with the first category dropped.
///
/// Unknown categories encode to an all-zero block, which is also the
/// encoding of the dropped first category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Column name
    pub column: String,
    /// Sorted vocabulary seen at fit time, including the dropped category
    pub categories: Vec<String>,
}

impl OneHotEncoder {
    /// Learn the sorted vocabulary of `values`.
    pub fn fit(column: impl Into<String>, values: &[String]) -> Self {
        let categories: BTreeSet<&String> = values.iter().collect();
        Self { column: column.into(), categories: categories.into_iter().cloned().collect() }
    }

    /// Number of output columns.
    pub fn width(&self) -> usize {
        self.categories.len().saturating_sub(1)
    }

    /// Categories that own an output column.
    fn kept(&self) -> &[String] {
        self.categories.get(1..).unwrap_or(&[])
    }

    /// Append the encoding of `value` to `out`.
    pub fn encode_into(&self, value: &RawValue, out: &mut Vec<f64>) {
        let label = value.as_category();
        out.extend(
            self.kept()
                .iter()
                .map(|c| if label.as_deref() == Some(c.as_str()) { 1.0 } else { 0.0 }),
        );
    }

    /// Output column names, `<column>_<category>`.
    pub fn feature_names(&self) -> Vec<String> {
        self.kept().iter().map(|c| format!("{}_{}", self.column, c)).collect()
    }
}

/// Ordinal encoder over a fixed, declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalEncoder {
    /// Column name
    pub column: String,
    /// Categories, lowest rank first
    pub categories: Vec<String>,
}

impl OrdinalEncoder {
    /// Bind the declared order to a column, rejecting reference values
    /// outside it.
    pub fn fit(column: impl Into<String>, categories: Vec<String>, values: &[String]) -> Result<Self> {
        let encoder = Self { column: column.into(), categories };
        for value in values {
            encoder.rank(value)?;
        }
        Ok(encoder)
    }

    fn rank(&self, label: &str) -> Result<f64> {
        self.categories.iter().position(|c| c == label).map(|i| i as f64).ok_or_else(|| {
            Error::UnknownCategory {
                column: self.column.clone(),
                value: label.to_string(),
                expected: self.categories.join(", "),
            }
        })
    }

    /// Rank of `value` in the declared order.
    pub fn encode(&self, value: &RawValue) -> Result<f64> {
        match value.as_category() {
            Some(label) => self.rank(&label),
            None => Err(Error::MissingColumn { column: self.column.clone() }),
        }
    }
}

/// `log1p` followed by standardization with fit-time statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogStandardScaler {
    /// Column name
    pub column: String,
    /// Mean of `log1p(x)` over the reference data
    pub mean: f64,
    /// Population standard deviation of `log1p(x)`; 1.0 when the column is constant
    pub std: f64,
}

impl LogStandardScaler {
    /// Compute mean and standard deviation of `log1p` of the text cells.
    pub fn fit(column: impl Into<String>, values: &[String]) -> Result<Self> {
        let column = column.into();
        if values.is_empty() {
            return Err(Error::EmptyReference);
        }

        let logs = values
            .iter()
            .map(|v| parse_number(&column, v).and_then(|x| log1p_checked(&column, x)))
            .collect::<Result<Vec<f64>>>()?;

        let n = logs.len() as f64;
        let mean = logs.iter().sum::<f64>() / n;
        let variance = logs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();
        let std = if std > f64::EPSILON * mean.abs().max(1.0) { std } else { 1.0 };

        Ok(Self { column, mean, std })
    }

    /// Scale a single value.
    pub fn transform(&self, x: f64) -> Result<f64> {
        Ok((log1p_checked(&self.column, x)? - self.mean) / self.std)
    }

    /// Scale a raw request value.
    pub fn encode(&self, value: &RawValue) -> Result<f64> {
        self.transform(value.as_number(&self.column)?)
    }
}

fn log1p_checked(column: &str, x: f64) -> Result<f64> {
    if !x.is_finite() {
        return Err(Error::invalid_value(column, x.to_string(), "value must be finite"));
    }
    if x <= -1.0 {
        return Err(Error::invalid_value(column, x.to_string(), "log1p is undefined at or below -1"));
    }
    Ok(x.ln_1p())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_one_hot_sorts_and_drops_first() {
        let enc = OneHotEncoder::fit("Diabetes", &strings(&["Yes", "No", "No, pre-diabetes", "No"]));
        assert_eq!(enc.categories, strings(&["No", "No, pre-diabetes", "Yes"]));
        assert_eq!(enc.width(), 2);
        assert_eq!(enc.feature_names(), strings(&["Diabetes_No, pre-diabetes", "Diabetes_Yes"]));
    }

    #[test]
    fn test_one_hot_encodes_known_values() {
        let enc = OneHotEncoder::fit("Sex", &strings(&["Male", "Female"]));
        let mut out = Vec::new();
        enc.encode_into(&RawValue::from("Male"), &mut out);
        enc.encode_into(&RawValue::from("Female"), &mut out);
        assert_eq!(out, vec![1.0, 0.0]);
    }

    #[test]
    fn test_one_hot_unknown_is_all_zero() {
        let enc = OneHotEncoder::fit("Diabetes", &strings(&["No", "Yes", "Borderline"]));
        let mut out = Vec::new();
        enc.encode_into(&RawValue::from("Gestational"), &mut out);
        assert_eq!(out, vec![0.0; enc.width()]);
    }

    #[test]
    fn test_one_hot_single_category_has_no_columns() {
        let enc = OneHotEncoder::fit("Exercise", &strings(&["Yes", "Yes"]));
        assert_eq!(enc.width(), 0);
        let mut out = Vec::new();
        enc.encode_into(&RawValue::from("Yes"), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_ordinal_uses_declared_order() {
        let enc = OrdinalEncoder::fit(
            "General_Health",
            strings(&["Poor", "Fair", "Good", "Very Good", "Excellent"]),
            &strings(&["Good", "Poor"]),
        )
        .unwrap();
        assert_eq!(enc.encode(&RawValue::from("Poor")).unwrap(), 0.0);
        assert_eq!(enc.encode(&RawValue::from("Very Good")).unwrap(), 3.0);
        assert_eq!(enc.encode(&RawValue::from("Excellent")).unwrap(), 4.0);
    }

    #[test]
    fn test_ordinal_unknown_value_is_error() {
        let enc =
            OrdinalEncoder::fit("General_Health", strings(&["Poor", "Good"]), &[]).unwrap();
        let err = enc.encode(&RawValue::from("Unknown")).unwrap_err();
        assert!(matches!(err, Error::UnknownCategory { ref value, .. } if value == "Unknown"));
    }

    #[test]
    fn test_ordinal_fit_rejects_reference_outside_order() {
        let result =
            OrdinalEncoder::fit("Checkup", strings(&["Never"]), &strings(&["Never", "Sometimes"]));
        assert!(matches!(result, Err(Error::UnknownCategory { .. })));
    }

    #[test]
    fn test_scaler_statistics_are_population() {
        let scaler = LogStandardScaler::fit("BMI", &strings(&["0", "1", "3"])).unwrap();
        let logs = [0.0f64.ln_1p(), 1.0f64.ln_1p(), 3.0f64.ln_1p()];
        let mean = logs.iter().sum::<f64>() / 3.0;
        let var = logs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / 3.0;
        assert_relative_eq!(scaler.mean, mean, epsilon = 1e-12);
        assert_relative_eq!(scaler.std, var.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_scaler_transform_formula() {
        let scaler = LogStandardScaler { column: "BMI".into(), mean: 3.0, std: 0.5 };
        let v = 27.0;
        assert_relative_eq!(scaler.transform(v).unwrap(), (v.ln_1p() - 3.0) / 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_scaler_constant_column_uses_unit_std() {
        let scaler = LogStandardScaler::fit("Alcohol_Consumption", &strings(&["4", "4"])).unwrap();
        assert_eq!(scaler.std, 1.0);
        assert_relative_eq!(scaler.transform(4.0).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scaler_rejects_non_numeric_reference() {
        let result = LogStandardScaler::fit("BMI", &strings(&["12", "n/a"]));
        assert!(matches!(result, Err(Error::InvalidValue { .. })));
    }

    #[test]
    fn test_scaler_rejects_values_at_or_below_minus_one() {
        let scaler = LogStandardScaler { column: "BMI".into(), mean: 0.0, std: 1.0 };
        assert!(scaler.transform(-1.0).is_err());
        assert!(scaler.transform(f64::NAN).is_err());
        assert!(scaler.transform(-0.5).is_ok());
    }
}
