//! Training-faithful feature preprocessing.
//!
//! A [`Preprocessor`] is fitted once against the reference dataset and
//! produces a [`FittedPreprocessor`], which turns raw feature records into
//! the numeric matrix the model was trained on. Output columns are laid out
//! in a fixed order:
//!
//! 1. one-hot blocks of the nominal columns (first category dropped)
//! 2. the ordinal columns
//! 3. the `log1p` + standardized numerical columns
//! 4. passthrough columns, in reference-table order
//!
//! # Example
//!
//! ```
//! use cvd_risk::io::ReferenceTable;
//! use cvd_risk::preprocess::{ColumnSpec, OrdinalColumn, Preprocessor, FeatureRecord, RawValue};
//!
//! let spec = ColumnSpec {
//!     nominal: vec!["Sex".into()],
//!     ordinal: vec![OrdinalColumn::new("General_Health", &["Poor", "Good"])],
//!     numerical: vec!["BMI".into()],
//!     target: None,
//! };
//! let csv = "Sex,General_Health,BMI\nFemale,Poor,20\nMale,Good,30\n";
//! let table = ReferenceTable::from_reader(csv.as_bytes()).unwrap();
//! let fitted = Preprocessor::new(spec).fit(&table).unwrap();
//!
//! let mut record = FeatureRecord::new();
//! record.insert("Sex".into(), RawValue::from("Male"));
//! record.insert("General_Health".into(), RawValue::from("Good"));
//! record.insert("BMI".into(), RawValue::from(25.0));
//! let row = fitted.transform_one(&record).unwrap();
//! assert_eq!(row.len(), fitted.output_width());
//! ```

mod encoders;
mod record;
mod spec;

pub use encoders::{LogStandardScaler, OneHotEncoder, OrdinalEncoder};
pub use record::{lookup, FeatureRecord, RawValue};
pub use spec::{
    ColumnSpec, OrdinalColumn, AGE_CATEGORIES, CHECKUP_CATEGORIES, GENERAL_HEALTH_CATEGORIES,
};

use crate::io::ReferenceTable;
use crate::{Error, Result};
use ndarray::{Array1, Array2, ArrayView1};
use record::parse_number;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Unfitted preprocessor: a column spec waiting for reference data.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    spec: ColumnSpec,
}

impl Preprocessor {
    /// Create a preprocessor for `spec`.
    pub fn new(spec: ColumnSpec) -> Self {
        Self { spec }
    }

    /// Column spec this preprocessor fits.
    pub fn spec(&self) -> &ColumnSpec {
        &self.spec
    }

    /// Learn every encoder's parameters from `table`.
    ///
    /// Fails if a declared column is absent, the table is empty, an ordinal
    /// column holds a value outside its declared order, or a numerical or
    /// passthrough column holds a non-numeric cell.
    pub fn fit(&self, table: &ReferenceTable) -> Result<FittedPreprocessor> {
        self.spec.validate()?;
        for column in self.spec.declared_columns() {
            table.require(column)?;
        }
        if table.n_rows() == 0 {
            return Err(Error::EmptyReference);
        }

        let nominal = self
            .spec
            .nominal
            .iter()
            .map(|c| table.require(c).map(|values| OneHotEncoder::fit(c.as_str(), values)))
            .collect::<Result<Vec<_>>>()?;

        let ordinal = self
            .spec
            .ordinal
            .iter()
            .map(|o| OrdinalEncoder::fit(o.name.as_str(), o.categories.clone(), table.require(&o.name)?))
            .collect::<Result<Vec<_>>>()?;

        let numerical = self
            .spec
            .numerical
            .iter()
            .map(|c| LogStandardScaler::fit(c.as_str(), table.require(c)?))
            .collect::<Result<Vec<_>>>()?;

        let passthrough: Vec<String> =
            table.columns().iter().filter(|c| !self.spec.is_claimed(c)).cloned().collect();
        for column in &passthrough {
            for cell in table.require(column)? {
                parse_number(column, cell)?;
            }
        }

        let fitted = FittedPreprocessor { nominal, ordinal, numerical, passthrough };
        debug!(
            width = fitted.output_width(),
            passthrough = fitted.passthrough.len(),
            rows = table.n_rows(),
            "fitted preprocessor"
        );
        Ok(fitted)
    }
}

/// Fitted, immutable preprocessor shared by all requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPreprocessor {
    nominal: Vec<OneHotEncoder>,
    ordinal: Vec<OrdinalEncoder>,
    numerical: Vec<LogStandardScaler>,
    passthrough: Vec<String>,
}

impl FittedPreprocessor {
    /// Number of numeric features produced per record.
    pub fn output_width(&self) -> usize {
        self.nominal.iter().map(OneHotEncoder::width).sum::<usize>()
            + self.ordinal.len()
            + self.numerical.len()
            + self.passthrough.len()
    }

    /// Names of the output features, in output order.
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.nominal.iter().flat_map(OneHotEncoder::feature_names).collect();
        names.extend(self.ordinal.iter().map(|o| o.column.clone()));
        names.extend(self.numerical.iter().map(|n| n.column.clone()));
        names.extend(self.passthrough.iter().cloned());
        names
    }

    /// One-hot encoders, in output order.
    pub fn nominal(&self) -> &[OneHotEncoder] {
        &self.nominal
    }

    /// Ordinal encoders, in output order.
    pub fn ordinal(&self) -> &[OrdinalEncoder] {
        &self.ordinal
    }

    /// Numerical scalers, in output order.
    pub fn numerical(&self) -> &[LogStandardScaler] {
        &self.numerical
    }

    /// Columns copied through unchanged.
    pub fn passthrough(&self) -> &[String] {
        &self.passthrough
    }

    /// Transform a batch of records into an `n × output_width` matrix.
    pub fn transform(&self, records: &[FeatureRecord]) -> Result<Array2<f64>> {
        let width = self.output_width();
        let mut matrix = Array2::zeros((records.len(), width));
        let mut row = Vec::with_capacity(width);

        for (i, record) in records.iter().enumerate() {
            row.clear();
            self.encode_row(record, &mut row)?;
            matrix.row_mut(i).assign(&ArrayView1::from(row.as_slice()));
        }

        Ok(matrix)
    }

    /// Transform a single record.
    pub fn transform_one(&self, record: &FeatureRecord) -> Result<Array1<f64>> {
        let mut row = Vec::with_capacity(self.output_width());
        self.encode_row(record, &mut row)?;
        Ok(Array1::from(row))
    }

    fn encode_row(&self, record: &FeatureRecord, out: &mut Vec<f64>) -> Result<()> {
        for encoder in &self.nominal {
            encoder.encode_into(lookup(record, &encoder.column)?, out);
        }
        for encoder in &self.ordinal {
            out.push(encoder.encode(lookup(record, &encoder.column)?)?);
        }
        for scaler in &self.numerical {
            out.push(scaler.encode(lookup(record, &scaler.column)?)?);
        }
        for column in &self.passthrough {
            out.push(lookup(record, column)?.as_number(column)?);
        }
        Ok(())
    }
}
