//! Static column partition used to fit and apply the preprocessor.
//!
//! The partition is declared, never inferred from data types, so the model's
//! input layout cannot drift between restarts. It must match the layout the
//! model was trained on; a mismatch is silent at runtime.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Age brackets in increasing order.
pub const AGE_CATEGORIES: [&str; 13] = [
    "18-24", "25-29", "30-34", "35-39", "40-44", "45-49", "50-54", "55-59", "60-64", "65-69",
    "70-74", "75-79", "80+",
];

/// Time since last checkup, most recent first.
pub const CHECKUP_CATEGORIES: [&str; 5] = [
    "Within the past year",
    "Within the past 2 years",
    "Within the past 5 years",
    "5 or more years ago",
    "Never",
];

/// Self-reported health, worst first.
pub const GENERAL_HEALTH_CATEGORIES: [&str; 5] =
    ["Poor", "Fair", "Good", "Very Good", "Excellent"];

/// An ordinal column and its total order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalColumn {
    /// Column name
    pub name: String,
    /// Categories, lowest rank first
    pub categories: Vec<String>,
}

impl OrdinalColumn {
    /// Create an ordinal column from a fixed order.
    pub fn new(name: impl Into<String>, categories: &[&str]) -> Self {
        Self { name: name.into(), categories: categories.iter().map(|c| c.to_string()).collect() }
    }
}

/// Partition of the reference dataset's columns into encoder groups.
///
/// Columns not named here (and not the target) are passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// One-hot encoded columns, first category dropped
    pub nominal: Vec<String>,
    /// Ordinal columns with fixed category orders
    pub ordinal: Vec<OrdinalColumn>,
    /// log1p + standardized columns
    pub numerical: Vec<String>,
    /// Label column, excluded from fitting and transform
    #[serde(default)]
    pub target: Option<String>,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self::cardio()
    }
}

impl ColumnSpec {
    /// Layout of the cardiovascular-risk model.
    pub fn cardio() -> Self {
        let nominal = [
            "Arthritis",
            "Depression",
            "Diabetes",
            "Exercise",
            "Other_Cancer",
            "Sex",
            "Skin_Cancer",
            "Smoking_History",
        ];
        let numerical = [
            "Alcohol_Consumption",
            "BMI",
            "FriedPotato_Consumption",
            "Fruit_Consumption",
            "Green_Vegetables_Consumption",
            "Height_(cm)",
            "Weight_(kg)",
        ];

        Self {
            nominal: nominal.iter().map(|c| c.to_string()).collect(),
            ordinal: vec![
                OrdinalColumn::new("Age_Category", &AGE_CATEGORIES),
                OrdinalColumn::new("Checkup", &CHECKUP_CATEGORIES),
                OrdinalColumn::new("General_Health", &GENERAL_HEALTH_CATEGORIES),
            ],
            numerical: numerical.iter().map(|c| c.to_string()).collect(),
            target: Some("Heart_Disease".to_string()),
        }
    }

    /// Every column named by an encoder group, in output order.
    pub fn declared_columns(&self) -> impl Iterator<Item = &str> {
        self.nominal
            .iter()
            .map(String::as_str)
            .chain(self.ordinal.iter().map(|o| o.name.as_str()))
            .chain(self.numerical.iter().map(String::as_str))
    }

    /// Whether `column` is declared in a group or is the target.
    pub fn is_claimed(&self, column: &str) -> bool {
        self.target.as_deref() == Some(column) || self.declared_columns().any(|c| c == column)
    }

    /// Check that the groups are disjoint and every ordinal order is usable.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for column in self.declared_columns() {
            if !seen.insert(column) {
                return Err(Error::InvalidColumnSpec(format!(
                    "column '{column}' is assigned to more than one group"
                )));
            }
        }
        if let Some(target) = &self.target {
            if seen.contains(target.as_str()) {
                return Err(Error::InvalidColumnSpec(format!(
                    "target column '{target}' is also declared as a feature"
                )));
            }
        }
        for ordinal in &self.ordinal {
            if ordinal.categories.is_empty() {
                return Err(Error::InvalidColumnSpec(format!(
                    "ordinal column '{}' has no categories",
                    ordinal.name
                )));
            }
            let unique: HashSet<_> = ordinal.categories.iter().collect();
            if unique.len() != ordinal.categories.len() {
                return Err(Error::InvalidColumnSpec(format!(
                    "ordinal column '{}' repeats a category",
                    ordinal.name
                )));
            }
        }
        Ok(())
    }
}
