//! Reference dataset loading.
//!
//! The reference table is only used to fit the preprocessor at startup, so
//! cells are kept as text and each encoder parses what it needs.

use crate::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column-oriented table of raw text cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    columns: Vec<String>,
    cells: Vec<Vec<String>>,
}

impl ReferenceTable {
    /// Build a table from a header and row-major records.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut cells = vec![Vec::with_capacity(rows.len()); columns.len()];
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::Serialization(format!(
                    "row {} has {} fields, header has {}",
                    i + 1,
                    row.len(),
                    columns.len()
                )));
            }
            for (column, cell) in cells.iter_mut().zip(row) {
                column.push(cell);
            }
        }
        Ok(Self { columns, cells })
    }

    /// Read a CSV document with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Self::new(columns, rows)
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cells of `name`, if the column exists.
    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns.iter().position(|c| c == name).map(|i| self.cells[i].as_slice())
    }

    /// Cells of `name`, or a missing-column error.
    pub fn require(&self, name: &str) -> Result<&[String]> {
        self.column(name).ok_or_else(|| Error::MissingColumn { column: name.to_string() })
    }

    /// Number of data rows.
    pub fn n_rows(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }
}

/// Load the reference dataset from a CSV file.
pub fn load_reference_table(path: impl AsRef<Path>) -> Result<ReferenceTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::DatasetNotFound { path: path.to_path_buf() });
    }
    ReferenceTable::from_reader(File::open(path)?)
}
