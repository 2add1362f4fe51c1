//! Tabular input model: ordered records of scalar cells under named columns.

use serde::{Deserialize, Serialize};

use crate::error::{DatasetProblem, LabelError};

/// A scalar cell value as produced by a spreadsheet or CSV parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Free text.
    Text(String),
    /// Numeric cell. NaN never appears here; it is normalised to [`Value::Missing`].
    Number(f64),
    /// Empty or absent cell.
    #[default]
    Missing,
}

impl Value {
    /// Build a numeric value, mapping NaN to [`Value::Missing`].
    pub fn number(n: f64) -> Self {
        if n.is_nan() {
            Value::Missing
        } else {
            Value::Number(n)
        }
    }

    /// The cell as printable text. Missing cells render as `""`; integral
    /// numbers render without a fractional part.
    pub fn display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Value::Number(n) => n.to_string(),
            Value::Missing => String::new(),
        }
    }

    /// The cell's text when it is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// `true` for missing cells and text cells that are blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Text(s) => s.trim().is_empty(),
            Value::Number(_) => false,
            Value::Missing => true,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::number(n)
    }
}

/// One row of the dataset; cells are positional, aligned with
/// [`Dataset::columns`]. Rows shorter than the header read as missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    cells: Vec<Value>,
}

impl Record {
    /// Wrap a row of cells.
    pub fn new(cells: Vec<Value>) -> Self {
        Self { cells }
    }

    /// Cell at `column`, or [`Value::Missing`] past the end of the row.
    pub fn get(&self, column: usize) -> &Value {
        static MISSING: Value = Value::Missing;
        self.cells.get(column).unwrap_or(&MISSING)
    }

    /// All cells in column order.
    pub fn cells(&self) -> &[Value] {
        &self.cells
    }
}

impl<V: Into<Value>> FromIterator<V> for Record {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Record::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Ordered records under a header row.
///
/// Column names keep their original casing; matching against them is
/// case-insensitive (see [`crate::columns`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Create a dataset from a header and its rows.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Records in input order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reject datasets that cannot produce a document: no columns or no records.
    pub fn ensure_usable(&self) -> Result<(), LabelError> {
        if self.columns.is_empty() {
            return Err(LabelError::InvalidDataset(DatasetProblem::NoColumns));
        }
        if self.records.is_empty() {
            return Err(LabelError::InvalidDataset(DatasetProblem::NoRecords));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_display() {
        assert_eq!(Value::from("A-12").display(), "A-12");
        assert_eq!(Value::Number(4711.0).display(), "4711");
        assert_eq!(Value::Number(2.5).display(), "2.5");
        assert_eq!(Value::Number(-3.0).display(), "-3");
        assert_eq!(Value::Missing.display(), "");
    }

    #[test]
    fn nan_becomes_missing() {
        assert_eq!(Value::number(f64::NAN), Value::Missing);
        assert_eq!(Value::from(f64::NAN), Value::Missing);
        assert_eq!(Value::from(1.0), Value::Number(1.0));
    }

    #[test]
    fn short_rows_read_missing() {
        let r: Record = ["a", "b"].into_iter().collect();
        assert_eq!(r.get(1), &Value::from("b"));
        assert_eq!(r.get(5), &Value::Missing);
    }

    #[test]
    fn blank_detection() {
        assert!(Value::Missing.is_blank());
        assert!(Value::from("   ").is_blank());
        assert!(!Value::from("x").is_blank());
        assert!(!Value::Number(0.0).is_blank());
    }

    #[test]
    fn unusable_datasets_are_rejected() {
        let no_columns = Dataset::new(vec![], vec![Record::default()]);
        assert!(matches!(
            no_columns.ensure_usable(),
            Err(LabelError::InvalidDataset(DatasetProblem::NoColumns))
        ));

        let no_records = Dataset::new(vec!["Part No".into()], vec![]);
        let err = no_records.ensure_usable().unwrap_err();
        assert!(err.to_string().contains("no records"), "{err}");
    }
}
