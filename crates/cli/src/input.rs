//! Tabular input: CSV through `csv`, spreadsheets through `calamine`.
//!
//! The first row holds the column names. Rows whose cells are all blank
//! are skipped.

use std::path::Path;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};
use sticker_labels_core::{Dataset, Record, Value};

/// Extensions accepted by [`load_dataset`].
pub(crate) const SUPPORTED: &[&str] = &["csv", "xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Read `path` into a dataset. `sheet` selects a worksheet by name and
/// defaults to the first one; it is ignored for CSV.
pub(crate) fn load_dataset(path: &Path, sheet: Option<&str>) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let dataset = match ext.as_deref() {
        Some("csv") => read_csv(path)?,
        Some(e) if SUPPORTED.contains(&e) => read_workbook(path, sheet)?,
        _ => bail!(
            "unsupported input '{}': expected one of .{}",
            path.display(),
            SUPPORTED.join(", .")
        ),
    };
    tracing::info!(
        path = %path.display(),
        columns = dataset.columns().len(),
        records = dataset.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Column name for header cell `index`, with a placeholder for blanks.
fn column_name(index: usize, raw: &str) -> String {
    if raw.trim().is_empty() {
        format!("Unnamed: {index}")
    } else {
        raw.to_string()
    }
}

fn keep(cells: Vec<Value>) -> Option<Record> {
    if cells.iter().all(Value::is_blank) {
        None
    } else {
        Some(Record::new(cells))
    }
}

// ── CSV ─────────────────────────────────────────────────────────────────

fn read_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("failed to read header row of {}", path.display()))?
        .iter()
        .enumerate()
        .map(|(i, h)| column_name(i, h))
        .collect();

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        // Row 1 is the header.
        let row = row.with_context(|| format!("failed to read CSV row {}", i + 2))?;
        let cells = (0..columns.len())
            .map(|c| match row.get(c) {
                Some(text) if !text.is_empty() => Value::from(text),
                _ => Value::Missing,
            })
            .collect();
        records.extend(keep(cells));
    }
    Ok(Dataset::new(columns, records))
}

// ── Spreadsheets ────────────────────────────────────────────────────────

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open spreadsheet {}", path.display()))?;

    let name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .with_context(|| format!("{} has no worksheets", path.display()))?,
    };
    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("failed to read sheet '{name}'"))?;

    let mut rows = range.rows();
    let columns: Vec<String> = rows
        .next()
        .map(|header| {
            header
                .iter()
                .enumerate()
                .map(|(i, cell)| column_name(i, &header_text(cell)))
                .collect()
        })
        .unwrap_or_default();
    let records = rows
        .filter_map(|row| keep(row.iter().map(cell_value).collect()))
        .collect();
    Ok(Dataset::new(columns, records))
}

fn header_text(cell: &Data) -> String {
    match cell_value(cell) {
        Value::Missing => String::new(),
        value => value.display(),
    }
}

/// Convert one spreadsheet cell. Dates become `YYYY-MM-DD HH:MM:SS` text.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Missing,
        Data::String(s) if s.is_empty() => Value::Missing,
        Data::String(s) => Value::Text(s.clone()),
        Data::Float(f) => Value::number(*f),
        Data::Int(i) => Value::number(*i as f64),
        Data::Bool(b) => Value::Text(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(dt) => Value::Text(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Value::number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn csv_headers_and_blank_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "Part No,,Store Location\nP-1,x,A_B\n,,\nP-2,,\n").unwrap();

        let dataset = load_dataset(&path, None).unwrap();
        assert_eq!(dataset.columns(), ["Part No", "Unnamed: 1", "Store Location"]);
        assert_eq!(dataset.len(), 2);
        let second = &dataset.records()[1];
        assert_eq!(second.get(0), &Value::from("P-2"));
        assert_eq!(second.get(2), &Value::Missing);
    }

    #[test]
    fn short_csv_rows_are_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "a,b,c\n1\n").unwrap();
        let dataset = load_dataset(&path, None).unwrap();
        assert_eq!(dataset.records()[0].cells().len(), 3);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_dataset(Path::new("labels.txt"), None).unwrap_err();
        assert!(err.to_string().contains("unsupported input"));
    }

    #[test]
    fn spreadsheet_cells_map_to_values() {
        assert_eq!(cell_value(&Data::Empty), Value::Missing);
        assert_eq!(cell_value(&Data::Int(1001)).display(), "1001");
        assert_eq!(cell_value(&Data::Float(2.5)).display(), "2.5");
        assert_eq!(cell_value(&Data::Float(f64::NAN)), Value::Missing);
        assert_eq!(cell_value(&Data::Bool(true)).display(), "True");
        assert_eq!(
            cell_value(&Data::String("A1_B2".into())),
            Value::from("A1_B2")
        );
    }
}
