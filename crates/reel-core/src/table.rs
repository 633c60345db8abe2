//! In-memory tabular dataset backed by CSV files.
//!
//! Every row always holds exactly one cell per header. `None` is the
//! absent-marker: it is written as an empty field, and an empty field reads
//! back as `None`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Build a table from JSON objects.
    ///
    /// The column set is the union of keys, ordered by first appearance.
    /// Strings are stored verbatim, `null` as absent, anything else as
    /// compact JSON text.
    pub fn from_records(records: &[Map<String, Value>]) -> Self {
        let mut table = Table::default();
        for record in records {
            for key in record.keys() {
                table.ensure_column(key);
            }
        }
        for record in records {
            let row = table
                .headers
                .iter()
                .map(|h| record.get(h).and_then(json_cell))
                .collect();
            table.rows.push(row);
        }
        table
    }

    pub fn read_csv(path: &Path) -> Result<Self, AppError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let width = headers.len();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<Option<String>> = record
                .iter()
                .take(width)
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect();
            row.resize(width, None);
            rows.push(row);
        }

        tracing::debug!(path = %path.display(), rows = rows.len(), columns = width, "Read table");
        Ok(Self { headers, rows })
    }

    /// Write the table to `path`.
    ///
    /// Data goes to a sibling temporary file that is then renamed over
    /// `path`, so writing back to the file the table was read from is safe.
    /// A table without columns is written as an empty file.
    pub fn write_csv(&self, path: &Path) -> Result<(), AppError> {
        let tmp = temp_sibling(path);
        if let Err(e) = self.write_records(&tmp) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e);
        }
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::debug!(path = %path.display(), rows = self.rows.len(), "Wrote table");
        Ok(())
    }

    fn write_records(&self, path: &Path) -> Result<(), AppError> {
        let mut writer = csv::Writer::from_path(path)?;
        if !self.headers.is_empty() {
            writer.write_record(&self.headers)?;
            for row in &self.rows {
                writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of `name`, appending it (filled with absent-markers) if missing.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(None);
        }
        self.headers.len() - 1
    }

    /// Ensure `name` exists and set it to the absent-marker on every row.
    pub fn reset_column(&mut self, name: &str) -> usize {
        let idx = self.ensure_column(name);
        for row in &mut self.rows {
            row[idx] = None;
        }
        idx
    }

    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|c| c.as_deref())
    }

    /// Look up a cell by column name.
    pub fn get_by_name(&self, row: usize, column: &str) -> Option<&str> {
        self.column_index(column).and_then(|idx| self.get(row, idx))
    }

    /// Set a cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, row: usize, column: usize, value: Option<String>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = value;
        }
    }
}

fn json_cell(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("table.csv"));
    name.push(".tmp");
    path.with_file_name(name)
}
