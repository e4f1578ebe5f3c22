//! Injury Dataset - Tabular loading and column aggregation
//!
//! Supports loading:
//! - Delimited text (CSV)
//! - Microsoft Excel (XLSX, XLS)
//!
//! The whole file is read into a `Dataset` on every call; nothing is cached.
//! `Dataset::value_counts` turns one column into a `FrequencyTable`.

pub mod delimited;
pub mod excel;

use injury_core::FrequencyTable;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while loading or aggregating a dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    /// IO error while reading the file
    #[error("IO error reading file: {path}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Delimited text could not be parsed
    #[error("CSV parsing error: {0}")]
    CsvError(String),

    /// Spreadsheet could not be parsed
    #[error("Excel parsing error: {0}")]
    ExcelError(String),

    /// File has no header row
    #[error("Dataset has no header row: {0}")]
    MissingHeader(String),

    /// Requested column does not exist
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

// ============================================================================
// File formats
// ============================================================================

/// Supported dataset file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Excel,
}

impl FileFormat {
    /// Detect format from path; anything that is not a spreadsheet is read as CSV
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match ext.as_deref() {
            Some("xlsx" | "xlsm" | "xls" | "xlsb" | "ods") => Self::Excel,
            _ => Self::Csv,
        }
    }
}

// ============================================================================
// Dataset
// ============================================================================

/// An in-memory table of injury records
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Column headers
    pub headers: Vec<String>,

    /// Rows of cell values, padded to the header width
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Read a dataset file, choosing the parser from the file extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let dataset = match FileFormat::from_path(path) {
            FileFormat::Csv => delimited::read_csv(path)?,
            FileFormat::Excel => excel::read_workbook(path)?,
        };

        tracing::info!(
            path = %path.display(),
            rows = dataset.row_count(),
            columns = dataset.headers.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find a column by name.
    ///
    /// Exact header matches win; otherwise headers are compared ignoring
    /// case, whitespace, `_` and `-`, so `DegreeOfInjury` finds `Degree of Injury`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        if let Some(idx) = self.headers.iter().position(|h| h == name) {
            return Some(idx);
        }
        let wanted = normalize_header(name);
        self.headers
            .iter()
            .position(|h| normalize_header(h) == wanted)
    }

    /// Count occurrences of each distinct non-empty value in `column`
    ///
    /// Cells are compared verbatim: `" Hand"` and `"Hand"` are different
    /// categories, and a whitespace-only cell is counted. Only empty cells
    /// are skipped.
    pub fn value_counts(&self, column: &str) -> Result<FrequencyTable> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| DatasetError::ColumnNotFound(column.to_string()))?;

        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(String, u64)> = Vec::new();

        for row in &self.rows {
            let value = row.get(idx).map(String::as_str).unwrap_or_default();
            if value.is_empty() {
                continue;
            }
            match positions.get(value) {
                Some(&pos) => counts[pos].1 += 1,
                None => {
                    positions.insert(value, counts.len());
                    counts.push((value.to_string(), 1));
                }
            }
        }

        Ok(FrequencyTable::from_counts(counts))
    }
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
