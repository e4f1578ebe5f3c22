//! Excel dataset reader using calamine
//!
//! Reads the first worksheet, treating its first row as the header.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::{Dataset, DatasetError, Result};

/// Convert a Data cell to string
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            // Format without unnecessary decimals
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                format!("{f}")
            }
        }
        Data::Int(i) => format!("{i}"),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::Error(e) => format!("#ERROR: {e:?}"),
        Data::DateTime(dt) => format!("{dt}"),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Read the first sheet of a workbook into a dataset
pub fn read_workbook(path: &Path) -> Result<Dataset> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| DatasetError::ExcelError(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DatasetError::ExcelError("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DatasetError::ExcelError(e.to_string()))?;

    let mut rows_iter = range.rows();

    let headers: Vec<String> = rows_iter
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .ok_or_else(|| DatasetError::MissingHeader(path.display().to_string()))?;

    // Skip rows with no content at all
    let rows = rows_iter
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|row: &Vec<String>| !row.iter().all(|s| s.is_empty()))
        .collect();

    Ok(Dataset::new(headers, rows))
}
