//! Delimited text (CSV) dataset reader
//!
//! Records may be ragged; missing trailing cells read as empty. Non-UTF-8
//! bytes are replaced rather than rejected.

use std::fs::File;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};

use crate::{Dataset, DatasetError, Result};

fn record_to_strings(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

/// Read a CSV file with a header row into a dataset
pub fn read_csv(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| DatasetError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .byte_headers()
        .map_err(|e| DatasetError::CsvError(e.to_string()))?;
    let headers: Vec<String> = record_to_strings(headers)
        .into_iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(DatasetError::MissingHeader(path.display().to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record.map_err(|e| DatasetError::CsvError(e.to_string()))?;
        rows.push(record_to_strings(&record));
    }

    Ok(Dataset::new(headers, rows))
}
