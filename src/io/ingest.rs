//! CSV ingest.
//!
//! Turns a header-first CSV into a numeric feature matrix plus (optionally) the response
//! vector:
//!
//! - the column named `y` (case-insensitive) is the response
//! - every other column is a feature, kept in file order
//! - rows with missing, unparsable or non-finite values are skipped and reported
//!
//! No intercept is added here; that happens in the pipeline after optional
//! normalization.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use nalgebra::{DMatrix, DVector};

use crate::error::AppError;

/// Name of the response column.
pub const RESPONSE_COLUMN: &str = "y";

/// Numeric table: features in file order plus the optional response.
#[derive(Debug, Clone)]
pub struct Table {
    pub feature_names: Vec<String>,
    pub features: DMatrix<f64>,
    pub response: Option<DVector<f64>>,
}

impl Table {
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    /// The response vector, or an error naming the file it should have come from.
    pub fn require_response(&self, source: &str) -> Result<&DVector<f64>, AppError> {
        self.response
            .as_ref()
            .ok_or_else(|| AppError::new(2, format!("'{source}' has no `{RESPONSE_COLUMN}` column.")))
    }
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the table plus what happened on the way.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub table: Table,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a CSV file.
///
/// With `require_response`, a missing `y` column is a schema error.
pub fn load_table(path: &Path, require_response: bool) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_table(file, require_response)
        .map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))?;

    for err in &data.row_errors {
        log::warn!("{}:{}: skipped row: {}", path.display(), err.line, err.message);
    }
    log::info!(
        "loaded '{}': {} of {} rows, {} features",
        path.display(),
        data.rows_used,
        data.rows_read,
        data.table.feature_names.len()
    );

    Ok(data)
}

/// Read a CSV table from any reader.
pub fn read_table<R: Read>(reader: R, require_response: bool) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    if header_map.len() != headers.len() {
        return Err(AppError::new(2, "Duplicate column names in CSV header."));
    }

    let response_idx = header_map.get(RESPONSE_COLUMN).copied();
    if require_response && response_idx.is_none() {
        return Err(AppError::new(
            2,
            format!("Missing required column: `{RESPONSE_COLUMN}`"),
        ));
    }

    let feature_idx: Vec<usize> = (0..headers.len()).filter(|&i| Some(i) != response_idx).collect();
    let feature_names: Vec<String> = feature_idx
        .iter()
        .map(|&i| clean_header_name(&headers[i]).to_string())
        .collect();

    let mut flat = Vec::new();
    let mut response = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &headers, &feature_idx, response_idx) {
            Ok((values, y)) => {
                flat.extend(values);
                if let Some(y) = y {
                    response.push(y);
                }
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = rows_read - row_errors.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No valid rows in CSV."));
    }

    let features = DMatrix::from_row_slice(rows_used, feature_idx.len(), &flat);
    let response = response_idx.map(|_| DVector::from_vec(response));

    Ok(IngestedData {
        table: Table {
            feature_names,
            features,
            response,
        },
        row_errors,
        rows_read,
        rows_used,
    })
}

fn parse_row(
    record: &StringRecord,
    headers: &StringRecord,
    feature_idx: &[usize],
    response_idx: Option<usize>,
) -> Result<(Vec<f64>, Option<f64>), String> {
    if record.len() != headers.len() {
        return Err(format!(
            "Expected {} fields, found {}.",
            headers.len(),
            record.len()
        ));
    }

    let mut values = Vec::with_capacity(feature_idx.len());
    for &i in feature_idx {
        values.push(parse_value(record, headers, i)?);
    }
    let y = response_idx.map(|i| parse_value(record, headers, i)).transpose()?;

    Ok((values, y))
}

fn parse_value(record: &StringRecord, headers: &StringRecord, idx: usize) -> Result<f64, String> {
    let name = clean_header_name(&headers[idx]);
    let raw = record
        .get(idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing value: `{name}`"))?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("Non-finite value for `{name}`: '{raw}'")),
        Err(_) => Err(format!("Invalid number for `{name}`: '{raw}'")),
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn clean_header_name(name: &str) -> &str {
    // Excel and friends sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}')
}

fn normalize_header_name(name: &str) -> String {
    clean_header_name(name).to_ascii_lowercase()
}
