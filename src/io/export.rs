//! Exports: prediction vectors as plain text, numeric tables as CSV.
//!
//! Predictions are written one value per line in C-style `%.18e` notation
//! (`2.000000000000000000e+00`), the layout numpy's `savetxt` produces, so downstream
//! scripts can load the files with any float parser.

use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::DVector;

use crate::error::AppError;
use crate::io::ingest::{RESPONSE_COLUMN, Table};

/// Write a prediction vector, creating the parent directory if needed.
pub fn write_predictions(path: &Path, predictions: &DVector<f64>) -> Result<(), AppError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)
            .map_err(|e| AppError::new(2, format!("Failed to create output dir '{}': {e}", dir.display())))?;
    }

    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create output file '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    for v in predictions.iter() {
        writeln!(out, "{}", format_sci(*v))
            .map_err(|e| AppError::new(2, format!("Failed to write predictions: {e}")))?;
    }
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write predictions: {e}")))?;

    log::info!("wrote {} predictions to '{}'", predictions.len(), path.display());
    Ok(())
}

/// Write a table as CSV: features in order, then `y` when present.
pub fn write_table_csv(path: &Path, table: &Table) -> Result<(), AppError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)
            .map_err(|e| AppError::new(2, format!("Failed to create output dir '{}': {e}", dir.display())))?;
    }

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create CSV '{}': {e}", path.display())))?;

    let mut header: Vec<&str> = table.feature_names.iter().map(String::as_str).collect();
    if table.response.is_some() {
        header.push(RESPONSE_COLUMN);
    }
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(2, format!("Failed to write CSV header: {e}")))?;

    for i in 0..table.n_rows() {
        let mut record: Vec<String> = table.features.row(i).iter().map(|v| v.to_string()).collect();
        if let Some(y) = &table.response {
            record.push(y[i].to_string());
        }
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(2, format!("Failed to write CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write CSV: {e}")))?;

    Ok(())
}

/// Format as `%.18e` with a signed, at-least-two-digit exponent.
pub fn format_sci(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let raw = format!("{v:.18e}");
    let Some((mantissa, exp)) = raw.split_once('e') else {
        return raw;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scientific_format_matches_savetxt() {
        assert_eq!(format_sci(2.0), "2.000000000000000000e+00");
        assert_eq!(format_sci(-0.0625), "-6.250000000000000000e-02");
        assert!(format_sci(1.25e123).ends_with("e+123"));
        assert_eq!(format_sci(f64::NAN), "nan");
        assert_eq!(format_sci(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn writes_one_value_per_line() {
        let dir = std::env::temp_dir().join(format!("lr-export-{}", std::process::id()));
        let path = dir.join("nested").join("pred.txt");
        let preds = DVector::from_row_slice(&[1.0, -2.5]);

        write_predictions(&path, &preds).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["1.000000000000000000e+00", "-2.500000000000000000e+00"]);

        let parsed: Vec<f64> = lines.iter().map(|l| l.parse().unwrap()).collect();
        assert_eq!(parsed, vec![1.0, -2.5]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn table_csv_reads_back() {
        let table = Table {
            feature_names: vec!["a".to_string(), "b".to_string()],
            features: nalgebra::DMatrix::from_row_slice(2, 2, &[1.0, 0.5, -3.0, 1e-7]),
            response: Some(DVector::from_row_slice(&[10.0, 20.0])),
        };
        let path = std::env::temp_dir().join(format!("lr-table-{}.csv", std::process::id()));
        write_table_csv(&path, &table).unwrap();

        let back = crate::io::load_table(&path, true).unwrap().table;
        std::fs::remove_file(&path).ok();

        assert_eq!(back.feature_names, table.feature_names);
        assert_eq!(back.features, table.features);
        assert_eq!(back.response, table.response);
    }
}
