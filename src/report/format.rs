//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the estimators stay free of printing
//! - output changes are localized

use nalgebra::DVector;

use crate::app::pipeline::{Dataset, RunOutput};
use crate::domain::RunSpec;
use crate::error::AppError;

/// Separator printed between suite sections.
pub const RULE: &str = "------------------------------------------------";

/// `Beta:` block plus the MSE line for one configuration.
pub fn format_run(out: &RunOutput) -> String {
    let mut s = String::new();
    s.push_str("Beta: \n");
    s.push_str(&fmt_vec(out.model.beta()));
    s.push('\n');
    s.push_str(&format!("MSE:  {}\n", fmt_f64(out.mse)));
    s
}

/// Coefficients next to their column names.
pub fn format_coefficients(out: &RunOutput) -> String {
    let mut s = String::new();
    let width = out.columns.iter().map(|c| c.chars().count()).max().unwrap_or(0).max(6);
    s.push_str(&format!("{:<width$} {:>16}\n", "column", "beta"));
    s.push_str(&format!("{:-<width$} {:-<16}\n", "", ""));
    for (name, b) in out.columns.iter().zip(out.model.beta().iter()) {
        s.push_str(&format!("{name:<width$} {b:>16.6}\n"));
    }
    s
}

/// One section of the suite report: heading, then either the result or the error.
pub fn format_suite_section(spec: &RunSpec, result: &Result<RunOutput, AppError>) -> String {
    let mut s = String::new();
    s.push_str(RULE);
    s.push('\n');
    s.push_str(&spec.label());
    s.push('\n');
    match result {
        Ok(out) => s.push_str(&format_run(out)),
        Err(err) => s.push_str(&format!("Error: {err}\n")),
    }
    s
}

/// Compact comparison table of all suite results.
pub fn format_suite_summary(results: &[(RunSpec, Result<RunOutput, AppError>)]) -> String {
    let mut s = String::new();
    s.push_str(&format!("{:<44} {:>16}\n", "configuration", "test MSE"));
    s.push_str(&format!("{:-<44} {:-<16}\n", "", ""));
    for (spec, result) in results {
        let mse = match result {
            Ok(out) => fmt_f64(out.mse),
            Err(_) => "failed".to_string(),
        };
        s.push_str(&format!("{:<44} {:>16}\n", spec.label(), mse));
    }
    s
}

/// Dataset summary printed before a run.
pub fn format_dataset_summary(dataset: &Dataset) -> String {
    let mut s = String::new();
    for (name, data) in [("train", &dataset.train), ("test", &dataset.test)] {
        s.push_str(&format!(
            "{name}: n={} (read {}, skipped {}) | features={}\n",
            data.rows_used,
            data.rows_read,
            data.row_errors.len(),
            data.table.feature_names.len(),
        ));
    }
    s
}

/// Cost sequence of a gradient estimator, one line per iteration.
pub fn format_cost_trace(costs: &[f64]) -> String {
    let mut s = String::new();
    for (t, c) in costs.iter().enumerate() {
        s.push_str(&format!("{:>6} {}\n", t + 1, fmt_f64(*c)));
    }
    s
}

pub fn fmt_vec(v: &DVector<f64>) -> String {
    let parts: Vec<String> = v.iter().map(|x| fmt_f64(*x)).collect();
    format!("[{}]", parts.join(", "))
}

fn fmt_f64(v: f64) -> String {
    if v.is_finite() && v != 0.0 && (v.abs() >= 1e6 || v.abs() < 1e-4) {
        format!("{v:.6e}")
    } else {
        format!("{v:.6}")
    }
}
