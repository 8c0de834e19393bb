//! Z-score normalization and intercept handling.
//!
//! Each column is rescaled independently:
//!
//! ```text
//! z = (v - mean_j) / std_j
//! ```
//!
//! using the population statistics (divisor `n`) of that column. The intercept column
//! is added *after* normalization by `add_intercept`, so the constant offset never
//! reaches the normalizer.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::EstimationError;

/// Threshold, relative to `|mean|`, under which a column's standard deviation counts as
/// zero.
///
/// Summing identical values can leave a rounding-level residual (e.g. `1e-17`). The
/// threshold scales with the column, so small-unit columns that do vary still normalize.
const DEGENERATE_REL_TOL: f64 = 1e-12;

/// Per-column normalization statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScore {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl ZScore {
    /// Compute population mean / standard deviation for every column of `x`.
    pub fn fit(x: &DMatrix<f64>) -> Result<Self, EstimationError> {
        let n = x.nrows();
        if n == 0 {
            return Err(EstimationError::EmptyInput { what: "cannot normalize a matrix with no rows" });
        }

        let mut mean = Vec::with_capacity(x.ncols());
        let mut std = Vec::with_capacity(x.ncols());
        for (j, col) in x.column_iter().enumerate() {
            let m = col.sum() / n as f64;
            let var = col.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / n as f64;
            let s = var.sqrt();
            if !s.is_finite() || s <= DEGENERATE_REL_TOL * m.abs() {
                return Err(EstimationError::DegenerateColumn { column: j });
            }
            mean.push(m);
            std.push(s);
        }

        Ok(Self { mean, std })
    }

    /// Check statistics that did not come from `fit` (e.g. a saved model).
    ///
    /// `mean` and `std` must have one entry per column, and every std must be finite and
    /// strictly positive.
    pub fn validate(&self) -> Result<(), EstimationError> {
        if self.std.len() != self.mean.len() {
            return Err(EstimationError::ShapeMismatch {
                what: "normalization std entries vs mean entries",
                expected: self.mean.len(),
                found: self.std.len(),
            });
        }
        if let Some(column) = self.std.iter().position(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(EstimationError::DegenerateColumn { column });
        }
        if let Some(column) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(EstimationError::DegenerateColumn { column });
        }
        Ok(())
    }

    /// Apply these statistics to `x`.
    pub fn transform(&self, x: &DMatrix<f64>) -> Result<DMatrix<f64>, EstimationError> {
        self.validate()?;
        if x.ncols() != self.mean.len() {
            return Err(EstimationError::ShapeMismatch {
                what: "feature columns vs normalization statistics",
                expected: self.mean.len(),
                found: x.ncols(),
            });
        }

        let mut out = x.clone();
        for (j, mut col) in out.column_iter_mut().enumerate() {
            let (m, s) = (self.mean[j], self.std[j]);
            col.apply(|v| *v = (*v - m) / s);
        }
        Ok(out)
    }
}

/// Normalize `x` with statistics computed from `x` itself.
pub fn normalize(x: &DMatrix<f64>) -> Result<DMatrix<f64>, EstimationError> {
    ZScore::fit(x)?.transform(x)
}

/// Return a copy of `x` with a leading column of ones (the offset / intercept term).
pub fn add_intercept(x: &DMatrix<f64>) -> DMatrix<f64> {
    x.clone().insert_column(0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DMatrix<f64> {
        DMatrix::from_row_slice(4, 2, &[1.0, 10.0, 2.0, 30.0, 3.0, 20.0, 6.0, 40.0])
    }

    #[test]
    fn normalized_columns_have_zero_mean_unit_std() {
        let z = normalize(&sample()).unwrap();
        let n = z.nrows() as f64;
        for col in z.column_iter() {
            let mean = col.sum() / n;
            let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            assert!(mean.abs() < 1e-12, "mean should be ~0, got {mean}");
            assert!((var.sqrt() - 1.0).abs() < 1e-12, "std should be ~1, got {}", var.sqrt());
        }
    }

    #[test]
    fn uses_population_std() {
        let x = DMatrix::from_row_slice(2, 1, &[0.0, 2.0]);
        let stats = ZScore::fit(&x).unwrap();
        assert!((stats.mean[0] - 1.0).abs() < 1e-12);
        assert!((stats.std[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_is_degenerate() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.1, 2.0, 0.1, 3.0, 0.1]);
        let err = normalize(&x).unwrap_err();
        assert_eq!(err, EstimationError::DegenerateColumn { column: 1 });
    }

    #[test]
    fn small_scale_column_still_normalizes() {
        let x = DMatrix::from_row_slice(2, 1, &[1e-13, 2e-13]);
        let z = normalize(&x).unwrap();
        assert!((z[(0, 0)] + 1.0).abs() < 1e-9);
        assert!((z[(1, 0)] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn all_zero_column_is_degenerate() {
        let x = DMatrix::from_row_slice(3, 1, &[0.0, 0.0, 0.0]);
        assert_eq!(normalize(&x).unwrap_err(), EstimationError::DegenerateColumn { column: 0 });
    }

    #[test]
    fn transform_rejects_short_std() {
        let stats = ZScore {
            mean: vec![0.0, 0.0],
            std: vec![1.0],
        };
        let x = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);
        assert!(matches!(
            stats.transform(&x),
            Err(EstimationError::ShapeMismatch { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn transform_rejects_zero_std() {
        let stats = ZScore {
            mean: vec![1.0],
            std: vec![0.0],
        };
        let x = DMatrix::from_row_slice(1, 1, &[2.0]);
        assert_eq!(stats.transform(&x).unwrap_err(), EstimationError::DegenerateColumn { column: 0 });
    }

    #[test]
    fn transform_rejects_wrong_width() {
        let stats = ZScore::fit(&sample()).unwrap();
        let x = DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]);
        assert!(matches!(
            stats.transform(&x),
            Err(EstimationError::ShapeMismatch { expected: 2, found: 3, .. })
        ));
    }

    #[test]
    fn intercept_is_prepended_without_touching_input() {
        let x = sample();
        let with = add_intercept(&x);
        assert_eq!(with.shape(), (4, 3));
        assert!(with.column(0).iter().all(|v| *v == 1.0));
        assert_eq!(with.column(1), x.column(0));
        assert_eq!(x.ncols(), 2);
    }
}
