//! Ordinary least squares via the normal equations.
//!
//! ```text
//! β = (XᵗX)⁻¹ Xᵗy
//! ```
//!
//! The Gram matrix `XᵗX` is only `p × p`, so we invert it directly. Before inverting we
//! estimate its reciprocal condition number from the singular values and refuse to solve
//! when it is (numerically) singular: a garbage β is worse than an error.

use nalgebra::{DMatrix, DVector};

use crate::error::EstimationError;

/// Reciprocal condition number below which `XᵗX` is treated as singular.
pub const RCOND_MIN: f64 = 1e-12;

/// Solve the normal equations for `β`.
pub fn solve_normal_equations(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, EstimationError> {
    if x.nrows() != y.len() {
        return Err(EstimationError::ShapeMismatch {
            what: "design rows vs response length",
            expected: x.nrows(),
            found: y.len(),
        });
    }
    if x.nrows() == 0 {
        return Err(EstimationError::EmptyInput { what: "design matrix has no rows" });
    }
    if x.ncols() == 0 {
        return Err(EstimationError::EmptyInput { what: "design matrix has no columns" });
    }

    let gram = x.tr_mul(x);
    let rcond = reciprocal_condition(&gram);
    if !(rcond.is_finite() && rcond >= RCOND_MIN) {
        return Err(EstimationError::SingularMatrix { rcond });
    }

    let inverse = gram
        .try_inverse()
        .ok_or(EstimationError::SingularMatrix { rcond })?;
    let beta = inverse * x.tr_mul(y);

    if beta.iter().all(|v| v.is_finite()) {
        Ok(beta)
    } else {
        Err(EstimationError::SingularMatrix { rcond })
    }
}

/// `σ_min / σ_max` of a square matrix (0 when the matrix is all zeros).
fn reciprocal_condition(m: &DMatrix<f64>) -> f64 {
    let singular = m.clone().svd(false, false).singular_values;
    let max = singular.max();
    let min = singular.min();
    if max <= 0.0 { 0.0 } else { min / max }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_simple_system() {
        // y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_normal_equations(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn residual_is_orthogonal_to_columns() {
        let x = DMatrix::from_row_slice(
            5,
            3,
            &[
                1.0, 0.5, 2.0, //
                1.0, 1.5, -1.0, //
                1.0, 2.0, 0.3, //
                1.0, -0.7, 1.1, //
                1.0, 3.2, 4.0,
            ],
        );
        let y = DVector::from_row_slice(&[1.0, 2.5, -0.4, 3.3, 0.9]);

        let beta = solve_normal_equations(&x, &y).unwrap();
        let normal = x.tr_mul(&(&x * &beta - &y));
        for v in normal.iter() {
            assert!(v.abs() < 1e-9, "Xᵗr should vanish, got {v}");
        }
    }

    #[test]
    fn duplicated_column_is_singular() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let err = solve_normal_equations(&x, &y).unwrap_err();
        assert!(matches!(err, EstimationError::SingularMatrix { .. }));
    }

    #[test]
    fn row_count_must_match_response() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let y = DVector::from_row_slice(&[2.0, 4.0, 6.0, 8.0]);
        let err = solve_normal_equations(&x, &y).unwrap_err();
        assert!(matches!(err, EstimationError::ShapeMismatch { expected: 3, found: 4, .. }));
    }
}
