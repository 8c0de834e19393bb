//! Mean squared error.

use nalgebra::DVector;

use crate::error::EstimationError;

/// `(1/n)·Σ(ŷ_i − y_i)²`.
pub fn mse(predicted: &DVector<f64>, actual: &DVector<f64>) -> Result<f64, EstimationError> {
    if predicted.len() != actual.len() {
        return Err(EstimationError::DimensionMismatch {
            predicted: predicted.len(),
            actual: actual.len(),
        });
    }
    if predicted.is_empty() {
        return Err(EstimationError::EmptyInput { what: "no values to evaluate" });
    }

    let sse: f64 = predicted
        .iter()
        .zip(actual.iter())
        .map(|(p, a)| (p - a) * (p - a))
        .sum();
    Ok(sse / predicted.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_zero_error() {
        let y = DVector::from_row_slice(&[1.5, -2.0, 3.25]);
        assert_eq!(mse(&y, &y).unwrap(), 0.0);
    }

    #[test]
    fn symmetric_in_arguments() {
        let a = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        let b = DVector::from_row_slice(&[0.5, 4.0, -1.0]);
        assert_eq!(mse(&a, &b).unwrap(), mse(&b, &a).unwrap());
        // (0.25 + 4 + 16) / 3
        assert!((mse(&a, &b).unwrap() - 20.25 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let a = DVector::from_row_slice(&[1.0, 2.0]);
        let b = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(
            mse(&a, &b).unwrap_err(),
            EstimationError::DimensionMismatch { predicted: 2, actual: 3 }
        );
    }
}
