//! Prediction with a learned coefficient vector.

use nalgebra::{DMatrix, DVector};

use crate::error::EstimationError;

/// A linear model `ŷ = X·β`. β is immutable once the model is built.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    beta: DVector<f64>,
}

impl LinearModel {
    pub fn new(beta: DVector<f64>) -> Self {
        Self { beta }
    }

    pub fn beta(&self) -> &DVector<f64> {
        &self.beta
    }

    /// Number of design columns this model expects (intercept included).
    pub fn n_features(&self) -> usize {
        self.beta.len()
    }

    /// Predict one response per row of `x`.
    pub fn predict(&self, x: &DMatrix<f64>) -> Result<DVector<f64>, EstimationError> {
        if x.ncols() != self.beta.len() {
            return Err(EstimationError::ShapeMismatch {
                what: "design columns vs beta length",
                expected: self.beta.len(),
                found: x.ncols(),
            });
        }
        Ok(x * &self.beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_is_matrix_vector_product() {
        let model = LinearModel::new(DVector::from_row_slice(&[1.0, 2.0]));
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, -2.0]);
        let y = model.predict(&x).unwrap();
        assert_eq!(y.as_slice(), &[1.0, 3.0, -3.0]);
    }

    #[test]
    fn predict_rejects_wrong_width() {
        let model = LinearModel::new(DVector::from_row_slice(&[1.0, 2.0]));
        let x = DMatrix::from_row_slice(1, 3, &[1.0, 0.0, 0.0]);
        assert!(matches!(
            model.predict(&x),
            Err(EstimationError::ShapeMismatch { expected: 2, found: 3, .. })
        ));
    }
}
