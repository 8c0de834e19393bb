//! Closed-form estimator (normal equations).

use nalgebra::{DMatrix, DVector};

use crate::domain::Method;
use crate::error::EstimationError;
use crate::fit::{Estimate, Estimator};
use crate::math::solve_normal_equations;

/// `β = (XᵗX)⁻¹ Xᵗy`. Deterministic, no hyperparameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedForm;

impl Estimator for ClosedForm {
    fn method(&self) -> Method {
        Method::Closed
    }

    fn estimate(&self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<Estimate, EstimationError> {
        let beta = solve_normal_equations(x, y)?;
        Ok(Estimate { beta, costs: Vec::new() })
    }
}
