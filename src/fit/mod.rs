//! Estimators for the coefficient vector β.
//!
//! Responsibilities:
//!
//! - closed-form solution of the normal equations (`closed_form`)
//! - full-batch gradient descent (`batch`)
//! - per-sample, coordinate-sequential gradient descent (`stochastic`)
//! - the injected initial β for the iterative estimators (`init`)
//!
//! All estimators are pure: they borrow X and y, and return a fresh β.

use nalgebra::{DMatrix, DVector};

use crate::domain::{GradientConfig, Method};
use crate::error::EstimationError;

pub mod batch;
pub mod closed_form;
pub mod init;
pub mod stochastic;

pub use batch::*;
pub use closed_form::*;
pub use init::*;
pub use stochastic::*;

/// Output of one estimation call.
#[derive(Debug, Clone)]
pub struct Estimate {
    pub beta: DVector<f64>,
    /// Diagnostic cost `(1/2n)·‖Xβ − y‖²` after each iteration (batch) or epoch
    /// (stochastic). Empty for the closed form.
    pub costs: Vec<f64>,
}

/// A β estimation strategy.
pub trait Estimator {
    fn method(&self) -> Method;

    fn estimate(&self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<Estimate, EstimationError>;
}

/// Build the estimator for `method`.
///
/// `gradient` is ignored by the closed form.
pub fn estimator_for(method: Method, gradient: GradientConfig) -> Box<dyn Estimator + Send + Sync> {
    match method {
        Method::Closed => Box::new(ClosedForm),
        Method::Batch => Box::new(BatchGradient::new(gradient)),
        Method::Stochastic => Box::new(StochasticGradient::new(gradient)),
    }
}

/// `(1/2n)·‖Xβ − y‖²`.
pub fn half_mse_cost(x: &DMatrix<f64>, y: &DVector<f64>, beta: &DVector<f64>) -> f64 {
    let residual = x * beta - y;
    residual.norm_squared() / (2.0 * y.len() as f64)
}

/// Shape checks shared by every estimator.
pub(crate) fn check_problem(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<(), EstimationError> {
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
    Ok(())
}

pub(crate) fn check_learning_rate(alpha: f64) -> Result<(), EstimationError> {
    if alpha.is_finite() && alpha > 0.0 {
        Ok(())
    } else {
        Err(EstimationError::InvalidLearningRate(alpha))
    }
}

/// Log a divergence warning when the last cost is worse than the first.
pub(crate) fn warn_if_diverged(method: Method, costs: &[f64]) {
    let (Some(first), Some(last)) = (costs.first(), costs.last()) else {
        return;
    };
    if !last.is_finite() || last > first {
        log::warn!(
            "{} did not converge: cost went from {first:.6e} to {last:.6e}; consider a smaller learning rate",
            method.display_name()
        );
    }
}
