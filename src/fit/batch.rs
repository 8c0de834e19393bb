//! Full-batch gradient descent.
//!
//! Each iteration uses every row at once:
//!
//! ```text
//! r = Xβ − y
//! g = (1/n) · Xᵗr
//! β ← β − α·g
//! ```
//!
//! There is no step-size adaptation and no early stopping: the loop always runs
//! `max_iterations` times. A learning rate that is too large for the data's conditioning
//! makes the cost grow without bound; that is a poor result, not an error.

use nalgebra::{DMatrix, DVector};

use crate::domain::{GradientConfig, Method};
use crate::error::EstimationError;
use crate::fit::{
    Estimate, Estimator, check_learning_rate, check_problem, half_mse_cost, initial_beta, warn_if_diverged,
};

#[derive(Debug, Clone, Copy)]
pub struct BatchGradient {
    pub config: GradientConfig,
}

impl BatchGradient {
    pub fn new(config: GradientConfig) -> Self {
        Self { config }
    }

    /// Run the descent from an explicit starting β.
    pub fn descend(
        &self,
        x: &DMatrix<f64>,
        y: &DVector<f64>,
        beta0: DVector<f64>,
    ) -> Result<Estimate, EstimationError> {
        check_problem(x, y)?;
        check_learning_rate(self.config.learning_rate)?;
        if beta0.len() != x.ncols() {
            return Err(EstimationError::ShapeMismatch {
                what: "initial beta length vs design columns",
                expected: x.ncols(),
                found: beta0.len(),
            });
        }

        let alpha = self.config.learning_rate;
        let n = x.nrows() as f64;
        let iterations = self.config.max_iterations;
        let checkpoint = (iterations / 10).max(1);

        let mut beta = beta0;
        let mut costs = Vec::with_capacity(iterations);

        for t in 0..iterations {
            let residual = x * &beta - y;
            let gradient = x.tr_mul(&residual) / n;
            beta -= gradient * alpha;

            let cost = half_mse_cost(x, y, &beta);
            costs.push(cost);
            if (t + 1) % checkpoint == 0 {
                log::debug!("batch iteration {}/{iterations}: cost={cost:.6e}", t + 1);
            }
        }

        warn_if_diverged(Method::Batch, &costs);
        Ok(Estimate { beta, costs })
    }
}

impl Estimator for BatchGradient {
    fn method(&self) -> Method {
        Method::Batch
    }

    fn estimate(&self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<Estimate, EstimationError> {
        self.descend(x, y, initial_beta(x.ncols(), self.config.init))
    }
}
