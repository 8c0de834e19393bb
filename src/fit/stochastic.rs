//! Stochastic (per-sample) gradient descent.
//!
//! For every epoch, every row `i` in order, and every coefficient `j` in order:
//!
//! ```text
//! β_j ← β_j − α · (⟨X_i, β⟩ − y_i) · X_ij
//! ```
//!
//! The prediction `⟨X_i, β⟩` is recomputed from the *current* β before each coordinate
//! update, so coordinate `j` sees the new values of coordinates `0..j` of the same row.
//! This is not the same trajectory as a vectorized per-row update and must stay
//! sequential: no shuffling, no parallelism across rows or epochs.

use nalgebra::{DMatrix, DVector};

use crate::domain::{GradientConfig, Method};
use crate::error::EstimationError;
use crate::fit::{
    Estimate, Estimator, check_learning_rate, check_problem, half_mse_cost, initial_beta, warn_if_diverged,
};

#[derive(Debug, Clone, Copy)]
pub struct StochasticGradient {
    pub config: GradientConfig,
}

impl StochasticGradient {
    pub fn new(config: GradientConfig) -> Self {
        Self { config }
    }

    /// Run `max_iterations` epochs from an explicit starting β.
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
        let (n, p) = x.shape();
        let epochs = self.config.max_iterations;
        let checkpoint = (epochs / 10).max(1);

        let mut beta = beta0;
        let mut costs = Vec::with_capacity(epochs);

        for epoch in 0..epochs {
            for i in 0..n {
                for j in 0..p {
                    let prediction = row_dot(x, i, &beta);
                    beta[j] -= alpha * (prediction - y[i]) * x[(i, j)];
                }
            }

            let cost = half_mse_cost(x, y, &beta);
            costs.push(cost);
            if (epoch + 1) % checkpoint == 0 {
                log::debug!("stochastic epoch {}/{epochs}: cost={cost:.6e}", epoch + 1);
            }
        }

        warn_if_diverged(Method::Stochastic, &costs);
        Ok(Estimate { beta, costs })
    }
}

impl Estimator for StochasticGradient {
    fn method(&self) -> Method {
        Method::Stochastic
    }

    fn estimate(&self, x: &DMatrix<f64>, y: &DVector<f64>) -> Result<Estimate, EstimationError> {
        self.descend(x, y, initial_beta(x.ncols(), self.config.init))
    }
}

/// `⟨X_i, β⟩`, summed left to right.
fn row_dot(x: &DMatrix<f64>, i: usize, beta: &DVector<f64>) -> f64 {
    let mut acc = 0.0;
    for k in 0..beta.len() {
        acc += x[(i, k)] * beta[k];
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InitialBeta;

    fn cfg(learning_rate: f64, max_iterations: usize) -> GradientConfig {
        GradientConfig {
            learning_rate,
            max_iterations,
            init: InitialBeta::Zeros,
        }
    }

    #[test]
    fn coordinate_updates_see_previous_coordinates() {
        // Single row X = [1, 2], y = 3, α = 0.1, β0 = 0.
        // j=0: pred=0        -> β0 = 0 - 0.1*(0-3)*1      = 0.3
        // j=1: pred=0.3      -> β1 = 0 - 0.1*(0.3-3)*2    = 0.54
        // (a vectorized row update would give β1 = 0.6)
        let x = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);
        let y = DVector::from_row_slice(&[3.0]);
        let est = StochasticGradient::new(cfg(0.1, 1)).estimate(&x, &y).unwrap();

        assert!((est.beta[0] - 0.3).abs() < 1e-12);
        assert!((est.beta[1] - 0.54).abs() < 1e-12);
    }

    #[test]
    fn rows_see_previous_rows() {
        // Row 0: X=[1,0], y=1 -> β0 = 0.5 (α=0.5), β1 untouched (X_01 = 0).
        // Row 1: X=[1,1], y=2
        //   j=0: pred=0.5   -> β0 = 0.5 - 0.5*(0.5-2)*1 = 1.25
        //   j=1: pred=1.25  -> β1 = 0 - 0.5*(1.25-2)*1  = 0.375
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        let est = StochasticGradient::new(cfg(0.5, 1)).estimate(&x, &y).unwrap();

        assert!((est.beta[0] - 1.25).abs() < 1e-12);
        assert!((est.beta[1] - 0.375).abs() < 1e-12);
        assert_eq!(est.costs.len(), 1);
    }

    #[test]
    fn approaches_generator_on_clean_data() {
        let xs: Vec<f64> = (0..20).map(|i| i as f64 / 19.0).collect();
        let mut data = Vec::new();
        for &v in &xs {
            data.push(1.0);
            data.push(v);
        }
        let x = DMatrix::from_row_slice(xs.len(), 2, &data);
        let y = DVector::from_iterator(xs.len(), xs.iter().map(|v| -1.0 + 3.0 * v));

        let est = StochasticGradient::new(cfg(0.1, 500)).estimate(&x, &y).unwrap();
        assert!((est.beta[0] + 1.0).abs() < 1e-2, "intercept {}", est.beta[0]);
        assert!((est.beta[1] - 3.0).abs() < 1e-2, "slope {}", est.beta[1]);
        assert!(est.costs.last().unwrap() < est.costs.first().unwrap());
    }

    #[test]
    fn initial_beta_length_must_match() {
        let x = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);
        let y = DVector::from_row_slice(&[3.0]);
        let err = StochasticGradient::new(cfg(0.1, 1))
            .descend(&x, &y, DVector::zeros(3))
            .unwrap_err();
        assert!(matches!(err, EstimationError::ShapeMismatch { expected: 2, found: 3, .. }));
    }
}
