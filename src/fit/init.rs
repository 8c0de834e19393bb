//! Starting point for the iterative estimators.

use nalgebra::DVector;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::domain::InitialBeta;

/// Build the initial β of length `p`.
///
/// `Uniform` draws every coefficient from `U[0, 1)`; the same seed always yields the
/// same vector.
pub fn initial_beta(p: usize, init: InitialBeta) -> DVector<f64> {
    match init {
        InitialBeta::Zeros => DVector::zeros(p),
        InitialBeta::Uniform { seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            DVector::from_fn(p, |_, _| rng.r#gen::<f64>())
        }
    }
}
