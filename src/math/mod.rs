//! Mathematical utilities: normal-equation solver and z-score normalization.

pub mod ols;
pub mod zscore;

pub use ols::*;
pub use zscore::*;
