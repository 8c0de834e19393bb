//! Evaluation and reporting.
//!
//! - `mse`: the pure mean-squared-error evaluator
//! - `format`: terminal output for single runs and the six-configuration suite

pub mod format;
pub mod mse;

pub use format::*;
pub use mse::*;
