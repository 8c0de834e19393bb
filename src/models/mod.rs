//! Fitted linear model.
//!
//! The model is just β; prediction is a single matrix-vector product so the estimators
//! and the evaluator can stay independent of each other.

pub mod model;

pub use model::*;
