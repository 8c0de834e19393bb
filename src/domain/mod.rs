//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - estimator selection and hyperparameters (`Method`, `GradientConfig`, `InitialBeta`)
//! - run configuration (`RunConfig`, `RunSpec`, `ZScoreScope`)
//! - the saved model schema (`ModelFile`)

pub mod types;

pub use types::*;
