//! Error types.
//!
//! - `EstimationError` is the taxonomy of the numerical core (normalizer, estimators,
//!   evaluator). Every variant is a deterministic precondition failure, never transient.
//! - `AppError` is what the binary reports: a message plus a process exit code.
//!
//! Exit codes:
//! - `2` bad input, IO or configuration
//! - `3` no usable data
//! - `4` estimation failure

use thiserror::Error;

/// Failures raised by the estimation core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    #[error("shape mismatch: {what} (expected {expected}, found {found})")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("XᵗX is singular or near-singular (rcond={rcond:.3e})")]
    SingularMatrix { rcond: f64 },
    #[error("column {column} has zero variance and cannot be normalized")]
    DegenerateColumn { column: usize },
    #[error("dimension mismatch: {predicted} predicted values vs {actual} actual values")]
    DimensionMismatch { predicted: usize, actual: usize },
    #[error("empty input: {what}")]
    EmptyInput { what: &'static str },
    #[error("learning rate must be finite and > 0, got {0}")]
    InvalidLearningRate(f64),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<EstimationError> for AppError {
    fn from(err: EstimationError) -> Self {
        AppError::new(4, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
