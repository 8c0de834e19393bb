//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed from the CLI into the estimation pipeline
//! - exported to JSON alongside a fitted β
//! - reloaded later by `lr predict`

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::math::ZScore;

/// Default learning rate for both gradient estimators.
pub const DEFAULT_LEARNING_RATE: f64 = 0.001;
/// Default number of iterations (batch) / epochs (stochastic).
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
/// Default seed for the uniform initial β.
pub const DEFAULT_SEED: u64 = 42;

/// Which estimator computes β.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Normal equations: `β = (XᵗX)⁻¹ Xᵗy`.
    Closed,
    /// Full-batch gradient descent.
    Batch,
    /// Per-sample, coordinate-sequential gradient descent.
    Stochastic,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Closed, Method::Batch, Method::Stochastic];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Method::Closed => "Closed Form",
            Method::Batch => "Batch Gradient",
            Method::Stochastic => "Stochastic Gradient",
        }
    }

    /// Numeric code used in output file names (`0`, `1`, `2`).
    pub fn code(self) -> u8 {
        match self {
            Method::Closed => 0,
            Method::Batch => 1,
            Method::Stochastic => 2,
        }
    }

    pub fn is_iterative(self) -> bool {
        !matches!(self, Method::Closed)
    }
}

/// How the initial β of the gradient estimators is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum InitialBeta {
    /// All coefficients start at zero.
    Zeros,
    /// Each coefficient drawn from `U[0, 1)` with a seeded generator.
    Uniform { seed: u64 },
}

/// CLI-facing selector for `InitialBeta` (the seed is a separate flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InitKind {
    Zeros,
    Uniform,
}

impl InitKind {
    pub fn with_seed(self, seed: u64) -> InitialBeta {
        match self {
            InitKind::Zeros => InitialBeta::Zeros,
            InitKind::Uniform => InitialBeta::Uniform { seed },
        }
    }
}

/// Hyperparameters shared by the batch and stochastic estimators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientConfig {
    pub learning_rate: f64,
    pub max_iterations: usize,
    pub init: InitialBeta,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            init: InitialBeta::Uniform { seed: DEFAULT_SEED },
        }
    }
}

/// Which statistics normalize the test matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ZScoreScope {
    /// Train and test are each normalized with their own mean / std.
    PerSplit,
    /// Test is normalized with the training set's mean / std.
    Train,
}

/// A single configuration: one estimator, normalization on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSpec {
    pub method: Method,
    pub zscore: bool,
}

impl RunSpec {
    /// The six fixed configurations of `lr run`, in print order.
    pub const SUITE: [RunSpec; 6] = [
        RunSpec { method: Method::Closed, zscore: false },
        RunSpec { method: Method::Batch, zscore: false },
        RunSpec { method: Method::Stochastic, zscore: false },
        RunSpec { method: Method::Closed, zscore: true },
        RunSpec { method: Method::Batch, zscore: true },
        RunSpec { method: Method::Stochastic, zscore: true },
    ];

    /// e.g. `Batch Gradient With Normalization`.
    pub fn label(&self) -> String {
        let norm = if self.zscore { "With" } else { "Without" };
        format!("{} {norm} Normalization", self.method.display_name())
    }

    /// Output file name: `linear-regression-output_<method>_<zscore>.txt`.
    pub fn output_file_name(&self) -> String {
        format!(
            "linear-regression-output_{}_{}.txt",
            self.method.code(),
            u8::from(self.zscore)
        )
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus `.env` / environment defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub train_path: PathBuf,
    pub test_path: PathBuf,
    pub gradient: GradientConfig,
    pub zscore_scope: ZScoreScope,
    /// Directory for prediction files; `None` disables writing them.
    pub output_dir: Option<PathBuf>,
    pub export_model: Option<PathBuf>,
    /// Print the per-iteration cost sequence of the gradient estimators.
    pub trace: bool,
}

/// A saved model file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub method: Method,
    pub zscore: bool,
    pub zscore_scope: ZScoreScope,
    /// Column names of the design matrix, `offset` first.
    pub feature_names: Vec<String>,
    pub beta: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<GradientConfig>,
    /// Training-set statistics (present when `zscore` is on).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalization: Option<ZScore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suite_labels_and_file_names() {
        let labels: Vec<String> = RunSpec::SUITE.iter().map(RunSpec::label).collect();
        assert_eq!(labels[0], "Closed Form Without Normalization");
        assert_eq!(labels[4], "Batch Gradient With Normalization");
        assert_eq!(
            RunSpec::SUITE[5].output_file_name(),
            "linear-regression-output_2_1.txt"
        );
    }

    #[test]
    fn gradient_defaults_match_reference_run() {
        let cfg = GradientConfig::default();
        assert_eq!(cfg.max_iterations, 100);
        assert!((cfg.learning_rate - 0.001).abs() < 1e-15);
    }
}
