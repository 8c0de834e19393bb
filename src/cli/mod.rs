//! Command-line parsing for the linear regression tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the estimation code.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{DEFAULT_LEARNING_RATE, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED, InitKind, Method, ZScoreScope};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "lr",
    version,
    about = "Linear regression by closed form, batch and stochastic gradient descent"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run all six configurations (3 estimators × normalization off/on) and write
    /// one prediction file per configuration.
    Run(RunArgs),
    /// Fit a single configuration.
    Fit(FitArgs),
    /// Apply a previously exported model JSON to a CSV.
    Predict(PredictArgs),
    /// Write synthetic train/test CSVs from a known linear generator.
    Generate(GenerateArgs),
}

/// Data and hyperparameter options shared by `run` and `fit`.
#[derive(Debug, Args, Clone)]
pub struct CommonArgs {
    /// Training CSV (must contain a `y` column).
    #[arg(long, env = "LR_TRAIN", default_value = "linear-regression-train.csv")]
    pub train: PathBuf,

    /// Test CSV (must contain a `y` column and the same features as the training CSV).
    #[arg(long, env = "LR_TEST", default_value = "linear-regression-test.csv")]
    pub test: PathBuf,

    /// Learning rate of the gradient estimators.
    #[arg(long, env = "LR_ALPHA", default_value_t = DEFAULT_LEARNING_RATE)]
    pub alpha: f64,

    /// Iterations (batch) / epochs (stochastic).
    #[arg(long, env = "LR_ITERATIONS", default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub iterations: usize,

    /// Initial β of the gradient estimators.
    #[arg(long, value_enum, default_value_t = InitKind::Uniform)]
    pub init: InitKind,

    /// Seed for the uniform initial β.
    #[arg(long, env = "LR_SEED", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Which statistics normalize the test set when z-scoring.
    #[arg(long, value_enum, default_value_t = ZScoreScope::PerSplit)]
    pub zscore_scope: ZScoreScope,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory for prediction files.
    #[arg(long, env = "LR_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Do not write prediction files.
    #[arg(long)]
    pub no_output: bool,

    /// Print a comparison table after the six sections.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Estimator.
    #[arg(short, long, value_enum, default_value_t = Method::Closed)]
    pub method: Method,

    /// Z-score normalize features before fitting.
    #[arg(short, long)]
    pub zscore: bool,

    /// Directory for the prediction file (not written when omitted).
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Export the fitted model (columns, β, normalization) to JSON.
    #[arg(long = "export-model")]
    pub export_model: Option<PathBuf>,

    /// Print the per-iteration cost of the gradient estimators.
    #[arg(long)]
    pub trace: bool,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Model JSON produced by `lr fit --export-model`.
    #[arg(long, value_name = "JSON")]
    pub model: PathBuf,

    /// CSV with the model's feature columns (a `y` column enables MSE).
    #[arg(long)]
    pub input: PathBuf,

    /// Prediction file to write.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Training CSV to write.
    #[arg(long, default_value = "linear-regression-train.csv")]
    pub train: PathBuf,

    /// Test CSV to write.
    #[arg(long, default_value = "linear-regression-test.csv")]
    pub test: PathBuf,

    /// Training rows.
    #[arg(long, default_value_t = 200)]
    pub train_rows: usize,

    /// Test rows.
    #[arg(long, default_value_t = 50)]
    pub test_rows: usize,

    /// Number of features (the intercept is extra).
    #[arg(long, default_value_t = 3)]
    pub features: usize,

    /// Standard deviation of the additive Gaussian noise.
    #[arg(long, default_value_t = 1.0)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}
