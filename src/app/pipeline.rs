//! Shared estimation pipeline used by the `run`, `fit` and `predict` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV load -> (z-score) -> add intercept -> estimate β -> predict test -> MSE
//!
//! The commands can then focus on presentation (what to print, what to write).

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::domain::{ModelFile, RunConfig, RunSpec, ZScoreScope};
use crate::error::{AppError, EstimationError};
use crate::fit::estimator_for;
use crate::io::{IngestedData, Table, load_table};
use crate::math::{ZScore, add_intercept, normalize};
use crate::models::LinearModel;
use crate::report::mse;

/// Name given to the intercept column of every design matrix.
pub const INTERCEPT_NAME: &str = "offset";

/// Train and test tables as loaded from disk.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub train: IngestedData,
    pub test: IngestedData,
}

/// Design matrices ready for an estimator.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub x_train: DMatrix<f64>,
    pub x_test: DMatrix<f64>,
    /// Design column names, `offset` first.
    pub columns: Vec<String>,
    /// Training-set statistics when normalization is on.
    pub normalization: Option<ZScore>,
}

/// All computed outputs of a single configuration.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub spec: RunSpec,
    pub model: LinearModel,
    pub costs: Vec<f64>,
    pub predictions: DVector<f64>,
    pub mse: f64,
    pub columns: Vec<String>,
    pub normalization: Option<ZScore>,
}

impl RunOutput {
    /// Portable form of this run for `--export-model`.
    pub fn to_model_file(&self, config: &RunConfig) -> ModelFile {
        ModelFile {
            tool: "lr".to_string(),
            method: self.spec.method,
            zscore: self.spec.zscore,
            zscore_scope: config.zscore_scope,
            feature_names: self.columns.clone(),
            beta: self.model.beta().iter().copied().collect(),
            gradient: self.spec.method.is_iterative().then_some(config.gradient),
            normalization: self.normalization.clone(),
        }
    }
}

/// Load the train and test CSVs named by `config` and check they agree.
pub fn load_dataset(config: &RunConfig) -> Result<Dataset, AppError> {
    let train = load_table(&config.train_path, true)?;
    let test = load_table(&config.test_path, true)?;
    ensure_same_features(&train.table, &test.table)?;
    Ok(Dataset { train, test })
}

/// Train and test must have the same feature columns, in the same order.
pub fn ensure_same_features(train: &Table, test: &Table) -> Result<(), AppError> {
    if train.feature_names.len() != test.feature_names.len() {
        return Err(EstimationError::ShapeMismatch {
            what: "test feature columns vs train feature columns",
            expected: train.feature_names.len(),
            found: test.feature_names.len(),
        }
        .into());
    }
    if train.feature_names != test.feature_names {
        return Err(AppError::new(
            2,
            format!(
                "Train/test feature columns differ: [{}] vs [{}]",
                train.feature_names.join(", "),
                test.feature_names.join(", ")
            ),
        ));
    }
    Ok(())
}

/// Build the design matrices: optional z-score, then the intercept column.
pub fn prepare(train: &Table, test: &Table, zscore: bool, scope: ZScoreScope) -> Result<Prepared, AppError> {
    ensure_same_features(train, test)?;

    let (x_train, x_test, normalization) = if zscore {
        let stats = ZScore::fit(&train.features)?;
        let x_train = stats.transform(&train.features)?;
        let x_test = match scope {
            ZScoreScope::PerSplit => normalize(&test.features)?,
            ZScoreScope::Train => stats.transform(&test.features)?,
        };
        (x_train, x_test, Some(stats))
    } else {
        (train.features.clone(), test.features.clone(), None)
    };

    let mut columns = Vec::with_capacity(train.feature_names.len() + 1);
    columns.push(INTERCEPT_NAME.to_string());
    columns.extend(train.feature_names.iter().cloned());

    Ok(Prepared {
        x_train: add_intercept(&x_train),
        x_test: add_intercept(&x_test),
        columns,
        normalization,
    })
}

/// Run one configuration end to end (no IO).
pub fn run_spec(train: &Table, test: &Table, spec: RunSpec, config: &RunConfig) -> Result<RunOutput, AppError> {
    log::info!("running {}", spec.label());

    let y_train = train.require_response("train")?;
    let y_test = test.require_response("test")?;
    let prepared = prepare(train, test, spec.zscore, config.zscore_scope)?;

    let estimator = estimator_for(spec.method, config.gradient);
    let estimate = estimator.estimate(&prepared.x_train, y_train)?;
    let model = LinearModel::new(estimate.beta);

    let predictions = model.predict(&prepared.x_test)?;
    let error = mse(&predictions, y_test)?;
    log::info!("{}: mse={error:.6e}", spec.label());

    Ok(RunOutput {
        spec,
        model,
        costs: estimate.costs,
        predictions,
        mse: error,
        columns: prepared.columns,
        normalization: prepared.normalization,
    })
}

/// Run the six fixed configurations.
///
/// Configurations are independent, so they run in parallel; results come back in
/// `RunSpec::SUITE` order. A failing configuration does not stop the others.
pub fn run_suite(train: &Table, test: &Table, config: &RunConfig) -> Vec<(RunSpec, Result<RunOutput, AppError>)> {
    RunSpec::SUITE
        .par_iter()
        .map(|&spec| (spec, run_spec(train, test, spec, config)))
        .collect()
}

/// Apply a saved model to a feature table.
pub fn predict_with_model(model: &ModelFile, table: &Table) -> Result<DVector<f64>, AppError> {
    let linear = LinearModel::new(DVector::from_column_slice(&model.beta));
    if linear.n_features() != model.feature_names.len() {
        return Err(AppError::new(
            2,
            format!(
                "Model has {} coefficients for {} columns.",
                linear.n_features(),
                model.feature_names.len()
            ),
        ));
    }

    let expected = model.feature_names.get(1..).unwrap_or_default();
    if expected.len() != table.feature_names.len() {
        return Err(EstimationError::ShapeMismatch {
            what: "input feature columns vs model feature columns",
            expected: expected.len(),
            found: table.feature_names.len(),
        }
        .into());
    }
    if expected != table.feature_names.as_slice() {
        return Err(AppError::new(
            2,
            format!(
                "Input columns [{}] do not match model columns [{}]",
                table.feature_names.join(", "),
                expected.join(", ")
            ),
        ));
    }

    let x = if model.zscore {
        match model.zscore_scope {
            ZScoreScope::PerSplit => normalize(&table.features)?,
            ZScoreScope::Train => {
                let stats = model
                    .normalization
                    .as_ref()
                    .ok_or_else(|| AppError::new(2, "Model JSON has no normalization statistics."))?;
                stats.transform(&table.features)?
            }
        }
    } else {
        table.features.clone()
    };

    Ok(linear.predict(&add_intercept(&x))?)
}
