//! Read/write model JSON files.
//!
//! A model file is the portable form of a fitted run:
//! - estimator + hyperparameters
//! - design column names (`offset` first) and β
//! - training normalization statistics, when z-scoring was on
//!
//! The schema is defined by `domain::ModelFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::ModelFile;
use crate::error::AppError;

/// Write a model JSON file.
pub fn write_model_json(path: &Path, model: &ModelFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create model JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, model)
        .map_err(|e| AppError::new(2, format!("Failed to write model JSON: {e}")))?;
    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open model JSON '{}': {e}", path.display())))?;
    let model: ModelFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid model JSON: {e}")))?;

    if model.beta.len() != model.feature_names.len() {
        return Err(AppError::new(
            2,
            format!(
                "Invalid model JSON: {} coefficients for {} columns.",
                model.beta.len(),
                model.feature_names.len()
            ),
        ));
    }
    if let Some(stats) = &model.normalization {
        let features = model.feature_names.len().saturating_sub(1);
        if stats.mean.len() != features {
            return Err(AppError::new(
                2,
                format!(
                    "Invalid model JSON: normalization has {} means for {features} feature columns.",
                    stats.mean.len()
                ),
            ));
        }
        stats
            .validate()
            .map_err(|e| AppError::new(2, format!("Invalid model JSON normalization: {e}")))?;
    }
    Ok(model)
}
