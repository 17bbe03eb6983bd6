//! Training of both regressors on the same split

use super::regressor::{FittedModel, GradientBoostingParams, RandomForestParams};
use super::ModelError;
use crate::data::Dataset;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Hyperparameters for both models
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub gradient_boosting: GradientBoostingParams,
    pub random_forest: RandomForestParams,
}

/// Both fitted models
#[derive(Debug)]
pub struct TrainedModels {
    pub gradient_boosting: FittedModel,
    pub random_forest: FittedModel,
}

impl TrainedModels {
    /// Iterate over the models in report order
    pub fn iter(&self) -> impl Iterator<Item = &FittedModel> {
        [&self.gradient_boosting, &self.random_forest].into_iter()
    }
}

/// Fit a gradient boosting and a random forest regressor on `train`
///
/// Deterministic for identical input and seeds.
pub fn train_models(train: &Dataset, config: &ModelConfig) -> Result<TrainedModels, ModelError> {
    if train.is_empty() {
        return Err(ModelError::InvalidData("Empty training set".to_string()));
    }

    let gradient_boosting = FittedModel::fit_gradient_boosting(
        &train.features,
        &train.targets,
        &train.schema,
        &config.gradient_boosting,
    )?;

    let random_forest = FittedModel::fit_random_forest(
        &train.features,
        &train.targets,
        &train.schema,
        &config.random_forest,
    )?;

    info!("Trained both models on {} samples", train.len());

    Ok(TrainedModels {
        gradient_boosting,
        random_forest,
    })
}
