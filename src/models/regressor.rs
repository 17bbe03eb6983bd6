//! Fitted regressors bound to the feature schema they were trained on

use crate::features::FeatureSchema;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::xgboost::{XGRegressor, XGRegressorParameters};
use std::fmt;
use tracing::info;

use super::ModelError;

/// Which regressor family a model belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    GradientBoosting,
    RandomForest,
}

impl ModelKind {
    /// Human-readable name used in titles and reports
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::GradientBoosting => "Gradient Boosting",
            ModelKind::RandomForest => "Random Forest",
        }
    }

    /// File-name friendly identifier
    pub fn slug(&self) -> &'static str {
        match self {
            ModelKind::GradientBoosting => "gradient_boosting",
            ModelKind::RandomForest => "random_forest",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gradient boosting hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientBoostingParams {
    /// Number of boosting iterations (trees)
    pub n_estimators: usize,
    /// Learning rate (shrinkage)
    pub learning_rate: f64,
    /// Maximum depth of each tree
    pub max_depth: u16,
    /// L2 regularization on leaf weights
    pub lambda: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for GradientBoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            lambda: 0.0,
            seed: 42,
        }
    }
}

/// Random forest hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomForestParams {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree (unbounded if None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u16>,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Random seed
    pub seed: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_leaf: 1,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

type Matrix = DenseMatrix<f64>;

#[derive(Debug)]
enum Estimator {
    GradientBoosting(XGRegressor<f64, f64, Matrix, Vec<f64>>),
    RandomForest(RandomForestRegressor<f64, f64, Matrix, Vec<f64>>),
}

/// A trained regressor together with its input layout
///
/// Immutable after training; predicting never changes the model.
#[derive(Debug)]
pub struct FittedModel {
    kind: ModelKind,
    schema: FeatureSchema,
    estimator: Estimator,
}

impl FittedModel {
    /// Fit a gradient boosting regressor
    pub fn fit_gradient_boosting(
        features: &[Vec<f64>],
        targets: &[f64],
        schema: &FeatureSchema,
        params: &GradientBoostingParams,
    ) -> Result<Self, ModelError> {
        let x = training_matrix(features, targets, schema)?;
        let base_score = targets.iter().sum::<f64>() / targets.len() as f64;

        info!(
            "Training gradient boosting regressor with {} samples and {} features",
            features.len(),
            schema.len()
        );
        info!("Parameters: {:?}", params);

        let model = XGRegressor::fit(
            &x,
            &targets.to_vec(),
            XGRegressorParameters::default()
                .with_n_estimators(params.n_estimators)
                .with_learning_rate(params.learning_rate)
                .with_max_depth(params.max_depth)
                .with_lambda(params.lambda)
                .with_base_score(base_score)
                .with_seed(params.seed),
        )
        .map_err(|e| ModelError::TrainingFailed(format!("{:?}", e)))?;

        Ok(Self {
            kind: ModelKind::GradientBoosting,
            schema: schema.clone(),
            estimator: Estimator::GradientBoosting(model),
        })
    }

    /// Fit a random forest regressor
    ///
    /// Every split considers all features, as in a regression forest with
    /// `max_features = 1.0`.
    pub fn fit_random_forest(
        features: &[Vec<f64>],
        targets: &[f64],
        schema: &FeatureSchema,
        params: &RandomForestParams,
    ) -> Result<Self, ModelError> {
        let x = training_matrix(features, targets, schema)?;

        info!(
            "Training random forest regressor with {} samples and {} features",
            features.len(),
            schema.len()
        );
        info!("Parameters: {:?}", params);

        let mut parameters = RandomForestRegressorParameters::default()
            .with_n_trees(params.n_trees)
            .with_m(schema.len())
            .with_min_samples_leaf(params.min_samples_leaf)
            .with_min_samples_split(params.min_samples_split)
            .with_seed(params.seed);
        if let Some(depth) = params.max_depth {
            parameters = parameters.with_max_depth(depth);
        }

        let model = RandomForestRegressor::fit(&x, &targets.to_vec(), parameters)
            .map_err(|e| ModelError::TrainingFailed(format!("{:?}", e)))?;

        Ok(Self {
            kind: ModelKind::RandomForest,
            schema: schema.clone(),
            estimator: Estimator::RandomForest(model),
        })
    }

    /// Regressor family
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Input layout the model was trained on
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Predict one value per feature vector
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        if features.is_empty() {
            return Ok(Vec::new());
        }
        check_features(features, &self.schema)?;

        let x = DenseMatrix::from_2d_vec(&features.to_vec()).map_err(|e| {
            ModelError::PredictionFailed(format!("Failed to create feature matrix: {:?}", e))
        })?;

        let predictions = match &self.estimator {
            Estimator::GradientBoosting(model) => model.predict(&x),
            Estimator::RandomForest(model) => model.predict(&x),
        }
        .map_err(|e| ModelError::PredictionFailed(format!("{:?}", e)))?;

        Ok(predictions)
    }
}

fn check_features(features: &[Vec<f64>], schema: &FeatureSchema) -> Result<(), ModelError> {
    for row in features {
        if row.len() != schema.len() {
            return Err(ModelError::SchemaMismatch {
                expected: schema.len(),
                got: row.len(),
            });
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidData(
                "Feature vector contains non-finite values".to_string(),
            ));
        }
    }
    Ok(())
}

fn training_matrix(
    features: &[Vec<f64>],
    targets: &[f64],
    schema: &FeatureSchema,
) -> Result<Matrix, ModelError> {
    if features.is_empty() {
        return Err(ModelError::InvalidData("Empty dataset".to_string()));
    }
    if features.len() != targets.len() {
        return Err(ModelError::InvalidData(format!(
            "{} feature rows but {} targets",
            features.len(),
            targets.len()
        )));
    }
    if targets.iter().any(|t| !t.is_finite()) {
        return Err(ModelError::InvalidData(
            "Targets contain non-finite values".to_string(),
        ));
    }
    check_features(features, schema)?;

    DenseMatrix::from_2d_vec(&features.to_vec()).map_err(|e| {
        ModelError::InvalidData(format!("Failed to create feature matrix: {:?}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Column;

    fn toy_data() -> (Vec<Vec<f64>>, Vec<f64>, FeatureSchema) {
        let schema = FeatureSchema::new(vec![Column::Close, Column::Volume]).unwrap();
        let features: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![100.0 + i as f64, (i % 3) as f64])
            .collect();
        let targets: Vec<f64> = features.iter().map(|r| r[0] * 1.01).collect();
        (features, targets, schema)
    }

    #[test]
    fn test_gradient_boosting_fits_monotone_target() {
        let (features, targets, schema) = toy_data();
        let model = FittedModel::fit_gradient_boosting(
            &features,
            &targets,
            &schema,
            &GradientBoostingParams::default(),
        )
        .unwrap();

        assert_eq!(model.kind(), ModelKind::GradientBoosting);
        let predictions = model.predict(&features).unwrap();
        assert_eq!(predictions.len(), 20);
        assert!(predictions[19] > predictions[0]);
        assert!(predictions.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_random_forest_predictions_in_target_range() {
        let (features, targets, schema) = toy_data();
        let model = FittedModel::fit_random_forest(
            &features,
            &targets,
            &schema,
            &RandomForestParams::default(),
        )
        .unwrap();

        let lo = targets.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = targets.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for p in model.predict(&features).unwrap() {
            assert!(p >= lo - 1e-9 && p <= hi + 1e-9);
        }
    }

    #[test]
    fn test_rejects_wrong_width() {
        let (features, targets, schema) = toy_data();
        let model = FittedModel::fit_random_forest(
            &features,
            &targets,
            &schema,
            &RandomForestParams {
                n_trees: 5,
                ..Default::default()
            },
        )
        .unwrap();

        let err = model.predict(&[vec![1.0, 2.0, 3.0]]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::SchemaMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn test_rejects_empty_and_nan_training_data() {
        let (_, _, schema) = toy_data();
        let params = GradientBoostingParams::default();

        assert!(matches!(
            FittedModel::fit_gradient_boosting(&[], &[], &schema, &params),
            Err(ModelError::InvalidData(_))
        ));
        assert!(matches!(
            FittedModel::fit_gradient_boosting(&[vec![f64::NAN, 1.0]], &[1.0], &schema, &params),
            Err(ModelError::InvalidData(_))
        ));
    }
}
