//! Machine learning models module
//!
//! This module provides:
//! - Gradient boosting and random forest regressors bound to a feature schema
//! - Training of both models on one split
//! - Regression metrics and evaluation

pub mod metrics;
pub mod regressor;
pub mod trainer;

use thiserror::Error;

pub use metrics::{evaluate, mae, mse, r2_score, Metrics};
pub use regressor::{FittedModel, GradientBoostingParams, ModelKind, RandomForestParams};
pub use trainer::{train_models, ModelConfig, TrainedModels};

/// Errors that can occur with the models
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Feature vector has {got} values, model expects {expected}")]
    SchemaMismatch { expected: usize, got: usize },

    #[error("Training failed: {0}")]
    TrainingFailed(String),

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Model produced a non-finite value: {0}")]
    NonFinite(f64),
}
