//! Regression metrics

use super::regressor::FittedModel;
use super::ModelError;
use crate::data::Split;
use serde::{Deserialize, Serialize};

/// Coefficient of determination
///
/// When the targets are constant the score is 1.0 for a perfect fit and 0.0
/// otherwise. Returns NaN for empty or mismatched inputs.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len();
    if n == 0 || n != y_pred.len() {
        return f64::NAN;
    }

    let mean_true: f64 = y_true.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean_true).powi(2)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    if ss_tot != 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Mean absolute error
pub fn mae(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len();
    if n == 0 || n != y_pred.len() {
        return f64::NAN;
    }
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>()
        / n as f64
}

/// Mean squared error
pub fn mse(y_true: &[f64], y_pred: &[f64]) -> f64 {
    let n = y_true.len();
    if n == 0 || n != y_pred.len() {
        return f64::NAN;
    }
    y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / n as f64
}

/// Evaluation of one model on a split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub train_r2: f64,
    pub test_r2: f64,
    pub test_mae: f64,
    pub test_mse: f64,
    /// Predictions on the test partition, aligned with `split.test`
    pub test_predictions: Vec<f64>,
}

/// Score a fitted model on both partitions of a split
pub fn evaluate(model: &FittedModel, split: &Split) -> Result<Metrics, ModelError> {
    if split.train.is_empty() || split.test.is_empty() {
        return Err(ModelError::InvalidData(
            "Both partitions must be non-empty".to_string(),
        ));
    }

    let train_predictions = model.predict(&split.train.features)?;
    let test_predictions = model.predict(&split.test.features)?;

    Ok(Metrics {
        train_r2: r2_score(&split.train.targets, &train_predictions),
        test_r2: r2_score(&split.test.targets, &test_predictions),
        test_mae: mae(&split.test.targets, &test_predictions),
        test_mse: mse(&split.test.targets, &test_predictions),
        test_predictions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_r2_perfect_and_mean() {
        let y = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(r2_score(&y, &y), 1.0);
        assert_relative_eq!(r2_score(&y, &[2.5; 4]), 0.0);
    }

    #[test]
    fn test_r2_can_be_negative() {
        let y = [1.0, 2.0, 3.0];
        let r2 = r2_score(&y, &[3.0, 2.0, 1.0]);
        // ss_res = 8, ss_tot = 2
        assert_relative_eq!(r2, -3.0);
    }

    #[test]
    fn test_r2_constant_target() {
        assert_eq!(r2_score(&[5.0, 5.0], &[5.0, 5.0]), 1.0);
        assert_eq!(r2_score(&[5.0, 5.0], &[5.0, 6.0]), 0.0);
    }

    #[test]
    fn test_mae_mse() {
        let y_true = [1.0, 2.0, 3.0];
        let y_pred = [2.0, 2.0, 1.0];

        assert_relative_eq!(mae(&y_true, &y_pred), 1.0);
        assert_relative_eq!(mse(&y_true, &y_pred), 5.0 / 3.0);
        assert!(mse(&[], &[]).is_nan());
    }
}
