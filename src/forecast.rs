//! Next-day price forecast from the most recent feature row

use crate::features::FeatureFrame;
use crate::models::{FittedModel, ModelError};
use tracing::info;

/// Predict the adjusted close from the latest row of `frame`
///
/// The latest row is an observed day, and with a shuffled split it may be
/// part of the training partition.
pub fn predict_next(model: &FittedModel, frame: &FeatureFrame) -> Result<f64, ModelError> {
    let last = frame
        .last()
        .ok_or_else(|| ModelError::InvalidData("Feature frame is empty".to_string()))?;

    let features = vec![last.feature_vector(model.schema())];
    let prediction = model
        .predict(&features)?
        .first()
        .copied()
        .ok_or_else(|| ModelError::PredictionFailed("Model returned no prediction".to_string()))?;

    if !prediction.is_finite() {
        return Err(ModelError::NonFinite(prediction));
    }

    info!(
        "{} forecast from {}: {:.2}",
        model.kind(),
        last.date,
        prediction
    );

    Ok(prediction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DailyBar, Dataset, RawSeries};
    use crate::features::{FeatureBuilder, FeatureSchema};
    use crate::models::{train_models, ModelConfig};
    use chrono::NaiveDate;

    fn frame() -> FeatureFrame {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let bars = (0..60)
            .map(|i| {
                let c = 2000.0 + (i as f64 * 0.4).cos() * 15.0 + i as f64 * 0.5;
                DailyBar::new(start + chrono::Duration::days(i), c - 1.0, c + 4.0, c - 4.0, c, c, 150.0)
            })
            .collect();
        FeatureBuilder::new().build(&RawSeries::new("GC=F", bars)).unwrap()
    }

    #[test]
    fn test_forecast_is_finite() {
        let frame = frame();
        let dataset = Dataset::from_frame(&frame, &FeatureSchema::default());
        let models = train_models(&dataset, &ModelConfig::default()).unwrap();

        for model in models.iter() {
            assert!(predict_next(model, &frame).unwrap().is_finite());
        }
    }

    #[test]
    fn test_forecast_scores_a_training_row() {
        // Trained on every row, the forecast is just the in-sample fit of the
        // last observed day.
        let frame = frame();
        let dataset = Dataset::from_frame(&frame, &FeatureSchema::default());
        let models = train_models(&dataset, &ModelConfig::default()).unwrap();

        let model = &models.random_forest;
        let in_sample = model.predict(&dataset.features).unwrap();
        let forecast = predict_next(model, &frame).unwrap();

        assert_eq!(forecast, *in_sample.last().unwrap());
    }

    #[test]
    fn test_empty_frame() {
        let frame = frame();
        let dataset = Dataset::from_frame(&frame, &FeatureSchema::default());
        let models = train_models(&dataset, &ModelConfig::default()).unwrap();

        let err = predict_next(&models.gradient_boosting, &FeatureFrame::default()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidData(_)));
    }
}
