//! End-to-end run: fetch, features, split, train, evaluate, forecast, plot

use crate::config::PipelineConfig;
use crate::data::{
    DataError, Dataset, DatasetError, DateRange, InvalidDateRange, RawSeries, YahooClient,
    GOLD_FUTURES,
};
use crate::features::{FeatureBuilder, FeatureError, FeatureFrame, FeatureSchema};
use crate::forecast::predict_next;
use crate::models::{evaluate, train_models, FittedModel, Metrics, ModelError, ModelKind};
use crate::visualize::{actual_vs_predicted, correlation_heatmap, price_over_time, VisualizeError};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

/// Any failure of a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidDateRange(#[from] InvalidDateRange),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Features(#[from] FeatureError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Visualize(#[from] VisualizeError),
}

/// Results for one model
#[derive(Debug, Clone)]
pub struct ModelReport {
    pub kind: ModelKind,
    pub metrics: Metrics,
    /// Prediction for the most recent feature row
    pub forecast: f64,
    /// Actual vs. predicted scatter plot (PNG)
    pub scatter: Vec<u8>,
}

/// Everything a successful run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub frame: FeatureFrame,
    /// Test partition targets, aligned with each model's test predictions
    pub test_targets: Vec<f64>,
    pub test_dates: Vec<NaiveDate>,
    pub gradient_boosting: ModelReport,
    pub random_forest: ModelReport,
    /// Correlation heatmap (PNG)
    pub heatmap: Vec<u8>,
    /// Adjusted close over time (PNG)
    pub price_plot: Vec<u8>,
}

impl PipelineOutput {
    /// Model results in report order
    pub fn models(&self) -> [&ModelReport; 2] {
        [&self.gradient_boosting, &self.random_forest]
    }
}

fn model_report(
    model: &FittedModel,
    split: &crate::data::Split,
    frame: &FeatureFrame,
) -> Result<ModelReport, PipelineError> {
    let metrics = evaluate(model, split)?;
    let forecast = predict_next(model, frame)?;
    let scatter = actual_vs_predicted(&split.test.targets, &metrics.test_predictions, model.kind())?;

    info!(
        "{}: train R2 {:.4}, test R2 {:.4}, test MAE {:.4}",
        model.kind(),
        metrics.train_r2,
        metrics.test_r2,
        metrics.test_mae
    );

    Ok(ModelReport {
        kind: model.kind(),
        metrics,
        forecast,
        scatter,
    })
}

/// Run every stage after the fetch on an already loaded series
pub fn analyze(series: &RawSeries, config: &PipelineConfig) -> Result<PipelineOutput, PipelineError> {
    let frame = FeatureBuilder::with_config(config.features.clone()).build(series)?;

    let dataset = Dataset::from_frame(&frame, &FeatureSchema::default());
    let split = dataset.random_split(config.split.test_ratio, config.split.seed)?;
    info!(
        "Split {} rows into {} train and {} test",
        dataset.len(),
        split.train.len(),
        split.test.len()
    );

    let models = train_models(&split.train, &config.models)?;

    let gradient_boosting = model_report(&models.gradient_boosting, &split, &frame)?;
    let random_forest = model_report(&models.random_forest, &split, &frame)?;

    let heatmap = correlation_heatmap(&frame)?;
    let price_plot = price_over_time(&frame)?;

    Ok(PipelineOutput {
        test_targets: split.test.targets.clone(),
        test_dates: split.test.dates.clone(),
        frame,
        gradient_boosting,
        random_forest,
        heatmap,
        price_plot,
    })
}

/// Fetch gold futures for `range` and analyze them
pub async fn run(
    client: &YahooClient,
    range: DateRange,
    config: &PipelineConfig,
) -> Result<PipelineOutput, PipelineError> {
    let series = client.fetch_daily(GOLD_FUTURES, &range).await?;

    analyze(&series, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DailyBar;

    fn series(n: i64) -> RawSeries {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let c = 1950.0 + (i as f64 * 0.25).sin() * 30.0 + i as f64 * 0.8;
                DailyBar::new(start + chrono::Duration::days(i), c - 2.0, c + 5.0, c - 5.0, c, c, 120_000.0 + i as f64)
            })
            .collect();
        RawSeries::new("GC=F", bars)
    }

    #[test]
    fn test_analyze_produces_everything() {
        let output = analyze(&series(90), &PipelineConfig::default()).unwrap();

        assert_eq!(output.frame.len(), 61);
        // ceil(0.2 * 61) = 13
        assert_eq!(output.test_targets.len(), 13);
        for model in output.models() {
            assert_eq!(model.metrics.test_predictions.len(), 13);
            assert!(model.metrics.test_r2 <= 1.0);
            assert!(model.metrics.test_mse >= 0.0);
            assert!(model.forecast.is_finite());
            assert!(!model.scatter.is_empty());
        }
        assert!(!output.heatmap.is_empty());
        assert!(!output.price_plot.is_empty());
    }

    #[test]
    fn test_short_series_fails_before_training() {
        let err = analyze(&series(20), &PipelineConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Features(FeatureError::InsufficientHistory { rows: 20, required: 30 })
        ));
    }

    #[test]
    fn test_single_feature_row_cannot_be_split() {
        let err = analyze(&series(30), &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Dataset(DatasetError::TooSmall { .. })));
    }

    #[test]
    fn test_invalid_range_message() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let err: PipelineError = DateRange::new(start, end).unwrap_err().into();
        assert_eq!(err.to_string(), "End date must be after start date.");
    }
}
