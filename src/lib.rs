//! Gold Price Prediction with Gradient Boosting and Random Forests
//!
//! This library fetches daily gold futures prices from Yahoo Finance,
//! derives moving-average and volatility features, trains two tree-ensemble
//! regressors on a seeded shuffle split and forecasts the adjusted close.
//!
//! # Modules
//!
//! - [`data`] - Yahoo Finance client, daily series and dataset splitting
//! - [`features`] - Rolling-window features and the model input schema
//! - [`models`] - Gradient boosting and random forest regressors, metrics
//! - [`forecast`] - Prediction from the most recent feature row
//! - [`visualize`] - Correlation heatmap, scatter and price plots as PNG
//! - [`report`] - Text tables and artifact export
//! - [`pipeline`] - The end-to-end run
//!
//! # Example
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use gold_price_ml::{pipeline, DateRange, PipelineConfig, YahooClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let range = DateRange::new(
//!         NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     )?;
//!
//!     let client = YahooClient::new()?;
//!     let output = pipeline::run(&client, range, &PipelineConfig::default()).await?;
//!
//!     for model in output.models() {
//!         println!("{}: test R2 {:.4}", model.kind, model.metrics.test_r2);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data;
pub mod features;
pub mod forecast;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod visualize;

// Re-export commonly used items at the crate level
pub use config::PipelineConfig;
pub use data::{DailyBar, Dataset, DateRange, RawSeries, YahooClient};
pub use features::{Column, FeatureBuilder, FeatureFrame, FeatureSchema};
pub use models::{FittedModel, Metrics, ModelKind};
pub use pipeline::{analyze, PipelineError, PipelineOutput};
