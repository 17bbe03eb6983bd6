//! Feature engineering for the price regression models
//!
//! Turns a raw daily series into a frame of fully populated rows with
//! moving averages, day-over-day change and rolling volatility.

use super::rolling::{forward_fill, pct_change, rolling_std, sma};
use super::schema::{Column, FeatureSchema};
use crate::data::RawSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while deriving features
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("Insufficient history: {rows} usable rows, at least {required} required")]
    InsufficientHistory { rows: usize, required: usize },
}

/// Window lengths for the derived columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Short moving average window (MA7)
    pub short_ma: usize,
    /// Long moving average window (MA30)
    pub long_ma: usize,
    /// Rolling volatility window over price changes
    pub volatility_window: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            short_ma: 7,
            long_ma: 30,
            volatility_window: 30,
        }
    }
}

impl FeatureConfig {
    /// Minimum number of rows needed before the first complete feature row
    pub fn required_history(&self) -> usize {
        self.short_ma.max(self.long_ma).max(self.volatility_window).max(2)
    }
}

/// One fully populated row of the feature frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: f64,
    pub ma7: f64,
    pub ma30: f64,
    pub price_change: f64,
    pub price_volatility: f64,
}

impl FeatureRow {
    /// Value of a numeric column
    pub fn get(&self, column: Column) -> f64 {
        match column {
            Column::Open => self.open,
            Column::High => self.high,
            Column::Low => self.low,
            Column::Close => self.close,
            Column::AdjClose => self.adj_close,
            Column::Volume => self.volume,
            Column::Ma7 => self.ma7,
            Column::Ma30 => self.ma30,
            Column::PriceChange => self.price_change,
            Column::PriceVolatility => self.price_volatility,
        }
    }

    /// Feature vector laid out according to `schema`
    pub fn feature_vector(&self, schema: &FeatureSchema) -> Vec<f64> {
        schema.columns().iter().map(|c| self.get(*c)).collect()
    }

    /// Prediction target
    pub fn target(&self) -> f64 {
        self.get(Column::TARGET)
    }
}

/// Raw series augmented with derived columns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureFrame {
    /// Rows in ascending date order
    pub rows: Vec<FeatureRow>,
}

impl FeatureFrame {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.rows.iter().map(|r| r.get(column)).collect()
    }

    /// Row dates
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Most recent row
    pub fn last(&self) -> Option<&FeatureRow> {
        self.rows.last()
    }

    /// Last `n` rows (fewer if the frame is shorter)
    pub fn tail(&self, n: usize) -> &[FeatureRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }
}

/// Builds feature frames from raw daily series
pub struct FeatureBuilder {
    config: FeatureConfig,
}

impl FeatureBuilder {
    /// Create a builder with the MA7 / MA30 / 30-row volatility windows
    pub fn new() -> Self {
        Self {
            config: FeatureConfig::default(),
        }
    }

    /// Create a builder with custom windows
    pub fn with_config(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Derive the feature frame
    ///
    /// Base columns are forward-filled first, then every row with an
    /// undefined or non-finite value in any column is dropped. An empty
    /// result is reported as [`FeatureError::InsufficientHistory`].
    pub fn build(&self, series: &RawSeries) -> Result<FeatureFrame, FeatureError> {
        let bars = &series.bars;

        let column = |f: fn(&crate::data::DailyBar) -> Option<f64>| -> Vec<f64> {
            forward_fill(&bars.iter().map(f).collect::<Vec<_>>())
        };

        let open = column(|b| b.open);
        let high = column(|b| b.high);
        let low = column(|b| b.low);
        let close = column(|b| b.close);
        let adj_close = column(|b| b.adj_close);
        let volume = column(|b| b.volume);

        let ma_short = sma(&close, self.config.short_ma);
        let ma_long = sma(&close, self.config.long_ma);
        let change = pct_change(&close);
        let volatility = rolling_std(&change, self.config.volatility_window);

        let rows: Vec<FeatureRow> = (0..bars.len())
            .map(|i| FeatureRow {
                date: bars[i].date,
                open: open[i],
                high: high[i],
                low: low[i],
                close: close[i],
                adj_close: adj_close[i],
                volume: volume[i],
                ma7: ma_short[i],
                ma30: ma_long[i],
                price_change: change[i],
                price_volatility: volatility[i],
            })
            .filter(|row| Column::ALL.iter().all(|c| row.get(*c).is_finite()))
            .collect();

        debug!(
            "Dropped {} of {} rows without full history",
            bars.len() - rows.len(),
            bars.len()
        );

        if rows.is_empty() {
            return Err(FeatureError::InsufficientHistory {
                rows: bars.len(),
                required: self.config.required_history(),
            });
        }

        info!("Built feature frame with {} rows", rows.len());

        Ok(FeatureFrame { rows })
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new()
    }
}
