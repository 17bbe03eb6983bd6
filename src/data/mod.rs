//! Data module for fetching and structuring market data
//!
//! This module provides:
//! - The Yahoo Finance chart API client
//! - Daily bar and series types
//! - Dataset layout and train/test splitting

pub mod dataset;
pub mod types;
pub mod yahoo;

pub use dataset::{Dataset, DatasetError, Split};
pub use types::{DailyBar, DateRange, InvalidDateRange, RawSeries};
pub use yahoo::{parse_chart_response, DataError, YahooClient, GOLD_FUTURES};
