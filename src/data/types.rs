//! Data types for daily market data
//!
//! This module defines the raw series fetched from the provider and the
//! validated date window a request is made for.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when the requested window is empty or reversed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("End date must be after start date.")]
pub struct InvalidDateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Half-open date window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a date range, rejecting `start >= end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidDateRange> {
        if start >= end {
            return Err(InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First date included in the window
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First date excluded from the window
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Check whether a date falls inside the window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// Daily OHLCV record with adjusted close
///
/// Every price field is optional because the provider reports `null` for
/// days it has no print for; gaps are filled during feature engineering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: Option<f64>,
    /// Highest price
    pub high: Option<f64>,
    /// Lowest price
    pub low: Option<f64>,
    /// Closing price
    pub close: Option<f64>,
    /// Close adjusted for corporate actions
    pub adj_close: Option<f64>,
    /// Trading volume
    pub volume: Option<f64>,
}

impl DailyBar {
    /// Create a fully populated bar
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adj_close: f64,
        volume: f64,
    ) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            adj_close: Some(adj_close),
            volume: Some(volume),
        }
    }

    /// Whether every field carries a value
    pub fn is_complete(&self) -> bool {
        self.open.is_some()
            && self.high.is_some()
            && self.low.is_some()
            && self.close.is_some()
            && self.adj_close.is_some()
            && self.volume.is_some()
    }
}

/// Ordered daily series for one instrument
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSeries {
    /// Instrument ticker (e.g., "GC=F")
    pub ticker: String,
    /// Bars in ascending date order, one per date
    pub bars: Vec<DailyBar>,
}

impl RawSeries {
    /// Build a series, sorting bars by date and keeping the last bar per date
    pub fn new(ticker: impl Into<String>, mut bars: Vec<DailyBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        // keep the later duplicate, the provider appends intraday updates last
        bars.reverse();
        bars.dedup_by_key(|b| b.date);
        bars.reverse();

        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    /// Number of bars
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series has no bars
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Date of the first bar
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    /// Date of the last bar
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}
