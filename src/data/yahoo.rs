//! Yahoo Finance chart API client
//!
//! Fetches daily OHLCV data with adjusted close for a single instrument.
//! One request is made per date window; there is no pagination and no retry.

use super::types::{DailyBar, DateRange, RawSeries};
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Yahoo Finance API base URLs
pub mod endpoints {
    /// Chart endpoint host
    pub const QUERY1: &str = "https://query1.finance.yahoo.com";
}

/// Gold futures continuous contract
pub const GOLD_FUTURES: &str = "GC=F";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Errors that can occur when fetching market data
#[derive(Error, Debug)]
pub enum DataError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("API returned error: {code} - {description}")]
    ApiError { code: String, description: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("No data returned for {ticker} between {start} and {end}")]
    NoData {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// Top-level chart response
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    symbol: String,
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance client
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    /// Create a client for the primary endpoint with a 30 second timeout
    pub fn new() -> Result<Self, DataError> {
        Self::with_base_url(endpoints::QUERY1, Duration::from_secs(30))
    }

    /// Create a client with a custom base URL and request timeout
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, DataError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the chart URL for a ticker and date window
    pub fn chart_url(&self, ticker: &str, range: &DateRange) -> String {
        let period1 = range.start().and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = range.end().and_time(NaiveTime::MIN).and_utc().timestamp();

        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history&includeAdjustedClose=true",
            self.base_url,
            ticker.replace('=', "%3D"),
            period1,
            period2
        )
    }

    /// Fetch daily bars for `ticker` over `[range.start, range.end)`
    pub async fn fetch_daily(&self, ticker: &str, range: &DateRange) -> Result<RawSeries, DataError> {
        let url = self.chart_url(ticker, range);

        info!("Fetching {} daily bars from {} to {}", ticker, range.start(), range.end());
        debug!("Fetching chart: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Yahoo reports unknown symbols as 404 with a JSON error body
        if !status.is_success() {
            if let Ok(parsed) = serde_json::from_str::<ChartResponse>(&body) {
                if let Some(err) = parsed.chart.error {
                    return Err(DataError::ApiError {
                        code: err.code,
                        description: err.description,
                    });
                }
            }
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let series = parse_chart_response(&body, range)?;

        if series.is_empty() {
            return Err(DataError::NoData {
                ticker: ticker.to_string(),
                start: range.start(),
                end: range.end(),
            });
        }

        info!("Fetched {} bars for {}", series.len(), series.ticker);

        Ok(series)
    }
}

/// Parse a chart API body into a raw series restricted to `range`
pub fn parse_chart_response(body: &str, range: &DateRange) -> Result<RawSeries, DataError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| DataError::ParseError(e.to_string()))?;

    if let Some(err) = response.chart.error {
        return Err(DataError::ApiError {
            code: err.code,
            description: err.description,
        });
    }

    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| DataError::ParseError("No result in response".to_string()))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose);

    if adjclose.is_none() {
        warn!("Response has no adjusted close, falling back to close");
    }

    let value_at = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let Some(local) = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0) else {
            warn!("Skipping bar with invalid timestamp {}", ts);
            continue;
        };
        let date = local.date_naive();
        if !range.contains(date) {
            continue;
        }

        let close = value_at(&quote.close, i);
        let adj_close = match &adjclose {
            Some(column) => value_at(column, i),
            None => close,
        };

        bars.push(DailyBar {
            date,
            open: value_at(&quote.open, i),
            high: value_at(&quote.high, i),
            low: value_at(&quote.low, i),
            close,
            adj_close,
            volume: value_at(&quote.volume, i),
        });
    }

    Ok(RawSeries::new(result.meta.symbol, bars))
}
