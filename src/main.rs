//! Gold price prediction from Yahoo Finance daily data
//!
//! Usage: gold_price_ml --start 2020-01-01 --end 2024-01-01 --output output

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use gold_price_ml::{pipeline, report, DateRange, PipelineConfig, YahooClient};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Predict the next-day gold price with gradient boosting and random forests")]
struct Args {
    /// First date of the history window (YYYY-MM-DD)
    #[arg(short, long)]
    start: NaiveDate,

    /// End of the history window, exclusive (YYYY-MM-DD)
    #[arg(short, long)]
    end: NaiveDate,

    /// Directory for plots and the feature CSV
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rows shown in the data preview (overrides the config file)
    #[arg(long)]
    preview_rows: Option<usize>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gold_price_ml=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let range = match DateRange::new(args.start, args.end) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(());
        }
    };

    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(rows) = args.preview_rows {
        config.report.preview_rows = rows;
    }

    let client = YahooClient::with_base_url(
        &config.data.base_url,
        Duration::from_secs(config.data.timeout_secs),
    )?;

    let output = pipeline::run(&client, range, &config)
        .await
        .context("Gold price pipeline failed")?;

    let written = report::write_artifacts(&output, &args.output)?;
    for path in &written {
        info!("Saved {}", path.display());
    }

    println!("{}", report::render(&output, config.report.preview_rows));

    Ok(())
}
