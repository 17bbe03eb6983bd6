//! Text report and artifact export

use crate::features::{Column, FeatureFrame, FeatureRow};
use crate::models::{Metrics, ModelKind};
use crate::pipeline::PipelineOutput;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File names written by [`write_artifacts`]
pub mod files {
    pub const HEATMAP: &str = "correlation_heatmap.png";
    pub const PRICE_OVER_TIME: &str = "price_over_time.png";
    pub const FEATURES: &str = "features.csv";

    /// Scatter plot file for a model
    pub fn actual_vs_predicted(slug: &str) -> String {
        format!("actual_vs_predicted_{}.png", slug)
    }
}

/// Summary statistics of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: Column,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Quantile with linear interpolation between closest ranks
///
/// `sorted` must be in ascending order. Returns NaN when empty.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

fn summarize(column: Column, values: &[f64]) -> ColumnSummary {
    let count = values.len();
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = if count > 0 {
        values.iter().sum::<f64>() / count as f64
    } else {
        f64::NAN
    };
    let std = if count > 1 {
        (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    ColumnSummary {
        column,
        count,
        mean,
        std,
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}

/// Summary statistics for every numeric column of the frame
pub fn describe(frame: &FeatureFrame) -> Vec<ColumnSummary> {
    Column::ALL
        .iter()
        .map(|c| summarize(*c, &frame.column(*c)))
        .collect()
}

fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.4}", value)
    } else {
        "NaN".to_string()
    }
}

fn render_table(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{:>width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let _ = writeln!(out, "{}", line(header).trim_end());
    for row in rows {
        let _ = writeln!(out, "{}", line(row.as_slice()).trim_end());
    }
    out
}

/// Last `n` rows of the frame as a text table
pub fn preview_table(frame: &FeatureFrame, n: usize) -> String {
    let header: Vec<String> = std::iter::once("Date".to_string())
        .chain(Column::ALL.iter().map(|c| c.name().to_string()))
        .collect();

    let rows: Vec<Vec<String>> = frame
        .tail(n)
        .iter()
        .map(|row| {
            std::iter::once(row.date.to_string())
                .chain(Column::ALL.iter().map(|c| format_value(row.get(*c))))
                .collect()
        })
        .collect();

    render_table(&header, &rows)
}

/// Summary statistics as a text table, one statistic per row
pub fn describe_table(summaries: &[ColumnSummary]) -> String {
    let header: Vec<String> = std::iter::once(String::new())
        .chain(summaries.iter().map(|s| s.column.name().to_string()))
        .collect();

    let stats: [(&str, fn(&ColumnSummary) -> f64); 8] = [
        ("count", |s| s.count as f64),
        ("mean", |s| s.mean),
        ("std", |s| s.std),
        ("min", |s| s.min),
        ("25%", |s| s.q25),
        ("50%", |s| s.median),
        ("75%", |s| s.q75),
        ("max", |s| s.max),
    ];

    let rows: Vec<Vec<String>> = stats
        .iter()
        .map(|(name, get)| {
            std::iter::once(name.to_string())
                .chain(summaries.iter().map(|s| format_value(get(s))))
                .collect()
        })
        .collect();

    render_table(&header, &rows)
}

/// Metric block for one model, four decimals
pub fn metrics_block(kind: ModelKind, metrics: &Metrics) -> String {
    format!(
        "{} Regressor Metrics\n\
         Train R-squared: {:.4}\n\
         Test R-squared: {:.4}\n\
         Test Mean Absolute Error: {:.4}\n\
         Test Mean Squared Error: {:.4}\n",
        kind.name(),
        metrics.train_r2,
        metrics.test_r2,
        metrics.test_mae,
        metrics.test_mse
    )
}

/// Forecast line for one model, two decimals
pub fn forecast_line(kind: ModelKind, price: f64) -> String {
    format!("{}: ${:.2}", kind.name(), price)
}

/// Full text report of a pipeline run
pub fn render(output: &PipelineOutput, preview_rows: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "### Historical Gold Data");
    let _ = writeln!(out, "{}", preview_table(&output.frame, preview_rows));
    let _ = writeln!(out, "### Key Insights");
    let _ = writeln!(out, "{}", describe_table(&describe(&output.frame)));

    for model in output.models() {
        let _ = writeln!(out, "### {}", metrics_block(model.kind, &model.metrics));
    }

    let _ = writeln!(out, "### Predicted Gold Price for the next day");
    for model in output.models() {
        let _ = writeln!(out, "{}", forecast_line(model.kind, model.forecast));
    }

    out
}

/// Write the feature frame as CSV
pub fn write_features_csv(frame: &FeatureFrame, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let header: Vec<&str> = std::iter::once("Date")
        .chain(Column::ALL.iter().map(|c| c.name()))
        .collect();
    writer.write_record(&header)?;

    for row in &frame.rows {
        writer.write_record(csv_record(row))?;
    }

    writer.flush()?;
    Ok(())
}

fn csv_record(row: &FeatureRow) -> Vec<String> {
    std::iter::once(row.date.to_string())
        .chain(Column::ALL.iter().map(|c| row.get(*c).to_string()))
        .collect()
}

/// Write the four plots and the feature CSV into `dir`, creating it if needed
///
/// Either every artifact is written or none is left behind: on failure the
/// files already written by this call are removed before the error returns.
pub fn write_artifacts(output: &PipelineOutput, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written = Vec::new();
    if let Err(e) = write_all(output, dir, &mut written) {
        for path in &written {
            if let Err(remove_err) = fs::remove_file(path) {
                warn!("Failed to remove {}: {}", path.display(), remove_err);
            }
        }
        return Err(e);
    }

    info!("Wrote {} artifacts to {}", written.len(), dir.display());

    Ok(written)
}

fn write_all(output: &PipelineOutput, dir: &Path, written: &mut Vec<PathBuf>) -> Result<()> {
    let mut images: Vec<(String, &[u8])> = vec![
        (files::HEATMAP.to_string(), output.heatmap.as_slice()),
        (files::PRICE_OVER_TIME.to_string(), output.price_plot.as_slice()),
    ];
    for model in output.models() {
        images.push((files::actual_vs_predicted(model.kind.slug()), model.scatter.as_slice()));
    }

    for (name, bytes) in images {
        let path = dir.join(name);
        fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    let csv_path = dir.join(files::FEATURES);
    write_features_csv(&output.frame, &csv_path)?;
    written.push(csv_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn frame() -> FeatureFrame {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        FeatureFrame {
            rows: (0..4)
                .map(|i| {
                    let p = [1.0, 2.0, 3.0, 4.0][i];
                    FeatureRow {
                        date: start + chrono::Duration::days(i as i64),
                        open: p,
                        high: p,
                        low: p,
                        close: p,
                        adj_close: p,
                        volume: 0.0,
                        ma7: p,
                        ma30: p,
                        price_change: 0.0,
                        price_volatility: 0.0,
                    }
                })
                .collect(),
        }
    }

    #[test]
    fn test_quantile_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];

        assert_relative_eq!(quantile(&sorted, 0.25), 1.75);
        assert_relative_eq!(quantile(&sorted, 0.5), 2.5);
        assert_relative_eq!(quantile(&sorted, 0.75), 3.25);
        assert_relative_eq!(quantile(&sorted, 1.0), 4.0);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_describe_close() {
        let summaries = describe(&frame());
        let close = summaries.iter().find(|s| s.column == Column::Close).unwrap();

        assert_eq!(close.count, 4);
        assert_relative_eq!(close.mean, 2.5);
        assert_relative_eq!(close.std, (5.0f64 / 3.0).sqrt());
        assert_relative_eq!(close.min, 1.0);
        assert_relative_eq!(close.q25, 1.75);
        assert_relative_eq!(close.median, 2.5);
        assert_relative_eq!(close.q75, 3.25);
        assert_relative_eq!(close.max, 4.0);
    }

    #[test]
    fn test_tables() {
        let frame = frame();

        let preview = preview_table(&frame, 2);
        let lines: Vec<&str> = preview.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Adj Close"));
        assert!(lines[2].starts_with("2024-03-04"));

        let described = describe_table(&describe(&frame));
        assert_eq!(described.lines().count(), 9);
        assert!(described.contains("25%"));
    }

    #[test]
    fn test_metric_and_forecast_formatting() {
        let metrics = Metrics {
            train_r2: 0.99876,
            test_r2: 0.912345,
            test_mae: 12.3,
            test_mse: 210.55556,
            test_predictions: vec![],
        };

        let block = metrics_block(ModelKind::GradientBoosting, &metrics);
        assert!(block.contains("Train R-squared: 0.9988"));
        assert!(block.contains("Test Mean Squared Error: 210.5556"));

        assert_eq!(
            forecast_line(ModelKind::RandomForest, 2345.678),
            "Random Forest: $2345.68"
        );
    }

    #[test]
    fn test_features_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(files::FEATURES);
        write_features_csv(&frame(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "Date");
        assert_eq!(&headers[5], "Adj Close");
        assert_eq!(reader.records().count(), 4);
    }
}
