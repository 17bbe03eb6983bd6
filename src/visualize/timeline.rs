//! Adjusted close over time

use super::canvas::{drawing_error, render, VisualizeError, FONT_FAMILY};
use crate::features::FeatureFrame;
use chrono::Duration;
use plotters::prelude::*;

const SIZE: (u32, u32) = (1000, 600);

/// Render the adjusted close across the whole frame
pub fn price_over_time(frame: &FeatureFrame) -> Result<Vec<u8>, VisualizeError> {
    let (first, last) = match (frame.rows.first(), frame.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return Err(VisualizeError::NoData("feature frame is empty".to_string())),
    };
    let end = if last > first { last } else { first + Duration::days(1) };

    let prices: Vec<f64> = frame.rows.iter().map(|r| r.adj_close).collect();
    let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max - min) * 0.05).max(1.0);

    render(SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Gold Price Over Time", (FONT_FAMILY, 26).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(first..end, (min - pad)..(max + pad))
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Gold Price")
            .x_labels(8)
            .label_style((FONT_FAMILY, 14))
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(LineSeries::new(
                frame.rows.iter().map(|r| (r.date, r.adj_close)),
                BLUE.stroke_width(2),
            ))
            .map_err(drawing_error)?
            .label("Adj Close")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

        chart
            .configure_series_labels()
            .label_font((FONT_FAMILY, 14))
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()
            .map_err(drawing_error)?;

        Ok(())
    })
}
