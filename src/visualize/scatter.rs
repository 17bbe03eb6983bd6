//! Actual vs. predicted scatter plot

use super::canvas::{drawing_error, render, VisualizeError, FONT_FAMILY};
use crate::models::ModelKind;
use plotters::prelude::*;

const SIZE: (u32, u32) = (1200, 600);

/// Render actual vs. predicted test targets
///
/// The dashed red diagonal spans the range of the actual values.
pub fn actual_vs_predicted(
    actual: &[f64],
    predicted: &[f64],
    kind: ModelKind,
) -> Result<Vec<u8>, VisualizeError> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return Err(VisualizeError::NoData(format!(
            "{} actual values, {} predictions",
            actual.len(),
            predicted.len()
        )));
    }

    let (lo, hi) = padded_range(actual.iter().chain(predicted.iter()).copied());
    let actual_min = actual.iter().cloned().fold(f64::INFINITY, f64::min);
    let actual_max = actual.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    render(SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(
                format!("Actual vs Predicted Gold Price ({})", kind.name()),
                (FONT_FAMILY, 26).into_font(),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(lo..hi, lo..hi)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .x_desc("Actual Price")
            .y_desc("Predicted Price")
            .label_style((FONT_FAMILY, 14))
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(DashedLineSeries::new(
                vec![(actual_min, actual_min), (actual_max, actual_max)],
                10,
                6,
                RED.stroke_width(2),
            ))
            .map_err(drawing_error)?;

        chart
            .draw_series(
                actual
                    .iter()
                    .zip(predicted.iter())
                    .map(|(a, p)| Circle::new((*a, *p), 5, BLUE.mix(0.5).filled())),
            )
            .map_err(drawing_error)?;

        Ok(())
    })
}

/// Min/max of the values widened by 5%, never degenerate
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let pad = ((max - min) * 0.05).max(1.0);
    (min - pad, max + pad)
}
