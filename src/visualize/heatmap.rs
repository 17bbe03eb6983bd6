//! Pearson correlation heatmap of the feature frame

use super::canvas::{drawing_error, render, VisualizeError, FONT_FAMILY};
use crate::features::{Column, FeatureFrame};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const CELL: i32 = 84;
const LEFT: i32 = 130;
const TOP: i32 = 70;
const BOTTOM: i32 = 60;
const LEGEND: i32 = 110;

const NEGATIVE: (f64, f64, f64) = (59.0, 76.0, 192.0);
const POSITIVE: (f64, f64, f64) = (180.0, 4.0, 38.0);
const UNDEFINED: RGBColor = RGBColor(200, 200, 200);

/// Pearson correlation coefficient
///
/// NaN when the inputs are empty, mismatched or either side is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n == 0 || n != y.len() {
        return f64::NAN;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }

    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Pairwise correlations of every numeric column, in [`Column::ALL`] order
pub fn correlation_matrix(frame: &FeatureFrame) -> Vec<Vec<f64>> {
    let columns: Vec<Vec<f64>> = Column::ALL.iter().map(|c| frame.column(*c)).collect();

    columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect()
}

/// Diverging blue-white-red color for a coefficient in [-1, 1]
pub fn diverging_color(value: f64) -> RGBColor {
    if !value.is_finite() {
        return UNDEFINED;
    }

    let t = value.clamp(-1.0, 1.0);
    let (r, g, b) = if t < 0.0 { NEGATIVE } else { POSITIVE };
    let w = t.abs();
    let mix = |c: f64| (255.0 + (c - 255.0) * w).round() as u8;

    RGBColor(mix(r), mix(g), mix(b))
}

/// Render the annotated correlation heatmap as PNG
pub fn correlation_heatmap(frame: &FeatureFrame) -> Result<Vec<u8>, VisualizeError> {
    if frame.is_empty() {
        return Err(VisualizeError::NoData("feature frame is empty".to_string()));
    }

    let matrix = correlation_matrix(frame);
    let n = Column::ALL.len() as i32;
    let width = (LEFT + n * CELL + LEGEND) as u32;
    let height = (TOP + n * CELL + BOTTOM) as u32;

    render((width, height), |root| {
        let title = (FONT_FAMILY, 26)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(
            "Feature Correlation Heatmap",
            ((width / 2) as i32, TOP / 2),
            title,
        ))
        .map_err(drawing_error)?;

        let label = (FONT_FAMILY, 13).into_font().color(&BLACK);

        for (i, row) in matrix.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let x0 = LEFT + j as i32 * CELL;
                let y0 = TOP + i as i32 * CELL;

                root.draw(&Rectangle::new(
                    [(x0, y0), (x0 + CELL, y0 + CELL)],
                    diverging_color(*value).filled(),
                ))
                .map_err(drawing_error)?;

                let text_color = if value.abs() > 0.6 { WHITE } else { BLACK };
                let annotation = if value.is_finite() {
                    format!("{:.2}", value)
                } else {
                    "nan".to_string()
                };
                root.draw(&Text::new(
                    annotation,
                    (x0 + CELL / 2, y0 + CELL / 2),
                    (FONT_FAMILY, 15)
                        .into_font()
                        .color(&text_color)
                        .pos(Pos::new(HPos::Center, VPos::Center)),
                ))
                .map_err(drawing_error)?;
            }
        }

        for (k, column) in Column::ALL.iter().enumerate() {
            let offset = k as i32 * CELL + CELL / 2;

            root.draw(&Text::new(
                column.name(),
                (LEFT - 8, TOP + offset),
                label.clone().pos(Pos::new(HPos::Right, VPos::Center)),
            ))
            .map_err(drawing_error)?;

            // stagger column labels so long names do not collide
            let dy = if k % 2 == 0 { 14 } else { 34 };
            root.draw(&Text::new(
                column.name(),
                (LEFT + offset, TOP + n * CELL + dy),
                label.clone().pos(Pos::new(HPos::Center, VPos::Center)),
            ))
            .map_err(drawing_error)?;
        }

        draw_legend(root, LEFT + n * CELL + 30, TOP, n * CELL)
    })
}

fn draw_legend(
    root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    x: i32,
    y: i32,
    height: i32,
) -> Result<(), VisualizeError> {
    let bar_width = 22;

    for step in 0..height {
        let value = 1.0 - 2.0 * step as f64 / (height - 1).max(1) as f64;
        root.draw(&Rectangle::new(
            [(x, y + step), (x + bar_width, y + step + 1)],
            diverging_color(value).filled(),
        ))
        .map_err(drawing_error)?;
    }

    let style = (FONT_FAMILY, 13)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (value, dy) in [(1.0, 0), (0.0, height / 2), (-1.0, height)] {
        root.draw(&Text::new(
            format!("{:.1}", value),
            (x + bar_width + 6, y + dy),
            style.clone(),
        ))
        .map_err(drawing_error)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DailyBar, RawSeries};
    use crate::features::FeatureBuilder;
    use crate::visualize::canvas::PNG_SIGNATURE;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    #[test]
    fn test_pearson() {
        let x = [1.0, 2.0, 3.0, 4.0];

        assert_relative_eq!(pearson(&x, &[2.0, 4.0, 6.0, 8.0]), 1.0);
        assert_relative_eq!(pearson(&x, &[8.0, 6.0, 4.0, 2.0]), -1.0);
        assert!(pearson(&x, &[5.0; 4]).is_nan());
        assert!(pearson(&[], &[]).is_nan());
    }

    #[test]
    fn test_diverging_color() {
        assert_eq!(diverging_color(0.0), RGBColor(255, 255, 255));
        assert_eq!(diverging_color(1.0), RGBColor(180, 4, 38));
        assert_eq!(diverging_color(-1.0), RGBColor(59, 76, 192));
        assert_eq!(diverging_color(f64::NAN), UNDEFINED);
    }

    #[test]
    fn test_heatmap_with_constant_column() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..40)
            .map(|i| {
                let c = 100.0 + i as f64;
                DailyBar::new(start + chrono::Duration::days(i), c, c + 1.0, c - 1.0, c, c, 0.0)
            })
            .collect();
        let frame = FeatureBuilder::new().build(&RawSeries::new("GC=F", bars)).unwrap();

        let matrix = correlation_matrix(&frame);
        let volume = Column::ALL.iter().position(|c| *c == Column::Volume).unwrap();
        assert!(matrix[volume][volume].is_nan());
        assert_relative_eq!(matrix[3][4], 1.0, epsilon = 1e-9);

        let png = correlation_heatmap(&frame).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_heatmap_empty_frame() {
        assert!(matches!(
            correlation_heatmap(&FeatureFrame::default()),
            Err(VisualizeError::NoData(_))
        ));
    }
}
