//! Owned pixel canvas, font registration and PNG encoding

use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use std::fmt::Display;
use std::io::Cursor;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

static FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
static FONT_REGISTERED: OnceLock<bool> = OnceLock::new();

/// Family every plot uses for captions, labels and annotations
pub const FONT_FAMILY: &str = "sans-serif";

/// Errors raised while rendering a plot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VisualizeError {
    #[error("Failed to register the embedded font")]
    Font,

    #[error("Drawing failed: {0}")]
    Drawing(String),

    #[error("PNG encoding failed: {0}")]
    Encoding(String),

    #[error("No data to plot: {0}")]
    NoData(String),
}

pub(crate) fn drawing_error<E: Display>(e: E) -> VisualizeError {
    VisualizeError::Drawing(e.to_string())
}

/// Register the embedded font under [`FONT_FAMILY`], once per process
pub fn ensure_font() -> Result<(), VisualizeError> {
    let registered = *FONT_REGISTERED.get_or_init(|| {
        let ok = register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok();
        debug!("Registered embedded font: {}", ok);
        ok
    });

    if registered {
        Ok(())
    } else {
        Err(VisualizeError::Font)
    }
}

/// Draw onto a fresh white canvas and return it encoded as PNG
///
/// The pixel buffer lives only for the duration of the call.
pub fn render<F>(size: (u32, u32), draw: F) -> Result<Vec<u8>, VisualizeError>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), VisualizeError>,
{
    ensure_font()?;

    let (width, height) = size;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;
        draw(&root)?;
        root.present().map_err(drawing_error)?;
    }

    encode_png(buffer, size)
}

fn encode_png(buffer: Vec<u8>, (width, height): (u32, u32)) -> Result<Vec<u8>, VisualizeError> {
    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| VisualizeError::Encoding("pixel buffer size mismatch".to_string()))?;

    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| VisualizeError::Encoding(e.to_string()))?;

    Ok(cursor.into_inner())
}

#[cfg(test)]
pub(crate) const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_registration_is_idempotent() {
        assert!(ensure_font().is_ok());
        assert!(ensure_font().is_ok());
    }

    #[test]
    fn test_render_blank_canvas() {
        let png = render((64, 32), |_| Ok(())).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_render_propagates_draw_error() {
        let err = render((16, 16), |_| Err(VisualizeError::NoData("empty".to_string()))).unwrap_err();
        assert_eq!(err, VisualizeError::NoData("empty".to_string()));
    }
}
