//! Plot rendering
//!
//! Each plot function owns its canvas for the duration of the call and
//! returns the encoded PNG bytes.

pub mod canvas;
pub mod heatmap;
pub mod scatter;
pub mod timeline;

pub use canvas::VisualizeError;
pub use heatmap::{correlation_heatmap, correlation_matrix, pearson};
pub use scatter::actual_vs_predicted;
pub use timeline::price_over_time;
