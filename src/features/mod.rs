//! Feature engineering module
//!
//! This module provides:
//! - Rolling-window statistics (moving averages, percentage change, volatility)
//! - The explicit feature schema shared with the models
//! - The feature builder producing fully populated frames

pub mod builder;
pub mod rolling;
pub mod schema;

pub use builder::{FeatureBuilder, FeatureConfig, FeatureError, FeatureFrame, FeatureRow};
pub use schema::{Column, FeatureSchema};
