//! Named columns of the feature frame and the model input schema

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric column of the feature frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
    Ma7,
    Ma30,
    PriceChange,
    PriceVolatility,
}

impl Column {
    /// Every numeric column, in frame order
    pub const ALL: [Column; 10] = [
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::AdjClose,
        Column::Volume,
        Column::Ma7,
        Column::Ma30,
        Column::PriceChange,
        Column::PriceVolatility,
    ];

    /// The prediction target
    pub const TARGET: Column = Column::AdjClose;

    /// Display name used in tables, plots and CSV headers
    pub fn name(&self) -> &'static str {
        match self {
            Column::Open => "Open",
            Column::High => "High",
            Column::Low => "Low",
            Column::Close => "Close",
            Column::AdjClose => "Adj Close",
            Column::Volume => "Volume",
            Column::Ma7 => "MA7",
            Column::Ma30 => "MA30",
            Column::PriceChange => "Price_Change",
            Column::PriceVolatility => "Price_Volatility",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered list of model input columns
///
/// Shared by the feature builder, the trainer and the forecaster so that a
/// fitted model only ever sees vectors laid out the way it was trained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    columns: Vec<Column>,
}

impl FeatureSchema {
    /// Create a schema from explicit columns
    ///
    /// Returns `None` if the list is empty, repeats a column or contains the target.
    pub fn new(columns: Vec<Column>) -> Option<Self> {
        if columns.is_empty() || columns.contains(&Column::TARGET) {
            return None;
        }
        for (i, c) in columns.iter().enumerate() {
            if columns[..i].contains(c) {
                return None;
            }
        }
        Some(Self { columns })
    }

    /// Columns in input order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of input features
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false for a constructed schema
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in input order
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name().to_string()).collect()
    }
}

impl Default for FeatureSchema {
    /// Every frame column except the target
    fn default() -> Self {
        Self {
            columns: vec![
                Column::Open,
                Column::High,
                Column::Low,
                Column::Close,
                Column::Volume,
                Column::Ma7,
                Column::Ma30,
                Column::PriceChange,
                Column::PriceVolatility,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_excludes_target() {
        let schema = FeatureSchema::default();

        assert_eq!(schema.len(), 9);
        assert!(!schema.columns().contains(&Column::TARGET));
        assert_eq!(schema.names()[0], "Open");
        assert_eq!(schema.names()[8], "Price_Volatility");
    }

    #[test]
    fn test_schema_rejects_target_and_duplicates() {
        assert!(FeatureSchema::new(vec![Column::Close, Column::AdjClose]).is_none());
        assert!(FeatureSchema::new(vec![Column::Close, Column::Close]).is_none());
        assert!(FeatureSchema::new(vec![]).is_none());
        assert!(FeatureSchema::new(vec![Column::Ma7, Column::Close]).is_some());
    }
}
