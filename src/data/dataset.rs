//! Dataset structure for the regression models

use crate::features::{FeatureFrame, FeatureSchema};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while partitioning a dataset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("Cannot split {samples} samples with test ratio {test_ratio}: both partitions must be non-empty")]
    TooSmall { samples: usize, test_ratio: f64 },

    #[error("Test ratio must be in (0, 1), got {0}")]
    InvalidRatio(f64),
}

/// Feature matrix with targets, laid out by a feature schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Column layout of `features`
    pub schema: FeatureSchema,
    /// Feature matrix (n_samples x n_features)
    pub features: Vec<Vec<f64>>,
    /// Target values (adjusted close)
    pub targets: Vec<f64>,
    /// Date of each sample
    pub dates: Vec<NaiveDate>,
}

/// Train/test split result
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    /// Lay out a feature frame according to `schema`
    pub fn from_frame(frame: &FeatureFrame, schema: &FeatureSchema) -> Self {
        Self {
            schema: schema.clone(),
            features: frame.rows.iter().map(|r| r.feature_vector(schema)).collect(),
            targets: frame.rows.iter().map(|r| r.target()).collect(),
            dates: frame.dates(),
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of features
    pub fn num_features(&self) -> usize {
        self.schema.len()
    }

    /// Create a subset of the dataset by indices
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            schema: self.schema.clone(),
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
            dates: indices.iter().map(|&i| self.dates[i]).collect(),
        }
    }

    /// Seeded shuffle split
    ///
    /// The test partition holds `ceil(test_ratio * n)` samples and the
    /// training partition the rest, so identical input and seed always
    /// produce the same partition.
    pub fn random_split(&self, test_ratio: f64, seed: u64) -> Result<Split, DatasetError> {
        if !(test_ratio > 0.0 && test_ratio < 1.0) {
            return Err(DatasetError::InvalidRatio(test_ratio));
        }

        let n = self.len();
        let test_size = (test_ratio * n as f64).ceil() as usize;

        if test_size == 0 || test_size >= n {
            return Err(DatasetError::TooSmall {
                samples: n,
                test_ratio,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);

        let (test_indices, train_indices) = indices.split_at(test_size);

        Ok(Split {
            train: self.subset(train_indices),
            test: self.subset(test_indices),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DailyBar, RawSeries};
    use crate::features::FeatureBuilder;

    fn frame(n: usize) -> FeatureFrame {
        let start = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let c = 1800.0 + i as f64 * 2.5;
                DailyBar::new(start + chrono::Duration::days(i as i64), c, c + 1.0, c - 1.0, c, c, 0.0)
            })
            .collect();
        FeatureBuilder::new().build(&RawSeries::new("GC=F", bars)).unwrap()
    }

    #[test]
    fn test_from_frame_uses_schema() {
        let frame = frame(40);
        let dataset = Dataset::from_frame(&frame, &FeatureSchema::default());

        assert_eq!(dataset.len(), 11);
        assert_eq!(dataset.num_features(), 9);
        assert!(dataset.features.iter().all(|row| row.len() == 9));
        assert_eq!(dataset.targets[0], frame.rows[0].adj_close);
    }

    #[test]
    fn test_split_sizes() {
        let dataset = Dataset::from_frame(&frame(40), &FeatureSchema::default());
        let split = dataset.random_split(0.2, 42).unwrap();

        // ceil(0.2 * 11) = 3
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);

        let mut dates: Vec<NaiveDate> = split.train.dates.clone();
        dates.extend(split.test.dates.iter().copied());
        dates.sort();
        assert_eq!(dates, dataset.dates);
    }

    #[test]
    fn test_split_is_deterministic() {
        let dataset = Dataset::from_frame(&frame(80), &FeatureSchema::default());
        let a = dataset.random_split(0.2, 42).unwrap();
        let b = dataset.random_split(0.2, 42).unwrap();
        let c = dataset.random_split(0.2, 7).unwrap();

        assert_eq!(a.test.dates, b.test.dates);
        assert_eq!(a.train.targets, b.train.targets);
        assert_ne!(a.test.dates, c.test.dates);
    }

    #[test]
    fn test_split_too_small() {
        let dataset = Dataset::from_frame(&frame(30), &FeatureSchema::default());
        assert_eq!(dataset.len(), 1);

        let err = dataset.random_split(0.2, 42).unwrap_err();
        assert!(matches!(err, DatasetError::TooSmall { samples: 1, .. }));
    }

    #[test]
    fn test_invalid_ratio() {
        let dataset = Dataset::from_frame(&frame(40), &FeatureSchema::default());
        assert!(dataset.random_split(1.0, 42).is_err());
        assert!(dataset.random_split(0.0, 42).is_err());
    }
}
