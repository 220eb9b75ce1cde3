//! Loaded dataset and the loader's outcome.

use polars::prelude::*;

use super::iris::FEATURE_NAMES;
use super::{SPECIES_COLUMN, TARGET_COLUMN};

/// The labeled Iris table: four measurement columns, the class label and
/// the species name.
#[derive(Debug, Clone)]
pub struct IrisDataset {
    df: DataFrame,
}

impl IrisDataset {
    pub(crate) fn from_frame(df: DataFrame) -> Self {
        Self { df }
    }

    /// Get a reference to the underlying DataFrame.
    #[allow(dead_code)]
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Values of one measurement column, in row order.
    pub fn feature(&self, name: &str) -> PolarsResult<Vec<f64>> {
        Ok(self.df.column(name)?.f64()?.into_iter().flatten().collect())
    }

    /// All four measurement columns, paired with their names.
    pub fn features(&self) -> PolarsResult<Vec<(&'static str, Vec<f64>)>> {
        FEATURE_NAMES
            .iter()
            .map(|&name| Ok((name, self.feature(name)?)))
            .collect()
    }

    #[allow(dead_code)]
    pub fn targets(&self) -> PolarsResult<Vec<i64>> {
        Ok(self
            .df
            .column(TARGET_COLUMN)?
            .i64()?
            .into_iter()
            .flatten()
            .collect())
    }

    pub fn species(&self) -> PolarsResult<Vec<String>> {
        Ok(self
            .df
            .column(SPECIES_COLUMN)?
            .str()?
            .into_iter()
            .flatten()
            .map(|s| s.to_string())
            .collect())
    }
}

/// Result of the load stage: either a dataset or the "no data" sentinel.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded(IrisDataset),
    NoData { reason: String },
}

impl LoadOutcome {
    pub fn dataset(&self) -> Option<&IrisDataset> {
        match self {
            LoadOutcome::Loaded(dataset) => Some(dataset),
            LoadOutcome::NoData { .. } => None,
        }
    }
}
