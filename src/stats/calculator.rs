//! Statistics Calculator Module
//! Descriptive statistics per column and per species.

use polars::prelude::PolarsResult;
use std::collections::BTreeMap;

use crate::data::IrisDataset;

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Per-feature statistics for the rows of one species.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub species: String,
    pub count: usize,
    pub columns: Vec<ColumnSummary>,
}

/// Handles statistical calculations over the dataset.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(column: &str, values: &[f64]) -> ColumnSummary {
        let n = values.len();
        if n == 0 {
            return ColumnSummary {
                column: column.to_string(),
                ..ColumnSummary::default()
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            f64::NAN
        };

        ColumnSummary {
            column: column.to_string(),
            count: n,
            mean,
            std: variance.sqrt(),
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Summaries of the four measurement columns.
    pub fn describe(dataset: &IrisDataset) -> PolarsResult<Vec<ColumnSummary>> {
        Ok(dataset
            .features()?
            .iter()
            .map(|(name, values)| Self::compute_descriptive_stats(name, values))
            .collect())
    }

    /// Split values by their species label, species sorted by name.
    pub fn partition_by_species(values: &[f64], species: &[String]) -> BTreeMap<String, Vec<f64>> {
        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (value, name) in values.iter().zip(species) {
            groups.entry(name.clone()).or_default().push(*value);
        }
        groups
    }

    /// Per-species summaries of every measurement column, species sorted by name.
    pub fn group_summaries(dataset: &IrisDataset) -> PolarsResult<Vec<GroupSummary>> {
        let species = dataset.species()?;
        let mut groups: BTreeMap<String, GroupSummary> = BTreeMap::new();

        for (name, values) in dataset.features()? {
            for (label, group_values) in Self::partition_by_species(&values, &species) {
                let summary = groups.entry(label.clone()).or_insert_with(|| GroupSummary {
                    species: label,
                    count: group_values.len(),
                    columns: Vec::new(),
                });
                summary
                    .columns
                    .push(Self::compute_descriptive_stats(name, &group_values));
            }
        }

        Ok(groups.into_values().collect())
    }
}
