//! Chart Plotter Module
//! Prepares the series behind each chart: points, bar heights, histogram
//! bins, density curves and the pairwise grid layout.

use plotters::style::RGBColor;
use polars::prelude::PolarsResult;
use statrs::distribution::{Continuous, Normal};
use std::collections::BTreeMap;

use crate::config::ReportConfig;
use crate::data::iris::FEATURE_NAMES;
use crate::data::IrisDataset;
use crate::stats::StatsCalculator;

/// Hue colors for species series, in species order.
pub const SPECIES_PALETTE: [RGBColor; 3] = [
    RGBColor(31, 119, 180), // Blue
    RGBColor(255, 127, 14), // Orange
    RGBColor(44, 160, 44),  // Green
];

/// Bar colors for the per-species bar chart.
pub const BAR_PALETTE: [RGBColor; 3] = [
    RGBColor(255, 0, 0), // Red
    RGBColor(0, 128, 0), // Green
    RGBColor(0, 0, 255), // Blue
];

const SEPAL_LENGTH: &str = FEATURE_NAMES[0];
const SEPAL_WIDTH: &str = FEATURE_NAMES[1];
const PETAL_LENGTH: &str = FEATURE_NAMES[2];

/// Points of one species.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesSeries {
    pub species: String,
    pub points: Vec<(f64, f64)>,
}

/// Equal-width histogram; `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl HistogramBins {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.counts.is_empty() => (hi - lo) / self.counts.len() as f64,
            _ => 0.0,
        }
    }

    /// `(left, right, count)` for every bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Kernel density estimate sampled on a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    pub bandwidth: f64,
    pub points: Vec<(f64, f64)>,
}

impl DensityCurve {
    pub fn max_density(&self) -> f64 {
        self.points.iter().map(|&(_, y)| y).fold(0.0, f64::max)
    }

    /// Same curve with every density multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            bandwidth: self.bandwidth,
            points: self.points.iter().map(|&(x, y)| (x, y * factor)).collect(),
        }
    }
}

/// One cell of the pairwise grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairPanel {
    /// Diagonal cell: per-species density of one feature.
    Density { feature: usize },
    /// Off-diagonal cell: feature `x` on the horizontal axis against `y`.
    Scatter { x: usize, y: usize },
}

/// Pairwise grid data: every measurement split by species.
#[derive(Debug, Clone)]
pub struct PairGridData {
    pub features: Vec<&'static str>,
    /// Value range of each feature over all species.
    pub ranges: Vec<(f64, f64)>,
    /// `groups[species][feature]` holds that species' values of the feature.
    pub species: Vec<String>,
    pub groups: Vec<Vec<Vec<f64>>>,
    /// `densities[feature][species]`
    pub densities: Vec<Vec<DensityCurve>>,
}

/// Everything the two report figures draw.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub sepal_length_trend: Vec<(f64, f64)>,
    pub petal_length_means: Vec<(String, f64)>,
    pub sepal_width_bins: HistogramBins,
    /// Density of sepal width, scaled to histogram counts.
    pub sepal_width_density: DensityCurve,
    pub length_scatter: Vec<SpeciesSeries>,
    pub pairs: PairGridData,
}

impl ChartData {
    /// Gather all chart series from the dataset.
    pub fn from_dataset(dataset: &IrisDataset, config: &ReportConfig) -> PolarsResult<Self> {
        let species = dataset.species()?;
        let sepal_length = dataset.feature(SEPAL_LENGTH)?;
        let sepal_width = dataset.feature(SEPAL_WIDTH)?;
        let petal_length = dataset.feature(PETAL_LENGTH)?;

        let sepal_width_bins = ChartPlotter::histogram(&sepal_width, config.histogram_bins);
        let (lo, hi) = ChartPlotter::min_max(&sepal_width);
        let scale = sepal_width.len() as f64 * sepal_width_bins.bin_width();
        let sepal_width_density =
            ChartPlotter::kde(&sepal_width, lo, hi, config.kde_points).scaled(scale);

        Ok(Self {
            sepal_length_trend: ChartPlotter::line_points(&sepal_length),
            petal_length_means: ChartPlotter::group_means(&petal_length, &species),
            sepal_width_bins,
            sepal_width_density,
            length_scatter: ChartPlotter::scatter_by_species(&sepal_length, &petal_length, &species),
            pairs: ChartPlotter::pair_grid(&dataset.features()?, &species, config.kde_points),
        })
    }
}

/// Builds chart series from raw column values.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for the species at `idx` in species order.
    pub fn get_species_color(idx: usize) -> RGBColor {
        SPECIES_PALETTE[idx % SPECIES_PALETTE.len()]
    }

    pub fn get_bar_color(idx: usize) -> RGBColor {
        BAR_PALETTE[idx % BAR_PALETTE.len()]
    }

    /// Values against their row index.
    pub fn line_points(values: &[f64]) -> Vec<(f64, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v))
            .collect()
    }

    /// Mean value per species, species sorted by name.
    pub fn group_means(values: &[f64], species: &[String]) -> Vec<(String, f64)> {
        StatsCalculator::partition_by_species(values, species)
            .into_iter()
            .map(|(name, group)| {
                let mean = StatsCalculator::compute_descriptive_stats(&name, &group).mean;
                (name, mean)
            })
            .collect()
    }

    /// One point series per species, species sorted by name.
    pub fn scatter_by_species(x: &[f64], y: &[f64], species: &[String]) -> Vec<SpeciesSeries> {
        let mut groups: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
        for ((&xv, &yv), name) in x.iter().zip(y).zip(species) {
            groups.entry(name.as_str()).or_default().push((xv, yv));
        }
        groups
            .into_iter()
            .map(|(name, points)| SpeciesSeries {
                species: name.to_string(),
                points,
            })
            .collect()
    }

    /// Smallest and largest value; `(0, 1)` for an empty slice.
    pub fn min_max(values: &[f64]) -> (f64, f64) {
        let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo.is_finite() && hi.is_finite() {
            (lo, hi)
        } else {
            (0.0, 1.0)
        }
    }

    /// Axis range around the values with 5% padding on each side.
    pub fn padded_range(values: &[f64]) -> (f64, f64) {
        let (lo, hi) = Self::min_max(values);
        let pad = if hi > lo { (hi - lo) * 0.05 } else { 0.5 };
        (lo - pad, hi + pad)
    }

    /// Equal-width bins over `[min, max]`; the last bin also holds the max.
    pub fn histogram(values: &[f64], bins: usize) -> HistogramBins {
        let bins = bins.max(1);
        let (mut lo, mut hi) = Self::min_max(values);
        if hi <= lo {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|i| lo + i as f64 * width).collect();
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        HistogramBins { edges, counts }
    }

    /// Scott's rule bandwidth: sample std times n^(-1/5).
    pub fn scott_bandwidth(values: &[f64]) -> f64 {
        let std = StatsCalculator::compute_descriptive_stats("", values).std;
        std * (values.len() as f64).powf(-0.2)
    }

    /// Gaussian kernel density of `values`, sampled at `points` positions over
    /// `[lo, hi]`. Empty when the bandwidth is not positive.
    pub fn kde(values: &[f64], lo: f64, hi: f64, points: usize) -> DensityCurve {
        let bandwidth = Self::scott_bandwidth(values);
        let Ok(kernel) = Normal::new(0.0, bandwidth) else {
            return DensityCurve {
                bandwidth,
                points: Vec::new(),
            };
        };

        let n = values.len() as f64;
        let steps = points.max(2) - 1;
        let points = (0..=steps)
            .map(|i| {
                let x = lo + (hi - lo) * i as f64 / steps as f64;
                let density = values.iter().map(|&v| kernel.pdf(x - v)).sum::<f64>() / n;
                (x, density)
            })
            .collect();

        DensityCurve { bandwidth, points }
    }

    /// Cell kind at `row`, `col` of the pairwise grid.
    pub fn pair_panel(row: usize, col: usize) -> PairPanel {
        if row == col {
            PairPanel::Density { feature: row }
        } else {
            PairPanel::Scatter { x: col, y: row }
        }
    }

    /// Row-major layout of an `n` by `n` pairwise grid.
    pub fn pair_layout(n: usize) -> Vec<PairPanel> {
        (0..n * n).map(|i| Self::pair_panel(i / n, i % n)).collect()
    }

    /// Split every feature by species and estimate per-species densities.
    pub fn pair_grid(
        features: &[(&'static str, Vec<f64>)],
        species: &[String],
        kde_points: usize,
    ) -> PairGridData {
        let mut names: Vec<String> = species.to_vec();
        names.sort();
        names.dedup();

        let groups: Vec<Vec<Vec<f64>>> = names
            .iter()
            .map(|name| {
                features
                    .iter()
                    .map(|(_, values)| {
                        values
                            .iter()
                            .zip(species)
                            .filter(|(_, s)| *s == name)
                            .map(|(&v, _)| v)
                            .collect()
                    })
                    .collect()
            })
            .collect();

        let ranges: Vec<(f64, f64)> = features
            .iter()
            .map(|(_, values)| Self::padded_range(values))
            .collect();

        let densities = ranges
            .iter()
            .enumerate()
            .map(|(f, &(lo, hi))| {
                groups
                    .iter()
                    .map(|group| Self::kde(&group[f], lo, hi, kde_points))
                    .collect()
            })
            .collect();

        PairGridData {
            features: features.iter().map(|(name, _)| *name).collect(),
            ranges,
            species: names,
            groups,
            densities,
        }
    }
}
