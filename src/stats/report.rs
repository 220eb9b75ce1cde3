//! Analysis Report
//! Prints descriptive statistics, species means and the written findings.

use std::io::Write;

use log::debug;
use polars::prelude::*;
use thiserror::Error;

use super::{ColumnSummary, GroupSummary, StatsCalculator};
use crate::data::{LoadOutcome, SPECIES_COLUMN};

/// Observations about the dataset, written by hand.
pub const FINDINGS: [&str; 3] = [
    "Setosa has significantly smaller petal dimensions than other species",
    "Versicolor and virginica have more overlap in measurements",
    "Sepal width has the smallest variation across species",
];

const STATISTIC_COLUMN: &str = "statistic";
const STATISTIC_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Print descriptive statistics, per-species means and findings.
///
/// Does nothing when the load stage produced no data.
pub fn perform_basic_analysis<W: Write>(
    outcome: &LoadOutcome,
    out: &mut W,
) -> Result<(), AnalysisError> {
    let Some(dataset) = outcome.dataset() else {
        return Ok(());
    };

    let summaries = StatsCalculator::describe(dataset)?;
    writeln!(out, "\nBasic statistics for numerical columns:")?;
    writeln!(out, "{}", describe_frame(&summaries)?)?;

    let groups = StatsCalculator::group_summaries(dataset)?;
    for group in &groups {
        debug!("Species '{}' has {} rows", group.species, group.count);
    }
    writeln!(out, "\nMean values by species:")?;
    writeln!(out, "{}", group_means_frame(&groups)?)?;

    writeln!(out, "\nInteresting findings:")?;
    for finding in FINDINGS {
        writeln!(out, "- {}", finding)?;
    }

    Ok(())
}

/// Describe table: one row per statistic, one column per measurement.
fn describe_frame(summaries: &[ColumnSummary]) -> PolarsResult<DataFrame> {
    let mut columns = vec![Column::new(
        STATISTIC_COLUMN.into(),
        STATISTIC_ROWS.to_vec(),
    )];

    for s in summaries {
        let values = vec![
            s.count as f64,
            s.mean,
            s.std,
            s.min,
            s.q25,
            s.median,
            s.q75,
            s.max,
        ];
        columns.push(Column::new(s.column.as_str().into(), values));
    }

    DataFrame::new(columns)
}

/// Means table: one row per species, one column per measurement.
fn group_means_frame(groups: &[GroupSummary]) -> PolarsResult<DataFrame> {
    let species: Vec<&str> = groups.iter().map(|g| g.species.as_str()).collect();
    let mut columns = vec![Column::new(SPECIES_COLUMN.into(), species)];

    if let Some(first) = groups.first() {
        for (idx, feature) in first.columns.iter().enumerate() {
            let means: Vec<f64> = groups
                .iter()
                .map(|g| g.columns.get(idx).map(|c| c.mean).unwrap_or(f64::NAN))
                .collect();
            columns.push(Column::new(feature.column.as_str().into(), means));
        }
    }

    DataFrame::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::data::{BundledIris, DataLoader};

    fn report_for(outcome: &LoadOutcome) -> String {
        let mut out = Vec::new();
        perform_basic_analysis(outcome, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn no_data_prints_nothing() {
        let outcome = LoadOutcome::NoData {
            reason: "resource not found".to_string(),
        };
        assert_eq!(report_for(&outcome), "");
    }

    #[test]
    fn report_has_all_sections_in_order() {
        let loader = DataLoader::new(BundledIris, &ReportConfig::default());
        let outcome = loader.load_and_explore(&mut std::io::sink());
        let text = report_for(&outcome);

        let stats = text.find("Basic statistics for numerical columns:").unwrap();
        let means = text.find("Mean values by species:").unwrap();
        let findings = text.find("Interesting findings:").unwrap();
        assert!(stats < means && means < findings);

        for finding in FINDINGS {
            assert!(text.contains(&format!("- {}", finding)));
        }
        assert!(text.contains("versicolor"));
    }

    #[test]
    fn describe_frame_layout() {
        let summaries = vec![
            StatsCalculator::compute_descriptive_stats("a", &[1.0, 2.0, 3.0]),
            StatsCalculator::compute_descriptive_stats("b", &[4.0, 5.0, 6.0]),
        ];
        let df = describe_frame(&summaries).unwrap();

        assert_eq!(df.shape(), (8, 3));
        let b = df.column("b").unwrap().f64().unwrap();
        assert_eq!(b.get(0), Some(3.0));
        assert_eq!(b.get(1), Some(5.0));
        assert_eq!(b.get(7), Some(6.0));
    }

    #[test]
    fn group_means_frame_layout() {
        let groups = vec![
            GroupSummary {
                species: "setosa".to_string(),
                count: 2,
                columns: vec![StatsCalculator::compute_descriptive_stats("a", &[1.0, 3.0])],
            },
            GroupSummary {
                species: "virginica".to_string(),
                count: 2,
                columns: vec![StatsCalculator::compute_descriptive_stats("a", &[5.0, 7.0])],
            },
        ];
        let df = group_means_frame(&groups).unwrap();

        assert_eq!(df.shape(), (2, 2));
        let a = df.column("a").unwrap().f64().unwrap();
        assert_eq!(a.get(0), Some(2.0));
        assert_eq!(a.get(1), Some(6.0));
    }
}
