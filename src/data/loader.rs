//! Dataset Loader Module
//! Builds the labeled Iris DataFrame from a source and prints a first look at it.

use std::io::Write;

use log::{debug, error, info, warn};
use polars::prelude::*;
use thiserror::Error;

use super::{DataProcessor, DatasetSource, IrisDataset, LoadOutcome, RawTable, TARGET_COLUMN};
use crate::config::ReportConfig;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[allow(dead_code)]
    #[error("Source unavailable: {0}")]
    Source(String),
    #[error("Column '{column}' has {found} entries, expected {expected}")]
    ShapeMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("Expected column '{expected}', found '{found}'")]
    UnexpectedColumn { expected: String, found: String },
    #[error("Unknown class label: {0}")]
    UnknownLabel(i64),
}

/// Loads a dataset source into an `IrisDataset`, reporting on the way.
pub struct DataLoader<S> {
    source: S,
    preview_rows: usize,
}

impl<S: DatasetSource> DataLoader<S> {
    pub fn new(source: S, config: &ReportConfig) -> Self {
        Self {
            source,
            preview_rows: config.preview_rows,
        }
    }

    /// Load, explore and clean the dataset.
    ///
    /// Any failure is reported to `out` and turned into `LoadOutcome::NoData`;
    /// nothing past this point sees the error.
    pub fn load_and_explore<W: Write>(&self, out: &mut W) -> LoadOutcome {
        match self.try_load(out) {
            Ok(dataset) => {
                info!(
                    "Loaded {} rows, {} columns from {}",
                    dataset.len(),
                    dataset.column_names().len(),
                    self.source.name()
                );
                LoadOutcome::Loaded(dataset)
            }
            Err(e) => {
                error!("Loading from {} failed: {}", self.source.name(), e);
                if let Err(write_err) = writeln!(out, "Error loading dataset: {}", e) {
                    warn!("Could not report load failure: {}", write_err);
                }
                LoadOutcome::NoData {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn try_load<W: Write>(&self, out: &mut W) -> Result<IrisDataset, LoaderError> {
        let raw = self.source.fetch()?;
        raw.validate()?;
        let df = DataProcessor::attach_species(Self::build_frame(raw)?)?;

        writeln!(out, "\nFirst {} rows of the dataset:", self.preview_rows)?;
        writeln!(out, "{}", df.head(Some(self.preview_rows)))?;

        writeln!(out, "\nDataset information:")?;
        Self::write_info(&df, out)?;

        writeln!(out, "\nMissing values per column:")?;
        Self::write_missing_counts(&df, out)?;

        let (cleaned, dropped) = DataProcessor::clean(&df)?;
        if dropped > 0 {
            warn!("Dropped {} rows with missing values", dropped);
        } else {
            debug!("No missing values, cleaning left {} rows", cleaned.height());
        }

        Ok(IrisDataset::from_frame(cleaned))
    }

    /// Assemble the feature columns and the label column into a DataFrame.
    fn build_frame(raw: RawTable) -> Result<DataFrame, LoaderError> {
        let mut columns: Vec<Column> = raw
            .feature_names
            .iter()
            .zip(raw.features)
            .map(|(name, values)| Column::new(name.as_str().into(), values))
            .collect();
        columns.push(Column::new(TARGET_COLUMN.into(), raw.target));

        Ok(DataFrame::new(columns)?)
    }

    /// Structural summary: entries, and per column its non-null count and dtype.
    fn write_info<W: Write>(df: &DataFrame, out: &mut W) -> std::io::Result<()> {
        let rows = df.height();
        if rows == 0 {
            writeln!(out, "Index: 0 entries")?;
        } else {
            writeln!(out, "RangeIndex: {} entries, 0 to {}", rows, rows - 1)?;
        }
        writeln!(out, "Data columns (total {} columns):", df.width())?;

        let name_w = df
            .get_column_names()
            .iter()
            .map(|s| s.len())
            .max()
            .unwrap_or(0)
            .max("Column".len());

        writeln!(
            out,
            " {:<3} {:<name_w$}  {:<14}  Dtype",
            "#",
            "Column",
            "Non-Null Count"
        )?;
        writeln!(
            out,
            " {:<3} {:<name_w$}  {:<14}  -----",
            "---",
            "------",
            "--------------"
        )?;

        for (i, col) in df.get_columns().iter().enumerate() {
            let non_null = format!("{} non-null", col.len() - col.null_count());
            writeln!(
                out,
                " {:<3} {:<name_w$}  {:<14}  {}",
                i,
                col.name().as_str(),
                non_null,
                col.dtype()
            )?;
        }
        Ok(())
    }

    fn write_missing_counts<W: Write>(df: &DataFrame, out: &mut W) -> std::io::Result<()> {
        let counts = DataProcessor::missing_counts(df);
        let name_w = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, count) in counts {
            writeln!(out, "{:<name_w$}    {}", name, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::iris::FEATURE_NAMES;
    use crate::data::{BundledIris, SPECIES_COLUMN};
    use std::collections::BTreeMap;

    struct UnavailableSource;

    impl DatasetSource for UnavailableSource {
        fn name(&self) -> &str {
            "unavailable"
        }

        fn fetch(&self) -> Result<RawTable, LoaderError> {
            Err(LoaderError::Source("resource not found".to_string()))
        }
    }

    /// Bundled data with one edit applied.
    struct PatchedIris(fn(&mut RawTable));

    impl DatasetSource for PatchedIris {
        fn name(&self) -> &str {
            "patched iris"
        }

        fn fetch(&self) -> Result<RawTable, LoaderError> {
            let mut raw = BundledIris.fetch()?;
            (self.0)(&mut raw);
            Ok(raw)
        }
    }

    fn load<S: DatasetSource>(source: S) -> (LoadOutcome, String) {
        let loader = DataLoader::new(source, &ReportConfig::default());
        let mut out = Vec::new();
        let outcome = loader.load_and_explore(&mut out);
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn bundled_load_has_150_rows_and_6_columns() {
        let (outcome, _) = load(BundledIris);
        let dataset = outcome.dataset().expect("bundled data loads");

        assert_eq!(dataset.len(), 150);
        let mut expected: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        expected.push(TARGET_COLUMN.to_string());
        expected.push(SPECIES_COLUMN.to_string());
        assert_eq!(dataset.column_names(), expected);
    }

    #[test]
    fn labels_split_evenly_and_first_row_is_setosa() {
        let (outcome, _) = load(BundledIris);
        let dataset = outcome.dataset().unwrap();

        let species = dataset.species().unwrap();
        assert_eq!(species[0], "setosa");

        let mut per_label: BTreeMap<i64, usize> = BTreeMap::new();
        for t in dataset.targets().unwrap() {
            *per_label.entry(t).or_default() += 1;
        }
        assert_eq!(per_label, BTreeMap::from([(0, 50), (1, 50), (2, 50)]));
    }

    #[test]
    fn species_follows_target() {
        let (outcome, _) = load(BundledIris);
        let dataset = outcome.dataset().unwrap();

        let targets = dataset.targets().unwrap();
        let species = dataset.species().unwrap();
        for (target, species) in targets.into_iter().zip(species) {
            assert_eq!(DataProcessor::species_for(target), Some(species.as_str()));
        }
    }

    #[test]
    fn cleaning_is_a_no_op_on_bundled_data() {
        let (outcome, _) = load(BundledIris);
        let dataset = outcome.dataset().unwrap();

        let (cleaned, dropped) = DataProcessor::clean(dataset.frame()).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(cleaned.shape(), dataset.frame().shape());
        assert_eq!(cleaned.get_column_names(), dataset.frame().get_column_names());
    }

    #[test]
    fn exploration_output_sections() {
        let (_, text) = load(BundledIris);

        assert!(text.contains("First 5 rows of the dataset:"));
        assert!(text.contains("Dataset information:"));
        assert!(text.contains("RangeIndex: 150 entries, 0 to 149"));
        assert!(text.contains("Data columns (total 6 columns):"));
        assert!(text.contains("Missing values per column:"));
        assert!(!text.contains("Error loading dataset"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_report_write_still_yields_no_data() {
        let loader = DataLoader::new(UnavailableSource, &ReportConfig::default());
        match loader.load_and_explore(&mut BrokenPipe) {
            LoadOutcome::NoData { reason } => assert!(reason.contains("resource not found")),
            LoadOutcome::Loaded(_) => panic!("expected the no-data sentinel"),
        }
    }

    #[test]
    fn unavailable_source_yields_no_data() {
        let (outcome, text) = load(UnavailableSource);

        match outcome {
            LoadOutcome::NoData { reason } => assert!(reason.contains("resource not found")),
            LoadOutcome::Loaded(_) => panic!("expected the no-data sentinel"),
        }
        assert!(text.starts_with("Error loading dataset: "));
        assert!(!text.contains("First 5 rows"));
    }

    #[test]
    fn unknown_label_yields_no_data() {
        let (outcome, text) = load(PatchedIris(|raw| raw.target[10] = Some(5)));

        assert!(outcome.dataset().is_none());
        assert!(text.contains("Unknown class label: 5"));
    }

    #[test]
    fn short_column_yields_no_data() {
        let (outcome, _) = load(PatchedIris(|raw| {
            raw.features[0].truncate(100);
        }));

        assert!(outcome.dataset().is_none());
    }

    #[test]
    fn missing_measurement_row_is_dropped() {
        let (outcome, text) = load(PatchedIris(|raw| raw.features[1][3] = None));
        let dataset = outcome.dataset().unwrap();

        assert_eq!(dataset.len(), 149);
        assert!(text.contains("RangeIndex: 150 entries, 0 to 149"));
        assert!(text.contains("149 non-null"));
    }

    #[test]
    fn missing_label_row_is_dropped() {
        let (outcome, _) = load(PatchedIris(|raw| raw.target[0] = None));
        let dataset = outcome.dataset().unwrap();

        assert_eq!(dataset.len(), 149);
        assert_eq!(dataset.species().unwrap().len(), 149);
    }
}
