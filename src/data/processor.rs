//! Data Processor Module
//! Handles label mapping and data cleaning.

use polars::prelude::*;

use super::iris::TARGET_NAMES;
use super::{LoaderError, SPECIES_COLUMN, TARGET_COLUMN};

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Species name for a class label.
    pub fn species_for(target: i64) -> Option<&'static str> {
        usize::try_from(target)
            .ok()
            .and_then(|idx| TARGET_NAMES.get(idx))
            .copied()
    }

    /// Append the species column derived from the class label.
    ///
    /// A missing label maps to a missing species; a label with no species
    /// fails the whole frame.
    pub fn attach_species(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        let species = df
            .column(TARGET_COLUMN)?
            .i64()?
            .into_iter()
            .map(|target| match target {
                Some(t) => Self::species_for(t)
                    .map(Some)
                    .ok_or(LoaderError::UnknownLabel(t)),
                None => Ok(None),
            })
            .collect::<Result<Vec<Option<&str>>, LoaderError>>()?;

        df.with_column(Column::new(SPECIES_COLUMN.into(), species))?;
        Ok(df)
    }

    /// Drop every row that has a missing value in any column.
    ///
    /// Returns the cleaned frame and the number of rows removed.
    pub fn clean(df: &DataFrame) -> Result<(DataFrame, usize), LoaderError> {
        let mut keep = BooleanChunked::full("keep".into(), true, df.height());
        for col in df.get_columns() {
            keep = &keep & &col.as_materialized_series().is_not_null();
        }

        let cleaned = df.filter(&keep)?;
        let dropped = df.height() - cleaned.height();
        Ok((cleaned, dropped))
    }

    /// Null count for each column, in column order.
    pub fn missing_counts(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(targets: Vec<Option<i64>>) -> DataFrame {
        DataFrame::new(vec![Column::new(TARGET_COLUMN.into(), targets)]).unwrap()
    }

    fn species_of(df: &DataFrame) -> Vec<Option<String>> {
        df.column(SPECIES_COLUMN)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|s| s.map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn species_lookup_is_fixed() {
        assert_eq!(DataProcessor::species_for(0), Some("setosa"));
        assert_eq!(DataProcessor::species_for(1), Some("versicolor"));
        assert_eq!(DataProcessor::species_for(2), Some("virginica"));
        assert_eq!(DataProcessor::species_for(3), None);
        assert_eq!(DataProcessor::species_for(-1), None);
    }

    #[test]
    fn attach_species_maps_each_label() {
        let df = DataProcessor::attach_species(labels(vec![Some(2), Some(0), Some(1)])).unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(
            species_of(&df),
            vec![
                Some("virginica".to_string()),
                Some("setosa".to_string()),
                Some("versicolor".to_string()),
            ]
        );
    }

    #[test]
    fn attach_species_keeps_missing_label_missing() {
        let df = DataProcessor::attach_species(labels(vec![Some(0), None])).unwrap();
        assert_eq!(species_of(&df), vec![Some("setosa".to_string()), None]);
    }

    #[test]
    fn attach_species_rejects_unknown_label() {
        let err = DataProcessor::attach_species(labels(vec![Some(0), Some(7)])).unwrap_err();
        assert!(matches!(err, LoaderError::UnknownLabel(7)));
    }

    #[test]
    fn clean_drops_rows_with_missing_cells() {
        let df = DataFrame::new(vec![
            Column::new("a".into(), vec![Some(1.0), None, Some(3.0)]),
            Column::new("b".into(), vec![Some(1i64), Some(2), Some(3)]),
        ])
        .unwrap();

        let (cleaned, dropped) = DataProcessor::clean(&df).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(cleaned.height(), 2);

        let (again, dropped_again) = DataProcessor::clean(&cleaned).unwrap();
        assert_eq!(dropped_again, 0);
        assert!(again.equals(&cleaned));
    }

    #[test]
    fn missing_counts_per_column() {
        let df = DataFrame::new(vec![
            Column::new("a".into(), vec![Some(1.0), None, None]),
            Column::new("b".into(), vec![Some(1i64), Some(2), Some(3)]),
        ])
        .unwrap();

        assert_eq!(
            DataProcessor::missing_counts(&df),
            vec![("a".to_string(), 2), ("b".to_string(), 0)]
        );
    }
}
