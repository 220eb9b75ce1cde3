//! Dataset Sources
//! The provider boundary: anything that can hand over the raw measurement
//! matrix and class labels.

use super::iris::{self, FEATURE_NAMES, MEASUREMENTS};
use super::LoaderError;

/// Raw table as handed over by a provider, before any frame is built.
///
/// Features are stored column-major; `features[j][i]` is feature `j` of row `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<Option<f64>>>,
    pub target: Vec<Option<i64>>,
}

impl RawTable {
    /// Number of rows, as given by the label vector.
    pub fn rows(&self) -> usize {
        self.target.len()
    }

    /// Check column names and that every column has one cell per row.
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.feature_names.len() != FEATURE_NAMES.len() {
            return Err(LoaderError::ShapeMismatch {
                column: "feature names".to_string(),
                expected: FEATURE_NAMES.len(),
                found: self.feature_names.len(),
            });
        }
        if let Some((expected, found)) = FEATURE_NAMES
            .iter()
            .zip(&self.feature_names)
            .find(|(expected, found)| **expected != found.as_str())
        {
            return Err(LoaderError::UnexpectedColumn {
                expected: expected.to_string(),
                found: found.clone(),
            });
        }
        if self.features.len() != self.feature_names.len() {
            return Err(LoaderError::ShapeMismatch {
                column: "feature matrix".to_string(),
                expected: self.feature_names.len(),
                found: self.features.len(),
            });
        }
        for (name, values) in self.feature_names.iter().zip(&self.features) {
            if values.len() != self.rows() {
                return Err(LoaderError::ShapeMismatch {
                    column: name.clone(),
                    expected: self.rows(),
                    found: values.len(),
                });
            }
        }
        Ok(())
    }
}

/// Provider of the raw dataset.
pub trait DatasetSource {
    /// Short human readable name used in logs.
    fn name(&self) -> &str;

    fn fetch(&self) -> Result<RawTable, LoaderError>;
}

/// The Iris measurements compiled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledIris;

impl DatasetSource for BundledIris {
    fn name(&self) -> &str {
        "bundled iris"
    }

    fn fetch(&self) -> Result<RawTable, LoaderError> {
        let features = (0..FEATURE_NAMES.len())
            .map(|j| MEASUREMENTS.iter().map(|row| Some(row[j])).collect())
            .collect();
        let target = (0..MEASUREMENTS.len()).map(|i| Some(iris::target(i))).collect();

        Ok(RawTable {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            features,
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_source_has_iris_shape() {
        let raw = BundledIris.fetch().unwrap();
        assert_eq!(raw.rows(), 150);
        assert_eq!(raw.features.len(), 4);
        assert!(raw.features.iter().all(|col| col.len() == 150));
        assert!(raw.validate().is_ok());
    }

    #[test]
    fn bundled_source_first_row() {
        let raw = BundledIris.fetch().unwrap();
        let first: Vec<f64> = raw.features.iter().map(|col| col[0].unwrap()).collect();
        assert_eq!(first, vec![5.1, 3.5, 1.4, 0.2]);
        assert_eq!(raw.target[0], Some(0));
        assert_eq!(raw.target[149], Some(2));
    }

    #[test]
    fn validate_rejects_short_column() {
        let mut raw = BundledIris.fetch().unwrap();
        raw.features[2].pop();
        match raw.validate() {
            Err(LoaderError::ShapeMismatch {
                column,
                expected,
                found,
            }) => {
                assert_eq!(column, "petal length (cm)");
                assert_eq!(expected, 150);
                assert_eq!(found, 149);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_renamed_column() {
        let mut raw = BundledIris.fetch().unwrap();
        raw.feature_names[0] = "sepal_length".to_string();
        assert!(matches!(
            raw.validate(),
            Err(LoaderError::UnexpectedColumn { .. })
        ));
    }
}
