//! Report settings.

/// Settings for the report run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Rows shown in the dataset preview.
    pub preview_rows: usize,
    /// Bins in the sepal width histogram.
    pub histogram_bins: usize,
    /// Evaluation points along each density curve.
    pub kde_points: usize,
    /// Pixel size of the 2x2 overview figure.
    pub overview_size: (u32, u32),
    /// Pixel size of the pairwise grid figure.
    pub pairplot_size: (u32, u32),
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            histogram_bins: 15,
            kde_points: 200,
            overview_size: (1500, 1200),
            pairplot_size: (1200, 1200),
        }
    }
}
