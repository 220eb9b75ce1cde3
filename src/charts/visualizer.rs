//! Visualization stage: render the report figures and hand them to a surface.

use std::io::Write;

use log::info;
use polars::prelude::PolarsError;
use thiserror::Error;

use super::{ChartData, RenderError, StaticChartRenderer};
use crate::config::ReportConfig;
use crate::data::LoadOutcome;
use crate::gui::{DisplayError, FigureSurface};

#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Display(#[from] DisplayError),
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Render the overview and pairwise figures and present them in order.
///
/// Does nothing when the load stage produced no data.
pub fn create_visualizations<S, W>(
    outcome: &LoadOutcome,
    config: &ReportConfig,
    surface: &mut S,
    out: &mut W,
) -> Result<(), VisualizationError>
where
    S: FigureSurface,
    W: Write,
{
    let Some(dataset) = outcome.dataset() else {
        return Ok(());
    };

    let data = ChartData::from_dataset(dataset, config)?;

    let overview = StaticChartRenderer::render_overview(&data, config.overview_size)?;
    info!("Presenting '{}'", overview.title);
    surface.present(overview)?;

    writeln!(out, "\nGenerating pairplot (this may take a moment)...")?;
    out.flush()?;

    let pairplot = StaticChartRenderer::render_pairplot(&data, config.pairplot_size)?;
    info!("Presenting '{}'", pairplot.title);
    surface.present(pairplot)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::renderer::{OVERVIEW_TITLE, PAIRPLOT_TITLE};
    use crate::charts::Figure;
    use crate::data::{BundledIris, DataLoader};

    #[derive(Default)]
    struct RecordingSurface {
        titles: Vec<String>,
        figures: Vec<Figure>,
    }

    impl FigureSurface for RecordingSurface {
        fn present(&mut self, figure: Figure) -> Result<(), DisplayError> {
            self.titles.push(figure.title.clone());
            self.figures.push(figure);
            Ok(())
        }
    }

    const NOTICE: &str = "Generating pairplot (this may take a moment)...";

    #[test]
    fn loaded_data_presents_overview_then_pairplot() {
        let config = ReportConfig::default();
        let outcome = DataLoader::new(BundledIris, &config).load_and_explore(&mut std::io::sink());
        let mut surface = RecordingSurface::default();
        let mut out = Vec::new();

        create_visualizations(&outcome, &config, &mut surface, &mut out).unwrap();

        assert_eq!(surface.titles, vec![OVERVIEW_TITLE, PAIRPLOT_TITLE]);
        let sizes: Vec<(u32, u32)> = surface.figures.iter().map(|f| f.image.dimensions()).collect();
        assert_eq!(sizes, vec![config.overview_size, config.pairplot_size]);
        for figure in &surface.figures {
            assert!(
                figure.image.pixels().any(|p| p.0 != [255, 255, 255]),
                "'{}' is blank",
                figure.title
            );
        }

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches(NOTICE).count(), 1);
        assert_eq!(text.trim(), NOTICE);
    }

    #[test]
    fn no_data_renders_nothing() {
        let outcome = LoadOutcome::NoData {
            reason: "resource not found".to_string(),
        };
        let mut surface = RecordingSurface::default();
        let mut out = Vec::new();

        create_visualizations(&outcome, &ReportConfig::default(), &mut surface, &mut out).unwrap();

        assert!(surface.titles.is_empty());
        assert!(out.is_empty());
    }
}
