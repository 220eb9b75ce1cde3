//! Static Chart Renderer
//! Draws the report figures into in-memory bitmaps with plotters.
//!
//! Figures:
//! 1. Overview, a 2x2 grid:
//!    - Sepal length by row index (line)
//!    - Average petal length by species (bars)
//!    - Sepal width distribution (histogram + density)
//!    - Sepal length vs petal length by species (scatter)
//! 2. Pairwise relationships, a 4x4 grid with densities on the diagonal

use image::RgbImage;
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use super::plotter::{ChartData, ChartPlotter, PairGridData, PairPanel};
use crate::data::iris::FEATURE_NAMES;

pub const OVERVIEW_TITLE: &str = "Iris Overview";
pub const PAIRPLOT_TITLE: &str = "Pairwise Relationships in Iris Dataset";

const FONT: &str = "sans-serif";
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);
const HIST_COLOR: RGBColor = RGBColor(31, 119, 180);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Bitmap of {width}x{height} could not be wrapped as an image")]
    Buffer { width: u32, height: u32 },
    #[error("No data for the {0} chart")]
    EmptySeries(&'static str),
}

fn drawing_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

/// A rendered figure ready to be shown.
#[derive(Debug, Clone)]
pub struct Figure {
    pub title: String,
    pub image: RgbImage,
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the 2x2 overview figure.
    pub fn render_overview(data: &ChartData, size: (u32, u32)) -> Result<Figure, RenderError> {
        Self::render(OVERVIEW_TITLE, size, |root| {
            let panels = root.split_evenly((2, 2));
            Self::draw_trend(&panels[0], &data.sepal_length_trend)?;
            Self::draw_species_bars(&panels[1], &data.petal_length_means)?;
            Self::draw_distribution(&panels[2], data)?;
            Self::draw_length_scatter(&panels[3], data)?;
            Ok(())
        })
    }

    /// Render the pairwise relationship grid.
    pub fn render_pairplot(data: &ChartData, size: (u32, u32)) -> Result<Figure, RenderError> {
        Self::render(PAIRPLOT_TITLE, size, |root| {
            let grid = root
                .titled(PAIRPLOT_TITLE, (FONT, 28))
                .map_err(drawing_error)?;
            let n = data.pairs.features.len();
            if n == 0 {
                return Err(RenderError::EmptySeries("pairwise"));
            }

            let panels = grid.split_evenly((n, n));
            let layout = ChartPlotter::pair_layout(n);
            for (idx, (panel, kind)) in panels.iter().zip(layout).enumerate() {
                let (row, col) = (idx / n, idx % n);
                match kind {
                    PairPanel::Density { feature } => Self::draw_pair_density(
                        panel,
                        &data.pairs,
                        feature,
                        row + 1 == n,
                        col == 0,
                    )?,
                    PairPanel::Scatter { x, y } => Self::draw_pair_scatter(
                        panel,
                        &data.pairs,
                        (x, y),
                        row + 1 == n,
                        col == 0,
                        row == 0 && col + 1 == n,
                    )?,
                }
            }
            Ok(())
        })
    }

    /// Draw into a white bitmap of `size` and wrap the result as a figure.
    fn render<F>(title: &str, size: (u32, u32), draw: F) -> Result<Figure, RenderError>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), RenderError>,
    {
        let (width, height) = size;
        let mut buffer = vec![255u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
            root.fill(&WHITE).map_err(drawing_error)?;
            draw(&root)?;
            root.present().map_err(drawing_error)?;
        }
        debug!("Rendered '{}' at {}x{}", title, width, height);

        let image =
            RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer { width, height })?;
        Ok(Figure {
            title: title.to_string(),
            image,
        })
    }

    fn draw_trend<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        points: &[(f64, f64)],
    ) -> Result<(), RenderError> {
        if points.is_empty() {
            return Err(RenderError::EmptySeries("sepal length trend"));
        }
        let ys: Vec<f64> = points.iter().map(|&(_, y)| y).collect();
        let (y_min, y_max) = ChartPlotter::padded_range(&ys);
        let x_max = (points.len().max(2) - 1) as f64;

        let mut chart = ChartBuilder::on(area)
            .caption("Sepal Length Trend (by index)", (FONT, 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..x_max, y_min..y_max)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .x_desc("Index (pseudo-time)")
            .y_desc("Sepal Length (cm)")
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), LINE_COLOR.stroke_width(2)))
            .map_err(drawing_error)?;
        Ok(())
    }

    fn draw_species_bars<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        means: &[(String, f64)],
    ) -> Result<(), RenderError> {
        if means.is_empty() {
            return Err(RenderError::EmptySeries("species bar"));
        }
        let top = means.iter().map(|&(_, m)| m).fold(0.0, f64::max) * 1.15;
        let last = means.len() as u32 - 1;

        let mut chart = ChartBuilder::on(area)
            .caption("Average Petal Length by Species", (FONT, 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0u32..last).into_segmented(), 0f64..top.max(1.0))
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("species")
            .y_desc("Petal Length (cm)")
            .x_label_formatter(&|v: &SegmentValue<u32>| match v {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => means
                    .get(*i as usize)
                    .map(|(name, _)| name.clone())
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style_func(|v, _| match v {
                        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                            ChartPlotter::get_bar_color(*i as usize).filled()
                        }
                        SegmentValue::Last => BLACK.filled(),
                    })
                    .margin(30)
                    .data(means.iter().enumerate().map(|(i, &(_, m))| (i as u32, m))),
            )
            .map_err(drawing_error)?;
        Ok(())
    }

    fn draw_distribution<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        data: &ChartData,
    ) -> Result<(), RenderError> {
        let bins = &data.sepal_width_bins;
        let density = &data.sepal_width_density;
        let (Some(&x_min), Some(&x_max)) = (bins.edges.first(), bins.edges.last()) else {
            return Err(RenderError::EmptySeries("sepal width histogram"));
        };
        let top = (bins.max_count() as f64).max(density.max_density()) * 1.1;

        let mut chart = ChartBuilder::on(area)
            .caption("Distribution of Sepal Width", (FONT, 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0f64..top.max(1.0))
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .x_desc("Sepal Width (cm)")
            .y_desc("Count")
            .draw()
            .map_err(drawing_error)?;

        chart
            .draw_series(bins.bars().map(|(left, right, count)| {
                Rectangle::new([(left, 0.0), (right, count as f64)], HIST_COLOR.mix(0.5).filled())
            }))
            .map_err(drawing_error)?;
        chart
            .draw_series(bins.bars().map(|(left, right, count)| {
                Rectangle::new([(left, 0.0), (right, count as f64)], WHITE.stroke_width(1))
            }))
            .map_err(drawing_error)?;

        debug!("Sepal width density bandwidth {:.4}", density.bandwidth);
        chart
            .draw_series(LineSeries::new(
                density.points.iter().copied(),
                HIST_COLOR.stroke_width(2),
            ))
            .map_err(drawing_error)?;
        Ok(())
    }

    fn draw_length_scatter<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        data: &ChartData,
    ) -> Result<(), RenderError> {
        let all: Vec<(f64, f64)> = data
            .length_scatter
            .iter()
            .flat_map(|s| s.points.iter().copied())
            .collect();
        if all.is_empty() {
            return Err(RenderError::EmptySeries("length scatter"));
        }
        let xs: Vec<f64> = all.iter().map(|&(x, _)| x).collect();
        let ys: Vec<f64> = all.iter().map(|&(_, y)| y).collect();
        let (x_min, x_max) = ChartPlotter::padded_range(&xs);
        let (y_min, y_max) = ChartPlotter::padded_range(&ys);

        let mut chart = ChartBuilder::on(area)
            .caption("Sepal Length vs Petal Length by Species", (FONT, 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .x_desc(FEATURE_NAMES[0])
            .y_desc(FEATURE_NAMES[2])
            .draw()
            .map_err(drawing_error)?;

        for (idx, series) in data.length_scatter.iter().enumerate() {
            let color = ChartPlotter::get_species_color(idx);
            chart
                .draw_series(
                    series
                        .points
                        .iter()
                        .map(|&point| Circle::new(point, 4, color.filled())),
                )
                .map_err(drawing_error)?
                .label(series.species.as_str())
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()
            .map_err(drawing_error)?;
        Ok(())
    }

    fn draw_pair_density<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        pairs: &PairGridData,
        feature: usize,
        x_label: bool,
        y_label: bool,
    ) -> Result<(), RenderError> {
        let (x_min, x_max) = pairs.ranges[feature];
        let curves = &pairs.densities[feature];
        let top = curves.iter().map(|c| c.max_density()).fold(0.0, f64::max) * 1.1;

        let mut chart = ChartBuilder::on(area)
            .margin(5)
            .x_label_area_size(if x_label { 30 } else { 15 })
            .y_label_area_size(if y_label { 40 } else { 25 })
            .build_cartesian_2d(x_min..x_max, 0f64..top.max(f64::EPSILON))
            .map_err(drawing_error)?;

        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh().label_style((FONT, 10));
        if x_label {
            mesh.x_desc(pairs.features[feature]);
        }
        if y_label {
            mesh.y_desc(pairs.features[feature]);
        }
        mesh.draw().map_err(drawing_error)?;

        for (idx, curve) in curves.iter().enumerate() {
            let color = ChartPlotter::get_species_color(idx);
            chart
                .draw_series(
                    AreaSeries::new(curve.points.iter().copied(), 0.0, &color.mix(0.25))
                        .border_style(color.stroke_width(2)),
                )
                .map_err(drawing_error)?;
        }
        Ok(())
    }

    fn draw_pair_scatter<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        pairs: &PairGridData,
        (x, y): (usize, usize),
        x_label: bool,
        y_label: bool,
        legend: bool,
    ) -> Result<(), RenderError> {
        let (x_min, x_max) = pairs.ranges[x];
        let (y_min, y_max) = pairs.ranges[y];

        let mut chart = ChartBuilder::on(area)
            .margin(5)
            .x_label_area_size(if x_label { 30 } else { 15 })
            .y_label_area_size(if y_label { 40 } else { 25 })
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(drawing_error)?;

        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh().label_style((FONT, 10));
        if x_label {
            mesh.x_desc(pairs.features[x]);
        }
        if y_label {
            mesh.y_desc(pairs.features[y]);
        }
        mesh.draw().map_err(drawing_error)?;

        for (idx, (species, group)) in pairs.species.iter().zip(&pairs.groups).enumerate() {
            let color = ChartPlotter::get_species_color(idx);
            chart
                .draw_series(
                    group[x]
                        .iter()
                        .zip(&group[y])
                        .map(|(&xv, &yv)| Circle::new((xv, yv), 2, color.mix(0.8).filled())),
                )
                .map_err(drawing_error)?
                .label(species.as_str())
                .legend(move |(lx, ly)| Circle::new((lx, ly), 4, color.filled()));
        }

        if legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .label_font((FONT, 12))
                .background_style(&WHITE.mix(0.85))
                .border_style(&BLACK)
                .draw()
                .map_err(drawing_error)?;
        }
        Ok(())
    }
}
