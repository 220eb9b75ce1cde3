//! Charts module - chart data, rendering and the visualization stage

mod plotter;
mod renderer;
mod visualizer;

pub use plotter::ChartData;
pub use renderer::{Figure, RenderError, StaticChartRenderer};
pub use visualizer::create_visualizations;
