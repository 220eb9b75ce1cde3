//! Iris Report - Dataset Exploration, Statistics & Charts
//!
//! Loads the bundled Iris dataset, prints descriptive statistics and shows
//! the standard set of charts.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use std::io::{self, Write};

use anyhow::Context;
use log::warn;

use charts::create_visualizations;
use config::ReportConfig;
use data::{BundledIris, DataLoader, LoadOutcome};
use gui::WindowSurface;
use stats::perform_basic_analysis;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ReportConfig::default();
    let mut out = io::stdout().lock();

    writeln!(out, "Starting data analysis...")?;

    // Task 1
    writeln!(out, "\n=== TASK 1: LOAD AND EXPLORE DATASET ===")?;
    let outcome = DataLoader::new(BundledIris, &config).load_and_explore(&mut out);
    if let LoadOutcome::NoData { reason } = &outcome {
        warn!("No dataset ({}), analysis and charts will be skipped", reason);
    }

    // Task 2
    writeln!(out, "\n=== TASK 2: BASIC DATA ANALYSIS ===")?;
    perform_basic_analysis(&outcome, &mut out).context("basic analysis failed")?;

    // Task 3
    writeln!(out, "\n=== TASK 3: DATA VISUALIZATION ===")?;
    out.flush()?;
    create_visualizations(&outcome, &config, &mut WindowSurface, &mut out)
        .context("visualization failed")?;

    writeln!(out, "\nAnalysis complete!")?;
    Ok(())
}
