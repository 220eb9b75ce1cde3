//! Stats module - descriptive statistics and the analysis report

mod calculator;
mod report;

pub use calculator::{ColumnSummary, GroupSummary, StatsCalculator};
pub use report::perform_basic_analysis;
