//! Data module - bundled dataset, loading and cleaning

mod dataset;
pub mod iris;
mod loader;
mod processor;
mod source;

pub use dataset::{IrisDataset, LoadOutcome};
pub use loader::{DataLoader, LoaderError};
pub use processor::DataProcessor;
pub use source::{BundledIris, DatasetSource, RawTable};

/// Name of the integer class label column.
pub const TARGET_COLUMN: &str = "target";
/// Name of the derived species column.
pub const SPECIES_COLUMN: &str = "species";
