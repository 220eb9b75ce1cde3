//! GUI module - figure windows

mod surface;
mod viewer;

pub use surface::{DisplayError, FigureSurface};
pub use viewer::WindowSurface;
