//! Presentation boundary for rendered figures.

use thiserror::Error;

use crate::charts::Figure;

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Figure window failed: {0}")]
    Window(String),
}

// eframe::Error can hold raw window handles, which are not Send + Sync.
impl From<eframe::Error> for DisplayError {
    fn from(e: eframe::Error) -> Self {
        DisplayError::Window(e.to_string())
    }
}

/// Something that can show a rendered figure to the user.
pub trait FigureSurface {
    /// Show `figure`; returns once the figure has been dismissed.
    fn present(&mut self, figure: Figure) -> Result<(), DisplayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_error_keeps_eframe_message() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "no display");
        let err = DisplayError::from(eframe::Error::AppCreation(Box::new(cause)));
        assert!(err.to_string().starts_with("Figure window failed: "));
        assert!(err.to_string().contains("no display"));
    }

    #[test]
    fn display_error_crosses_threads() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<DisplayError>();
    }
}
