//! Figure Viewer
//! A native window showing one rendered figure, scaled to fit.

use eframe::egui;
use egui::{ColorImage, TextureHandle, TextureOptions};
use log::info;

use super::{DisplayError, FigureSurface};
use crate::charts::Figure;

/// Largest initial window size; bigger figures are scaled down to fit.
const MAX_WINDOW: [f32; 2] = [1400.0, 900.0];

/// Window content for a single figure.
pub struct FigureViewer {
    texture: TextureHandle,
}

impl FigureViewer {
    pub fn new(cc: &eframe::CreationContext<'_>, figure: Figure) -> Self {
        let size = [figure.image.width() as usize, figure.image.height() as usize];
        let pixels = ColorImage::from_rgb(size, figure.image.as_raw());
        let texture = cc
            .egui_ctx
            .load_texture(figure.title, pixels, TextureOptions::LINEAR);
        Self { texture }
    }
}

impl eframe::App for FigureViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let size = self.texture.size_vec2();
            let scale = (available.x / size.x).min(available.y / size.y).min(1.0);
            ui.vertical_centered(|ui| {
                ui.image((self.texture.id(), size * scale));
            });
        });
    }
}

/// Shows each figure in its own native window, blocking until it is closed.
#[derive(Debug, Default)]
pub struct WindowSurface;

impl WindowSurface {
    fn window_size(figure: &Figure) -> [f32; 2] {
        let (w, h) = (figure.image.width() as f32, figure.image.height() as f32);
        let scale = (MAX_WINDOW[0] / w).min(MAX_WINDOW[1] / h).min(1.0);
        [w * scale, h * scale]
    }
}

impl FigureSurface for WindowSurface {
    fn present(&mut self, figure: Figure) -> Result<(), DisplayError> {
        let title = figure.title.clone();
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size(Self::window_size(&figure))
                .with_title(title.clone()),
            ..Default::default()
        };

        eframe::run_native(
            &title,
            options,
            Box::new(|cc| Ok(Box::new(FigureViewer::new(cc, figure)))),
        )?;

        info!("Closed '{}'", title);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn figure(width: u32, height: u32) -> Figure {
        Figure {
            title: "test".to_string(),
            image: RgbImage::new(width, height),
        }
    }

    #[test]
    fn large_figures_are_scaled_to_fit() {
        let [w, h] = WindowSurface::window_size(&figure(1500, 1200));
        assert!(w <= MAX_WINDOW[0] && h <= MAX_WINDOW[1]);
        assert!((w / h - 1500.0 / 1200.0).abs() < 1e-4);
    }

    #[test]
    fn small_figures_keep_their_size() {
        assert_eq!(WindowSurface::window_size(&figure(600, 400)), [600.0, 400.0]);
    }
}
