use egui::{Color32, Rect, Sense, Stroke, pos2};

use crate::editor::Editor;
use crate::texture_manager::TextureManager;

/// Where the canvas landed this frame
#[derive(Debug, Clone, Copy)]
pub struct CanvasView {
    /// Screen rectangle of the canvas, in points
    pub rect: Rect,
    /// The pointer is over the canvas itself and not a window above it
    pub hovered: bool,
}

/// Paint the canvas: background, raster, then the grid on top.
pub fn central_panel(editor: &Editor, textures: &mut TextureManager, ctx: &egui::Context) -> CanvasView {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
            let rect = response.rect;
            let surface = editor.surface();

            // Erased pixels are transparent; the background shows through
            painter.rect_filled(rect, 0.0, surface.background());

            let ppp = surface.pixels_per_point();
            let image_size = egui::vec2(surface.width() as f32 / ppp, surface.height() as f32 / ppp);
            let texture = textures.canvas_texture(ctx, surface);
            painter.image(
                texture,
                Rect::from_min_size(rect.min, image_size),
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );

            if let Some(grid) = editor.grid() {
                let stroke = Stroke::new(1.0, grid.color);
                for [a, b] in grid.lines(rect.size()) {
                    painter.line_segment([rect.min + a.to_vec2(), rect.min + b.to_vec2()], stroke);
                }
            }

            if response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }

            CanvasView {
                rect,
                hovered: response.hovered(),
            }
        })
        .inner
}
