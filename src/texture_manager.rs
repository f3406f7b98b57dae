use egui::{Context, TextureHandle, TextureId, TextureOptions};

use crate::surface::RasterSurface;

/// GPU copy of the raster surface, re-uploaded only when the surface
/// revision moves
#[derive(Default)]
pub struct TextureManager {
    texture: Option<TextureHandle>,
    revision: Option<u64>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The texture showing `surface`'s current pixels
    pub fn canvas_texture(&mut self, ctx: &Context, surface: &RasterSurface) -> TextureId {
        let stale = self.revision != Some(surface.revision());
        match &mut self.texture {
            Some(handle) if stale => {
                handle.set(surface.to_color_image(), TextureOptions::LINEAR);
                log::trace!("Re-uploaded canvas texture");
            }
            Some(_) => {}
            None => {
                self.texture = Some(ctx.load_texture("canvas", surface.to_color_image(), TextureOptions::LINEAR));
            }
        }
        self.revision = Some(surface.revision());
        self.texture
            .as_ref()
            .map_or(TextureId::default(), TextureHandle::id)
    }
}
