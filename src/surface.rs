use egui::{Color32, Pos2, Rect, Vec2, pos2};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::error::CanvasResult;
use crate::frame::Frame;
use crate::raster::{self, BlendMode, CoverageMask, Dash};

/// Color of the alignment grid lines, rgba(0, 0, 0, 0.08)
pub const GRID_COLOR: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 20);

/// How a path is stroked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color32,
    /// Width in logical pixels
    pub width: f32,
    pub dash: Option<Dash>,
    pub blend: BlendMode,
}

impl StrokeStyle {
    pub fn solid(color: Color32, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
            blend: BlendMode::SourceOver,
        }
    }

    /// A stroke that removes pixels instead of painting them
    pub fn eraser(width: f32) -> Self {
        Self {
            color: Color32::BLACK,
            width,
            dash: None,
            blend: BlendMode::DestinationOut,
        }
    }

    pub fn with_dash(mut self, dash: Dash) -> Self {
        self.dash = Some(dash);
        self
    }
}

/// The alignment grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// Spacing in logical pixels
    pub step: f32,
    pub color: Color32,
}

impl GridSpec {
    pub fn new(step: f32) -> Self {
        Self { step, color: GRID_COLOR }
    }

    /// Vertical then horizontal lines covering `size`, in logical pixels
    pub fn lines(&self, size: Vec2) -> Vec<[Pos2; 2]> {
        let mut lines = Vec::new();
        if self.step <= 0.0 {
            return lines;
        }
        let mut x = 0.0;
        while x < size.x {
            lines.push([pos2(x, 0.0), pos2(x, size.y)]);
            x += self.step;
        }
        let mut y = 0.0;
        while y < size.y {
            lines.push([pos2(0.0, y), pos2(size.x, y)]);
            y += self.step;
        }
        lines
    }
}

/// Raw pixels copied out of a rectangle of the surface
#[derive(Clone, PartialEq)]
pub struct PixelRegion {
    x: u32,
    y: u32,
    pixels: RgbaImage,
}

impl PixelRegion {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

impl std::fmt::Debug for PixelRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelRegion")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("size", &[self.pixels.width(), self.pixels.height()])
            .finish()
    }
}

/// The one bitmap everything is drawn on.
///
/// Callers work in logical pixels. The bitmap itself is sized in physical
/// pixels (`logical * pixels_per_point`), and the conversion happens here and
/// nowhere else. Pixels may be transparent where the eraser has been; the
/// background color shows through them on screen and is baked in by
/// [`RasterSurface::snapshot`].
pub struct RasterSurface {
    pixels: RgbaImage,
    logical_size: Vec2,
    pixels_per_point: f32,
    background: Color32,
    /// Bumped on every pixel mutation so views know when to re-upload
    revision: u64,
}

fn physical_dimensions(logical_size: Vec2, pixels_per_point: f32) -> (u32, u32) {
    let width = (logical_size.x * pixels_per_point).floor().max(0.0) as u32;
    let height = (logical_size.y * pixels_per_point).floor().max(0.0) as u32;
    (width, height)
}

fn opaque(color: Color32) -> Rgba<u8> {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    Rgba([r, g, b, 255])
}

impl RasterSurface {
    pub fn new(logical_size: Vec2, pixels_per_point: f32, background: Color32) -> Self {
        let (width, height) = physical_dimensions(logical_size, pixels_per_point);
        Self {
            pixels: RgbaImage::from_pixel(width, height, opaque(background)),
            logical_size,
            pixels_per_point,
            background,
            revision: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn logical_size(&self) -> Vec2 {
        self.logical_size
    }

    pub fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The live bitmap, unflattened
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// The pixel under a logical position
    pub fn pixel_at(&self, logical: Pos2) -> Option<Rgba<u8>> {
        let p = self.to_physical(logical);
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let (x, y) = (p.x as u32, p.y as u32);
        (x < self.width() && y < self.height()).then(|| *self.pixels.get_pixel(x, y))
    }

    pub fn has_area(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    pub fn to_physical(&self, logical: Pos2) -> Pos2 {
        pos2(logical.x * self.pixels_per_point, logical.y * self.pixels_per_point)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Resize to a new layout size and density. Existing pixels are kept,
    /// anchored at the origin and resampled when the density changes so they
    /// stay at the same logical position, then composited over the background so newly
    /// exposed or previously erased areas show the background color.
    pub fn resize(&mut self, logical_size: Vec2, pixels_per_point: f32) {
        let (width, height) = physical_dimensions(logical_size, pixels_per_point);
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to zero-area surface {logical_size:?}");
            return;
        }
        if (width, height) == (self.width(), self.height()) && pixels_per_point == self.pixels_per_point {
            self.logical_size = logical_size;
            return;
        }
        log::info!(
            "Resizing surface {}x{} -> {width}x{height} ({pixels_per_point} px/pt)",
            self.width(),
            self.height()
        );
        let mut resized = RgbaImage::from_pixel(width, height, opaque(self.background));
        if pixels_per_point == self.pixels_per_point || !self.has_area() {
            raster::draw_over(&mut resized, &self.pixels);
        } else {
            // Keep content at the same logical position under the new density
            let scale = pixels_per_point / self.pixels_per_point;
            let scaled_width = ((self.width() as f32 * scale).round() as u32).max(1);
            let scaled_height = ((self.height() as f32 * scale).round() as u32).max(1);
            let scaled = imageops::resize(&self.pixels, scaled_width, scaled_height, FilterType::Triangle);
            raster::draw_over(&mut resized, &scaled);
        }
        self.pixels = resized;
        self.logical_size = logical_size;
        self.pixels_per_point = pixels_per_point;
        self.touch();
    }

    /// Paint `color` over the whole surface and remember it as the
    /// background for later resizes, clears and snapshots.
    pub fn fill_background(&mut self, color: Color32) {
        self.background = color;
        let source = color.to_srgba_unmultiplied();
        for pixel in self.pixels.pixels_mut() {
            raster::blend_pixel(pixel, source, 1.0, BlendMode::SourceOver);
        }
        self.touch();
    }

    /// Wipe everything back to the background color
    pub fn clear(&mut self) {
        self.pixels = RgbaImage::from_pixel(self.width(), self.height(), Rgba([0, 0, 0, 0]));
        self.fill_background(self.background);
    }

    /// The bitmap composited over the background
    pub fn flattened(&self) -> RgbaImage {
        raster::flatten_over(&self.pixels, self.background)
    }

    /// The flattened bitmap with the grid on top, as shown and exported
    pub fn composed(&self, grid: Option<GridSpec>) -> RgbaImage {
        let mut image = self.flattened();
        if let Some(grid) = grid {
            let pieces: Vec<Vec<Pos2>> = grid
                .lines(self.logical_size)
                .iter()
                .map(|line| line.iter().map(|p| self.to_physical(*p)).collect())
                .collect();
            stroke_pieces(&mut image, &pieces, 0.5 * self.pixels_per_point, grid.color, BlendMode::SourceOver);
        }
        image
    }

    /// Encode the current content with the background baked in
    pub fn snapshot(&self) -> CanvasResult<Frame> {
        Frame::encode(&self.flattened())
    }

    /// Replace the content with a snapshot. The frame is decoded before
    /// anything is touched, so a bad frame leaves the surface as it was.
    pub fn restore(&mut self, frame: &Frame) -> CanvasResult<()> {
        if !self.has_area() {
            return Ok(());
        }
        let decoded = frame.decode()?;
        let mut restored = RgbaImage::from_pixel(self.width(), self.height(), opaque(self.background));
        raster::draw_over(&mut restored, &decoded);
        self.pixels = restored;
        self.touch();
        Ok(())
    }

    /// Copy the raw pixels under a logical rectangle
    pub fn capture_pixels(&self, area: Rect) -> PixelRegion {
        let min = self.to_physical(area.min);
        let max = self.to_physical(area.max);
        let x = (min.x.floor().max(0.0) as u32).min(self.width());
        let y = (min.y.floor().max(0.0) as u32).min(self.height());
        let right = (max.x.ceil().max(0.0) as u32).min(self.width());
        let bottom = (max.y.ceil().max(0.0) as u32).min(self.height());
        let pixels = imageops::crop_imm(
            &self.pixels,
            x,
            y,
            right.saturating_sub(x),
            bottom.saturating_sub(y),
        )
        .to_image();
        PixelRegion { x, y, pixels }
    }

    /// Copy the raw pixels of the whole surface
    pub fn capture_all(&self) -> PixelRegion {
        PixelRegion {
            x: 0,
            y: 0,
            pixels: self.pixels.clone(),
        }
    }

    /// Write captured pixels back exactly, without blending
    pub fn put_pixels(&mut self, region: &PixelRegion) {
        imageops::replace(&mut self.pixels, &region.pixels, region.x as i64, region.y as i64);
        self.touch();
    }

    /// Stroke a polyline given in logical coordinates
    pub fn stroke_polyline(&mut self, points: &[Pos2], style: &StrokeStyle) {
        let scale = self.pixels_per_point;
        let physical: Vec<Pos2> = points.iter().map(|p| self.to_physical(*p)).collect();
        let pieces = match style.dash {
            Some(dash) => raster::dash_polyline(&physical, dash.scaled(scale)),
            None => vec![physical],
        };
        if stroke_pieces(&mut self.pixels, &pieces, style.width * scale / 2.0, style.color, style.blend) {
            self.touch();
        }
    }

    /// Fill a logical rectangle, normal composition
    pub fn fill_rect(&mut self, area: Rect, color: Color32) {
        let (min, max) = (self.to_physical(area.min), self.to_physical(area.max));
        let Some(mut mask) = CoverageMask::new(min, max, self.width(), self.height()) else {
            return;
        };
        mask.fill_rect(min, max);
        mask.composite(&mut self.pixels, color, BlendMode::SourceOver);
        self.touch();
    }

    /// Composite a mask built in physical coordinates
    pub fn composite_mask(&mut self, mask: &CoverageMask, color: Color32, blend: BlendMode) {
        mask.composite(&mut self.pixels, color, blend);
        self.touch();
    }

    /// The raw bitmap as an egui image, for display over a background fill
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(
            [self.width() as usize, self.height() as usize],
            self.pixels.as_raw(),
        )
    }
}

/// Stroke every piece into one mask and composite it once.
/// Returns false when nothing landed on the image.
fn stroke_pieces(image: &mut RgbaImage, pieces: &[Vec<Pos2>], half_width: f32, color: Color32, blend: BlendMode) -> bool {
    let all: Vec<Pos2> = pieces.iter().flatten().copied().collect();
    let Some(mut mask) = CoverageMask::around(&all, half_width, image.width(), image.height()) else {
        return false;
    };
    for piece in pieces {
        mask.stamp_polyline(piece, half_width);
    }
    mask.composite(image, color, blend);
    true
}
