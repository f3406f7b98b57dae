//! Floating text placement and glyph rasterization.
//!
//! A [`PendingText`] lives while the user types into the overlay. On commit
//! it is laid out into lines, optionally backed by a translucent plate, and
//! its glyphs are rasterized into the surface in the current stroke color.

use ab_glyph::{Font, FontArc, FontVec, GlyphId, PxScale, ScaleFont, point};
use egui::{Color32, Pos2, Rect, pos2, vec2};

use crate::raster::{BlendMode, CoverageMask};
use crate::style::{FontFamily, TextStyle};
use crate::surface::RasterSurface;

/// Line advance as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.25;

/// Color of the plate behind text, rgba(0, 0, 0, 0.25)
pub const PLATE_COLOR: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 64);

/// How far the plate starts up and to the left of the anchor
pub const PLATE_OFFSET: f32 = 8.0;
/// Total horizontal and vertical padding added to the plate
pub const PLATE_PADDING: [f32; 2] = [16.0, 12.0];

/// Glyph advance used when no font is available, as a fraction of the size
const FALLBACK_ADVANCE: f32 = 0.6;

/// Text being typed but not yet on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct PendingText {
    pub anchor: Pos2,
    pub content: String,
    pub style: TextStyle,
}

/// At most one pending text at a time
#[derive(Debug, Default)]
pub struct TextPlacement {
    pending: Option<PendingText>,
    /// Bumped on every open, so two placements at the same anchor differ
    generation: u64,
}

impl TextPlacement {
    /// Identifies the current placement for as long as it stays open
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<&PendingText> {
        self.pending.as_ref()
    }

    /// Open a new, empty placement. Hands back whatever was pending before
    /// so the caller can decide its fate.
    pub fn open(&mut self, anchor: Pos2, style: TextStyle) -> Option<PendingText> {
        log::debug!("Opening text placement at {anchor:?}");
        self.generation = self.generation.wrapping_add(1);
        self.pending.replace(PendingText {
            anchor,
            content: String::new(),
            style,
        })
    }

    pub fn set_content(&mut self, content: String) -> bool {
        match &mut self.pending {
            Some(pending) => {
                pending.content = content;
                true
            }
            None => false,
        }
    }

    /// Follow style changes made while the overlay is open
    pub fn refresh_style(&mut self, style: TextStyle) {
        if let Some(pending) = &mut self.pending {
            pending.style = style;
        }
    }

    /// Close the placement for committing
    pub fn take(&mut self) -> Option<PendingText> {
        self.pending.take()
    }

    /// Close the placement, dropping its content
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

/// Fonts used to rasterize placed text. Each family is a fallback chain;
/// a character uses the first font that has a glyph for it.
#[derive(Clone, Default)]
pub struct FontBook {
    proportional: Vec<FontArc>,
    monospace: Vec<FontArc>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("proportional", &self.proportional.len())
            .field("monospace", &self.monospace.len())
            .finish()
    }
}

impl FontBook {
    /// No fonts at all; layout falls back to fixed metrics and nothing is drawn
    pub fn empty() -> Self {
        Self::default()
    }

    /// The fonts egui ships with
    pub fn from_egui_defaults() -> Self {
        let definitions = egui::FontDefinitions::default();
        let load = |family: FontFamily| -> Vec<FontArc> {
            let Some(names) = definitions.families.get(&family.egui_family()) else {
                return Vec::new();
            };
            names
                .iter()
                .filter_map(|name| {
                    let data = definitions.font_data.get(name)?;
                    match FontVec::try_from_vec_and_index(data.font.to_vec(), data.index) {
                        Ok(font) => Some(FontArc::from(font)),
                        Err(err) => {
                            log::warn!("Skipping font {name}: {err}");
                            None
                        }
                    }
                })
                .collect()
        };
        let book = Self {
            proportional: load(FontFamily::Proportional),
            monospace: load(FontFamily::Monospace),
        };
        log::debug!("Loaded {book:?}");
        book
    }

    pub fn is_empty(&self) -> bool {
        self.proportional.is_empty() && self.monospace.is_empty()
    }

    /// The chain for `family`, or the other family's when it has none
    fn chain(&self, family: FontFamily) -> &[FontArc] {
        let (primary, other) = match family {
            FontFamily::Proportional => (&self.proportional, &self.monospace),
            FontFamily::Monospace => (&self.monospace, &self.proportional),
        };
        if primary.is_empty() { other } else { primary }
    }

    fn glyph_for(&self, family: FontFamily, c: char) -> Option<(&FontArc, GlyphId)> {
        let chain = self.chain(family);
        chain
            .iter()
            .map(|font| (font, font.glyph_id(c)))
            .find(|(_, id)| id.0 != 0)
            .or_else(|| chain.first().map(|font| (font, font.glyph_id(c))))
    }

    /// Horizontal advance of one line of text at `size` pixels per em
    pub fn measure(&self, line: &str, family: FontFamily, size: f32) -> f32 {
        if self.chain(family).is_empty() {
            return line.chars().count() as f32 * size * FALLBACK_ADVANCE;
        }
        let mut width = 0.0;
        let mut previous: Option<(&FontArc, GlyphId)> = None;
        for c in line.chars() {
            let Some((font, id)) = self.glyph_for(family, c) else {
                continue;
            };
            let scaled = font.as_scaled(em_scale(font, size));
            if let Some((prev_font, prev_id)) = previous {
                if std::ptr::eq(prev_font, font) {
                    width += scaled.kern(prev_id, id);
                }
            }
            width += scaled.h_advance(id);
            previous = Some((font, id));
        }
        width
    }
}

/// Scale that makes one em `size` pixels tall, the way CSS font sizes work
fn em_scale(font: &FontArc, size: f32) -> PxScale {
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    PxScale::from(size * font.height_unscaled() / units_per_em)
}

/// One line of laid out text, in logical pixels
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    /// Top-left corner; glyphs hang below it
    pub origin: Pos2,
    pub width: f32,
}

/// Where committed text lands
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub style: TextStyle,
    pub lines: Vec<TextLine>,
    /// Translucent backing rectangle, when enabled
    pub plate: Option<Rect>,
}

impl TextLayout {
    pub fn max_width(&self) -> f32 {
        self.lines.iter().map(|line| line.width).fold(0.0, f32::max)
    }
}

/// Lay out pending text. Returns `None` for empty or whitespace-only input.
pub fn layout(pending: &PendingText, fonts: &FontBook, with_plate: bool) -> Option<TextLayout> {
    let text = pending.content.trim();
    if text.is_empty() {
        return None;
    }
    if fonts.chain(pending.style.family).is_empty() {
        log::warn!("No font for {:?}, using fallback metrics", pending.style.family);
    }

    let line_height = pending.style.line_height();
    let lines: Vec<TextLine> = text
        .lines()
        .enumerate()
        .map(|(i, line)| TextLine {
            text: line.to_owned(),
            origin: pos2(pending.anchor.x, pending.anchor.y + i as f32 * line_height),
            width: fonts.measure(line, pending.style.family, pending.style.size),
        })
        .collect();

    let mut layout = TextLayout {
        style: pending.style,
        lines,
        plate: None,
    };
    if with_plate {
        let min = pending.anchor - vec2(PLATE_OFFSET, PLATE_OFFSET);
        let size = vec2(
            layout.max_width() + PLATE_PADDING[0],
            layout.lines.len() as f32 * line_height + PLATE_PADDING[1],
        );
        layout.plate = Some(Rect::from_min_size(min, size));
    }
    Some(layout)
}

/// Draw laid out text onto the surface: plate first, glyphs on top
pub fn rasterize(layout: &TextLayout, fonts: &FontBook, color: Color32, surface: &mut RasterSurface) {
    if let Some(plate) = layout.plate {
        surface.fill_rect(plate, PLATE_COLOR);
    }

    let family = layout.style.family;
    let ppp = surface.pixels_per_point();
    let size = layout.style.size * ppp;
    let Some(first) = layout.lines.first() else {
        return;
    };

    let reach = vec2(size, size);
    let min = surface.to_physical(first.origin) - reach;
    let max = surface.to_physical(pos2(
        first.origin.x + layout.max_width(),
        first.origin.y + layout.lines.len() as f32 * layout.style.line_height(),
    )) + reach;
    let Some(mut mask) = CoverageMask::new(min, max, surface.width(), surface.height()) else {
        return;
    };

    let embolden = layout.style.weight.embolden() * size;
    let strikes = [0.0, embolden * 0.5, embolden];

    for line in &layout.lines {
        let top = surface.to_physical(line.origin);
        let mut x = top.x;
        let mut previous: Option<(&FontArc, GlyphId)> = None;
        for c in line.text.chars() {
            let Some((font, id)) = fonts.glyph_for(family, c) else {
                continue;
            };
            let scale = em_scale(font, size);
            let scaled = font.as_scaled(scale);
            if let Some((prev_font, prev_id)) = previous {
                if std::ptr::eq(prev_font, font) {
                    x += scaled.kern(prev_id, id);
                }
            }
            let baseline = top.y + scaled.ascent();
            for dx in strikes {
                let glyph = id.with_scale_and_position(scale, point(x + dx, baseline));
                if let Some(outlined) = font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|gx, gy, coverage| {
                        mask.add(bounds.min.x as i32 + gx as i32, bounds.min.y as i32 + gy as i32, coverage);
                    });
                }
            }
            x += scaled.h_advance(id);
            previous = Some((font, id));
        }
    }

    surface.composite_mask(&mask, color, BlendMode::SourceOver);
}

/// Lay out and draw `pending`. Returns false when there was nothing to draw.
pub fn commit(
    pending: &PendingText,
    fonts: &FontBook,
    color: Color32,
    with_plate: bool,
    surface: &mut RasterSurface,
) -> bool {
    let Some(layout) = layout(pending, fonts, with_plate) else {
        log::debug!("Discarding empty text placement");
        return false;
    };
    log::info!("Placing {} line(s) of text at {:?}", layout.lines.len(), pending.anchor);
    rasterize(&layout, fonts, color, surface);
    true
}
