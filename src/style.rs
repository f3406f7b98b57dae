use egui::Color32;

use crate::config::SketchConfig;
use crate::error::{CanvasError, CanvasResult};

/// Font families available for placed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    #[default]
    Proportional,
    Monospace,
}

impl FontFamily {
    pub const ALL: [FontFamily; 2] = [FontFamily::Proportional, FontFamily::Monospace];

    pub fn label(self) -> &'static str {
        match self {
            Self::Proportional => "Sans",
            Self::Monospace => "Mono",
        }
    }

    pub fn egui_family(self) -> egui::FontFamily {
        match self {
            Self::Proportional => egui::FontFamily::Proportional,
            Self::Monospace => egui::FontFamily::Monospace,
        }
    }
}

/// Text weight. Normal text is already semibold so it stays legible over drawings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Semibold,
    Bold,
}

impl FontWeight {
    /// CSS-style numeric weight
    pub fn value(self) -> u16 {
        match self {
            Self::Semibold => 600,
            Self::Bold => 800,
        }
    }

    /// Horizontal overstrike, as a fraction of the font size, used to
    /// synthesize the weight from a regular outline.
    pub fn embolden(self) -> f32 {
        match self {
            Self::Semibold => 0.03,
            Self::Bold => 0.07,
        }
    }
}

/// Typography captured by a pending text placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub family: FontFamily,
    pub size: f32,
    pub weight: FontWeight,
}

impl TextStyle {
    pub fn line_height(&self) -> f32 {
        self.size * crate::text::LINE_HEIGHT_FACTOR
    }
}

/// The process-wide drawing style. Controls mutate it; gestures and text
/// commits read it at the moment they happen.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleState {
    /// Stroke, shape and text fill color
    pub color: Color32,
    /// Stroke width in logical pixels
    pub brush_width: f32,
    pub background: Color32,
    pub bold: bool,
    /// Draw a translucent plate behind placed text
    pub text_background: bool,
    pub font_family: FontFamily,
    pub font_size: f32,
    pub show_grid: bool,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            brush_width: 4.0,
            background: Color32::WHITE,
            bold: false,
            text_background: false,
            font_family: FontFamily::default(),
            font_size: 24.0,
            show_grid: false,
        }
    }
}

impl StyleState {
    pub fn from_config(config: &SketchConfig) -> CanvasResult<Self> {
        Ok(Self {
            color: parse_hex_color(&config.pen_color)?,
            brush_width: config.brush_width,
            background: parse_hex_color(&config.background_color)?,
            font_size: config.font_size,
            ..Self::default()
        })
    }

    pub fn font_weight(&self) -> FontWeight {
        if self.bold { FontWeight::Bold } else { FontWeight::Semibold }
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            family: self.font_family,
            size: self.font_size,
            weight: self.font_weight(),
        }
    }
}

/// Parse `#rrggbb` or `#rrggbbaa`
pub fn parse_hex_color(text: &str) -> CanvasResult<Color32> {
    let invalid = || CanvasError::InvalidColor(text.to_owned());
    let hex = text.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    let a = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Color32::from_rgba_unmultiplied(r, g, b, a))
}
