use egui::{Color32, Pos2, Vec2};

use crate::export::{ExportFormat, ExportedImage};
use crate::style::FontFamily;
use crate::tool::Tool;

/// Everything that can happen to the editor.
///
/// Widgets, input translation and tests all produce these; the editor
/// consumes them one at a time in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Primary pointer pressed on the canvas, in logical canvas coordinates
    PointerDown(Pos2),
    PointerMove(Pos2),
    /// Primary pointer released anywhere, on or off the canvas
    PointerUp,

    SelectTool(Tool),
    SetColor(Color32),
    SetBrushWidth(f32),
    /// Refill the surface with a new background color
    SetBackground(Color32),
    SetBold(bool),
    SetTextBackground(bool),
    SetFontFamily(FontFamily),
    SetFontSize(f32),
    SetGrid(bool),

    /// Replace the content of the open text overlay
    EditText(String),
    /// Commit the open text overlay
    PlaceText,
    /// Drop the open text overlay
    CancelText,

    Undo,
    Redo,
    Clear,

    /// The on-screen canvas changed size or density
    Resize {
        logical_size: Vec2,
        pixels_per_point: f32,
    },
    Export(ExportFormat),
}

impl Command {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointerDown(_) => "PointerDown",
            Self::PointerMove(_) => "PointerMove",
            Self::PointerUp => "PointerUp",
            Self::SelectTool(_) => "SelectTool",
            Self::SetColor(_) => "SetColor",
            Self::SetBrushWidth(_) => "SetBrushWidth",
            Self::SetBackground(_) => "SetBackground",
            Self::SetBold(_) => "SetBold",
            Self::SetTextBackground(_) => "SetTextBackground",
            Self::SetFontFamily(_) => "SetFontFamily",
            Self::SetFontSize(_) => "SetFontSize",
            Self::SetGrid(_) => "SetGrid",
            Self::EditText(_) => "EditText",
            Self::PlaceText => "PlaceText",
            Self::CancelText => "CancelText",
            Self::Undo => "Undo",
            Self::Redo => "Redo",
            Self::Clear => "Clear",
            Self::Resize { .. } => "Resize",
            Self::Export(_) => "Export",
        }
    }
}

/// What a command did
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Done,
    /// The command did not apply in the current state, e.g. a move while idle
    Ignored,
    NothingToUndo,
    NothingToRedo,
    Exported(ExportedImage),
}
