use crate::shapes::ShapeKind;

/// How a tool behaves while the pointer is held down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMode {
    /// Every move permanently extends the stroke
    Incremental,
    /// Every move restores the pre-gesture pixels and redraws a candidate shape
    Preview,
    /// Pointer-down opens the text editor instead of starting a gesture
    Text,
}

/// The drawing tools. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
    Text,
    Line,
    DottedLine,
    Arrow,
    DoubleArrow,
    Rectangle,
    Circle,
}

impl Tool {
    pub const ALL: [Tool; 9] = [
        Tool::Pen,
        Tool::Eraser,
        Tool::Text,
        Tool::Line,
        Tool::DottedLine,
        Tool::Arrow,
        Tool::DoubleArrow,
        Tool::Rectangle,
        Tool::Circle,
    ];

    pub fn mode(self) -> ToolMode {
        match self {
            Self::Pen | Self::Eraser => ToolMode::Incremental,
            Self::Text => ToolMode::Text,
            _ => ToolMode::Preview,
        }
    }

    /// The shape drawn by a preview tool
    pub fn shape(self) -> Option<ShapeKind> {
        match self {
            Self::Line => Some(ShapeKind::Line),
            Self::DottedLine => Some(ShapeKind::DottedLine),
            Self::Arrow => Some(ShapeKind::Arrow),
            Self::DoubleArrow => Some(ShapeKind::DoubleArrow),
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Circle => Some(ShapeKind::Circle),
            Self::Pen | Self::Eraser | Self::Text => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pen => "Pen",
            Self::Eraser => "Eraser",
            Self::Text => "Text",
            Self::Line => "Line",
            Self::DottedLine => "Dotted line",
            Self::Arrow => "Arrow",
            Self::DoubleArrow => "Double arrow",
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Pen => "✏",
            Self::Eraser => "⌫",
            Self::Text => "T",
            Self::Line => "/",
            Self::DottedLine => "- -",
            Self::Arrow => "→",
            Self::DoubleArrow => "↔",
            Self::Rectangle => "◻",
            Self::Circle => "O",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preview_tool_has_a_shape() {
        for tool in Tool::ALL {
            assert_eq!(tool.mode() == ToolMode::Preview, tool.shape().is_some(), "{tool:?}");
        }
    }
}
