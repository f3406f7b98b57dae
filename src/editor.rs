use egui::vec2;

use crate::command::{Command, Outcome};
use crate::config::SketchConfig;
use crate::error::CanvasResult;
use crate::export::{self, ExportFormat};
use crate::frame::Frame;
use crate::gesture::GestureController;
use crate::history::{History, HistoryLimits};
use crate::style::StyleState;
use crate::surface::{GridSpec, RasterSurface};
use crate::text::{self, FontBook, PendingText, TextPlacement};
use crate::tool::{Tool, ToolMode};

/// Thinnest stroke the brush width control can select
pub const MIN_BRUSH_WIDTH: f32 = 1.0;
/// Smallest font size the size control can select
pub const MIN_FONT_SIZE: f32 = 4.0;

/// The whole drawing state, driven by [`Editor::execute`].
///
/// Nothing here knows about egui input or widgets: the UI turns what the
/// user does into [`Command`]s and renders whatever the editor exposes.
pub struct Editor {
    surface: RasterSurface,
    history: History,
    style: StyleState,
    tool: Tool,
    gestures: GestureController,
    text: TextPlacement,
    fonts: FontBook,
    config: SketchConfig,
}

impl Editor {
    /// A blank canvas of `config.canvas_size`, using egui's bundled fonts
    pub fn new(config: SketchConfig, pixels_per_point: f32) -> CanvasResult<Self> {
        Self::with_fonts(config, pixels_per_point, FontBook::from_egui_defaults())
    }

    pub fn with_fonts(config: SketchConfig, pixels_per_point: f32, fonts: FontBook) -> CanvasResult<Self> {
        let style = StyleState::from_config(&config)?;
        let [width, height] = config.canvas_size;
        let surface = RasterSurface::new(vec2(width, height), pixels_per_point, style.background);
        let history = History::new(HistoryLimits {
            max_entries: config.history_depth,
            max_bytes: config.history_byte_budget,
        });
        log::info!(
            "Editor ready: {}x{} px, history depth {}",
            surface.width(),
            surface.height(),
            config.history_depth
        );
        Ok(Self {
            surface,
            history,
            style,
            tool: Tool::default(),
            gestures: GestureController::default(),
            text: TextPlacement::default(),
            fonts,
            config,
        })
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn style(&self) -> &StyleState {
        &self.style
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    pub fn is_drawing(&self) -> bool {
        self.gestures.is_active()
    }

    pub fn pending_text(&self) -> Option<&PendingText> {
        self.text.pending()
    }

    /// Changes whenever a new text placement is opened
    pub fn text_generation(&self) -> u64 {
        self.text.generation()
    }

    /// The grid to draw over the canvas, if it is switched on
    pub fn grid(&self) -> Option<GridSpec> {
        self.style.show_grid.then(|| GridSpec::new(self.config.grid_step))
    }

    /// JPEG export at the configured quality
    pub fn jpeg_format(&self) -> ExportFormat {
        ExportFormat::jpeg(self.config.jpeg_quality)
    }

    /// Apply one command. Errors leave the surface and history as they were.
    pub fn execute(&mut self, command: Command) -> CanvasResult<Outcome> {
        match &command {
            Command::PointerMove(_) => log::trace!("{command:?}"),
            _ => log::debug!("Executing {}", command.name()),
        }

        match command {
            Command::PointerDown(pos) => {
                // Clicking anywhere takes focus from the text overlay
                self.commit_text();
                self.finish_gesture();
                if self.tool.mode() == ToolMode::Text {
                    self.history.push_undo(self.surface.snapshot()?);
                    self.text.open(pos, self.style.text_style());
                } else {
                    self.gestures
                        .pointer_down(self.tool, pos, &self.surface, &mut self.history)?;
                }
                Ok(Outcome::Done)
            }
            Command::PointerMove(pos) => {
                let moved = self.gestures.pointer_move(pos, &mut self.surface, &self.style);
                Ok(if moved { Outcome::Done } else { Outcome::Ignored })
            }
            Command::PointerUp => Ok(self.finish_gesture()),

            Command::SelectTool(tool) => {
                if tool != self.tool {
                    log::info!("Tool: {}", tool.name());
                    self.tool = tool;
                }
                Ok(Outcome::Done)
            }
            Command::SetColor(color) => {
                self.style.color = color;
                Ok(Outcome::Done)
            }
            Command::SetBrushWidth(width) => {
                self.style.brush_width = width.max(MIN_BRUSH_WIDTH);
                Ok(Outcome::Done)
            }
            Command::SetBackground(color) => {
                self.finish_gesture();
                self.history.push_undo(self.surface.snapshot()?);
                self.style.background = color;
                self.surface.fill_background(color);
                Ok(Outcome::Done)
            }
            Command::SetBold(bold) => {
                self.style.bold = bold;
                self.text.refresh_style(self.style.text_style());
                Ok(Outcome::Done)
            }
            Command::SetTextBackground(enabled) => {
                self.style.text_background = enabled;
                Ok(Outcome::Done)
            }
            Command::SetFontFamily(family) => {
                self.style.font_family = family;
                self.text.refresh_style(self.style.text_style());
                Ok(Outcome::Done)
            }
            Command::SetFontSize(size) => {
                self.style.font_size = size.max(MIN_FONT_SIZE);
                self.text.refresh_style(self.style.text_style());
                Ok(Outcome::Done)
            }
            Command::SetGrid(visible) => {
                self.style.show_grid = visible;
                Ok(Outcome::Done)
            }

            Command::EditText(content) => Ok(if self.text.set_content(content) {
                Outcome::Done
            } else {
                Outcome::Ignored
            }),
            Command::PlaceText => Ok(if self.commit_text() { Outcome::Done } else { Outcome::Ignored }),
            Command::CancelText => {
                // The snapshot pushed when the overlay opened stays on the
                // undo stack as a harmless duplicate
                Ok(if self.text.cancel() { Outcome::Done } else { Outcome::Ignored })
            }

            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::Clear => {
                self.finish_gesture();
                self.commit_text();
                self.history.push_undo(self.surface.snapshot()?);
                self.surface.clear();
                log::info!("Canvas cleared");
                Ok(Outcome::Done)
            }

            Command::Resize {
                logical_size,
                pixels_per_point,
            } => {
                self.finish_gesture();
                self.surface.resize(logical_size, pixels_per_point);
                Ok(Outcome::Done)
            }
            Command::Export(format) => {
                self.commit_text();
                let image = self.surface.composed(self.grid());
                Ok(Outcome::Exported(export::encode(&image, format)?))
            }
        }
    }

    fn finish_gesture(&mut self) -> Outcome {
        if self.gestures.pointer_up() { Outcome::Done } else { Outcome::Ignored }
    }

    /// Rasterize the open text overlay, if any. The placement closes even
    /// when there was nothing to draw.
    fn commit_text(&mut self) -> bool {
        let Some(pending) = self.text.take() else {
            return false;
        };
        text::commit(
            &pending,
            &self.fonts,
            self.style.color,
            self.style.text_background,
            &mut self.surface,
        );
        true
    }

    fn undo(&mut self) -> CanvasResult<Outcome> {
        self.finish_gesture();
        self.commit_text();
        let Some(previous) = self.history.peek_undo().cloned() else {
            log::debug!("Nothing to undo");
            return Ok(Outcome::NothingToUndo);
        };
        let current = self.surface.snapshot()?;
        // Restore before touching the stacks so a bad frame changes nothing
        self.surface.restore(&previous)?;
        self.history.undo(current);
        log::info!("Undo ({} left)", self.history.undo_len());
        Ok(Outcome::Done)
    }

    fn redo(&mut self) -> CanvasResult<Outcome> {
        self.finish_gesture();
        self.commit_text();
        let Some(next) = self.history.peek_redo().cloned() else {
            log::debug!("Nothing to redo");
            return Ok(Outcome::NothingToRedo);
        };
        let current = self.surface.snapshot()?;
        self.surface.restore(&next)?;
        self.history.redo(current);
        log::info!("Redo ({} left)", self.history.redo_len());
        Ok(Outcome::Done)
    }

    /// Put a frame on the undo stack, as a gesture start would
    pub fn push_snapshot(&mut self, frame: Frame) {
        self.history.push_undo(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, pos2};

    fn editor() -> Editor {
        let config = SketchConfig {
            canvas_size: [50.0, 40.0],
            ..SketchConfig::default()
        };
        Editor::with_fonts(config, 1.0, FontBook::empty()).unwrap()
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut editor = editor();
        assert_eq!(editor.execute(Command::Undo).unwrap(), Outcome::NothingToUndo);
        assert_eq!(editor.execute(Command::Redo).unwrap(), Outcome::NothingToRedo);
    }

    #[test]
    fn test_text_tool_opens_overlay_instead_of_gesture() {
        let mut editor = editor();
        editor.execute(Command::SelectTool(Tool::Text)).unwrap();
        editor.execute(Command::PointerDown(pos2(5.0, 5.0))).unwrap();
        assert!(!editor.is_drawing());
        assert_eq!(editor.pending_text().map(|p| p.anchor), Some(pos2(5.0, 5.0)));
        assert_eq!(editor.history().undo_len(), 1);
    }

    #[test]
    fn test_pointer_down_commits_open_text() {
        let mut editor = editor();
        editor.execute(Command::SelectTool(Tool::Text)).unwrap();
        editor.execute(Command::PointerDown(pos2(5.0, 5.0))).unwrap();
        editor.execute(Command::EditText("x".to_owned())).unwrap();
        editor.execute(Command::PointerDown(pos2(20.0, 20.0))).unwrap();
        let pending = editor.pending_text().unwrap();
        assert_eq!(pending.anchor, pos2(20.0, 20.0));
        assert!(pending.content.is_empty());
    }

    #[test]
    fn test_background_change_is_undoable() {
        let mut editor = editor();
        editor.execute(Command::SetBackground(Color32::YELLOW)).unwrap();
        assert_eq!(editor.surface().pixel_at(pos2(1.0, 1.0)), Some(image::Rgba([255, 255, 0, 255])));
        editor.execute(Command::Undo).unwrap();
        assert_eq!(editor.surface().pixel_at(pos2(1.0, 1.0)), Some(image::Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_style_changes_follow_open_text() {
        let mut editor = editor();
        editor.execute(Command::SelectTool(Tool::Text)).unwrap();
        editor.execute(Command::PointerDown(pos2(5.0, 5.0))).unwrap();
        editor.execute(Command::SetFontSize(40.0)).unwrap();
        editor.execute(Command::SetBold(true)).unwrap();
        let style = editor.pending_text().unwrap().style;
        assert_eq!(style.size, 40.0);
        assert_eq!(style.weight.value(), 800);
    }
}
