use egui::Pos2;

use crate::error::CanvasResult;
use crate::history::History;
use crate::raster;
use crate::style::StyleState;
use crate::surface::{PixelRegion, RasterSurface, StrokeStyle};
use crate::tool::{Tool, ToolMode};

/// Flattening tolerance for pen curves, in logical pixels
const CURVE_TOLERANCE: f32 = 0.5;

/// A gesture in progress, from pointer-down to pointer-up
#[derive(Debug)]
pub struct GestureState {
    pub tool: Tool,
    pub origin: Pos2,
    /// Last sampled pointer position
    pub last: Pos2,
    /// Where the drawn pen path currently ends
    cursor: Pos2,
    /// Pixels at gesture start, put back before every preview redraw
    preview_base: Option<PixelRegion>,
}

/// Pointer state machine: idle, or one active gesture.
#[derive(Debug, Default)]
pub struct GestureController {
    active: Option<GestureState>,
}

impl GestureController {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&GestureState> {
        self.active.as_ref()
    }

    /// Start a gesture. The frame as it was before the gesture goes onto the
    /// undo stack. Text is not a gesture; callers route it elsewhere.
    pub fn pointer_down(
        &mut self,
        tool: Tool,
        pos: Pos2,
        surface: &RasterSurface,
        history: &mut History,
    ) -> CanvasResult<()> {
        if tool.mode() == ToolMode::Text {
            log::warn!("Text tool does not start a gesture");
            return Ok(());
        }
        history.push_undo(surface.snapshot()?);

        let preview_base = (tool.mode() == ToolMode::Preview).then(|| surface.capture_all());
        log::debug!("Gesture start: {} at {pos:?}", tool.name());
        self.active = Some(GestureState {
            tool,
            origin: pos,
            last: pos,
            cursor: pos,
            preview_base,
        });
        Ok(())
    }

    /// Advance the active gesture. Ignored when idle.
    pub fn pointer_move(&mut self, pos: Pos2, surface: &mut RasterSurface, style: &StyleState) -> bool {
        let Some(state) = self.active.as_mut() else {
            return false;
        };

        match state.tool {
            Tool::Pen => {
                // Curve through the previous sample, ending halfway to this one
                let mid = state.last.lerp(pos, 0.5);
                let points = raster::flatten_quadratic(state.cursor, state.last, mid, CURVE_TOLERANCE);
                surface.stroke_polyline(&points, &StrokeStyle::solid(style.color, style.brush_width));
                state.cursor = mid;
            }
            Tool::Eraser => {
                surface.stroke_polyline(&[state.last, pos], &StrokeStyle::eraser(style.brush_width));
            }
            tool => {
                if let Some(base) = &state.preview_base {
                    surface.put_pixels(base);
                }
                if let Some(kind) = tool.shape() {
                    crate::shapes::render(surface, kind, state.origin, pos, style.color, style.brush_width);
                }
            }
        }
        state.last = pos;
        true
    }

    /// End the gesture. Whatever is on the surface now is the result.
    pub fn pointer_up(&mut self) -> bool {
        match self.active.take() {
            Some(state) => {
                log::debug!("Gesture end: {} at {:?}", state.tool.name(), state.last);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Color32, pos2, vec2};

    fn setup() -> (RasterSurface, History, StyleState) {
        (
            RasterSurface::new(vec2(60.0, 60.0), 1.0, Color32::WHITE),
            History::default(),
            StyleState::default(),
        )
    }

    #[test]
    fn test_move_without_gesture_is_ignored() {
        let (mut surface, _, style) = setup();
        let mut gestures = GestureController::default();
        let before = surface.capture_all();
        assert!(!gestures.pointer_move(pos2(10.0, 10.0), &mut surface, &style));
        assert_eq!(surface.capture_all(), before);
    }

    #[test]
    fn test_pointer_down_pushes_undo() {
        let (surface, mut history, _) = setup();
        let mut gestures = GestureController::default();
        gestures.pointer_down(Tool::Line, pos2(1.0, 1.0), &surface, &mut history).unwrap();
        assert_eq!(history.undo_len(), 1);
        assert!(gestures.is_active());
        assert!(gestures.pointer_up());
        assert!(!gestures.is_active());
    }

    #[test]
    fn test_preview_keeps_one_candidate() {
        let (mut surface, mut history, style) = setup();
        let mut gestures = GestureController::default();
        gestures.pointer_down(Tool::Line, pos2(5.0, 5.0), &surface, &mut history).unwrap();
        gestures.pointer_move(pos2(55.0, 5.0), &mut surface, &style);
        gestures.pointer_move(pos2(5.0, 55.0), &mut surface, &style);
        gestures.pointer_up();

        // The first candidate was discarded
        assert_eq!(surface.pixel_at(pos2(40.0, 5.0)), Some(image::Rgba([255, 255, 255, 255])));
        assert_eq!(surface.pixel_at(pos2(5.0, 40.0)), Some(image::Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn test_pen_draws_incrementally() {
        let (mut surface, mut history, style) = setup();
        let mut gestures = GestureController::default();
        gestures.pointer_down(Tool::Pen, pos2(10.0, 30.0), &surface, &mut history).unwrap();
        gestures.pointer_move(pos2(30.0, 30.0), &mut surface, &style);
        gestures.pointer_move(pos2(50.0, 30.0), &mut surface, &style);
        // From the origin to the midpoint of the last two samples
        assert_eq!(surface.pixel_at(pos2(12.0, 30.0)), Some(image::Rgba([0, 0, 0, 255])));
        assert_eq!(surface.pixel_at(pos2(38.0, 30.0)), Some(image::Rgba([0, 0, 0, 255])));
    }
}
