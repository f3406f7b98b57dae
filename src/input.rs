use egui::{Context, Key, KeyboardShortcut, Modifiers, PointerButton, Pos2, Rect};

use crate::command::Command;

pub const UNDO_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
pub const REDO_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);

/// The primary pointer as seen during one UI frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    /// Position relative to the canvas origin, in logical pixels
    pub pos: Option<Pos2>,
    /// Pressed during this frame
    pub pressed: bool,
    /// Released during this frame, wherever the pointer is
    pub released: bool,
    /// Held down at the end of this frame
    pub down: bool,
    /// The canvas, not some widget floating over it, is under the pointer
    pub over_canvas: bool,
}

impl PointerSample {
    /// Read the primary pointer from egui. Secondary buttons and extra
    /// touches are ignored.
    pub fn read(ctx: &Context, canvas_rect: Rect, canvas_hovered: bool) -> Self {
        ctx.input(|input| {
            let pointer = &input.pointer;
            Self {
                pos: pointer
                    .interact_pos()
                    .map(|pos| (pos - canvas_rect.min).to_pos2()),
                pressed: pointer.button_pressed(PointerButton::Primary),
                released: pointer.button_released(PointerButton::Primary),
                down: pointer.button_down(PointerButton::Primary),
                over_canvas: canvas_hovered,
            }
        })
    }
}

/// Turns pointer samples into pointer commands.
///
/// A gesture only starts from a press on the canvas, but once started it is
/// followed everywhere: releasing the button outside the canvas, or the
/// window, still ends it.
#[derive(Debug, Default)]
pub struct InputHandler {
    tracking: bool,
    last_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn translate(&mut self, sample: &PointerSample) -> Vec<Command> {
        let mut commands = Vec::new();

        if sample.pressed && sample.over_canvas && !self.tracking {
            if let Some(pos) = sample.pos {
                commands.push(Command::PointerDown(pos));
                self.tracking = true;
                self.last_pos = Some(pos);
            }
        } else if self.tracking {
            if let Some(pos) = sample.pos {
                if self.last_pos != Some(pos) {
                    commands.push(Command::PointerMove(pos));
                    self.last_pos = Some(pos);
                }
            }
        }

        if self.tracking && (sample.released || !sample.down) {
            commands.push(Command::PointerUp);
            self.tracking = false;
            self.last_pos = None;
        }
        commands
    }

    /// Undo and redo shortcuts. Matching key presses are consumed so no
    /// widget sees them.
    pub fn shortcuts(ctx: &Context) -> Vec<Command> {
        ctx.input_mut(|input| {
            let mut commands = Vec::new();
            if input.consume_shortcut(&UNDO_SHORTCUT) {
                commands.push(Command::Undo);
            }
            if input.consume_shortcut(&REDO_SHORTCUT) {
                commands.push(Command::Redo);
            }
            commands
        })
    }
}
