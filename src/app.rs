use egui::{Key, Modifiers, Rect, vec2};

use crate::command::{Command, Outcome};
use crate::config::SketchConfig;
use crate::editor::Editor;
use crate::error::CanvasResult;
use crate::file_handler;
use crate::input::{InputHandler, PointerSample};
use crate::panels::{self, CanvasView};
use crate::texture_manager::TextureManager;

const TEXT_HINT: &str = "Type text...\nEnter = new line\nCtrl + Enter = place\nEsc = cancel";

pub struct SketchApp {
    editor: Editor,
    input: InputHandler,
    textures: TextureManager,
    /// Generation of the text placement that has been given keyboard focus
    focused_overlay: Option<u64>,
    /// Shown in a dismissible window until closed
    notification: Option<String>,
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: SketchConfig) -> CanvasResult<Self> {
        let editor = Editor::new(config, cc.egui_ctx.pixels_per_point())?;
        Ok(Self {
            editor,
            input: InputHandler::default(),
            textures: TextureManager::new(),
            focused_overlay: None,
            notification: None,
        })
    }

    fn apply(&mut self, commands: Vec<Command>) {
        for command in commands {
            match self.editor.execute(command) {
                Ok(Outcome::Exported(image)) => {
                    if let Err(err) = file_handler::save_export(&image) {
                        log::error!("{err}");
                        self.notification = Some(err.to_string());
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    log::error!("{err}");
                    self.notification = Some(err.to_string());
                }
            }
        }
    }

    /// Keep the surface the same size as the panel it is shown in
    fn resize_command(&self, ctx: &egui::Context, view: &CanvasView) -> Option<Command> {
        let surface = self.editor.surface();
        let logical_size = view.rect.size();
        let pixels_per_point = ctx.pixels_per_point();
        let unchanged = surface.logical_size() == logical_size && surface.pixels_per_point() == pixels_per_point;
        (!unchanged).then_some(Command::Resize {
            logical_size,
            pixels_per_point,
        })
    }

    /// The floating text editor for a pending placement
    fn text_overlay(&mut self, ctx: &egui::Context, canvas: Rect) -> Vec<Command> {
        let mut commands = Vec::new();
        let Some(pending) = self.editor.pending_text() else {
            self.focused_overlay = None;
            return commands;
        };

        let margin = self.editor.config().text_overlay_margin;
        let screen_pos = canvas.min + pending.anchor.to_vec2() + vec2(margin, margin);
        let font = egui::FontId::new(pending.style.size, pending.style.family.egui_family());
        let color = self.editor.style().color;
        // egui has one outline per family; spread the letters to hint at the weight
        let letter_spacing = pending.style.weight.embolden() * pending.style.size;
        let generation = self.editor.text_generation();
        let mut draft = pending.content.clone();
        let request_focus = self.focused_overlay != Some(generation);

        let mut layouter = |ui: &egui::Ui, text: &str, wrap_width: f32| {
            let format = egui::TextFormat {
                font_id: font.clone(),
                color,
                extra_letter_spacing: letter_spacing,
                ..Default::default()
            };
            let mut job = egui::text::LayoutJob::single_section(text.to_owned(), format);
            job.wrap.max_width = wrap_width;
            ui.fonts(|fonts| fonts.layout_job(job))
        };

        egui::Area::new(egui::Id::new("text_overlay"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen_pos)
            .show(ctx, |ui| {
                // Take these before the text edit turns them into a newline or a blur
                let (place, cancel) = ui.input_mut(|input| {
                    (
                        input.consume_key(Modifiers::COMMAND, Key::Enter),
                        input.consume_key(Modifiers::NONE, Key::Escape),
                    )
                });

                let response = ui.add(
                    egui::TextEdit::multiline(&mut draft)
                        // A fresh id per placement, so focus never carries over
                        .id(egui::Id::new(("text_overlay", generation)))
                        .font(font.clone())
                        .text_color(color)
                        .layouter(&mut layouter)
                        .hint_text(TEXT_HINT)
                        .desired_rows(1)
                        .desired_width(260.0),
                );
                if request_focus {
                    response.request_focus();
                }
                if response.changed() {
                    commands.push(Command::EditText(draft.clone()));
                }

                if cancel {
                    commands.push(Command::CancelText);
                } else if place || response.lost_focus() {
                    commands.push(Command::PlaceText);
                }
            });

        self.focused_overlay = Some(generation);
        commands
    }

    fn notification_window(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.notification else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Something went wrong")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_TOP, vec2(0.0, 16.0))
            .show(ctx, |ui| {
                ui.label(message.as_str());
                if ui.button("Dismiss").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.notification = None;
        }
    }
}

impl eframe::App for SketchApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut commands = InputHandler::shortcuts(ctx);
        commands.extend(panels::tools_panel(&self.editor, ctx));
        self.apply(commands);

        let view = panels::central_panel(&self.editor, &mut self.textures, ctx);
        if let Some(resize) = self.resize_command(ctx, &view) {
            self.apply(vec![resize]);
        }

        let overlay = self.text_overlay(ctx, view.rect);
        self.apply(overlay);

        let sample = PointerSample::read(ctx, view.rect, view.hovered);
        let pointer = self.input.translate(&sample);
        self.apply(pointer);

        self.notification_window(ctx);

        if self.input.is_tracking() {
            ctx.request_repaint();
        }
    }
}
