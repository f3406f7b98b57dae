use egui::Color32;

use crate::command::Command;
use crate::components::ToolButton;
use crate::editor::Editor;
use crate::export::ExportFormat;
use crate::style::FontFamily;
use crate::tool::Tool;

/// Quick-pick stroke colors
const SWATCHES: [Color32; 8] = [
    Color32::BLACK,
    Color32::WHITE,
    Color32::from_rgb(239, 68, 68),
    Color32::from_rgb(249, 115, 22),
    Color32::from_rgb(234, 179, 8),
    Color32::from_rgb(34, 197, 94),
    Color32::from_rgb(59, 130, 246),
    Color32::from_rgb(168, 85, 247),
];

/// The side panel of controls. Reads the editor, returns what the user asked for.
pub fn tools_panel(editor: &Editor, ctx: &egui::Context) -> Vec<Command> {
    let mut commands = Vec::new();
    let style = editor.style().clone();

    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");
            ui.horizontal_wrapped(|ui| {
                for tool in Tool::ALL {
                    if ToolButton::new(tool, editor.tool() == tool).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.name());
                        commands.push(Command::SelectTool(tool));
                    }
                }
            });
            ui.separator();

            ui.heading("Stroke");
            ui.horizontal(|ui| {
                let mut color = style.color;
                if egui::color_picker::color_edit_button_srgba(ui, &mut color, egui::color_picker::Alpha::Opaque)
                    .changed()
                {
                    commands.push(Command::SetColor(color));
                }
                for swatch in SWATCHES {
                    let button = egui::Button::new("").fill(swatch).min_size(egui::vec2(16.0, 16.0));
                    if ui.add(button).clicked() {
                        commands.push(Command::SetColor(swatch));
                    }
                }
            });
            let mut width = style.brush_width;
            if ui.add(egui::Slider::new(&mut width, 1.0..=50.0).text("Size")).changed() {
                commands.push(Command::SetBrushWidth(width));
            }
            ui.separator();

            ui.heading("Text");
            let mut family = style.font_family;
            egui::ComboBox::from_label("Font")
                .selected_text(family.label())
                .show_ui(ui, |ui| {
                    for option in FontFamily::ALL {
                        ui.selectable_value(&mut family, option, option.label());
                    }
                });
            if family != style.font_family {
                commands.push(Command::SetFontFamily(family));
            }
            let mut font_size = style.font_size;
            if ui.add(egui::Slider::new(&mut font_size, 8.0..=96.0).text("Font size")).changed() {
                commands.push(Command::SetFontSize(font_size));
            }
            ui.horizontal(|ui| {
                let mut bold = style.bold;
                if ui.toggle_value(&mut bold, "Bold").changed() {
                    commands.push(Command::SetBold(bold));
                }
                let mut plate = style.text_background;
                if ui.toggle_value(&mut plate, "Text background").changed() {
                    commands.push(Command::SetTextBackground(plate));
                }
            });
            ui.separator();

            ui.heading("Canvas");
            ui.horizontal(|ui| {
                let mut background = style.background;
                ui.label("Background");
                if egui::color_picker::color_edit_button_srgba(ui, &mut background, egui::color_picker::Alpha::Opaque)
                    .changed()
                {
                    commands.push(Command::SetBackground(background));
                }
                let mut grid = style.show_grid;
                if ui.toggle_value(&mut grid, "Grid").changed() {
                    commands.push(Command::SetGrid(grid));
                }
            });
            if ui.button("Clear").clicked() {
                commands.push(Command::Clear);
            }
            ui.separator();

            // Undo/Redo section
            let history = editor.history();
            ui.horizontal(|ui| {
                if ui.add_enabled(history.can_undo(), egui::Button::new("Undo")).clicked() {
                    commands.push(Command::Undo);
                }
                if ui.add_enabled(history.can_redo(), egui::Button::new("Redo")).clicked() {
                    commands.push(Command::Redo);
                }
            });
            ui.horizontal(|ui| {
                ui.label(format!("Undo stack size: {}", history.undo_len()));
                ui.label(format!("Redo stack size: {}", history.redo_len()));
            });
            ui.separator();

            ui.heading("Export");
            ui.horizontal(|ui| {
                for format in [ExportFormat::Png, editor.jpeg_format()] {
                    if ui.button(format!("Save {}", format.label())).clicked() {
                        commands.push(Command::Export(format));
                    }
                }
            });
        });

    commands
}
