use eframe_sketch::style::{FontFamily, FontWeight, TextStyle};
use eframe_sketch::text::{self, FontBook, PendingText};
use eframe_sketch::{Command, Editor, Outcome, SketchConfig, Tool};
use egui::{Color32, pos2};
use image::Rgba;

fn text_editor(fonts: FontBook) -> Editor {
    let config = SketchConfig {
        canvas_size: [240.0, 120.0],
        ..SketchConfig::default()
    };
    let mut editor = Editor::with_fonts(config, 1.0, fonts).unwrap();
    editor.execute(Command::SelectTool(Tool::Text)).unwrap();
    editor
}

#[test]
fn test_lines_stack_by_line_height() {
    let pending = PendingText {
        anchor: pos2(40.0, 30.0),
        content: "Hello\nWorld".to_owned(),
        style: TextStyle {
            family: FontFamily::Proportional,
            size: 20.0,
            weight: FontWeight::Semibold,
        },
    };
    let layout = text::layout(&pending, &FontBook::from_egui_defaults(), false).unwrap();

    let tops: Vec<f32> = layout.lines.iter().map(|line| line.origin.y).collect();
    assert_eq!(tops, vec![30.0, 55.0]);
    assert!(layout.lines.iter().all(|line| line.origin.x == 40.0));
    assert_eq!(layout.lines[0].text, "Hello");
    assert_eq!(layout.lines[1].text, "World");
}

#[test]
fn test_cancel_leaves_frame_untouched() {
    let mut editor = text_editor(FontBook::from_egui_defaults());
    let before = editor.surface().snapshot().unwrap();

    editor.execute(Command::PointerDown(pos2(20.0, 20.0))).unwrap();
    editor.execute(Command::EditText("never placed".to_owned())).unwrap();
    assert_eq!(editor.execute(Command::CancelText).unwrap(), Outcome::Done);

    assert!(editor.pending_text().is_none());
    assert_eq!(editor.surface().snapshot().unwrap(), before);
    // Opening still recorded a snapshot, identical to the current frame
    assert_eq!(editor.history().peek_undo(), Some(&before));
}

#[test]
fn test_blank_text_is_discarded() {
    let mut editor = text_editor(FontBook::from_egui_defaults());
    let before = editor.surface().snapshot().unwrap();

    editor.execute(Command::PointerDown(pos2(20.0, 20.0))).unwrap();
    editor.execute(Command::EditText(" \n  \t".to_owned())).unwrap();
    editor.execute(Command::PlaceText).unwrap();

    assert!(editor.pending_text().is_none());
    assert_eq!(editor.surface().snapshot().unwrap(), before);
}

#[test]
fn test_placed_text_uses_stroke_color() {
    let mut editor = text_editor(FontBook::from_egui_defaults());
    editor.execute(Command::SetColor(Color32::RED)).unwrap();
    editor.execute(Command::SetFontSize(48.0)).unwrap();
    editor.execute(Command::PointerDown(pos2(10.0, 10.0))).unwrap();
    editor.execute(Command::EditText("HI".to_owned())).unwrap();
    editor.execute(Command::PlaceText).unwrap();

    let pixels = editor.surface().pixels();
    let red = pixels.pixels().filter(|p| **p == Rgba([255, 0, 0, 255])).count();
    assert!(red > 50, "only {red} fully red pixels");
    // Nothing lands above or left of the anchor without a plate
    assert_eq!(pixels.get_pixel(5, 5), &Rgba([255, 255, 255, 255]));
}

#[test]
fn test_plate_is_drawn_behind_text() {
    let mut editor = text_editor(FontBook::from_egui_defaults());
    editor.execute(Command::SetTextBackground(true)).unwrap();
    editor.execute(Command::PointerDown(pos2(10.0, 10.0))).unwrap();
    editor.execute(Command::EditText("plate".to_owned())).unwrap();
    editor.execute(Command::PlaceText).unwrap();

    // Plate starts 8px up and left of the anchor, black at 25% over white
    assert_eq!(editor.surface().pixel_at(pos2(4.0, 4.0)), Some(Rgba([191, 191, 191, 255])));
    assert_eq!(editor.surface().pixel_at(pos2(1.0, 1.0)), Some(Rgba([255, 255, 255, 255])));
}

#[test]
fn test_missing_fonts_fall_back_without_failing() {
    let mut editor = text_editor(FontBook::empty());
    editor.execute(Command::SetTextBackground(true)).unwrap();
    editor.execute(Command::PointerDown(pos2(10.0, 10.0))).unwrap();
    editor.execute(Command::EditText("abc".to_owned())).unwrap();
    assert_eq!(editor.execute(Command::PlaceText).unwrap(), Outcome::Done);
    // The plate is still sized from fallback metrics
    assert_eq!(editor.surface().pixel_at(pos2(4.0, 4.0)), Some(Rgba([191, 191, 191, 255])));
}

#[test]
fn test_undo_removes_placed_text() {
    let mut editor = text_editor(FontBook::from_egui_defaults());
    let blank = editor.surface().snapshot().unwrap();
    editor.execute(Command::PointerDown(pos2(10.0, 10.0))).unwrap();
    editor.execute(Command::EditText("gone".to_owned())).unwrap();
    editor.execute(Command::PlaceText).unwrap();
    assert_ne!(editor.surface().snapshot().unwrap(), blank);

    editor.execute(Command::Undo).unwrap();
    assert_eq!(editor.surface().snapshot().unwrap(), blank);
}
