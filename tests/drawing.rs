use eframe_sketch::shapes::{self, ShapeKind};
use eframe_sketch::text::FontBook;
use eframe_sketch::{Command, Editor, ExportFormat, Outcome, SketchConfig, Tool};
use egui::{Color32, Pos2, pos2, vec2};
use image::{ImageFormat, Rgba};

fn editor_with_background(background: &str) -> Editor {
    let config = SketchConfig {
        canvas_size: [120.0, 80.0],
        background_color: background.to_owned(),
        ..SketchConfig::default()
    };
    Editor::with_fonts(config, 1.0, FontBook::empty()).unwrap()
}

fn gesture(editor: &mut Editor, tool: Tool, points: &[Pos2]) {
    editor.execute(Command::SelectTool(tool)).unwrap();
    let (first, rest) = points.split_first().unwrap();
    editor.execute(Command::PointerDown(*first)).unwrap();
    for point in rest {
        editor.execute(Command::PointerMove(*point)).unwrap();
    }
    editor.execute(Command::PointerUp).unwrap();
}

#[test]
fn test_preview_is_idempotent() {
    let moves = [pos2(30.0, 70.0), pos2(90.0, 10.0), pos2(110.0, 60.0), pos2(75.0, 45.0)];
    let tools = [
        Tool::Line,
        Tool::DottedLine,
        Tool::Arrow,
        Tool::DoubleArrow,
        Tool::Rectangle,
        Tool::Circle,
    ];
    for tool in tools {
        let mut all_moves = editor_with_background("#ffffff");
        let mut points = vec![pos2(40.0, 40.0)];
        points.extend(moves);
        gesture(&mut all_moves, tool, &points);

        // Skipping intermediate samples lands on the same pixels
        let mut last_move_only = editor_with_background("#ffffff");
        gesture(&mut last_move_only, tool, &[pos2(40.0, 40.0), pos2(75.0, 45.0)]);

        assert_eq!(
            all_moves.surface().snapshot().unwrap(),
            last_move_only.surface().snapshot().unwrap(),
            "{tool:?}"
        );
    }
}

#[test]
fn test_arrow_head_geometry() {
    let length = shapes::arrow_head_length(5.0);
    assert_eq!(length, 10.0);

    let [a, b] = shapes::arrow_head(pos2(100.0, 0.0), 0.0, length);
    let x = 100.0 - 10.0 * 30f32.to_radians().cos();
    let y = 10.0 * 30f32.to_radians().sin();
    assert!(a.distance(pos2(x, y)) < 1e-3, "{a:?}");
    assert!(b.distance(pos2(x, -y)) < 1e-3, "{b:?}");
}

#[test]
fn test_circle_is_centered_on_origin() {
    let origin = pos2(50.0, 50.0);
    let current = pos2(80.0, 50.0);
    assert_eq!(shapes::circle_radius(origin, current), 30.0);

    let paths = shapes::geometry(ShapeKind::Circle, origin, current, 4.0);
    assert_eq!(paths.len(), 1);
    for point in &paths[0].points {
        assert!((point.distance(origin) - 30.0).abs() < 1e-3);
    }
}

#[test]
fn test_eraser_reveals_background_after_resize() {
    let mut editor = editor_with_background("#3366ff");
    let background = editor.style().background;

    editor.execute(Command::SetBrushWidth(8.0)).unwrap();
    gesture(&mut editor, Tool::Pen, &[pos2(10.0, 20.0), pos2(60.0, 20.0), pos2(110.0, 20.0)]);
    assert_eq!(editor.surface().pixel_at(pos2(30.0, 20.0)), Some(Rgba([0, 0, 0, 255])));

    gesture(&mut editor, Tool::Eraser, &[pos2(25.0, 20.0), pos2(35.0, 20.0)]);
    assert_eq!(editor.surface().pixel_at(pos2(30.0, 20.0)).map(|p| p[3]), Some(0));
    assert_eq!(editor.style().background, background);
    assert_eq!(editor.surface().background(), background);

    editor
        .execute(Command::Resize {
            logical_size: vec2(200.0, 150.0),
            pixels_per_point: 1.0,
        })
        .unwrap();
    assert_eq!(editor.surface().pixel_at(pos2(30.0, 20.0)), Some(Rgba([0x33, 0x66, 0xff, 255])));
    assert_eq!(editor.surface().pixel_at(pos2(150.0, 120.0)), Some(Rgba([0x33, 0x66, 0xff, 255])));
    // Untouched ink survives the resize
    assert_eq!(editor.surface().pixel_at(pos2(50.0, 20.0)), Some(Rgba([0, 0, 0, 255])));
}

#[test]
fn test_high_density_surface_scales_strokes() {
    let config = SketchConfig {
        canvas_size: [50.0, 50.0],
        ..SketchConfig::default()
    };
    let mut editor = Editor::with_fonts(config, 2.0, FontBook::empty()).unwrap();
    assert_eq!((editor.surface().width(), editor.surface().height()), (100, 100));

    editor.execute(Command::SetColor(Color32::RED)).unwrap();
    gesture(&mut editor, Tool::Line, &[pos2(10.0, 25.0), pos2(40.0, 25.0)]);
    assert_eq!(editor.surface().pixel_at(pos2(25.0, 25.0)), Some(Rgba([255, 0, 0, 255])));
    assert_eq!(editor.surface().pixels().get_pixel(50, 50), &Rgba([255, 0, 0, 255]));
}

#[test]
fn test_export_includes_grid_only_when_shown() {
    let mut editor = editor_with_background("#ffffff");
    let exported_pixel = |editor: &mut Editor| {
        let Outcome::Exported(image) = editor.execute(Command::Export(ExportFormat::Png)).unwrap() else {
            panic!("expected an export");
        };
        assert_eq!(image.file_name(), "canvas.png");
        let decoded = image::load_from_memory_with_format(&image.bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (120, 80));
        *decoded.get_pixel(25, 10)
    };

    assert_eq!(exported_pixel(&mut editor), Rgba([255, 255, 255, 255]));
    editor.execute(Command::SetGrid(true)).unwrap();
    assert_ne!(exported_pixel(&mut editor), Rgba([255, 255, 255, 255]));
    // The grid is an overlay and never reaches the snapshot
    let snapshot = editor.surface().snapshot().unwrap().decode().unwrap();
    assert_eq!(snapshot.get_pixel(25, 10), &Rgba([255, 255, 255, 255]));
}

#[test]
fn test_jpeg_export_name() {
    let mut editor = editor_with_background("#ffffff");
    let format = editor.jpeg_format();
    assert_eq!(format, ExportFormat::Jpeg { quality: 95 });
    let Outcome::Exported(image) = editor.execute(Command::Export(format)).unwrap() else {
        panic!("expected an export");
    };
    assert_eq!(image.file_name(), "canvas.jpg");
}

#[test]
fn test_density_change_keeps_logical_position() {
    let config = SketchConfig {
        canvas_size: [100.0, 100.0],
        ..SketchConfig::default()
    };
    let mut editor = Editor::with_fonts(config, 1.0, FontBook::empty()).unwrap();
    editor.execute(Command::SetBrushWidth(8.0)).unwrap();
    gesture(&mut editor, Tool::Line, &[pos2(60.0, 80.0), pos2(95.0, 80.0)]);

    let is_ink = |p: Option<Rgba<u8>>| p.is_some_and(|p| p[0] < 16 && p[3] > 240);
    let is_paper = |p: Option<Rgba<u8>>| p == Some(Rgba([255, 255, 255, 255]));

    editor
        .execute(Command::Resize {
            logical_size: vec2(100.0, 100.0),
            pixels_per_point: 2.0,
        })
        .unwrap();
    assert_eq!((editor.surface().width(), editor.surface().height()), (200, 200));
    assert!(is_ink(editor.surface().pixel_at(pos2(80.0, 80.0))));
    assert!(is_paper(editor.surface().pixel_at(pos2(40.0, 40.0))));

    // And back down: content past half the canvas is not cropped
    editor
        .execute(Command::Resize {
            logical_size: vec2(100.0, 100.0),
            pixels_per_point: 1.0,
        })
        .unwrap();
    assert_eq!((editor.surface().width(), editor.surface().height()), (100, 100));
    assert!(is_ink(editor.surface().pixel_at(pos2(80.0, 80.0))));
    assert!(is_paper(editor.surface().pixel_at(pos2(40.0, 40.0))));
}

#[test]
fn test_style_change_shows_on_next_preview() {
    let mut editor = editor_with_background("#ffffff");
    editor.execute(Command::SelectTool(Tool::Line)).unwrap();
    editor.execute(Command::PointerDown(pos2(10.0, 50.0))).unwrap();
    editor.execute(Command::PointerMove(pos2(90.0, 50.0))).unwrap();
    assert_eq!(editor.surface().pixel_at(pos2(50.0, 50.0)), Some(Rgba([0, 0, 0, 255])));

    editor.execute(Command::SetColor(Color32::RED)).unwrap();
    assert!(editor.is_drawing());
    editor.execute(Command::SetBrushWidth(12.0)).unwrap();
    assert!(editor.is_drawing());

    editor.execute(Command::PointerMove(pos2(90.0, 50.0))).unwrap();
    assert_eq!(editor.surface().pixel_at(pos2(50.0, 50.0)), Some(Rgba([255, 0, 0, 255])));
    // The wider stroke reaches rows the old one did not
    assert_eq!(editor.surface().pixel_at(pos2(50.0, 55.0)), Some(Rgba([255, 0, 0, 255])));

    editor.execute(Command::PointerUp).unwrap();
    assert!(!editor.is_drawing());
}
