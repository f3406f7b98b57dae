use eframe_sketch::history::{DEFAULT_HISTORY_DEPTH, HistoryLimits};
use eframe_sketch::text::FontBook;
use eframe_sketch::{CanvasError, Command, Editor, Frame, History, Outcome, SketchConfig, Tool};
use egui::pos2;

fn tagged(tag: usize) -> Frame {
    Frame::from_encoded(tag.to_le_bytes().to_vec())
}

fn small_editor() -> Editor {
    let config = SketchConfig {
        canvas_size: [120.0, 80.0],
        ..SketchConfig::default()
    };
    Editor::with_fonts(config, 1.0, FontBook::empty()).unwrap()
}

fn drag(editor: &mut Editor, from: egui::Pos2, to: egui::Pos2) {
    editor.execute(Command::PointerDown(from)).unwrap();
    editor.execute(Command::PointerMove(to)).unwrap();
    editor.execute(Command::PointerUp).unwrap();
}

#[test]
fn test_undo_depth_up_to_limit() {
    for count in [0, 1, 17, DEFAULT_HISTORY_DEPTH] {
        let mut history = History::default();
        for tag in 0..count {
            history.push_undo(tagged(tag));
        }
        assert_eq!(history.undo_len(), count);
    }
}

#[test]
fn test_oldest_snapshots_are_evicted() {
    let mut history = History::new(HistoryLimits::default());
    for tag in 0..60 {
        history.push_undo(tagged(tag));
    }
    assert_eq!(history.undo_len(), DEFAULT_HISTORY_DEPTH);

    // Stepping all the way back ends at entry 10; entries 0..10 are gone
    let mut last = None;
    while let Some(frame) = history.undo(tagged(999)) {
        last = Some(frame);
    }
    assert_eq!(last, Some(tagged(10)));
}

#[test]
fn test_undo_then_redo_restores_exact_bytes() {
    let mut editor = small_editor();
    editor.execute(Command::SelectTool(Tool::Rectangle)).unwrap();
    drag(&mut editor, pos2(10.0, 10.0), pos2(60.0, 50.0));
    let before = editor.surface().snapshot().unwrap();

    assert_eq!(editor.execute(Command::Undo).unwrap(), Outcome::Done);
    assert_ne!(editor.surface().snapshot().unwrap(), before);
    assert_eq!(editor.execute(Command::Redo).unwrap(), Outcome::Done);
    assert_eq!(editor.surface().snapshot().unwrap().as_bytes(), before.as_bytes());
}

#[test]
fn test_new_edit_after_undo_discards_redo() {
    let mut editor = small_editor();
    editor.execute(Command::SelectTool(Tool::Line)).unwrap();
    drag(&mut editor, pos2(5.0, 5.0), pos2(100.0, 5.0));
    editor.execute(Command::Undo).unwrap();
    assert!(editor.history().can_redo());

    drag(&mut editor, pos2(5.0, 40.0), pos2(100.0, 40.0));
    assert_eq!(editor.execute(Command::Redo).unwrap(), Outcome::NothingToRedo);
}

#[test]
fn test_clear_is_undoable() {
    let mut editor = small_editor();
    drag(&mut editor, pos2(10.0, 10.0), pos2(50.0, 50.0));
    let drawn = editor.surface().snapshot().unwrap();

    editor.execute(Command::Clear).unwrap();
    assert_ne!(editor.surface().snapshot().unwrap(), drawn);
    editor.execute(Command::Undo).unwrap();
    assert_eq!(editor.surface().snapshot().unwrap(), drawn);
}

#[test]
fn test_corrupt_snapshot_leaves_everything_untouched() {
    let mut editor = small_editor();
    editor.execute(Command::SelectTool(Tool::Circle)).unwrap();
    drag(&mut editor, pos2(60.0, 40.0), pos2(80.0, 40.0));
    editor.push_snapshot(Frame::from_encoded(vec![0xde, 0xad, 0xbe, 0xef]));

    let pixels = editor.surface().capture_all();
    let undo_len = editor.history().undo_len();

    let result = editor.execute(Command::Undo);
    assert!(matches!(result, Err(CanvasError::SnapshotDecode(_))));
    assert_eq!(editor.surface().capture_all(), pixels);
    assert_eq!(editor.history().undo_len(), undo_len);
    assert_eq!(editor.history().redo_len(), 0);
}
