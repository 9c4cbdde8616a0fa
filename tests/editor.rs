//! End-to-end editing flows driven through the public session API.

use image::{Rgba, RgbaImage};
use touchup::{EditorConfig, EditorSession, MAX_HISTORY, Tool};

const RED: Rgba<u8> = Rgba([200, 30, 30, 255]);

fn red_session() -> EditorSession {
    let img = RgbaImage::from_pixel(100, 100, RED);
    EditorSession::from_image(img, EditorConfig::default())
}

fn all_alpha(session: &EditorSession, expected: u8) -> bool {
    session.working().pixels().all(|p| p[3] == expected)
}

#[test]
fn wand_click_clears_a_uniform_image_and_undo_brings_it_back() {
    let mut s = red_session();
    s.set_tool(Tool::MagicWand);
    s.set_tolerance(10);

    s.pointer_down(50.0, 50.0);
    s.pointer_up();
    assert!(all_alpha(&s, 0));

    assert!(s.undo());
    assert!(all_alpha(&s, 255));
}

#[test]
fn erased_then_restored_pixel_equals_the_original_exactly() {
    let mut s = red_session();
    s.set_brush_size(10);

    s.pointer_down(20.0, 20.0);
    s.pointer_up();
    assert_eq!(s.working().get_pixel(20, 20)[3], 0);

    s.set_tool(Tool::Restore);
    s.pointer_down(20.0, 20.0);
    s.pointer_up();
    assert_eq!(s.working().get_pixel(20, 20), s.original().get_pixel(20, 20));
}

#[test]
fn restore_over_the_same_path_inverts_an_erase() {
    let mut s = red_session();
    s.set_brush_size(16);

    s.pointer_down(30.0, 30.0);
    s.pointer_move(60.0, 60.0);
    s.pointer_up();
    assert!(!all_alpha(&s, 255));

    s.set_tool(Tool::Restore);
    s.pointer_down(30.0, 30.0);
    s.pointer_move(60.0, 60.0);
    s.pointer_up();
    assert_eq!(s.working().as_raw(), s.original().as_raw());
}

#[test]
fn undo_then_redo_reproduces_every_state_byte_for_byte() {
    let mut s = red_session();
    s.set_brush_size(8);
    let initial = s.working().clone();

    let mut states = Vec::new();
    for i in 0..5 {
        let y = 10.0 + 15.0 * i as f32;
        s.pointer_down(10.0, y);
        s.pointer_move(90.0, y);
        s.pointer_up();
        states.push(s.working().clone());
    }

    for i in (0..4).rev() {
        assert!(s.undo());
        assert_eq!(s.working().as_raw(), states[i].as_raw());
    }
    assert!(s.undo());
    assert_eq!(s.working().as_raw(), initial.as_raw());
    assert!(!s.can_undo());

    for state in &states {
        assert!(s.redo());
        assert_eq!(s.working().as_raw(), state.as_raw());
    }
    assert!(!s.can_redo());
}

#[test]
fn history_stays_capped_and_undo_reaches_only_the_oldest_retained_state() {
    let mut s = red_session();
    s.set_brush_size(4);

    let mut states = Vec::new();
    for i in 0..MAX_HISTORY + 5 {
        let x = 10.0 + (i % 5) as f32 * 18.0;
        let y = 10.0 + (i / 5) as f32 * 18.0;
        s.pointer_down(x, y);
        s.pointer_up();
        states.push(s.working().clone());
    }

    assert_eq!(s.history_len(), MAX_HISTORY);

    let mut undos = 0;
    while s.undo() {
        undos += 1;
    }
    assert_eq!(undos, MAX_HISTORY - 1);
    // Initial snapshot plus the first five edits were evicted, so the walk
    // ends on the state left by edit #6.
    assert_eq!(s.working().as_raw(), states[5].as_raw());
}

#[test]
fn new_edit_after_undo_discards_the_redo_branch() {
    let mut s = red_session();
    s.set_brush_size(6);

    s.pointer_down(20.0, 20.0);
    s.pointer_up();
    s.pointer_down(80.0, 80.0);
    s.pointer_up();
    assert!(s.undo());
    assert!(s.can_redo());

    s.pointer_down(50.0, 50.0);
    s.pointer_up();
    assert!(!s.can_redo());
    assert!(!s.redo());
    // The divergent state is still undoable.
    assert!(s.undo());
    assert_eq!(s.working().get_pixel(50, 50)[3], 255);
}

#[test]
fn the_same_content_point_is_hit_at_any_zoom() {
    let mut s = red_session();
    s.set_brush_size(6);
    s.set_display_box(0.0, 0.0, 100.0, 100.0);

    s.pointer_down(40.0, 40.0);
    s.pointer_up();
    assert_eq!(s.working().get_pixel(40, 40)[3], 0);
    assert!(s.undo());

    // Zoomed to 2x the box doubles; the same content point now sits at
    // display (80, 80).
    s.set_zoom(2.0);
    s.pointer_down(80.0, 80.0);
    s.pointer_up();
    assert_eq!(s.working().get_pixel(40, 40)[3], 0);
}

#[test]
fn export_png_round_trips_the_working_buffer() {
    let mut s = red_session();
    s.set_tool(Tool::MagicWand);
    s.pointer_down(50.0, 50.0);
    s.pointer_up();

    let bytes = s.export_png().unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (100, 100));
    assert!(decoded.pixels().all(|p| p[3] == 0));
    assert_eq!(decoded.get_pixel(0, 0)[0], 200);
}
