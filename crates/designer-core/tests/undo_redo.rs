//! Integration tests: undo/redo through a design session (designer-core).
//!
//! Every edit goes through `DesignSession`, which records a diff-based
//! command; undoing must restore the exact prior canvas.

use designer_core::command::CommandType;
use designer_core::elements::ReorderDirection;
use designer_core::{
    CanvasElement, CanvasState, DesignSession, DesignerConfig, ElementId, ElementKind, ElementPatch,
    HistoryManager, ResizeHandle, Transform,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn text(id: &str, x: f64, y: f64) -> CanvasElement {
    CanvasElement::new(
        ElementKind::Text {
            content: "Hello".to_string(),
            font_size: 24.0,
            font_family: "Inter".to_string(),
            fill: "#111111".to_string(),
        },
        Transform::new(x, y, 120.0, 40.0),
    )
    .with_id(id)
}

fn session_with(names: &[&str]) -> DesignSession {
    let mut session = DesignSession::default();
    for (i, id) in names.iter().enumerate() {
        session.add_element(text(id, i as f64 * 50.0, 0.0));
    }
    session
}

fn ids(names: &[&str]) -> Vec<ElementId> {
    names.iter().map(|s| s.to_string()).collect()
}

// ─── Ledger ─────────────────────────────────────────────────────────────

#[test]
fn undo_enables_redo_and_new_edit_clears_it() {
    init_logging();
    let mut session = session_with(&["a", "b", "c"]);
    assert_eq!(session.history().undo_count(), 3);

    session.undo();
    assert!(session.can_redo());
    assert_eq!(session.history().redo_count(), 1);

    session.move_elements(&ids(&["a"]), 1.0, 1.0);
    assert!(!session.can_redo());
}

#[test]
fn history_is_capped() {
    let mut session = session_with(&["a"]);
    for _ in 0..60 {
        session.move_elements(&ids(&["a"]), 1.0, 0.0);
    }
    assert_eq!(session.history().undo_count(), HistoryManager::new().capacity());
}

// ─── Structural edits ───────────────────────────────────────────────────

#[test]
fn undo_delete_restores_position() {
    init_logging();
    let mut session = session_with(&["a", "b", "c"]);
    let before: CanvasState = session.canvas().clone();

    assert!(session.delete_elements(&ids(&["b"])));
    assert_eq!(session.canvas().ids(), ids(&["a", "c"]));

    session.undo();
    assert_eq!(session.canvas(), &before);
    session.redo();
    assert_eq!(session.canvas().ids(), ids(&["a", "c"]));
}

#[test]
fn undo_group_and_ungroup() {
    init_logging();
    let mut session = session_with(&["a", "b", "c"]);
    let before = session.canvas().clone();

    let group_id = session.group_elements(&ids(&["a", "c"])).unwrap();
    let grouped = session.canvas().clone();
    assert_eq!(grouped.get("a").unwrap().parent_id.as_deref(), Some(group_id.as_str()));

    assert!(session.ungroup_elements(&group_id));
    assert!(!session.canvas().contains(&group_id));

    session.undo();
    assert_eq!(session.canvas(), &grouped);
    session.undo();
    assert_eq!(session.canvas(), &before);
}

#[test]
fn undo_reorder() {
    let mut session = session_with(&["a", "b"]);
    assert!(session.reorder_element("a", ReorderDirection::Front));
    assert_eq!(session.canvas().ids(), ids(&["b", "a"]));
    let command = session.undo().unwrap();
    assert_eq!(command.command_type, CommandType::Reorder);
    assert_eq!(session.canvas().ids(), ids(&["a", "b"]));
    assert_eq!(session.canvas().get("a").unwrap().z_index, 0);
}

#[test]
fn undo_duplicate_removes_copies() {
    let mut session = session_with(&["a"]);
    let before = session.canvas().clone();
    let copies = session.duplicate_elements(&ids(&["a"]));
    assert_eq!(session.canvas().len(), 2);
    assert_eq!(session.canvas().get(&copies[0]).unwrap().transform.x, 20.0);

    session.undo();
    assert_eq!(session.canvas(), &before);
    session.redo();
    assert!(session.canvas().contains(&copies[0]));
}

// ─── Geometry edits ─────────────────────────────────────────────────────

#[test]
fn undo_resize_and_style() {
    let mut session = session_with(&["a"]);
    let before = session.canvas().clone();

    assert!(session.resize_element("a", ResizeHandle::BottomRight, 30.0, 10.0, false));
    let t = session.canvas().get("a").unwrap().transform;
    assert_eq!((t.width, t.height), (150.0, 50.0));

    let patch = ElementPatch {
        opacity: Some(0.5),
        ..ElementPatch::default()
    };
    assert!(session.update_elements(&ids(&["a"]), &patch));
    assert_eq!(session.canvas().get("a").unwrap().opacity, 0.5);

    session.undo();
    session.undo();
    assert_eq!(session.canvas(), &before);
}

#[test]
fn undo_rotate_inside_group_restores_group_bounds() {
    init_logging();
    let mut session = session_with(&["a", "b"]);
    let group_id = session.group_elements(&ids(&["a", "b"])).unwrap();
    let before = session.canvas().clone();

    assert!(session.rotate_element("a", 90.0, false));
    assert_ne!(
        session.canvas().get(&group_id).unwrap().transform,
        before.get(&group_id).unwrap().transform
    );

    session.undo();
    assert_eq!(session.canvas(), &before);
    session.redo();
    assert_eq!(session.canvas().get("a").unwrap().transform.rotation, 90.0);
}

#[test]
fn configured_grid_snap() {
    let config = DesignerConfig::from_json(r#"{ "gridSize": 25 }"#).unwrap();
    let mut session = DesignSession::new(CanvasState::default(), config);
    session.add_element(text("a", 13.0, 37.0));
    assert!(session.snap_to_grid(&ids(&["a"])));
    let t = session.canvas().get("a").unwrap().transform;
    assert_eq!((t.x, t.y), (25.0, 25.0));
    session.undo();
    assert_eq!(session.canvas().get("a").unwrap().transform.x, 13.0);
}
