//! Integration tests: canvas geometry and structure (designer-core).
//!
//! Exercises the pure element and transform operations end to end over
//! canvas snapshots, checking the guarantees a rendering layer relies on.

use designer_core::elements::{self, ReorderDirection};
use designer_core::transform::{self, AlignTo, Alignment, DistributeDirection};
use designer_core::{CanvasElement, CanvasState, ElementId, ElementKind, Transform};
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rect(id: &str, x: f64, y: f64, width: f64, height: f64) -> CanvasElement {
    CanvasElement::new(
        ElementKind::Shape {
            shape_id: "rect".to_string(),
            fill: "#3366ff".to_string(),
            stroke: "#000000".to_string(),
            stroke_width: 1.0,
        },
        Transform::new(x, y, width, height),
    )
    .with_id(id)
    .with_name(id.to_uppercase())
}

fn canvas_with(items: Vec<CanvasElement>) -> CanvasState {
    items
        .into_iter()
        .fold(CanvasState::default(), |canvas, el| elements::add_element(&canvas, el))
}

fn ids(names: &[&str]) -> Vec<ElementId> {
    names.iter().map(|s| s.to_string()).collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

// ─── Grouping ───────────────────────────────────────────────────────────

#[test]
fn group_then_ungroup_restores_transforms() {
    init_logging();
    let mut c = rect("c", 300.0, 40.0, 25.0, 75.0);
    c.transform.rotation = 33.0;
    let canvas = canvas_with(vec![
        rect("a", 10.5, 20.25, 100.0, 50.0),
        rect("b", -40.0, 90.0, 60.0, 60.0),
        c,
    ]);

    let (grouped, group_id) = elements::group_elements(&canvas, &ids(&["a", "b", "c"])).unwrap();
    assert!(grouped.get(&group_id).unwrap().is_group());

    let ungrouped = elements::ungroup_elements(&grouped, &group_id);
    for id in ["a", "b", "c"] {
        let before = canvas.get(id).unwrap();
        let after = ungrouped.get(id).unwrap();
        assert_eq!(after.transform, before.transform);
        assert_eq!(after.parent_id, None);
    }
    assert!(!ungrouped.contains(&group_id));
}

#[test]
fn group_needs_two_elements() {
    init_logging();
    let canvas = canvas_with(vec![rect("a", 0.0, 0.0, 10.0, 10.0)]);
    assert!(elements::group_elements(&canvas, &ids(&["a"])).is_none());
    assert!(elements::group_elements(&canvas, &ids(&["a", "missing"])).is_none());
}

#[test]
fn nested_group_moves_as_one() {
    init_logging();
    let canvas = canvas_with(vec![
        rect("a", 0.0, 0.0, 10.0, 10.0),
        rect("b", 20.0, 0.0, 10.0, 10.0),
        rect("c", 40.0, 0.0, 10.0, 10.0),
    ]);
    let (canvas, inner) = elements::group_elements(&canvas, &ids(&["a", "b"])).unwrap();
    let (canvas, outer) = elements::group_elements(&canvas, &[inner.clone(), "c".to_string()]).unwrap();

    let moved = transform::move_elements(&canvas, &[outer.clone()], 5.0, 7.0);
    for id in ["a", "b", "c"] {
        let before = canvas.get(id).unwrap().transform;
        let after = moved.get(id).unwrap().transform;
        assert_eq!((after.x, after.y), (before.x + 5.0, before.y + 7.0));
    }
    let bounds = moved.get(&outer).unwrap().transform;
    assert_eq!((bounds.x, bounds.y, bounds.width, bounds.height), (5.0, 7.0, 50.0, 10.0));
    assert_eq!(elements::get_root_parent(&moved, "a").unwrap().id, outer);
}

// ─── Z-order ────────────────────────────────────────────────────────────

#[test]
fn reorder_front_scenario() {
    init_logging();
    let canvas = canvas_with(vec![rect("a", 0.0, 0.0, 10.0, 10.0), rect("b", 0.0, 0.0, 10.0, 10.0)]);
    let next = elements::reorder_element(&canvas, "a", ReorderDirection::Front);
    assert_eq!(next.ids(), ids(&["b", "a"]));
    assert_eq!(next.get("a").unwrap().z_index, 1);
    assert_eq!(next.get("b").unwrap().z_index, 0);
}

#[test]
fn last_front_and_back_win() {
    init_logging();
    let mut canvas = canvas_with(
        ["a", "b", "c", "d", "e"]
            .iter()
            .map(|id| rect(id, 0.0, 0.0, 10.0, 10.0))
            .collect(),
    );
    let moves = [
        ("c", ReorderDirection::Front),
        ("a", ReorderDirection::Back),
        ("e", ReorderDirection::Backward),
        ("b", ReorderDirection::Front),
        ("d", ReorderDirection::Forward),
        ("e", ReorderDirection::Back),
        ("c", ReorderDirection::Backward),
    ];
    for (id, direction) in moves {
        canvas = elements::reorder_element(&canvas, id, direction);
    }
    assert_eq!(canvas.ids(), ids(&["e", "c", "a", "d", "b"]));
    let max = canvas.elements.iter().map(|el| el.z_index).max().unwrap();
    let min = canvas.elements.iter().map(|el| el.z_index).min().unwrap();
    assert_eq!(canvas.get("b").unwrap().z_index, max);
    assert_eq!(canvas.get("e").unwrap().z_index, min);
    for (index, el) in canvas.elements.iter().enumerate() {
        assert_eq!(el.z_index, index as i64);
    }
}

// ─── Geometry ───────────────────────────────────────────────────────────

#[test]
fn rotated_bounds_swap_axes() {
    let mut el = rect("a", 0.0, 0.0, 100.0, 50.0);
    el.transform.rotation = 90.0;
    let bounds = transform::get_element_bounds(&el);
    assert_close(bounds.width(), 50.0);
    assert_close(bounds.height(), 100.0);
    assert_close(bounds.center().x, 50.0);
    assert_close(bounds.center().y, 25.0);
}

#[test]
fn align_center_to_selection() {
    let canvas = canvas_with(vec![
        rect("a", 0.0, 0.0, 50.0, 10.0),
        rect("b", 100.0, 30.0, 100.0, 10.0),
        rect("c", 70.0, 60.0, 20.0, 10.0),
    ]);
    let aligned = transform::align_elements(&canvas, &ids(&["a", "b", "c"]), Alignment::Center, AlignTo::Selection);
    for id in ["a", "b", "c"] {
        let t = aligned.get(id).unwrap().transform;
        assert_close(t.x + t.width / 2.0, 100.0);
        assert_eq!(t.y, canvas.get(id).unwrap().transform.y);
    }
}

#[test]
fn distribute_three_equal_gaps() {
    let canvas = canvas_with(vec![
        rect("a", 0.0, 0.0, 20.0, 10.0),
        rect("b", 210.0, 0.0, 30.0, 10.0),
        rect("c", 300.0, 0.0, 40.0, 10.0),
    ]);
    let next = transform::distribute_elements(&canvas, &ids(&["c", "a", "b"]), DistributeDirection::Horizontal).unwrap();
    let a = next.get("a").unwrap().transform;
    let b = next.get("b").unwrap().transform;
    let c = next.get("c").unwrap().transform;
    assert_eq!((a.x, c.x), (0.0, 300.0));
    assert_close(b.x - (a.x + a.width), c.x - (b.x + b.width));

    assert!(transform::distribute_elements(&canvas, &ids(&["a", "b"]), DistributeDirection::Horizontal).is_none());
}

#[test]
fn duplicate_scenario() {
    let canvas = canvas_with(vec![rect("a", 10.0, 10.0, 50.0, 50.0)]);
    let (next, copies) = elements::duplicate_elements(&canvas, &ids(&["a"]));
    assert_eq!(copies.len(), 1);
    assert_ne!(copies[0], "a");
    let copy = next.get(&copies[0]).unwrap();
    assert_eq!(copy.transform, Transform::new(30.0, 30.0, 50.0, 50.0));
    assert_eq!(copy.name, "A Copy");
    assert_eq!(copy.z_index, 1);
}

// ─── Delete policy ──────────────────────────────────────────────────────

#[test]
fn delete_strips_children_and_empty_groups() {
    init_logging();
    let canvas = canvas_with(vec![rect("a", 0.0, 0.0, 10.0, 10.0), rect("b", 20.0, 0.0, 10.0, 10.0)]);
    let (canvas, group_id) = elements::group_elements(&canvas, &ids(&["a", "b"])).unwrap();

    let partial = elements::delete_elements(&canvas, &ids(&["a"]));
    assert_eq!(partial.get(&group_id).unwrap().child_ids(), ids(&["b"]).as_slice());
    assert!(partial.validate().is_ok());

    let emptied = elements::delete_elements(&partial, &ids(&["b"]));
    assert!(emptied.is_empty());
}

#[test]
fn json_roundtrip_keeps_structure() {
    let canvas = canvas_with(vec![rect("a", 0.0, 0.0, 10.0, 10.0), rect("b", 20.0, 0.0, 10.0, 10.0)]);
    let (canvas, _) = elements::group_elements(&canvas, &ids(&["a", "b"])).unwrap();
    let json = canvas.to_json().unwrap();
    assert!(json.contains("\"childIds\""));
    assert!(json.contains("\"zIndex\""));
    assert_eq!(CanvasState::from_json(&json).unwrap(), canvas);
}
