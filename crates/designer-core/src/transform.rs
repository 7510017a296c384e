//! Geometry over canvas elements: rotated bounds, move, resize, rotate,
//! hit-testing, align and distribute.
//!
//! Element transforms are always canvas-absolute. A group's transform is a
//! cached bounding box of its descendants and is never used as a coordinate
//! origin, so grouping never rewrites child coordinates.

use crate::canvas::CanvasState;
use crate::element::{CanvasElement, ElementId, Transform};
use crate::elements;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Minimum width/height an element can be resized to.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

/// Resize handle positions around an element's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    #[serde(rename = "nw")]
    TopLeft,
    #[serde(rename = "n")]
    Top,
    #[serde(rename = "ne")]
    TopRight,
    #[serde(rename = "e")]
    Right,
    #[serde(rename = "se")]
    BottomRight,
    #[serde(rename = "s")]
    Bottom,
    #[serde(rename = "sw")]
    BottomLeft,
    #[serde(rename = "w")]
    Left,
}

impl ResizeHandle {
    /// Corner handles are the only ones that honor aspect-ratio lock.
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft
                | ResizeHandle::TopRight
                | ResizeHandle::BottomLeft
                | ResizeHandle::BottomRight
        )
    }

    fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::Left | ResizeHandle::BottomLeft
        )
    }

    fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeHandle::TopRight | ResizeHandle::Right | ResizeHandle::BottomRight
        )
    }

    fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::Top | ResizeHandle::TopRight
        )
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeHandle::BottomLeft | ResizeHandle::Bottom | ResizeHandle::BottomRight
        )
    }
}

/// Edge or center to align a selection on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Reference rectangle for alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignTo {
    Canvas,
    #[default]
    Selection,
}

/// Axis for distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributeDirection {
    Horizontal,
    Vertical,
}

/// Axis-aligned bounds of a possibly rotated element, centered on the
/// element's own center.
pub fn get_element_bounds(element: &CanvasElement) -> Rect {
    let t = &element.transform;
    let radians = t.rotation.to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    let rotated_width = t.width * cos + t.height * sin;
    let rotated_height = t.width * sin + t.height * cos;
    Rect::from_center_size(t.center(), (rotated_width, rotated_height))
}

/// Union of the rotated bounds of every element, or `None` when empty.
pub fn get_group_bounds<'a>(elements: impl IntoIterator<Item = &'a CanvasElement>) -> Option<Rect> {
    elements
        .into_iter()
        .map(get_element_bounds)
        .reduce(|acc, bounds| acc.union(bounds))
}

/// Translate elements by `(dx, dy)`. Moving a group moves its descendants;
/// locked elements stay put.
pub fn move_elements(canvas: &CanvasState, ids: &[ElementId], dx: f64, dy: f64) -> CanvasState {
    let mut next = canvas.clone();
    translate_in_place(&mut next, ids, Vec2::new(dx, dy));
    elements::refresh_bounds_in_place(&mut next);
    next
}

/// Translate the given elements and their descendants, once each.
pub(crate) fn translate_in_place(canvas: &mut CanvasState, ids: &[ElementId], delta: Vec2) {
    if delta == Vec2::ZERO {
        return;
    }
    let mut targets: HashSet<ElementId> = HashSet::new();
    for id in ids {
        if canvas.get(id).is_some_and(|el| !el.locked) {
            targets.insert(id.clone());
            targets.extend(elements::get_descendant_ids(canvas, id));
        }
    }
    for element in canvas.elements.iter_mut() {
        if targets.contains(&element.id) && !element.locked {
            element.transform = element.transform.translated(delta);
        }
    }
}

/// Resize an element by dragging one of its handles by `(dx, dy)`.
///
/// The edge or corner opposite the handle stays fixed. Width and height never
/// drop below [`MIN_ELEMENT_SIZE`]. With `maintain_aspect_ratio`, corner
/// handles derive the height from the new width using the original ratio.
pub fn resize_element(
    element: &CanvasElement,
    handle: ResizeHandle,
    dx: f64,
    dy: f64,
    maintain_aspect_ratio: bool,
) -> CanvasElement {
    let t = element.transform;
    let mut width = t.width;
    let mut height = t.height;

    if handle.moves_right() {
        width = t.width + dx;
    } else if handle.moves_left() {
        width = t.width - dx;
    }
    if handle.moves_bottom() {
        height = t.height + dy;
    } else if handle.moves_top() {
        height = t.height - dy;
    }

    width = width.max(MIN_ELEMENT_SIZE);
    if maintain_aspect_ratio && handle.is_corner() && t.width > 0.0 && t.height > 0.0 {
        let aspect = t.width / t.height;
        height = width / aspect;
    }
    height = height.max(MIN_ELEMENT_SIZE);

    let x = if handle.moves_left() { t.x + t.width - width } else { t.x };
    let y = if handle.moves_top() { t.y + t.height - height } else { t.y };

    let mut resized = element.clone();
    resized.transform = Transform {
        x,
        y,
        width,
        height,
        ..t
    };
    resized
}

/// Rotate an element by `delta_degrees`; the result is normalized into [0, 360).
pub fn rotate_element(element: &CanvasElement, delta_degrees: f64) -> CanvasElement {
    let mut rotated = element.clone();
    rotated.transform.rotation = normalize_degrees(element.transform.rotation + delta_degrees);
    rotated
}

pub(crate) fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Hit test against the unrotated box. Rotation is ignored.
pub fn is_point_in_element(point: Point, element: &CanvasElement) -> bool {
    let t = &element.transform;
    point.x >= t.x && point.x <= t.x + t.width && point.y >= t.y && point.y <= t.y + t.height
}

/// Align elements to an edge or center of the canvas or of the selection's
/// bounds. Only the axis named by `alignment` changes.
pub fn align_elements(
    canvas: &CanvasState,
    ids: &[ElementId],
    alignment: Alignment,
    align_to: AlignTo,
) -> CanvasState {
    let selected: Vec<&CanvasElement> = ids.iter().filter_map(|id| canvas.get(id)).collect();
    let reference = match align_to {
        AlignTo::Canvas => Some(canvas.rect()),
        AlignTo::Selection => get_group_bounds(selected.iter().copied()),
    };
    let Some(reference) = reference else {
        return canvas.clone();
    };

    let moves: Vec<(ElementId, Vec2)> = selected
        .iter()
        .map(|el| {
            let t = &el.transform;
            let delta = match alignment {
                Alignment::Left => Vec2::new(reference.x0 - t.x, 0.0),
                Alignment::Center => Vec2::new(reference.center().x - t.width / 2.0 - t.x, 0.0),
                Alignment::Right => Vec2::new(reference.x1 - t.width - t.x, 0.0),
                Alignment::Top => Vec2::new(0.0, reference.y0 - t.y),
                Alignment::Middle => Vec2::new(0.0, reference.center().y - t.height / 2.0 - t.y),
                Alignment::Bottom => Vec2::new(0.0, reference.y1 - t.height - t.y),
            };
            (el.id.clone(), delta)
        })
        .collect();

    let mut next = canvas.clone();
    for (id, delta) in moves {
        translate_in_place(&mut next, std::slice::from_ref(&id), delta);
    }
    elements::refresh_bounds_in_place(&mut next);
    next
}

/// Spread elements so the gaps between neighbours are equal.
///
/// The first and last elements along the axis stay fixed. Returns `None`
/// when fewer than three elements are found.
pub fn distribute_elements(
    canvas: &CanvasState,
    ids: &[ElementId],
    direction: DistributeDirection,
) -> Option<CanvasState> {
    let mut selected: Vec<&CanvasElement> = ids.iter().filter_map(|id| canvas.get(id)).collect();
    if selected.len() < 3 {
        return None;
    }

    let axis = |t: &Transform| match direction {
        DistributeDirection::Horizontal => (t.x, t.width),
        DistributeDirection::Vertical => (t.y, t.height),
    };
    selected.sort_by(|a, b| axis(&a.transform).0.total_cmp(&axis(&b.transform).0));

    let (first_start, _) = axis(&selected[0].transform);
    let (last_start, last_size) = axis(&selected[selected.len() - 1].transform);
    let span = last_start + last_size - first_start;
    let total_size: f64 = selected.iter().map(|el| axis(&el.transform).1).sum();
    let gap = (span - total_size) / (selected.len() - 1) as f64;

    let mut moves: Vec<(ElementId, Vec2)> = Vec::new();
    let (_, first_size) = axis(&selected[0].transform);
    let mut cursor = first_start + first_size + gap;
    for el in &selected[1..selected.len() - 1] {
        let (start, size) = axis(&el.transform);
        let offset = cursor - start;
        let delta = match direction {
            DistributeDirection::Horizontal => Vec2::new(offset, 0.0),
            DistributeDirection::Vertical => Vec2::new(0.0, offset),
        };
        moves.push((el.id.clone(), delta));
        cursor += size + gap;
    }

    let mut next = canvas.clone();
    for (id, delta) in moves {
        translate_in_place(&mut next, std::slice::from_ref(&id), delta);
    }
    elements::refresh_bounds_in_place(&mut next);
    Some(next)
}
