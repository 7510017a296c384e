//! Snap functionality for aligning values, points and elements to the grid.

use crate::canvas::CanvasState;
use crate::element::ElementId;
use crate::elements;
use kurbo::{Point, Vec2};

/// Default grid size for snapping.
pub const GRID_SIZE: f64 = 20.0;

/// Default rotation snap increment in degrees.
pub const ANGLE_SNAP_INCREMENT: f64 = 15.0;

/// Round a value to the nearest multiple of `grid_size`.
/// A non-positive grid size leaves the value untouched.
pub fn snap_to_grid(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap a point to the nearest grid intersection.
pub fn snap_point_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(snap_to_grid(point.x, grid_size), snap_to_grid(point.y, grid_size))
}

/// Snap an angle to the nearest increment.
/// Returns the snapped angle in degrees (0-360).
pub fn snap_rotation(angle_degrees: f64, increment: f64) -> f64 {
    if increment <= 0.0 {
        return crate::transform::normalize_degrees(angle_degrees);
    }
    crate::transform::normalize_degrees((angle_degrees / increment).round() * increment)
}

/// Move each element so its top-left corner lands on the grid.
/// Grouped descendants move with their group.
pub fn snap_elements_to_grid(canvas: &CanvasState, ids: &[ElementId], grid_size: f64) -> CanvasState {
    let moves: Vec<(ElementId, Vec2)> = ids
        .iter()
        .filter_map(|id| canvas.get(id))
        .map(|el| {
            let origin = Point::new(el.transform.x, el.transform.y);
            (el.id.clone(), snap_point_to_grid(origin, grid_size) - origin)
        })
        .collect();

    let mut next = canvas.clone();
    for (id, delta) in moves {
        crate::transform::translate_in_place(&mut next, std::slice::from_ref(&id), delta);
    }
    elements::refresh_group_bounds(&next)
}
