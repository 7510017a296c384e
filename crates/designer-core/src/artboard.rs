//! Artboards: fixed-size regions placed on an infinite canvas.
//!
//! Artboard `x`/`y` live in a shared canvas space; an artboard references
//! elements by id and never owns them.

use crate::canvas::CanvasState;
use crate::color;
use crate::element::{CanvasElement, ElementId};
use crate::error::DesignerResult;
use crate::presets::ArtboardPreset;
use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gap between artboards placed or arranged automatically.
pub const DEFAULT_ARTBOARD_GAP: f64 = 100.0;

/// Column count for grid arrangement.
pub const DEFAULT_GRID_COLUMNS: usize = 3;

/// A named rectangular region on the infinite canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artboard {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub background_color: String,
    #[serde(default)]
    pub element_ids: Vec<ElementId>,
    #[serde(default)]
    pub order: usize,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Artboard {
    /// The artboard's area in canvas space.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Background color for rendering.
    pub fn background(&self) -> DesignerResult<Color> {
        color::parse_color(&self.background_color)
    }

    fn placed_at(mut self, position: Point) -> Self {
        self.x = position.x;
        self.y = position.y;
        self
    }
}

/// Create an empty white artboard.
pub fn create_artboard(name: impl Into<String>, width: f64, height: f64, position: Point) -> Artboard {
    Artboard {
        id: Uuid::new_v4().to_string(),
        name: name.into(),
        width,
        height,
        x: position.x,
        y: position.y,
        background_color: "#ffffff".to_string(),
        element_ids: Vec::new(),
        order: 0,
        is_locked: false,
        is_visible: true,
    }
}

/// Create an artboard sized from a catalog preset.
pub fn create_from_preset(preset: &ArtboardPreset, position: Point) -> Artboard {
    create_artboard(preset.name, preset.width, preset.height, position)
}

/// Copy an artboard next to the existing ones. The copy starts with no
/// element references.
pub fn duplicate_artboard(artboard: &Artboard, existing: &[Artboard], gap: f64) -> Artboard {
    Artboard {
        id: Uuid::new_v4().to_string(),
        name: format!("{} Copy", artboard.name),
        element_ids: Vec::new(),
        order: existing.len(),
        ..artboard.clone()
    }
    .placed_at(calculate_next_position(existing, gap))
}

/// Position for a new artboard: `gap` to the right of the artboard with the
/// rightmost trailing edge, at that artboard's `y`. The origin when empty.
pub fn calculate_next_position(existing: &[Artboard], gap: f64) -> Point {
    existing
        .iter()
        .max_by(|a, b| (a.x + a.width).total_cmp(&(b.x + b.width)))
        .map_or(Point::ZERO, |rightmost| {
            Point::new(rightmost.x + rightmost.width + gap, rightmost.y)
        })
}

/// Inclusive rectangle test.
pub fn is_point_in_artboard(point: Point, artboard: &Artboard) -> bool {
    point.x >= artboard.x
        && point.x <= artboard.x + artboard.width
        && point.y >= artboard.y
        && point.y <= artboard.y + artboard.height
}

/// Topmost visible artboard under a point. Later artboards are on top.
pub fn find_artboard_at_point(point: Point, artboards: &[Artboard]) -> Option<&Artboard> {
    artboards
        .iter()
        .rev()
        .filter(|a| a.is_visible)
        .find(|a| is_point_in_artboard(point, a))
}

/// An element belongs to the artboard containing its center point.
pub fn is_element_in_artboard(element: &CanvasElement, artboard: &Artboard) -> bool {
    is_point_in_artboard(element.transform.center(), artboard)
}

/// Ids of the canvas elements whose centers fall inside `artboard`.
pub fn get_elements_in_artboard(canvas: &CanvasState, artboard: &Artboard) -> Vec<ElementId> {
    canvas
        .elements
        .iter()
        .filter(|el| is_element_in_artboard(el, artboard))
        .map(|el| el.id.clone())
        .collect()
}

/// Rebuild every artboard's element references from centroid membership.
/// An element under several artboards goes to the topmost visible one.
pub fn assign_elements_to_artboards(canvas: &CanvasState, artboards: &[Artboard]) -> Vec<Artboard> {
    let mut result: Vec<Artboard> = artboards
        .iter()
        .map(|a| Artboard {
            element_ids: Vec::new(),
            ..a.clone()
        })
        .collect();
    for element in &canvas.elements {
        let center = element.transform.center();
        if let Some(index) = (0..result.len())
            .rev()
            .find(|&i| result[i].is_visible && is_point_in_artboard(center, &result[i]))
        {
            result[index].element_ids.push(element.id.clone());
        }
    }
    result
}

/// Union of all artboard rectangles.
pub fn get_artboards_bounding_box(artboards: &[Artboard]) -> Option<Rect> {
    artboards.iter().map(Artboard::rect).reduce(|acc, r| acc.union(r))
}

/// Lay artboards out in rows of `columns`.
///
/// Each artboard is offset by its own size plus `gap` per column and row.
/// Rows of uneven height are not compensated, so mixed sizes can overlap.
pub fn arrange_artboards_grid(artboards: &[Artboard], columns: usize, gap: f64) -> Vec<Artboard> {
    let columns = columns.max(1);
    artboards
        .iter()
        .enumerate()
        .map(|(index, artboard)| {
            let col = (index % columns) as f64;
            let row = (index / columns) as f64;
            artboard.clone().placed_at(Point::new(
                col * (artboard.width + gap),
                row * (artboard.height + gap),
            ))
        })
        .collect()
}

/// Lay artboards out left to right, top-aligned at `y = 0`.
pub fn arrange_artboards_horizontal(artboards: &[Artboard], gap: f64) -> Vec<Artboard> {
    let mut cursor = 0.0;
    artboards
        .iter()
        .map(|artboard| {
            let placed = artboard.clone().placed_at(Point::new(cursor, 0.0));
            cursor += artboard.width + gap;
            placed
        })
        .collect()
}

/// Lay artboards out top to bottom, left-aligned at `x = 0`.
pub fn arrange_artboards_vertical(artboards: &[Artboard], gap: f64) -> Vec<Artboard> {
    let mut cursor = 0.0;
    artboards
        .iter()
        .map(|artboard| {
            let placed = artboard.clone().placed_at(Point::new(0.0, cursor));
            cursor += artboard.height + gap;
            placed
        })
        .collect()
}

/// Resize an artboard. With `maintain_aspect_ratio`, the dimension that
/// changed drives the other through the original ratio. Results are
/// rounded and never below 1.
pub fn resize_artboard(artboard: &Artboard, new_width: f64, new_height: f64, maintain_aspect_ratio: bool) -> Artboard {
    let (mut width, mut height) = (new_width, new_height);
    if maintain_aspect_ratio && artboard.width > 0.0 && artboard.height > 0.0 {
        let aspect = artboard.width / artboard.height;
        if (new_width - artboard.width).abs() >= (new_height - artboard.height).abs() {
            height = new_width / aspect;
        } else {
            width = new_height * aspect;
        }
    }
    Artboard {
        width: width.round().max(1.0),
        height: height.round().max(1.0),
        ..artboard.clone()
    }
}

/// Serialize one artboard to its canonical JSON shape.
pub fn export_artboard_config(artboard: &Artboard) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(artboard)
}

/// Parse an artboard exported by [`export_artboard_config`].
/// Malformed input yields `None`; callers keep their prior state.
pub fn import_artboard_config(json: &str) -> Option<Artboard> {
    match serde_json::from_str::<Artboard>(json) {
        Ok(artboard) => Some(artboard),
        Err(e) => {
            log::warn!("Failed to import artboard config: {}", e);
            None
        }
    }
}
