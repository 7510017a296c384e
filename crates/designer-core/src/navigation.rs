//! Viewport fitting for artboard navigation.

use crate::artboard::{Artboard, get_artboards_bounding_box};
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Padding around fitted content, in screen pixels.
pub const DEFAULT_FIT_PADDING: f64 = 50.0;

/// Zoom and pan of a viewport onto the infinite canvas.
///
/// A world point `p` is drawn at `p * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    /// World-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.transform().inverse() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }
}

/// Fit `bounds` inside a viewport of `viewport` size, leaving `padding` on
/// every side. Never zooms in past 100%. Degenerate bounds give the
/// identity viewport.
pub fn zoom_to_fit_bounds(bounds: Rect, viewport: Size, padding: f64) -> Viewport {
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Viewport::default();
    }

    let padded = Size::new(
        (viewport.width - padding * 2.0).max(1.0),
        (viewport.height - padding * 2.0).max(1.0),
    );
    let zoom = (padded.width / bounds.width())
        .min(padded.height / bounds.height())
        .min(1.0);

    let bounds_center = bounds.center();
    let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
    Viewport {
        zoom,
        pan: Vec2::new(
            viewport_center.x - bounds_center.x * zoom,
            viewport_center.y - bounds_center.y * zoom,
        ),
    }
}

/// Fit every artboard.
pub fn zoom_to_fit_all(artboards: &[Artboard], viewport: Size, padding: f64) -> Viewport {
    match get_artboards_bounding_box(artboards) {
        Some(bounds) => zoom_to_fit_bounds(bounds, viewport, padding),
        None => Viewport::default(),
    }
}

pub fn zoom_to_fit_artboard(artboard: &Artboard, viewport: Size, padding: f64) -> Viewport {
    zoom_to_fit_bounds(artboard.rect(), viewport, padding)
}

/// Fit the one selected artboard; with zero or several selected, fit all.
pub fn zoom_to_fit_selected(
    artboards: &[Artboard],
    selected_ids: &[String],
    viewport: Size,
    padding: f64,
) -> Viewport {
    let selected: Vec<&Artboard> = artboards
        .iter()
        .filter(|a| selected_ids.contains(&a.id))
        .collect();
    match selected.as_slice() {
        [only] => zoom_to_fit_artboard(only, viewport, padding),
        _ => zoom_to_fit_all(artboards, viewport, padding),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artboard::create_artboard;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_fit_large_artboard() {
        let artboard = create_artboard("A", 1000.0, 1000.0, Point::ZERO);
        let viewport = zoom_to_fit_artboard(&artboard, Size::new(500.0, 500.0), 0.0);
        assert_close(viewport.zoom, 0.5);
        assert_close(viewport.pan.x, 0.0);
        assert_close(viewport.pan.y, 0.0);
    }

    #[test]
    fn test_never_zooms_past_full_size() {
        let artboard = create_artboard("A", 100.0, 50.0, Point::new(100.0, 100.0));
        let viewport = zoom_to_fit_artboard(&artboard, Size::new(800.0, 600.0), DEFAULT_FIT_PADDING);
        assert_close(viewport.zoom, 1.0);
        // Center (150, 125) lands on the viewport center.
        let center = viewport.world_to_screen(Point::new(150.0, 125.0));
        assert_close(center.x, 400.0);
        assert_close(center.y, 300.0);
    }

    #[test]
    fn test_padding_and_aspect() {
        let artboard = create_artboard("A", 2000.0, 500.0, Point::ZERO);
        let viewport = zoom_to_fit_artboard(&artboard, Size::new(1100.0, 1100.0), 50.0);
        assert_close(viewport.zoom, 0.5);
    }

    #[test]
    fn test_fit_all_and_empty() {
        assert_eq!(zoom_to_fit_all(&[], Size::new(500.0, 500.0), 0.0), Viewport::default());
        let boards = vec![
            create_artboard("A", 500.0, 500.0, Point::ZERO),
            create_artboard("B", 500.0, 500.0, Point::new(1500.0, 0.0)),
        ];
        let viewport = zoom_to_fit_all(&boards, Size::new(1000.0, 1000.0), 0.0);
        assert_close(viewport.zoom, 0.5);
    }

    #[test]
    fn test_fit_selected() {
        let boards = vec![
            create_artboard("A", 1000.0, 1000.0, Point::ZERO),
            create_artboard("B", 1000.0, 1000.0, Point::new(3000.0, 0.0)),
        ];
        let size = Size::new(500.0, 500.0);
        let one = zoom_to_fit_selected(&boards, &[boards[1].id.clone()], size, 0.0);
        assert_eq!(one, zoom_to_fit_artboard(&boards[1], size, 0.0));
        let none = zoom_to_fit_selected(&boards, &[], size, 0.0);
        assert_eq!(none, zoom_to_fit_all(&boards, size, 0.0));
        let both = zoom_to_fit_selected(&boards, &[boards[0].id.clone(), boards[1].id.clone()], size, 0.0);
        assert_eq!(both, none);
    }

    #[test]
    fn test_screen_world_roundtrip() {
        let viewport = Viewport {
            zoom: 1.5,
            pan: Vec2::new(100.0, 50.0),
        };
        let world = Point::new(200.0, 300.0);
        let back = viewport.screen_to_world(viewport.world_to_screen(world));
        assert_close(back.x, world.x);
        assert_close(back.y, world.y);
    }
}
