//! Canvas state: the flat, z-ordered element list plus canvas settings.

use crate::element::{CanvasElement, ElementId};
use crate::elements;
use crate::error::{DesignerError, DesignerResult};
use crate::snap::GRID_SIZE;
use crate::transform;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Grid display and snapping settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    pub enabled: bool,
    pub size: f64,
    #[serde(default)]
    pub snap: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            size: GRID_SIZE,
            snap: false,
        }
    }
}

/// A snapshot of one design canvas.
///
/// Array order of `elements` is the z-order (back to front). Every
/// element's `z_index` equals its array index after any structural edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasState {
    pub width: f64,
    pub height: f64,
    pub background_color: String,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub elements: Vec<CanvasElement>,
}

fn default_zoom() -> f64 {
    1.0
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl CanvasState {
    /// Create an empty canvas with a white background.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background_color: "#ffffff".to_string(),
            zoom: 1.0,
            grid: GridSettings::default(),
            elements: Vec::new(),
        }
    }

    /// The canvas area as a rectangle at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Get an element by ID.
    pub fn get(&self, id: &str) -> Option<&CanvasElement> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|el| el.id == id)
    }

    /// Array position (z-order) of an element.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|el| el.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element ids in z-order (back to front).
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|el| el.id.clone()).collect()
    }

    /// Rewrite every `z_index` from array position.
    pub(crate) fn reindex(&mut self) {
        for (index, element) in self.elements.iter_mut().enumerate() {
            element.z_index = index as i64;
        }
    }

    /// Union of every element's rotated bounds.
    pub fn bounds(&self) -> Option<Rect> {
        transform::get_group_bounds(self.elements.iter())
    }

    /// Visible elements under a point, front to back.
    pub fn elements_at_point(&self, point: Point) -> Vec<ElementId> {
        self.elements
            .iter()
            .rev()
            .filter(|el| el.visible && !el.is_group())
            .filter(|el| transform::is_point_in_element(point, el))
            .map(|el| el.id.clone())
            .collect()
    }

    /// Visible elements whose rotated bounds intersect a marquee rectangle.
    pub fn elements_in_rect(&self, rect: Rect) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|el| el.visible)
            .filter(|el| rect.intersect(transform::get_element_bounds(el)).area() > 0.0)
            .map(|el| el.id.clone())
            .collect()
    }

    /// Check the structural invariants: unique ids, group children present,
    /// parent links matching child lists, parents present and acyclic.
    pub fn validate(&self) -> DesignerResult<()> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !seen.insert(element.id.as_str()) {
                return Err(DesignerError::DuplicateId(element.id.clone()));
            }
        }

        for element in &self.elements {
            for child in element.child_ids() {
                let Some(child_el) = self.get(child) else {
                    return Err(DesignerError::DanglingChild {
                        group: element.id.clone(),
                        child: child.clone(),
                    });
                };
                if child_el.parent_id.as_deref() != Some(element.id.as_str()) {
                    return Err(DesignerError::MismatchedParent {
                        group: element.id.clone(),
                        child: child.clone(),
                    });
                }
            }
            if let Some(parent) = element.parent_id.as_deref().and_then(|id| self.get(id)) {
                if !parent.child_ids().contains(&element.id) {
                    return Err(DesignerError::MismatchedParent {
                        group: parent.id.clone(),
                        child: element.id.clone(),
                    });
                }
            }

            let mut current = element.parent_id.as_deref();
            let mut steps = 0;
            while let Some(parent_id) = current {
                let parent = self
                    .get(parent_id)
                    .ok_or_else(|| DesignerError::ElementNotFound(parent_id.to_string()))?;
                if !parent.is_group() {
                    return Err(DesignerError::NotAGroup(parent_id.to_string()));
                }
                steps += 1;
                if parent.id == element.id || steps > self.elements.len() {
                    return Err(DesignerError::CyclicParent {
                        child: element.id.clone(),
                        parent: element.parent_id.clone().unwrap_or_default(),
                    });
                }
                current = parent.parent_id.as_deref();
            }
        }
        Ok(())
    }

    /// Serialize the canvas to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize and validate a canvas. The z-order and group bounds caches
    /// are rebuilt.
    pub fn from_json(json: &str) -> DesignerResult<Self> {
        let mut canvas: CanvasState = serde_json::from_str(json)?;
        canvas.validate()?;
        canvas.reindex();
        elements::refresh_bounds_in_place(&mut canvas);
        Ok(canvas)
    }
}
