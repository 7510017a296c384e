//! Canvas elements - the atomic placeable objects of a design.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
pub type ElementId = String;

/// Generate a fresh element id.
pub fn new_element_id() -> ElementId {
    Uuid::new_v4().to_string()
}

/// Placement of an element in canvas-absolute coordinates.
///
/// `x`/`y` is the top-left of the unrotated box; rotation is in degrees
/// around the box center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    #[serde(default = "default_scale")]
    pub scale_y: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }
}

impl Transform {
    /// Create an unrotated, unscaled transform.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Build a transform covering a rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    /// The unrotated box as a kurbo Rect.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Center of the box (the rotation pivot).
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Copy of this transform shifted by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..*self
        }
    }
}

/// Type-specific payload of an element.
///
/// Serialized inline with the element, discriminated by its `type` field.
/// Renderers interpret these; the core only carries them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    #[serde(rename_all = "camelCase")]
    Text {
        content: String,
        font_size: f64,
        font_family: String,
        fill: String,
    },
    #[serde(rename_all = "camelCase")]
    Image { src: String },
    /// A shape from the static shape catalog, referenced by key.
    #[serde(rename_all = "camelCase")]
    Shape {
        shape_id: String,
        fill: String,
        stroke: String,
        stroke_width: f64,
    },
    #[serde(rename_all = "camelCase")]
    Path {
        path_data: String,
        fill: String,
        stroke: String,
    },
    #[serde(rename_all = "camelCase")]
    Freehand {
        points: Vec<Point>,
        stroke: String,
        stroke_width: f64,
    },
    #[serde(rename_all = "camelCase")]
    Mockup { mockup_id: String },
    /// A group. Children stay in the flat element list; this is a
    /// non-owning reference set.
    #[serde(rename_all = "camelCase")]
    Group { child_ids: Vec<ElementId> },
}

impl ElementKind {
    /// Lowercase type tag, as serialized.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementKind::Text { .. } => "text",
            ElementKind::Image { .. } => "image",
            ElementKind::Shape { .. } => "shape",
            ElementKind::Path { .. } => "path",
            ElementKind::Freehand { .. } => "freehand",
            ElementKind::Mockup { .. } => "mockup",
            ElementKind::Group { .. } => "group",
        }
    }

    fn default_name(&self) -> &'static str {
        match self {
            ElementKind::Text { .. } => "Text",
            ElementKind::Image { .. } => "Image",
            ElementKind::Shape { .. } => "Shape",
            ElementKind::Path { .. } => "Path",
            ElementKind::Freehand { .. } => "Drawing",
            ElementKind::Mockup { .. } => "Mockup",
            ElementKind::Group { .. } => "Group",
        }
    }
}

/// A single element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasElement {
    pub id: ElementId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub kind: ElementKind,
    pub transform: Transform,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    /// Cached array position; rewritten on every structural change.
    #[serde(default)]
    pub z_index: i64,
    /// Owning group, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ElementId>,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_visible() -> bool {
    true
}

impl CanvasElement {
    /// Create a new element with a fresh id.
    pub fn new(kind: ElementKind, transform: Transform) -> Self {
        Self {
            id: new_element_id(),
            name: kind.default_name().to_string(),
            kind,
            transform,
            opacity: 1.0,
            visible: true,
            locked: false,
            z_index: 0,
            parent_id: None,
        }
    }

    /// Create a new group element over the given children.
    pub fn new_group(child_ids: Vec<ElementId>, transform: Transform) -> Self {
        Self::new(ElementKind::Group { child_ids }, transform)
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    /// Replace the default name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Check if this element is a group.
    pub fn is_group(&self) -> bool {
        matches!(self.kind, ElementKind::Group { .. })
    }

    /// Child ids of a group; empty for every other kind.
    pub fn child_ids(&self) -> &[ElementId] {
        match &self.kind {
            ElementKind::Group { child_ids } => child_ids,
            _ => &[],
        }
    }

    /// Mutable child ids of a group.
    pub fn child_ids_mut(&mut self) -> Option<&mut Vec<ElementId>> {
        match &mut self.kind {
            ElementKind::Group { child_ids } => Some(child_ids),
            _ => None,
        }
    }
}

/// Partial update merged into an element by `update_element`.
///
/// Only fields that are `Some` are applied. A payload is only applied when it
/// has the same kind as the target, so an update can never turn a group
/// into a leaf (or back). Group payloads are never applied: child lists and
/// parent links change through [`crate::elements::set_parent`] and grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    pub name: Option<String>,
    pub transform: Option<Transform>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub kind: Option<ElementKind>,
}

impl ElementPatch {
    /// Patch that replaces only the transform.
    pub fn transform(transform: Transform) -> Self {
        Self {
            transform: Some(transform),
            ..Self::default()
        }
    }

    /// Shallow-merge this patch into `element`.
    pub fn apply_to(&self, element: &mut CanvasElement) {
        if let Some(name) = &self.name {
            element.name = name.clone();
        }
        if let Some(transform) = self.transform {
            element.transform = transform;
        }
        if let Some(opacity) = self.opacity {
            element.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(visible) = self.visible {
            element.visible = visible;
        }
        if let Some(locked) = self.locked {
            element.locked = locked;
        }
        if let Some(kind) = &self.kind {
            if element.is_group() {
                // Group membership changes only through grouping and set_parent.
                log::warn!("Ignoring {} payload for group {}", kind.type_name(), element.id);
            } else if std::mem::discriminant(kind) == std::mem::discriminant(&element.kind) {
                element.kind = kind.clone();
            } else {
                log::warn!(
                    "Ignoring {} payload for {} element {}",
                    kind.type_name(),
                    element.kind.type_name(),
                    element.id
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text() -> ElementKind {
        ElementKind::Text {
            content: "Hello".to_string(),
            font_size: 24.0,
            font_family: "Inter".to_string(),
            fill: "#000000".to_string(),
        }
    }

    #[test]
    fn test_transform_center() {
        let t = Transform::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(t.center(), Point::new(60.0, 45.0));
    }

    #[test]
    fn test_new_element_defaults() {
        let el = CanvasElement::new(text(), Transform::default());
        assert!(!el.id.is_empty());
        assert_eq!(el.name, "Text");
        assert!(el.visible);
        assert!(!el.locked);
        assert!(el.parent_id.is_none());
        assert!(el.child_ids().is_empty());
    }

    #[test]
    fn test_element_json_shape() {
        let el = CanvasElement::new(text(), Transform::new(1.0, 2.0, 3.0, 4.0)).with_id("a");
        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["fontSize"], 24.0);
        assert_eq!(value["zIndex"], 0);
        assert_eq!(value["transform"]["scaleX"], 1.0);
        assert!(value.get("parentId").is_none());

        let back: CanvasElement = serde_json::from_value(value).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn test_group_child_ids_serialized() {
        let group = CanvasElement::new_group(vec!["a".into(), "b".into()], Transform::default());
        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(value["type"], "group");
        assert_eq!(value["childIds"][1], "b");
    }

    #[test]
    fn test_patch_rejects_kind_change() {
        let mut el = CanvasElement::new(text(), Transform::default());
        let patch = ElementPatch {
            kind: Some(ElementKind::Group { child_ids: vec![] }),
            opacity: Some(0.5),
            ..ElementPatch::default()
        };
        patch.apply_to(&mut el);
        assert!(!el.is_group());
        assert!((el.opacity - 0.5).abs() < f64::EPSILON);
    }
}
