//! Undoable edit records and the factory that builds them from snapshots.
//!
//! A command stores only what its type needs: full elements for structural
//! and style edits, transforms for move/resize, rotation for rotate and
//! z-index for reorder. [`Command::revert`] and [`Command::replay`] let the
//! owner of a canvas apply a recorded edit in either direction.

use crate::canvas::CanvasState;
use crate::element::{CanvasElement, ElementId, Transform};
use crate::elements;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

/// Kind of edit a command records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Add,
    Delete,
    Move,
    Resize,
    Rotate,
    Style,
    Reorder,
    Group,
    Ungroup,
    Duplicate,
}

impl CommandType {
    /// Human-readable label for menus ("Undo Move").
    pub fn label(self) -> &'static str {
        match self {
            CommandType::Add => "Add",
            CommandType::Delete => "Delete",
            CommandType::Move => "Move",
            CommandType::Resize => "Resize",
            CommandType::Rotate => "Rotate",
            CommandType::Style => "Style",
            CommandType::Reorder => "Reorder",
            CommandType::Group => "Group",
            CommandType::Ungroup => "Ungroup",
            CommandType::Duplicate => "Duplicate",
        }
    }
}

/// The recorded part of one element at one side of an edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "camelCase")]
pub enum ElementSnapshot {
    Element { element: CanvasElement },
    Transform { id: ElementId, transform: Transform },
    Rotation { id: ElementId, rotation: f64 },
    #[serde(rename_all = "camelCase")]
    ZIndex { id: ElementId, z_index: i64 },
}

impl ElementSnapshot {
    pub fn id(&self) -> &str {
        match self {
            ElementSnapshot::Element { element } => &element.id,
            ElementSnapshot::Transform { id, .. }
            | ElementSnapshot::Rotation { id, .. }
            | ElementSnapshot::ZIndex { id, .. } => id,
        }
    }
}

/// One undoable edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    #[serde(rename = "type")]
    pub command_type: CommandType,
    pub element_ids: Vec<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_state: Option<Vec<ElementSnapshot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_state: Option<Vec<ElementSnapshot>>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Command {
    /// Label for the edit, e.g. "Move".
    pub fn description(&self) -> &'static str {
        self.command_type.label()
    }

    /// True when neither side recorded anything.
    pub fn is_empty(&self) -> bool {
        self.before_state.is_none() && self.after_state.is_none()
    }

    /// Bring `canvas` back to the state before this edit.
    pub fn revert(&self, canvas: &CanvasState) -> CanvasState {
        apply_snapshots(canvas, self.before_state.as_deref(), self.after_state.as_deref())
    }

    /// Re-apply this edit to `canvas`.
    pub fn replay(&self, canvas: &CanvasState) -> CanvasState {
        apply_snapshots(canvas, self.after_state.as_deref(), self.before_state.as_deref())
    }
}

/// Move `canvas` to the `target` side of a command, leaving the `other` side.
fn apply_snapshots(
    canvas: &CanvasState,
    target: Option<&[ElementSnapshot]>,
    other: Option<&[ElementSnapshot]>,
) -> CanvasState {
    let target = target.unwrap_or_default();
    let other = other.unwrap_or_default();
    let mut next = canvas.clone();

    // Elements that only exist on the side being left go away.
    let target_full: HashSet<&str> = target
        .iter()
        .filter(|s| matches!(s, ElementSnapshot::Element { .. }))
        .map(ElementSnapshot::id)
        .collect();
    let leaving: HashSet<&str> = other
        .iter()
        .filter(|s| matches!(s, ElementSnapshot::Element { .. }))
        .map(ElementSnapshot::id)
        .filter(|id| !target_full.contains(id))
        .collect();
    next.elements.retain(|el| !leaving.contains(el.id.as_str()));

    let mut inserts: Vec<&CanvasElement> = Vec::new();
    let mut reordered = false;
    for snapshot in target {
        match snapshot {
            ElementSnapshot::Element { element } => match next.get_mut(&element.id) {
                Some(existing) => *existing = element.clone(),
                None => inserts.push(element),
            },
            ElementSnapshot::Transform { id, transform } => {
                if let Some(el) = next.get_mut(id) {
                    el.transform = *transform;
                }
            }
            ElementSnapshot::Rotation { id, rotation } => {
                if let Some(el) = next.get_mut(id) {
                    el.transform.rotation = *rotation;
                }
            }
            ElementSnapshot::ZIndex { id, z_index } => {
                if let Some(el) = next.get_mut(id) {
                    el.z_index = *z_index;
                    reordered = true;
                }
            }
        }
    }

    // Inserting in ascending target position rebuilds the original order.
    inserts.sort_by_key(|el| el.z_index);
    for element in inserts {
        let index = usize::try_from(element.z_index).unwrap_or(0).min(next.elements.len());
        next.elements.insert(index, element.clone());
    }
    if reordered {
        next.elements.sort_by_key(|el| el.z_index);
    }
    next.reindex();
    // Rotation and z-index snapshots leave ancestor bounds stale.
    elements::refresh_bounds_in_place(&mut next);
    next
}

/// Builds typed commands by diffing two canvas snapshots.
pub struct CommandFactory;

impl CommandFactory {
    /// Build a command of any type. Only elements that differ between
    /// `before` and `after` are recorded.
    pub fn create(
        command_type: CommandType,
        element_ids: &[ElementId],
        before: &CanvasState,
        after: &CanvasState,
    ) -> Command {
        let (before_state, after_state) = match command_type {
            CommandType::Move | CommandType::Resize => diff_by(before, after, |el| {
                ElementSnapshot::Transform {
                    id: el.id.clone(),
                    transform: el.transform,
                }
            }, |a, b| a.transform == b.transform),
            CommandType::Rotate => diff_by(before, after, |el| ElementSnapshot::Rotation {
                id: el.id.clone(),
                rotation: el.transform.rotation,
            }, |a, b| a.transform.rotation == b.transform.rotation),
            CommandType::Reorder => diff_by(before, after, |el| ElementSnapshot::ZIndex {
                id: el.id.clone(),
                z_index: el.z_index,
            }, |a, b| a.z_index == b.z_index),
            CommandType::Add
            | CommandType::Delete
            | CommandType::Style
            | CommandType::Group
            | CommandType::Ungroup
            | CommandType::Duplicate => diff_full(before, after),
        };

        Command {
            command_type,
            element_ids: element_ids.to_vec(),
            before_state: non_empty(before_state),
            after_state: non_empty(after_state),
            timestamp: now_millis(),
        }
    }

    pub fn add(element_ids: &[ElementId], before: &CanvasState, after: &CanvasState) -> Command {
        Self::create(CommandType::Add, element_ids, before, after)
    }

    pub fn delete(element_ids: &[ElementId], before: &CanvasState, after: &CanvasState) -> Command {
        Self::create(CommandType::Delete, element_ids, before, after)
    }

    pub fn move_elements(element_ids: &[ElementId], before: &CanvasState, after: &CanvasState) -> Command {
        Self::create(CommandType::Move, element_ids, before, after)
    }

    pub fn resize(element_ids: &[ElementId], before: &CanvasState, after: &CanvasState) -> Command {
        Self::create(CommandType::Resize, element_ids, before, after)
    }

    pub fn rotate(element_ids: &[ElementId], before: &CanvasState, after: &CanvasState) -> Command {
        Self::create(CommandType::Rotate, element_ids, before, after)
    }

    pub fn style(element_ids: &[ElementId], before: &CanvasState, after: &CanvasState) -> Command {
        Self::create(CommandType::Style, element_ids, before, after)
    }

    pub fn reorder(element_ids: &[ElementId], before: &CanvasState, after: &CanvasState) -> Command {
        Self::create(CommandType::Reorder, element_ids, before, after)
    }
}

/// Record one field for every element present on both sides where it changed.
fn diff_by(
    before: &CanvasState,
    after: &CanvasState,
    capture: impl Fn(&CanvasElement) -> ElementSnapshot,
    same: impl Fn(&CanvasElement, &CanvasElement) -> bool,
) -> (Vec<ElementSnapshot>, Vec<ElementSnapshot>) {
    let after_by_id: HashMap<&str, &CanvasElement> =
        after.elements.iter().map(|el| (el.id.as_str(), el)).collect();
    let mut before_state = Vec::new();
    let mut after_state = Vec::new();
    for old in &before.elements {
        if let Some(new) = after_by_id.get(old.id.as_str()) {
            if !same(old, new) {
                before_state.push(capture(old));
                after_state.push(capture(new));
            }
        }
    }
    (before_state, after_state)
}

/// Position shifts alone are not recorded; reverting rebuilds order from the
/// recorded elements' own z-index.
fn same_ignoring_z(a: &CanvasElement, b: &CanvasElement) -> bool {
    CanvasElement { z_index: b.z_index, ..a.clone() } == *b
}

/// Record whole elements that were removed, added or changed.
fn diff_full(before: &CanvasState, after: &CanvasState) -> (Vec<ElementSnapshot>, Vec<ElementSnapshot>) {
    let before_by_id: HashMap<&str, &CanvasElement> =
        before.elements.iter().map(|el| (el.id.as_str(), el)).collect();
    let after_by_id: HashMap<&str, &CanvasElement> =
        after.elements.iter().map(|el| (el.id.as_str(), el)).collect();

    let before_state = before
        .elements
        .iter()
        .filter(|el| after_by_id.get(el.id.as_str()).is_none_or(|new| !same_ignoring_z(el, new)))
        .map(|el| ElementSnapshot::Element { element: el.clone() })
        .collect();
    let after_state = after
        .elements
        .iter()
        .filter(|el| before_by_id.get(el.id.as_str()).is_none_or(|old| !same_ignoring_z(el, old)))
        .map(|el| ElementSnapshot::Element { element: el.clone() })
        .collect();
    (before_state, after_state)
}

fn non_empty(snapshots: Vec<ElementSnapshot>) -> Option<Vec<ElementSnapshot>> {
    if snapshots.is_empty() { None } else { Some(snapshots) }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
