//! Element management: add, update, delete, duplicate, group and reorder.
//!
//! Every operation takes a canvas snapshot and returns a new one. Ids that do
//! not match anything are ignored. Array order is the z-order; `z_index` is
//! rewritten from it after every structural change.

use crate::canvas::CanvasState;
use crate::element::{new_element_id, CanvasElement, ElementId, ElementKind, ElementPatch, Transform};
use crate::error::{DesignerError, DesignerResult};
use crate::transform;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Offset applied to duplicated elements.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Direction for z-order changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderDirection {
    /// Topmost.
    Front,
    /// Bottommost.
    Back,
    /// One step towards the front.
    Forward,
    /// One step towards the back.
    Backward,
}

/// Append an element on top of the z-order.
///
/// A colliding id is replaced with a fresh one. Group children that do not
/// exist are dropped, and a parent link that is missing, not a group, or
/// would form a cycle is cleared.
pub fn add_element(canvas: &CanvasState, element: CanvasElement) -> CanvasState {
    let mut next = canvas.clone();
    let mut element = element;

    if next.contains(&element.id) {
        let fresh = new_element_id();
        log::warn!("Element id {} already in use, assigning {}", element.id, fresh);
        element.id = fresh;
    }

    let children: Vec<ElementId> = element
        .child_ids()
        .iter()
        .filter(|child| next.contains(child))
        .cloned()
        .collect();
    if let Some(child_ids) = element.child_ids_mut() {
        *child_ids = children.clone();
    }

    // The new element's descendants are its claimed children and theirs.
    let mut descendants: HashSet<ElementId> = children.iter().cloned().collect();
    for child in &children {
        descendants.extend(get_descendant_ids(&next, child));
    }
    if let Some(parent_id) = element.parent_id.clone() {
        let valid = !descendants.contains(&parent_id)
            && next.get(&parent_id).is_some_and(CanvasElement::is_group);
        if !valid {
            log::warn!("Dropping invalid parent {} for element {}", parent_id, element.id);
            element.parent_id = None;
        }
    }

    for child in &children {
        detach_from_parent(&mut next, child);
        if let Some(child_el) = next.get_mut(child) {
            child_el.parent_id = Some(element.id.clone());
        }
    }
    if let Some(parent_id) = &element.parent_id {
        if let Some(ids) = next.get_mut(parent_id).and_then(CanvasElement::child_ids_mut) {
            ids.push(element.id.clone());
        }
    }

    element.z_index = next.elements.iter().map(|el| el.z_index).max().map_or(0, |max| max + 1);
    next.elements.push(element);
    next.reindex();
    remove_empty_groups(&mut next);
    refresh_bounds_in_place(&mut next);
    next
}

/// Delete elements.
///
/// Deleting a group deletes its descendants. Deleted ids are stripped from
/// every group's child list, and a group left without children is deleted
/// as well.
pub fn delete_elements(canvas: &CanvasState, ids: &[ElementId]) -> CanvasState {
    let mut doomed: HashSet<ElementId> = HashSet::new();
    for id in ids {
        if canvas.contains(id) {
            doomed.insert(id.clone());
            doomed.extend(get_descendant_ids(canvas, id));
        }
    }
    if doomed.is_empty() {
        return canvas.clone();
    }

    let mut next = canvas.clone();
    next.elements.retain(|el| !doomed.contains(&el.id));
    for element in next.elements.iter_mut() {
        if let Some(child_ids) = element.child_ids_mut() {
            child_ids.retain(|child| !doomed.contains(child));
        }
    }
    log::debug!("Deleted {} elements", doomed.len());

    remove_empty_groups(&mut next);
    next.reindex();
    refresh_bounds_in_place(&mut next);
    next
}

/// Merge `patch` into one element.
pub fn update_element(canvas: &CanvasState, id: &str, patch: &ElementPatch) -> CanvasState {
    update_elements(canvas, std::slice::from_ref(&id.to_string()), patch)
}

/// Merge `patch` into every matching element.
pub fn update_elements(canvas: &CanvasState, ids: &[ElementId], patch: &ElementPatch) -> CanvasState {
    let targets: HashSet<&str> = ids.iter().map(String::as_str).collect();
    let mut next = canvas.clone();
    for element in next.elements.iter_mut() {
        if targets.contains(element.id.as_str()) {
            patch.apply_to(element);
        }
    }
    if patch.transform.is_some() {
        refresh_bounds_in_place(&mut next);
    }
    next
}

/// Look up an element by id.
pub fn get_element<'a>(canvas: &'a CanvasState, id: &str) -> Option<&'a CanvasElement> {
    canvas.get(id)
}

/// Look up several elements, in the order requested. Missing ids are skipped.
pub fn get_elements<'a>(canvas: &'a CanvasState, ids: &[ElementId]) -> Vec<&'a CanvasElement> {
    ids.iter().filter_map(|id| canvas.get(id)).collect()
}

/// Move an element within the z-order.
pub fn reorder_element(canvas: &CanvasState, id: &str, direction: ReorderDirection) -> CanvasState {
    let Some(pos) = canvas.position(id) else {
        return canvas.clone();
    };
    let mut next = canvas.clone();
    let last = next.elements.len() - 1;
    match direction {
        ReorderDirection::Front => {
            let element = next.elements.remove(pos);
            next.elements.push(element);
        }
        ReorderDirection::Back => {
            let element = next.elements.remove(pos);
            next.elements.insert(0, element);
        }
        ReorderDirection::Forward => {
            if pos < last {
                next.elements.swap(pos, pos + 1);
            }
        }
        ReorderDirection::Backward => {
            if pos > 0 {
                next.elements.swap(pos, pos - 1);
            }
        }
    }
    log::debug!("Reordered {} {:?}", id, direction);
    next.reindex();
    next
}

/// Duplicate elements with the default offset.
///
/// Returns the new canvas and the ids of the copies, in input order.
pub fn duplicate_elements(canvas: &CanvasState, ids: &[ElementId]) -> (CanvasState, Vec<ElementId>) {
    duplicate_elements_by(canvas, ids, Vec2::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET))
}

/// Duplicate elements, shifting each copy by `offset`.
///
/// Copies get fresh ids and a " Copy" name suffix and are placed on top.
/// Duplicating a group copies its whole subtree; a copy of a grouped element
/// joins the same group.
pub fn duplicate_elements_by(
    canvas: &CanvasState,
    ids: &[ElementId],
    offset: Vec2,
) -> (CanvasState, Vec<ElementId>) {
    let mut next = canvas.clone();
    let mut new_ids = Vec::new();

    for id in ids {
        let Some(original) = canvas.get(id) else {
            continue;
        };

        let mut subtree = vec![original.id.clone()];
        subtree.extend(get_descendant_ids(canvas, id));
        let remap: HashMap<ElementId, ElementId> =
            subtree.iter().map(|old| (old.clone(), new_element_id())).collect();

        for old_id in &subtree {
            let Some(source) = canvas.get(old_id) else {
                continue;
            };
            let mut copy = source.clone();
            copy.id = remap[old_id].clone();
            copy.transform = copy.transform.translated(offset);
            if let Some(child_ids) = copy.child_ids_mut() {
                for child in child_ids.iter_mut() {
                    if let Some(mapped) = remap.get(child) {
                        *child = mapped.clone();
                    }
                }
            }
            if old_id == id {
                copy.name = format!("{} Copy", source.name);
            } else {
                copy.parent_id = copy.parent_id.and_then(|p| remap.get(&p).cloned());
            }
            next.elements.push(copy);
        }

        let new_id = remap[id].clone();
        if let Some(parent_id) = &original.parent_id {
            if let Some(child_ids) = next.get_mut(parent_id).and_then(CanvasElement::child_ids_mut) {
                child_ids.push(new_id.clone());
            }
        }
        new_ids.push(new_id);
    }

    next.reindex();
    refresh_bounds_in_place(&mut next);
    (next, new_ids)
}

/// Group elements under a new group element.
///
/// Children keep their canvas-absolute transforms; the group's transform is
/// the union of their rotated bounds. Returns `None` when fewer than two
/// elements are found.
pub fn group_elements(canvas: &CanvasState, ids: &[ElementId]) -> Option<(CanvasState, ElementId)> {
    let requested: HashSet<&str> = ids.iter().map(String::as_str).collect();
    // Keep z-order and drop anything whose ancestor is also being grouped.
    let members: Vec<&CanvasElement> = canvas
        .elements
        .iter()
        .filter(|el| requested.contains(el.id.as_str()))
        .filter(|el| {
            !ancestor_ids(canvas, &el.id)
                .iter()
                .any(|a| requested.contains(a.as_str()))
        })
        .collect();
    if members.len() < 2 {
        return None;
    }

    let bounds = transform::get_group_bounds(members.iter().copied())?;
    let member_ids: Vec<ElementId> = members.iter().map(|el| el.id.clone()).collect();
    let shared_parent = members[0].parent_id.clone().filter(|parent| {
        members.iter().all(|el| el.parent_id.as_deref() == Some(parent.as_str()))
    });
    let insert_at = members
        .iter()
        .filter_map(|el| canvas.position(&el.id))
        .max()
        .map_or(canvas.len(), |pos| pos + 1);

    let mut group = CanvasElement::new_group(member_ids.clone(), Transform::from_rect(bounds));
    group.parent_id = shared_parent.clone();
    let group_id = group.id.clone();

    let mut next = canvas.clone();
    for member in &member_ids {
        detach_from_parent(&mut next, member);
        if let Some(el) = next.get_mut(member) {
            el.parent_id = Some(group_id.clone());
        }
    }
    if let Some(parent_id) = &shared_parent {
        if let Some(child_ids) = next.get_mut(parent_id).and_then(CanvasElement::child_ids_mut) {
            child_ids.push(group_id.clone());
        }
    }
    next.elements.insert(insert_at.min(next.elements.len()), group);

    remove_empty_groups(&mut next);
    next.reindex();
    refresh_bounds_in_place(&mut next);
    log::debug!("Grouped {} elements into {}", member_ids.len(), group_id);
    Some((next, group_id))
}

/// Dissolve a group. Children keep their absolute transforms and move up to
/// the group's own parent (none for a top-level group).
pub fn ungroup_elements(canvas: &CanvasState, group_id: &str) -> CanvasState {
    let Some(group) = canvas.get(group_id).filter(|el| el.is_group()) else {
        return canvas.clone();
    };
    let children = group.child_ids().to_vec();
    let grandparent = group.parent_id.clone();

    let mut next = canvas.clone();
    for child in &children {
        if let Some(el) = next.get_mut(child) {
            el.parent_id = grandparent.clone();
        }
    }
    if let Some(gp) = &grandparent {
        if let Some(child_ids) = next.get_mut(gp).and_then(CanvasElement::child_ids_mut) {
            if let Some(pos) = child_ids.iter().position(|c| c == group_id) {
                child_ids.remove(pos);
                for (offset, child) in children.iter().enumerate() {
                    child_ids.insert(pos + offset, child.clone());
                }
            }
        }
    }
    next.elements.retain(|el| el.id != group_id);

    next.reindex();
    refresh_bounds_in_place(&mut next);
    log::debug!("Ungrouped {} ({} children)", group_id, children.len());
    next
}

/// Children of a group. With `recursive`, nested groups are flattened into
/// their leaf elements.
pub fn get_group_children<'a>(
    canvas: &'a CanvasState,
    group_id: &str,
    recursive: bool,
) -> Vec<&'a CanvasElement> {
    let Some(group) = canvas.get(group_id) else {
        return Vec::new();
    };
    if !recursive {
        return group.child_ids().iter().filter_map(|id| canvas.get(id)).collect();
    }
    get_descendant_ids(canvas, group_id)
        .iter()
        .filter_map(|id| canvas.get(id))
        .filter(|el| !el.is_group())
        .collect()
}

/// Check whether an element belongs to a group.
pub fn is_in_group(canvas: &CanvasState, id: &str) -> bool {
    canvas.get(id).is_some_and(|el| el.parent_id.is_some())
}

/// Outermost ancestor of an element; the element itself when it has no parent.
pub fn get_root_parent<'a>(canvas: &'a CanvasState, id: &str) -> Option<&'a CanvasElement> {
    let mut current = canvas.get(id)?;
    for _ in 0..canvas.len() {
        match current.parent_id.as_deref().and_then(|p| canvas.get(p)) {
            Some(parent) => current = parent,
            None => return Some(current),
        }
    }
    log::warn!("Parent chain of {} does not terminate", id);
    Some(current)
}

/// Ids of every descendant of an element, depth first.
pub fn get_descendant_ids(canvas: &CanvasState, id: &str) -> Vec<ElementId> {
    let mut result = Vec::new();
    let mut visited: HashSet<ElementId> = HashSet::new();
    visited.insert(id.to_string());
    let mut stack: Vec<ElementId> = canvas
        .get(id)
        .map(|el| el.child_ids().iter().rev().cloned().collect())
        .unwrap_or_default();
    while let Some(next) = stack.pop() {
        if !visited.insert(next.clone()) {
            continue;
        }
        if let Some(el) = canvas.get(&next) {
            stack.extend(el.child_ids().iter().rev().cloned());
        }
        result.push(next);
    }
    result
}

fn ancestor_ids(canvas: &CanvasState, id: &str) -> Vec<ElementId> {
    let mut ancestors = Vec::new();
    let mut current = canvas.get(id).and_then(|el| el.parent_id.clone());
    while let Some(parent) = current {
        if parent == id || ancestors.contains(&parent) {
            break;
        }
        current = canvas.get(&parent).and_then(|el| el.parent_id.clone());
        ancestors.push(parent);
    }
    ancestors
}

/// Attach `child` to `parent` (or detach it with `None`).
///
/// # Errors
///
/// Fails if either element is missing, the parent is not a group, or the
/// parent is the child itself or one of its descendants.
pub fn set_parent(canvas: &CanvasState, child: &str, parent: Option<&str>) -> DesignerResult<CanvasState> {
    if !canvas.contains(child) {
        return Err(DesignerError::ElementNotFound(child.to_string()));
    }
    if let Some(parent_id) = parent {
        let parent_el = canvas
            .get(parent_id)
            .ok_or_else(|| DesignerError::ElementNotFound(parent_id.to_string()))?;
        if !parent_el.is_group() {
            return Err(DesignerError::NotAGroup(parent_id.to_string()));
        }
        if parent_id == child || get_descendant_ids(canvas, child).iter().any(|d| d == parent_id) {
            return Err(DesignerError::CyclicParent {
                child: child.to_string(),
                parent: parent_id.to_string(),
            });
        }
    }

    let mut next = canvas.clone();
    detach_from_parent(&mut next, child);
    if let Some(el) = next.get_mut(child) {
        el.parent_id = parent.map(str::to_string);
    }
    if let Some(parent_id) = parent {
        if let Some(child_ids) = next.get_mut(parent_id).and_then(CanvasElement::child_ids_mut) {
            child_ids.push(child.to_string());
        }
    }
    remove_empty_groups(&mut next);
    next.reindex();
    refresh_bounds_in_place(&mut next);
    Ok(next)
}

/// Recompute every group's cached bounds from its leaf descendants.
pub fn refresh_group_bounds(canvas: &CanvasState) -> CanvasState {
    let mut next = canvas.clone();
    refresh_bounds_in_place(&mut next);
    next
}

pub(crate) fn refresh_bounds_in_place(canvas: &mut CanvasState) {
    let updates: Vec<(usize, Transform)> = canvas
        .elements
        .iter()
        .enumerate()
        .filter(|(_, el)| el.is_group())
        .filter_map(|(index, el)| {
            let leaves: Vec<&CanvasElement> = get_descendant_ids(canvas, &el.id)
                .iter()
                .filter_map(|id| canvas.get(id))
                .filter(|d| !d.is_group())
                .collect();
            transform::get_group_bounds(leaves).map(|bounds| (index, Transform::from_rect(bounds)))
        })
        .collect();
    for (index, bounds) in updates {
        canvas.elements[index].transform = bounds;
    }
}

/// Remove `id` from its current parent's child list.
fn detach_from_parent(canvas: &mut CanvasState, id: &str) {
    let Some(parent_id) = canvas.get(id).and_then(|el| el.parent_id.clone()) else {
        return;
    };
    if let Some(child_ids) = canvas.get_mut(&parent_id).and_then(CanvasElement::child_ids_mut) {
        child_ids.retain(|c| c != id);
    }
    if let Some(el) = canvas.get_mut(id) {
        el.parent_id = None;
    }
}

/// Delete groups with no children, repeating while removals empty their parents.
fn remove_empty_groups(canvas: &mut CanvasState) {
    loop {
        let empty: HashSet<ElementId> = canvas
            .elements
            .iter()
            .filter(|el| matches!(&el.kind, ElementKind::Group { child_ids } if child_ids.is_empty()))
            .map(|el| el.id.clone())
            .collect();
        if empty.is_empty() {
            return;
        }
        log::debug!("Removing {} empty groups", empty.len());
        canvas.elements.retain(|el| !empty.contains(&el.id));
        for element in canvas.elements.iter_mut() {
            if let Some(child_ids) = element.child_ids_mut() {
                child_ids.retain(|c| !empty.contains(c));
            }
        }
    }
}
