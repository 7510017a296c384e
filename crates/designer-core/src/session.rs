//! An editing session: one canvas, its history, and the settings it runs with.
//!
//! All geometry and structure lives in the pure functions of [`crate::elements`]
//! and [`crate::transform`]; the session only threads the current canvas
//! through them and records every change as a [`Command`].

use crate::canvas::CanvasState;
use crate::command::{Command, CommandFactory, CommandType};
use crate::config::DesignerConfig;
use crate::element::{CanvasElement, ElementId, ElementPatch};
use crate::elements::{self, ReorderDirection};
use crate::history::HistoryManager;
use crate::snap;
use crate::transform::{self, AlignTo, Alignment, DistributeDirection, ResizeHandle};
use kurbo::Vec2;

/// Owns the live canvas for one open document.
#[derive(Debug, Clone)]
pub struct DesignSession {
    canvas: CanvasState,
    history: HistoryManager,
    config: DesignerConfig,
}

impl Default for DesignSession {
    fn default() -> Self {
        Self::new(CanvasState::default(), DesignerConfig::default())
    }
}

impl DesignSession {
    pub fn new(canvas: CanvasState, config: DesignerConfig) -> Self {
        Self {
            canvas,
            history: HistoryManager::with_capacity(config.history_capacity),
            config,
        }
    }

    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    /// Replace the canvas, e.g. after opening a file. History is dropped.
    pub fn load(&mut self, canvas: CanvasState) {
        self.canvas = canvas;
        self.history.clear();
    }

    /// Run an edit against the current canvas and record it.
    ///
    /// Returns false, recording nothing, when the edit changed nothing.
    pub fn execute(
        &mut self,
        command_type: CommandType,
        ids: &[ElementId],
        edit: impl FnOnce(&CanvasState) -> CanvasState,
    ) -> bool {
        let next = edit(&self.canvas);
        self.commit(command_type, ids, next)
    }

    fn commit(&mut self, command_type: CommandType, ids: &[ElementId], next: CanvasState) -> bool {
        let command = CommandFactory::create(command_type, ids, &self.canvas, &next);
        self.canvas = next;
        if command.is_empty() {
            return false;
        }
        self.history.add_command(command);
        true
    }

    /// Undo the most recent edit. Returns the command that was reverted.
    pub fn undo(&mut self) -> Option<&Command> {
        let command = self.history.undo()?;
        log::debug!("Undo {}", command.description());
        self.canvas = command.revert(&self.canvas);
        self.history.peek_redo()
    }

    /// Redo the most recently undone edit. Returns the command replayed.
    pub fn redo(&mut self) -> Option<&Command> {
        let command = self.history.redo()?;
        log::debug!("Redo {}", command.description());
        self.canvas = command.replay(&self.canvas);
        self.history.peek_undo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Add an element on top. Returns the id it was stored under, which
    /// differs from the element's own id when that one was taken.
    pub fn add_element(&mut self, element: CanvasElement) -> Option<ElementId> {
        let next = elements::add_element(&self.canvas, element);
        let added = next
            .elements
            .iter()
            .find(|el| !self.canvas.contains(&el.id))
            .map(|el| el.id.clone())?;
        self.commit(CommandType::Add, std::slice::from_ref(&added), next);
        Some(added)
    }

    pub fn delete_elements(&mut self, ids: &[ElementId]) -> bool {
        self.execute(CommandType::Delete, ids, |canvas| elements::delete_elements(canvas, ids))
    }

    pub fn update_elements(&mut self, ids: &[ElementId], patch: &ElementPatch) -> bool {
        self.execute(CommandType::Style, ids, |canvas| elements::update_elements(canvas, ids, patch))
    }

    pub fn move_elements(&mut self, ids: &[ElementId], dx: f64, dy: f64) -> bool {
        self.execute(CommandType::Move, ids, |canvas| transform::move_elements(canvas, ids, dx, dy))
    }

    /// Resize by dragging a handle. Locked elements are left alone.
    pub fn resize_element(
        &mut self,
        id: &str,
        handle: ResizeHandle,
        dx: f64,
        dy: f64,
        maintain_aspect_ratio: bool,
    ) -> bool {
        let Some(resized) = self
            .canvas
            .get(id)
            .filter(|el| !el.locked)
            .map(|el| transform::resize_element(el, handle, dx, dy, maintain_aspect_ratio))
        else {
            return false;
        };
        self.execute(CommandType::Resize, &[id.to_string()], |canvas| {
            elements::update_element(canvas, id, &ElementPatch::transform(resized.transform))
        })
    }

    /// Rotate by `delta_degrees`, snapping the result to the configured
    /// increment when `snap_angle` is set. Locked elements are left alone.
    pub fn rotate_element(&mut self, id: &str, delta_degrees: f64, snap_angle: bool) -> bool {
        let Some(mut rotated) = self
            .canvas
            .get(id)
            .filter(|el| !el.locked)
            .map(|el| transform::rotate_element(el, delta_degrees))
        else {
            return false;
        };
        if snap_angle {
            rotated.transform.rotation =
                snap::snap_rotation(rotated.transform.rotation, self.config.rotation_snap_degrees);
        }
        self.execute(CommandType::Rotate, &[id.to_string()], |canvas| {
            elements::update_element(canvas, id, &ElementPatch::transform(rotated.transform))
        })
    }

    pub fn align_elements(&mut self, ids: &[ElementId], alignment: Alignment, align_to: AlignTo) -> bool {
        self.execute(CommandType::Move, ids, |canvas| {
            transform::align_elements(canvas, ids, alignment, align_to)
        })
    }

    /// Returns false when fewer than three elements were found.
    pub fn distribute_elements(&mut self, ids: &[ElementId], direction: DistributeDirection) -> bool {
        match transform::distribute_elements(&self.canvas, ids, direction) {
            Some(next) => self.commit(CommandType::Move, ids, next),
            None => false,
        }
    }

    pub fn reorder_element(&mut self, id: &str, direction: ReorderDirection) -> bool {
        self.execute(CommandType::Reorder, &[id.to_string()], |canvas| {
            elements::reorder_element(canvas, id, direction)
        })
    }

    /// Duplicate with the configured offset. Returns the ids of the copies.
    pub fn duplicate_elements(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let (next, copies) = elements::duplicate_elements_by(&self.canvas, ids, offset);
        self.commit(CommandType::Duplicate, &copies, next);
        copies
    }

    /// Group at least two elements. Returns the new group's id.
    pub fn group_elements(&mut self, ids: &[ElementId]) -> Option<ElementId> {
        let (next, group_id) = elements::group_elements(&self.canvas, ids)?;
        self.commit(CommandType::Group, ids, next);
        Some(group_id)
    }

    pub fn ungroup_elements(&mut self, group_id: &str) -> bool {
        self.execute(CommandType::Ungroup, &[group_id.to_string()], |canvas| {
            elements::ungroup_elements(canvas, group_id)
        })
    }

    /// Snap elements to the configured grid.
    pub fn snap_to_grid(&mut self, ids: &[ElementId]) -> bool {
        let grid_size = self.config.grid_size;
        self.execute(CommandType::Move, ids, |canvas| {
            snap::snap_elements_to_grid(canvas, ids, grid_size)
        })
    }
}
