//! Bounded undo/redo ledger.
//!
//! The history never touches canvas state. `undo` and `redo` only move a
//! [`Command`] between stacks and hand it back; applying it is up to the
//! owner (see [`crate::session::DesignSession`]).

use crate::command::Command;
use std::collections::VecDeque;

/// Maximum number of commands kept on each stack.
pub const MAX_HISTORY: usize = 50;

/// Undo/redo stacks owned by one document or session.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: VecDeque<Command>,
    redo_stack: VecDeque<Command>,
    capacity: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    /// Create an empty history holding at most `capacity` commands per stack.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: VecDeque::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a new edit. The redo branch is discarded, and the oldest
    /// entry is evicted once the stack is full.
    pub fn add_command(&mut self, command: Command) {
        log::trace!("History push: {}", command.description());
        push_bounded(&mut self.undo_stack, command, self.capacity);
        self.redo_stack.clear();
    }

    /// Take the most recent edit for undoing.
    pub fn undo(&mut self) -> Option<Command> {
        let command = self.undo_stack.pop_back()?;
        push_bounded(&mut self.redo_stack, command.clone(), self.capacity);
        Some(command)
    }

    /// Take the most recently undone edit for redoing.
    pub fn redo(&mut self) -> Option<Command> {
        let command = self.redo_stack.pop_back()?;
        push_bounded(&mut self.undo_stack, command.clone(), self.capacity);
        Some(command)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// The command `undo` would return.
    pub fn peek_undo(&self) -> Option<&Command> {
        self.undo_stack.back()
    }

    /// The command `redo` would return.
    pub fn peek_redo(&self) -> Option<&Command> {
        self.redo_stack.back()
    }

    /// Drop both stacks, e.g. when a new document is loaded.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<Command>, command: Command, capacity: usize) {
    stack.push_back(command);
    while stack.len() > capacity {
        if let Some(evicted) = stack.pop_front() {
            log::trace!("History evict: {}", evicted.description());
        }
    }
}
