//! Linear undo/redo history.

use std::collections::VecDeque;
use std::fmt;

use crate::commands::Command;

/// Undo and redo stacks of executed commands.
///
/// Several collections may share one history through
/// [`Shared`](battlemap_core::Shared) so their edits undo and redo as one
/// sequence.
#[derive(Default)]
pub struct CommandHistory {
    undo_stack: VecDeque<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    max_depth: Option<usize>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A history that keeps at most `max_depth` undoable commands, dropping
    /// the oldest first. `None` keeps everything.
    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Executes a command and pushes it on the undo stack, discarding any
    /// pending redo chain. A no-op command is dropped untouched.
    pub fn execute(&mut self, mut command: Box<dyn Command>) {
        if command.is_noop() {
            tracing::trace!(command = command.name(), "discarding no-op command");
            return;
        }
        command.execute();
        tracing::debug!(command = command.name(), "executed");
        self.undo_stack.push_back(command);
        self.redo_stack.clear();

        if let Some(max) = self.max_depth {
            while self.undo_stack.len() > max {
                if let Some(dropped) = self.undo_stack.pop_front() {
                    tracing::debug!(command = dropped.name(), "history full, dropping oldest");
                }
            }
        }
    }

    /// Reverts the most recent command. Returns false if there was nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop_back() {
            Some(mut command) => {
                command.undo();
                tracing::debug!(command = command.name(), "undone");
                self.redo_stack.push(command);
                true
            }
            None => false,
        }
    }

    /// Re-applies the most recently undone command. Returns false if there
    /// was nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(mut command) => {
                command.execute();
                tracing::debug!(command = command.name(), "redone");
                self.undo_stack.push_back(command);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Name of the command `undo` would revert.
    pub fn next_undo_name(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.name())
    }

    /// Name of the command `redo` would re-apply.
    pub fn next_redo_name(&self) -> Option<&str> {
        self.redo_stack.last().map(|c| c.name())
    }

    /// Forgets every recorded command without touching the edited state.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHistory")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
