use tracing::debug;

use super::command::Command;
use crate::model::TableStore;

/// Linear undo history.
///
/// `entries[..len - undone]` have been applied to the store; the trailing
/// `undone` entries are available for redo until the next `execute`.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<Command>,
    undone: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the redo tail, record `command` and apply it.
    pub fn execute(&mut self, command: Command, store: &mut TableStore) {
        if self.undone > 0 {
            debug!(target: "history", "discarding {} undone command(s)", self.undone);
            self.entries.truncate(self.entries.len() - self.undone);
            self.undone = 0;
        }
        debug!(target: "history", "execute: {}", command);
        self.entries.push(command);
        if let Some(command) = self.entries.last() {
            command.execute(store);
        }
    }

    /// Returns false when there is nothing left to undo.
    pub fn undo(&mut self, store: &mut TableStore) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.undone += 1;
        let command = &self.entries[self.entries.len() - self.undone];
        debug!(target: "history", "undo: {}", command);
        command.undo(store);
        true
    }

    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self, store: &mut TableStore) -> bool {
        if !self.can_redo() {
            return false;
        }
        let command = &self.entries[self.entries.len() - self.undone];
        debug!(target: "history", "redo: {}", command);
        command.execute(store);
        self.undone -= 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.undone < self.entries.len()
    }

    pub fn can_redo(&self) -> bool {
        self.undone > 0
    }

    /// Total recorded commands, including undone ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn undone_count(&self) -> usize {
        self.undone
    }

    /// Commands currently applied to the store.
    pub fn applied_count(&self) -> usize {
        self.entries.len() - self.undone
    }

    /// Most recent applied command, if any.
    pub fn last_applied(&self) -> Option<&Command> {
        self.applied_count()
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
    }
}
