//! Undo/redo of committed selection changes.

use sonicforge_core::TimeRange;

/// Steps kept on the undo stack.
pub const HISTORY_LIMIT: usize = 50;

/// Linear history of selection states.
///
/// Only committed states are recorded (pointer release, select all, mark
/// in/out), never every intermediate drag position.
#[derive(Debug, Clone, Default)]
pub struct SelectionHistory {
    current: Option<TimeRange>,
    undo: Vec<Option<TimeRange>>,
    redo: Vec<Option<TimeRange>>,
}

impl SelectionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed selection. No-op if unchanged.
    pub fn record(&mut self, selection: Option<TimeRange>) {
        if selection == self.current {
            return;
        }
        self.undo.push(self.current);
        if self.undo.len() > HISTORY_LIMIT {
            self.undo.remove(0);
        }
        self.current = selection;
        self.redo.clear();
    }

    /// Step back; returns the selection to restore.
    pub fn undo(&mut self) -> Option<Option<TimeRange>> {
        let prev = self.undo.pop()?;
        self.redo.push(self.current);
        self.current = prev;
        Some(prev)
    }

    /// Step forward; returns the selection to restore.
    pub fn redo(&mut self) -> Option<Option<TimeRange>> {
        let next = self.redo.pop()?;
        self.undo.push(self.current);
        self.current = next;
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.undo.clear();
        self.redo.clear();
    }
}
