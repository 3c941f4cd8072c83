use std::collections::VecDeque;

/// Maximum number of undoable edits kept per document.
pub const HISTORY_DEPTH: usize = 100;

/// One reversible change to the buffer: `removed` was replaced by `inserted`
/// starting at char offset `at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub at: usize,
    pub removed: String,
    pub inserted: String,
    pub cursor_before: usize,
    pub cursor_after: usize,
}

impl Edit {
    pub fn inverse(&self) -> Edit {
        Edit {
            at: self.at,
            removed: self.inserted.clone(),
            inserted: self.removed.clone(),
            cursor_before: self.cursor_after,
            cursor_after: self.cursor_before,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed == self.inserted
    }
}

/// Linear undo/redo stacks. Recording a new edit drops the redo tail.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Edit>,
    redo: Vec<Edit>,
    depth: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_depth(HISTORY_DEPTH)
    }

    pub fn with_depth(depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            depth: depth.max(1),
        }
    }

    pub fn record(&mut self, edit: Edit) {
        if edit.is_empty() {
            return;
        }

        self.redo.clear();
        self.undo.push_back(edit);

        if self.undo.len() > self.depth {
            self.undo.pop_front();
        }
    }

    /// Pop the most recent edit. The caller applies its inverse.
    pub fn undo(&mut self) -> Option<Edit> {
        let edit = self.undo.pop_back()?;
        self.redo.push(edit.clone());
        Some(edit)
    }

    /// Pop the most recently undone edit. The caller re-applies it.
    pub fn redo(&mut self) -> Option<Edit> {
        let edit = self.redo.pop()?;
        self.undo.push_back(edit.clone());
        Some(edit)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
