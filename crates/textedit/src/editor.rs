use ropey::Rope;
use std::cmp;
use std::ops::Range;

use crate::history::{Edit, History};
use textcore::is_line_break;

/// The document buffer: rope content, cursor, selection anchor, the
/// modification flag and the undo history.
#[derive(Clone)]
pub struct Editor {
    rope: Rope,
    cursor_line: usize,
    cursor_col: usize,
    // Char offset where the selection started; the cursor is the other end
    anchor: Option<usize>,
    viewport_offset: usize,
    viewport_height: usize,
    modified: bool,
    history: History,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            cursor_line: 0,
            cursor_col: 0,
            anchor: None,
            viewport_offset: 0,
            viewport_height: 24, // Default, updated by the renderer
            modified: false,
            history: History::new(),
        }
    }

    /// Replace the whole buffer without recording history. Used by load and
    /// new, which leave the document clean.
    pub fn set_content(&mut self, content: &str) {
        self.rope = Rope::from_str(content);
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.anchor = None;
        self.viewport_offset = 0;
        self.modified = false;
        self.history.clear();
    }

    pub fn get_content(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Text of `line` without its line break.
    pub fn line_text(&self, line: usize) -> String {
        if line >= self.rope.len_lines() {
            return String::new();
        }
        let len = self.line_len(line);
        self.rope.line(line).slice(..len).to_string()
    }

    /// Char offset where `line` begins.
    pub fn line_start(&self, line: usize) -> usize {
        self.line_col_to_char_idx(line, 0)
    }

    pub fn cursor_position(&self) -> (usize, usize) {
        (self.cursor_line, self.cursor_col)
    }

    pub fn cursor_char_idx(&self) -> usize {
        self.line_col_to_char_idx(self.cursor_line, self.cursor_col)
    }

    pub fn set_cursor_position(&mut self, line: usize, col: usize) {
        let max_line = self.rope.len_lines().saturating_sub(1);
        self.cursor_line = line.min(max_line);
        self.cursor_col = col.min(self.line_len(self.cursor_line));
        self.adjust_viewport();
    }

    pub fn set_cursor_char_idx(&mut self, idx: usize) {
        let (line, col) = self.char_idx_to_line_col(idx);
        self.cursor_line = line;
        self.cursor_col = col;
        self.adjust_viewport();
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.adjust_viewport();
    }

    pub fn viewport_offset(&self) -> usize {
        self.viewport_offset
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Lines currently inside the viewport, paired with their line index.
    pub fn viewport_lines(&self) -> Vec<(usize, String)> {
        let end_line = cmp::min(
            self.viewport_offset + self.viewport_height,
            self.rope.len_lines(),
        );

        (self.viewport_offset..end_line)
            .map(|i| (i, self.line_text(i)))
            .collect()
    }

    // Editing

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    /// Insert at the cursor, replacing the selection if there is one.
    pub fn insert_str(&mut self, text: &str) {
        let range = self
            .selection()
            .unwrap_or_else(|| self.cursor_char_idx()..self.cursor_char_idx());
        let cursor_after = range.start + text.chars().count();
        self.splice(range, text, cursor_after);
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn insert_tab(&mut self) {
        self.insert_char('\t');
    }

    pub fn delete_char_backward(&mut self) {
        if self.delete_selection().is_some() {
            return;
        }

        let idx = self.cursor_char_idx();
        if idx > 0 {
            // Remove a CRLF pair as one break
            let start = if idx >= 2
                && self.rope.char(idx - 1) == '\n'
                && self.rope.char(idx - 2) == '\r'
            {
                idx - 2
            } else {
                idx - 1
            };
            self.splice(start..idx, "", start);
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.delete_selection().is_some() {
            return;
        }

        let idx = self.cursor_char_idx();
        let len = self.rope.len_chars();
        if idx < len {
            let end = if self.rope.char(idx) == '\r'
                && idx + 1 < len
                && self.rope.char(idx + 1) == '\n'
            {
                idx + 2
            } else {
                idx + 1
            };
            self.splice(idx..end, "", idx);
        }
    }

    /// Replace the whole buffer as a single undoable edit.
    pub fn replace_content(&mut self, content: &str) {
        let cursor = self.cursor_char_idx().min(content.chars().count());
        let len = self.rope.len_chars();
        self.splice(0..len, content, cursor);
    }

    // Selection

    pub fn start_selection(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some(self.cursor_char_idx());
        }
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(self.rope.len_chars());
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.adjust_viewport();
    }

    /// Non-empty char range between the anchor and the cursor.
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        let cursor = self.cursor_char_idx();
        let range = cmp::min(anchor, cursor)..cmp::max(anchor, cursor);
        if range.is_empty() {
            None
        } else {
            Some(range)
        }
    }

    pub fn selected_text(&self) -> Option<String> {
        self.selection()
            .map(|range| self.rope.slice(range).to_string())
    }

    /// Remove the selected text and return it.
    pub fn delete_selection(&mut self) -> Option<String> {
        let range = self.selection()?;
        let removed = self.rope.slice(range.clone()).to_string();
        let start = range.start;
        self.splice(range, "", start);
        Some(removed)
    }

    // History

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(edit) => {
                self.apply(&edit.inverse());
                self.modified = true;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(edit) => {
                self.apply(&edit);
                self.modified = true;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // Cursor movement

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.adjust_cursor_col();
            self.adjust_viewport();
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.rope.len_lines() {
            self.cursor_line += 1;
            self.adjust_cursor_col();
            self.adjust_viewport();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
            self.adjust_viewport();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.line_len(self.cursor_line) {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.rope.len_lines() {
            self.cursor_line += 1;
            self.cursor_col = 0;
            self.adjust_viewport();
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor_col = self.line_len(self.cursor_line);
    }

    pub fn page_up(&mut self) {
        self.cursor_line = self.cursor_line.saturating_sub(self.viewport_height);
        self.viewport_offset = self.viewport_offset.saturating_sub(self.viewport_height);
        self.adjust_cursor_col();
        self.adjust_viewport();
    }

    pub fn page_down(&mut self) {
        let max_line = self.rope.len_lines().saturating_sub(1);
        self.cursor_line = cmp::min(self.cursor_line + self.viewport_height, max_line);
        self.adjust_cursor_col();
        self.adjust_viewport();
    }

    // Internals

    fn splice(&mut self, range: Range<usize>, text: &str, cursor_after: usize) {
        let edit = Edit {
            at: range.start,
            removed: self.rope.slice(range).to_string(),
            inserted: text.to_string(),
            cursor_before: self.cursor_char_idx(),
            cursor_after,
        };
        if edit.is_empty() {
            self.anchor = None;
            return;
        }

        if self.rope.len_chars() > 1_000_000 {
            log::warn!("Document size approaching limit, edits may be slow");
        }

        self.apply(&edit);
        self.history.record(edit);
        self.modified = true;
    }

    fn apply(&mut self, edit: &Edit) {
        let removed_len = edit.removed.chars().count();
        self.rope.remove(edit.at..edit.at + removed_len);
        self.rope.insert(edit.at, &edit.inserted);
        self.anchor = None;
        self.set_cursor_char_idx(edit.cursor_after.min(self.rope.len_chars()));
    }

    /// Length of `line` in chars, excluding its line break.
    fn line_len(&self, line: usize) -> usize {
        let Some(slice) = self.rope.get_line(line) else {
            return 0;
        };
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        } else if len > 0 && is_line_break(slice.char(len - 1)) {
            len -= 1;
        }
        len
    }

    fn line_col_to_char_idx(&self, line: usize, col: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line) + col.min(self.line_len(line))
    }

    fn char_idx_to_line_col(&self, char_idx: usize) -> (usize, usize) {
        let idx = char_idx.min(self.rope.len_chars());
        let line = self.rope.char_to_line(idx);
        let col = idx - self.rope.line_to_char(line);
        (line, col.min(self.line_len(line)))
    }

    fn adjust_cursor_col(&mut self) {
        self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
    }

    fn adjust_viewport(&mut self) {
        if self.cursor_line < self.viewport_offset {
            self.viewport_offset = self.cursor_line;
        } else if self.cursor_line >= self.viewport_offset + self.viewport_height {
            self.viewport_offset = self.cursor_line + 1 - self.viewport_height;
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
