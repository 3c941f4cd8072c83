//! Display-column arithmetic for the text area.
//!
//! The cursor lives in char offsets, the terminal in cells. Wide characters
//! take two cells, control characters none, and a tab advances to the next
//! multiple of [`TAB_WIDTH`].

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const TAB_WIDTH: usize = 4;

/// Cells taken by `c` when it starts at display column `col`.
pub fn char_width(c: char, col: usize) -> usize {
    if c == '\t' {
        TAB_WIDTH - (col % TAB_WIDTH)
    } else {
        c.width().unwrap_or(0)
    }
}

/// Width of `text` in cells, measured per grapheme cluster.
pub fn str_width(text: &str) -> usize {
    let mut col = 0;
    for grapheme in text.graphemes(true) {
        col += if grapheme == "\t" {
            TAB_WIDTH - (col % TAB_WIDTH)
        } else {
            grapheme.width()
        };
    }
    col
}

/// Display column of the char at `char_index` in `line`.
pub fn char_index_to_col(line: &str, char_index: usize) -> usize {
    line.chars()
        .take(char_index)
        .fold(0, |col, c| col + char_width(c, col))
}

/// Char index under display column `col`. A column inside a wide character
/// or tab resolves to that character; past the end resolves to the length.
pub fn col_to_char_index(line: &str, col: usize) -> usize {
    let mut current = 0;
    for (i, c) in line.chars().enumerate() {
        let width = char_width(c, current);
        if col < current + width.max(1) {
            return i;
        }
        current += width;
    }
    line.chars().count()
}
