use serde::{Deserialize, Serialize};
use std::fmt;

/// Counts shown in the "Document Statistics" dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub lines: usize,
    pub words: usize,
    pub chars: usize,
    pub chars_no_spaces: usize,
}

impl DocumentStats {
    pub fn of(text: &str) -> Self {
        Self {
            lines: count_lines(text),
            words: text.split_whitespace().count(),
            chars: text.chars().count(),
            chars_no_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
        }
    }
}

impl fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lines: {}", self.lines)?;
        writeln!(f, "Words: {}", self.words)?;
        writeln!(f, "Characters: {}", self.chars)?;
        write!(f, "Characters (no spaces): {}", self.chars_no_spaces)
    }
}

/// Characters that end a line: the breaks the rope buffer recognises.
pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Number of lines when splitting on line breaks. `\r\n` counts once and a
/// trailing break does not open an extra empty line.
fn count_lines(text: &str) -> usize {
    let mut lines = 0;
    let mut chars = text.chars().peekable();
    let mut open = false;

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines += 1;
                open = false;
            }
            c if is_line_break(c) => {
                lines += 1;
                open = false;
            }
            _ => open = true,
        }
    }

    if open {
        lines += 1;
    }
    lines
}
