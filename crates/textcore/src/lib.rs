//! Buffer-independent text operations used by the TextEdit session:
//! case-insensitive match scanning, literal replace-all and document
//! statistics.

pub mod search;
pub mod stats;

pub use search::{find_all, replace_all, Replacement};
pub use stats::{is_line_break, DocumentStats};

#[cfg(test)]
mod tests;
