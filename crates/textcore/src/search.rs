use regex::RegexBuilder;
use std::ops::Range;

/// Result of a literal replace-all pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub text: String,
    pub count: usize,
}

/// Scan `text` for every non-overlapping, case-insensitive occurrence of
/// `term`. Ranges are in char offsets so they can be used against a rope.
///
/// An empty term matches nothing.
pub fn find_all(text: &str, term: &str) -> Vec<Range<usize>> {
    if term.is_empty() || text.is_empty() {
        return Vec::new();
    }

    let pattern = match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(e) => {
            log::warn!("Failed to build search pattern for {:?}: {}", term, e);
            return Vec::new();
        }
    };

    let mut ranges = Vec::new();
    let mut byte_pos = 0;
    let mut char_pos = 0;

    for found in pattern.find_iter(text) {
        char_pos += text[byte_pos..found.start()].chars().count();
        let start = char_pos;
        char_pos += found.as_str().chars().count();
        byte_pos = found.end();
        ranges.push(start..char_pos);
    }

    ranges
}

/// Replace every literal, case-sensitive occurrence of `term` in one pass.
pub fn replace_all(text: &str, term: &str, replacement: &str) -> Replacement {
    if term.is_empty() {
        return Replacement {
            text: text.to_string(),
            count: 0,
        };
    }

    let count = text.matches(term).count();
    if count == 0 {
        return Replacement {
            text: text.to_string(),
            count,
        };
    }

    Replacement {
        text: text.replace(term, replacement),
        count,
    }
}
