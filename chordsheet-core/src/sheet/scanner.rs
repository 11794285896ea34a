//! Chord token scanner for performance sheets
//!
//! Finds chord symbols inside a line of free text without touching anything
//! else. A token is a root (`[A-G]` plus optional `b`/`#`), zero or more
//! quality/extension tokens from [`EXTENSIONS`], and an optional `/` plus a
//! bass root. It must start at a word boundary and must not be followed by an
//! ASCII letter, digit or underscore, so symbols such as `Δ`, `ø` and `°`
//! written straight after a root still leave the root recognized.
//!
//! Alternatives are tried in order with backtracking (accidental before no
//! accidental, each extension in list order, slash bass before no bass), so
//! the span found is the one a leftmost-first regular expression would pick.

use crate::types::chord::{EXTENSIONS, MAX_EXTENSIONS};
use crate::types::pitch::leading_root_len;
use std::ops::Range;

/// Iterator over the byte ranges of chord tokens in one line
pub struct ChordScanner<'a> {
    line: &'a str,
    position: usize,
}

impl<'a> ChordScanner<'a> {
    pub fn new(line: &'a str) -> Self {
        ChordScanner { line, position: 0 }
    }

    fn at_word_start(&self, index: usize) -> bool {
        !self.line[..index]
            .chars()
            .next_back()
            .is_some_and(is_word_char)
    }
}

impl Iterator for ChordScanner<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        while self.position < self.line.len() {
            let start = self.position;
            let ch = self.line[start..].chars().next()?;

            if matches!(ch, 'A'..='G') && self.at_word_start(start) {
                if let Some(len) = match_chord(&self.line[start..]) {
                    self.position = start + len;
                    return Some(start..start + len);
                }
            }

            self.position += ch.len_utf8();
        }
        None
    }
}

/// ASCII letters, digits and underscore; the characters a chord may not touch
pub fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Length of the chord token at the start of `text`, if there is one
pub fn match_chord(text: &str) -> Option<usize> {
    let root_len = leading_root_len(text)?;
    root_candidates(root_len)
        .into_iter()
        .flatten()
        .find_map(|len| match_extensions(text, len, 0))
}

fn root_candidates(root_len: usize) -> [Option<usize>; 2] {
    if root_len == 2 {
        [Some(2), Some(1)]
    } else {
        [Some(root_len), None]
    }
}

fn match_extensions(text: &str, position: usize, depth: usize) -> Option<usize> {
    if depth < MAX_EXTENSIONS {
        let rest = &text[position..];
        for extension in EXTENSIONS {
            if rest.starts_with(extension) {
                if let Some(end) = match_extensions(text, position + extension.len(), depth + 1) {
                    return Some(end);
                }
            }
        }
    }
    match_bass(text, position)
}

fn match_bass(text: &str, position: usize) -> Option<usize> {
    if let Some(after_slash) = text[position..].strip_prefix('/') {
        if let Some(root_len) = leading_root_len(after_slash) {
            for len in root_candidates(root_len).into_iter().flatten() {
                let end = position + 1 + len;
                if ends_token(text, end) {
                    return Some(end);
                }
            }
        }
    }

    if ends_token(text, position) {
        Some(position)
    } else {
        None
    }
}

fn ends_token(text: &str, end: usize) -> bool {
    !text[end..].chars().next().is_some_and(is_word_char)
}

/// All chord token ranges in one line
pub fn scan_line(line: &str) -> Vec<Range<usize>> {
    ChordScanner::new(line).collect()
}
