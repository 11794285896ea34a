//! Chord and section highlighting for sheet editors and terminals

use crate::sheet::scanner::{match_chord, ChordScanner};
#[cfg(feature = "colored")]
use colored::*;

/// What a highlighted span marks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SpanKind {
    /// A chord symbol
    Chord,
    /// A bracketed section label on its own line, e.g. `[CHORUS]`
    Section,
}

/// A highlighted region of a sheet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HighlightSpan {
    pub kind: SpanKind,
    /// 0-indexed line number
    pub line: usize,
    /// 0-indexed column in characters
    pub column: usize,
    /// Byte offset from start of the sheet
    pub start: usize,
    /// Byte offset one past the end of the span
    pub end: usize,
    pub text: String,
    /// UTF-16 code unit offset from start of the sheet (for JavaScript interop)
    pub utf16_start: usize,
    /// UTF-16 code unit length of the span
    pub utf16_len: usize,
}

/// Whether a line is a bracketed section label such as `[VERSE 1]`.
///
/// A bracketed chord on its own (`[G]`, `[Am7]`) is an inline chord, not a label.
pub fn is_section_label(line: &str) -> bool {
    let trimmed = line.trim();
    let Some(inner) = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return false;
    };
    !inner.is_empty() && match_chord(inner) != Some(inner.len())
}

/// Find every chord and section label in a sheet, in reading order
pub fn highlight_spans(text: &str) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();
    let mut line_start = 0;
    let mut utf16_line_start = 0;

    for (line_number, line) in text.split('\n').enumerate() {
        let span_at = |kind: SpanKind, start: usize, end: usize| {
            let prefix = &line[..start];
            let body = &line[start..end];
            HighlightSpan {
                kind,
                line: line_number,
                column: prefix.chars().count(),
                start: line_start + start,
                end: line_start + end,
                text: body.to_string(),
                utf16_start: utf16_line_start + utf16_len(prefix),
                utf16_len: utf16_len(body),
            }
        };

        if is_section_label(line) {
            let start = line.len() - line.trim_start().len();
            let end = line.trim_end().len();
            spans.push(span_at(SpanKind::Section, start, end));
        } else {
            for range in ChordScanner::new(line) {
                spans.push(span_at(SpanKind::Chord, range.start, range.end));
            }
        }

        line_start += line.len() + 1;
        utf16_line_start += utf16_len(line) + 1;
    }

    spans
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Paint chords and section labels for terminal output
#[cfg(feature = "colored")]
pub fn colorize_sheet(text: &str) -> String {
    let mut output = String::with_capacity(text.len() * 2);
    let mut last = 0;

    for span in highlight_spans(text) {
        output.push_str(&text[last..span.start]);
        let painted = match span.kind {
            SpanKind::Chord => span.text.bright_yellow().bold(),
            SpanKind::Section => span.text.bright_cyan().bold(),
        };
        output.push_str(&painted.to_string());
        last = span.end;
    }

    output.push_str(&text[last..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chord_spans_positions() {
        let sheet = "[CHORUS]\n  G   C/E\nHoly, holy";
        let spans = highlight_spans(sheet);
        assert_eq!(spans.len(), 3);

        assert_eq!(spans[0].kind, SpanKind::Section);
        assert_eq!(spans[0].text, "[CHORUS]");
        assert_eq!(spans[0].line, 0);

        assert_eq!(spans[1].kind, SpanKind::Chord);
        assert_eq!(spans[1].text, "G");
        assert_eq!(spans[1].line, 1);
        assert_eq!(spans[1].column, 2);
        assert_eq!(&sheet[spans[1].start..spans[1].end], "G");

        assert_eq!(spans[2].text, "C/E");
        assert_eq!(spans[2].column, 6);
        assert_eq!(spans[2].start, 15);
    }

    #[test]
    fn test_utf16_offsets_after_wide_chars() {
        let sheet = "🎵 worship\nD";
        let spans = highlight_spans(sheet);
        assert_eq!(spans.len(), 1);
        // The emoji is 4 bytes but 2 UTF-16 units
        assert_eq!(spans[0].start, 13);
        assert_eq!(spans[0].utf16_start, 11);
        assert_eq!(spans[0].utf16_len, 1);
    }

    #[test]
    fn test_section_label_detection() {
        assert!(is_section_label("[VERSE 1]"));
        assert!(is_section_label("  [Bridge]  "));
        assert!(!is_section_label("[]"));
        assert!(!is_section_label("[G]grace"));
        assert!(!is_section_label("[G]"));
        assert!(!is_section_label(" [Am7] "));
        assert!(is_section_label("[Ending]"));
    }

    #[test]
    fn test_bracketed_chord_line_is_a_chord() {
        let spans = highlight_spans("[G]\nAmazing");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, SpanKind::Chord);
        assert_eq!(spans[0].text, "G");
        assert_eq!(spans[0].column, 1);
    }

    #[cfg(feature = "colored")]
    #[test]
    fn test_colorize_keeps_text() {
        colored::control::set_override(false);
        let sheet = "[INTRO]\nAm  F  C  G";
        assert_eq!(colorize_sheet(sheet), sheet);
    }
}
