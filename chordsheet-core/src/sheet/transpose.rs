use crate::sheet::scanner::ChordScanner;
use crate::types::chord::transpose_chord_symbol;

/// Transpose every chord on a performance sheet by `offset` semitones.
///
/// Lyrics, section labels, whitespace and line breaks come back byte for
/// byte; only chord roots change. An offset of 0 returns the sheet exactly as
/// written, flat spellings included (use [`respell_sheet`] to normalize).
pub fn transpose_sheet(text: &str, offset: i32) -> String {
    if offset == 0 {
        return text.to_string();
    }
    rewrite_sheet(text, offset)
}

/// Rewrite every chord root on a sheet with its canonical sharp spelling
/// (`Bb` becomes `A#`) without shifting anything.
pub fn respell_sheet(text: &str) -> String {
    rewrite_sheet(text, 0)
}

fn rewrite_sheet(text: &str, offset: i32) -> String {
    text.split('\n')
        .map(|line| rewrite_line(line, offset))
        .collect::<Vec<_>>()
        .join("\n")
}

fn rewrite_line(line: &str, offset: i32) -> String {
    let mut output = String::with_capacity(line.len() + 8);
    let mut last = 0;

    for span in ChordScanner::new(line) {
        output.push_str(&line[last..span.start]);
        output.push_str(&transpose_chord_symbol(&line[span.clone()], offset));
        last = span.end;
    }

    output.push_str(&line[last..]);
    output
}
