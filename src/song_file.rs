//! Loading songs from disk and writing transposed sheets back out
//!
//! `.json` files hold a full song record. Anything else is read as a plain
//! sheet; a few `Name: value` header lines at the top (`Title`, `Key`,
//! `Tempo`, `Category`) fill in the record, and a single blank line after
//! them is dropped.

use anyhow::{Context, Result};
use chordsheet_core::types::song::{Category, Song};
use std::path::Path;
use tracing::{debug, info};

/// Key assumed for plain sheets that do not declare one
pub const DEFAULT_KEY: &str = "C";

/// Load a song from a `.json` record or a plain-text sheet
pub fn load_song(path: &Path) -> Result<Song> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let song = if is_json {
        serde_json::from_str::<Song>(&contents)
            .with_context(|| format!("Invalid song record in {}", path.display()))?
    } else {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string());
        song_from_sheet_text(&stem, &contents)
    };

    debug!(path = %path.display(), title = %song.title, "loaded song");
    Ok(song)
}

/// Build a song from plain sheet text, reading optional header lines
pub fn song_from_sheet_text(default_title: &str, text: &str) -> Song {
    let mut song = Song::new(default_title, DEFAULT_KEY);
    let mut body_start = 0;
    let mut saw_header = false;

    for line in text.split_inclusive('\n') {
        match parse_header(line) {
            Some((name, value)) => {
                match name.as_str() {
                    "title" => song.title = value.to_string(),
                    "key" => song.original_key = value.to_string(),
                    "tempo" => song.tempo = Some(value.to_string()),
                    "category" => {
                        if let Some(category) = Category::from_str(value) {
                            song.category = category;
                        }
                    }
                    _ => unreachable!("parse_header only returns known names"),
                }
                saw_header = true;
                body_start += line.len();
            }
            None => {
                if saw_header && line.trim().is_empty() {
                    body_start += line.len();
                }
                break;
            }
        }
    }

    song.lyrics = Some(text[body_start..].to_string());
    song
}

fn parse_header(line: &str) -> Option<(String, &str)> {
    let (name, value) = line.split_once(':')?;
    let name = name.trim().to_lowercase();
    match name.as_str() {
        "title" | "key" | "tempo" | "category" => Some((name, value.trim())),
        _ => None,
    }
}

/// Write a sheet to `path`
pub fn save_sheet(path: &Path, sheet: &str) -> Result<()> {
    std::fs::write(path, sheet).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = sheet.len(), "saved sheet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_sheet_without_headers() {
        let song = song_from_sheet_text("majesty", "G   Em7\nThe splendor");
        assert_eq!(song.title, "majesty");
        assert_eq!(song.original_key, DEFAULT_KEY);
        assert_eq!(song.sheet(), "G   Em7\nThe splendor");
    }

    #[test]
    fn test_headers_fill_record() {
        let text = "Title: Majesty\nKey: Bb\nTempo: 72 BPM\nCategory: choir\n\nBb   Gm\nMajesty";
        let song = song_from_sheet_text("file", text);
        assert_eq!(song.title, "Majesty");
        assert_eq!(song.original_key, "Bb");
        assert_eq!(song.bpm().get(), 72);
        assert_eq!(song.category, Category::Choir);
        assert_eq!(song.sheet(), "Bb   Gm\nMajesty");
    }

    #[test]
    fn test_chord_line_with_colon_is_not_a_header() {
        let text = "Intro: G  C\nG   C";
        let song = song_from_sheet_text("x", text);
        assert_eq!(song.sheet(), text);
    }

    #[test]
    fn test_blank_first_line_is_kept_without_headers() {
        let song = song_from_sheet_text("x", "\nC");
        assert_eq!(song.sheet(), "\nC");
    }
}
