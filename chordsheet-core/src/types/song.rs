use crate::error::TransposeError;
use crate::types::key::{display_key, Key};
use crate::types::tempo::{bpm_from_tempo_label, Bpm};
use std::fmt;

/// Which part of the ministry a song belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Choir,
    #[default]
    Worship,
    Special,
}

impl Category {
    /// Parse a category name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Category> {
        match s.trim().to_lowercase().as_str() {
            "choir" => Some(Category::Choir),
            "worship" => Some(Category::Worship),
            "special" => Some(Category::Special),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Choir => "Choir",
            Category::Worship => "Worship",
            Category::Special => "Special",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A song record as stored in the library.
///
/// Field names follow the stored rows (`original_key`, `reference_url`); the
/// camelCase spellings used by the web client are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Song {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub id: Option<String>,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(alias = "originalKey"))]
    pub original_key: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Category,
    /// Free-text tempo label, e.g. `"76 BPM"`
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub tempo: Option<String>,
    /// The performance sheet: lyrics interleaved with chord lines
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub lyrics: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, alias = "referenceUrl", skip_serializing_if = "Option::is_none")
    )]
    pub reference_url: Option<String>,
}

impl Song {
    pub fn new(title: impl Into<String>, original_key: impl Into<String>) -> Self {
        Song {
            id: None,
            title: title.into(),
            original_key: original_key.into(),
            category: Category::default(),
            tempo: None,
            lyrics: None,
            reference_url: None,
        }
    }

    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = Some(lyrics.into());
        self
    }

    pub fn with_tempo(mut self, tempo: impl Into<String>) -> Self {
        self.tempo = Some(tempo.into());
        self
    }

    /// The performance sheet, empty when none was written
    pub fn sheet(&self) -> &str {
        self.lyrics.as_deref().unwrap_or("")
    }

    /// Tempo for the metronome, taken from the tempo label
    pub fn bpm(&self) -> Bpm {
        Bpm::new(bpm_from_tempo_label(self.tempo.as_deref()))
    }

    /// The stored key, parsed
    pub fn key(&self) -> Result<Key, TransposeError> {
        self.original_key.parse()
    }

    /// The key the song is in after shifting by `offset` semitones
    pub fn display_key(&self, offset: i32) -> Result<Key, TransposeError> {
        display_key(&self.original_key, offset)
    }
}
