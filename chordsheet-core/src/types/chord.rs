use crate::error::TransposeError;
use crate::types::pitch::{leading_root_len, resolve_pitch_class, PitchClass};
use std::fmt;
use std::str::FromStr;

/// Quality and extension tokens recognized after a chord root on a sheet.
///
/// Order matters: the sheet scanner tries them first to last, like the
/// alternatives of a regular expression.
pub const EXTENSIONS: [&str; 22] = [
    "m", "maj", "min", "aug", "dim", "sus", "add", "maj7", "m7", "7", "6", "9", "11", "13",
    "b5", "#5", "#11", "b9", "#9", "2", "4", "5",
];

/// Maximum number of extension tokens chained after one root (`m7b5` is three)
pub const MAX_EXTENSIONS: usize = 4;

/// A chord symbol such as `Am7`, `Bbmaj7` or `G/B`.
///
/// The root (and bass, for slash chords) are stored as pitch classes, so the
/// symbol always displays with canonical sharp spelling. Everything between
/// the root and the slash is kept verbatim as the suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordSymbol {
    root: PitchClass,
    suffix: String,
    bass: Option<PitchClass>,
    bass_suffix: String,
}

impl ChordSymbol {
    /// Create a chord symbol from its parts
    pub fn new(root: PitchClass, suffix: impl Into<String>) -> Self {
        ChordSymbol {
            root,
            suffix: suffix.into(),
            bass: None,
            bass_suffix: String::new(),
        }
    }

    /// Add a slash bass note
    pub fn with_bass(mut self, bass: PitchClass) -> Self {
        self.bass = Some(bass);
        self
    }

    /// Parse a chord symbol leniently.
    ///
    /// The leading root must be `[A-G]` plus an optional `b`/`#` that resolves
    /// to a pitch class; anything after it is kept as the suffix. When the
    /// suffix contains a `/` followed by a resolvable root, that root becomes
    /// the bass. Returns `None` when the leading root is not recognized.
    pub fn parse(symbol: &str) -> Option<Self> {
        let root_len = leading_root_len(symbol)?;
        let root = resolve_pitch_class(&symbol[..root_len])?;
        let rest = &symbol[root_len..];

        if let Some(slash) = rest.rfind('/') {
            let after = &rest[slash + 1..];
            if let Some(bass_len) = leading_root_len(after) {
                if let Some(bass) = resolve_pitch_class(&after[..bass_len]) {
                    return Some(ChordSymbol {
                        root,
                        suffix: rest[..slash].to_string(),
                        bass: Some(bass),
                        bass_suffix: after[bass_len..].to_string(),
                    });
                }
            }
        }

        Some(ChordSymbol::new(root, rest))
    }

    /// The chord root
    pub fn root(&self) -> PitchClass {
        self.root
    }

    /// Quality and extensions as written (`m7`, `maj7`, `sus4`, ...)
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The slash bass note, if any
    pub fn bass(&self) -> Option<PitchClass> {
        self.bass
    }

    /// Shift root and bass by the same number of semitones
    pub fn transpose(&self, semitones: i32) -> ChordSymbol {
        ChordSymbol {
            root: self.root.transpose(semitones),
            suffix: self.suffix.clone(),
            bass: self.bass.map(|b| b.transpose(semitones)),
            bass_suffix: self.bass_suffix.clone(),
        }
    }
}

impl FromStr for ChordSymbol {
    type Err = TransposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ChordSymbol::parse(s).ok_or_else(|| {
            let root_len = leading_root_len(s)
                .unwrap_or_else(|| s.chars().next().map_or(0, char::len_utf8));
            TransposeError::UnknownRoot(s[..root_len].to_string())
        })
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.suffix)?;
        if let Some(bass) = self.bass {
            write!(f, "/{}{}", bass, self.bass_suffix)?;
        }
        Ok(())
    }
}

/// Shift a single chord symbol by `offset` semitones.
///
/// The root is rewritten with its canonical sharp name, the suffix is left
/// untouched, and a slash bass moves with the root. Input whose leading root
/// is not recognized comes back unchanged. An offset of 0 still respells
/// flats as sharps (`Bb` becomes `A#`).
pub fn transpose_chord_symbol(symbol: &str, offset: i32) -> String {
    match ChordSymbol::parse(symbol) {
        Some(chord) => chord.transpose(offset).to_string(),
        None => symbol.to_string(),
    }
}
