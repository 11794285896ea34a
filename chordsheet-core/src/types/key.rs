use crate::error::TransposeError;
use crate::types::pitch::{leading_root_len, resolve_pitch_class, PitchClass};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

/// The key a song is written or played in.
///
/// Parsed from the free-text `original_key` stored with a song: a root in any
/// accepted spelling, optionally followed by a mode (`m`, `min`, `minor`,
/// `maj`, `major`). Displayed with the canonical sharp root, plus `m` for
/// minor keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Key {
    tonic: PitchClass,
    mode: Mode,
}

impl Key {
    pub fn new(tonic: PitchClass, mode: Mode) -> Self {
        Key { tonic, mode }
    }

    pub fn major(tonic: PitchClass) -> Self {
        Key::new(tonic, Mode::Major)
    }

    pub fn minor(tonic: PitchClass) -> Self {
        Key::new(tonic, Mode::Minor)
    }

    pub fn tonic(&self) -> PitchClass {
        self.tonic
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Shift the tonic, keeping the mode
    pub fn transpose(&self, semitones: i32) -> Key {
        Key::new(self.tonic.transpose(semitones), self.mode)
    }
}

impl FromStr for Key {
    type Err = TransposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let unknown = || TransposeError::UnknownKey(trimmed.to_string());

        let root_len = leading_root_len(trimmed).ok_or_else(unknown)?;
        let tonic = resolve_pitch_class(&trimmed[..root_len]).ok_or_else(unknown)?;

        let mode = match trimmed[root_len..].trim() {
            "" | "M" => Mode::Major,
            "m" => Mode::Minor,
            rest => match rest.to_lowercase().as_str() {
                "maj" | "major" => Mode::Major,
                "min" | "minor" => Mode::Minor,
                _ => return Err(unknown()),
            },
        };

        Ok(Key::new(tonic, mode))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Major => write!(f, "{}", self.tonic),
            Mode::Minor => write!(f, "{}m", self.tonic),
        }
    }
}

/// The key label to show for a song played `offset` semitones away from its
/// stored key.
///
/// An unresolvable stored key is reported as `TransposeError::UnknownKey`
/// rather than being shown as C.
pub fn display_key(original_key: &str, offset: i32) -> Result<Key, TransposeError> {
    Ok(original_key.parse::<Key>()?.transpose(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_key_basic() {
        assert_eq!(display_key("C", 2).unwrap().to_string(), "D");
        assert_eq!(display_key("C", 0).unwrap().to_string(), "C");
        assert_eq!(display_key("C", -1).unwrap().to_string(), "B");
        assert_eq!(display_key("A", 3).unwrap().to_string(), "C");
        assert_eq!(display_key("G", -19).unwrap().to_string(), "C");
    }

    #[test]
    fn test_display_key_flat_spelling() {
        assert_eq!(display_key("Bb", 0).unwrap().to_string(), "A#");
        assert_eq!(display_key("Eb", 2).unwrap().to_string(), "F");
    }

    #[test]
    fn test_display_key_minor() {
        assert_eq!(display_key("Am", 2).unwrap().to_string(), "Bm");
        assert_eq!(display_key("F# minor", 1).unwrap().to_string(), "Gm");
        assert_eq!(display_key("D major", 0).unwrap().to_string(), "D");
        assert_eq!(display_key(" E ", 0).unwrap(), Key::major(PitchClass::E));
    }

    #[test]
    fn test_unknown_key_is_error() {
        assert_eq!(
            display_key("H", 2),
            Err(TransposeError::UnknownKey("H".to_string()))
        );
        assert_eq!(
            display_key("", 0),
            Err(TransposeError::UnknownKey(String::new()))
        );
        assert_eq!(
            display_key("C lydian", 0),
            Err(TransposeError::UnknownKey("C lydian".to_string()))
        );
    }

    #[test]
    fn test_transpose_keeps_mode() {
        let key = Key::minor(PitchClass::E);
        assert_eq!(key.transpose(2).mode(), Mode::Minor);
        assert_eq!(key.transpose(2).tonic(), PitchClass::FSharp);
    }
}
