use crate::error::TransposeError;
use std::fmt;
use std::str::FromStr;

/// One of the 12 semitone positions of the chromatic scale.
///
/// Always displayed with sharps: 0=C, 1=C#, 2=D, 3=D#, 4=E, 5=F, 6=F#, 7=G,
/// 8=G#, 9=A, 10=A#, 11=B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

/// Canonical sharp spellings, index-ordered
pub const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Enharmonic spellings accepted on input and the canonical name they map to
const ALIASES: [(&str, &str); 9] = [
    ("Bb", "A#"),
    ("Eb", "D#"),
    ("Ab", "G#"),
    ("Db", "C#"),
    ("Gb", "F#"),
    ("Cb", "B"),
    ("Fb", "E"),
    ("E#", "F"),
    ("B#", "C"),
];

const ALL: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::CSharp,
    PitchClass::D,
    PitchClass::DSharp,
    PitchClass::E,
    PitchClass::F,
    PitchClass::FSharp,
    PitchClass::G,
    PitchClass::GSharp,
    PitchClass::A,
    PitchClass::ASharp,
    PitchClass::B,
];

impl PitchClass {
    /// All pitch classes in chromatic order starting at C
    pub fn all() -> [PitchClass; 12] {
        ALL
    }

    /// Chromatic index (0-11)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Build a pitch class from any integer, wrapping modulo 12
    pub fn from_index(index: i64) -> PitchClass {
        ALL[index.rem_euclid(12) as usize]
    }

    /// Canonical (sharp) name
    pub fn name(self) -> &'static str {
        SHARP_NAMES[self.index() as usize]
    }

    /// Shift by a number of semitones; any offset is accepted and wraps
    pub fn transpose(self, semitones: i32) -> PitchClass {
        PitchClass::from_index(self.index() as i64 + semitones as i64)
    }
}

/// Resolve a root spelling to its pitch class.
///
/// Accepts the canonical sharp names and the flat/enharmonic aliases
/// (`Bb`, `Eb`, `Ab`, `Db`, `Gb`, `Cb`, `Fb`, `E#`, `B#`). Matching is exact
/// and case sensitive; anything else is unrecognized.
pub fn resolve_pitch_class(root: &str) -> Option<PitchClass> {
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == root)
        .map(|(_, sharp)| *sharp)
        .unwrap_or(root);

    SHARP_NAMES
        .iter()
        .position(|name| *name == canonical)
        .map(|index| ALL[index])
}

/// Length in bytes of the root spelling at the start of `text`, if any.
///
/// A root is `[A-G]` followed by an optional `b` or `#`. The accidental is
/// taken greedily.
pub(crate) fn leading_root_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b'A'..=b'G') => match bytes.get(1) {
            Some(b'b') | Some(b'#') => Some(2),
            _ => Some(1),
        },
        _ => None,
    }
}

impl FromStr for PitchClass {
    type Err = TransposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        resolve_pitch_class(s).ok_or_else(|| TransposeError::UnknownRoot(s.to_string()))
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_table_order() {
        let names: Vec<&str> = PitchClass::all().iter().map(|p| p.name()).collect();
        assert_eq!(names, SHARP_NAMES.to_vec());
        for (i, p) in PitchClass::all().iter().enumerate() {
            assert_eq!(p.index() as usize, i);
        }
    }

    #[test]
    fn test_resolve_sharps_and_flats() {
        assert_eq!(resolve_pitch_class("C"), Some(PitchClass::C));
        assert_eq!(resolve_pitch_class("A#"), Some(PitchClass::ASharp));
        assert_eq!(resolve_pitch_class("Bb"), Some(PitchClass::ASharp));
        assert_eq!(resolve_pitch_class("Eb"), Some(PitchClass::DSharp));
        assert_eq!(resolve_pitch_class("Ab"), Some(PitchClass::GSharp));
        assert_eq!(resolve_pitch_class("Db"), Some(PitchClass::CSharp));
        assert_eq!(resolve_pitch_class("Gb"), Some(PitchClass::FSharp));
    }

    #[test]
    fn test_resolve_edge_enharmonics() {
        assert_eq!(resolve_pitch_class("Cb"), Some(PitchClass::B));
        assert_eq!(resolve_pitch_class("Fb"), Some(PitchClass::E));
        assert_eq!(resolve_pitch_class("E#"), Some(PitchClass::F));
        assert_eq!(resolve_pitch_class("B#"), Some(PitchClass::C));
    }

    #[test]
    fn test_resolve_unrecognized() {
        assert_eq!(resolve_pitch_class("H"), None);
        assert_eq!(resolve_pitch_class("c"), None);
        assert_eq!(resolve_pitch_class("bb"), None);
        assert_eq!(resolve_pitch_class(""), None);
        assert_eq!(resolve_pitch_class("C##"), None);
    }

    #[test]
    fn test_transpose_wraps_both_directions() {
        assert_eq!(PitchClass::C.transpose(-1), PitchClass::B);
        assert_eq!(PitchClass::C.transpose(-13), PitchClass::B);
        assert_eq!(PitchClass::B.transpose(1), PitchClass::C);
        assert_eq!(PitchClass::A.transpose(27), PitchClass::C);
        assert_eq!(PitchClass::E.transpose(0), PitchClass::E);
    }

    #[test]
    fn test_cyclic_closure() {
        for p in PitchClass::all() {
            for k in -30..=30 {
                let moved = p.transpose(k);
                let expected = (p.index() as i32 + k).rem_euclid(12) as u8;
                assert_eq!(resolve_pitch_class(moved.name()).map(|r| r.index()), Some(expected));
            }
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!(" Db ".parse::<PitchClass>(), Ok(PitchClass::CSharp));
        assert_eq!(
            "X".parse::<PitchClass>(),
            Err(TransposeError::UnknownRoot("X".to_string()))
        );
    }

    #[test]
    fn test_leading_root_len() {
        assert_eq!(leading_root_len("C#m7"), Some(2));
        assert_eq!(leading_root_len("Bbmaj7"), Some(2));
        assert_eq!(leading_root_len("Am"), Some(1));
        assert_eq!(leading_root_len("hello"), None);
        assert_eq!(leading_root_len(""), None);
    }
}
