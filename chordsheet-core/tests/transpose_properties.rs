use chordsheet_core::types::SHARP_NAMES;
use chordsheet_core::{
    display_key, resolve_pitch_class, respell_sheet, transpose_chord_symbol, transpose_sheet,
    PitchClass, TransposeError,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const HOW_GREAT: &str = "\
[VERSE 1]
C                    F
  O Lord my God, when I in awesome wonder
C                          G
  Consider all the works Thy hands have made
C                    F
  I see the stars, I hear the rolling thunder
C              G/B       C
  Thy power throughout the universe displayed

[CHORUS]
C               F           C
  Then sings my soul, my Saviour God to Thee
      Am7   G   C
";

/// Qualities that keep their meaning under any root
const SUFFIXES: &[&str] = &[
    "", "m", "7", "m7", "maj7", "sus4", "add9", "dim", "aug", "6", "9", "m7b5", "7sus4",
];

fn sharp_chord() -> impl Strategy<Value = String> {
    (
        0usize..12,
        prop::sample::select(SUFFIXES),
        prop::option::of(0usize..12),
    )
        .prop_map(|(root, suffix, bass)| match bass {
            Some(bass) => format!("{}{}/{}", SHARP_NAMES[root], suffix, SHARP_NAMES[bass]),
            None => format!("{}{}", SHARP_NAMES[root], suffix),
        })
}

fn chord_line() -> impl Strategy<Value = String> {
    prop::collection::vec((0usize..6, sharp_chord()), 1..6).prop_map(|chords| {
        chords
            .into_iter()
            .map(|(indent, chord)| format!("{}{}", " ".repeat(indent), chord))
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// Lower-case lyric text; no capital A-G, so nothing in it reads as a chord
fn lyric_text() -> impl Strategy<Value = String> {
    "[a-z ,.'!?\n]{0,200}"
}

fn sharp_sheet() -> impl Strategy<Value = String> {
    prop::collection::vec((chord_line(), "[a-z][a-z ,.']{0,40}"), 1..8).prop_map(|verses| {
        verses
            .into_iter()
            .flat_map(|(chords, words)| [chords, words])
            .collect::<Vec<_>>()
            .join("\n")
    })
}

proptest! {
    #[test]
    fn zero_offset_is_identity_for_any_text(text in "(\\PC|\\n){0,200}") {
        prop_assert_eq!(transpose_sheet(&text, 0), text);
    }

    #[test]
    fn text_without_chords_is_preserved(text in lyric_text(), offset in -30i32..30) {
        prop_assert_eq!(transpose_sheet(&text, offset), text);
    }

    #[test]
    fn generated_sharp_sheets_round_trip(sheet in sharp_sheet(), offset in -30i32..30) {
        let there = transpose_sheet(&sheet, offset);
        prop_assert_eq!(transpose_sheet(&there, -offset), sheet.clone());
        prop_assert_eq!(there.split('\n').count(), sheet.split('\n').count());
    }

    #[test]
    fn generated_lyric_lines_survive(sheet in sharp_sheet(), offset in -30i32..30) {
        let there = transpose_sheet(&sheet, offset);
        for (before, after) in sheet.split('\n').zip(there.split('\n')).skip(1).step_by(2) {
            prop_assert_eq!(before, after);
        }
    }
}

#[test]
fn cyclic_closure_over_every_offset() {
    for p in PitchClass::all() {
        for k in -40..=40 {
            let moved = transpose_chord_symbol(p.name(), k);
            let resolved = resolve_pitch_class(&moved).expect("canonical output resolves");
            assert_eq!(
                resolved.index() as i32,
                (p.index() as i32 + k).rem_euclid(12),
                "{} shifted by {}",
                p,
                k
            );
        }
    }
}

#[test]
fn sharp_spelled_sheet_round_trips() {
    for k in [-13, -7, -1, 1, 2, 5, 11, 12, 25] {
        assert_eq!(transpose_sheet(&transpose_sheet(HOW_GREAT, k), -k), HOW_GREAT);
    }
}

#[test]
fn flat_spelled_sheet_round_trips_to_musical_equivalent() {
    let flats = "Eb   Ab/Eb   Bb7\nBlessed assurance";
    let back = transpose_sheet(&transpose_sheet(flats, 4), -4);

    // String equality only holds against the sharp respelling
    assert_ne!(back, flats);
    assert_eq!(back, respell_sheet(flats));
    assert_eq!(back, "D#   G#/D#   A#7\nBlessed assurance");
}

#[test]
fn lyric_lines_survive_transposition() {
    let out = transpose_sheet(HOW_GREAT, 3);
    let original: Vec<&str> = HOW_GREAT.split('\n').collect();
    let shifted: Vec<&str> = out.split('\n').collect();
    assert_eq!(original.len(), shifted.len());

    for (before, after) in original.iter().zip(&shifted) {
        if before.starts_with("  ") && !before.trim_start().starts_with("Am7") {
            assert_eq!(before, after);
        }
    }
    assert!(out.contains("[VERSE 1]"));
    assert!(out.contains("[CHORUS]"));
}

#[test]
fn chord_lines_shift_by_offset() {
    let out = transpose_sheet(HOW_GREAT, 2);
    assert!(out.contains("\nD                    G\n"));
    assert!(out.contains("\nD              A/C#       D\n"));
    assert!(out.contains("\n      Bm7   A   D\n"));
}

#[test]
fn enharmonic_inputs_agree() {
    assert_eq!(transpose_chord_symbol("Bb", 0), "A#");
    assert_eq!(transpose_chord_symbol("A#", 0), "A#");
    for (flat, sharp) in [("Db", "C#"), ("Eb", "D#"), ("Gb", "F#"), ("Ab", "G#")] {
        assert_eq!(transpose_chord_symbol(flat, 5), transpose_chord_symbol(sharp, 5));
    }
}

#[test]
fn chord_symbol_examples() {
    assert_eq!(transpose_chord_symbol("Cmaj7", 2), "Dmaj7");
    assert_eq!(transpose_chord_symbol("C/G", 2), "D/A");
    assert_eq!(transpose_chord_symbol("C", -1), "B");
    assert_eq!(transpose_chord_symbol("C", -13), "B");
    assert_eq!(transpose_sheet("C/G", 2), "D/A");
}

#[test]
fn end_to_end_song_detail() {
    let sheet = "G        Em7\nThe splendor of the King";
    // E up two semitones is F#
    assert_eq!(transpose_sheet(sheet, 2), "A        F#m7\nThe splendor of the King");
    assert_eq!(display_key("C", 2).unwrap().to_string(), "D");
}

#[test]
fn display_key_covers_every_canonical_name() {
    for (i, name) in SHARP_NAMES.iter().enumerate() {
        assert_eq!(display_key("C", i as i32).unwrap().to_string(), *name);
        assert_eq!(display_key(name, -(i as i32)).unwrap().to_string(), "C");
    }
}

#[test]
fn unknown_original_key_is_reported() {
    match display_key("Do", 1) {
        Err(TransposeError::UnknownKey(key)) => assert_eq!(key, "Do"),
        other => panic!("expected UnknownKey, got {:?}", other),
    }
}
