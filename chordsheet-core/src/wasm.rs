//! WASM bindings for chordsheet-core
//!
//! JavaScript-accessible wrappers for the song detail view: transposing the
//! sheet, labelling the current key, and chord highlighting.

use crate::sheet::{highlight_spans, transpose_sheet};
use crate::types::{bpm_from_tempo_label, display_key, resolve_pitch_class, transpose_chord_symbol};
use wasm_bindgen::prelude::*;

/// Transpose a whole performance sheet
#[wasm_bindgen(js_name = transposeSheet)]
pub fn transpose_sheet_js(text: &str, offset: i32) -> String {
    transpose_sheet(text, offset)
}

/// Transpose a single chord symbol
#[wasm_bindgen(js_name = transposeChord)]
pub fn transpose_chord_js(symbol: &str, offset: i32) -> String {
    transpose_chord_symbol(symbol, offset)
}

/// Current key label, or `undefined` when the stored key is not recognized
#[wasm_bindgen(js_name = displayKey)]
pub fn display_key_js(original_key: &str, offset: i32) -> Option<String> {
    display_key(original_key, offset).ok().map(|key| key.to_string())
}

/// Chromatic index (0-11) of a root spelling, or `undefined`
#[wasm_bindgen(js_name = resolvePitchClass)]
pub fn resolve_pitch_class_js(root: &str) -> Option<u8> {
    resolve_pitch_class(root).map(|p| p.index())
}

/// Metronome tempo from a song's tempo label (120 when absent)
#[wasm_bindgen(js_name = bpmFromTempo)]
pub fn bpm_from_tempo_js(label: Option<String>) -> u32 {
    bpm_from_tempo_label(label.as_deref())
}

/// Chord and section spans as an array of plain objects
#[wasm_bindgen(js_name = highlightChords)]
pub fn highlight_chords_js(text: &str) -> JsValue {
    let spans = highlight_spans(text);
    serde_wasm_bindgen::to_value(&spans).unwrap_or(JsValue::NULL)
}

/// Serialize the highlight spans to a JSON string (for non-JS hosts and debugging)
#[wasm_bindgen(js_name = highlightChordsJson)]
pub fn highlight_chords_json(text: &str) -> String {
    serde_json::to_string(&highlight_spans(text)).unwrap_or_else(|_| "[]".to_string())
}
