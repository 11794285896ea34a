use crate::error::TransposeError;
use crate::sheet::transpose::transpose_sheet;
use crate::types::key::Key;
use crate::types::song::Song;
use crate::types::tempo::Bpm;

/// A song as a musician is reading it: the stored record plus the transpose
/// offset they have dialed in.
///
/// The offset is unbounded; it only wraps when applied to pitches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetView {
    song: Song,
    offset: i32,
}

impl SheetView {
    pub fn new(song: Song) -> Self {
        SheetView { song, offset: 0 }
    }

    pub fn song(&self) -> &Song {
        &self.song
    }

    /// Swap in a new revision of the song, keeping the offset
    pub fn replace_song(&mut self, song: Song) {
        self.song = song;
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: i32) {
        self.offset = offset;
    }

    /// Up one semitone
    pub fn raise(&mut self) {
        self.shift(1);
    }

    /// Down one semitone
    pub fn lower(&mut self) {
        self.shift(-1);
    }

    pub fn shift(&mut self, semitones: i32) {
        self.offset = self.offset.saturating_add(semitones);
    }

    /// Back to the original key
    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Offset as shown next to the +/- controls: `+2`, `0`, `-1`
    pub fn offset_label(&self) -> String {
        if self.offset > 0 {
            format!("+{}", self.offset)
        } else {
            self.offset.to_string()
        }
    }

    /// Key the sheet currently reads in
    pub fn current_key(&self) -> Result<Key, TransposeError> {
        self.song.display_key(self.offset)
    }

    /// The sheet at the current offset
    pub fn sheet(&self) -> String {
        transpose_sheet(self.song.sheet(), self.offset)
    }

    pub fn bpm(&self) -> Bpm {
        self.song.bpm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> SheetView {
        SheetView::new(
            Song::new("Majesty", "C")
                .with_lyrics("G        Em7\nThe splendor of the King")
                .with_tempo("72 BPM"),
        )
    }

    #[test]
    fn test_raise_lower_reset() {
        let mut view = view();
        view.raise();
        view.raise();
        assert_eq!(view.offset(), 2);
        assert_eq!(view.offset_label(), "+2");
        assert_eq!(view.current_key().unwrap().to_string(), "D");
        assert_eq!(view.sheet(), "A        F#m7\nThe splendor of the King");

        view.lower();
        view.lower();
        view.lower();
        assert_eq!(view.offset_label(), "-1");
        assert_eq!(view.current_key().unwrap().to_string(), "B");

        view.reset();
        assert_eq!(view.offset_label(), "0");
        assert_eq!(view.sheet(), view.song().sheet());
    }

    #[test]
    fn test_offset_is_unbounded() {
        let mut view = view();
        view.set_offset(-25);
        assert_eq!(view.offset(), -25);
        assert_eq!(view.current_key().unwrap().to_string(), "B");
    }

    #[test]
    fn test_missing_lyrics_render_empty() {
        let mut view = SheetView::new(Song::new("Instrumental", "G"));
        view.shift(3);
        assert_eq!(view.sheet(), "");
        assert_eq!(view.bpm().get(), 120);
    }

    #[test]
    fn test_replace_song_keeps_offset() {
        let mut view = view();
        view.shift(4);
        view.replace_song(Song::new("Majesty", "C").with_lyrics("C"));
        assert_eq!(view.offset(), 4);
        assert_eq!(view.sheet(), "E");
    }
}
