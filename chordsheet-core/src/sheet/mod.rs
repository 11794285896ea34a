// chordsheet-core/src/sheet/mod.rs

pub mod highlight;
pub mod scanner;
pub mod transpose;
pub mod view;

#[cfg(feature = "colored")]
pub use highlight::colorize_sheet;
pub use highlight::{highlight_spans, HighlightSpan, SpanKind};
pub use scanner::{scan_line, ChordScanner};
pub use transpose::{respell_sheet, transpose_sheet};
pub use view::SheetView;
