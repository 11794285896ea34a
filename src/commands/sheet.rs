//! Transposition and sheet commands (up, down, key, show, load, save, watch)

use crate::commands::{CommandContext, CommandResult};
use crate::song_file::{load_song, save_sheet};
use chordsheet_core::sheet::colorize_sheet;
use chordsheet_core::{respell_sheet, SheetView};
use colored::*;
use std::path::PathBuf;

/// Handle `up [n]`
pub fn cmd_up(args: &str, ctx: &mut CommandContext) -> CommandResult {
    shift_by(args, 1, ctx)
}

/// Handle `down [n]`
pub fn cmd_down(args: &str, ctx: &mut CommandContext) -> CommandResult {
    shift_by(args, -1, ctx)
}

fn shift_by(args: &str, direction: i32, ctx: &mut CommandContext) -> CommandResult {
    let steps = if args.is_empty() {
        1
    } else {
        match args.parse::<i32>() {
            Ok(n) => n,
            Err(_) => return CommandResult::Error(format!("Invalid semitone count '{}'", args)),
        }
    };

    let view = match ctx.view_mut() {
        Ok(view) => view,
        Err(e) => return e,
    };
    view.shift(steps.saturating_mul(direction));
    CommandResult::Message(key_line(view))
}

/// Handle `reset`
pub fn cmd_reset(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let view = match ctx.view_mut() {
        Ok(view) => view,
        Err(e) => return e,
    };
    view.reset();
    CommandResult::Message(key_line(view))
}

/// Handle `offset [n]`
pub fn cmd_offset(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let view = match ctx.view_mut() {
        Ok(view) => view,
        Err(e) => return e,
    };

    if args.is_empty() {
        return CommandResult::Message(format!("Offset: {}", view.offset_label()));
    }

    match args.trim_start_matches('+').parse::<i32>() {
        Ok(offset) => {
            view.set_offset(offset);
            CommandResult::Message(key_line(view))
        }
        Err(_) => CommandResult::Error(format!("Invalid offset '{}'", args)),
    }
}

/// Handle `key`
pub fn cmd_key(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.view_mut() {
        Ok(view) => CommandResult::Message(key_line(view)),
        Err(e) => e,
    }
}

/// Handle `show`
pub fn cmd_show(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let color = ctx.color();
    match ctx.view_mut() {
        Ok(view) => CommandResult::Message(render_view(view, color)),
        Err(e) => e,
    }
}

/// Handle `respell`: the current sheet with flats rewritten as sharps
pub fn cmd_respell(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let color = ctx.color();
    let view = match ctx.view_mut() {
        Ok(view) => view,
        Err(e) => return e,
    };
    let sheet = respell_sheet(&view.sheet());
    CommandResult::Message(paint(&sheet, color))
}

/// Handle `load <file>`
pub fn cmd_load(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: load <file>".to_string());
    }

    let path = PathBuf::from(args);
    match load_song(&path) {
        Ok(song) => {
            tracing::info!(path = %path.display(), title = %song.title, "song loaded");
            let message = format!(
                "{} Loaded '{}' (key {}, {})",
                "✓".bright_green(),
                song.title.bold(),
                song.original_key,
                song.bpm()
            );
            ctx.open_song(SheetView::new(song), Some(path));
            CommandResult::Message(message)
        }
        Err(e) => CommandResult::Error(format!("{:#}", e)),
    }
}

/// Handle `save <file>`: write the sheet as currently transposed
pub fn cmd_save(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: save <file>".to_string());
    }

    let view = match ctx.view_mut() {
        Ok(view) => view,
        Err(e) => return e,
    };
    let path = PathBuf::from(args);
    match save_sheet(&path, &view.sheet()) {
        Ok(()) => CommandResult::Message(format!(
            "{} Saved sheet in {} to {}",
            "✓".bright_green(),
            current_key_label(view),
            path.display()
        )),
        Err(e) => CommandResult::Error(format!("{:#}", e)),
    }
}

/// Handle `watch [file]`; defaults to the loaded song's file
pub fn cmd_watch(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if !args.is_empty() {
        return CommandResult::Watch(PathBuf::from(args));
    }
    match &ctx.source {
        Some(path) => CommandResult::Watch(path.clone()),
        None => CommandResult::Error("Usage: watch <file>".to_string()),
    }
}

/// Current key, or `?` when the stored key is not recognized
pub fn current_key_label(view: &SheetView) -> String {
    match view.current_key() {
        Ok(key) => key.to_string(),
        Err(_) => "?".to_string(),
    }
}

/// `Key: G → A (+2)`
pub fn key_line(view: &SheetView) -> String {
    format!(
        "Key: {} → {} ({})",
        view.song().original_key,
        current_key_label(view).bright_green().bold(),
        view.offset_label()
    )
}

/// Header and sheet for the song detail view
pub fn render_view(view: &SheetView, color: bool) -> String {
    let song = view.song();
    let mut output = String::new();

    output.push_str(&format!("{}\n", song.title.bold()));
    output.push_str(&key_line(view));
    output.push('\n');
    match &song.tempo {
        Some(label) => output.push_str(&format!("Tempo: {} ({})", label, view.bpm())),
        None => output.push_str(&format!("Tempo: {}", view.bpm())),
    }
    output.push_str(&format!("  Category: {}\n", song.category));
    if let Some(url) = &song.reference_url {
        output.push_str(&format!("Reference: {}\n", url.underline()));
    }
    output.push('\n');

    let sheet = view.sheet();
    if sheet.is_empty() {
        output.push_str(&"No content.".dimmed().to_string());
    } else {
        output.push_str(&paint(&sheet, color));
    }
    output
}

fn paint(sheet: &str, color: bool) -> String {
    if color {
        colorize_sheet(sheet)
    } else {
        sheet.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use chordsheet_core::Song;

    fn ctx_with(key: &str, lyrics: &str) -> CommandContext {
        colored::control::set_override(false);
        let mut ctx = CommandContext::new(Settings::default());
        ctx.open_song(
            SheetView::new(Song::new("Majesty", key).with_lyrics(lyrics)),
            None,
        );
        ctx
    }

    fn message(result: CommandResult) -> String {
        match result {
            CommandResult::Message(msg) => msg,
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[test]
    fn test_up_and_down() {
        let mut ctx = ctx_with("G", "G  C");
        assert_eq!(message(cmd_up("", &mut ctx)), "Key: G → G# (+1)");
        assert_eq!(message(cmd_up("2", &mut ctx)), "Key: G → A# (+3)");
        assert_eq!(message(cmd_down("4", &mut ctx)), "Key: G → F# (-1)");
        assert_eq!(message(cmd_reset("", &mut ctx)), "Key: G → G (0)");
        assert!(matches!(cmd_up("x", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_offset_accepts_sign() {
        let mut ctx = ctx_with("C", "C");
        assert_eq!(message(cmd_offset("+2", &mut ctx)), "Key: C → D (+2)");
        assert_eq!(message(cmd_offset("-13", &mut ctx)), "Key: C → B (-13)");
        assert_eq!(message(cmd_offset("", &mut ctx)), "Offset: -13");
    }

    #[test]
    fn test_unknown_key_placeholder() {
        let mut ctx = ctx_with("Do", "C");
        assert_eq!(message(cmd_key("", &mut ctx)), "Key: Do → ? (0)");
    }

    #[test]
    fn test_show_renders_transposed_sheet() {
        let mut ctx = ctx_with("C", "G        Em7\nThe splendor of the King");
        ctx.settings.display.color = false;
        cmd_up("2", &mut ctx);
        let shown = message(cmd_show("", &mut ctx));
        assert!(shown.starts_with("Majesty\nKey: C → D (+2)\n"));
        assert!(shown.ends_with("A        F#m7\nThe splendor of the King"));
    }

    #[test]
    fn test_show_empty_sheet() {
        let mut ctx = ctx_with("C", "");
        let shown = message(cmd_show("", &mut ctx));
        assert!(shown.ends_with("No content."));
    }

    #[test]
    fn test_respell_at_zero() {
        let mut ctx = ctx_with("Bb", "Bb  Eb/G");
        ctx.settings.display.color = false;
        assert_eq!(message(cmd_respell("", &mut ctx)), "A#  D#/G");
    }

    #[test]
    fn test_watch_defaults_to_source() {
        let mut ctx = ctx_with("C", "C");
        assert!(matches!(cmd_watch("", &mut ctx), CommandResult::Error(_)));
        ctx.source = Some(PathBuf::from("song.txt"));
        match cmd_watch("", &mut ctx) {
            CommandResult::Watch(path) => assert_eq!(path, PathBuf::from("song.txt")),
            other => panic!("expected watch, got {:?}", other),
        }
    }
}
