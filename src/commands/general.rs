//! General session commands (help, quit)

use crate::commands::{CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Print help information
fn print_help() {
    println!("{}", "🎵 Chordsheet Help".bold());
    println!("{}", "==================".bold());
    println!();
    println!("{}", "Songs:".green());
    println!("  {}    - Open a song (.json record or text sheet)", "load <file>".cyan());
    println!("  {}           - Show the sheet in the current key", "show".cyan());
    println!("  {}        - Show the sheet with flats spelled as sharps", "respell".cyan());
    println!("  {}    - Write the transposed sheet to a file", "save <file>".cyan());
    println!("  {}  - Reload the song whenever the file changes", "watch [file]".cyan());
    println!();
    println!("{}", "Transposing:".green());
    println!("  {} / {}   - Up one semitone (or n)", "up [n]".cyan(), "+".cyan());
    println!("  {} / {} - Down one semitone (or n)", "down [n]".cyan(), "-".cyan());
    println!("  {}          - Back to the original key", "reset".cyan());
    println!("  {}     - Show or set the semitone offset", "offset [n]".cyan());
    println!("  {}            - Original and current key", "key".cyan());
    println!();
    println!("{}", "Tempo:".green());
    println!("  {}  - Show, set or nudge the tempo", "tempo [bpm|+n|-n]".cyan());
    println!(
        "  {} - Metronome on/off",
        "click [start|stop|toggle]".cyan()
    );
    println!("  {}   - Mute or unmute the click", "sound [on|off]".cyan());
    println!("  {}  - Show or hide the beat flash", "visual [on|off]".cyan());
    println!("  {}            - Tap twice to set the tempo", "tap".cyan());
    println!("  {} - Detect the tempo from the microphone", "listen [secs]".cyan());
    println!();
    println!("{}", "Examples:".green());
    println!("  chordsheet> {}", "load how-great.txt".cyan());
    println!("  chordsheet> {}", "up 2".cyan());
    println!("  Key: C → D (+2)");
    println!();
    println!(
        "Type '{}' or '{}' to leave the session.",
        "quit".bright_red(),
        "exit".bright_red()
    );
}
