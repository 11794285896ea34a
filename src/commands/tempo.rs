//! Tempo commands (tempo, click, sound, visual, tap, listen)

use crate::audio::listen::{listen, DEFAULT_LISTEN};
use crate::commands::{CommandContext, CommandResult};
use chordsheet_core::types::tempo::Bpm;
use colored::*;
use std::time::{Duration, Instant};

/// Handle `tempo [bpm|+n|-n]`
pub fn cmd_tempo(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Current tempo: {}", ctx.bpm));
    }

    let bpm = if let Some(delta) = args.strip_prefix('+') {
        delta.parse::<i32>().map(|d| ctx.bpm.step(d))
    } else if args.starts_with('-') {
        args.parse::<i32>().map(|d| ctx.bpm.step(d))
    } else {
        args.parse::<u32>().map(Bpm::new)
    };

    match bpm {
        Ok(bpm) => {
            ctx.set_bpm(bpm);
            CommandResult::Message(
                format!("🎵 Tempo set to {}", bpm)
                    .bright_green()
                    .to_string(),
            )
        }
        Err(_) => CommandResult::Error(format!(
            "Invalid tempo. Use a value between {}-{} BPM",
            Bpm::MIN,
            Bpm::MAX
        )),
    }
}

/// Handle `click [start|stop|toggle]`
pub fn cmd_click(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let running = ctx.metronome.as_ref().is_some_and(|m| m.is_running());
    let start = match args {
        "start" => true,
        "stop" => false,
        "" | "toggle" => !running,
        _ => return CommandResult::Error("Usage: click [start|stop|toggle]".to_string()),
    };

    if !start {
        return if ctx.stop_click() {
            CommandResult::Message("Metronome stopped".to_string())
        } else {
            CommandResult::Message("Metronome is not running".to_string())
        };
    }

    match ctx.start_click() {
        Ok(_) => CommandResult::Message(format!("🔊 Metronome running at {}", ctx.bpm)),
        Err(e) => {
            tracing::warn!("metronome unavailable: {:#}", e);
            CommandResult::Error(format!("Audio unavailable: {:#}", e))
        }
    }
}

/// Handle `sound [on|off]`: mute the click, keeping the beat running
pub fn cmd_sound(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let enabled = match args {
        "" => !ctx.settings.metronome.sound,
        "on" => true,
        "off" => false,
        _ => return CommandResult::Error("Usage: sound [on|off]".to_string()),
    };
    ctx.settings.metronome.sound = enabled;
    if let Some(metronome) = &ctx.metronome {
        metronome.set_sound(enabled);
    }
    CommandResult::Message(format!(
        "Click sound {}",
        if enabled { "on" } else { "off" }
    ))
}

/// Handle `visual [on|off]`: the beat flash printed while the click runs
pub fn cmd_visual(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let enabled = match args {
        "" => !ctx.settings.metronome.visual,
        "on" => true,
        "off" => false,
        _ => return CommandResult::Error("Usage: visual [on|off]".to_string()),
    };
    ctx.set_visual(enabled);
    CommandResult::Message(format!(
        "Beat flash {}",
        if enabled { "on" } else { "off" }
    ))
}

/// Handle `tap`
pub fn cmd_tap(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.taps.tap(Instant::now()) {
        Some(bpm) => {
            ctx.set_bpm(bpm);
            CommandResult::Message(format!("👆 Tapped {}", bpm).bright_green().to_string())
        }
        None => CommandResult::Message("👆 Tap again...".to_string()),
    }
}

/// Handle `listen [seconds]`
pub fn cmd_listen(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let duration = if args.is_empty() {
        DEFAULT_LISTEN
    } else {
        match args.parse::<f32>() {
            Ok(secs) if secs > 0.0 && secs <= 60.0 => Duration::from_secs_f32(secs),
            _ => return CommandResult::Error("Listen time must be 0-60 seconds".to_string()),
        }
    };

    println!(
        "{} Listening for {:.0}s... play or clap along",
        "🎤".bright_yellow(),
        duration.as_secs_f32()
    );
    match listen(duration) {
        Ok(Some(bpm)) => {
            let bpm = Bpm::new(bpm);
            ctx.set_bpm(bpm);
            CommandResult::Message(format!("🎵 Detected {}", bpm).bright_green().to_string())
        }
        Ok(None) => CommandResult::Message("No steady beat detected".to_string()),
        Err(e) => {
            tracing::warn!("tempo listening failed: {:#}", e);
            CommandResult::Error(format!("Audio unavailable: {:#}", e))
        }
    }
}
