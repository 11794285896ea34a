//! chordsheet - transpose chord sheets and keep time from the command line

use anyhow::{Context, Result};
use chordsheet::audio::metronome::spawn_flash_printer;
use chordsheet::audio::Metronome;
use chordsheet::commands::sheet::render_view;
use chordsheet::config::Settings;
use chordsheet::song_file::{load_song, save_sheet};
use chordsheet_core::{display_key, respell_sheet, transpose_sheet, SheetView};
use clap::{Parser, Subcommand};
use colored::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for chordsheet
#[derive(Parser, Debug)]
#[command(name = "chordsheet")]
#[command(about = "Transpose chord sheets and keep time")]
#[command(version)]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true, env = "CHORDSHEET_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a sheet file transposed (`-` reads stdin)
    Transpose {
        file: PathBuf,
        /// Semitones to shift
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
        /// Spell every chord with sharps
        #[arg(long)]
        respell: bool,
    },
    /// Print a key moved by an offset
    Key {
        key: String,
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },
    /// Show a song in a new key
    Show {
        song: PathBuf,
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },
    /// Write a song's transposed sheet to a file
    Export {
        song: PathBuf,
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
        /// Destination file
        #[arg(long)]
        out: PathBuf,
    },
    /// Run the click track until Enter is pressed
    Metronome {
        /// Beats per minute (20-300)
        #[arg(long)]
        bpm: Option<u32>,
    },
    /// Interactive session (default)
    Session { song: Option<PathBuf> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load_or_default(cli.config.as_deref())?;
    if cli.no_color {
        settings.display.color = false;
    }
    if !settings.display.color {
        colored::control::set_override(false);
    }

    // Initialize tracing
    let default_filter = settings.log_filter();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Some(Command::Transpose {
            file,
            offset,
            respell,
        }) => {
            let text = read_sheet(&file)?;
            let mut output = transpose_sheet(&text, offset);
            if respell {
                output = respell_sheet(&output);
            }
            print!("{}", output);
            Ok(())
        }
        Some(Command::Key { key, offset }) => {
            let current = display_key(&key, offset)?;
            println!("{}", current);
            Ok(())
        }
        Some(Command::Show { song, offset }) => {
            let mut view = SheetView::new(load_song(&song)?);
            view.set_offset(offset);
            println!("{}", render_view(&view, settings.display.color));
            Ok(())
        }
        Some(Command::Export { song, offset, out }) => {
            let mut view = SheetView::new(load_song(&song)?);
            view.set_offset(offset);
            save_sheet(&out, &view.sheet())?;
            println!(
                "{} Exported '{}' in {} to {}",
                "✓".bright_green(),
                view.song().title,
                view.current_key()
                    .map(|k| k.to_string())
                    .unwrap_or_else(|_| "?".to_string()),
                out.display()
            );
            Ok(())
        }
        Some(Command::Metronome { bpm }) => run_metronome(&settings, bpm),
        Some(Command::Session { song }) => chordsheet::repl::start(settings, song.as_deref()),
        None => chordsheet::repl::start(settings, None),
    }
}

fn read_sheet(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read sheet from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn run_metronome(settings: &Settings, bpm: Option<u32>) -> Result<()> {
    let bpm = bpm
        .map(chordsheet_core::Bpm::new)
        .unwrap_or_else(|| settings.metronome.bpm());
    let metronome = Metronome::spawn(&settings.metronome, bpm)
        .context("Failed to open the audio output device")?;

    let printer = settings
        .metronome
        .visual
        .then(|| spawn_flash_printer(metronome.subscribe()));

    metronome.start();
    info!(%bpm, "metronome running");
    println!("🔊 {} - press Enter to stop", bpm.to_string().bright_green().bold());

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    metronome.stop();
    if let Some(printer) = printer {
        let _ = printer.join();
    }
    println!();
    Ok(())
}
