//! Runs the `chordsheet` binary against sheets written to temporary files.

use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

fn chordsheet() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_chordsheet"));
    command
        .env_remove("CHORDSHEET_CONFIG")
        .env("RUST_LOG", "off")
        .arg("--no-color");
    command
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn key_prints_moved_key() {
    let output = chordsheet().args(["key", "Bb", "--offset", "2"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "C\n");

    let output = chordsheet().args(["key", "Am", "-o", "-2"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Gm\n");
}

#[test]
fn key_with_unknown_key_exits_non_zero() {
    let output = chordsheet().args(["key", "Do", "-o", "1"]).output().unwrap();
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Do"));
}

#[test]
fn transpose_reads_stdin_for_dash() {
    let mut child = chordsheet()
        .args(["transpose", "-", "--offset", "2"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"G        Em7\nThe splendor of the King")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "A        F#m7\nThe splendor of the King");
}

#[test]
fn transpose_file_with_respell() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("majesty.txt");
    fs::write(&path, "Bb   Eb/G\nMajesty").unwrap();

    // Offset 0 alone keeps the flats
    let output = chordsheet().arg("transpose").arg(&path).output().unwrap();
    assert_eq!(stdout(&output), "Bb   Eb/G\nMajesty");

    let output = chordsheet()
        .arg("transpose")
        .arg(&path)
        .arg("--respell")
        .output()
        .unwrap();
    assert_eq!(stdout(&output), "A#   D#/G\nMajesty");

    let output = chordsheet()
        .arg("transpose")
        .arg(&path)
        .args(["-o", "-1", "--respell"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "A   D/F#\nMajesty");
}

#[test]
fn transpose_missing_file_fails() {
    let dir = tempdir().unwrap();
    let output = chordsheet()
        .arg("transpose")
        .arg(dir.path().join("nowhere.txt"))
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn export_writes_transposed_sheet() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("how-great.txt");
    let out = dir.path().join("how-great-in-d.txt");
    fs::write(&song, "Key: C\n\nC        F\nO Lord my God").unwrap();

    let output = chordsheet()
        .arg("export")
        .arg(&song)
        .args(["--offset", "2", "--out"])
        .arg(&out)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("in D"));
    assert_eq!(fs::read_to_string(&out).unwrap(), "D        G\nO Lord my God");
}

#[test]
fn show_prints_header_and_sheet() {
    let dir = tempdir().unwrap();
    let song = dir.path().join("majesty.json");
    fs::write(
        &song,
        r#"{"title": "Majesty", "originalKey": "G", "tempo": "72 BPM", "lyrics": "G   C\nMajesty"}"#,
    )
    .unwrap();

    let output = chordsheet()
        .arg("show")
        .arg(&song)
        .args(["-o", "2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Majesty\n"));
    assert!(text.contains("Key: G → A (+2)"));
    assert!(text.contains("A   D\nMajesty"));
}
