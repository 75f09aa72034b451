//! End-to-end integration tests for the complete transcript flow.
//!
//! Tests the full pipeline through the binary: parse → import → sessions → status.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const CHAT: &str = "\
\u{feff}Messages and calls are end-to-end encrypted.
1/2/20, 09:00 - Alice: hi
1/2/20, 09:00 - Alice: there
1/2/20, 09:30 - Bob: morning 😀
with a second line
1/2/20, 10:30 - Alice: <Media omitted>
1/2/20, 13:31 - Bob: see https://example.com
1/2/20, 13:31 - Bob: see https://example.com
1/2/20, 18:00 - Alice: 🎉🎉
";

fn cs_binary() -> String {
    env!("CARGO_BIN_EXE_cs").to_string()
}

/// Builds a command isolated from the user's config and data directories.
fn cs(temp: &Path) -> Command {
    let mut cmd = Command::new(cs_binary());
    cmd.env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join(".config"))
        .env("XDG_DATA_HOME", temp.join(".local/share"))
        .env("CS_DATABASE_PATH", temp.join("cs.db"))
        .env_remove("CS_SESSION_GAP_SHORT_MINUTES")
        .env_remove("CS_SESSION_GAP_LONG_MINUTES")
        .env_remove("RUST_LOG");
    cmd
}

fn write_chat(temp: &Path) -> PathBuf {
    let path = temp.join("family.txt");
    std::fs::write(&path, CHAT).unwrap();
    path
}

fn assert_success(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{what} should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn parse_jsonl(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid JSON line"))
        .collect()
}

#[test]
fn test_parse_jsonl_reconstructs_and_sessionizes() {
    let temp = TempDir::new().unwrap();
    let chat = write_chat(temp.path());

    let output = cs(temp.path())
        .args(["parse", "--format", "jsonl"])
        .arg(&chat)
        .output()
        .unwrap();
    assert_success(&output, "cs parse");

    let events = parse_jsonl(&output.stdout);
    // Encryption notice dropped, same-minute bursts and continuations merged.
    assert_eq!(events.len(), 5);

    let texts: Vec<&str> = events.iter().map(|e| e["text"].as_str().unwrap()).collect();
    assert_eq!(
        texts,
        vec![
            "hi there",
            "morning 😀 with a second line",
            "<Media omitted>",
            "see https://example.com see https://example.com",
            "🎉🎉",
        ]
    );

    let gaps: Vec<Option<i64>> = events.iter().map(|e| e["gap_minutes"].as_i64()).collect();
    assert_eq!(gaps, vec![None, Some(30), Some(60), Some(181), Some(269)]);

    let short: Vec<i64> = events
        .iter()
        .map(|e| e["session_id_short"].as_i64().unwrap())
        .collect();
    let long: Vec<i64> = events
        .iter()
        .map(|e| e["session_id_long"].as_i64().unwrap())
        .collect();
    assert_eq!(short, vec![1, 1, 1, 2, 3]);
    assert_eq!(long, vec![1, 1, 1, 2, 3]);

    assert_eq!(events[2]["has_media"], true);
    assert_eq!(events[3]["has_link"], true);
    assert_eq!(events[4]["emoji_glyphs"], serde_json::json!(["🎉", "🎉"]));
}

#[test]
fn test_parse_reads_stdin() {
    let temp = TempDir::new().unwrap();

    let mut child = cs(temp.path())
        .args(["parse", "-", "--format", "jsonl"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(CHAT.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert_success(&output, "cs parse -");

    assert_eq!(parse_jsonl(&output.stdout).len(), 5);
}

#[test]
fn test_parse_csv_to_file_with_gap_overrides() {
    let temp = TempDir::new().unwrap();
    let chat = write_chat(temp.path());
    let out = temp.path().join("events.csv");

    let output = cs(temp.path())
        .arg("parse")
        .arg(&chat)
        .arg("--output")
        .arg(&out)
        .args(["--short-gap", "29", "--long-gap", "600"])
        .output()
        .unwrap();
    assert_success(&output, "cs parse --output");
    assert!(output.stdout.is_empty(), "table should go to the file");

    let csv = std::fs::read_to_string(&out).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 6);
    assert!(rows[0].ends_with("gap_minutes,session_id_short,session_id_long"));
    assert!(rows[1].ends_with(",,1,1"), "first row: {}", rows[1]);
    assert!(rows[5].ends_with(",269,5,1"), "last row: {}", rows[5]);
}

#[test]
fn test_parse_summary_goes_to_stderr() {
    let temp = TempDir::new().unwrap();
    let chat = write_chat(temp.path());

    let output = cs(temp.path())
        .arg("parse")
        .arg(&chat)
        .arg("--summary")
        .output()
        .unwrap();
    assert_success(&output, "cs parse --summary");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("5 events from 9 lines"), "stderr: {stderr}");
    assert!(stderr.contains("short sessions (gap > 60 min): 3"));
    assert!(stderr.contains("long sessions (gap > 180 min): 3"));
}

#[test]
fn test_parse_missing_input_fails() {
    let temp = TempDir::new().unwrap();

    let output = cs(temp.path())
        .arg("parse")
        .arg(temp.path().join("missing.txt"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "stderr: {stderr}");
}

#[test]
fn test_import_then_query_sessions() {
    let temp = TempDir::new().unwrap();
    let chat = write_chat(temp.path());

    let output = cs(temp.path()).arg("import").arg(&chat).output().unwrap();
    assert_success(&output, "cs import");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Imported 5 events into 'family' (3 short sessions, 3 long sessions)"),
        "stdout: {stdout}"
    );

    let output = cs(temp.path())
        .args(["sessions", "family", "--json"])
        .output()
        .unwrap();
    assert_success(&output, "cs sessions");
    let sessions: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 3);
    assert_eq!(sessions[0]["message_count"], 3);
    assert_eq!(sessions[0]["author_count"], 2);
    assert_eq!(sessions[0]["media_count"], 1);
    assert_eq!(sessions[1]["link_count"], 1);

    let output = cs(temp.path()).arg("status").output().unwrap();
    assert_success(&output, "cs status");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("- family: 5 events"), "stdout: {stdout}");
}

#[test]
fn test_reimport_replaces_transcript() {
    let temp = TempDir::new().unwrap();
    let chat = write_chat(temp.path());

    for _ in 0..2 {
        let output = cs(temp.path()).arg("import").arg(&chat).output().unwrap();
        assert_success(&output, "cs import");
    }

    let output = cs(temp.path()).arg("status").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("- family:").count(), 1);
    assert!(stdout.contains("- family: 5 events"));
}

#[test]
fn test_sessions_unknown_transcript_fails() {
    let temp = TempDir::new().unwrap();

    let output = cs(temp.path())
        .args(["sessions", "nobody"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown transcript: nobody"), "stderr: {stderr}");
}

#[test]
fn test_config_file_sets_thresholds() {
    let temp = TempDir::new().unwrap();
    let chat = write_chat(temp.path());
    let config = temp.path().join("cs.toml");
    std::fs::write(
        &config,
        "session_gap_short_minutes = 1000\nsession_gap_long_minutes = 1000\n",
    )
    .unwrap();

    let output = cs(temp.path())
        .arg("--config")
        .arg(&config)
        .args(["parse", "--format", "jsonl"])
        .arg(&chat)
        .output()
        .unwrap();
    assert_success(&output, "cs parse with config");

    let events = parse_jsonl(&output.stdout);
    assert!(events.iter().all(|e| e["session_id_short"] == 1));
    assert!(events.iter().all(|e| e["session_id_long"] == 1));
}
