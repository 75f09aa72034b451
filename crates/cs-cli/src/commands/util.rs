//! Shared utilities for CLI commands.

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Reads a whole transcript from a file, or from stdin when `input` is `-`.
pub fn read_transcript(input: &Path) -> Result<Vec<String>> {
    let mut bytes = Vec::new();
    if input == Path::new("-") {
        io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("failed to read transcript from stdin")?;
    } else {
        bytes = std::fs::read(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
    }
    Ok(split_lines(&bytes))
}

/// Splits raw export bytes into lines.
///
/// Invalid UTF-8 is replaced rather than rejected, a leading byte order mark
/// is dropped and `\r\n` endings are accepted.
pub fn split_lines(bytes: &[u8]) -> Vec<String> {
    let decoded = String::from_utf8_lossy(bytes);
    let text = decoded.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&*decoded);
    text.lines().map(str::to_string).collect()
}

/// Derives a transcript name from an input path.
pub fn default_transcript_name(input: &Path) -> Option<String> {
    if input == Path::new("-") {
        return None;
    }
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
}
