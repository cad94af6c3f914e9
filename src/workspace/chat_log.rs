use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// One line of `chat_history.jsonl`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatLogEntry {
    /// Seconds since the Unix epoch, sub-second precision
    pub timestamp: f64,
    pub sender: String,
    pub text: String,
}

impl ChatLogEntry {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().timestamp_micros() as f64 / 1_000_000.0,
            sender: sender.into(),
            text: text.into(),
        }
    }
}

/// Append one entry as a single JSON line. Never truncates.
pub fn append_entry(path: &Path, entry: &ChatLogEntry) -> Result<()> {
    let mut line = serde_json::to_string(entry)?;
    line.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open chat log: {}", path.display()))?;

    file.write_all(line.as_bytes())
        .with_context(|| format!("Failed to append to chat log: {}", path.display()))
}

/// Read every entry in insertion order. A missing log is an empty history;
/// lines that fail to parse are skipped.
pub fn read_entries(path: &Path) -> Result<Vec<ChatLogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read chat log: {}", path.display()))?;

    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect())
}
