//! Append-only command log.
use super::SessionPaths;
use crate::notice::Notice;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;

/// One CLI command applied to a session.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub schema_version: u32,
    pub ts_epoch_ms: u128,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    pub changed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Append a history entry as JSONL.
pub fn append_history(paths: &SessionPaths, entry: &HistoryEntry) -> Result<()> {
    let root = paths.root();
    fs::create_dir_all(root).with_context(|| format!("create {}", root.display()))?;
    let path = paths.history_path();
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    let line = serde_json::to_string(entry).context("serialize history entry")?;
    file.write_all(line.as_bytes())
        .with_context(|| format!("write {}", path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Read every entry; a missing log is an empty history.
pub fn load_history(paths: &SessionPaths) -> Result<Vec<HistoryEntry>> {
    let path = paths.history_path();
    if !path.is_file() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("parse {} line {}", path.display(), index + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HISTORY_SCHEMA_VERSION;

    #[test]
    fn entries_append_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = SessionPaths::new(dir.path().to_path_buf());
        assert!(load_history(&paths).expect("empty").is_empty());
        for command in ["init", "apply"] {
            append_history(
                &paths,
                &HistoryEntry {
                    schema_version: HISTORY_SCHEMA_VERSION,
                    ts_epoch_ms: 7,
                    command: command.to_string(),
                    intent: None,
                    changed: true,
                    notices: vec![Notice::info("Saved", "ok")],
                    error: None,
                },
            )
            .expect("append");
        }
        let entries = load_history(&paths).expect("load");
        let commands: Vec<&str> = entries.iter().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, vec!["init", "apply"]);
        assert_eq!(entries[1].notices[0].title, "Saved");
    }
}
