//! Snapshot storage for `session.json`.
//!
//! Writes land in a temp file next to the target and are renamed into place,
//! so an interrupted write never leaves a truncated session behind.
use super::SessionPaths;
use crate::model::SESSION_SCHEMA_VERSION;
use crate::selection::ViewSelection;
use crate::wizard::WizardSnapshot;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SessionFile {
    pub schema_version: u32,
    pub created_at_epoch_ms: u128,
    pub updated_at_epoch_ms: u128,
    /// Branch of the contribution being edited; unset for new submissions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_branch: Option<String>,
    pub wizard: WizardSnapshot,
    /// Candidate selection of the last document view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewSelection>,
}

pub fn load_session(paths: &SessionPaths) -> Result<SessionFile> {
    let path = paths.session_path();
    let bytes = fs::read(&path).with_context(|| format!("read session {}", path.display()))?;
    let session: SessionFile =
        serde_json::from_slice(&bytes).context("parse session JSON")?;
    if session.schema_version != SESSION_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported session schema_version {}",
            session.schema_version
        ));
    }
    Ok(session)
}

pub fn write_session(paths: &SessionPaths, session: &SessionFile) -> Result<()> {
    let root = paths.root();
    fs::create_dir_all(root).with_context(|| format!("create {}", root.display()))?;
    let text = serde_json::to_string_pretty(session).context("serialize session")?;
    let mut tmp = tempfile::NamedTempFile::new_in(root)
        .with_context(|| format!("create temp file in {}", root.display()))?;
    tmp.write_all(text.as_bytes())
        .context("write session temp file")?;
    let path = paths.session_path();
    tmp.persist(&path)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
