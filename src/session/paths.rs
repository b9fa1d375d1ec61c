use std::path::{Path, PathBuf};

/// Typed paths inside a session directory.
#[derive(Debug, Clone)]
pub struct SessionPaths {
    root: PathBuf,
}

impl SessionPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `session.json` path.
    pub fn session_path(&self) -> PathBuf {
        self.root.join("session.json")
    }

    /// Return the `history.jsonl` path.
    pub fn history_path(&self) -> PathBuf {
        self.root.join("history.jsonl")
    }

    pub fn exists(&self) -> bool {
        self.session_path().is_file()
    }
}
