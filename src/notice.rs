//! Dismissible notices surfaced to the contributor.
//!
//! Provenance conflicts, transport failures and unexpected errors all end up
//! here rather than aborting the session.
use crate::provenance::{ProvenanceConflict, CONFLICT_TITLE};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Danger,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Success => "success",
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warning",
            NoticeKind::Danger => "danger",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Notice {
    pub fn new(kind: NoticeKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            link: None,
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, title, message)
    }

    pub fn danger(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Danger, title, message)
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Conflict notice naming both commits.
    pub fn provenance_conflict(conflict: &ProvenanceConflict) -> Self {
        Self::danger(CONFLICT_TITLE, conflict.to_string())
    }

    /// Failure of a network call; carries the underlying message.
    pub fn transport(title: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::danger(title, format!("{err:#}"))
    }

    /// Generic notice for errors that are logged but not explained.
    pub fn unexpected() -> Self {
        Self::danger(
            "Something went wrong",
            "An unexpected error occurred. See the session history for details.",
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.title, self.message)?;
        if let Some(link) = &self.link {
            write!(f, " ({link})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn conflict_notice_names_commits() {
        let notice = Notice::provenance_conflict(&ProvenanceConflict {
            pinned_commit: "aaa".to_string(),
            supplied_commit: "bbb".to_string(),
            document_name: "doc.md".to_string(),
        });
        assert_eq!(notice.kind, NoticeKind::Danger);
        assert_eq!(notice.title, "Invalid Selection");
        assert!(notice.message.contains("aaa"));
        assert!(notice.message.contains("bbb"));
    }

    #[test]
    fn transport_notice_keeps_error_chain() {
        let err = Err::<(), _>(anyhow!("connection refused"))
            .context("fetch document")
            .expect_err("error");
        let notice = Notice::transport("Fetch failed", &err);
        assert_eq!(notice.message, "fetch document: connection refused");
    }

    #[test]
    fn display_includes_link() {
        let notice = Notice::success("Submitted", "Pull request opened").with_link("https://x/pr/1");
        assert_eq!(
            notice.to_string(),
            "[success] Submitted: Pull request opened (https://x/pr/1)"
        );
    }
}
