//! Single-snapshot provenance for selected contexts.
//!
//! Every context in a submission must come from one repository at one commit.
//! Merges are pure: a conflict hands back the supplied identity and leaves the
//! caller's provenance untouched.
use crate::model::DocumentProvenance;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title used for the conflict notice.
pub const CONFLICT_TITLE: &str = "Invalid Selection";

/// A merge supplied a commit different from the one already pinned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceConflict {
    pub pinned_commit: String,
    pub supplied_commit: String,
    pub document_name: String,
}

impl fmt::Display for ProvenanceConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "All documents must be from the same commit SHA: {} is at {}, submission is pinned to {}",
            self.document_name, self.supplied_commit, self.pinned_commit
        )
    }
}

impl std::error::Error for ProvenanceConflict {}

/// Response from the document upload service.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub repo_url: String,
    #[serde(alias = "commitSha")]
    pub commit_id: String,
    pub document_names: Vec<String>,
    /// Review link for the upload, when the service opened one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pr_url: String,
}

/// Fold one document into the provenance.
///
/// Repository and commit are filled only while empty; names are appended in
/// order without duplicates.
pub fn merge(
    provenance: &DocumentProvenance,
    repository_url: &str,
    commit: &str,
    document_name: &str,
) -> Result<DocumentProvenance, ProvenanceConflict> {
    if !provenance.commit.is_empty() && provenance.commit != commit {
        return Err(ProvenanceConflict {
            pinned_commit: provenance.commit.clone(),
            supplied_commit: commit.to_string(),
            document_name: document_name.to_string(),
        });
    }
    let mut merged = provenance.clone();
    if merged.repository_url.is_empty() {
        merged.repository_url = repository_url.to_string();
    }
    if merged.commit.is_empty() {
        merged.commit = commit.to_string();
    }
    if !document_name.is_empty() && !merged.document_names.iter().any(|n| n == document_name) {
        merged.document_names.push(document_name.to_string());
    }
    Ok(merged)
}

/// Fold every document from an upload response, all-or-nothing.
pub fn merge_upload(
    provenance: &DocumentProvenance,
    upload: &UploadResult,
) -> Result<DocumentProvenance, ProvenanceConflict> {
    let mut merged = provenance.clone();
    if upload.document_names.is_empty() {
        merged = merge(&merged, &upload.repo_url, &upload.commit_id, "")?;
    }
    for name in &upload.document_names {
        merged = merge(&merged, &upload.repo_url, &upload.commit_id, name)?;
    }
    Ok(merged)
}

/// Explicit reset; the only way to unpin a commit.
pub fn reset() -> DocumentProvenance {
    DocumentProvenance::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO: &str = "https://example.com/org/docs";

    fn pinned(commit: &str) -> DocumentProvenance {
        DocumentProvenance {
            repository_url: REPO.to_string(),
            commit: commit.to_string(),
            document_names: vec!["doc1.md".to_string()],
        }
    }

    #[test]
    fn mismatched_commit_is_a_conflict_without_mutation() {
        let before = pinned("commitA");
        let err = merge(&before, REPO, "commitB", "doc2.md").expect_err("conflict");
        assert_eq!(err.pinned_commit, "commitA");
        assert_eq!(err.supplied_commit, "commitB");
        assert_eq!(before, pinned("commitA"));
        assert!(err.to_string().contains("same commit SHA"));
    }

    #[test]
    fn merges_accumulate_names_on_one_commit() {
        let empty = DocumentProvenance::default();
        let first = merge(&empty, REPO, "commitA", "doc1").expect("first merge");
        let second = merge(&first, REPO, "commitA", "doc2").expect("second merge");
        assert_eq!(second.commit, "commitA");
        assert_eq!(second.repository_url, REPO);
        assert_eq!(second.document_names, vec!["doc1", "doc2"]);
    }

    #[test]
    fn repeated_document_is_not_duplicated() {
        let first = merge(&DocumentProvenance::default(), REPO, "c1", "doc1").expect("merge");
        let again = merge(&first, REPO, "c1", "doc1").expect("merge again");
        assert_eq!(again.document_names, vec!["doc1"]);
    }

    #[test]
    fn upload_conflict_leaves_provenance_intact() {
        let before = pinned("commitA");
        let upload = UploadResult {
            repo_url: REPO.to_string(),
            commit_id: "commitB".to_string(),
            document_names: vec!["new.md".to_string()],
            pr_url: String::new(),
        };
        assert!(merge_upload(&before, &upload).is_err());
        assert_eq!(before.document_names, vec!["doc1.md"]);
    }

    #[test]
    fn upload_response_parses_service_payload() {
        let upload: UploadResult = serde_json::from_value(serde_json::json!({
            "repoUrl": REPO,
            "commitSha": "abc",
            "documentNames": ["a.md", "b.md"]
        }))
        .expect("parse upload");
        let merged = merge_upload(&DocumentProvenance::default(), &upload).expect("merge");
        assert_eq!(merged.joined_names(), "a.md, b.md");
        assert_eq!(merged.commit, "abc");
    }

    #[test]
    fn reset_unpins_commit() {
        assert!(reset().is_empty());
    }
}
