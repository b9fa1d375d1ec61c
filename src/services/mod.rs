//! Boundary services the wizard consumes.
//!
//! Each service is a trait so the workflow can run against the HTTP backend
//! or an in-memory fake. Transport failures come back as `anyhow` errors and
//! are turned into notices by the caller; nothing here retries.
mod http;

pub use http::HttpBackend;

use crate::adapter::ContributionDocument;
use crate::model::UserIdentity;
use crate::provenance::UploadResult;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether auto-fill and other demo affordances are enabled.
pub trait EnvConfigSource {
    fn dev_mode_enabled(&self) -> Result<bool>;
}

/// Identity lookup against a hosted repository provider.
pub trait IdentityProvider {
    fn user_info(&self, token: &str) -> Result<UserIdentity>;
}

/// A knowledge file known to the backend.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeFile {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(alias = "commitId")]
    pub commit_sha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_date: Option<String>,
}

/// One file in an upload batch.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadFile {
    pub file_name: String,
    pub file_content: String,
}

pub trait DocumentStore {
    fn fetch_content(&self, filename: &str) -> Result<String>;
    fn list_documents(&self) -> Result<Vec<KnowledgeFile>>;
    fn upload(&self, files: &[UploadFile]) -> Result<UploadResult>;
}

/// Final submission of a contribution, or an update to one under review.
pub trait SubmissionSink {
    fn submit(
        &self,
        document: &ContributionDocument,
        identity: Option<&UserIdentity>,
    ) -> Result<bool>;

    fn update(
        &self,
        document: &ContributionDocument,
        original_branch: &str,
        identity: Option<&UserIdentity>,
    ) -> Result<bool>;
}

/// Fetched document content keyed by filename.
///
/// Listing entries are never written to; content lives only here.
#[derive(Debug, Default, Clone)]
pub struct DocumentCache {
    entries: BTreeMap<String, String>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn get(&self, filename: &str) -> Option<&str> {
        self.entries.get(filename).map(String::as_str)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return cached content, fetching and caching it on a miss.
    ///
    /// A listing entry that already carries content seeds the cache.
    pub fn content_for(
        &mut self,
        store: &dyn DocumentStore,
        file: &KnowledgeFile,
    ) -> Result<String> {
        if let Some(content) = self.entries.get(&file.filename) {
            tracing::debug!(filename = %file.filename, "document cache hit");
            return Ok(content.clone());
        }
        let content = match &file.content {
            Some(content) => content.clone(),
            None => store.fetch_content(&file.filename)?,
        };
        self.entries.insert(file.filename.clone(), content.clone());
        Ok(content)
    }
}

/// Files from one commit, as shown in the file picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitGroup {
    pub commit_sha: String,
    pub commit_date: Option<String>,
    pub files: Vec<KnowledgeFile>,
    /// Only the commit already pinned by the submission may be picked from.
    pub selectable: bool,
}

/// Group files by commit, newest first, marking which group is selectable.
pub fn group_by_commit(files: &[KnowledgeFile], pinned_commit: &str) -> Vec<CommitGroup> {
    let mut groups: Vec<CommitGroup> = Vec::new();
    for file in files {
        match groups.iter_mut().find(|g| g.commit_sha == file.commit_sha) {
            Some(group) => group.files.push(file.clone()),
            None => groups.push(CommitGroup {
                commit_sha: file.commit_sha.clone(),
                commit_date: file.commit_date.clone(),
                files: vec![file.clone()],
                selectable: pinned_commit.is_empty() || pinned_commit == file.commit_sha,
            }),
        }
    }
    // ISO-8601 dates sort lexically; undated groups go last.
    groups.sort_by(|a, b| b.commit_date.cmp(&a.commit_date));
    groups
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use anyhow::anyhow;
    use std::cell::{Cell, RefCell};

    /// In-memory backend recording what the workflow asked for.
    #[derive(Default)]
    pub struct FakeBackend {
        pub documents: BTreeMap<String, (String, String)>,
        pub fetches: Cell<usize>,
        pub submitted: RefCell<Vec<ContributionDocument>>,
        pub fail_submit: bool,
        pub identity: Option<UserIdentity>,
        pub dev_mode: Option<bool>,
    }

    impl FakeBackend {
        pub fn with_document(mut self, filename: &str, commit: &str, content: &str) -> Self {
            self.documents
                .insert(filename.to_string(), (commit.to_string(), content.to_string()));
            self
        }
    }

    impl EnvConfigSource for FakeBackend {
        fn dev_mode_enabled(&self) -> Result<bool> {
            self.dev_mode.ok_or_else(|| anyhow!("env config unavailable"))
        }
    }

    impl IdentityProvider for FakeBackend {
        fn user_info(&self, _token: &str) -> Result<UserIdentity> {
            self.identity
                .clone()
                .ok_or_else(|| anyhow!("401 Unauthorized: Bad credentials"))
        }
    }

    impl DocumentStore for FakeBackend {
        fn fetch_content(&self, filename: &str) -> Result<String> {
            self.fetches.set(self.fetches.get() + 1);
            self.documents
                .get(filename)
                .map(|(_, content)| content.clone())
                .ok_or_else(|| anyhow!("document {filename} not found"))
        }

        fn list_documents(&self) -> Result<Vec<KnowledgeFile>> {
            Ok(self
                .documents
                .iter()
                .map(|(filename, (commit, _))| KnowledgeFile {
                    filename: filename.clone(),
                    content: None,
                    commit_sha: commit.clone(),
                    commit_date: None,
                })
                .collect())
        }

        fn upload(&self, files: &[UploadFile]) -> Result<UploadResult> {
            Ok(UploadResult {
                repo_url: "https://example.com/org/docs".to_string(),
                commit_id: "upload-commit".to_string(),
                document_names: files.iter().map(|f| f.file_name.clone()).collect(),
                pr_url: "https://example.com/org/docs/pull/7".to_string(),
            })
        }
    }

    impl SubmissionSink for FakeBackend {
        fn submit(
            &self,
            document: &ContributionDocument,
            _identity: Option<&UserIdentity>,
        ) -> Result<bool> {
            if self.fail_submit {
                return Err(anyhow!("backend unavailable"));
            }
            self.submitted.borrow_mut().push(document.clone());
            Ok(true)
        }

        fn update(
            &self,
            document: &ContributionDocument,
            _original_branch: &str,
            identity: Option<&UserIdentity>,
        ) -> Result<bool> {
            self.submit(document, identity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::FakeBackend;
    use super::*;

    fn file(name: &str, commit: &str, date: Option<&str>) -> KnowledgeFile {
        KnowledgeFile {
            filename: name.to_string(),
            content: None,
            commit_sha: commit.to_string(),
            commit_date: date.map(str::to_string),
        }
    }

    #[test]
    fn cache_fetches_each_file_once() {
        let backend = FakeBackend::default().with_document("a.md", "c1", "alpha");
        let listing = backend.list_documents().expect("list");
        let mut cache = DocumentCache::new();
        assert_eq!(cache.content_for(&backend, &listing[0]).expect("fetch"), "alpha");
        assert_eq!(cache.content_for(&backend, &listing[0]).expect("cached"), "alpha");
        assert_eq!(backend.fetches.get(), 1);
        assert!(listing[0].content.is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn listing_content_seeds_cache_without_fetch() {
        let backend = FakeBackend::default();
        let mut entry = file("b.md", "c1", None);
        entry.content = Some("inline".to_string());
        let mut cache = DocumentCache::new();
        assert_eq!(cache.content_for(&backend, &entry).expect("content"), "inline");
        assert_eq!(backend.fetches.get(), 0);
        assert_eq!(cache.get("b.md"), Some("inline"));
    }

    #[test]
    fn fetch_error_leaves_cache_empty() {
        let backend = FakeBackend::default();
        let mut cache = DocumentCache::new();
        assert!(cache.content_for(&backend, &file("missing.md", "c1", None)).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn groups_sort_newest_first_and_pin_commit() {
        let files = vec![
            file("old.md", "c1", Some("2024-01-01T00:00:00Z")),
            file("new.md", "c2", Some("2024-06-01T00:00:00Z")),
            file("old2.md", "c1", Some("2024-01-01T00:00:00Z")),
        ];
        let groups = group_by_commit(&files, "c1");
        assert_eq!(groups[0].commit_sha, "c2");
        assert!(!groups[0].selectable);
        assert_eq!(groups[1].files.len(), 2);
        assert!(groups[1].selectable);
        assert!(group_by_commit(&files, "").iter().all(|g| g.selectable));
    }
}
