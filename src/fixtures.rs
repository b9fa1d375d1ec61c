//! Shared submission fixtures for unit tests.
use crate::model::{DocumentProvenance, SubmissionData, SubmissionKind};

pub(crate) const REPO_URL: &str = "https://example.com/org/docs";
pub(crate) const COMMIT: &str = "abc123";

/// A knowledge submission that passes every step in either mode.
pub(crate) fn complete_knowledge() -> SubmissionData {
    let mut data = SubmissionData::fresh(SubmissionKind::Knowledge);
    data.contributor.email = "dev@example.com".to_string();
    data.contributor.name = "Dana Dev".to_string();
    data.submission_summary = "Add release notes".to_string();
    data.file_path = "science/physics".to_string();
    data.attribution.title_work = "Release notes".to_string();
    data.attribution.license_work = "CC-BY-4.0".to_string();
    data.attribution.creators = "Docs team".to_string();
    if let Some(fields) = data.knowledge_mut() {
        fields.domain = "physics".to_string();
        fields.document_outline = "Notes on the latest release".to_string();
        fields.provenance = DocumentProvenance {
            repository_url: REPO_URL.to_string(),
            commit: COMMIT.to_string(),
            document_names: vec!["notes.md".to_string()],
        };
        for example in &mut fields.seed_examples {
            example.context = "The release adds a new solver.".to_string();
            for pair in &mut example.question_and_answers {
                pair.question = "What does the release add?".to_string();
                pair.answer = "A new solver.".to_string();
            }
        }
    }
    data
}
