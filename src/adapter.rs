//! Import/export between the in-memory submission and the YAML document.
//!
//! The document carries content only. Validity flags and baseline markers are
//! wizard state; on import they are backfilled so an edited submission opens
//! without flashing errors. Baseline entries always come first, so the marker
//! is recovered from position. Blank user-added entries are not exported.
//!
//! `document` and `attribution` blocks whose fields are all empty carry no
//! content and are treated as absent in both directions.
use crate::model::{
    Attribution, Contributor, ContributionBody, DocumentProvenance, KnowledgeFields,
    KnowledgeSeedExample, QuestionAndAnswerPair, SkillFields, SkillSeedExample, SubmissionData,
    SubmissionKind, Validated, BASELINE_QA_PAIRS, BASELINE_SEED_EXAMPLES,
};
use crate::seed::{qa_pair_counts, seed_example_counts, skill_seed_example_counts};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Layout version written by `export_document`.
pub const DOCUMENT_VERSION: u32 = 3;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct QaDocument {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SeedExampleDocument {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
    pub questions_and_answers: Vec<QaDocument>,
}

/// Source documents backing a knowledge contribution.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DocumentSource {
    pub repo: String,
    pub commit: String,
    #[serde(default)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AttributionDocument {
    pub title_of_work: String,
    #[serde(default)]
    pub link_to_work: String,
    #[serde(default)]
    pub revision: String,
    pub license_of_the_work: String,
    pub creator_names: String,
}

impl AttributionDocument {
    pub fn is_empty(&self) -> bool {
        [
            &self.title_of_work,
            &self.link_to_work,
            &self.revision,
            &self.license_of_the_work,
            &self.creator_names,
        ]
        .iter()
        .all(|value| value.is_empty())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ContributorDocument {
    pub name: String,
    pub email: String,
}

/// External structured document for one contribution.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ContributionDocument {
    pub version: u32,
    pub kind: SubmissionKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_by: String,
    pub contributor: ContributorDocument,
    pub submission_summary: String,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,
    pub document_outline: String,
    pub seed_examples: Vec<SeedExampleDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<AttributionDocument>,
}

fn imported_pair(qa: &QaDocument, immutable: bool) -> QuestionAndAnswerPair {
    QuestionAndAnswerPair {
        question: qa.question.clone(),
        answer: qa.answer.clone(),
        is_question_valid: Validated::Success,
        question_validation_error: String::new(),
        is_answer_valid: Validated::Success,
        answer_validation_error: String::new(),
        immutable,
    }
}

fn exported_pair(pair: &QuestionAndAnswerPair) -> QaDocument {
    QaDocument {
        question: pair.question.clone(),
        answer: pair.answer.clone(),
    }
}

fn import_knowledge(doc: &ContributionDocument) -> KnowledgeFields {
    let provenance = doc
        .document
        .as_ref()
        .map(|source| DocumentProvenance {
            repository_url: source.repo.clone(),
            commit: source.commit.clone(),
            document_names: source.patterns.clone(),
        })
        .unwrap_or_default();
    KnowledgeFields {
        domain: doc.domain.clone(),
        document_outline: doc.document_outline.clone(),
        provenance,
        seed_examples: doc
            .seed_examples
            .iter()
            .enumerate()
            .map(|(index, example)| KnowledgeSeedExample {
                context: example.context.clone(),
                is_context_valid: Validated::Success,
                validation_error: String::new(),
                question_and_answers: example
                    .questions_and_answers
                    .iter()
                    .enumerate()
                    .map(|(pair_index, qa)| imported_pair(qa, pair_index < BASELINE_QA_PAIRS))
                    .collect(),
                immutable: index < BASELINE_SEED_EXAMPLES,
            })
            .collect(),
    }
}

fn import_skill(doc: &ContributionDocument) -> Result<SkillFields> {
    let mut seed_examples = Vec::with_capacity(doc.seed_examples.len());
    for (index, example) in doc.seed_examples.iter().enumerate() {
        let immutable = index < BASELINE_SEED_EXAMPLES;
        let pair = match example.questions_and_answers.as_slice() {
            [qa] => imported_pair(qa, immutable),
            other => {
                return Err(anyhow!(
                    "skill seed example {} must have exactly one question/answer pair (found {})",
                    index + 1,
                    other.len()
                ))
            }
        };
        seed_examples.push(SkillSeedExample {
            context: example.context.clone(),
            is_context_valid: Validated::Success,
            validation_error: String::new(),
            question_and_answer: pair,
            immutable,
        });
    }
    Ok(SkillFields {
        document_outline: doc.document_outline.clone(),
        seed_examples,
    })
}

/// Project a document into a submission, backfilling validity to success.
///
/// The first `BASELINE_SEED_EXAMPLES` examples and the first
/// `BASELINE_QA_PAIRS` pairs of each knowledge example become baseline
/// entries; anything past them is removable.
pub fn import_document(doc: &ContributionDocument) -> Result<SubmissionData> {
    if doc.version != DOCUMENT_VERSION {
        return Err(anyhow!(
            "unsupported contribution document version {} (expected {})",
            doc.version,
            DOCUMENT_VERSION
        ));
    }
    let body = match doc.kind {
        SubmissionKind::Knowledge => ContributionBody::Knowledge(import_knowledge(doc)),
        SubmissionKind::Skill => ContributionBody::Skill(import_skill(doc)?),
    };
    let attribution = doc
        .attribution
        .as_ref()
        .filter(|attr| !attr.is_empty())
        .map(|attr| Attribution {
            title_work: attr.title_of_work.clone(),
            link_work: attr.link_to_work.clone(),
            revision: attr.revision.clone(),
            license_work: attr.license_of_the_work.clone(),
            creators: attr.creator_names.clone(),
        })
        .unwrap_or_default();
    Ok(SubmissionData {
        contributor: Contributor {
            email: doc.contributor.email.clone(),
            name: doc.contributor.name.clone(),
            login: doc.created_by.clone(),
        },
        submission_summary: doc.submission_summary.clone(),
        file_path: doc.file_path.clone(),
        attribution,
        body,
    })
}

/// Project a submission into its document, for review and submit.
///
/// User-added entries left blank are skipped; they never count toward
/// validity and would otherwise come back as baseline entries.
pub fn export_document(data: &SubmissionData) -> ContributionDocument {
    let (domain, seed_examples, document) = match &data.body {
        ContributionBody::Knowledge(fields) => (
            fields.domain.clone(),
            fields
                .seed_examples
                .iter()
                .filter(|example| seed_example_counts(example))
                .map(|example| SeedExampleDocument {
                    context: example.context.clone(),
                    questions_and_answers: example
                        .question_and_answers
                        .iter()
                        .filter(|pair| qa_pair_counts(pair))
                        .map(exported_pair)
                        .collect(),
                })
                .collect(),
            (!fields.provenance.is_empty()).then(|| DocumentSource {
                repo: fields.provenance.repository_url.clone(),
                commit: fields.provenance.commit.clone(),
                patterns: fields.provenance.document_names.clone(),
            }),
        ),
        ContributionBody::Skill(fields) => (
            String::new(),
            fields
                .seed_examples
                .iter()
                .filter(|example| skill_seed_example_counts(example))
                .map(|example| SeedExampleDocument {
                    context: example.context.clone(),
                    questions_and_answers: vec![exported_pair(&example.question_and_answer)],
                })
                .collect(),
            None,
        ),
    };
    let attribution = (data.attribution != Attribution::default()).then(|| AttributionDocument {
        title_of_work: data.attribution.title_work.clone(),
        link_to_work: data.attribution.link_work.clone(),
        revision: data.attribution.revision.clone(),
        license_of_the_work: data.attribution.license_work.clone(),
        creator_names: data.attribution.creators.clone(),
    });
    ContributionDocument {
        version: DOCUMENT_VERSION,
        kind: data.kind(),
        created_by: data.contributor.login.clone(),
        contributor: ContributorDocument {
            name: data.contributor.name.clone(),
            email: data.contributor.email.clone(),
        },
        submission_summary: data.submission_summary.clone(),
        file_path: data.file_path.clone(),
        domain,
        document_outline: data.document_outline().to_string(),
        seed_examples,
        document,
        attribution,
    }
}

fn keep_or_take(current: &str, uploaded: &str) -> String {
    if current.trim().is_empty() {
        uploaded.to_string()
    } else {
        current.to_string()
    }
}

/// Fold an uploaded document into a submission in progress.
///
/// Content from the upload replaces the body; contributor identity and other
/// header fields the user already typed are kept.
pub fn merge_uploaded(
    current: &SubmissionData,
    doc: &ContributionDocument,
) -> Result<SubmissionData> {
    if doc.kind != current.kind() {
        return Err(anyhow!(
            "uploaded document is a {} contribution; this session is {}",
            doc.kind,
            current.kind()
        ));
    }
    let uploaded = import_document(doc)?;
    let uploaded_attribution = doc.attribution.as_ref().is_some_and(|attr| !attr.is_empty());
    let attribution = if uploaded_attribution {
        uploaded.attribution
    } else {
        current.attribution.clone()
    };
    Ok(SubmissionData {
        contributor: Contributor {
            email: keep_or_take(&current.contributor.email, &uploaded.contributor.email),
            name: keep_or_take(&current.contributor.name, &uploaded.contributor.name),
            login: keep_or_take(&current.contributor.login, &uploaded.contributor.login),
        },
        submission_summary: keep_or_take(&current.submission_summary, &uploaded.submission_summary),
        file_path: keep_or_take(&current.file_path, &uploaded.file_path),
        attribution,
        body: uploaded.body,
    })
}

pub fn parse_yaml(text: &str) -> Result<ContributionDocument> {
    serde_yaml::from_str(text).context("parse contribution YAML")
}

pub fn to_yaml(doc: &ContributionDocument) -> Result<String> {
    serde_yaml::to_string(doc).context("serialize contribution YAML")
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
