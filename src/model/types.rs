//! Typed submission records.
//!
//! Field names mirror what the session file stores, so these types double as
//! the on-disk schema for an in-progress contribution.
use crate::seed::{create_empty_seed_example, create_empty_skill_seed_example};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::BASELINE_SEED_EXAMPLES;

/// Which kind of contribution is being assembled.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Knowledge,
    Skill,
}

impl SubmissionKind {
    /// Return the stable string identifier used in session files.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Knowledge => "knowledge",
            SubmissionKind::Skill => "skill",
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "knowledge" => Ok(SubmissionKind::Knowledge),
            "skill" => Ok(SubmissionKind::Skill),
            other => Err(anyhow!("unknown submission kind {other:?} (expected knowledge or skill)")),
        }
    }
}

/// Deployment mode, which decides the step layout and identity source.
///
/// `Native` keeps documents in the local backend and requires uploads;
/// `Github` references documents by repository URL and collects attribution.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WizardMode {
    Native,
    Github,
}

impl WizardMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardMode::Native => "native",
            WizardMode::Github => "github",
        }
    }

    /// Native mode requires documents to be uploaded before seed data.
    pub fn requires_uploaded_documents(&self) -> bool {
        matches!(self, WizardMode::Native)
    }
}

impl fmt::Display for WizardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "native" => Ok(WizardMode::Native),
            "github" => Ok(WizardMode::Github),
            other => Err(anyhow!("unknown mode {other:?} (expected native or github)")),
        }
    }
}

/// Field-level validity shown next to an input.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Validated {
    #[default]
    Default,
    Success,
    Warning,
    Error,
}

impl Validated {
    pub fn as_str(&self) -> &'static str {
        match self {
            Validated::Default => "default",
            Validated::Success => "success",
            Validated::Warning => "warning",
            Validated::Error => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Validated::Error)
    }
}

impl fmt::Display for Validated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contributor identity typed by the user or derived from the session.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct Contributor {
    pub email: String,
    pub name: String,
    /// Hosting-provider login, recorded as the document author.
    #[serde(default)]
    pub login: String,
}

/// A single question/answer pair inside a seed example.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct QuestionAndAnswerPair {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub is_question_valid: Validated,
    #[serde(default)]
    pub question_validation_error: String,
    #[serde(default)]
    pub is_answer_valid: Validated,
    #[serde(default)]
    pub answer_validation_error: String,
    /// Baseline pairs are required and cannot be removed.
    #[serde(default)]
    pub immutable: bool,
}

impl QuestionAndAnswerPair {
    /// True when the user has not typed anything into either field.
    pub fn is_blank(&self) -> bool {
        self.question.trim().is_empty() && self.answer.trim().is_empty()
    }
}

/// Knowledge evidence: a verbatim excerpt plus pairs derived from it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct KnowledgeSeedExample {
    pub context: String,
    #[serde(default)]
    pub is_context_valid: Validated,
    #[serde(default)]
    pub validation_error: String,
    pub question_and_answers: Vec<QuestionAndAnswerPair>,
    #[serde(default)]
    pub immutable: bool,
}

/// Skill evidence: optional grounding context and a single pair.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct SkillSeedExample {
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub is_context_valid: Validated,
    #[serde(default)]
    pub validation_error: String,
    pub question_and_answer: QuestionAndAnswerPair,
    #[serde(default)]
    pub immutable: bool,
}

/// Where selected contexts came from: one repository at one commit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct DocumentProvenance {
    pub repository_url: String,
    pub commit: String,
    /// Ordered, de-duplicated document names.
    #[serde(default)]
    pub document_names: Vec<String>,
}

impl DocumentProvenance {
    pub fn is_empty(&self) -> bool {
        self.repository_url.is_empty() && self.commit.is_empty() && self.document_names.is_empty()
    }

    /// Comma-joined names, as shown in the document step.
    pub fn joined_names(&self) -> String {
        self.document_names.join(", ")
    }
}

/// Attribution of the source work, collected in hosted mode.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct Attribution {
    pub title_work: String,
    pub link_work: String,
    pub revision: String,
    pub license_work: String,
    pub creators: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct KnowledgeFields {
    pub domain: String,
    pub document_outline: String,
    pub provenance: DocumentProvenance,
    pub seed_examples: Vec<KnowledgeSeedExample>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SkillFields {
    pub document_outline: String,
    pub seed_examples: Vec<SkillSeedExample>,
}

/// Kind-specific part of a submission.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContributionBody {
    Knowledge(KnowledgeFields),
    Skill(SkillFields),
}

/// Everything the wizard collects for one contribution.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SubmissionData {
    pub contributor: Contributor,
    pub submission_summary: String,
    pub file_path: String,
    #[serde(default)]
    pub attribution: Attribution,
    pub body: ContributionBody,
}

impl SubmissionData {
    /// Fresh default submission with the baseline seed examples in place.
    pub fn fresh(kind: SubmissionKind) -> Self {
        let body = match kind {
            SubmissionKind::Knowledge => ContributionBody::Knowledge(KnowledgeFields {
                domain: String::new(),
                document_outline: String::new(),
                provenance: DocumentProvenance::default(),
                seed_examples: (0..BASELINE_SEED_EXAMPLES)
                    .map(|_| create_empty_seed_example())
                    .collect(),
            }),
            SubmissionKind::Skill => ContributionBody::Skill(SkillFields {
                document_outline: String::new(),
                seed_examples: (0..BASELINE_SEED_EXAMPLES)
                    .map(|_| create_empty_skill_seed_example())
                    .collect(),
            }),
        };
        Self {
            contributor: Contributor::default(),
            submission_summary: String::new(),
            file_path: String::new(),
            attribution: Attribution::default(),
            body,
        }
    }

    pub fn kind(&self) -> SubmissionKind {
        match self.body {
            ContributionBody::Knowledge(_) => SubmissionKind::Knowledge,
            ContributionBody::Skill(_) => SubmissionKind::Skill,
        }
    }

    pub fn knowledge(&self) -> Option<&KnowledgeFields> {
        match &self.body {
            ContributionBody::Knowledge(fields) => Some(fields),
            ContributionBody::Skill(_) => None,
        }
    }

    pub fn knowledge_mut(&mut self) -> Option<&mut KnowledgeFields> {
        match &mut self.body {
            ContributionBody::Knowledge(fields) => Some(fields),
            ContributionBody::Skill(_) => None,
        }
    }

    pub fn skill(&self) -> Option<&SkillFields> {
        match &self.body {
            ContributionBody::Skill(fields) => Some(fields),
            ContributionBody::Knowledge(_) => None,
        }
    }

    pub fn skill_mut(&mut self) -> Option<&mut SkillFields> {
        match &mut self.body {
            ContributionBody::Skill(fields) => Some(fields),
            ContributionBody::Knowledge(_) => None,
        }
    }

    /// Outline text for either kind.
    pub fn document_outline(&self) -> &str {
        match &self.body {
            ContributionBody::Knowledge(fields) => &fields.document_outline,
            ContributionBody::Skill(fields) => &fields.document_outline,
        }
    }

    pub fn document_outline_mut(&mut self) -> &mut String {
        match &mut self.body {
            ContributionBody::Knowledge(fields) => &mut fields.document_outline,
            ContributionBody::Skill(fields) => &mut fields.document_outline,
        }
    }
}

/// Identity obtained from the hosting provider's session.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct UserIdentity {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}
