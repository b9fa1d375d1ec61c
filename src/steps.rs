//! Step layout and status derivation.
//!
//! The step tree is fixed per submission kind and mode. Status is computed from
//! the submission every time it is asked for; nothing here holds state.
use crate::model::{
    KnowledgeFields, SkillFields, SubmissionData, SubmissionKind, WizardMode, MAX_SUMMARY_CHARS,
    MIN_OUTLINE_CHARS,
};
use crate::seed::{
    qa_pair_errors, seed_context_error, seed_example_counts, skill_seed_example_errors,
};
use anyhow::{anyhow, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Stable step identifiers, shared by every layout.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    Details,
    ResourceDocumentation,
    UploadedDocuments,
    Attributions,
    SeedData,
    SeedContext,
    QuestionAnswerPairs,
    Review,
}

const ALL_STEPS: [StepId; 8] = [
    StepId::Details,
    StepId::ResourceDocumentation,
    StepId::UploadedDocuments,
    StepId::Attributions,
    StepId::SeedData,
    StepId::SeedContext,
    StepId::QuestionAnswerPairs,
    StepId::Review,
];

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Details => "details",
            StepId::ResourceDocumentation => "resource-documentation",
            StepId::UploadedDocuments => "uploaded-documents",
            StepId::Attributions => "attributions",
            StepId::SeedData => "seed-data",
            StepId::SeedContext => "seed-context",
            StepId::QuestionAnswerPairs => "question-answer-pairs",
            StepId::Review => "review",
        }
    }

    /// Label shown in the step navigation.
    pub fn display_name(&self) -> &'static str {
        match self {
            StepId::Details => "Details",
            StepId::ResourceDocumentation => "Resource documentation",
            StepId::UploadedDocuments => "Upload documents",
            StepId::Attributions => "Attribution",
            StepId::SeedData => "Seed data",
            StepId::SeedContext => "Select context",
            StepId::QuestionAnswerPairs => "Question and answer pairs",
            StepId::Review => "Review",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepId {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        ALL_STEPS
            .iter()
            .copied()
            .find(|step| step.as_str() == value)
            .ok_or_else(|| anyhow!("unknown step id {value:?}"))
    }
}

/// Tri-state status of a step.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Default,
    Error,
    Success,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Default => "default",
            StepStatus::Error => "error",
            StepStatus::Success => "success",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A top-level entry in the step list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepNode {
    Leaf(StepId),
    Expandable { id: StepId, children: Vec<StepId> },
}

impl StepNode {
    pub fn id(&self) -> StepId {
        match self {
            StepNode::Leaf(id) => *id,
            StepNode::Expandable { id, .. } => *id,
        }
    }

    pub fn children(&self) -> &[StepId] {
        match self {
            StepNode::Leaf(_) => &[],
            StepNode::Expandable { children, .. } => children,
        }
    }
}

/// Build the step list for a kind and mode.
pub fn build_steps(kind: SubmissionKind, mode: WizardMode) -> Vec<StepNode> {
    let mut steps = vec![StepNode::Leaf(StepId::Details)];
    match (kind, mode) {
        (SubmissionKind::Knowledge, WizardMode::Github) => {
            steps.push(StepNode::Expandable {
                id: StepId::ResourceDocumentation,
                children: vec![StepId::UploadedDocuments, StepId::Attributions],
            });
        }
        (SubmissionKind::Knowledge, WizardMode::Native) => {
            steps.push(StepNode::Leaf(StepId::UploadedDocuments));
        }
        (SubmissionKind::Skill, WizardMode::Github) => {
            steps.push(StepNode::Leaf(StepId::Attributions));
        }
        (SubmissionKind::Skill, WizardMode::Native) => {}
    }
    match kind {
        SubmissionKind::Knowledge => steps.push(StepNode::Expandable {
            id: StepId::SeedData,
            children: vec![StepId::SeedContext, StepId::QuestionAnswerPairs],
        }),
        SubmissionKind::Skill => steps.push(StepNode::Leaf(StepId::SeedData)),
    }
    steps.push(StepNode::Leaf(StepId::Review));
    steps
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email regex"))
}

/// Local part, `@`, and a domain containing a dot.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email.trim())
}

fn details_issues(data: &SubmissionData) -> Vec<String> {
    let mut issues = Vec::new();
    let email = data.contributor.email.trim();
    if email.is_empty() {
        issues.push("email: Required field".to_string());
    } else if !is_valid_email(email) {
        issues.push("email: Please enter a valid email address.".to_string());
    }
    if data.contributor.name.trim().is_empty() {
        issues.push("name: Required field".to_string());
    }
    let summary = data.submission_summary.trim();
    if summary.is_empty() {
        issues.push("submission summary: Required field".to_string());
    } else if summary.chars().count() > MAX_SUMMARY_CHARS {
        issues.push(format!(
            "submission summary: must be at most {MAX_SUMMARY_CHARS} characters"
        ));
    }
    if data.file_path.trim().is_empty() {
        issues.push("file path: Required field".to_string());
    }
    if data.kind() == SubmissionKind::Skill
        && data.document_outline().trim().chars().count() < MIN_OUTLINE_CHARS
    {
        issues.push(format!(
            "task description: must be at least {MIN_OUTLINE_CHARS} characters"
        ));
    }
    issues
}

fn document_issues(fields: &KnowledgeFields, mode: WizardMode) -> Vec<String> {
    let provenance = &fields.provenance;
    let mut issues = Vec::new();
    if provenance.repository_url.trim().is_empty() {
        issues.push("repository URL: Required field".to_string());
    }
    if provenance.commit.trim().is_empty() {
        issues.push("commit: Required field".to_string());
    }
    if mode.requires_uploaded_documents() && provenance.document_names.is_empty() {
        issues.push("documents: upload at least one document".to_string());
    }
    issues
}

fn attribution_issues(data: &SubmissionData) -> Vec<String> {
    let attribution = &data.attribution;
    let required = [
        ("title of work", &attribution.title_work),
        ("license of work", &attribution.license_work),
        ("creators", &attribution.creators),
    ];
    required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| format!("{label}: Required field"))
        .collect()
}

fn context_issues(fields: &KnowledgeFields) -> Vec<String> {
    fields
        .seed_examples
        .iter()
        .enumerate()
        .filter_map(|(index, example)| {
            seed_context_error(example)
                .map(|message| format!("seed example {}: {message}", index + 1))
        })
        .collect()
}

fn qa_issues(fields: &KnowledgeFields) -> Vec<String> {
    let mut issues = Vec::new();
    for (index, example) in fields.seed_examples.iter().enumerate() {
        if !seed_example_counts(example) {
            continue;
        }
        for (pair_index, pair) in example.question_and_answers.iter().enumerate() {
            for message in qa_pair_errors(pair) {
                issues.push(format!(
                    "seed example {}, pair {}: {message}",
                    index + 1,
                    pair_index + 1
                ));
            }
        }
    }
    issues
}

fn skill_seed_issues(fields: &SkillFields) -> Vec<String> {
    fields
        .seed_examples
        .iter()
        .enumerate()
        .flat_map(|(index, example)| {
            skill_seed_example_errors(example)
                .into_iter()
                .map(move |message| format!("seed example {}: {message}", index + 1))
        })
        .collect()
}

/// Human-readable reasons a step fails; empty when it passes.
///
/// Steps that do not apply to the submission kind report no issues.
pub fn step_issues(step: StepId, data: &SubmissionData, mode: WizardMode) -> Vec<String> {
    match step {
        StepId::Details => details_issues(data),
        StepId::ResourceDocumentation => {
            let mut issues = step_issues(StepId::UploadedDocuments, data, mode);
            issues.extend(step_issues(StepId::Attributions, data, mode));
            issues
        }
        StepId::UploadedDocuments => data
            .knowledge()
            .map(|fields| document_issues(fields, mode))
            .unwrap_or_default(),
        StepId::Attributions => attribution_issues(data),
        StepId::SeedData => match data.skill() {
            Some(fields) => skill_seed_issues(fields),
            None => {
                let mut issues = step_issues(StepId::SeedContext, data, mode);
                issues.extend(step_issues(StepId::QuestionAnswerPairs, data, mode));
                issues
            }
        },
        StepId::SeedContext => data.knowledge().map(context_issues).unwrap_or_default(),
        StepId::QuestionAnswerPairs => data.knowledge().map(qa_issues).unwrap_or_default(),
        StepId::Review => Vec::new(),
    }
}

/// Compute the status of one step from current data.
pub fn compute_status(step: StepId, data: &SubmissionData, mode: WizardMode) -> StepStatus {
    if step == StepId::Review {
        return StepStatus::Default;
    }
    if step_issues(step, data, mode).is_empty() {
        StepStatus::Success
    } else {
        StepStatus::Error
    }
}

/// Status of a parent from its children's statuses.
pub fn aggregate(children: &[StepStatus]) -> StepStatus {
    if children.iter().any(|status| *status == StepStatus::Error) {
        StepStatus::Error
    } else if !children.is_empty() && children.iter().all(|status| *status == StepStatus::Success)
    {
        StepStatus::Success
    } else {
        StepStatus::Default
    }
}

#[cfg(test)]
#[path = "steps_tests.rs"]
mod tests;
