//! Seed example construction and field-level validation.
//!
//! Change intents store raw values; the `blur_*` helpers are the only place
//! validity flags move, so a half-typed field never flips to an error state.
use crate::model::{
    KnowledgeSeedExample, QuestionAndAnswerPair, SkillSeedExample, Validated, BASELINE_QA_PAIRS,
    MAX_CONTEXT_WORDS, MAX_QA_CHARS,
};
use anyhow::{anyhow, Result};

const CONTEXT_REQUIRED: &str = "Context is required";
const QUESTION_REQUIRED: &str = "Question is required";
const ANSWER_REQUIRED: &str = "Answer is required";

/// Result of checking a question or answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck {
    pub validated: Validated,
    pub message: String,
}

impl FieldCheck {
    fn success() -> Self {
        Self {
            validated: Validated::Success,
            message: String::new(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            validated: Validated::Error,
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.validated.is_error()
    }
}

/// Result of checking a context; the word count is always reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextCheck {
    pub validated: Validated,
    pub message: String,
    pub word_count: usize,
}

impl ContextCheck {
    /// Over-limit contexts warn but remain valid.
    pub fn is_valid(&self) -> bool {
        !self.validated.is_error()
    }
}

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Advisory message shown once a context passes the word limit.
pub fn word_limit_message(word_count: usize) -> String {
    format!(
        "{word_count} / {MAX_CONTEXT_WORDS} words ({} over the recommended limit)",
        word_count.saturating_sub(MAX_CONTEXT_WORDS)
    )
}

/// Truncate input to the question/answer character ceiling.
pub fn clamp_input(text: &str) -> String {
    text.chars().take(MAX_QA_CHARS).collect()
}

pub fn create_empty_qa_pair(immutable: bool) -> QuestionAndAnswerPair {
    QuestionAndAnswerPair {
        immutable,
        ..QuestionAndAnswerPair::default()
    }
}

/// Baseline knowledge seed example: empty context plus the required pairs.
///
/// The context flag starts at `Default` so nothing is shown as broken before
/// the user visits the field; `validate_context` still rejects the empty text.
pub fn create_empty_seed_example() -> KnowledgeSeedExample {
    KnowledgeSeedExample {
        context: String::new(),
        is_context_valid: Validated::Default,
        validation_error: String::new(),
        question_and_answers: (0..BASELINE_QA_PAIRS)
            .map(|_| create_empty_qa_pair(true))
            .collect(),
        immutable: true,
    }
}

pub fn create_empty_skill_seed_example() -> SkillSeedExample {
    SkillSeedExample {
        question_and_answer: create_empty_qa_pair(true),
        immutable: true,
        ..SkillSeedExample::default()
    }
}

pub fn validate_context(text: &str) -> ContextCheck {
    let word_count = count_words(text);
    if text.trim().is_empty() {
        return ContextCheck {
            validated: Validated::Error,
            message: CONTEXT_REQUIRED.to_string(),
            word_count,
        };
    }
    if word_count > MAX_CONTEXT_WORDS {
        return ContextCheck {
            validated: Validated::Warning,
            message: word_limit_message(word_count),
            word_count,
        };
    }
    ContextCheck {
        validated: Validated::Success,
        message: String::new(),
        word_count,
    }
}

/// Skill contexts are optional; only the word limit applies.
pub fn validate_skill_context(text: &str) -> ContextCheck {
    if text.trim().is_empty() {
        return ContextCheck {
            validated: Validated::Success,
            message: String::new(),
            word_count: 0,
        };
    }
    validate_context(text)
}

fn validate_qa_field(text: &str, label: &str, required: &str) -> FieldCheck {
    if text.trim().is_empty() {
        return FieldCheck::error(required);
    }
    if text.chars().count() > MAX_QA_CHARS {
        return FieldCheck::error(format!(
            "{label} must be at most {MAX_QA_CHARS} characters"
        ));
    }
    FieldCheck::success()
}

pub fn validate_question(text: &str) -> FieldCheck {
    validate_qa_field(text, "Question", QUESTION_REQUIRED)
}

pub fn validate_answer(text: &str) -> FieldCheck {
    validate_qa_field(text, "Answer", ANSWER_REQUIRED)
}

pub fn blur_context(example: &mut KnowledgeSeedExample) {
    let check = validate_context(&example.context);
    example.is_context_valid = check.validated;
    example.validation_error = check.message;
}

pub fn blur_skill_context(example: &mut SkillSeedExample) {
    let check = validate_skill_context(&example.context);
    example.is_context_valid = check.validated;
    example.validation_error = check.message;
}

pub fn blur_question(pair: &mut QuestionAndAnswerPair) {
    let check = validate_question(&pair.question);
    pair.is_question_valid = check.validated;
    pair.question_validation_error = check.message;
}

pub fn blur_answer(pair: &mut QuestionAndAnswerPair) {
    let check = validate_answer(&pair.answer);
    pair.is_answer_valid = check.validated;
    pair.answer_validation_error = check.message;
}

/// Whether a pair takes part in validation.
///
/// A user-added pair left completely empty is ignored.
pub fn qa_pair_counts(pair: &QuestionAndAnswerPair) -> bool {
    pair.immutable || !pair.is_blank()
}

fn knowledge_example_is_blank(example: &KnowledgeSeedExample) -> bool {
    example.context.trim().is_empty()
        && example
            .question_and_answers
            .iter()
            .all(QuestionAndAnswerPair::is_blank)
}

pub fn seed_example_counts(example: &KnowledgeSeedExample) -> bool {
    example.immutable || !knowledge_example_is_blank(example)
}

pub fn skill_seed_example_counts(example: &SkillSeedExample) -> bool {
    example.immutable
        || !example.context.trim().is_empty()
        || !example.question_and_answer.is_blank()
}

/// Error messages for a pair; empty when it passes or does not count.
pub fn qa_pair_errors(pair: &QuestionAndAnswerPair) -> Vec<String> {
    if !qa_pair_counts(pair) {
        return Vec::new();
    }
    [validate_question(&pair.question), validate_answer(&pair.answer)]
        .into_iter()
        .filter(|check| !check.is_valid())
        .map(|check| check.message)
        .collect()
}

/// Context error for a knowledge example that counts.
pub fn seed_context_error(example: &KnowledgeSeedExample) -> Option<String> {
    if !seed_example_counts(example) {
        return None;
    }
    let check = validate_context(&example.context);
    (!check.is_valid()).then_some(check.message)
}

pub fn skill_seed_example_errors(example: &SkillSeedExample) -> Vec<String> {
    if !skill_seed_example_counts(example) {
        return Vec::new();
    }
    let context = validate_skill_context(&example.context);
    let mut errors: Vec<String> = (!context.is_valid())
        .then_some(context.message)
        .into_iter()
        .collect();
    let pair = &example.question_and_answer;
    errors.extend(
        [validate_question(&pair.question), validate_answer(&pair.answer)]
            .into_iter()
            .filter(|check| !check.is_valid())
            .map(|check| check.message),
    );
    errors
}

pub fn add_qa_pair(example: &mut KnowledgeSeedExample) {
    example.question_and_answers.push(create_empty_qa_pair(false));
}

/// Remove a user-added pair; baseline pairs are rejected.
pub fn remove_qa_pair(example: &mut KnowledgeSeedExample, index: usize) -> Result<()> {
    let pair = example
        .question_and_answers
        .get(index)
        .ok_or_else(|| anyhow!("question/answer pair {} does not exist", index + 1))?;
    if pair.immutable {
        return Err(anyhow!(
            "question/answer pair {} is required and cannot be removed",
            index + 1
        ));
    }
    example.question_and_answers.remove(index);
    Ok(())
}

/// Append a removable knowledge example with the usual pairs.
pub fn add_seed_example(examples: &mut Vec<KnowledgeSeedExample>) {
    let mut example = create_empty_seed_example();
    example.immutable = false;
    examples.push(example);
}

pub fn add_skill_seed_example(examples: &mut Vec<SkillSeedExample>) {
    let mut example = create_empty_skill_seed_example();
    example.immutable = false;
    example.question_and_answer.immutable = false;
    examples.push(example);
}

/// Seed examples of either kind expose whether they are baseline entries.
pub trait SeedEntry {
    fn is_baseline(&self) -> bool;
}

impl SeedEntry for KnowledgeSeedExample {
    fn is_baseline(&self) -> bool {
        self.immutable
    }
}

impl SeedEntry for SkillSeedExample {
    fn is_baseline(&self) -> bool {
        self.immutable
    }
}

/// Remove a user-added example of either kind.
pub fn remove_seed_example<T: SeedEntry>(examples: &mut Vec<T>, index: usize) -> Result<()> {
    let example = examples
        .get(index)
        .ok_or_else(|| anyhow!("seed example {} does not exist", index + 1))?;
    if example.is_baseline() {
        return Err(anyhow!(
            "seed example {} is required and cannot be removed",
            index + 1
        ));
    }
    examples.remove(index);
    Ok(())
}
