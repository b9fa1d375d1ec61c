//! Typed intents and the single reducer that applies them.
//!
//! Field changes store the raw value; only blur intents move validity flags.
//! Provenance conflicts are reported as notices and leave the data untouched.
use super::Wizard;
use crate::adapter::{merge_uploaded, ContributionDocument};
use crate::autofill::sample_submission;
use crate::model::{
    ContributionBody, KnowledgeFields, QuestionAndAnswerPair, SkillFields, SubmissionData,
};
use crate::notice::Notice;
use crate::provenance::{self, UploadResult};
use crate::seed;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttributionField {
    TitleWork,
    LinkWork,
    Revision,
    LicenseWork,
    Creators,
}

/// Everything a view can ask the wizard to do to the submission.
///
/// Seed example and pair indices are zero-based.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    SetEmail {
        value: String,
    },
    SetName {
        value: String,
    },
    SetSummary {
        value: String,
    },
    SetFilePath {
        value: String,
    },
    SetDomain {
        value: String,
    },
    SetDocumentOutline {
        value: String,
    },
    SetAttribution {
        field: AttributionField,
        value: String,
    },
    ContextChanged {
        example: usize,
        value: String,
    },
    ContextBlurred {
        example: usize,
    },
    QuestionChanged {
        example: usize,
        #[serde(default)]
        pair: usize,
        value: String,
    },
    QuestionBlurred {
        example: usize,
        #[serde(default)]
        pair: usize,
    },
    AnswerChanged {
        example: usize,
        #[serde(default)]
        pair: usize,
        value: String,
    },
    AnswerBlurred {
        example: usize,
        #[serde(default)]
        pair: usize,
    },
    AddQaPair {
        example: usize,
    },
    RemoveQaPair {
        example: usize,
        pair: usize,
    },
    AddSeedExample,
    RemoveSeedExample {
        example: usize,
    },
    /// Take a selected excerpt as the context of one example.
    UseSelectedContext {
        example: usize,
        context: String,
        repository_url: String,
        commit: String,
        document_name: String,
    },
    AddDocument {
        repository_url: String,
        commit: String,
        document_name: String,
    },
    DocumentsUploaded {
        upload: UploadResult,
    },
    ResetProvenance,
    UploadYaml {
        document: ContributionDocument,
    },
    AutoFill,
}

impl Intent {
    /// Stable name used in history entries and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SetEmail { .. } => "set_email",
            Intent::SetName { .. } => "set_name",
            Intent::SetSummary { .. } => "set_summary",
            Intent::SetFilePath { .. } => "set_file_path",
            Intent::SetDomain { .. } => "set_domain",
            Intent::SetDocumentOutline { .. } => "set_document_outline",
            Intent::SetAttribution { .. } => "set_attribution",
            Intent::ContextChanged { .. } => "context_changed",
            Intent::ContextBlurred { .. } => "context_blurred",
            Intent::QuestionChanged { .. } => "question_changed",
            Intent::QuestionBlurred { .. } => "question_blurred",
            Intent::AnswerChanged { .. } => "answer_changed",
            Intent::AnswerBlurred { .. } => "answer_blurred",
            Intent::AddQaPair { .. } => "add_qa_pair",
            Intent::RemoveQaPair { .. } => "remove_qa_pair",
            Intent::AddSeedExample => "add_seed_example",
            Intent::RemoveSeedExample { .. } => "remove_seed_example",
            Intent::UseSelectedContext { .. } => "use_selected_context",
            Intent::AddDocument { .. } => "add_document",
            Intent::DocumentsUploaded { .. } => "documents_uploaded",
            Intent::ResetProvenance => "reset_provenance",
            Intent::UploadYaml { .. } => "upload_yaml",
            Intent::AutoFill => "auto_fill",
        }
    }
}

/// Outcome of one intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Applied {
    pub changed: bool,
    pub notices: Vec<Notice>,
}

impl Applied {
    fn changed() -> Self {
        Self {
            changed: true,
            notices: Vec::new(),
        }
    }

    fn unchanged(notice: Notice) -> Self {
        Self {
            changed: false,
            notices: vec![notice],
        }
    }
}

fn knowledge_mut(data: &mut SubmissionData) -> Result<&mut KnowledgeFields> {
    let kind = data.kind();
    data.knowledge_mut()
        .ok_or_else(|| anyhow!("not available for {kind} submissions"))
}

fn skill_example_pair(
    fields: &mut SkillFields,
    example: usize,
    pair: usize,
) -> Result<&mut QuestionAndAnswerPair> {
    if pair != 0 {
        return Err(anyhow!("skill seed examples have a single pair"));
    }
    fields
        .seed_examples
        .get_mut(example)
        .map(|entry| &mut entry.question_and_answer)
        .ok_or_else(|| missing_example(example))
}

fn knowledge_example_pair(
    fields: &mut KnowledgeFields,
    example: usize,
    pair: usize,
) -> Result<&mut QuestionAndAnswerPair> {
    fields
        .seed_examples
        .get_mut(example)
        .ok_or_else(|| missing_example(example))?
        .question_and_answers
        .get_mut(pair)
        .ok_or_else(|| {
            anyhow!(
                "seed example {} has no question/answer pair {}",
                example + 1,
                pair + 1
            )
        })
}

fn pair_mut(
    data: &mut SubmissionData,
    example: usize,
    pair: usize,
) -> Result<&mut QuestionAndAnswerPair> {
    match &mut data.body {
        ContributionBody::Skill(fields) => skill_example_pair(fields, example, pair),
        ContributionBody::Knowledge(fields) => knowledge_example_pair(fields, example, pair),
    }
}

fn missing_example(example: usize) -> anyhow::Error {
    anyhow!("seed example {} does not exist", example + 1)
}

impl Wizard {
    /// Apply one intent to the submission.
    ///
    /// Errors are returned only for malformed intents (bad indices, wrong
    /// kind); policy rejections come back as notices.
    pub fn apply(&mut self, intent: Intent) -> Result<Applied> {
        let name = intent.name();
        let applied = self.reduce(intent)?;
        tracing::debug!(
            intent = name,
            changed = applied.changed,
            notices = applied.notices.len(),
            "applied intent"
        );
        Ok(applied)
    }

    fn reduce(&mut self, intent: Intent) -> Result<Applied> {
        let data = &mut self.data;
        match intent {
            Intent::SetEmail { value } => data.contributor.email = value,
            Intent::SetName { value } => data.contributor.name = value,
            Intent::SetSummary { value } => data.submission_summary = value,
            Intent::SetFilePath { value } => data.file_path = value,
            Intent::SetDomain { value } => knowledge_mut(data)?.domain = value,
            Intent::SetDocumentOutline { value } => *data.document_outline_mut() = value,
            Intent::SetAttribution { field, value } => {
                let attribution = &mut data.attribution;
                let slot = match field {
                    AttributionField::TitleWork => &mut attribution.title_work,
                    AttributionField::LinkWork => &mut attribution.link_work,
                    AttributionField::Revision => &mut attribution.revision,
                    AttributionField::LicenseWork => &mut attribution.license_work,
                    AttributionField::Creators => &mut attribution.creators,
                };
                *slot = value;
            }
            Intent::ContextChanged { example, value } => match &mut data.body {
                ContributionBody::Skill(fields) => {
                    fields
                        .seed_examples
                        .get_mut(example)
                        .ok_or_else(|| missing_example(example))?
                        .context = value;
                }
                ContributionBody::Knowledge(fields) => {
                    fields
                        .seed_examples
                        .get_mut(example)
                        .ok_or_else(|| missing_example(example))?
                        .context = value;
                }
            },
            Intent::ContextBlurred { example } => match &mut data.body {
                ContributionBody::Skill(fields) => seed::blur_skill_context(
                    fields
                        .seed_examples
                        .get_mut(example)
                        .ok_or_else(|| missing_example(example))?,
                ),
                ContributionBody::Knowledge(fields) => seed::blur_context(
                    fields
                        .seed_examples
                        .get_mut(example)
                        .ok_or_else(|| missing_example(example))?,
                ),
            },
            Intent::QuestionChanged {
                example,
                pair,
                value,
            } => pair_mut(data, example, pair)?.question = seed::clamp_input(&value),
            Intent::QuestionBlurred { example, pair } => {
                seed::blur_question(pair_mut(data, example, pair)?)
            }
            Intent::AnswerChanged {
                example,
                pair,
                value,
            } => pair_mut(data, example, pair)?.answer = seed::clamp_input(&value),
            Intent::AnswerBlurred { example, pair } => {
                seed::blur_answer(pair_mut(data, example, pair)?)
            }
            Intent::AddQaPair { example } => {
                let fields = knowledge_mut(data)?;
                let entry = fields
                    .seed_examples
                    .get_mut(example)
                    .ok_or_else(|| missing_example(example))?;
                seed::add_qa_pair(entry);
            }
            Intent::RemoveQaPair { example, pair } => {
                let fields = knowledge_mut(data)?;
                let entry = fields
                    .seed_examples
                    .get_mut(example)
                    .ok_or_else(|| missing_example(example))?;
                seed::remove_qa_pair(entry, pair)?;
            }
            Intent::AddSeedExample => match &mut data.body {
                ContributionBody::Skill(fields) => {
                    seed::add_skill_seed_example(&mut fields.seed_examples)
                }
                ContributionBody::Knowledge(fields) => {
                    seed::add_seed_example(&mut fields.seed_examples)
                }
            },
            Intent::RemoveSeedExample { example } => match &mut data.body {
                ContributionBody::Skill(fields) => {
                    seed::remove_seed_example(&mut fields.seed_examples, example)?
                }
                ContributionBody::Knowledge(fields) => {
                    seed::remove_seed_example(&mut fields.seed_examples, example)?
                }
            },
            Intent::UseSelectedContext {
                example,
                context,
                repository_url,
                commit,
                document_name,
            } => {
                let fields = knowledge_mut(data)?;
                if example >= fields.seed_examples.len() {
                    return Err(missing_example(example));
                }
                if seed::count_words(&context) == 0 {
                    return Ok(Applied::unchanged(Notice::warning(
                        "Empty selection",
                        format!("Select some text in {document_name} to use it as context."),
                    )));
                }
                match provenance::merge(&fields.provenance, &repository_url, &commit, &document_name)
                {
                    Ok(merged) => {
                        fields.provenance = merged;
                        let entry = &mut fields.seed_examples[example];
                        entry.context = context;
                        seed::blur_context(entry);
                    }
                    Err(conflict) => {
                        tracing::warn!(%conflict, "rejected context selection");
                        return Ok(Applied::unchanged(Notice::provenance_conflict(&conflict)));
                    }
                }
            }
            Intent::AddDocument {
                repository_url,
                commit,
                document_name,
            } => {
                let fields = knowledge_mut(data)?;
                match provenance::merge(&fields.provenance, &repository_url, &commit, &document_name)
                {
                    Ok(merged) => fields.provenance = merged,
                    Err(conflict) => {
                        tracing::warn!(%conflict, "rejected document");
                        return Ok(Applied::unchanged(Notice::provenance_conflict(&conflict)));
                    }
                }
            }
            Intent::DocumentsUploaded { upload } => {
                let fields = knowledge_mut(data)?;
                match provenance::merge_upload(&fields.provenance, &upload) {
                    Ok(merged) => {
                        fields.provenance = merged;
                        let mut notice = Notice::success(
                            "Documents uploaded",
                            format!(
                                "{} at {}: {}",
                                upload.repo_url,
                                upload.commit_id,
                                upload.document_names.join(", ")
                            ),
                        );
                        if !upload.pr_url.is_empty() {
                            notice = notice.with_link(upload.pr_url);
                        }
                        return Ok(Applied {
                            changed: true,
                            notices: vec![notice],
                        });
                    }
                    Err(conflict) => {
                        tracing::warn!(%conflict, "rejected upload result");
                        return Ok(Applied::unchanged(Notice::provenance_conflict(&conflict)));
                    }
                }
            }
            Intent::ResetProvenance => knowledge_mut(data)?.provenance = provenance::reset(),
            Intent::UploadYaml { document } => {
                *data = merge_uploaded(data, &document)?;
                return Ok(Applied {
                    changed: true,
                    notices: vec![Notice::success(
                        "YAML uploaded",
                        "Imported seed examples and details from the uploaded file.",
                    )],
                });
            }
            Intent::AutoFill => {
                if !self.dev_mode {
                    return Ok(Applied::unchanged(Notice::warning(
                        "Auto-fill unavailable",
                        "Auto-fill is only enabled in dev mode.",
                    )));
                }
                self.data = sample_submission(self.data.kind());
            }
        }
        Ok(Applied::changed())
    }
}
