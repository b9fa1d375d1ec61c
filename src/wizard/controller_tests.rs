use super::*;
use crate::fixtures::{complete_knowledge, COMMIT, REPO_URL};
use crate::model::{Validated, MAX_QA_CHARS};
use crate::notice::NoticeKind;
use crate::provenance::{UploadResult, CONFLICT_TITLE};

fn native_knowledge() -> Wizard {
    Wizard::new(SubmissionKind::Knowledge, WizardMode::Native, None)
}

fn identity() -> UserIdentity {
    UserIdentity {
        login: "octo".to_string(),
        name: "Octo Cat".to_string(),
        email: "octo@example.com".to_string(),
    }
}

#[test]
fn opens_on_second_flattened_entry() {
    let wizard = native_knowledge();
    assert_eq!(wizard.active_index(), INITIAL_ACTIVE_INDEX);
    assert_eq!(wizard.active_step(), StepId::UploadedDocuments);
    let ids: Vec<StepId> = wizard.flattened().iter().map(|entry| entry.id).collect();
    assert_eq!(
        ids,
        vec![
            StepId::Details,
            StepId::UploadedDocuments,
            StepId::SeedData,
            StepId::SeedContext,
            StepId::QuestionAnswerPairs,
            StepId::Review,
        ]
    );
}

#[test]
fn errors_show_only_before_active_step() {
    let mut wizard = native_knowledge();
    assert_eq!(wizard.displayed_status(StepId::Details), StepStatus::Error);
    assert_eq!(wizard.computed_status(StepId::UploadedDocuments), StepStatus::Error);
    assert_eq!(wizard.displayed_status(StepId::UploadedDocuments), StepStatus::Default);
    assert_eq!(wizard.displayed_status(StepId::SeedContext), StepStatus::Default);

    wizard.navigate_to(StepId::Review).expect("review exists");
    assert_eq!(wizard.displayed_status(StepId::SeedContext), StepStatus::Error);
    assert_eq!(wizard.displayed_status(StepId::Review), StepStatus::Default);
}

#[test]
fn displayed_status_follows_data_without_navigation() {
    let mut wizard = Wizard::with_data(complete_knowledge(), WizardMode::Native, None);
    wizard.navigate_to(StepId::Review).expect("review exists");
    assert_eq!(wizard.displayed_status(StepId::Details), StepStatus::Success);
    wizard
        .apply(Intent::SetEmail {
            value: "not-an-email".to_string(),
        })
        .expect("apply");
    assert_eq!(wizard.displayed_status(StepId::Details), StepStatus::Error);
}

#[test]
fn submit_gate_covers_nested_steps() {
    let wizard = Wizard::with_data(complete_knowledge(), WizardMode::Github, None);
    assert!(wizard.submit_enabled());

    let mut data = complete_knowledge();
    if let Some(fields) = data.knowledge_mut() {
        fields.seed_examples[4].question_and_answers[2].answer.clear();
    }
    let wizard = Wizard::with_data(data, WizardMode::Github, None);
    assert_eq!(wizard.computed_status(StepId::QuestionAnswerPairs), StepStatus::Error);
    assert_eq!(wizard.computed_status(StepId::SeedData), StepStatus::Error);
    assert!(!wizard.submit_enabled());
}

#[test]
fn parent_aggregates_children() {
    let mut data = complete_knowledge();
    data.attribution.creators.clear();
    let wizard = Wizard::with_data(data, WizardMode::Github, None);
    assert_eq!(wizard.computed_status(StepId::UploadedDocuments), StepStatus::Success);
    assert_eq!(wizard.computed_status(StepId::Attributions), StepStatus::Error);
    assert_eq!(
        wizard.computed_status(StepId::ResourceDocumentation),
        StepStatus::Error
    );
}

#[test]
fn navigation_rejects_steps_outside_layout() {
    let mut wizard = native_knowledge();
    let err = wizard
        .navigate_to(StepId::Attributions)
        .expect_err("native knowledge has no attribution step");
    assert_eq!(err, NavigationError::NotInLayout(StepId::Attributions));
    assert_eq!(wizard.active_index(), INITIAL_ACTIVE_INDEX);
}

#[test]
fn next_and_back_stop_at_the_ends() {
    let mut wizard = native_knowledge();
    assert_eq!(wizard.back(), StepId::Details);
    assert_eq!(wizard.back(), StepId::Details);
    for _ in 0..10 {
        wizard.next();
    }
    assert_eq!(wizard.active_step(), StepId::Review);
    assert_eq!(wizard.active_index(), wizard.flattened().len() - 1);
}

#[test]
fn cancel_discards_data_and_keeps_identity() {
    let mut wizard = Wizard::new(SubmissionKind::Knowledge, WizardMode::Github, Some(identity()));
    wizard
        .apply(Intent::SetSummary {
            value: "Draft".to_string(),
        })
        .expect("apply");
    wizard.navigate_to(StepId::Review).expect("review exists");
    let ticket = wizard.requests_mut().begin(RequestKind::Submission);

    wizard.cancel();

    assert_eq!(wizard.active_index(), INITIAL_ACTIVE_INDEX);
    assert!(wizard.data().submission_summary.is_empty());
    assert_eq!(wizard.data().contributor.email, "octo@example.com");
    assert!(!wizard.requests_mut().finish(&ticket));
}

#[test]
fn field_changes_do_not_move_validity_until_blur() {
    let mut wizard = native_knowledge();
    wizard
        .apply(Intent::ContextChanged {
            example: 0,
            value: "Some excerpt".to_string(),
        })
        .expect("apply");
    let example = &wizard.data().knowledge().expect("knowledge").seed_examples[0];
    assert_eq!(example.is_context_valid, Validated::Default);

    wizard.apply(Intent::ContextBlurred { example: 0 }).expect("apply");
    let example = &wizard.data().knowledge().expect("knowledge").seed_examples[0];
    assert_eq!(example.is_context_valid, Validated::Success);

    wizard
        .apply(Intent::QuestionBlurred {
            example: 0,
            pair: 1,
        })
        .expect("apply");
    let pair = &wizard.data().knowledge().expect("knowledge").seed_examples[0]
        .question_and_answers[1];
    assert_eq!(pair.is_question_valid, Validated::Error);
    assert_eq!(pair.question_validation_error, "Question is required");
}

#[test]
fn long_answers_are_clamped() {
    let mut wizard = native_knowledge();
    wizard
        .apply(Intent::AnswerChanged {
            example: 1,
            pair: 0,
            value: "a".repeat(MAX_QA_CHARS + 40),
        })
        .expect("apply");
    let pair = &wizard.data().knowledge().expect("knowledge").seed_examples[1]
        .question_and_answers[0];
    assert_eq!(pair.answer.chars().count(), MAX_QA_CHARS);
}

#[test]
fn conflicting_selection_leaves_submission_unchanged() {
    let mut wizard = Wizard::with_data(complete_knowledge(), WizardMode::Native, None);
    let before = wizard.data().clone();
    let applied = wizard
        .apply(Intent::UseSelectedContext {
            example: 0,
            context: "Other text".to_string(),
            repository_url: REPO_URL.to_string(),
            commit: "def456".to_string(),
            document_name: "other.md".to_string(),
        })
        .expect("apply");
    assert!(!applied.changed);
    assert_eq!(applied.notices.len(), 1);
    assert_eq!(applied.notices[0].title, CONFLICT_TITLE);
    assert_eq!(applied.notices[0].kind, NoticeKind::Danger);
    assert!(applied.notices[0].message.contains(COMMIT));
    assert!(applied.notices[0].message.contains("def456"));
    assert_eq!(wizard.data(), &before);
}

#[test]
fn selection_pins_first_commit_and_validates_context() {
    let mut wizard = native_knowledge();
    let applied = wizard
        .apply(Intent::UseSelectedContext {
            example: 2,
            context: "Selected excerpt".to_string(),
            repository_url: REPO_URL.to_string(),
            commit: COMMIT.to_string(),
            document_name: "notes.md".to_string(),
        })
        .expect("apply");
    assert!(applied.changed);
    let fields = wizard.data().knowledge().expect("knowledge");
    assert_eq!(fields.provenance.commit, COMMIT);
    assert_eq!(fields.provenance.document_names, vec!["notes.md"]);
    assert_eq!(fields.seed_examples[2].context, "Selected excerpt");
    assert_eq!(fields.seed_examples[2].is_context_valid, Validated::Success);
}

#[test]
fn blank_selection_is_rejected_with_warning() {
    let mut wizard = native_knowledge();
    let before = wizard.data().clone();
    let applied = wizard
        .apply(Intent::UseSelectedContext {
            example: 0,
            context: " \n\t ".to_string(),
            repository_url: REPO_URL.to_string(),
            commit: COMMIT.to_string(),
            document_name: "notes.md".to_string(),
        })
        .expect("apply");
    assert!(!applied.changed);
    assert_eq!(applied.notices.len(), 1);
    assert_eq!(applied.notices[0].kind, NoticeKind::Warning);
    assert_eq!(applied.notices[0].title, "Empty selection");
    assert!(applied.notices[0].message.contains("notes.md"));
    assert_eq!(wizard.data(), &before);
    assert!(wizard.data().knowledge().expect("knowledge").provenance.is_empty());
}

#[test]
fn conflicting_upload_is_all_or_nothing() {
    let mut wizard = Wizard::with_data(complete_knowledge(), WizardMode::Native, None);
    let before = wizard.data().clone();
    let applied = wizard
        .apply(Intent::DocumentsUploaded {
            upload: UploadResult {
                repo_url: REPO_URL.to_string(),
                commit_id: "fff000".to_string(),
                document_names: vec!["a.md".to_string(), "b.md".to_string()],
                pr_url: String::new(),
            },
        })
        .expect("apply");
    assert!(!applied.changed);
    assert_eq!(wizard.data(), &before);

    wizard.apply(Intent::ResetProvenance).expect("reset");
    let applied = wizard
        .apply(Intent::DocumentsUploaded {
            upload: UploadResult {
                repo_url: REPO_URL.to_string(),
                commit_id: "fff000".to_string(),
                document_names: vec!["a.md".to_string(), "b.md".to_string()],
                pr_url: String::new(),
            },
        })
        .expect("apply");
    assert!(applied.changed);
    assert_eq!(applied.notices[0].kind, NoticeKind::Success);
    let fields = wizard.data().knowledge().expect("knowledge");
    assert_eq!(fields.provenance.joined_names(), "a.md, b.md");
}

#[test]
fn baseline_entries_cannot_be_removed() {
    let mut wizard = native_knowledge();
    assert!(wizard
        .apply(Intent::RemoveQaPair {
            example: 0,
            pair: 0
        })
        .is_err());
    assert!(wizard.apply(Intent::RemoveSeedExample { example: 0 }).is_err());

    wizard.apply(Intent::AddSeedExample).expect("add");
    wizard.apply(Intent::AddQaPair { example: 5 }).expect("add pair");
    wizard
        .apply(Intent::RemoveSeedExample { example: 5 })
        .expect("remove user example");
    assert_eq!(
        wizard.data().knowledge().expect("knowledge").seed_examples.len(),
        5
    );
}

#[test]
fn knowledge_only_intents_fail_on_skill() {
    let mut wizard = Wizard::new(SubmissionKind::Skill, WizardMode::Native, None);
    assert!(wizard.apply(Intent::AddQaPair { example: 0 }).is_err());
    assert!(wizard
        .apply(Intent::SetDomain {
            value: "x".to_string()
        })
        .is_err());
    assert!(wizard
        .apply(Intent::QuestionChanged {
            example: 0,
            pair: 1,
            value: "q".to_string()
        })
        .is_err());
}

#[test]
fn autofill_requires_dev_mode() {
    let mut wizard = native_knowledge();
    let applied = wizard.apply(Intent::AutoFill).expect("apply");
    assert!(!applied.changed);
    assert_eq!(applied.notices[0].kind, NoticeKind::Warning);
    assert!(!wizard.submit_enabled());

    let mut wizard = native_knowledge().with_dev_mode(true);
    let applied = wizard.apply(Intent::AutoFill).expect("apply");
    assert!(applied.changed);
    assert!(wizard.submit_enabled());
}

#[test]
fn identity_fills_only_empty_fields() {
    let mut wizard = native_knowledge();
    wizard
        .apply(Intent::SetEmail {
            value: "typed@example.com".to_string(),
        })
        .expect("apply");
    let ticket = wizard.begin_identity_lookup();
    assert!(wizard.resolve_identity(&ticket, identity()));
    assert_eq!(wizard.data().contributor.email, "typed@example.com");
    assert_eq!(wizard.data().contributor.name, "Octo Cat");
    assert_eq!(wizard.data().contributor.login, "octo");
}

#[test]
fn stale_identity_lookup_is_dropped() {
    let mut wizard = native_knowledge();
    let first = wizard.begin_identity_lookup();
    let second = wizard.begin_identity_lookup();
    assert!(!wizard.resolve_identity(&first, identity()));
    assert!(wizard.data().contributor.email.is_empty());
    assert!(wizard.identity().is_none());
    assert!(wizard.resolve_identity(&second, identity()));

    let ticket = wizard.begin_identity_lookup();
    wizard.cancel();
    assert!(!wizard.resolve_identity(&ticket, UserIdentity::default()));
}

#[test]
fn prepare_submission_names_failing_steps() {
    let wizard = native_knowledge();
    let err = wizard.prepare_submission().expect_err("blocked");
    let message = err.to_string();
    assert!(message.starts_with("submission blocked"));
    assert!(message.contains("details"));

    let mut wizard = Wizard::with_data(complete_knowledge(), WizardMode::Native, None);
    let doc = wizard.prepare_submission().expect("ready");
    assert_eq!(doc.submission_summary, "Add release notes");
    wizard.complete_submission();
    assert!(wizard.data().submission_summary.is_empty());
}

#[test]
fn snapshot_restores_position_and_data() {
    let mut wizard = Wizard::with_data(complete_knowledge(), WizardMode::Github, Some(identity()))
        .with_dev_mode(true);
    wizard.navigate_to(StepId::SeedContext).expect("seed context");
    let snapshot = wizard.snapshot();
    let restored = Wizard::restore(snapshot.clone()).expect("restore");
    assert_eq!(restored.active_step(), StepId::SeedContext);
    assert_eq!(restored.snapshot(), snapshot);

    let mut broken = snapshot;
    broken.active_index = 40;
    assert!(Wizard::restore(broken).is_err());
}

#[test]
fn step_views_list_issues_for_failing_steps() {
    let wizard = native_knowledge();
    let views = wizard.step_views();
    assert_eq!(views.len(), wizard.flattened().len());
    assert!(views[1].active);
    assert_eq!(views[3].parent, Some(StepId::SeedData));
    assert!(views[0].issues.iter().any(|issue| issue.starts_with("email")));
    assert!(views[5].issues.is_empty());
}

#[test]
fn edit_opens_with_imported_content_and_no_errors() {
    let doc = export_document(&complete_knowledge());
    let wizard = Wizard::from_edit(&doc, WizardMode::Native, Some(identity())).expect("edit");
    assert!(wizard.submit_enabled());
    assert_eq!(wizard.data().contributor.email, "dev@example.com");
    assert_eq!(wizard.data().contributor.login, "octo");
    let example = &wizard.data().knowledge().expect("knowledge").seed_examples[0];
    assert_eq!(example.is_context_valid, Validated::Success);
}
