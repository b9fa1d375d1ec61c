use super::{build_status_report, render_status_text};
use crate::fixtures::complete_knowledge;
use crate::model::{SubmissionKind, WizardMode};
use crate::steps::StepId;
use crate::wizard::Wizard;

#[test]
fn fresh_session_reports_blocked_submit() {
    let wizard = Wizard::new(SubmissionKind::Knowledge, WizardMode::Native, None);
    let report = build_status_report(&wizard, None, 1);
    assert!(!report.submit_enabled);
    assert_eq!(report.active_step, StepId::UploadedDocuments);
    let text = render_status_text(&report, false);
    assert!(text.starts_with("knowledge contribution, native mode\n"));
    assert!(text.contains(">  2. [default] Upload documents"));
    assert!(text.contains("- email: Required field"));
    assert!(!text.contains("repository URL"));
    assert!(text.contains("submit: blocked (details, uploaded-documents"));
}

#[test]
fn verbose_lists_issues_past_the_active_step() {
    let wizard = Wizard::new(SubmissionKind::Knowledge, WizardMode::Native, None);
    let report = build_status_report(&wizard, None, 0);
    let text = render_status_text(&report, true);
    assert!(text.contains("- repository URL: Required field"));
    assert!(text.contains("- seed example 1: Context is required"));
}

#[test]
fn complete_session_reports_documents_and_branch() {
    let wizard = Wizard::with_data(complete_knowledge(), WizardMode::Native, None);
    let report = build_status_report(&wizard, Some("knowledge-edit"), 3);
    assert!(report.submit_enabled);
    let text = render_status_text(&report, false);
    assert!(text.contains("(editing knowledge-edit)"));
    assert!(text.contains("documents: notes.md"));
    assert!(text.ends_with("submit: enabled\n"));

    let value = serde_json::to_value(&report).expect("serialize");
    assert_eq!(value["active_step"], "uploaded-documents");
    assert_eq!(value["steps"][0]["displayed"], "success");
}
