//! Workflow status step.
//!
//! Status is read-only: it restores the session and reports derived step
//! statuses without touching the session files.
use super::context::SessionContext;
use crate::cli::StatusArgs;
use crate::model::{SubmissionKind, WizardMode};
use crate::session::load_history;
use crate::steps::{StepId, StepStatus};
use crate::wizard::{StepView, Wizard};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;

/// Current schema version for `status --json` output.
pub const STATUS_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    pub schema_version: u32,
    pub kind: SubmissionKind,
    pub mode: WizardMode,
    pub dev_mode: bool,
    pub active_step: StepId,
    pub active_index: usize,
    pub submit_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_branch: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub documents: String,
    pub steps: Vec<StepView>,
    pub history_entries: usize,
}

pub(crate) fn build_status_report(
    wizard: &Wizard,
    edit_branch: Option<&str>,
    history_entries: usize,
) -> StatusReport {
    StatusReport {
        schema_version: STATUS_SCHEMA_VERSION,
        kind: wizard.kind(),
        mode: wizard.mode(),
        dev_mode: wizard.dev_mode(),
        active_step: wizard.active_step(),
        active_index: wizard.active_index(),
        submit_enabled: wizard.submit_enabled(),
        edit_branch: edit_branch.map(str::to_string),
        documents: wizard
            .data()
            .knowledge()
            .map(|fields| fields.provenance.joined_names())
            .unwrap_or_default(),
        steps: wizard.step_views(),
        history_entries,
    }
}

/// Plain-text rendering; issues show where the displayed status is an error.
pub(crate) fn render_status_text(report: &StatusReport, verbose: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "{} contribution, {} mode", report.kind, report.mode);
    if let Some(branch) = &report.edit_branch {
        let _ = write!(out, " (editing {branch})");
    }
    out.push('\n');
    for step in &report.steps {
        let marker = if step.active { '>' } else { ' ' };
        let indent = if step.parent.is_some() { "  " } else { "" };
        let _ = writeln!(
            out,
            "{marker} {:>2}. [{:<7}] {indent}{}",
            step.index + 1,
            step.displayed.as_str(),
            step.name
        );
        let show = step.displayed == StepStatus::Error
            || (verbose && step.computed == StepStatus::Error);
        if show {
            for issue in &step.issues {
                let _ = writeln!(out, "         {indent}- {issue}");
            }
        }
    }
    if !report.documents.is_empty() {
        let _ = writeln!(out, "documents: {}", report.documents);
    }
    if report.submit_enabled {
        out.push_str("submit: enabled\n");
    } else {
        let failing: Vec<&str> = report
            .steps
            .iter()
            .filter(|step| step.computed == StepStatus::Error)
            .map(|step| step.id.as_str())
            .collect();
        let _ = writeln!(out, "submit: blocked ({})", failing.join(", "));
    }
    out
}

pub fn run_status(args: &StatusArgs) -> Result<()> {
    let ctx = SessionContext::open(&args.session.session)?;
    let history_entries = load_history(&ctx.paths)?.len();
    let report = build_status_report(
        &ctx.wizard,
        ctx.session.edit_branch.as_deref(),
        history_entries,
    );
    if args.json {
        let text = serde_json::to_string_pretty(&report).context("serialize status")?;
        println!("{text}");
    } else {
        print!("{}", render_status_text(&report, args.verbose));
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
