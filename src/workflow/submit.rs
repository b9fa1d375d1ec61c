//! Submit and cancel.
use super::context::{backend_for, config_for, with_session, Outcome};
use crate::cli::{CancelArgs, SubmitArgs};
use crate::notice::Notice;
use crate::services::SubmissionSink;
use crate::wizard::{RequestKind, Wizard};
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SubmitReport<'a> {
    submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
    notices: &'a [Notice],
}

/// Send the submission, or an update when editing `edit_branch`.
///
/// A gated wizard never reaches the sink. On success the wizard resets.
pub(crate) fn submit_with(
    wizard: &mut Wizard,
    sink: &dyn SubmissionSink,
    edit_branch: Option<&str>,
) -> Result<Outcome> {
    let document = wizard.prepare_submission()?;
    let ticket = wizard.requests_mut().begin(RequestKind::Submission);
    let sent = match edit_branch {
        Some(branch) => sink.update(&document, branch, wizard.identity()),
        None => sink.submit(&document, wizard.identity()),
    };
    let accepted = match sent {
        Ok(accepted) => accepted,
        Err(err) => {
            wizard.requests_mut().cancel(RequestKind::Submission);
            return Ok(Outcome::transport("Submission failed", err));
        }
    };
    if !wizard.requests_mut().finish(&ticket) {
        return Ok(Outcome::unchanged(Vec::new()));
    }
    if !accepted {
        return Ok(Outcome::unchanged(vec![Notice::danger(
            "Submission rejected",
            "The backend did not accept the contribution.",
        )]));
    }
    let notice = match edit_branch {
        Some(branch) => Notice::success(
            "Contribution updated",
            format!("{} changes pushed to {branch}.", document.kind),
        ),
        None => Notice::success(
            "Contribution submitted",
            format!("{} contribution is ready for review.", document.kind),
        ),
    };
    wizard.complete_submission();
    Ok(Outcome::changed(vec![notice]).with_intent("submit"))
}

pub fn run_submit(args: &SubmitArgs) -> Result<()> {
    with_session(&args.session.session, "submit", |ctx| {
        // Gate before touching config so a blocked submit needs no backend.
        if let Err(err) = ctx.wizard.prepare_submission() {
            return Ok(Outcome {
                notices: vec![Notice::warning("Submission blocked", format!("{err:#}"))],
                failure: Some(err),
                ..Outcome::default()
            });
        }
        let config = config_for(&args.backend, Some(ctx.wizard.mode()))?;
        let backend = backend_for(&config, ctx.wizard.mode())?;
        let branch = ctx.session.edit_branch.clone();
        let outcome = submit_with(&mut ctx.wizard, &backend, branch.as_deref())?;
        let submitted = outcome.changed;
        if submitted {
            // The edit branch belongs to the submission that just went out.
            ctx.session.edit_branch = None;
        }
        if args.json {
            let report = SubmitReport {
                submitted,
                branch: branch.as_deref(),
                notices: &outcome.notices,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("serialize submit report")?
            );
        } else if submitted {
            println!("submitted; session reset to a fresh {}", ctx.wizard.kind());
        }
        Ok(outcome)
    })
}

pub fn run_cancel(args: &CancelArgs) -> Result<()> {
    with_session(&args.session.session, "cancel", |ctx| {
        ctx.wizard.cancel();
        ctx.session.edit_branch = None;
        ctx.session.view = None;
        println!("submission discarded");
        Ok(Outcome::changed(Vec::new()).with_intent("cancel"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::complete_knowledge;
    use crate::model::{SubmissionKind, WizardMode};
    use crate::notice::NoticeKind;
    use crate::services::fakes::FakeBackend;

    #[test]
    fn gated_submission_never_reaches_backend() {
        let mut wizard = Wizard::new(SubmissionKind::Knowledge, WizardMode::Native, None);
        let backend = FakeBackend::default();
        let err = submit_with(&mut wizard, &backend, None).expect_err("gated");
        assert!(err.to_string().contains("submission blocked"));
        assert!(backend.submitted.borrow().is_empty());
    }

    #[test]
    fn successful_submission_resets_wizard() {
        let mut wizard = Wizard::with_data(complete_knowledge(), WizardMode::Native, None);
        let backend = FakeBackend::default();
        let outcome = submit_with(&mut wizard, &backend, None).expect("submit");
        assert!(outcome.changed);
        assert_eq!(outcome.notices[0].kind, NoticeKind::Success);
        assert_eq!(backend.submitted.borrow().len(), 1);
        assert_eq!(backend.submitted.borrow()[0].contributor.email, "dev@example.com");
        assert!(wizard.data().contributor.email.is_empty());
        assert_eq!(wizard.requests_mut().in_flight(), 0);
    }

    #[test]
    fn failed_submission_keeps_state() {
        let mut wizard = Wizard::with_data(complete_knowledge(), WizardMode::Native, None);
        let before = wizard.data().clone();
        let backend = FakeBackend {
            fail_submit: true,
            ..FakeBackend::default()
        };
        let outcome = submit_with(&mut wizard, &backend, Some("feature/notes")).expect("outcome");
        assert!(!outcome.changed);
        assert!(outcome.failure.is_some());
        assert_eq!(outcome.notices[0].kind, NoticeKind::Danger);
        assert!(outcome.notices[0].message.contains("backend unavailable"));
        assert_eq!(wizard.data(), &before);
    }

    #[test]
    fn edit_branch_sends_update() {
        let mut wizard = Wizard::with_data(complete_knowledge(), WizardMode::Github, None);
        let backend = FakeBackend::default();
        let outcome = submit_with(&mut wizard, &backend, Some("feature/notes")).expect("update");
        assert_eq!(outcome.notices[0].title, "Contribution updated");
        assert!(outcome.notices[0].message.contains("feature/notes"));
    }
}
