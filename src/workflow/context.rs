use crate::cli::BackendArgs;
use crate::config::{resolve_config, ConfigOverrides, WizardConfig};
use crate::model::{WizardMode, HISTORY_SCHEMA_VERSION, SESSION_SCHEMA_VERSION};
use crate::notice::Notice;
use crate::services::HttpBackend;
use crate::session::{self, HistoryEntry, SessionFile, SessionPaths};
use crate::util::now_epoch_ms;
use crate::wizard::Wizard;
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// A loaded session: its files, its persisted header and the live wizard.
pub(crate) struct SessionContext {
    pub(crate) paths: SessionPaths,
    pub(crate) session: SessionFile,
    pub(crate) wizard: Wizard,
}

impl SessionContext {
    pub(crate) fn open(session_dir: &Path) -> Result<Self> {
        let paths = SessionPaths::new(session_dir.to_path_buf());
        if !paths.exists() {
            return Err(anyhow!(
                "no session at {} (run `cwiz init --session {}` first)",
                paths.session_path().display(),
                session_dir.display()
            ));
        }
        let session = session::load_session(&paths)?;
        let wizard = Wizard::restore(session.wizard.clone())
            .with_context(|| format!("restore wizard from {}", paths.session_path().display()))?;
        Ok(Self {
            paths,
            session,
            wizard,
        })
    }

    pub(crate) fn create(
        paths: SessionPaths,
        wizard: Wizard,
        edit_branch: Option<String>,
    ) -> Result<Self> {
        let now = now_epoch_ms()?;
        let session = SessionFile {
            schema_version: SESSION_SCHEMA_VERSION,
            created_at_epoch_ms: now,
            updated_at_epoch_ms: now,
            edit_branch,
            wizard: wizard.snapshot(),
            view: None,
        };
        Ok(Self {
            paths,
            session,
            wizard,
        })
    }

    pub(crate) fn save(&mut self) -> Result<()> {
        self.session.wizard = self.wizard.snapshot();
        self.session.updated_at_epoch_ms = now_epoch_ms()?;
        session::write_session(&self.paths, &self.session)
    }

    pub(crate) fn record(&self, command: &str, outcome: &Outcome, error: Option<String>) -> Result<()> {
        let entry = HistoryEntry {
            schema_version: HISTORY_SCHEMA_VERSION,
            ts_epoch_ms: now_epoch_ms()?,
            command: command.to_string(),
            intent: outcome.intent.map(str::to_string),
            changed: outcome.changed,
            notices: outcome.notices.clone(),
            error,
        };
        session::append_history(&self.paths, &entry)
    }
}

/// Result of one command against a session.
#[derive(Debug, Default)]
pub(crate) struct Outcome {
    pub(crate) intent: Option<&'static str>,
    pub(crate) changed: bool,
    pub(crate) notices: Vec<Notice>,
    /// A backend call failed; state is kept and the command exits non-zero.
    pub(crate) failure: Option<anyhow::Error>,
}

impl Outcome {
    pub(crate) fn changed(notices: Vec<Notice>) -> Self {
        Self {
            changed: true,
            notices,
            ..Self::default()
        }
    }

    pub(crate) fn unchanged(notices: Vec<Notice>) -> Self {
        Self {
            notices,
            ..Self::default()
        }
    }

    /// A transport failure, surfaced as a danger notice.
    pub(crate) fn transport(title: &str, err: anyhow::Error) -> Self {
        tracing::warn!(title, error = %format!("{err:#}"), "backend call failed");
        Self {
            notices: vec![Notice::transport(title, &err)],
            failure: Some(err),
            ..Self::default()
        }
    }

    pub(crate) fn with_intent(mut self, intent: &'static str) -> Self {
        self.intent = Some(intent);
        self
    }
}

pub(crate) fn print_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("{notice}");
    }
}

/// Run a command against an existing session.
///
/// Changed state is saved, every run is appended to the history, and notices
/// go to stderr. Errors from `body` are logged and recorded before returning.
pub(crate) fn with_session<F>(session_dir: &Path, command: &str, body: F) -> Result<()>
where
    F: FnOnce(&mut SessionContext) -> Result<Outcome>,
{
    let started = Instant::now();
    let mut ctx = SessionContext::open(session_dir)?;
    match body(&mut ctx) {
        Ok(outcome) => {
            if outcome.changed {
                ctx.save()?;
            }
            let error = outcome.failure.as_ref().map(|err| format!("{err:#}"));
            ctx.record(command, &outcome, error)?;
            print_notices(&outcome.notices);
            tracing::info!(
                command,
                changed = outcome.changed,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "command complete"
            );
            match outcome.failure {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
        Err(err) => {
            tracing::error!(command, error = %format!("{err:#}"), "command failed");
            let outcome = Outcome::unchanged(vec![Notice::unexpected()]);
            ctx.record(command, &outcome, Some(format!("{err:#}")))?;
            print_notices(&outcome.notices);
            Err(err)
        }
    }
}

pub(crate) fn config_for(backend: &BackendArgs, mode: Option<WizardMode>) -> Result<WizardConfig> {
    resolve_config(&ConfigOverrides {
        backend_url: backend.backend_url.clone(),
        dev_mode: None,
        github_token: backend.github_token.clone(),
        mode,
    })
}

/// HTTP client for the configured backend; an unset URL is an error.
pub(crate) fn backend_for(config: &WizardConfig, mode: WizardMode) -> Result<HttpBackend> {
    let url = config.backend_url.as_deref().ok_or_else(|| {
        anyhow!("no backend configured (pass --backend-url or set CWIZ_BACKEND_URL)")
    })?;
    Ok(client(config, url, mode))
}

pub(crate) fn client(config: &WizardConfig, base_url: &str, mode: WizardMode) -> HttpBackend {
    let backend = HttpBackend::new(base_url, mode, Duration::from_secs(config.timeout_secs));
    match config.github_api_url.as_deref() {
        Some(api) => backend.with_github_api(api),
        None => backend,
    }
}
