//! Workflow init step.
//!
//! Init creates the session, resolves dev mode and, in hosted mode, looks up
//! the contributor identity before the first save.
use super::context::{client, Outcome, SessionContext};
use crate::adapter::parse_yaml;
use crate::cli::InitArgs;
use crate::config::{resolve_config, ConfigOverrides, WizardConfig};
use crate::model::WizardMode;
use crate::notice::Notice;
use crate::services::{EnvConfigSource, IdentityProvider};
use crate::session::SessionPaths;
use crate::util::{display_path, read_text};
use crate::wizard::{RequestKind, Wizard};
use anyhow::{anyhow, Context, Result};

/// Dev mode from config, else from the backend's env config.
///
/// An unreachable backend leaves dev mode off with a warning.
pub(crate) fn resolve_dev_mode(
    config: &WizardConfig,
    source: Option<&dyn EnvConfigSource>,
) -> (bool, Option<Notice>) {
    if let Some(flag) = config.dev_mode {
        return (flag, None);
    }
    let Some(source) = source else {
        return (false, None);
    };
    match source.dev_mode_enabled() {
        Ok(flag) => (flag, None),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "env config lookup failed");
            (
                false,
                Some(Notice::warning(
                    "Env config unavailable",
                    format!("Dev mode is off: {err:#}"),
                )),
            )
        }
    }
}

/// Fill the contributor from the hosted session identity.
pub(crate) fn lookup_identity(
    wizard: &mut Wizard,
    provider: &dyn IdentityProvider,
    token: &str,
) -> Option<Notice> {
    let ticket = wizard.begin_identity_lookup();
    match provider.user_info(token) {
        Ok(identity) => {
            wizard.resolve_identity(&ticket, identity);
            None
        }
        Err(err) => {
            wizard.requests_mut().cancel(RequestKind::Identity);
            Some(Notice::transport("Identity lookup failed", &err))
        }
    }
}

pub fn run_init(args: &InitArgs) -> Result<()> {
    let paths = SessionPaths::new(args.session.session.clone());
    if paths.exists() && !args.force {
        return Err(anyhow!(
            "session already exists at {} (use --force to overwrite)",
            paths.session_path().display()
        ));
    }
    let config = resolve_config(&ConfigOverrides {
        backend_url: args.backend.backend_url.clone(),
        dev_mode: args.dev_mode.then_some(true),
        github_token: args.backend.github_token.clone(),
        mode: args.mode,
    })?;
    let mode = config.mode.unwrap_or(WizardMode::Native);
    let remote = config
        .backend_url
        .as_deref()
        .map(|url| client(&config, url, mode));

    let mut notices = Vec::new();
    let (dev_mode, notice) = resolve_dev_mode(
        &config,
        remote.as_ref().map(|backend| backend as &dyn EnvConfigSource),
    );
    notices.extend(notice);

    let mut wizard = match &args.from {
        Some(path) => {
            let doc = parse_yaml(&read_text(path)?)
                .with_context(|| format!("load contribution {}", path.display()))?;
            Wizard::from_edit(&doc, mode, None)?
        }
        None => Wizard::new(args.kind, mode, None),
    }
    .with_dev_mode(dev_mode);

    if mode == WizardMode::Github {
        if let Some(token) = config.github_token.as_deref() {
            let provider = client(&config, config.backend_url.as_deref().unwrap_or_default(), mode);
            notices.extend(lookup_identity(&mut wizard, &provider, token));
        }
    }

    let kind = wizard.kind();
    let mut ctx = SessionContext::create(paths, wizard, args.edit_branch.clone())?;
    ctx.save()?;
    ctx.record("init", &Outcome::changed(notices.clone()), None)?;
    super::context::print_notices(&notices);
    tracing::info!(%kind, %mode, dev_mode, "initialized session");
    println!(
        "initialized {kind} session ({mode} mode) at {}",
        display_path(ctx.paths.root(), std::env::current_dir().ok().as_deref())
    );
    Ok(())
}
