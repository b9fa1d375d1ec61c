//! YAML import and export.
use super::context::{with_session, Outcome, SessionContext};
use crate::adapter::{export_document, parse_yaml, to_yaml};
use crate::cli::{ExportArgs, ImportArgs};
use crate::util::{display_path, read_text};
use crate::wizard::Intent;
use anyhow::{Context, Result};
use std::fs;

pub fn run_import(args: &ImportArgs) -> Result<()> {
    let document = parse_yaml(&read_text(&args.file)?)
        .with_context(|| format!("load contribution {}", args.file.display()))?;
    with_session(&args.session.session, "import", |ctx| {
        let intent = Intent::UploadYaml { document };
        let name = intent.name();
        let applied = ctx.wizard.apply(intent)?;
        println!("imported {}", display_path(&args.file, None));
        Ok(Outcome::changed(applied.notices).with_intent(name))
    })
}

/// Export is read-only; it writes the document but not the session.
pub fn run_export(args: &ExportArgs) -> Result<()> {
    let ctx = SessionContext::open(&args.session.session)?;
    let text = to_yaml(&export_document(ctx.wizard.data()))?;
    match &args.out {
        Some(path) => {
            fs::write(path, text.as_bytes())
                .with_context(|| format!("write {}", path.display()))?;
            eprintln!("wrote {}", display_path(path, None));
        }
        None => print!("{text}"),
    }
    Ok(())
}
