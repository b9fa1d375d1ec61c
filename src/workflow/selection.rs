//! Document commands: listing, selection capture and restore, upload.
//!
//! Selections are made against a local file or a backend document. Backend
//! calls that fail become danger notices; the session is left as it was.
use super::context::{backend_for, config_for, with_session, Outcome, SessionContext};
use crate::cli::{DocumentSourceArgs, DocumentsArgs, LocateArgs, UploadArgs, UseContextArgs};
use crate::notice::Notice;
use crate::selection::{
    extract, locate, SelectionEvent, SelectionTracker, SelectionUpdate, TextRange, ViewSelection,
};
use crate::services::{group_by_commit, DocumentCache, DocumentStore, UploadFile};
use crate::util::{file_name, read_text};
use crate::wizard::{Intent, RequestKind, Wizard};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;

/// Text of the document a selection is made in, with what is known of its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceDocument {
    pub name: String,
    pub commit: Option<String>,
    pub text: String,
}

/// How the selection is given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectionInput {
    Range(TextRange),
    Text(String),
}

fn local_source(source: &DocumentSourceArgs) -> Result<Option<SourceDocument>> {
    let Some(path) = &source.document else {
        return Ok(None);
    };
    let name = file_name(path).ok_or_else(|| anyhow!("{} has no file name", path.display()))?;
    Ok(Some(SourceDocument {
        name,
        commit: None,
        text: read_text(path)?,
    }))
}

/// Fetch a backend document through the cache.
pub(crate) fn remote_source(
    store: &dyn DocumentStore,
    cache: &mut DocumentCache,
    filename: &str,
) -> Result<SourceDocument> {
    let listing = store.list_documents().context("list documents")?;
    let file = listing
        .iter()
        .find(|file| file.filename == filename)
        .ok_or_else(|| anyhow!("document {filename} is not on the backend"))?;
    let text = cache.content_for(store, file)?;
    Ok(SourceDocument {
        name: file.filename.clone(),
        commit: Some(file.commit_sha.clone()),
        text,
    })
}

fn pick<'a>(explicit: Option<&'a str>, fallback: Option<&'a str>, current: &'a str) -> Option<&'a str> {
    explicit
        .or(fallback)
        .or_else(|| (!current.is_empty()).then_some(current))
}

/// Capture a selection and apply it as the context of `example` (zero-based).
///
/// An empty selection falls back to the candidate `tracker` already holds.
pub(crate) fn select_context(
    wizard: &mut Wizard,
    example: usize,
    doc: &SourceDocument,
    tracker: &mut SelectionTracker,
    selection: &SelectionInput,
    repo: Option<&str>,
    commit: Option<&str>,
) -> Result<Outcome> {
    let range = match selection {
        SelectionInput::Range(range) => *range,
        SelectionInput::Text(text) => match locate(&doc.text, text) {
            Some(range) => range,
            None => {
                return Ok(Outcome::unchanged(vec![Notice::warning(
                    "Selection not found",
                    format!("{text:?} does not occur in {}", doc.name),
                )]))
            }
        },
    };
    if extract(&doc.text, range).is_none() {
        return Err(anyhow!(
            "selection {}..{} is outside {} ({} characters)",
            range.start,
            range.end,
            doc.name,
            doc.text.chars().count()
        ));
    }
    let update = tracker.on_selection_change(SelectionEvent::within(&doc.text, range));
    let candidate = match tracker.candidate() {
        Some(candidate) if tracker.can_use_selection() => candidate.clone(),
        _ => {
            return Ok(Outcome::unchanged(vec![Notice::warning(
                "Empty selection",
                format!("Select some text in {} to use it as context.", doc.name),
            )]))
        }
    };

    let mut notices = Vec::new();
    if let SelectionUpdate::Restore(previous) = update {
        notices.push(Notice::info(
            "Selection kept",
            format!(
                "The new selection was empty; reusing {}..{} in {}.",
                previous.start, previous.end, doc.name
            ),
        ));
    }
    if tracker.over_limit() {
        notices.push(Notice::warning("Long context", tracker.word_count_label()));
    }
    let provenance = wizard
        .data()
        .knowledge()
        .map(|fields| fields.provenance.clone())
        .ok_or_else(|| anyhow!("context selection applies to knowledge submissions"))?;
    let commit = pick(commit, doc.commit.as_deref(), &provenance.commit)
        .ok_or_else(|| anyhow!("commit of {} is unknown (pass --commit)", doc.name))?;
    let repository_url = pick(repo, None, &provenance.repository_url)
        .ok_or_else(|| anyhow!("repository of {} is unknown (pass --repo)", doc.name))?;

    let intent = Intent::UseSelectedContext {
        example,
        context: candidate.text,
        repository_url: repository_url.to_string(),
        commit: commit.to_string(),
        document_name: doc.name.clone(),
    };
    let name = intent.name();
    let applied = wizard.apply(intent)?;
    notices.extend(applied.notices);
    let outcome = if applied.changed {
        Outcome::changed(notices)
    } else {
        Outcome::unchanged(notices)
    };
    Ok(outcome.with_intent(name))
}

/// Upload files and fold the response into the provenance.
pub(crate) fn upload_documents(
    wizard: &mut Wizard,
    store: &dyn DocumentStore,
    files: &[UploadFile],
) -> Result<Outcome> {
    let ticket = wizard.requests_mut().begin(RequestKind::Upload);
    let result = match store.upload(files) {
        Ok(result) => result,
        Err(err) => {
            wizard.requests_mut().cancel(RequestKind::Upload);
            return Ok(Outcome::transport("Upload failed", err));
        }
    };
    if !wizard.requests_mut().finish(&ticket) {
        return Ok(Outcome::unchanged(Vec::new()));
    }
    let intent = Intent::DocumentsUploaded { upload: result };
    let name = intent.name();
    let applied = wizard.apply(intent)?;
    let outcome = if applied.changed {
        Outcome::changed(applied.notices)
    } else {
        Outcome::unchanged(applied.notices)
    };
    Ok(outcome.with_intent(name))
}

fn example_index(example: u32) -> usize {
    example.saturating_sub(1) as usize
}

pub fn run_use_context(args: &UseContextArgs) -> Result<()> {
    let selection = match (&args.text, args.start, args.end) {
        (Some(text), _, _) => SelectionInput::Text(text.clone()),
        (None, Some(start), Some(end)) => SelectionInput::Range(TextRange { start, end }),
        _ => return Err(anyhow!("provide --text or both --start and --end")),
    };
    with_session(&args.session.session, "use-context", |ctx| {
        let doc = match local_source(&args.source)? {
            Some(doc) => doc,
            None => {
                let filename = args.source.filename.as_deref().unwrap_or_default();
                let config = config_for(&args.backend, Some(ctx.wizard.mode()))?;
                let backend = backend_for(&config, ctx.wizard.mode())?;
                let mut cache = DocumentCache::new();
                match remote_source(&backend, &mut cache, filename) {
                    Ok(doc) => doc,
                    Err(err) => return Ok(Outcome::transport("Document unavailable", err)),
                }
            }
        };
        let mut tracker = ViewSelection::tracker_for(ctx.session.view.as_ref(), &doc.name);
        tracker.on_pointer_down(args.extend);
        let outcome = select_context(
            &mut ctx.wizard,
            example_index(args.example),
            &doc,
            &mut tracker,
            &selection,
            args.repo.as_deref(),
            args.commit.as_deref(),
        )?;
        let view = Some(ViewSelection {
            document: doc.name.clone(),
            tracker,
        });
        if ctx.session.view != view {
            ctx.session.view = view;
            if !outcome.changed {
                ctx.save()?;
            }
        }
        if args.json {
            let report = UseContextReport {
                example: args.example,
                document: &doc.name,
                changed: outcome.changed,
                notices: &outcome.notices,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("serialize selection")?
            );
        } else if outcome.changed {
            println!("seed example {}: context taken from {}", args.example, doc.name);
        } else {
            println!("seed example {}: unchanged", args.example);
        }
        Ok(outcome)
    })
}

#[derive(Debug, Serialize)]
struct UseContextReport<'a> {
    example: u32,
    document: &'a str,
    changed: bool,
    notices: &'a [Notice],
}

#[derive(Debug, Serialize)]
struct LocateReport {
    example: u32,
    document: String,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<TextRange>,
    word_count: usize,
}

fn stored_context(wizard: &Wizard, example: usize) -> Result<String> {
    let data = wizard.data();
    let context = match (data.knowledge(), data.skill()) {
        (Some(fields), _) => fields.seed_examples.get(example).map(|e| e.context.clone()),
        (_, Some(fields)) => fields.seed_examples.get(example).map(|e| e.context.clone()),
        (None, None) => None,
    };
    context.ok_or_else(|| anyhow!("seed example {} does not exist", example + 1))
}

/// Restore is read-only: it reports where the stored context sits.
pub fn run_locate(args: &LocateArgs) -> Result<()> {
    let ctx = SessionContext::open(&args.session.session)?;
    let stored = stored_context(&ctx.wizard, example_index(args.example))?;
    let doc = match local_source(&args.source)? {
        Some(doc) => doc,
        None => {
            let filename = args.source.filename.as_deref().unwrap_or_default();
            let config = config_for(&args.backend, Some(ctx.wizard.mode()))?;
            let backend = backend_for(&config, ctx.wizard.mode())?;
            remote_source(&backend, &mut DocumentCache::new(), filename)?
        }
    };
    let range = locate(&doc.text, &stored);
    let report = LocateReport {
        example: args.example,
        document: doc.name,
        found: range.is_some(),
        range,
        word_count: crate::seed::count_words(&stored),
    };
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize locate report")?
        );
    } else {
        match report.range {
            Some(range) => println!(
                "seed example {}: found in {} at {}..{}",
                report.example, report.document, range.start, range.end
            ),
            None => println!(
                "seed example {}: not found in {}",
                report.example, report.document
            ),
        }
    }
    Ok(())
}

pub fn run_documents(args: &DocumentsArgs) -> Result<()> {
    let ctx = SessionContext::open(&args.session.session)?;
    let config = config_for(&args.backend, Some(ctx.wizard.mode()))?;
    let backend = backend_for(&config, ctx.wizard.mode())?;
    let files = backend.list_documents().context("list documents")?;
    let pinned = ctx
        .wizard
        .data()
        .knowledge()
        .map(|fields| fields.provenance.commit.clone())
        .unwrap_or_default();
    let groups = group_by_commit(&files, &pinned);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&groups).context("serialize document groups")?
        );
        return Ok(());
    }
    for group in &groups {
        let state = if group.selectable { "" } else { " (other commit)" };
        match &group.commit_date {
            Some(date) => println!("commit {} {date}{state}", group.commit_sha),
            None => println!("commit {}{state}", group.commit_sha),
        }
        for file in &group.files {
            println!("  {}", file.filename);
        }
    }
    Ok(())
}

pub fn run_upload(args: &UploadArgs) -> Result<()> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(UploadFile {
            file_name: file_name(path)
                .ok_or_else(|| anyhow!("{} has no file name", path.display()))?,
            file_content: read_text(path)?,
        });
    }
    with_session(&args.session.session, "upload", |ctx| {
        let config = config_for(&args.backend, Some(ctx.wizard.mode()))?;
        let backend = backend_for(&config, ctx.wizard.mode())?;
        let outcome = upload_documents(&mut ctx.wizard, &backend, &files)?;
        if outcome.changed {
            println!("uploaded {} file(s)", files.len());
        }
        Ok(outcome)
    })
}
