//! CLI argument parsing for the contribution wizard.
//!
//! Every command operates on a session directory; the wizard state in it is
//! loaded, changed by one command, and written back.
use crate::model::{SubmissionKind, WizardMode};
use crate::steps::StepId;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "cwiz",
    version,
    about = "Guided wizard for knowledge and skill contributions",
    after_help = "Commands:\n  init --session <dir> --kind <kind>     Start a submission (or --from <yaml> to edit one)\n  status --session <dir>                 Show steps, statuses and the submit gate\n  goto|next|back --session <dir>         Move the active step\n  apply --session <dir> --intent <json>  Apply one typed intent\n  import|export --session <dir>          Merge or write the YAML document\n  documents --session <dir>              List backend documents grouped by commit\n  locate|use-context --session <dir>     Restore or capture a context selection\n  upload --session <dir> <files>         Upload source documents\n  submit --session <dir>                 Submit when every step passes\n  cancel --session <dir>                 Discard the submission\n\nExamples:\n  cwiz init --session /tmp/contrib --kind knowledge\n  cwiz apply --session /tmp/contrib --intent '{\"intent\":\"set_email\",\"value\":\"me@example.com\"}'\n  cwiz status --session /tmp/contrib --json\n  cwiz export --session /tmp/contrib --out qna.yaml",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    Status(StatusArgs),
    Goto(GotoArgs),
    Next(StepArgs),
    Back(StepArgs),
    Apply(ApplyArgs),
    Import(ImportArgs),
    Export(ExportArgs),
    Documents(DocumentsArgs),
    Locate(LocateArgs),
    UseContext(UseContextArgs),
    Upload(UploadArgs),
    Submit(SubmitArgs),
    Cancel(CancelArgs),
}

/// Session directory shared by every command.
#[derive(Args, Debug, Clone)]
pub struct SessionArg {
    /// Session directory holding session.json and history.jsonl
    #[arg(long, value_name = "DIR")]
    pub session: PathBuf,
}

/// Backend connection settings; each overrides env and config file values.
#[derive(Args, Debug, Clone, Default)]
pub struct BackendArgs {
    /// Base URL of the contribution backend
    #[arg(long, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Token for the hosted identity lookup
    #[arg(long, value_name = "TOKEN")]
    pub github_token: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Start a new submission in a session directory")]
pub struct InitArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Submission kind: knowledge or skill
    #[arg(long, value_name = "KIND", default_value = "knowledge")]
    pub kind: SubmissionKind,

    /// Deployment mode: native or github (defaults to the configured mode, else native)
    #[arg(long, value_name = "MODE")]
    pub mode: Option<WizardMode>,

    /// Open an existing contribution document for editing
    #[arg(long, value_name = "PATH")]
    pub from: Option<PathBuf>,

    /// Branch of the contribution being edited
    #[arg(long, value_name = "NAME", requires = "from")]
    pub edit_branch: Option<String>,

    /// Enable dev-mode affordances such as auto-fill
    #[arg(long)]
    pub dev_mode: bool,

    /// Overwrite an existing session
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Show steps, statuses and whether submit is enabled")]
pub struct StatusArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,

    /// Show every step's issues, not only those before the active step
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Make a step active")]
pub struct GotoArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Step id, e.g. details or seed-context
    #[arg(value_name = "STEP")]
    pub step: StepId,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Move to an adjacent step")]
pub struct StepArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Apply one typed intent to the submission")]
pub struct ApplyArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Intent as JSON, e.g. {"intent":"set_name","value":"Dana"}
    #[arg(long, value_name = "JSON", conflicts_with = "intent_file")]
    pub intent: Option<String>,

    /// File containing the intent JSON
    #[arg(long, value_name = "PATH", required_unless_present = "intent")]
    pub intent_file: Option<PathBuf>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Merge a YAML contribution document into the submission")]
pub struct ImportArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// YAML document to merge
    #[arg(value_name = "PATH")]
    pub file: PathBuf,
}

#[derive(Parser, Debug)]
#[command(about = "Write the YAML contribution document")]
pub struct ExportArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Output path (stdout when omitted)
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "List backend documents grouped by commit")]
pub struct DocumentsArgs {
    #[command(flatten)]
    pub session: SessionArg,

    #[command(flatten)]
    pub backend: BackendArgs,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Where selection text is read from: a local file or a backend document.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct DocumentSourceArgs {
    /// Local document file
    #[arg(long, value_name = "PATH")]
    pub document: Option<PathBuf>,

    /// Document name on the backend
    #[arg(long, value_name = "NAME")]
    pub filename: Option<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Find a seed example's stored context in a document")]
pub struct LocateArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Seed example number, as shown by status (1-based)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub example: u32,

    #[command(flatten)]
    pub source: DocumentSourceArgs,

    #[command(flatten)]
    pub backend: BackendArgs,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Use a document selection as a seed example's context")]
pub struct UseContextArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Seed example number, as shown by status (1-based)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub example: u32,

    #[command(flatten)]
    pub source: DocumentSourceArgs,

    /// Selection start, in characters
    #[arg(long, value_name = "OFFSET", requires = "end", conflicts_with = "text")]
    pub start: Option<usize>,

    /// Selection end (exclusive), in characters
    #[arg(long, value_name = "OFFSET", requires = "start")]
    pub end: Option<usize>,

    /// Select the first occurrence of this text instead of a range
    #[arg(long, value_name = "TEXT", required_unless_present = "start")]
    pub text: Option<String>,

    /// Repository URL for a local document
    #[arg(long, value_name = "URL")]
    pub repo: Option<String>,

    /// Commit SHA for a local document
    #[arg(long, value_name = "SHA")]
    pub commit: Option<String>,

    /// Extend the previous selection in this document (shift-click); an
    /// empty selection then reuses it instead of starting over
    #[arg(long)]
    pub extend: bool,

    #[command(flatten)]
    pub backend: BackendArgs,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Upload source documents and record their provenance")]
pub struct UploadArgs {
    #[command(flatten)]
    pub session: SessionArg,

    /// Files to upload
    #[arg(value_name = "PATH", required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub backend: BackendArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Submit the contribution when every step passes")]
pub struct SubmitArgs {
    #[command(flatten)]
    pub session: SessionArg,

    #[command(flatten)]
    pub backend: BackendArgs,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Discard the submission and start over")]
pub struct CancelArgs {
    #[command(flatten)]
    pub session: SessionArg,
}
