use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod adapter;
mod autofill;
mod cli;
mod config;
#[cfg(test)]
mod fixtures;
mod model;
mod notice;
mod provenance;
mod seed;
mod selection;
mod services;
mod session;
mod steps;
mod util;
mod wizard;
mod workflow;

use cli::{Command, RootArgs};

/// Log filter variable; defaults to warnings only.
const LOG_ENV: &str = "CWIZ_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = RootArgs::parse();
    match args.command {
        Command::Init(args) => workflow::run_init(&args),
        Command::Status(args) => workflow::run_status(&args),
        Command::Goto(args) => workflow::run_goto(&args),
        Command::Next(args) => workflow::run_next(&args),
        Command::Back(args) => workflow::run_back(&args),
        Command::Apply(args) => workflow::run_apply(&args),
        Command::Import(args) => workflow::run_import(&args),
        Command::Export(args) => workflow::run_export(&args),
        Command::Documents(args) => workflow::run_documents(&args),
        Command::Locate(args) => workflow::run_locate(&args),
        Command::UseContext(args) => workflow::run_use_context(&args),
        Command::Upload(args) => workflow::run_upload(&args),
        Command::Submit(args) => workflow::run_submit(&args),
        Command::Cancel(args) => workflow::run_cancel(&args),
    }
}
