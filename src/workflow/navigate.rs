//! Step navigation commands.
use super::context::{with_session, Outcome};
use crate::cli::{GotoArgs, StepArgs};
use crate::wizard::Wizard;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ActiveStep {
    index: usize,
    id: String,
    name: &'static str,
}

fn print_active(wizard: &Wizard, json: bool) -> Result<()> {
    let step = wizard.active_step();
    if json {
        let active = ActiveStep {
            index: wizard.active_index(),
            id: step.to_string(),
            name: step.display_name(),
        };
        println!(
            "{}",
            serde_json::to_string_pretty(&active).context("serialize active step")?
        );
    } else {
        println!("active step: {} ({})", step.display_name(), step);
    }
    Ok(())
}

pub fn run_goto(args: &GotoArgs) -> Result<()> {
    with_session(&args.session.session, "goto", |ctx| {
        ctx.wizard.navigate_to(args.step)?;
        print_active(&ctx.wizard, args.json)?;
        Ok(Outcome::changed(Vec::new()))
    })
}

pub fn run_next(args: &StepArgs) -> Result<()> {
    with_session(&args.session.session, "next", |ctx| {
        let before = ctx.wizard.active_index();
        ctx.wizard.next();
        print_active(&ctx.wizard, args.json)?;
        Ok(moved(before, ctx.wizard.active_index()))
    })
}

pub fn run_back(args: &StepArgs) -> Result<()> {
    with_session(&args.session.session, "back", |ctx| {
        let before = ctx.wizard.active_index();
        ctx.wizard.back();
        print_active(&ctx.wizard, args.json)?;
        Ok(moved(before, ctx.wizard.active_index()))
    })
}

fn moved(before: usize, after: usize) -> Outcome {
    if before == after {
        Outcome::unchanged(Vec::new())
    } else {
        Outcome::changed(Vec::new())
    }
}
