//! Workflow apply step: one typed intent per invocation.
use super::context::{with_session, Outcome};
use crate::cli::ApplyArgs;
use crate::notice::Notice;
use crate::util::read_text;
use crate::wizard::Intent;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ApplyReport<'a> {
    intent: &'static str,
    changed: bool,
    notices: &'a [Notice],
    submit_enabled: bool,
}

pub(crate) fn parse_intent(text: &str) -> Result<Intent> {
    serde_json::from_str(text).context("parse intent JSON")
}

pub fn run_apply(args: &ApplyArgs) -> Result<()> {
    let text = match (&args.intent, &args.intent_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_text(path)?,
        (None, None) => return Err(anyhow!("provide --intent or --intent-file")),
    };
    let intent = parse_intent(&text)?;
    with_session(&args.session.session, "apply", |ctx| {
        let name = intent.name();
        let applied = ctx.wizard.apply(intent)?;
        if args.json {
            let report = ApplyReport {
                intent: name,
                changed: applied.changed,
                notices: &applied.notices,
                submit_enabled: ctx.wizard.submit_enabled(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("serialize apply report")?
            );
        } else if applied.changed {
            println!("{name}: applied");
        } else {
            println!("{name}: no change");
        }
        let outcome = if applied.changed {
            Outcome::changed(applied.notices)
        } else {
            Outcome::unchanged(applied.notices)
        };
        Ok(outcome.with_intent(name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_parse_from_tagged_json() {
        let intent = parse_intent(r#"{"intent":"set_email","value":"me@example.com"}"#)
            .expect("set_email");
        assert_eq!(
            intent,
            Intent::SetEmail {
                value: "me@example.com".to_string()
            }
        );
        let intent = parse_intent(
            r#"{"intent":"set_attribution","field":"license_work","value":"CC-BY-4.0"}"#,
        )
        .expect("set_attribution");
        assert!(matches!(&intent, Intent::SetAttribution { value, .. } if value == "CC-BY-4.0"));
        let json = serde_json::to_value(&intent).expect("serialize intent");
        assert_eq!(json["field"], "license_work");
        assert_eq!(
            parse_intent(r#"{"intent":"add_seed_example"}"#).expect("unit"),
            Intent::AddSeedExample
        );
    }

    #[test]
    fn skill_pair_index_defaults_to_zero() {
        let intent = parse_intent(r#"{"intent":"answer_blurred","example":2}"#).expect("blur");
        assert_eq!(
            intent,
            Intent::AnswerBlurred {
                example: 2,
                pair: 0
            }
        );
    }

    #[test]
    fn unknown_intent_is_rejected() {
        let err = parse_intent(r#"{"intent":"launch"}"#).expect_err("unknown");
        assert!(format!("{err:#}").starts_with("parse intent JSON"));
    }
}
