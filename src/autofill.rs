//! Sample contribution used by the dev-mode auto-fill action.
use crate::model::{
    Attribution, Contributor, DocumentProvenance, SubmissionData, SubmissionKind,
};

const SAMPLE_CONTEXT: &str = "Phoenix is a constellation in the southern sky. It was named \
after the mythical bird and first appeared on a celestial globe in 1597.";

const SAMPLE_PAIRS: [(&str, &str); 3] = [
    (
        "What is Phoenix?",
        "Phoenix is a constellation in the southern sky.",
    ),
    (
        "What is the constellation named after?",
        "It is named after the mythical phoenix bird.",
    ),
    (
        "When did Phoenix first appear on a celestial globe?",
        "It first appeared on a celestial globe in 1597.",
    ),
];

const SAMPLE_SKILL: [(&str, &str); 5] = [
    ("Write a couplet about rain.", "The rain came down upon the town, and washed the dusty rooftops brown."),
    ("Write a couplet about the sea.", "The sea is wide and deep and blue, it holds a thousand secrets true."),
    ("Write a couplet about winter.", "The winter wind is sharp and cold, it wraps the hills in white and gold."),
    ("Write a couplet about a cat.", "The cat lay curled upon the mat, content and round and warm and fat."),
    ("Write a couplet about the moon.", "The moon rose high above the dune, and hummed a soft and silver tune."),
];

/// A submission that passes every step, for demos and manual testing.
pub fn sample_submission(kind: SubmissionKind) -> SubmissionData {
    let mut data = SubmissionData::fresh(kind);
    data.contributor = Contributor {
        email: "helpful-contributor@example.com".to_string(),
        name: "Helpful Contributor".to_string(),
        login: String::new(),
    };
    data.attribution = Attribution {
        title_work: "Phoenix (constellation)".to_string(),
        link_work: "https://en.wikipedia.org/wiki/Phoenix_(constellation)".to_string(),
        revision: "https://en.wikipedia.org/w/index.php?title=Phoenix_(constellation)&oldid=1237187151".to_string(),
        license_work: "CC-BY-SA-4.0".to_string(),
        creators: "Wikipedia Authors".to_string(),
    };
    match kind {
        SubmissionKind::Knowledge => {
            data.submission_summary = "Information about the Phoenix constellation".to_string();
            data.file_path = "science/astronomy/constellations/phoenix".to_string();
            if let Some(fields) = data.knowledge_mut() {
                fields.domain = "astronomy".to_string();
                fields.document_outline =
                    "Information about the Phoenix constellation including its history".to_string();
                fields.provenance = DocumentProvenance {
                    repository_url: "https://github.com/example/knowledge-docs".to_string(),
                    commit: "0000000000000000000000000000000000000000".to_string(),
                    document_names: vec!["phoenix.md".to_string()],
                };
                for example in &mut fields.seed_examples {
                    example.context = SAMPLE_CONTEXT.to_string();
                    for (pair, (question, answer)) in
                        example.question_and_answers.iter_mut().zip(SAMPLE_PAIRS)
                    {
                        pair.question = question.to_string();
                        pair.answer = answer.to_string();
                    }
                }
            }
        }
        SubmissionKind::Skill => {
            data.submission_summary = "Writing rhyming couplets".to_string();
            data.file_path = "writing/poetry/couplets".to_string();
            *data.document_outline_mut() =
                "Teach the model to write a rhyming couplet about a requested topic".to_string();
            if let Some(fields) = data.skill_mut() {
                for (example, (question, answer)) in
                    fields.seed_examples.iter_mut().zip(SAMPLE_SKILL)
                {
                    example.question_and_answer.question = question.to_string();
                    example.question_and_answer.answer = answer.to_string();
                }
            }
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WizardMode;
    use crate::steps::{compute_status, StepId, StepStatus};

    #[test]
    fn sample_passes_every_step() {
        for kind in [SubmissionKind::Knowledge, SubmissionKind::Skill] {
            let data = sample_submission(kind);
            for mode in [WizardMode::Native, WizardMode::Github] {
                for step in [StepId::Details, StepId::Attributions, StepId::SeedData] {
                    assert_eq!(
                        compute_status(step, &data, mode),
                        StepStatus::Success,
                        "{kind} {mode} {step}"
                    );
                }
            }
        }
    }
}
