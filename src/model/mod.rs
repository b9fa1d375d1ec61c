//! Submission data model and fixed policy constants.
//!
//! The model is plain serde data so the session store, the YAML adapter and the
//! wizard reducer all share one shape. Step status is never stored here; it is
//! derived on demand by `steps`.

/// Current schema version for `session.json`.
pub const SESSION_SCHEMA_VERSION: u32 = 1;
/// Current schema version for `history.jsonl` entries.
pub const HISTORY_SCHEMA_VERSION: u32 = 1;

/// Baseline seed examples created for every new submission.
pub const BASELINE_SEED_EXAMPLES: usize = 5;
/// Baseline, required question/answer pairs per knowledge seed example.
pub const BASELINE_QA_PAIRS: usize = 3;
/// Input ceiling for questions and answers, in characters.
pub const MAX_QA_CHARS: usize = 250;
/// Advisory word limit for a seed example context.
pub const MAX_CONTEXT_WORDS: usize = 500;
/// Upper bound for the submission summary, in characters.
pub const MAX_SUMMARY_CHARS: usize = 60;
/// Minimum length of a skill outline, in characters.
pub const MIN_OUTLINE_CHARS: usize = 40;

mod types;

pub use types::*;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
