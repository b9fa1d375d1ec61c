//! Session persistence between CLI invocations.
//!
//! A session directory holds the wizard snapshot (`session.json`) and an
//! append-only command log (`history.jsonl`).
mod history;
mod paths;
mod store;

pub use history::{append_history, load_history, HistoryEntry};
pub use paths::SessionPaths;
pub use store::{load_session, write_session, SessionFile};
