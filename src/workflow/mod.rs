//! Command workflows over a session directory.
//!
//! Each command loads the session, drives the wizard through one change and
//! writes the result back; read-only commands never touch the history.
mod apply;
mod context;
mod document;
mod init;
mod navigate;
mod selection;
mod status;
mod submit;

pub(crate) use apply::run_apply;
pub(crate) use document::{run_export, run_import};
pub(crate) use init::run_init;
pub(crate) use navigate::{run_back, run_goto, run_next};
pub(crate) use selection::{run_documents, run_locate, run_upload, run_use_context};
pub(crate) use status::run_status;
pub(crate) use submit::{run_cancel, run_submit};
