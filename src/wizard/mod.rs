//! Wizard controller.
//!
//! Owns the flattened step ordering, the active position and the submission
//! being edited. Statuses are derived from data on every call; the controller
//! only decides which of them the user gets to see.
mod intent;
mod requests;

pub use intent::Intent;
pub use requests::{RequestKind, RequestTicket, RequestTracker};

use crate::adapter::{export_document, import_document, ContributionDocument};
use crate::model::{Contributor, SubmissionData, SubmissionKind, UserIdentity, WizardMode};
use crate::steps::{
    aggregate, build_steps, compute_status, step_issues, StepId, StepNode, StepStatus,
};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position the wizard opens on.
///
/// Fixed product default: the first flattened entry is a landing step that
/// contributors skip on entry.
pub const INITIAL_ACTIVE_INDEX: usize = 1;

/// One entry of the flattened, depth-first step ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlatStep {
    pub id: StepId,
    pub parent: Option<StepId>,
}

/// A step as presented to the contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub index: usize,
    pub id: StepId,
    pub name: &'static str,
    pub parent: Option<StepId>,
    pub computed: StepStatus,
    pub displayed: StepStatus,
    pub active: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

/// Navigation targets that do not exist in the current layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    NotInLayout(StepId),
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::NotInLayout(id) => {
                write!(f, "step {id} is not part of this wizard")
            }
            NavigationError::IndexOutOfRange { index, len } => {
                write!(f, "step index {index} out of range (0..{len})")
            }
        }
    }
}

impl std::error::Error for NavigationError {}

/// Persisted form of a wizard between CLI invocations.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct WizardSnapshot {
    pub mode: WizardMode,
    pub active_index: usize,
    pub data: SubmissionData,
    #[serde(default)]
    pub identity: Option<UserIdentity>,
    #[serde(default)]
    pub dev_mode: bool,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    mode: WizardMode,
    steps: Vec<StepNode>,
    flat: Vec<FlatStep>,
    active_index: usize,
    data: SubmissionData,
    identity: Option<UserIdentity>,
    dev_mode: bool,
    requests: RequestTracker,
}

fn flatten(steps: &[StepNode]) -> Vec<FlatStep> {
    let mut flat = Vec::new();
    for node in steps {
        flat.push(FlatStep {
            id: node.id(),
            parent: None,
        });
        for child in node.children() {
            flat.push(FlatStep {
                id: *child,
                parent: Some(node.id()),
            });
        }
    }
    flat
}

/// Fill contributor fields from the session only while they are still empty.
pub fn apply_session_identity(contributor: &mut Contributor, identity: &UserIdentity) -> bool {
    let mut changed = false;
    if contributor.email.is_empty() && !identity.email.is_empty() {
        contributor.email = identity.email.clone();
        changed = true;
    }
    if contributor.name.is_empty() && !identity.name.is_empty() {
        contributor.name = identity.name.clone();
        changed = true;
    }
    if contributor.login.is_empty() && !identity.login.is_empty() {
        contributor.login = identity.login.clone();
        changed = true;
    }
    changed
}

impl Wizard {
    /// Start a fresh submission; the identity is injected, never looked up.
    pub fn new(kind: SubmissionKind, mode: WizardMode, identity: Option<UserIdentity>) -> Self {
        Self::with_data(SubmissionData::fresh(kind), mode, identity)
    }

    /// Open an existing submission, e.g. one being edited.
    pub fn with_data(
        mut data: SubmissionData,
        mode: WizardMode,
        identity: Option<UserIdentity>,
    ) -> Self {
        if let Some(identity) = &identity {
            apply_session_identity(&mut data.contributor, identity);
        }
        Self::build(data, mode, identity)
    }

    /// Open a previously submitted contribution for editing.
    pub fn from_edit(
        doc: &ContributionDocument,
        mode: WizardMode,
        identity: Option<UserIdentity>,
    ) -> Result<Self> {
        let data = import_document(doc)?;
        Ok(Self::with_data(data, mode, identity))
    }

    fn build(data: SubmissionData, mode: WizardMode, identity: Option<UserIdentity>) -> Self {
        let steps = build_steps(data.kind(), mode);
        let flat = flatten(&steps);
        Self {
            mode,
            steps,
            flat,
            active_index: INITIAL_ACTIVE_INDEX,
            data,
            identity,
            dev_mode: false,
            requests: RequestTracker::new(),
        }
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn restore(snapshot: WizardSnapshot) -> Result<Self> {
        let mut wizard = Self::build(snapshot.data, snapshot.mode, snapshot.identity)
            .with_dev_mode(snapshot.dev_mode);
        wizard.set_active_index(snapshot.active_index)?;
        Ok(wizard)
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            mode: self.mode,
            active_index: self.active_index,
            data: self.data.clone(),
            identity: self.identity.clone(),
            dev_mode: self.dev_mode,
        }
    }

    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    pub fn kind(&self) -> SubmissionKind {
        self.data.kind()
    }

    pub fn data(&self) -> &SubmissionData {
        &self.data
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    #[cfg(test)]
    pub fn flattened(&self) -> &[FlatStep] {
        &self.flat
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_step(&self) -> StepId {
        self.flat[self.active_index].id
    }

    pub fn requests_mut(&mut self) -> &mut RequestTracker {
        &mut self.requests
    }

    pub fn index_of(&self, step: StepId) -> Option<usize> {
        self.flat.iter().position(|entry| entry.id == step)
    }

    fn set_active_index(&mut self, index: usize) -> Result<(), NavigationError> {
        if index >= self.flat.len() {
            return Err(NavigationError::IndexOutOfRange {
                index,
                len: self.flat.len(),
            });
        }
        self.active_index = index;
        Ok(())
    }

    pub fn navigate_to(&mut self, step: StepId) -> Result<(), NavigationError> {
        let index = self.index_of(step).ok_or(NavigationError::NotInLayout(step))?;
        self.set_active_index(index)
    }

    /// Move forward one entry; stays put on the last one.
    pub fn next(&mut self) -> StepId {
        if self.active_index + 1 < self.flat.len() {
            self.active_index += 1;
        }
        self.active_step()
    }

    pub fn back(&mut self) -> StepId {
        self.active_index = self.active_index.saturating_sub(1);
        self.active_step()
    }

    /// Drop everything typed so far and start over; nothing is persisted.
    pub fn cancel(&mut self) {
        self.requests.teardown();
        self.data = SubmissionData::fresh(self.data.kind());
        if let Some(identity) = &self.identity {
            apply_session_identity(&mut self.data.contributor, identity);
        }
        self.active_index = INITIAL_ACTIVE_INDEX;
    }

    /// Status derived from current data; parents aggregate their children.
    pub fn computed_status(&self, step: StepId) -> StepStatus {
        let node = self.steps.iter().find(|node| node.id() == step);
        match node {
            Some(StepNode::Expandable { children, .. }) => {
                let statuses: Vec<StepStatus> = children
                    .iter()
                    .map(|child| compute_status(*child, &self.data, self.mode))
                    .collect();
                aggregate(&statuses)
            }
            _ => compute_status(step, &self.data, self.mode),
        }
    }

    /// Errors only show for steps strictly before the active one.
    pub fn displayed_status(&self, step: StepId) -> StepStatus {
        match self.index_of(step) {
            Some(index) if index < self.active_index => self.computed_status(step),
            _ => StepStatus::Default,
        }
    }

    /// Submission is allowed iff no step at any depth computes to an error.
    pub fn submit_enabled(&self) -> bool {
        self.flat
            .iter()
            .all(|entry| self.computed_status(entry.id) != StepStatus::Error)
    }

    pub fn step_views(&self) -> Vec<StepView> {
        self.flat
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let computed = self.computed_status(entry.id);
                StepView {
                    index,
                    id: entry.id,
                    name: entry.id.display_name(),
                    parent: entry.parent,
                    computed,
                    displayed: self.displayed_status(entry.id),
                    active: index == self.active_index,
                    issues: if computed == StepStatus::Error {
                        step_issues(entry.id, &self.data, self.mode)
                    } else {
                        Vec::new()
                    },
                }
            })
            .collect()
    }

    /// Project the submission for the submit call, refusing when gated.
    pub fn prepare_submission(&self) -> Result<ContributionDocument> {
        if !self.submit_enabled() {
            let failing: Vec<&str> = self
                .flat
                .iter()
                .filter(|entry| self.computed_status(entry.id) == StepStatus::Error)
                .map(|entry| entry.id.as_str())
                .collect();
            return Err(anyhow!(
                "submission blocked: steps with errors: {}",
                failing.join(", ")
            ));
        }
        Ok(export_document(&self.data))
    }

    /// After a successful submit the wizard starts over with a fresh default.
    pub fn complete_submission(&mut self) {
        self.cancel();
    }

    pub fn begin_identity_lookup(&mut self) -> RequestTicket {
        self.requests.begin(RequestKind::Identity)
    }

    /// Apply a session identity if its lookup is still relevant.
    pub fn resolve_identity(&mut self, ticket: &RequestTicket, identity: UserIdentity) -> bool {
        if !self.requests.finish(ticket) {
            return false;
        }
        apply_session_identity(&mut self.data.contributor, &identity);
        self.identity = Some(identity);
        true
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
