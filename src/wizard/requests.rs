//! Relevance tracking for in-flight asynchronous calls.
//!
//! Each call takes a ticket when it starts. Starting another call of the same
//! kind, cancelling, or tearing down the owner invalidates older tickets, and a
//! completion presenting a stale ticket must be dropped.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Identity,
    DocumentContent,
    DocumentListing,
    Upload,
    Submission,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Identity => "identity",
            RequestKind::DocumentContent => "document_content",
            RequestKind::DocumentListing => "document_listing",
            RequestKind::Upload => "upload",
            RequestKind::Submission => "submission",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    kind: RequestKind,
    generation: u64,
}

impl RequestTicket {
    #[cfg(test)]
    pub fn kind(&self) -> RequestKind {
        self.kind
    }
}

#[derive(Debug, Default, Clone)]
pub struct RequestTracker {
    next_generation: u64,
    live: BTreeMap<RequestKind, u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a call, superseding any outstanding call of the same kind.
    pub fn begin(&mut self, kind: RequestKind) -> RequestTicket {
        self.next_generation += 1;
        self.live.insert(kind, self.next_generation);
        RequestTicket {
            kind,
            generation: self.next_generation,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.live.get(&ticket.kind) == Some(&ticket.generation)
    }

    /// Settle a call; returns whether its result may be applied.
    pub fn finish(&mut self, ticket: &RequestTicket) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(kind = %ticket.kind, "discarding stale completion");
            return false;
        }
        self.live.remove(&ticket.kind);
        true
    }

    pub fn cancel(&mut self, kind: RequestKind) {
        self.live.remove(&kind);
    }

    /// Invalidate everything, as when the owning view goes away.
    pub fn teardown(&mut self) {
        self.live.clear();
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.live.len()
    }
}
