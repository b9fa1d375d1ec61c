//! Mapping highlighted document text to stored contexts and back.
//!
//! Forward capture follows selection-change notifications from a rendered
//! document view. Reverse restore finds a stored context in freshly rendered
//! text so it can be highlighted again.
use crate::model::MAX_CONTEXT_WORDS;
use crate::seed::count_words;
use serde::{Deserialize, Serialize};

/// Half-open range of character offsets into rendered text.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A selection-change notification from the document view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEvent {
    pub text: String,
    pub range: TextRange,
    /// Whether the selection anchor lies inside the content region.
    pub anchor_in_region: bool,
    /// Whether the selection focus lies inside the content region.
    pub focus_in_region: bool,
}

impl SelectionEvent {
    /// Build an event for a range inside `document`.
    pub fn within(document: &str, range: TextRange) -> Self {
        Self {
            text: extract(document, range).unwrap_or_default(),
            range,
            anchor_in_region: true,
            focus_in_region: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub range: TextRange,
    pub word_count: usize,
}

/// What the view should do after a selection change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionUpdate {
    Captured,
    /// Re-apply the previously captured range.
    Restore(TextRange),
    Ignored,
}

/// Tracks the candidate context for one document view.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct SelectionTracker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    candidate: Option<Candidate>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        self.candidate.as_ref()
    }

    pub fn on_selection_change(&mut self, event: SelectionEvent) -> SelectionUpdate {
        let inside = event.anchor_in_region && event.focus_in_region;
        if inside && !event.range.is_empty() && !event.text.is_empty() {
            let word_count = count_words(&event.text);
            self.candidate = Some(Candidate {
                text: event.text,
                range: event.range,
                word_count,
            });
            return SelectionUpdate::Captured;
        }
        match &self.candidate {
            Some(candidate) => SelectionUpdate::Restore(candidate.range),
            None => SelectionUpdate::Ignored,
        }
    }

    /// A primary click without the extend modifier starts over.
    pub fn on_pointer_down(&mut self, extend: bool) {
        if !extend {
            self.candidate = None;
        }
    }

    pub fn word_count(&self) -> usize {
        self.candidate.as_ref().map_or(0, |c| c.word_count)
    }

    /// Only an empty selection disables "use this selection".
    pub fn can_use_selection(&self) -> bool {
        self.word_count() > 0
    }

    pub fn over_limit(&self) -> bool {
        self.word_count() > MAX_CONTEXT_WORDS
    }

    /// Counter text shown beside the selection.
    pub fn word_count_label(&self) -> String {
        let words = self.word_count();
        if words > MAX_CONTEXT_WORDS {
            crate::seed::word_limit_message(words)
        } else {
            format!("{words} / {MAX_CONTEXT_WORDS} words")
        }
    }
}

/// The tracker of the last document a selection was made in.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ViewSelection {
    pub document: String,
    pub tracker: SelectionTracker,
}

impl ViewSelection {
    /// Tracker for `document`; switching documents starts from nothing.
    pub fn tracker_for(view: Option<&ViewSelection>, document: &str) -> SelectionTracker {
        view.filter(|view| view.document == document)
            .map(|view| view.tracker.clone())
            .unwrap_or_else(SelectionTracker::new)
    }
}

/// Find the first exact occurrence of `stored` in `document`.
pub fn locate(document: &str, stored: &str) -> Option<TextRange> {
    if stored.is_empty() {
        return None;
    }
    let byte_start = document.find(stored)?;
    let start = document[..byte_start].chars().count();
    Some(TextRange {
        start,
        end: start + stored.chars().count(),
    })
}

/// Text covered by `range`, or `None` when it runs past the document.
pub fn extract(document: &str, range: TextRange) -> Option<String> {
    if range.end < range.start || range.end > document.chars().count() {
        return None;
    }
    Some(
        document
            .chars()
            .skip(range.start)
            .take(range.len())
            .collect(),
    )
}
