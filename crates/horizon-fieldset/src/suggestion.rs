//! Asynchronous suggestion retrieval for searchable inputs.
//!
//! The only asynchronous operation in the library: a host-supplied
//! [`SuggestionCreator`] may answer a query immediately or report that
//! results are pending. Each request carries a fresh [`CancellationToken`];
//! a newer keystroke cancels (without awaiting) the previous token, and
//! delivery is committed only when both the token and the widget's request
//! generation still match — stale responses are silently dropped.
//!
//! While a request is pending, the widget's selection slot holds the token
//! itself instead of option data, so a rendering layer can show a pending
//! indicator without separate boolean state.

use horizon_fieldset_core::CancellationToken;

use crate::consolidate::Properties;
use crate::model::{SelectOption, SelectionSpec};

/// One suggestion request.
pub struct SuggestionQuery<'a> {
    /// The representation the user has typed so far.
    pub query: &'a str,
    /// The fully consolidated widget properties at request time.
    pub properties: &'a Properties,
    /// Cancellation handle owned by this request. Providers answering
    /// asynchronously should keep a clone and stop working once cancelled.
    pub token: CancellationToken,
}

/// A suggestion provider's answer.
pub enum Suggestions {
    /// Results are available immediately.
    Ready(SelectionSpec),
    /// Results will be delivered later through
    /// `TextInput::commit_suggestions` with the query's token.
    Pending,
}

/// A host-supplied suggestion provider.
pub trait SuggestionCreator: Send + Sync {
    /// Answer a query, immediately or later.
    fn create(&self, query: SuggestionQuery<'_>) -> Suggestions;
}

impl<F> SuggestionCreator for F
where
    F: Fn(SuggestionQuery<'_>) -> Suggestions + Send + Sync,
{
    fn create(&self, query: SuggestionQuery<'_>) -> Suggestions {
        self(query)
    }
}

/// The widget's selection slot: either resolved option data or the token of
/// an in-flight request.
#[derive(Debug, Clone, Default)]
pub enum SelectionSlot {
    /// No selection data at all.
    #[default]
    Empty,
    /// Resolved, normalized options.
    Resolved(Vec<SelectOption>),
    /// A request is in flight; the token doubles as the pending indicator.
    Fetching(CancellationToken),
}

impl SelectionSlot {
    /// Whether a request is currently in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, SelectionSlot::Fetching(_))
    }

    /// The resolved options, if any.
    pub fn options(&self) -> Option<&[SelectOption]> {
        match self {
            SelectionSlot::Resolved(options) => Some(options),
            _ => None,
        }
    }

    /// Cancel the in-flight request, if any, and forget it.
    ///
    /// Intentional cancellation is silent; any late delivery for the token
    /// will be dropped by the generation check.
    pub fn cancel_pending(&mut self) {
        if let SelectionSlot::Fetching(token) = self {
            if !token.is_cancelled() {
                token.cancel();
            }
            *self = SelectionSlot::Empty;
        }
    }
}

/// Whether a suggestion matches a search query.
///
/// Every whitespace-separated query word must occur in the suggestion,
/// case-insensitively. An empty query matches nothing.
pub fn suggestion_matches(suggestion: &str, query: &str) -> bool {
    if query.trim().is_empty() {
        return false;
    }
    let suggestion = suggestion.to_lowercase();
    query
        .split_whitespace()
        .all(|part| suggestion.contains(&part.to_lowercase()))
}
