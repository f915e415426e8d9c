//! JSON body posted to the query endpoint.

use serde::Serialize;
use wikibot_core::Turn;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    pub conversation_history: Vec<HistoryEntry<'a>>,
}

/// A transcript turn as the endpoint expects it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HistoryEntry<'a> {
    pub content: &'a str,
    #[serde(rename = "isUser")]
    pub is_user: bool,
    pub timestamp: String,
}

impl<'a> From<&'a Turn> for HistoryEntry<'a> {
    fn from(turn: &'a Turn) -> Self {
        Self {
            content: &turn.content,
            is_user: turn.is_user(),
            timestamp: turn.display_time(),
        }
    }
}

impl<'a> QueryRequest<'a> {
    #[must_use]
    pub fn new(query: &'a str, history: &'a [Turn]) -> Self {
        Self {
            query,
            conversation_history: history.iter().map(HistoryEntry::from).collect(),
        }
    }
}
