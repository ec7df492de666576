//! Session state: the one mutable store in the client.
//!
//! Holds the current index id, the latest query result, the ingestion
//! status, a bounded query history, and the view state. A new result
//! replaces the previous one wholesale — readers never observe a partially
//! updated result — and a failed query leaves everything untouched.

use chrono::{DateTime, Utc};

use crate::types::{QueryResult, SessionProcessingStatus};
use crate::view::ViewState;

/// Maximum number of past queries retained.
const MAX_HISTORY: usize = 20;

/// One past query and its result, most recent first in the history list.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub query: String,
    pub result: QueryResult,
    pub timestamp: DateTime<Utc>,
}

/// All client-side state for one session against the backend.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    index_id: Option<String>,
    result: Option<QueryResult>,
    processing: Option<SessionProcessingStatus>,
    history: Vec<HistoryEntry>,
    pub view: ViewState,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The opaque index/session identifier, once an upload completed.
    pub fn index_id(&self) -> Option<&str> {
        self.index_id.as_deref()
    }

    pub fn set_index_id(&mut self, index_id: impl Into<String>) {
        self.index_id = Some(index_id.into());
    }

    /// The current query result, if any.
    pub fn result(&self) -> Option<&QueryResult> {
        self.result.as_ref()
    }

    /// Latest ingestion status snapshot.
    pub fn processing(&self) -> Option<&SessionProcessingStatus> {
        self.processing.as_ref()
    }

    pub fn set_processing(&mut self, status: SessionProcessingStatus) {
        self.processing = Some(status);
    }

    /// Query history, most recent first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Install a new query result.
    ///
    /// The result replaces the previous one wholesale, is prepended to the
    /// history (bounded at 20 entries), and lands the view on the answer
    /// tab with focus cleared.
    pub fn set_result(&mut self, result: QueryResult) {
        self.history.insert(
            0,
            HistoryEntry {
                query: result.query.clone(),
                result: result.clone(),
                timestamp: Utc::now(),
            },
        );
        self.history.truncate(MAX_HISTORY);
        self.result = Some(result);
        self.view.on_new_result();
    }

    /// Clear the session: discard the result, history, status and index id,
    /// and return the view to its initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Tab;
    use pretty_assertions::assert_eq;

    fn result(query: &str) -> QueryResult {
        QueryResult {
            query: query.to_string(),
            answer: format!("Answer for {query}."),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = SessionState::new();
        assert_eq!(session.index_id(), None);
        assert!(session.result().is_none());
        assert!(session.history().is_empty());
        assert_eq!(session.view.tab, Tab::Upload);
    }

    #[test]
    fn test_set_result_replaces_wholesale_and_lands_on_answer() {
        let mut session = SessionState::new();
        session.set_result(result("first"));
        session.set_result(result("second"));

        assert_eq!(session.result().unwrap().query, "second");
        assert_eq!(session.view.tab, Tab::Answer);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].query, "second");
        assert_eq!(session.history()[1].query, "first");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut session = SessionState::new();
        for i in 0..30 {
            session.set_result(result(&format!("query {i}")));
        }
        assert_eq!(session.history().len(), 20);
        assert_eq!(session.history()[0].query, "query 29");
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let mut session = SessionState::new();
        session.set_index_id("abc123");
        session.set_result(result("anything"));
        session.reset();

        assert_eq!(session.index_id(), None);
        assert!(session.result().is_none());
        assert!(session.history().is_empty());
        assert_eq!(session.view.tab, Tab::Upload);
    }
}
