//! # docqa-session
//!
//! Bounded per-session conversation history, held in memory for the
//! lifetime of the process.
//!
//! A session is an ordered log of user/assistant turns keyed by an opaque
//! session id. The log is append-only and trimmed from the front once it
//! exceeds `2 * max_turns` entries, so each session keeps its most recent
//! `max_turns` exchanges. Sessions are created lazily on first append and
//! are never explicitly destroyed.

use std::collections::HashMap;

use docqa_core::Message;
use tokio::sync::RwLock;

/// Default number of retained exchanges per session.
pub const DEFAULT_MAX_TURNS: usize = 5;

/// An in-memory store of per-session conversation history.
///
/// The store is the orchestrator's only shared mutable state. All mutation
/// happens under one write lock, which makes the two-turn
/// [`append_exchange`](SessionStore::append_exchange) atomic per session:
/// two concurrent requests against the same session id cannot interleave a
/// query turn with the other request's answer turn, and truncation can
/// never observe a half-appended exchange.
#[derive(Debug)]
pub struct SessionStore {
    max_turns: usize,
    sessions: RwLock<HashMap<String, Vec<Message>>>,
}

impl SessionStore {
    /// Create a store retaining `max_turns` exchanges per session.
    pub fn new(max_turns: usize) -> Self {
        Self { max_turns, sessions: RwLock::new(HashMap::new()) }
    }

    /// The prior turns of a session in chronological order.
    ///
    /// An unknown session id yields an empty history, never an error.
    pub async fn history(&self, session_id: &str) -> Vec<Message> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned().unwrap_or_default()
    }

    /// Append one turn to a session, creating the session if needed, then
    /// trim the log to its most recent `2 * max_turns` entries.
    pub async fn append(&self, session_id: &str, message: Message) {
        let mut sessions = self.sessions.write().await;
        let turns = sessions.entry(session_id.to_string()).or_default();
        turns.push(message);
        Self::truncate(turns, self.max_turns);
    }

    /// Append a full exchange — the user's query then the assistant's
    /// answer — under a single lock acquisition.
    ///
    /// The pair lands in the log together or not at all; a request that
    /// fails before its answer exists never calls this.
    pub async fn append_exchange(&self, session_id: &str, query: &str, answer: &str) {
        let mut sessions = self.sessions.write().await;
        let turns = sessions.entry(session_id.to_string()).or_default();
        turns.push(Message::user(query));
        turns.push(Message::assistant(answer));
        Self::truncate(turns, self.max_turns);
    }

    fn truncate(turns: &mut Vec<Message>, max_turns: usize) {
        let cap = max_turns * 2;
        if turns.len() > cap {
            turns.drain(..turns.len() - cap);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::Role;

    #[tokio::test]
    async fn unknown_session_is_empty() {
        let store = SessionStore::new(5);
        assert!(store.history("nope").await.is_empty());
    }

    #[tokio::test]
    async fn appends_preserve_order() {
        let store = SessionStore::new(5);
        store.append_exchange("s1", "Hi", "Hello!").await;
        store.append_exchange("s1", "How are you?", "Fine.").await;

        let turns = store.history("s1").await;
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0], Message::user("Hi"));
        assert_eq!(turns[1], Message::assistant("Hello!"));
        assert_eq!(turns[2], Message::user("How are you?"));
        assert_eq!(turns[3], Message::assistant("Fine."));
    }

    #[tokio::test]
    async fn log_is_bounded_and_keeps_most_recent() {
        let max_turns = 3;
        let store = SessionStore::new(max_turns);
        for i in 0..20 {
            store.append_exchange("s1", &format!("q{i}"), &format!("a{i}")).await;
        }

        let turns = store.history("s1").await;
        assert_eq!(turns.len(), 2 * max_turns);
        // The most recent exchanges survive, oldest first.
        assert_eq!(turns[0], Message::user("q17"));
        assert_eq!(turns[5], Message::assistant("a19"));
    }

    #[tokio::test]
    async fn single_turn_appends_are_bounded_too() {
        let store = SessionStore::new(2);
        for i in 0..9 {
            store.append("s1", Message::user(format!("m{i}"))).await;
        }

        let turns = store.history("s1").await;
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].content, "m5");
        assert!(turns.iter().all(|t| t.role == Role::User));
    }

    #[tokio::test]
    async fn sessions_do_not_interfere() {
        let store = SessionStore::new(5);
        store.append_exchange("a", "question a", "answer a").await;
        store.append_exchange("b", "question b", "answer b").await;

        assert_eq!(store.history("a").await[0].content, "question a");
        assert_eq!(store.history("b").await[0].content, "question b");
    }
}
