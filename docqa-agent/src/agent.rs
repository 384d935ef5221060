//! The agent orchestrator.

use std::collections::BTreeSet;
use std::sync::Arc;

use docqa_core::{CompletionModel, DocqaError, Message, Result};
use docqa_rag::Retriever;
use docqa_session::SessionStore;
use tracing::{debug, info};
use uuid::Uuid;

use crate::prompts::{self, RETRIEVE_KEYWORD, SYSTEM_PROMPT};

/// Default number of chunks retrieved per grounded request.
const DEFAULT_TOP_K: usize = 4;

/// The outcome of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentResponse {
    /// The generated answer.
    pub answer: String,
    /// Distinct source document ids behind the retrieved context. Empty
    /// when the query was answered directly.
    pub sources: BTreeSet<String>,
    /// The session the exchange was recorded under — the caller's id, or a
    /// freshly generated one.
    pub session_id: String,
}

/// The request orchestrator.
///
/// Each call to [`ask`](RagAgent::ask) runs one request to completion:
/// DECIDE (one classification call over the bare query), then optionally
/// RETRIEVE, then COMPOSE + GENERATE, then the all-or-nothing memory
/// update. A failure at any step aborts the request; memory is only
/// touched after a successful answer.
///
/// The agent itself is stateless — session history and the vector index
/// live in the injected components — so one instance serves concurrent
/// requests.
pub struct RagAgent {
    model: Arc<dyn CompletionModel>,
    retriever: Arc<Retriever>,
    sessions: Arc<SessionStore>,
    top_k: usize,
}

impl std::fmt::Debug for RagAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagAgent").field("top_k", &self.top_k).finish_non_exhaustive()
    }
}

impl RagAgent {
    /// Create a new [`RagAgentBuilder`].
    pub fn builder() -> RagAgentBuilder {
        RagAgentBuilder::default()
    }

    /// Answer one query, optionally under an existing session.
    ///
    /// # Errors
    ///
    /// Propagates [`DocqaError::Model`] from the classification or
    /// generation call and [`DocqaError::Retrieval`] from the retrieval
    /// path. On any error the session is left exactly as it was.
    pub async fn ask(&self, query: &str, session_id: Option<String>) -> Result<AgentResponse> {
        let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let history = self.sessions.history(&session_id).await;

        // DECIDE — the classifier sees only the bare query, never history.
        let decision = self
            .model
            .complete(&[Message::system(prompts::decision_prompt(query))])
            .await?;

        let mut context = None;
        let mut sources = BTreeSet::new();

        if decision == RETRIEVE_KEYWORD {
            let chunks = self
                .retriever
                .retrieve(query, self.top_k)
                .await
                .map_err(|e| DocqaError::Retrieval(e.to_string()))?;

            debug!(chunks = chunks.len(), "retrieval selected");
            if !chunks.is_empty() {
                let block = chunks
                    .iter()
                    .map(|c| c.chunk.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n\n");
                sources = chunks.iter().map(|c| c.chunk.source_id.clone()).collect();
                context = Some(block);
            }
        } else {
            // Fail-open: anything but the exact keyword answers directly.
            debug!(reply = %decision, "classifier chose direct answer");
        }

        // COMPOSE — instructions, history, context note (if any), query.
        let mut messages = vec![Message::system(SYSTEM_PROMPT)];
        messages.extend(history);
        if let Some(block) = context {
            messages.push(Message::system(format!("Relevant documents:\n{block}")));
        }
        messages.push(Message::user(query));

        // GENERATE
        let answer = self.model.complete(&messages).await?;

        // UPDATE_MEMORY — both turns land together, only on success.
        self.sessions.append_exchange(&session_id, query, &answer).await;

        info!(session_id = %session_id, sources = sources.len(), "request completed");
        Ok(AgentResponse { answer, sources, session_id })
    }
}

/// Builder for constructing a [`RagAgent`].
///
/// The model, retriever, and session store are required; `top_k` defaults
/// to 4.
#[derive(Default)]
pub struct RagAgentBuilder {
    model: Option<Arc<dyn CompletionModel>>,
    retriever: Option<Arc<Retriever>>,
    sessions: Option<Arc<SessionStore>>,
    top_k: Option<usize>,
}

impl RagAgentBuilder {
    /// Set the completion model backend.
    pub fn model(mut self, model: Arc<dyn CompletionModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the retriever over the ingested corpus.
    pub fn retriever(mut self, retriever: Arc<Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Set the session store.
    pub fn sessions(mut self, sessions: Arc<SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Set the number of chunks retrieved per grounded request.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Build the [`RagAgent`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`DocqaError::Config`] if a required field is missing.
    pub fn build(self) -> Result<RagAgent> {
        let model =
            self.model.ok_or_else(|| DocqaError::Config("model is required".to_string()))?;
        let retriever = self
            .retriever
            .ok_or_else(|| DocqaError::Config("retriever is required".to_string()))?;
        let sessions = self
            .sessions
            .ok_or_else(|| DocqaError::Config("sessions is required".to_string()))?;

        Ok(RagAgent { model, retriever, sessions, top_k: self.top_k.unwrap_or(DEFAULT_TOP_K) })
    }
}
