//! # docqa-agent
//!
//! The per-request orchestration loop: decide whether a query needs the
//! document corpus, retrieve context when it does, compose the final
//! prompt from system instructions + session history + context + query,
//! generate the answer, and record the exchange in session memory.

mod agent;
pub mod prompts;

pub use agent::{AgentResponse, RagAgent, RagAgentBuilder};
