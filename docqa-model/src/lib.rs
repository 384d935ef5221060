//! # docqa-model
//!
//! Completion model backends for docqa.
//!
//! - [`OpenAIChatModel`] — the OpenAI chat completions API (or any
//!   OpenAI-compatible endpoint) behind the [`docqa_core::CompletionModel`]
//!   port. One synchronous exchange per call, temperature pinned by
//!   configuration.
//! - [`MockLlm`] — a scripted model for tests: replays queued replies and
//!   records every message sequence it receives.

pub mod mock;
pub mod openai;

pub use mock::MockLlm;
pub use openai::{OpenAIChatConfig, OpenAIChatModel};
