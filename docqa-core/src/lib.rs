//! # docqa-core
//!
//! Shared vocabulary for the docqa workspace: chat content types, the
//! [`CompletionModel`] port that model backends implement, and the
//! [`DocqaError`] taxonomy used across crates.
//!
//! This crate deliberately stays small — every other docqa crate depends on
//! it, so anything here is a workspace-wide commitment.

mod content;
mod error;
mod llm;

pub use content::{Message, Role};
pub use error::{DocqaError, Result};
pub use llm::CompletionModel;
