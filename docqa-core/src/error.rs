//! Error taxonomy shared across the docqa crates.

use thiserror::Error;

/// Errors surfaced by docqa components.
///
/// The variants separate fatal startup conditions (`Config`, `NotReady`)
/// from per-request failures (`Model`, `Retrieval`): the former mean the
/// process must not serve traffic, the latter abort a single request and
/// leave no partial state behind.
#[derive(Debug, Error)]
pub enum DocqaError {
    /// Invalid or missing configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required artifact (e.g. the persisted vector index) is absent.
    /// Fatal at startup for any component that needs it.
    #[error("not ready: {0}")]
    NotReady(String),

    /// A remote model call failed. Aborts the current request only.
    #[error("model error ({provider}): {message}")]
    Model {
        /// The model backend that produced the error.
        provider: String,
        /// A human-readable description of the failure.
        message: String,
    },

    /// The retrieval path failed mid-request. Aborts the current request
    /// only; the underlying cause is flattened to a message so transport
    /// detail does not leak past the orchestrator boundary.
    #[error("retrieval failed: {0}")]
    Retrieval(String),
}

/// A convenience result type for docqa operations.
pub type Result<T> = std::result::Result<T, DocqaError>;
