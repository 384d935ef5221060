//! Error types for the `docqa-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the retrieval engine.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The persisted index is absent or unreadable. Run ingestion first.
    #[error("index not ready: {0}")]
    NotReady(String),

    /// The index and its metadata disagree, or vector dimensions do not
    /// match. Signals corrupted or mismatched artifacts; never silently
    /// truncated or padded.
    #[error("integrity error: {0}")]
    Integrity(String),

    /// The embedding service failed for a batch.
    #[error("embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A filesystem operation failed.
    #[error("io error at {}: {source}", .path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An artifact could not be encoded for persistence.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A convenience result type for retrieval-engine operations.
pub type Result<T> = std::result::Result<T, RagError>;
