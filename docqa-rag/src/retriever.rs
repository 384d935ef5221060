//! Query-time retrieval over a persisted vector index.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error};

use crate::document::RetrievedChunk;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::index::VectorIndex;

/// Retrieves the chunks nearest to a query from a loaded [`VectorIndex`].
///
/// Constructed once per process. Loading fails fast when the index has not
/// been ingested yet — a missing index is a deployment precondition, not a
/// per-request condition. The index is read-only after load, so a
/// `Retriever` can be shared across concurrent requests without locking.
pub struct Retriever {
    index: VectorIndex,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever").field("len", &self.index.len()).finish_non_exhaustive()
    }
}

impl Retriever {
    /// Wrap an already-built index.
    pub fn new(index: VectorIndex, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { index, embedder }
    }

    /// Load the persisted index from `index_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotReady`](crate::RagError::NotReady) when the
    /// index artifacts are absent or unreadable — run ingestion first.
    pub fn load(index_dir: &Path, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let index = VectorIndex::load(index_dir)?;
        debug!(chunks = index.len(), dir = %index_dir.display(), "loaded vector index");
        Ok(Self::new(index, embedder))
    }

    /// Number of chunks in the loaded index.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the loaded index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Return up to `top_k` chunks nearest to `query`, ascending by
    /// distance.
    ///
    /// A `top_k` larger than the index yields fewer results — never an
    /// error, never padding.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let embedding = self.embedder.embed(query).await.inspect_err(|e| {
            error!(error = %e, "query embedding failed");
        })?;

        let results = self.index.search(&embedding, top_k)?;
        debug!(results = results.len(), top_k, "retrieved chunks");
        Ok(results
            .into_iter()
            .map(|(chunk, distance)| RetrievedChunk { chunk, distance })
            .collect())
    }
}
