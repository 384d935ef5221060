//! The offline ingestion pipeline: corpus directory → persisted index.
//!
//! # Example
//!
//! ```rust,ignore
//! use docqa_rag::{IngestionPipeline, RagConfig};
//!
//! let pipeline = IngestionPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .build()?;
//!
//! let report = pipeline.ingest(&corpus_dir, &index_dir).await?;
//! println!("{} documents, {} chunks", report.documents, report.chunks);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::chunking::{Chunker, WordWindowChunker};
use crate::config::RagConfig;
use crate::document::{Chunk, Document};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// Counts reported by a completed ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Eligible documents read from the corpus.
    pub documents: usize,
    /// Chunks embedded and indexed.
    pub chunks: usize,
}

/// The ingestion pipeline: enumerate → chunk → embed → build → persist.
///
/// Construct one via [`IngestionPipeline::builder()`]. Ingestion is an
/// offline, single-writer batch job; runs against the same target path must
/// be serialized by the operator.
pub struct IngestionPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    chunker: Arc<dyn Chunker>,
}

impl std::fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionPipeline").finish_non_exhaustive()
    }
}

impl IngestionPipeline {
    /// Create a new [`IngestionPipelineBuilder`].
    pub fn builder() -> IngestionPipelineBuilder {
        IngestionPipelineBuilder::default()
    }

    /// Ingest a corpus directory and persist the resulting index to
    /// `index_dir`.
    ///
    /// Eligible documents are the directory's immediate `.txt` entries,
    /// visited in file-name order; everything else is skipped silently.
    /// All chunks across the corpus are embedded in a single batch call —
    /// one round trip rather than one per chunk. An embedding failure
    /// aborts the run before anything is written, so no partial index is
    /// ever persisted. An empty corpus is not an error: it produces an
    /// empty, still-loadable index.
    pub async fn ingest(&self, corpus_dir: &Path, index_dir: &Path) -> Result<IngestReport> {
        let documents = load_documents(corpus_dir)?;

        let mut records: Vec<Chunk> = Vec::new();
        for document in &documents {
            records.extend(self.chunker.chunk(document));
        }
        info!(documents = documents.len(), chunks = records.len(), "chunked corpus");

        let texts: Vec<&str> = records.iter().map(|c| c.text.as_str()).collect();
        let vectors = self.embedder.embed_batch(&texts).await.inspect_err(|e| {
            error!(error = %e, "embedding failed, aborting ingestion");
        })?;

        let index = VectorIndex::build(vectors, records)?;
        index.persist(index_dir)?;

        info!(chunks = index.len(), dir = %index_dir.display(), "vector index persisted");
        Ok(IngestReport { documents: documents.len(), chunks: index.len() })
    }
}

/// Read the corpus: immediate children of `dir` with a `.txt` extension, in
/// file-name order. The file name (extension included) becomes the citation
/// source id.
fn load_documents(dir: &Path) -> Result<Vec<Document>> {
    let entries =
        fs::read_dir(dir).map_err(|e| RagError::Io { path: dir.to_path_buf(), source: e })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| RagError::Io { path: dir.to_path_buf(), source: e })?;
        paths.push(entry.path());
    }
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
            debug!(path = %path.display(), "skipping non-text corpus entry");
            continue;
        }
        let Some(source_id) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let text = fs::read_to_string(&path)
            .map_err(|e| RagError::Io { path: path.clone(), source: e })?;
        documents.push(Document { source_id: source_id.to_string(), text });
    }
    Ok(documents)
}

/// Builder for constructing an [`IngestionPipeline`].
///
/// `config` and `embedding_provider` are required; the chunker defaults to
/// a [`WordWindowChunker`] derived from the config.
#[derive(Default)]
pub struct IngestionPipelineBuilder {
    config: Option<RagConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl IngestionPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(provider);
        self
    }

    /// Override the chunker derived from the config.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`IngestionPipeline`], validating that all required fields
    /// are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if a required field is missing or the
    /// config's chunking parameters are invalid.
    pub fn build(self) -> Result<IngestionPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let chunker = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(WordWindowChunker::new(config.chunk_size, config.chunk_overlap)?),
        };

        Ok(IngestionPipeline { embedder, chunker })
    }
}
