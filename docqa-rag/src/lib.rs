//! # docqa-rag
//!
//! The retrieval engine behind docqa: splitting documents into overlapping
//! word windows, embedding them through an [`EmbeddingProvider`], indexing
//! the vectors for exact nearest-neighbor search, and serving query-time
//! lookups over the persisted index.
//!
//! The two halves of the crate mirror the system's two phases:
//!
//! - **Offline**: [`IngestionPipeline`] reads a corpus directory, chunks and
//!   embeds every document in one batch, and persists a [`VectorIndex`] as a
//!   pair of co-located artifacts.
//! - **Online**: [`Retriever`] loads that index once at startup and answers
//!   `retrieve(query, top_k)` calls with the nearest chunk records.

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod ingest;
pub mod openai;
pub mod retriever;

pub use chunking::{Chunker, WordWindowChunker};
pub use config::RagConfig;
pub use document::{Chunk, Document, RetrievedChunk};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use index::VectorIndex;
pub use ingest::{IngestReport, IngestionPipeline};
pub use openai::OpenAIEmbedder;
pub use retriever::Retriever;
