//! Document chunking.
//!
//! [`WordWindowChunker`] splits text into overlapping fixed-size windows of
//! whitespace-delimited words, the shape the embedding model expects. The
//! [`Chunker`] trait is the seam: ingestion only sees the trait, so tests
//! and future strategies can slot in without touching the pipeline.

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s tagged with the parent document's
/// source id. Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has no text.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Splits text into fixed-size windows of whitespace-delimited words with a
/// configurable overlap between consecutive windows.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::WordWindowChunker;
///
/// let chunker = WordWindowChunker::new(500, 50)?;
/// let windows = chunker.split("one two three ...");
/// ```
#[derive(Debug, Clone)]
pub struct WordWindowChunker {
    chunk_size: usize,
    overlap: usize,
}

impl WordWindowChunker {
    /// Create a new `WordWindowChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `chunk_size` is zero or if `overlap`
    /// is not strictly smaller than `chunk_size` — the window would never
    /// advance otherwise.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be greater than zero".to_string()));
        }
        if overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "overlap ({overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    /// Split `text` into overlapping word windows.
    ///
    /// Consecutive windows advance by `chunk_size - overlap` words. The
    /// final window may be shorter than `chunk_size` and is always emitted;
    /// emission stops once a window reaches the end of the word stream, so
    /// no window lies wholly inside the previous one. Empty or
    /// whitespace-only text yields no windows.
    pub fn split(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        // Strictly positive: new() rejects overlap >= chunk_size.
        let step = self.chunk_size - self.overlap;
        let mut windows = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(words.len());
            windows.push(words[start..end].join(" "));
            if end == words.len() {
                break;
            }
            start += step;
        }
        windows
    }
}

impl Chunker for WordWindowChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        self.split(&document.text)
            .into_iter()
            .map(|text| Chunk { source_id: document.source_id.clone(), text })
            .collect()
    }
}
