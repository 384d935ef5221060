//! The vector index: chunk embeddings and their metadata records as one
//! invariant-checked value, with exact nearest-neighbor search and
//! two-artifact persistence.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Chunk;
use crate::error::{RagError, Result};

/// File name of the persisted vector artifact.
pub const INDEX_FILE: &str = "index.json";

/// File name of the persisted chunk metadata artifact.
pub const METADATA_FILE: &str = "metadata.json";

/// On-disk form of the vector half of the index.
#[derive(Serialize, Deserialize)]
struct IndexArtifact {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

/// An exact nearest-neighbor index over chunk embeddings.
///
/// Vectors and chunk records are parallel sequences owned by a single
/// value: position `i` in the vector store corresponds to record `i` in the
/// metadata store. [`VectorIndex::build`] enforces the invariant once; no
/// later operation can break it, and [`load`](VectorIndex::load) re-checks
/// it against what the filesystem actually holds.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
    records: Vec<Chunk>,
}

impl VectorIndex {
    /// Build an index from parallel vectors and records.
    ///
    /// Empty inputs produce a valid empty index.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Integrity`] if the two sequences differ in
    /// length or the vectors do not all share one dimension.
    pub fn build(vectors: Vec<Vec<f32>>, records: Vec<Chunk>) -> Result<Self> {
        if vectors.len() != records.len() {
            return Err(RagError::Integrity(format!(
                "vector count ({}) does not match record count ({})",
                vectors.len(),
                records.len()
            )));
        }

        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(RagError::Integrity(format!(
                "embedding dimension mismatch: expected {dimension}, found {}",
                bad.len()
            )));
        }

        Ok(Self { dimension, vectors, records })
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The embedding dimension, or 0 for an empty index.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Return up to `k` records nearest to `query` by squared Euclidean
    /// distance, ascending; equal distances keep insertion order. Fewer
    /// than `k` results when the index is smaller; an empty index matches
    /// nothing regardless of the query.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Integrity`] if `query` does not match the index
    /// dimension.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(Chunk, f32)>> {
        if self.records.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(RagError::Integrity(format!(
                "query dimension ({}) does not match index dimension ({})",
                query.len(),
                self.dimension
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .map(|v| squared_l2(v, query))
            .enumerate()
            .collect();
        // Stable sort, so ties keep insertion order.
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, distance)| (self.records[i].clone(), distance))
            .collect())
    }

    /// Persist the index as two co-located artifacts in `dir`.
    ///
    /// Each artifact is staged to a `.tmp` sibling and renamed into place.
    /// [`METADATA_FILE`] is written only after [`INDEX_FILE`] has been
    /// renamed, so a readable metadata file never refers to a missing or
    /// stale index.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Io`] on filesystem failures and
    /// [`RagError::Serialization`] if an artifact cannot be encoded.
    pub fn persist(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .map_err(|e| RagError::Io { path: dir.to_path_buf(), source: e })?;

        let artifact =
            IndexArtifact { dimension: self.dimension, vectors: self.vectors.clone() };
        let index_bytes = serde_json::to_vec(&artifact)
            .map_err(|e| RagError::Serialization(e.to_string()))?;
        let metadata_bytes = serde_json::to_vec(&self.records)
            .map_err(|e| RagError::Serialization(e.to_string()))?;

        write_staged(&dir.join(INDEX_FILE), &index_bytes)?;
        write_staged(&dir.join(METADATA_FILE), &metadata_bytes)?;

        debug!(
            chunks = self.records.len(),
            dimension = self.dimension,
            dir = %dir.display(),
            "persisted vector index"
        );
        Ok(())
    }

    /// Load a previously persisted index from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotReady`] if either artifact is missing or
    /// unparsable, and [`RagError::Integrity`] if the artifacts parse but
    /// disagree with each other.
    pub fn load(dir: &Path) -> Result<Self> {
        let artifact: IndexArtifact = read_artifact(&dir.join(INDEX_FILE))?;
        let records: Vec<Chunk> = read_artifact(&dir.join(METADATA_FILE))?;

        let index = Self::build(artifact.vectors, records)?;
        if !index.is_empty() && index.dimension != artifact.dimension {
            return Err(RagError::Integrity(format!(
                "index artifact declares dimension {} but holds {}-dimensional vectors",
                artifact.dimension, index.dimension
            )));
        }
        Ok(index)
    }
}

/// Squared Euclidean distance between two equal-length vectors.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn write_staged(path: &Path, bytes: &[u8]) -> Result<()> {
    let staged = path.with_extension("json.tmp");
    fs::write(&staged, bytes).map_err(|e| RagError::Io { path: staged.clone(), source: e })?;
    fs::rename(&staged, path)
        .map_err(|e| RagError::Io { path: path.to_path_buf(), source: e })?;
    Ok(())
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| {
        RagError::NotReady(format!("missing index artifact at {}: {e}", path.display()))
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        RagError::NotReady(format!("corrupt index artifact at {}: {e}", path.display()))
    })
}
