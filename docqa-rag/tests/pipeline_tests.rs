//! End-to-end ingestion and retrieval tests, driven by a deterministic
//! hash-based embedder so they run with zero API keys.

use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use docqa_rag::{
    EmbeddingProvider, IngestReport, IngestionPipeline, RagConfig, RagError, Retriever,
};
use tempfile::tempdir;

/// Deterministic embeddings: hash the text bytes, then generate a
/// normalised vector whose direction depends on the content. Identical
/// texts embed identically, so a query equal to a chunk's text lands at
/// distance zero.
struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let hash =
            text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        emb
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed_batch(&self, texts: &[&str]) -> docqa_rag::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// An embedder whose every batch fails, for abort-path tests.
struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed_batch(&self, _texts: &[&str]) -> docqa_rag::Result<Vec<Vec<f32>>> {
        Err(RagError::Embedding {
            provider: "test".to_string(),
            message: "service unavailable".to_string(),
        })
    }

    fn dimensions(&self) -> usize {
        8
    }
}

fn pipeline(embedder: Arc<dyn EmbeddingProvider>) -> IngestionPipeline {
    IngestionPipeline::builder()
        .config(RagConfig::builder().chunk_size(8).chunk_overlap(2).build().unwrap())
        .embedding_provider(embedder)
        .build()
        .unwrap()
}

#[tokio::test]
async fn empty_corpus_builds_an_empty_valid_index() {
    let corpus = tempdir().unwrap();
    let store = tempdir().unwrap();

    let report = pipeline(Arc::new(HashEmbedder::new(16)))
        .ingest(corpus.path(), store.path())
        .await
        .unwrap();
    assert_eq!(report, IngestReport { documents: 0, chunks: 0 });

    let retriever = Retriever::load(store.path(), Arc::new(HashEmbedder::new(16))).unwrap();
    assert!(retriever.retrieve("anything at all", 4).await.unwrap().is_empty());
}

#[tokio::test]
async fn single_short_document_becomes_one_cited_chunk() {
    let corpus = tempdir().unwrap();
    fs::write(corpus.path().join("policy.txt"), "remote work is allowed two days").unwrap();
    let store = tempdir().unwrap();
    let embedder = Arc::new(HashEmbedder::new(16));

    let report =
        pipeline(embedder.clone()).ingest(corpus.path(), store.path()).await.unwrap();
    assert_eq!(report, IngestReport { documents: 1, chunks: 1 });

    let retriever = Retriever::load(store.path(), embedder).unwrap();
    let hits = retriever.retrieve("remote work is allowed two days", 4).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].chunk.source_id, "policy.txt");
    assert!(hits[0].distance.abs() < 1e-6);
}

#[tokio::test]
async fn non_text_entries_are_silently_skipped() {
    let corpus = tempdir().unwrap();
    fs::write(corpus.path().join("keep.txt"), "the only eligible document").unwrap();
    fs::write(corpus.path().join("notes.md"), "markdown is not corpus input").unwrap();
    fs::write(corpus.path().join("report.pdf"), b"%PDF-").unwrap();
    fs::create_dir(corpus.path().join("nested")).unwrap();
    fs::write(corpus.path().join("nested").join("deep.txt"), "not enumerated").unwrap();
    let store = tempdir().unwrap();

    let report = pipeline(Arc::new(HashEmbedder::new(16)))
        .ingest(corpus.path(), store.path())
        .await
        .unwrap();
    assert_eq!(report.documents, 1);
}

#[tokio::test]
async fn embedding_failure_aborts_without_artifacts() {
    let corpus = tempdir().unwrap();
    fs::write(corpus.path().join("doc.txt"), "some corpus text to embed").unwrap();
    let store = tempdir().unwrap();

    let err = pipeline(Arc::new(FailingEmbedder))
        .ingest(corpus.path(), store.path())
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::Embedding { .. }));

    // Nothing was persisted: a retriever still refuses to start.
    assert!(!store.path().join("index.json").exists());
    assert!(!store.path().join("metadata.json").exists());
    let err = Retriever::load(store.path(), Arc::new(HashEmbedder::new(16))).unwrap_err();
    assert!(matches!(err, RagError::NotReady(_)));
}

#[tokio::test]
async fn oversized_top_k_returns_fewer_in_distance_order() {
    let corpus = tempdir().unwrap();
    // 20 words with window 8 / overlap 2 → 3 chunks.
    let text: String =
        (0..20).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
    fs::write(corpus.path().join("long.txt"), &text).unwrap();
    let store = tempdir().unwrap();
    let embedder = Arc::new(HashEmbedder::new(16));

    let report =
        pipeline(embedder.clone()).ingest(corpus.path(), store.path()).await.unwrap();
    assert_eq!(report.chunks, 3);

    let retriever = Retriever::load(store.path(), embedder).unwrap();
    let hits = retriever.retrieve("word5 word6 word7", 10).await.unwrap();
    assert_eq!(hits.len(), 3);
    for window in hits.windows(2) {
        assert!(window[0].distance <= window[1].distance);
    }
}

#[test]
fn retriever_load_fails_fast_without_ingestion() {
    let store = tempdir().unwrap();
    let err = Retriever::load(store.path(), Arc::new(HashEmbedder::new(4))).unwrap_err();
    assert!(matches!(err, RagError::NotReady(_)));
}

#[test]
fn pipeline_builder_requires_an_embedder() {
    let err = IngestionPipeline::builder().config(RagConfig::default()).build().unwrap_err();
    assert!(matches!(err, RagError::Config(_)));
}

#[test]
fn pipeline_builder_rejects_invalid_chunking() {
    let config = RagConfig { chunk_size: 10, chunk_overlap: 10, top_k: 4 };
    let err = IngestionPipeline::builder()
        .config(config)
        .embedding_provider(Arc::new(HashEmbedder::new(4)))
        .build()
        .unwrap_err();
    assert!(matches!(err, RagError::Config(_)));
}
