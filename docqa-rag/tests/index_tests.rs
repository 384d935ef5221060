//! Tests for vector index construction, search, and persistence.

use docqa_rag::{Chunk, RagError, VectorIndex};
use proptest::prelude::*;
use tempfile::tempdir;

fn chunk(source: &str, text: &str) -> Chunk {
    Chunk { source_id: source.to_string(), text: text.to_string() }
}

#[test]
fn build_rejects_length_mismatch() {
    let err = VectorIndex::build(vec![vec![0.0, 1.0]], vec![]).unwrap_err();
    assert!(matches!(err, RagError::Integrity(_)));
}

#[test]
fn build_rejects_ragged_dimensions() {
    let err = VectorIndex::build(
        vec![vec![0.0, 1.0], vec![0.0]],
        vec![chunk("a.txt", "a"), chunk("b.txt", "b")],
    )
    .unwrap_err();
    assert!(matches!(err, RagError::Integrity(_)));
}

#[test]
fn empty_index_is_valid_and_matches_nothing() {
    let index = VectorIndex::build(Vec::new(), Vec::new()).unwrap();
    assert!(index.is_empty());
    assert_eq!(index.dimension(), 0);
    assert!(index.search(&[1.0, 2.0], 4).unwrap().is_empty());
}

#[test]
fn search_orders_by_distance_and_respects_k() {
    let index = VectorIndex::build(
        vec![vec![10.0, 0.0], vec![1.0, 0.0], vec![5.0, 0.0]],
        vec![chunk("far.txt", "far"), chunk("near.txt", "near"), chunk("mid.txt", "mid")],
    )
    .unwrap();

    let hits = index.search(&[0.0, 0.0], 2).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].0.source_id, "near.txt");
    assert_eq!(hits[1].0.source_id, "mid.txt");
    assert!(hits[0].1 <= hits[1].1);
}

#[test]
fn equal_distances_keep_insertion_order() {
    let index = VectorIndex::build(
        vec![vec![1.0, 0.0], vec![1.0, 0.0]],
        vec![chunk("first.txt", "x"), chunk("second.txt", "x")],
    )
    .unwrap();

    let hits = index.search(&[0.0, 0.0], 2).unwrap();
    assert_eq!(hits[0].0.source_id, "first.txt");
    assert_eq!(hits[1].0.source_id, "second.txt");
}

#[test]
fn search_rejects_query_dimension_mismatch() {
    let index =
        VectorIndex::build(vec![vec![0.0, 0.0]], vec![chunk("a.txt", "a")]).unwrap();
    let err = index.search(&[1.0], 1).unwrap_err();
    assert!(matches!(err, RagError::Integrity(_)));
}

#[test]
fn persist_then_load_is_search_equivalent() {
    let dir = tempdir().unwrap();
    let index = VectorIndex::build(
        vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.7, 0.7]],
        vec![chunk("a.txt", "alpha"), chunk("b.txt", "beta"), chunk("c.txt", "gamma")],
    )
    .unwrap();

    index.persist(dir.path()).unwrap();
    let loaded = VectorIndex::load(dir.path()).unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded.dimension(), 2);

    let query = [0.9, 0.1];
    let before = index.search(&query, 3).unwrap();
    let after = loaded.search(&query, 3).unwrap();
    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!(b.0, a.0);
        assert!((b.1 - a.1).abs() < 1e-6);
    }
}

#[test]
fn empty_index_round_trips() {
    let dir = tempdir().unwrap();
    VectorIndex::build(Vec::new(), Vec::new()).unwrap().persist(dir.path()).unwrap();

    let loaded = VectorIndex::load(dir.path()).unwrap();
    assert!(loaded.is_empty());
    assert!(loaded.search(&[0.5], 4).unwrap().is_empty());
}

#[test]
fn load_missing_artifacts_is_not_ready() {
    let dir = tempdir().unwrap();
    let err = VectorIndex::load(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, RagError::NotReady(_)));
}

#[test]
fn load_corrupt_artifact_is_not_ready() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("index.json"), b"not json").unwrap();
    std::fs::write(dir.path().join("metadata.json"), b"[]").unwrap();

    let err = VectorIndex::load(dir.path()).unwrap_err();
    assert!(matches!(err, RagError::NotReady(_)));
}

#[test]
fn load_detects_metadata_drift() {
    let dir = tempdir().unwrap();
    VectorIndex::build(vec![vec![0.0]], vec![chunk("a.txt", "a")])
        .unwrap()
        .persist(dir.path())
        .unwrap();
    // Simulate a metadata file that no longer matches the index.
    std::fs::write(dir.path().join("metadata.json"), b"[]").unwrap();

    let err = VectorIndex::load(dir.path()).unwrap_err();
    assert!(matches!(err, RagError::Integrity(_)));
}

#[test]
fn no_staging_files_left_behind() {
    let dir = tempdir().unwrap();
    VectorIndex::build(vec![vec![0.0]], vec![chunk("a.txt", "a")])
        .unwrap()
        .persist(dir.path())
        .unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().all(|n| !n.ends_with(".tmp")), "staging files left: {names:?}");
}

/// **Property: search ordering.** For any stored vectors and query of the
/// same dimension, distances are non-decreasing across the result sequence
/// and the result count is bounded by both `k` and the index size.
mod prop_search_ordering {
    use super::*;

    const DIM: usize = 8;

    fn arb_vector() -> impl Strategy<Value = Vec<f32>> {
        proptest::collection::vec(-1.0f32..1.0f32, DIM)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn distances_ascend_and_k_bounds_results(
            vectors in proptest::collection::vec(arb_vector(), 0..24),
            query in arb_vector(),
            k in 0usize..30,
        ) {
            let records = (0..vectors.len())
                .map(|i| chunk(&format!("doc{i}.txt"), "text"))
                .collect();
            let index = VectorIndex::build(vectors.clone(), records).unwrap();
            let hits = index.search(&query, k).unwrap();

            prop_assert!(hits.len() <= k);
            prop_assert!(hits.len() <= vectors.len());
            for window in hits.windows(2) {
                prop_assert!(window[0].1 <= window[1].1);
            }
        }
    }
}
