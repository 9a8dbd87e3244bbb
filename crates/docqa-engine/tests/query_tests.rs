use std::sync::Arc;
use std::thread;

use docqa_core::error::{Error, ErrorKind};
use docqa_core::traits::ChunkScorer;
use docqa_core::types::SearchHit;
use docqa_engine::{answer, extract, Document, DocumentStore, DEFAULT_MAX_ANSWER_CHARS, NO_RELEVANT_PASSAGES};

fn chunks(texts: &[&str]) -> Vec<String> { texts.iter().map(|s| s.to_string()).collect() }

fn survival_store() -> DocumentStore {
    let store = DocumentStore::new();
    store
        .insert("fire", "fire.txt", chunks(&["Fire needs heat, fuel and oxygen.", "A bow drill starts a fire by friction.", "Keep the fire small at night."]))
        .unwrap();
    store
        .insert("water", "water.txt", chunks(&["Boil water for one minute to purify it.", "Collect rain water in clean containers."]))
        .unwrap();
    store
}

/// Scores every chunk with a fixed value, for ordering tests.
struct FixedScorer(Vec<f32>);

impl ChunkScorer for FixedScorer {
    fn chunk_count(&self) -> usize { self.0.len() }
    fn top_k(&self, _query: &str, k: usize) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = self.0.iter().enumerate().map(|(chunk_index, &score)| SearchHit { chunk_index, score }).collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.chunk_index.cmp(&b.chunk_index)));
        hits.truncate(k);
        hits
    }
}

#[test]
fn empty_corpus_reports_no_documents() {
    let store = DocumentStore::new();
    let err = extract(&store, "anything", 5).unwrap_err();
    assert!(matches!(err, Error::NoDocuments));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(answer(&store, "anything", 3, DEFAULT_MAX_ANSWER_CHARS), Err(Error::NoDocuments)));
}

#[test]
fn blank_query_and_bad_k_are_invalid_input() {
    let store = survival_store();
    assert!(matches!(extract(&store, "   \t", 5), Err(Error::InvalidInput(_))));
    assert!(matches!(extract(&store, "fire", 0), Err(Error::InvalidInput(_))));
    assert!(matches!(extract(&store, "fire", 51), Err(Error::InvalidInput(_))));
    assert!(extract(&store, "fire", 50).is_ok());
    assert!(matches!(answer(&store, "fire", 11, 3000), Err(Error::InvalidInput(_))));
    assert!(matches!(answer(&store, "", 3, 3000), Err(Error::InvalidInput(_))));
}

#[test]
fn single_document_cat_scenario() {
    let store = DocumentStore::new();
    store.insert("pets", "pets.txt", chunks(&["the cat sat", "the dog ran"])).unwrap();
    let results = extract(&store, "cat", 5).unwrap();
    assert_eq!(results[0].chunk_index, 0);
    assert!(results[0].score > 0.0);
    assert_eq!(results[1].chunk_index, 1);
    assert_eq!(results[1].score, 0.0);
}

#[test]
fn extract_ranks_across_documents() {
    let store = survival_store();
    let results = extract(&store, "purify water", 3).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].doc_id, "water");
    assert_eq!(results[0].chunk_index, 0);
    assert_eq!(results[0].source, "water.txt");
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn each_document_contributes_up_to_k() {
    let store = DocumentStore::new();
    store.insert_document(Document::with_scorer("a", "a.txt", chunks(&["a0", "a1", "a2"]), Box::new(FixedScorer(vec![0.9, 0.8, 0.7]))).unwrap()).unwrap();
    store.insert_document(Document::with_scorer("b", "b.txt", chunks(&["b0"]), Box::new(FixedScorer(vec![0.1]))).unwrap()).unwrap();
    let results = extract(&store, "q", 3).unwrap();
    let docs: Vec<&str> = results.iter().map(|r| r.doc_id.as_str()).collect();
    assert_eq!(docs, vec!["a", "a", "a"]);
}

#[test]
fn equal_scores_order_by_document_then_chunk() {
    let store = DocumentStore::new();
    store.insert_document(Document::with_scorer("b", "b.txt", chunks(&["b0", "b1"]), Box::new(FixedScorer(vec![0.5, 0.5]))).unwrap()).unwrap();
    store.insert_document(Document::with_scorer("a", "a.txt", chunks(&["a0"]), Box::new(FixedScorer(vec![0.5]))).unwrap()).unwrap();
    let results = extract(&store, "q", 10).unwrap();
    let keys: Vec<(String, usize)> = results.iter().map(|r| (r.doc_id.clone(), r.chunk_index)).collect();
    assert_eq!(keys, vec![("a".to_string(), 0), ("b".to_string(), 0), ("b".to_string(), 1)]);
}

#[test]
fn documents_without_chunks_degrade_gracefully() {
    let store = DocumentStore::new();
    store.insert("empty", "empty.txt", vec![]).unwrap();
    assert!(extract(&store, "fire", 5).unwrap().is_empty());
    store.insert("fire", "fire.txt", chunks(&["fire burns"])).unwrap();
    let results = extract(&store, "fire", 5).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_id, "fire");
}

#[test]
fn answer_joins_relevant_passages() {
    let store = survival_store();
    let a = answer(&store, "fire friction", 2, DEFAULT_MAX_ANSWER_CHARS).unwrap();
    assert!(a.answer.starts_with("A bow drill starts a fire by friction."));
    assert!(a.answer.contains("\n\n---\n\n"));
    assert_eq!(a.sources.len(), 2);
    assert_eq!(a.sources[0].name, "fire.txt");
    assert_eq!(a.sources[0].chunk_index, 1);
}

#[test]
fn answer_without_overlap_is_sentinel_not_error() {
    let store = survival_store();
    let a = answer(&store, "quantum chromodynamics", 3, DEFAULT_MAX_ANSWER_CHARS).unwrap();
    assert_eq!(a.answer, NO_RELEVANT_PASSAGES);
    assert!(a.sources.is_empty());
}

#[test]
fn answer_respects_configured_length() {
    let store = DocumentStore::new();
    let long = (0..100).map(|i| format!("fire{i}")).collect::<Vec<_>>().join(" ") + " fire";
    store.insert("long", "long.txt", vec![long]).unwrap();
    let a = answer(&store, "fire", 1, 40).unwrap();
    assert!(a.answer.ends_with("..."));
    assert!(a.answer.chars().count() <= 43);
}

#[test]
fn identical_queries_are_bit_identical() {
    let store = survival_store();
    let a = extract(&store, "fire water night", 5).unwrap();
    let b = extract(&store, "fire water night", 5).unwrap();
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!((x.doc_id.as_str(), x.chunk_index, x.score.to_bits()), (y.doc_id.as_str(), y.chunk_index, y.score.to_bits()));
    }
}

#[test]
fn per_document_idf_is_not_shared() {
    let store = DocumentStore::new();
    // "fire" is in every chunk of doc a, but only one chunk of doc b
    store.insert("a", "a.txt", chunks(&["fire wood", "fire pit"])).unwrap();
    store.insert("b", "b.txt", chunks(&["fire wood", "river stone"])).unwrap();
    let a_score = store.get("a").unwrap().top_k("fire", 1)[0].score;
    let b_score = store.get("b").unwrap().top_k("fire", 1)[0].score;
    assert!(b_score > a_score, "fire is rarer within b, so it weighs more there");
}

#[test]
fn deletion_removes_document_from_later_queries() {
    let store = survival_store();
    store.remove("water").unwrap();
    let results = extract(&store, "water", 10).unwrap();
    assert!(results.iter().all(|r| r.doc_id != "water"));
    assert!(matches!(store.remove("water"), Err(Error::NotFound(_))));
}

#[test]
fn snapshot_survives_concurrent_deletion() {
    let store = Arc::new(survival_store());
    let snapshot = store.snapshot();
    let before = snapshot.extract("water", 5).unwrap();

    let deleter = {
        let store = Arc::clone(&store);
        thread::spawn(move || store.remove("water").map(|m| m.doc_id))
    };
    assert_eq!(deleter.join().unwrap().unwrap(), "water");

    let after = snapshot.extract("water", 5).unwrap();
    assert_eq!(before, after, "captured snapshot still sees the deleted document");
    assert!(extract(&store, "water", 5).unwrap().iter().all(|r| r.doc_id != "water"));
}

#[test]
fn concurrent_readers_agree() {
    let store = Arc::new(survival_store());
    let expected = extract(&store, "fire night", 4).unwrap();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || extract(&store, "fire night", 4).unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

#[test]
fn listing_reports_chunk_counts() {
    let store = survival_store();
    let listed = store.list();
    assert_eq!(listed.len(), 2);
    assert_eq!((listed[0].doc_id.as_str(), listed[0].chunks), ("fire", 3));
    assert_eq!((listed[1].doc_id.as_str(), listed[1].chunks), ("water", 2));
}

#[test]
fn answer_budget_matches_configured_default() {
    let defaults = docqa_core::config::QuerySettings::default();
    assert_eq!(DEFAULT_MAX_ANSWER_CHARS, defaults.max_answer_chars);
}
