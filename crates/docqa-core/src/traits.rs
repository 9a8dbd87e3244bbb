use crate::types::SearchHit;

/// A read-only lexical index over one document's chunks.
///
/// Implementations are built once and never mutated, so a shared reference is
/// enough for concurrent queries.
pub trait ChunkScorer: Send + Sync {
    /// Number of chunks the index was built over.
    fn chunk_count(&self) -> usize;

    /// Up to `k` hits sorted by descending score, ties by ascending
    /// `chunk_index`. Never longer than `chunk_count()`.
    fn top_k(&self, query: &str, k: usize) -> Vec<SearchHit>;
}
