use std::cmp::Ordering;

use docqa_core::error::{Error, Result};
use docqa_core::types::ScoredChunk;

/// Descending score, then document id, then chunk index. Total over the
/// candidates of distinct documents.
pub fn rank_order(a: &ScoredChunk, b: &ScoredChunk) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.doc_id.cmp(&b.doc_id))
        .then_with(|| a.chunk_index.cmp(&b.chunk_index))
}

/// Merge every document's candidates into one global top-`k`.
///
/// Each item of `per_document` is one document's own ranked list (up to `k`
/// entries). No items at all means nothing is indexed, which is reported as
/// [`Error::NoDocuments`]; documents that contribute no candidates simply
/// yield an empty ranking.
pub fn aggregate<I>(per_document: I, k: usize) -> Result<Vec<ScoredChunk>>
where
    I: IntoIterator<Item = Vec<ScoredChunk>>,
{
    let mut documents = 0usize;
    let mut merged = Vec::new();
    for candidates in per_document {
        documents += 1;
        merged.extend(candidates);
    }
    if documents == 0 {
        return Err(Error::NoDocuments);
    }
    merged.sort_by(rank_order);
    merged.truncate(k);
    Ok(merged)
}
