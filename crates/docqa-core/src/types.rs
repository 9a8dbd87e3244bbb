//! Domain types shared by the index, the document store and the query surface.

use serde::{Deserialize, Serialize};

/// Opaque document identifier, unique within a store.
pub type DocId = String;

/// One passage of a document.
///
/// - `chunk_index`: 0-based position in ingestion order, stable for the
///   document's lifetime and used for citations
/// - `content`: the literal passage text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_index: usize,
    pub content: String,
}

impl Chunk {
    /// Assign ordinals to chunk texts in the order given.
    pub fn sequence<I, S>(texts: I) -> Vec<Chunk>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| Chunk { chunk_index, content: content.into() })
            .collect()
    }
}

/// The minimal surface returned by a per-document index.
///
/// `chunk_index` matches `Chunk::chunk_index`. `score` is a cosine similarity
/// in `[0, 1]`; higher is always better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub chunk_index: usize,
    pub score: f32,
}

/// A ranked passage resolved against its owning document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub doc_id: DocId,
    pub chunk_index: usize,
    pub score: f32,
    pub text: String,
    /// Display name of the owning document.
    pub source: String,
}

/// Citation for a passage that contributed to an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSource {
    pub name: String,
    pub chunk_index: usize,
    pub score: f32,
}

/// A synthesized answer together with the passages it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<AnswerSource>,
}

/// Listing entry for an indexed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub doc_id: DocId,
    pub name: String,
    pub chunks: usize,
}
