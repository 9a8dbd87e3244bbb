use tracing::debug;

use docqa_core::config::{ANSWER_MAX_K, EXTRACT_MAX_K};
use docqa_core::error::{Error, Result};
use docqa_core::types::{Answer, ScoredChunk};

use crate::aggregate::aggregate;
use crate::answer::synthesize;
use crate::store::{DocumentStore, Snapshot};

impl Snapshot {
    fn check(&self, query: &str, k: usize, max_k: usize) -> Result<()> {
        if self.is_empty() {
            return Err(Error::NoDocuments);
        }
        if query.trim().is_empty() {
            return Err(Error::InvalidInput("Query cannot be empty".into()));
        }
        if !(1..=max_k).contains(&k) {
            return Err(Error::InvalidInput(format!("k must be in [1, {max_k}], got {k}")));
        }
        Ok(())
    }

    fn ranked(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let ranked = aggregate(self.documents.iter().map(|doc| doc.top_k(query, k)), k)?;
        debug!(documents = self.len(), results = ranked.len(), k, "ranked passages");
        Ok(ranked)
    }

    /// Global top-`k` passages, `k` in `[1, 50]`.
    pub fn extract(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        self.check(query, k, EXTRACT_MAX_K)?;
        self.ranked(query, k)
    }

    /// Answer built from the global top-`k` passages, `k` in `[1, 10]`.
    pub fn answer(&self, query: &str, k: usize, max_answer_chars: usize) -> Result<Answer> {
        self.check(query, k, ANSWER_MAX_K)?;
        Ok(synthesize(&self.ranked(query, k)?, max_answer_chars))
    }
}

/// Rank passages across every document currently in `store`.
pub fn extract(store: &DocumentStore, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
    store.snapshot().extract(query, k)
}

/// Synthesize an answer from every document currently in `store`.
pub fn answer(store: &DocumentStore, query: &str, k: usize, max_answer_chars: usize) -> Result<Answer> {
    store.snapshot().answer(query, k, max_answer_chars)
}
