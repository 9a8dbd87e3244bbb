use docqa_core::traits::ChunkScorer;
use docqa_core::types::SearchHit;

use crate::index::{norm, term_counts, SparseVector, TfidfIndex};

/// Scores are rounded to this step so that mathematically equal cosines
/// compare equal and fall back to chunk order.
const SCORE_QUANTUM: f64 = 1e-6;

fn quantize(score: f64) -> f32 {
	((score / SCORE_QUANTUM).round() * SCORE_QUANTUM) as f32
}

impl TfidfIndex {
	/// Query vector weighted by this index's IDF. Out-of-vocabulary terms are dropped.
	fn query_vector(&self, query: &str) -> SparseVector {
		term_counts(self.analyzer.tokenize(query))
			.into_iter()
			.filter_map(|(term, tf)| self.idf.get(&term).map(|idf| (term, f64::from(tf) * idf)))
			.collect()
	}

	/// Cosine similarity of every chunk against `query`, in chunk order.
	/// A zero-magnitude side scores exactly 0. Computed in f64, reported rounded
	/// to `SCORE_QUANTUM`.
	pub fn scores(&self, query: &str) -> Vec<f32> {
		let q = self.query_vector(query);
		let q_norm = norm(&q);
		self.vectors
			.iter()
			.map(|chunk| {
				if q_norm == 0.0 || chunk.norm == 0.0 { return 0.0; }
				let dot: f64 = q.iter().filter_map(|(term, qw)| chunk.weights.get(term).map(|cw| qw * cw)).sum();
				let score = dot / (chunk.norm * q_norm);
				if score.is_finite() { quantize(score) } else { 0.0 }
			})
			.collect()
	}

	pub fn top_k(&self, query: &str, k: usize) -> Vec<SearchHit> {
		let mut hits: Vec<SearchHit> = self
			.scores(query)
			.into_iter()
			.enumerate()
			.map(|(chunk_index, score)| SearchHit { chunk_index, score })
			.collect();
		hits.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.chunk_index.cmp(&b.chunk_index)));
		hits.truncate(k);
		hits
	}
}

impl ChunkScorer for TfidfIndex {
	fn chunk_count(&self) -> usize { self.len() }
	fn top_k(&self, query: &str, k: usize) -> Vec<SearchHit> { TfidfIndex::top_k(self, query, k) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cat_query_prefers_cat_chunk() {
		let index = TfidfIndex::build(&["the cat sat", "the dog ran"]);
		let hits = index.top_k("cat", 5);
		assert_eq!(hits.len(), 2);
		assert_eq!(hits[0].chunk_index, 0);
		assert!(hits[0].score > 0.0);
		assert_eq!(hits[1].chunk_index, 1);
		assert_eq!(hits[1].score, 0.0);
	}

	#[test]
	fn unknown_terms_score_zero_and_keep_order() {
		let index = TfidfIndex::build(&["alpha beta", "gamma", "delta"]);
		let hits = index.top_k("zeta omega", 3);
		assert!(hits.iter().all(|h| h.score == 0.0));
		let order: Vec<usize> = hits.iter().map(|h| h.chunk_index).collect();
		assert_eq!(order, vec![0, 1, 2], "ties fall back to chunk order");
	}

	#[test]
	fn identical_chunk_scores_one() {
		let index = TfidfIndex::build(&["rust borrow checker", "python garbage collector"]);
		let hits = index.top_k("Rust, borrow checker!", 1);
		assert_eq!(hits.len(), 1);
		assert!((hits[0].score - 1.0).abs() < 1e-5);
	}

	#[test]
	fn equal_cosines_tie_on_chunk_order() {
		// {cat: idf} and {the: 3 idf} both sit at 45 degrees from {the: idf, cat: idf}
		let index = TfidfIndex::build(&["cat", "the the the"]);
		let hits = index.top_k("the cat", 2);
		assert_eq!(hits[0].score.to_bits(), hits[1].score.to_bits());
		let order: Vec<usize> = hits.iter().map(|h| h.chunk_index).collect();
		assert_eq!(order, vec![0, 1]);
	}

	#[test]
	fn query_case_and_punctuation_are_ignored() {
		let index = TfidfIndex::build(&["Cats and dogs", "birds"]);
		assert_eq!(index.scores("CATS!!!"), index.scores("cats"));
	}

	#[test]
	fn empty_index_returns_nothing() {
		let index = TfidfIndex::build::<String>(&[]);
		assert!(index.top_k("anything", 10).is_empty());
	}
}
