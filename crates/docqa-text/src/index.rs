//! Per-document TF-IDF vector space.
//!
//! Each chunk of the document plays the role of a "document" in the classic
//! TF-IDF sense, so IDF weights are specific to one document and are never
//! shared across documents.

use std::collections::BTreeMap;

use tracing::debug;

use docqa_core::config::IndexSettings;

use crate::tantivy_utils::Analyzer;

/// Sparse term -> weight mapping. Ordered so that float sums are reproducible.
pub(crate) type SparseVector = BTreeMap<String, f64>;

#[derive(Debug, Clone)]
pub(crate) struct ChunkVector {
	pub(crate) weights: SparseVector,
	pub(crate) norm: f64,
}

/// Read-only lexical index built once from a document's chunk texts.
#[derive(Debug, Clone)]
pub struct TfidfIndex {
	pub(crate) analyzer: Analyzer,
	/// Vocabulary with the smoothed IDF of each term.
	pub(crate) idf: BTreeMap<String, f64>,
	pub(crate) vectors: Vec<ChunkVector>,
}

/// Raw occurrence counts. TF is not length-normalized, neither here nor for queries.
pub(crate) fn term_counts(tokens: Vec<String>) -> BTreeMap<String, u32> {
	let mut counts = BTreeMap::new();
	for token in tokens { *counts.entry(token).or_insert(0u32) += 1; }
	counts
}

/// `log((1 + n) / (1 + df)) + 1`
pub(crate) fn smoothed_idf(chunk_count: usize, doc_freq: usize) -> f64 {
	((1 + chunk_count) as f64 / (1 + doc_freq) as f64).ln() + 1.0
}

pub(crate) fn norm(weights: &SparseVector) -> f64 {
	weights.values().map(|w| w * w).sum::<f64>().sqrt()
}

impl TfidfIndex {
	pub fn build<S: AsRef<str>>(chunks: &[S]) -> Self {
		Self::build_with(chunks, &IndexSettings::default())
	}

	pub fn build_with<S: AsRef<str>>(chunks: &[S], settings: &IndexSettings) -> Self {
		let analyzer = Analyzer::new(settings);
		let counts: Vec<BTreeMap<String, u32>> = chunks.iter().map(|c| term_counts(analyzer.tokenize(c.as_ref()))).collect();

		let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
		for chunk_terms in &counts {
			for term in chunk_terms.keys() { *doc_freq.entry(term.as_str()).or_insert(0) += 1; }
		}
		let idf: BTreeMap<String, f64> = doc_freq
			.into_iter()
			.map(|(term, df)| (term.to_string(), smoothed_idf(counts.len(), df)))
			.collect();

		let vectors = counts
			.iter()
			.map(|chunk_terms| {
				let weights: SparseVector = chunk_terms
					.iter()
					.map(|(term, &tf)| (term.clone(), f64::from(tf) * idf.get(term).copied().unwrap_or(0.0)))
					.collect();
				let norm = norm(&weights);
				ChunkVector { weights, norm }
			})
			.collect();

		debug!(chunks = counts.len(), vocabulary = idf.len(), "built tf-idf index");
		Self { analyzer, idf, vectors }
	}

	pub fn len(&self) -> usize { self.vectors.len() }

	pub fn is_empty(&self) -> bool { self.vectors.is_empty() }

	pub fn vocabulary_size(&self) -> usize { self.idf.len() }

	pub fn idf(&self, term: &str) -> Option<f64> { self.idf.get(term).copied() }
}
