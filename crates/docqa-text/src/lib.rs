//! docqa-text
//!
//! Per-document lexical retrieval: a tantivy analyzer for tokenization, a
//! TF-IDF vector space built over one document's chunks, and cosine top-k
//! scoring. See `index` and `search`.

pub mod tantivy_utils;
pub mod index;
pub mod search;

pub use index::TfidfIndex;
pub use tantivy_utils::Analyzer;
